// Fantasy console runtime library

pub mod cli;
pub mod config;
pub mod console;
pub mod demos;
pub mod graphics;
pub mod input;
pub mod logging;
pub mod propfile;
pub mod time;

pub use cli::Cli;
pub use config::{ConsoleConfig, ConsoleType, Options};
pub use console::{Cartridge, Console, ConsoleError};
pub use logging::LogLevel;
