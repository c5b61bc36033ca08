use crate::config::{parse_cache_age, parse_cache_size, parse_fps, parse_scale, Options};
use crate::demos::Demo;
use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

/// Pico Console - a fantasy console runtime
#[derive(Parser, Debug, Default)]
#[command(name = "pico-console")]
#[command(version)]
#[command(about = "Fantasy console runtime: runs a demo cartridge headlessly", long_about = None)]
pub struct Cli {
    /// Console type (pico8, tic80, zxspectrum, cbm64)
    #[arg(short, long, value_name = "TYPE")]
    pub console: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Sprite sheet image
    #[arg(long, value_name = "FILE")]
    pub sprites: Option<PathBuf>,

    /// 16x6 glyph sheet image
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Demo cartridge to run
    #[arg(short, long, value_name = "NAME", default_value = "drawing")]
    pub demo: String,

    /// Number of frames to run
    #[arg(short = 'n', long, value_name = "COUNT", default_value_t = 60)]
    pub frames: u64,

    /// Target frame rate (1-240)
    #[arg(long, value_name = "FPS")]
    pub fps: Option<String>,

    /// Run as fast as possible
    #[arg(long)]
    pub unpaced: bool,

    /// Write the last frame to this PNG file
    #[arg(short, long, value_name = "FILE")]
    pub screenshot: Option<PathBuf>,

    /// Screenshot scale factor (1-16)
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<String>,

    /// Transform cache capacity
    #[arg(long = "cache-size", value_name = "ENTRIES")]
    pub cache_size: Option<String>,

    /// Transform cache entry lifetime, in seconds
    #[arg(long = "cache-age", value_name = "SECONDS")]
    pub cache_age: Option<String>,

    /// Log level (nothing, user, error, warning, info, debug, all or 0-6)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

impl Cli {
    /// Merge CLI arguments into the options struct
    pub fn merge_into_options(&self, mut opts: Options) -> Result<Options> {
        if let Some(ref console) = self.console {
            opts.console = Some(console.parse().context("Invalid console type")?);
        }

        if let Some(ref fps) = self.fps {
            opts.fps = Some(parse_fps(fps)?);
        }

        if let Some(ref sprites) = self.sprites {
            opts.sprites = Some(sprites.clone());
        }

        if let Some(ref font) = self.font {
            opts.font = Some(font.clone());
        }

        if let Some(ref scale) = self.scale {
            opts.screenshot_scale = Some(parse_scale(scale)?);
        }

        if let Some(ref size) = self.cache_size {
            opts.cache_max_entries = Some(parse_cache_size(size)?);
        }

        if let Some(ref age) = self.cache_age {
            opts.cache_max_age = Some(parse_cache_age(age)?);
        }

        if let Some(ref level) = self.log_level {
            opts.log_level = Some(level.parse().context("Invalid log level")?);
        }

        Ok(opts)
    }

    pub fn demo(&self) -> Result<Demo> {
        self.demo.parse().context("Invalid demo name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConsoleType;
    use crate::logging::LogLevel;
    use std::time::Duration;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["pico-console"]).unwrap();
        assert_eq!(cli.frames, 60);
        assert_eq!(cli.demo().unwrap(), Demo::Drawing);
        assert!(!cli.unpaced);
        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts, Options::default());
    }

    #[test]
    fn test_merge_basic_options() {
        let cli = Cli::try_parse_from([
            "pico-console",
            "--console",
            "tic-80",
            "--fps",
            "30",
            "--scale",
            "4",
            "--cache-size",
            "10",
            "--cache-age",
            "5",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let opts = cli.merge_into_options(Options::default()).unwrap();
        assert_eq!(opts.console, Some(ConsoleType::Tic80));
        assert_eq!(opts.fps, Some(30));
        assert_eq!(opts.screenshot_scale, Some(4));
        assert_eq!(opts.cache_max_entries, Some(10));
        assert_eq!(opts.cache_max_age, Some(Duration::from_secs(5)));
        assert_eq!(opts.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_cli_overrides_file_options() {
        let file = Options {
            console: Some(ConsoleType::Cbm64),
            fps: Some(50),
            ..Default::default()
        };
        let cli = Cli {
            fps: Some("25".to_string()),
            ..Default::default()
        };

        let opts = cli.merge_into_options(file).unwrap();
        assert_eq!(opts.console, Some(ConsoleType::Cbm64));
        assert_eq!(opts.fps, Some(25));
    }

    #[test]
    fn test_invalid_values() {
        for args in [
            ["pico-console", "--console", "nes"],
            ["pico-console", "--fps", "0"],
            ["pico-console", "--scale", "99"],
            ["pico-console", "--cache-size", "0"],
        ] {
            let cli = Cli::try_parse_from(args).unwrap();
            assert!(cli.merge_into_options(Options::default()).is_err(), "{:?}", args);
        }
    }

    #[test]
    fn test_unknown_demo() {
        let cli = Cli::try_parse_from(["pico-console", "--demo", "pong"]).unwrap();
        assert!(cli.demo().is_err());
    }
}
