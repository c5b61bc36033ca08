//! Frame timing.

pub mod frame_pacer;

pub use frame_pacer::FramePacer;
