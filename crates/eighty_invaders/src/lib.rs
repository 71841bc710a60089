//! Space Invaders arcade hardware for the eighty 8080 core.
//!
//! Implements the machine side of the hardware boundary: input ports and
//! DIP switches, the 16-bit shift-register peripheral, the sound-latch
//! ports, the watchdog, and the two-per-frame interrupt schedule. Video
//! presentation and audio playback belong to a front-end; this crate
//! exposes the video RAM window and the sound-port latches they consume.

pub mod hardware;

pub use hardware::{Button, DipConfig, InvadersHardware};

/// Logical screen width in pixels (the display is 224x256, rotated).
pub const SCREEN_WIDTH: usize = 224;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 256;
/// Default integer scaling factor for front-ends.
pub const SCREEN_SCALE: u32 = 3;
