//! CP/M diagnostic harness for the eighty 8080 core.
//!
//! A dumbed-down CP/M environment, just enough to execute the classic
//! 8080 diagnostic ROMs: `.COM` images load at 0x0100, BDOS console
//! calls are serviced natively through the pre-fetch system-call hook,
//! and a jump to 0x0000 is the agreed termination signal.

pub mod hardware;

pub use hardware::CpmHardware;
