use std::time::Duration;

use anyhow::Result;

use crate::cpu::{Cpu, MEMORY_SIZE};
use crate::interrupt::Interrupt;

/// Hardware boundary between the CPU core and a concrete machine.
///
/// This is the only seam to the outside world: port-mapped IO, the
/// interrupt schedule, the per-frame cycle budget, ROM provisioning, and
/// the pre-fetch system-call hook all cross it. A host that only needs a
/// unit-test stub can lean on the defaults and implement the handful of
/// required methods as no-ops (see [`NullHardware`]).
pub trait Hardware {
    /// Read a byte from a device port. Errors are fatal.
    fn input(&mut self, port: u8) -> Result<u8>;

    /// Write a byte to a device port. Errors are fatal.
    fn output(&mut self, port: u8, value: u8) -> Result<()>;

    /// Human-readable name of an input port, for tracing.
    fn in_device_name(&self, port: u8) -> String {
        format!("${port:02X}")
    }

    /// Human-readable name of an output port, for tracing.
    fn out_device_name(&self, port: u8) -> String {
        format!("${port:02X}")
    }

    /// Interrupts to deliver each frame, ordered by cycle offset.
    fn interrupts(&self) -> Vec<Interrupt> {
        Vec::new()
    }

    /// Cycle budget for one call to `run_frame`.
    fn cycles_per_frame(&self) -> u32;

    /// Wall-clock target for one frame, used for pacing.
    fn frame_duration(&self) -> Duration;

    /// One-time setup before execution starts. This is the only point at
    /// which a host may touch memory directly, e.g. to patch ROM-call
    /// stubs or record the location of a video RAM window.
    fn init(&mut self, _memory: &mut [u8; MEMORY_SIZE]) {}

    /// Invoked before every instruction fetch. Hosts that service ROM
    /// calls in native code (e.g. a CP/M BDOS) inspect PC and registers
    /// here and may mutate them.
    fn handle_system_call(&mut self, _cpu: &mut Cpu) {}

    /// Where the ROM is loaded and where execution starts.
    fn start_address(&self) -> u16 {
        0x0000
    }

    /// The ROM image to copy into memory at `start_address`.
    fn rom(&self) -> &[u8];

    /// Present the current video state into an RGB24 frame buffer. The
    /// conversion itself belongs to the front-end; the default does
    /// nothing.
    fn draw(&mut self, _memory: &[u8; MEMORY_SIZE], _frame: &mut [u8]) {}

    /// Display geometry in logical pixels.
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn scale(&self) -> u32;
}

/// A hardware stub whose every operation is a no-op.
///
/// Used by the unit tests to drive the CPU without a machine attached.
#[derive(Default)]
pub struct NullHardware;

impl Hardware for NullHardware {
    fn input(&mut self, _port: u8) -> Result<u8> {
        Ok(0)
    }

    fn output(&mut self, _port: u8, _value: u8) -> Result<()> {
        Ok(())
    }

    fn cycles_per_frame(&self) -> u32 {
        0
    }

    fn frame_duration(&self) -> Duration {
        Duration::ZERO
    }

    fn rom(&self) -> &[u8] {
        &[]
    }

    fn width(&self) -> u32 {
        0
    }

    fn height(&self) -> u32 {
        0
    }

    fn scale(&self) -> u32 {
        1
    }
}
