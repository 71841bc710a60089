//! The frame driver: owns the CPU and the host, runs the fetch loop.

use std::thread;
use std::time::Instant;

use crate::cpu::{Cpu, MEMORY_SIZE};
use crate::error::EmulatorError;
use crate::hardware::Hardware;

/// Tunable execution settings.
#[derive(Default, Clone, Copy, Debug)]
pub struct EmulatorOptions {
    /// Skip wall-clock pacing at frame boundaries. Diagnostic harnesses
    /// set this; the arcade host leaves it off to run at 60 Hz.
    pub unlimited_speed: bool,
}

/// An 8080 CPU wired to a concrete machine.
///
/// Construction zeroes memory, copies the host's ROM to its start
/// address, points PC at it, and gives the host its one-time `init` pass
/// over memory. After that the host only sees memory through the CPU.
pub struct Emulator<H: Hardware> {
    pub cpu: Cpu,
    pub hardware: H,
    pub options: EmulatorOptions,
    /// First address past the loaded ROM image; execution stops
    /// gracefully when PC runs beyond it.
    program_end: u32,
}

impl<H: Hardware> Emulator<H> {
    pub fn new(hardware: H) -> Self {
        Self::with_options(hardware, EmulatorOptions::default())
    }

    pub fn with_options(mut hardware: H, options: EmulatorOptions) -> Self {
        let mut cpu = Cpu::new();

        let start = hardware.start_address() as usize;
        let rom = hardware.rom();
        let len = rom.len().min(MEMORY_SIZE - start);
        cpu.memory[start..start + len].copy_from_slice(&rom[..len]);
        cpu.pc = start as u16;
        let program_end = (start + len) as u32;

        hardware.init(&mut cpu.memory);

        log::info!(
            "loaded {len} ROM bytes at ${start:04X}, execution starts at ${:04X}",
            cpu.pc
        );

        Self {
            cpu,
            hardware,
            options,
            program_end,
        }
    }

    /// Run one frame's worth of instructions.
    ///
    /// Instructions execute until the host's cycle budget is spent.
    /// Between instructions, scheduled interrupts whose cycle offset has
    /// passed are posted (in order) and a pending request is serviced;
    /// the host's system-call hook runs before every fetch. Entries
    /// scheduled at the frame boundary post at frame end and are serviced
    /// at the top of the next frame. Unless `unlimited_speed` is set, the
    /// call then sleeps out the remainder of the host's frame duration.
    pub fn run_frame(&mut self) -> Result<(), EmulatorError> {
        let frame_start = Instant::now();
        self.cpu.begin_frame();

        let schedule = self.hardware.interrupts();
        let budget = self.hardware.cycles_per_frame();
        let mut next_interrupt = 0;

        while self.cpu.frame_cycles() < budget {
            while next_interrupt < schedule.len()
                && self.cpu.frame_cycles() >= schedule[next_interrupt].cycle
            {
                log::debug!("interrupt {:?} fires", schedule[next_interrupt].name);
                (schedule[next_interrupt].action)(&mut self.cpu);
                next_interrupt += 1;
            }

            if self.cpu.service_pending_interrupt() {
                continue;
            }

            if u32::from(self.cpu.pc) >= self.program_end {
                // Ran past the loaded image; nothing left to execute.
                break;
            }

            self.hardware.handle_system_call(&mut self.cpu);
            self.cpu.step(&mut self.hardware)?;
        }

        for entry in &schedule[next_interrupt..] {
            log::debug!("interrupt {:?} fires at frame end", entry.name);
            (entry.action)(&mut self.cpu);
        }

        if !self.options.unlimited_speed {
            if let Some(remaining) = self.hardware.frame_duration().checked_sub(frame_start.elapsed())
            {
                thread::sleep(remaining);
            }
        }

        Ok(())
    }

    /// Hand the current memory state to the host for presentation.
    pub fn draw(&mut self, frame: &mut [u8]) {
        self.hardware.draw(&self.cpu.memory, frame);
    }
}
