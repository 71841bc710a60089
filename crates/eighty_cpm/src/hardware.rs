use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;

use eighty_core::{Cpu, Hardware, MEMORY_SIZE};

/// Address of the BDOS entry point serviced by the system-call hook.
const BDOS_ENTRY: u16 = 0x0005;
/// `.COM` images load and start here.
const START_ADDRESS: u16 = 0x0100;

/// A minimal CP/M machine.
///
/// Ports are trivial; console output goes through the BDOS hook at
/// 0x0005 (function 2 prints the character in E, function 9 the
/// `$`-terminated string at DE). Output is captured for inspection and
/// optionally echoed to stdout. A jump to 0x0000 marks the program as
/// finished.
pub struct CpmHardware {
    rom: Vec<u8>,
    output: Vec<u8>,
    echo: bool,
    finished: bool,
}

impl CpmHardware {
    pub fn new(rom: Vec<u8>) -> Self {
        Self {
            rom,
            output: Vec::new(),
            echo: false,
            finished: false,
        }
    }

    /// Like [`CpmHardware::new`], but BDOS output is also echoed to
    /// stdout as it is produced.
    pub fn with_echo(rom: Vec<u8>) -> Self {
        Self {
            echo: true,
            ..Self::new(rom)
        }
    }

    /// Whether the program has jumped to 0x0000.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Everything the program has printed through the BDOS so far.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    fn emit(&mut self, bytes: &[u8]) {
        self.output.extend_from_slice(bytes);
        if self.echo {
            let mut stdout = io::stdout();
            let ok = stdout.write_all(bytes).is_ok() && stdout.flush().is_ok();
            if !ok {
                self.echo = false;
            }
        }
    }
}

impl Hardware for CpmHardware {
    fn input(&mut self, _port: u8) -> Result<u8> {
        Ok(0)
    }

    fn output(&mut self, _port: u8, _value: u8) -> Result<()> {
        Ok(())
    }

    fn cycles_per_frame(&self) -> u32 {
        33_334
    }

    fn frame_duration(&self) -> Duration {
        Duration::from_millis(17)
    }

    fn init(&mut self, memory: &mut [u8; MEMORY_SIZE]) {
        // The BDOS hook advances PC past 0x0005; the RET here sends the
        // program back to its caller.
        memory[0x0007] = 0xC9;
    }

    fn handle_system_call(&mut self, cpu: &mut Cpu) {
        if self.finished {
            return;
        }

        if cpu.pc == BDOS_ENTRY {
            match cpu.c {
                0x02 => {
                    // Print the character in E.
                    let ch = cpu.e;
                    self.emit(&[ch]);
                }
                0x09 => {
                    // Print the $-terminated string at DE.
                    let mut addr = cpu.de();
                    let mut bytes = Vec::new();
                    loop {
                        let ch = cpu.memory()[addr as usize];
                        if ch == b'$' {
                            break;
                        }
                        bytes.push(ch);
                        addr = addr.wrapping_add(1);
                    }
                    self.emit(&bytes);
                }
                other => {
                    log::warn!("unhandled BDOS function {other:02X}");
                }
            }
            // Step over the entry point; the RET patched at 0x0007
            // returns to the program.
            cpu.pc += 1;
        } else if cpu.pc == 0x0000 {
            log::info!("program jumped to $0000, terminating");
            self.finished = true;
        }
    }

    fn start_address(&self) -> u16 {
        START_ADDRESS
    }

    fn rom(&self) -> &[u8] {
        &self.rom
    }

    fn width(&self) -> u32 {
        224
    }

    fn height(&self) -> u32 {
        256
    }

    fn scale(&self) -> u32 {
        3
    }
}
