use std::time::Duration;

use anyhow::{bail, Result};

use eighty_core::{Cpu, Hardware, Interrupt, MEMORY_SIZE};

use crate::{SCREEN_HEIGHT, SCREEN_SCALE, SCREEN_WIDTH};

/// Start of the video RAM window.
///
/// The original hardware maps the frame buffer at 0x2400-0x3FFF.
const VRAM_START: usize = 0x2400;
/// Size of video RAM in bytes (0x1C00 = 7168 bytes = 224x256 bits).
const VRAM_SIZE: usize = 0x1C00;

/// 8080 clock and frame timing for Space Invaders.
pub const CPU_CLOCK_HZ: u32 = 2_000_000;
pub const FRAME_RATE_HZ: u32 = 60;
pub const CYCLES_PER_FRAME: u32 = CPU_CLOCK_HZ / FRAME_RATE_HZ;

/// Bit positions for input port 1 (IN 1).
const IN1_BIT_COIN: u8 = 0;
const IN1_BIT_P2_START: u8 = 1;
const IN1_BIT_P1_START: u8 = 2;
const IN1_BIT_ALWAYS_ONE: u8 = 3;
const IN1_BIT_P1_FIRE: u8 = 4;
const IN1_BIT_P1_LEFT: u8 = 5;
const IN1_BIT_P1_RIGHT: u8 = 6;

/// Bit positions for input port 2 (IN 2): DIP switches, tilt, and the
/// player 2 controls.
const IN2_BIT_TILT: u8 = 2;
const IN2_BIT_EXTRA_SHIP: u8 = 3;
const IN2_BIT_P2_FIRE: u8 = 4;
const IN2_BIT_P2_LEFT: u8 = 5;
const IN2_BIT_P2_RIGHT: u8 = 6;
const IN2_BIT_COIN_INFO: u8 = 7;

const IN2_MASK_SHIPS_PER_CREDIT: u8 = 0x03;

/// DIP switch configuration read back on port 2.
///
/// - `ships_per_credit`: number of ships per game (3-6), encoded in bits
///   0-1 as `value - 3`.
/// - `extra_ship_at_1000`: bit 3; when clear the bonus ship comes at
///   1500 points.
/// - `show_coin_info`: the attract-mode coin info line. The ROM treats
///   bit 7 = 1 as "hide coin info".
#[derive(Clone, Copy, Debug)]
pub struct DipConfig {
    pub ships_per_credit: u8,
    pub extra_ship_at_1000: bool,
    pub show_coin_info: bool,
}

impl Default for DipConfig {
    fn default() -> Self {
        Self {
            ships_per_credit: 3,
            extra_ship_at_1000: false,
            show_coin_info: true,
        }
    }
}

impl DipConfig {
    fn apply_to_port2(&self, in_port2: &mut u8) {
        // Clear the DIP bits we control.
        *in_port2 &= !IN2_MASK_SHIPS_PER_CREDIT;
        *in_port2 &= !(1 << IN2_BIT_EXTRA_SHIP);
        *in_port2 &= !(1 << IN2_BIT_COIN_INFO);

        let ships = self.ships_per_credit.clamp(3, 6);
        *in_port2 |= (ships - 3) & IN2_MASK_SHIPS_PER_CREDIT;

        if self.extra_ship_at_1000 {
            *in_port2 |= 1 << IN2_BIT_EXTRA_SHIP;
        }
        if !self.show_coin_info {
            *in_port2 |= 1 << IN2_BIT_COIN_INFO;
        }
    }
}

/// Logical cabinet inputs, mapped onto the port 1 / port 2 bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Button {
    Coin,
    Start1P,
    Start2P,
    P1Left,
    P1Right,
    P1Fire,
    P2Left,
    P2Right,
    P2Fire,
    /// Latched on press; the game clears it by reading.
    Tilt,
}

/// The Space Invaders arcade board.
///
/// Owns the device state on the hardware side of the boundary: input
/// latches, the shift register, the sound-port latches, and the
/// watchdog. The combined ROM image loads at 0x0000.
pub struct InvadersHardware {
    rom: Vec<u8>,
    in_port1: u8,
    in_port2: u8,
    out_port3: u8,
    out_port5: u8,
    shift_register: u16,
    shift_amount: u8,
    watchdog: u8,
    dip: DipConfig,
}

impl InvadersHardware {
    pub fn new(rom: Vec<u8>) -> Self {
        Self::with_dip_config(rom, DipConfig::default())
    }

    pub fn with_dip_config(rom: Vec<u8>, dip: DipConfig) -> Self {
        let mut in_port1 = 0u8;
        in_port1 |= 1 << IN1_BIT_ALWAYS_ONE;

        let mut hardware = Self {
            rom,
            in_port1,
            in_port2: 0,
            out_port3: 0,
            out_port5: 0,
            shift_register: 0,
            shift_amount: 0,
            watchdog: 0,
            dip,
        };
        hardware.dip.apply_to_port2(&mut hardware.in_port2);
        hardware
    }

    /// Press or release a cabinet button.
    pub fn set_button(&mut self, button: Button, pressed: bool) {
        match button {
            Button::Coin => set_input_bit(&mut self.in_port1, IN1_BIT_COIN, pressed),
            Button::Start1P => set_input_bit(&mut self.in_port1, IN1_BIT_P1_START, pressed),
            Button::Start2P => set_input_bit(&mut self.in_port1, IN1_BIT_P2_START, pressed),
            Button::P1Left => set_input_bit(&mut self.in_port1, IN1_BIT_P1_LEFT, pressed),
            Button::P1Right => set_input_bit(&mut self.in_port1, IN1_BIT_P1_RIGHT, pressed),
            Button::P1Fire => set_input_bit(&mut self.in_port1, IN1_BIT_P1_FIRE, pressed),
            Button::P2Left => set_input_bit(&mut self.in_port2, IN2_BIT_P2_LEFT, pressed),
            Button::P2Right => set_input_bit(&mut self.in_port2, IN2_BIT_P2_RIGHT, pressed),
            Button::P2Fire => set_input_bit(&mut self.in_port2, IN2_BIT_P2_FIRE, pressed),
            // Tilt only latches on press; releasing the button does not
            // clear it.
            Button::Tilt if pressed => {
                set_input_bit(&mut self.in_port2, IN2_BIT_TILT, true);
            }
            Button::Tilt => {}
        }
    }

    /// Current values of the sound latches (OUT 3 and OUT 5), for an
    /// external audio layer to edge-detect.
    pub fn outputs(&self) -> (u8, u8) {
        (self.out_port3, self.out_port5)
    }

    /// The video RAM window of the CPU's memory, 0x1C00 bytes starting
    /// at 0x2400. Each byte encodes 8 vertical pixels of the rotated
    /// display.
    pub fn video_ram<'a>(&self, memory: &'a [u8; MEMORY_SIZE]) -> &'a [u8] {
        &memory[VRAM_START..VRAM_START + VRAM_SIZE]
    }
}

impl Hardware for InvadersHardware {
    fn input(&mut self, port: u8) -> Result<u8> {
        match port {
            1 => Ok(self.in_port1),
            2 => Ok(self.in_port2),
            3 => {
                let shift = 8 - (self.shift_amount & 0x07);
                Ok((self.shift_register >> shift) as u8)
            }
            _ => bail!("unsupported hardware port: {port:02X}"),
        }
    }

    fn output(&mut self, port: u8, value: u8) -> Result<()> {
        match port {
            2 => {
                // Shift amount, low 3 bits only.
                self.shift_amount = value & 0x07;
            }
            3 => {
                self.out_port3 = value;
            }
            4 => {
                // New data enters the high byte, pushing the old high
                // byte down.
                self.shift_register = (self.shift_register >> 8) | (u16::from(value) << 8);
            }
            5 => {
                self.out_port5 = value;
            }
            6 => {
                self.watchdog = value;
            }
            _ => bail!("unsupported hardware port: {port:02X}"),
        }
        Ok(())
    }

    fn in_device_name(&self, port: u8) -> String {
        match port {
            1 => "INPUT1".into(),
            2 => "INPUT2".into(),
            3 => "SHFT_IN".into(),
            _ => format!("${port:02X}"),
        }
    }

    fn out_device_name(&self, port: u8) -> String {
        match port {
            2 => "SHFTAMNT".into(),
            3 => "SOUND1".into(),
            4 => "SHFT_DATA".into(),
            5 => "SOUND2".into(),
            6 => "WATCHDOG".into(),
            _ => format!("${port:02X}"),
        }
    }

    fn init(&mut self, _memory: &mut [u8; MEMORY_SIZE]) {
        log::info!(
            "video RAM window at ${VRAM_START:04X}..${:04X}",
            VRAM_START + VRAM_SIZE
        );
    }

    fn interrupts(&self) -> Vec<Interrupt> {
        vec![
            Interrupt {
                cycle: CYCLES_PER_FRAME / 2,
                action: |cpu: &mut Cpu| cpu.request_interrupt(0xCF), // RST 1
                name: "mid-screen",
            },
            Interrupt {
                cycle: CYCLES_PER_FRAME,
                action: |cpu: &mut Cpu| cpu.request_interrupt(0xD7), // RST 2
                name: "vblank",
            },
        ]
    }

    fn cycles_per_frame(&self) -> u32 {
        CYCLES_PER_FRAME
    }

    fn frame_duration(&self) -> Duration {
        // 60 FPS -> 1000ms / 60 = 16.67ms per frame, approximated to 17ms.
        Duration::from_millis(17)
    }

    fn rom(&self) -> &[u8] {
        &self.rom
    }

    fn width(&self) -> u32 {
        SCREEN_WIDTH as u32
    }

    fn height(&self) -> u32 {
        SCREEN_HEIGHT as u32
    }

    fn scale(&self) -> u32 {
        SCREEN_SCALE
    }
}

fn set_input_bit(port: &mut u8, bit: u8, pressed: bool) {
    let mask = 1 << bit;
    if pressed {
        *port |= mask;
    } else {
        *port &= !mask;
    }
}
