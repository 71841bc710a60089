use eighty_core::{Emulator, EmulatorOptions};
use eighty_cpm::CpmHardware;

fn main() {
    env_logger::init();

    let rom_path = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: cpm_run <program.com>");
        std::process::exit(2);
    });

    let rom = std::fs::read(&rom_path).unwrap_or_else(|err| {
        eprintln!("Failed to read ROM '{rom_path}': {err}");
        std::process::exit(1);
    });

    let mut emulator = Emulator::with_options(
        CpmHardware::with_echo(rom),
        EmulatorOptions {
            unlimited_speed: true,
        },
    );

    while !emulator.hardware.finished() {
        if let Err(err) = emulator.run_frame() {
            eprintln!("emulation stopped: {err}");
            std::process::exit(1);
        }
    }
    println!();
}
