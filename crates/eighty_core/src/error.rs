use thiserror::Error;

/// Fatal emulation errors.
///
/// Nothing an emulated program does can corrupt the core short of executing
/// an encoding the interpreter does not support; host port failures are
/// likewise unrecoverable and surface to the caller of `run_frame`.
#[derive(Debug, Error)]
pub enum EmulatorError {
    #[error("unsupported opcode ${opcode:02X} at ${address:04X} after {total_cycles} cycles")]
    UnsupportedOpcode {
        address: u16,
        opcode: u8,
        total_cycles: u64,
    },

    #[error("IN {device} (port ${port:02X}) failed")]
    InputPort {
        port: u8,
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("OUT {device} (port ${port:02X}) failed")]
    OutputPort {
        port: u8,
        device: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
