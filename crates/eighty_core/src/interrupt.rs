use crate::cpu::Cpu;

/// One scheduled interrupt for a frame.
///
/// `cycle` is the number of cycles that should have executed in the
/// current frame before the interrupt fires; `action` runs on the
/// emulator thread and is expected to post an RST opcode into the
/// request slot.
#[derive(Clone, Copy, Debug)]
pub struct Interrupt {
    pub cycle: u32,
    pub action: fn(&mut Cpu),
    pub name: &'static str,
}

impl Cpu {
    /// Post an interrupt request carrying an RST opcode.
    ///
    /// The request slot holds a single opcode. Posting while a request is
    /// already pending is a host scheduling bug; the newer request is
    /// dropped with a warning rather than corrupting the pending one.
    pub fn request_interrupt(&mut self, opcode: u8) {
        if self.pending_interrupt.is_some() {
            log::warn!("interrupt request ${opcode:02X} dropped: a request is already pending");
            return;
        }
        self.pending_interrupt = Some(opcode);
    }

    /// Drain the request slot and, if interrupts are enabled, transfer
    /// control to the service routine. Returns whether a request was
    /// serviced.
    ///
    /// Servicing clears the enable latch (the routine re-enables with EI),
    /// pushes PC, and jumps to the RST target encoded in the opcode.
    /// While the latch is clear, drained requests are dropped.
    pub fn service_pending_interrupt(&mut self) -> bool {
        let Some(opcode) = self.pending_interrupt.take() else {
            return false;
        };
        if !self.interrupts_enabled {
            return false;
        }

        self.interrupts_enabled = false;
        // RST n targets n*8, which is exactly the opcode's bits 3-5.
        let target = u16::from(opcode & 0x38);
        log::debug!("INTE ${:04X}-->${target:04X}", self.pc);
        let return_address = self.pc;
        self.push_word(return_address);
        self.pc = target;
        true
    }
}
