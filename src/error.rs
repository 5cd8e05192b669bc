//! Error and outcome types for a single [`crate::cpu::Cpu::step`].

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors a single instruction step can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CpuError {
    /// The decoder fetched a byte with no entry in the opcode table.
    #[error("illegal opcode 0x{opcode:02X} at 0x{pc:04X}")]
    IllegalInstruction {
        /// The opcode byte that failed to decode.
        opcode: u8,
        /// Address the opcode byte was fetched from.
        pc: u16,
    },
}

/// What a successful [`crate::cpu::Cpu::step`] billed the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StepOutcome {
    /// Total cycles consumed by this step, including any interrupt service,
    /// branch-taken, or page-cross penalty.
    pub cycles: u32,
}

/// Result type for a single CPU step.
pub type StepResult = Result<StepOutcome, CpuError>;
