//! Addressing modes and their operand-size/base-cycle shape.
//!
//! The decoder reads one of these from the opcode table for every instruction
//! byte and uses it to know how many operand bytes follow and how to form the
//! effective address. Actual address computation lives in [`crate::cpu::Cpu::decode`]
//! since it needs live register state and bus access; this module only carries
//! the static shape of each mode.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the 6502's addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AddrMode {
    /// Implied — no operand, the opcode itself names everything needed.
    Impl,
    /// Accumulator — operand is the `A` register.
    Acc,
    /// Immediate — operand is the byte following the opcode.
    Imm,
    /// Zero page — one-byte operand is an address in page 0.
    Zp,
    /// Zero page, X-indexed — one-byte operand plus `X`, wrapping within page 0.
    ZpX,
    /// Zero page, Y-indexed — one-byte operand plus `Y`, wrapping within page 0.
    ZpY,
    /// Relative — one-byte signed displacement from the address after the branch.
    Rel,
    /// Absolute — two-byte little-endian operand is the effective address.
    Abs,
    /// Absolute, X-indexed — two-byte operand plus `X`.
    AbsX,
    /// Absolute, Y-indexed — two-byte operand plus `Y`.
    AbsY,
    /// Indirect — two-byte operand is the address of a pointer (JMP only).
    Ind,
    /// X-indexed indirect — one-byte operand plus `X` indexes a zero-page pointer table.
    XInd,
    /// Indirect, Y-indexed — one-byte operand is a zero-page pointer, then add `Y`.
    IndY,
}

impl AddrMode {
    /// Number of operand bytes that follow the opcode byte for this mode.
    #[must_use]
    pub const fn operand_size(self) -> u8 {
        match self {
            Self::Impl | Self::Acc => 0,
            Self::Imm | Self::Zp | Self::ZpX | Self::ZpY | Self::Rel | Self::XInd | Self::IndY => {
                1
            }
            Self::Abs | Self::AbsX | Self::AbsY | Self::Ind => 2,
        }
    }

    /// Whether this mode can incur a one-cycle page-cross penalty.
    #[must_use]
    pub const fn has_page_cross_penalty(self) -> bool {
        matches!(self, Self::AbsX | Self::AbsY | Self::IndY | Self::Rel)
    }
}
