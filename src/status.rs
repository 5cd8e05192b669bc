//! CPU Status Register (P register) flags.
//!
//! The 6502 status register is an 8-bit register that reflects the state of
//! the processor after the most recent operation:
//!
//! ```text
//! 7  6  5  4  3  2  1  0
//! N  V  U  B  D  I  Z  C
//! │  │  │  │  │  │  │  └─ Carry
//! │  │  │  │  │  │  └──── Zero
//! │  │  │  │  │  └─────── Interrupt Disable
//! │  │  │  │  └────────── Decimal Mode (settable/clearable; ADC/SBC ignore it)
//! │  │  │  └───────────── Break (1 when pushed from PHP/BRK, 0 from IRQ/NMI)
//! │  │  └──────────────── Unused (always 1 when pushed to the stack)
//! │  └─────────────────── Overflow
//! └────────────────────── Negative
//! ```

use bitflags::bitflags;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

bitflags! {
    /// CPU Status Register flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
    pub struct Status: u8 {
        /// Carry flag.
        const C = 1 << 0;
        /// Zero flag.
        const Z = 1 << 1;
        /// Interrupt Disable flag. When set, IRQ is not serviced; NMI is unaffected.
        const I = 1 << 2;
        /// Decimal Mode flag. ADC/SBC in this core compute in binary regardless.
        const D = 1 << 3;
        /// Break flag. Distinguishes software BRK (1) from hardware IRQ/NMI (0).
        const B = 1 << 4;
        /// Unused flag. Always 1 when pushed to the stack or on interrupt entry.
        const U = 1 << 5;
        /// Overflow flag.
        const V = 1 << 6;
        /// Negative flag. Mirrors bit 7 of the last result.
        const N = 1 << 7;
    }
}

impl Status {
    /// Status value after reset: I set, U set, everything else clear (`0x24`).
    pub const POWER_ON: Self = Self::I.union(Self::U);

    /// Creates a new Status register in the post-reset state.
    #[must_use]
    pub const fn new() -> Self {
        Self::POWER_ON
    }

    /// Sets Zero from `value == 0` and Negative from bit 7 of `value`.
    #[inline]
    pub fn set_zn(&mut self, value: u8) {
        self.set_flag(Self::Z, value == 0);
        self.set_flag(Self::N, value & 0x80 != 0);
    }

    /// Sets or clears a single flag.
    #[inline]
    pub fn set_flag(&mut self, flag: Self, value: bool) {
        if value {
            *self |= flag;
        } else {
            *self &= !flag;
        }
    }

    /// Byte to push to the stack for PHP/BRK (`brk = true`) or a hardware
    /// interrupt (`brk = false`). U is always forced to 1; B follows `brk`.
    #[inline]
    #[must_use]
    pub const fn to_stack_byte(self, brk: bool) -> u8 {
        let mut value = self.bits() | Self::U.bits();
        if brk {
            value |= Self::B.bits();
        } else {
            value &= !Self::B.bits();
        }
        value
    }

    /// Status restored from a byte popped off the stack (PLP/RTI). B is
    /// dropped, U is forced to 1 — the pushed B/U bits are not real flip-flops.
    #[inline]
    #[must_use]
    pub fn from_stack_byte(value: u8) -> Self {
        Self::from_bits_truncate((value & !Self::B.bits()) | Self::U.bits())
    }
}
