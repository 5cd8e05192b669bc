//! The opcode table: every legal 6502 opcode byte mapped to its mnemonic,
//! addressing mode, and base cycle cost, plus the one nonstandard host-call
//! opcode this core adds.
//!
//! Undocumented/illegal opcodes are out of scope: every byte not named here
//! decodes as invalid and causes [`crate::error::CpuError::IllegalInstruction`].

use crate::addressing::AddrMode;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Instruction mnemonic. One variant per distinct operation, independent of
/// how many opcode bytes/addressing modes implement it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[allow(missing_docs)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror,
    Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
    /// Nonstandard host-call opcode (`0x80`): invokes the embedder's
    /// [`crate::vmcall::HostCall`] with an 8-bit argument.
    Vmcall,
}

impl Mnemonic {
    /// Three-letter (or six for `VMCALL`) mnemonic text, as used by the disassembler.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Adc => "ADC", Self::And => "AND", Self::Asl => "ASL",
            Self::Bcc => "BCC", Self::Bcs => "BCS", Self::Beq => "BEQ",
            Self::Bit => "BIT", Self::Bmi => "BMI", Self::Bne => "BNE",
            Self::Bpl => "BPL", Self::Brk => "BRK", Self::Bvc => "BVC",
            Self::Bvs => "BVS", Self::Clc => "CLC", Self::Cld => "CLD",
            Self::Cli => "CLI", Self::Clv => "CLV", Self::Cmp => "CMP",
            Self::Cpx => "CPX", Self::Cpy => "CPY", Self::Dec => "DEC",
            Self::Dex => "DEX", Self::Dey => "DEY", Self::Eor => "EOR",
            Self::Inc => "INC", Self::Inx => "INX", Self::Iny => "INY",
            Self::Jmp => "JMP", Self::Jsr => "JSR", Self::Lda => "LDA",
            Self::Ldx => "LDX", Self::Ldy => "LDY", Self::Lsr => "LSR",
            Self::Nop => "NOP", Self::Ora => "ORA", Self::Pha => "PHA",
            Self::Php => "PHP", Self::Pla => "PLA", Self::Plp => "PLP",
            Self::Rol => "ROL", Self::Ror => "ROR", Self::Rti => "RTI",
            Self::Rts => "RTS", Self::Sbc => "SBC", Self::Sec => "SEC",
            Self::Sed => "SED", Self::Sei => "SEI", Self::Sta => "STA",
            Self::Stx => "STX", Self::Sty => "STY", Self::Tax => "TAX",
            Self::Tay => "TAY", Self::Tsx => "TSX", Self::Txa => "TXA",
            Self::Txs => "TXS", Self::Tya => "TYA", Self::Vmcall => "VMCALL",
        }
    }
}

/// A single opcode table entry: the decoded shape of one opcode byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OpcodeEntry {
    /// The instruction this opcode byte performs.
    pub mnemonic: Mnemonic,
    /// The addressing mode this opcode byte uses.
    pub mode: AddrMode,
    /// Base cycle count, before any page-cross or branch-taken penalty.
    pub base_cycles: u8,
}

/// Looks up the opcode table entry for `opcode`, or `None` if the byte names
/// no legal instruction in this core.
#[must_use]
pub fn lookup(opcode: u8) -> Option<OpcodeEntry> {
    OPCODES[opcode as usize].map(|(mnemonic, mode)| OpcodeEntry {
        mnemonic,
        mode,
        base_cycles: BASE_CYCLES[opcode as usize],
    })
}

#[rustfmt::skip]
static OPCODES: [Option<(Mnemonic, AddrMode)>; 256] = [
    Some((Mnemonic::Brk, AddrMode::Impl)), Some((Mnemonic::Ora, AddrMode::XInd)), None, None, None, Some((Mnemonic::Ora, AddrMode::Zp)), Some((Mnemonic::Asl, AddrMode::Zp)), None,
    Some((Mnemonic::Php, AddrMode::Impl)), Some((Mnemonic::Ora, AddrMode::Imm)), Some((Mnemonic::Asl, AddrMode::Acc)), None, None, Some((Mnemonic::Ora, AddrMode::Abs)), Some((Mnemonic::Asl, AddrMode::Abs)), None,
    Some((Mnemonic::Bpl, AddrMode::Rel)), Some((Mnemonic::Ora, AddrMode::IndY)), None, None, None, Some((Mnemonic::Ora, AddrMode::ZpX)), Some((Mnemonic::Asl, AddrMode::ZpX)), None,
    Some((Mnemonic::Clc, AddrMode::Impl)), Some((Mnemonic::Ora, AddrMode::AbsY)), None, None, None, Some((Mnemonic::Ora, AddrMode::AbsX)), Some((Mnemonic::Asl, AddrMode::AbsX)), None,
    Some((Mnemonic::Jsr, AddrMode::Abs)), Some((Mnemonic::And, AddrMode::XInd)), None, None, Some((Mnemonic::Bit, AddrMode::Zp)), Some((Mnemonic::And, AddrMode::Zp)), Some((Mnemonic::Rol, AddrMode::Zp)), None,
    Some((Mnemonic::Plp, AddrMode::Impl)), Some((Mnemonic::And, AddrMode::Imm)), Some((Mnemonic::Rol, AddrMode::Acc)), None, Some((Mnemonic::Bit, AddrMode::Abs)), Some((Mnemonic::And, AddrMode::Abs)), Some((Mnemonic::Rol, AddrMode::Abs)), None,
    Some((Mnemonic::Bmi, AddrMode::Rel)), Some((Mnemonic::And, AddrMode::IndY)), None, None, None, Some((Mnemonic::And, AddrMode::ZpX)), Some((Mnemonic::Rol, AddrMode::ZpX)), None,
    Some((Mnemonic::Sec, AddrMode::Impl)), Some((Mnemonic::And, AddrMode::AbsY)), None, None, None, Some((Mnemonic::And, AddrMode::AbsX)), Some((Mnemonic::Rol, AddrMode::AbsX)), None,
    Some((Mnemonic::Rti, AddrMode::Impl)), Some((Mnemonic::Eor, AddrMode::XInd)), None, None, None, Some((Mnemonic::Eor, AddrMode::Zp)), Some((Mnemonic::Lsr, AddrMode::Zp)), None,
    Some((Mnemonic::Pha, AddrMode::Impl)), Some((Mnemonic::Eor, AddrMode::Imm)), Some((Mnemonic::Lsr, AddrMode::Acc)), None, Some((Mnemonic::Jmp, AddrMode::Abs)), Some((Mnemonic::Eor, AddrMode::Abs)), Some((Mnemonic::Lsr, AddrMode::Abs)), None,
    Some((Mnemonic::Bvc, AddrMode::Rel)), Some((Mnemonic::Eor, AddrMode::IndY)), None, None, None, Some((Mnemonic::Eor, AddrMode::ZpX)), Some((Mnemonic::Lsr, AddrMode::ZpX)), None,
    Some((Mnemonic::Cli, AddrMode::Impl)), Some((Mnemonic::Eor, AddrMode::AbsY)), None, None, None, Some((Mnemonic::Eor, AddrMode::AbsX)), Some((Mnemonic::Lsr, AddrMode::AbsX)), None,
    Some((Mnemonic::Rts, AddrMode::Impl)), Some((Mnemonic::Adc, AddrMode::XInd)), None, None, None, Some((Mnemonic::Adc, AddrMode::Zp)), Some((Mnemonic::Ror, AddrMode::Zp)), None,
    Some((Mnemonic::Pla, AddrMode::Impl)), Some((Mnemonic::Adc, AddrMode::Imm)), Some((Mnemonic::Ror, AddrMode::Acc)), None, Some((Mnemonic::Jmp, AddrMode::Ind)), Some((Mnemonic::Adc, AddrMode::Abs)), Some((Mnemonic::Ror, AddrMode::Abs)), None,
    Some((Mnemonic::Bvs, AddrMode::Rel)), Some((Mnemonic::Adc, AddrMode::IndY)), None, None, None, Some((Mnemonic::Adc, AddrMode::ZpX)), Some((Mnemonic::Ror, AddrMode::ZpX)), None,
    Some((Mnemonic::Sei, AddrMode::Impl)), Some((Mnemonic::Adc, AddrMode::AbsY)), None, None, None, Some((Mnemonic::Adc, AddrMode::AbsX)), Some((Mnemonic::Ror, AddrMode::AbsX)), None,
    Some((Mnemonic::Vmcall, AddrMode::Imm)), Some((Mnemonic::Sta, AddrMode::XInd)), None, None, Some((Mnemonic::Sty, AddrMode::Zp)), Some((Mnemonic::Sta, AddrMode::Zp)), Some((Mnemonic::Stx, AddrMode::Zp)), None,
    Some((Mnemonic::Dey, AddrMode::Impl)), None, Some((Mnemonic::Txa, AddrMode::Impl)), None, Some((Mnemonic::Sty, AddrMode::Abs)), Some((Mnemonic::Sta, AddrMode::Abs)), Some((Mnemonic::Stx, AddrMode::Abs)), None,
    Some((Mnemonic::Bcc, AddrMode::Rel)), Some((Mnemonic::Sta, AddrMode::IndY)), None, None, Some((Mnemonic::Sty, AddrMode::ZpX)), Some((Mnemonic::Sta, AddrMode::ZpX)), Some((Mnemonic::Stx, AddrMode::ZpY)), None,
    Some((Mnemonic::Tya, AddrMode::Impl)), Some((Mnemonic::Sta, AddrMode::AbsY)), Some((Mnemonic::Txs, AddrMode::Impl)), None, None, Some((Mnemonic::Sta, AddrMode::AbsX)), None, None,
    Some((Mnemonic::Ldy, AddrMode::Imm)), Some((Mnemonic::Lda, AddrMode::XInd)), Some((Mnemonic::Ldx, AddrMode::Imm)), None, Some((Mnemonic::Ldy, AddrMode::Zp)), Some((Mnemonic::Lda, AddrMode::Zp)), Some((Mnemonic::Ldx, AddrMode::Zp)), None,
    Some((Mnemonic::Tay, AddrMode::Impl)), Some((Mnemonic::Lda, AddrMode::Imm)), Some((Mnemonic::Tax, AddrMode::Impl)), None, Some((Mnemonic::Ldy, AddrMode::Abs)), Some((Mnemonic::Lda, AddrMode::Abs)), Some((Mnemonic::Ldx, AddrMode::Abs)), None,
    Some((Mnemonic::Bcs, AddrMode::Rel)), Some((Mnemonic::Lda, AddrMode::IndY)), None, None, Some((Mnemonic::Ldy, AddrMode::ZpX)), Some((Mnemonic::Lda, AddrMode::ZpX)), Some((Mnemonic::Ldx, AddrMode::ZpY)), None,
    Some((Mnemonic::Clv, AddrMode::Impl)), Some((Mnemonic::Lda, AddrMode::AbsY)), Some((Mnemonic::Tsx, AddrMode::Impl)), None, Some((Mnemonic::Ldy, AddrMode::AbsX)), Some((Mnemonic::Lda, AddrMode::AbsX)), Some((Mnemonic::Ldx, AddrMode::AbsY)), None,
    Some((Mnemonic::Cpy, AddrMode::Imm)), Some((Mnemonic::Cmp, AddrMode::XInd)), None, None, Some((Mnemonic::Cpy, AddrMode::Zp)), Some((Mnemonic::Cmp, AddrMode::Zp)), Some((Mnemonic::Dec, AddrMode::Zp)), None,
    Some((Mnemonic::Iny, AddrMode::Impl)), Some((Mnemonic::Cmp, AddrMode::Imm)), Some((Mnemonic::Dex, AddrMode::Impl)), None, Some((Mnemonic::Cpy, AddrMode::Abs)), Some((Mnemonic::Cmp, AddrMode::Abs)), Some((Mnemonic::Dec, AddrMode::Abs)), None,
    Some((Mnemonic::Bne, AddrMode::Rel)), Some((Mnemonic::Cmp, AddrMode::IndY)), None, None, None, Some((Mnemonic::Cmp, AddrMode::ZpX)), Some((Mnemonic::Dec, AddrMode::ZpX)), None,
    Some((Mnemonic::Cld, AddrMode::Impl)), Some((Mnemonic::Cmp, AddrMode::AbsY)), None, None, None, Some((Mnemonic::Cmp, AddrMode::AbsX)), Some((Mnemonic::Dec, AddrMode::AbsX)), None,
    Some((Mnemonic::Cpx, AddrMode::Imm)), Some((Mnemonic::Sbc, AddrMode::XInd)), None, None, Some((Mnemonic::Cpx, AddrMode::Zp)), Some((Mnemonic::Sbc, AddrMode::Zp)), Some((Mnemonic::Inc, AddrMode::Zp)), None,
    Some((Mnemonic::Inx, AddrMode::Impl)), Some((Mnemonic::Sbc, AddrMode::Imm)), Some((Mnemonic::Nop, AddrMode::Impl)), None, Some((Mnemonic::Cpx, AddrMode::Abs)), Some((Mnemonic::Sbc, AddrMode::Abs)), Some((Mnemonic::Inc, AddrMode::Abs)), None,
    Some((Mnemonic::Beq, AddrMode::Rel)), Some((Mnemonic::Sbc, AddrMode::IndY)), None, None, None, Some((Mnemonic::Sbc, AddrMode::ZpX)), Some((Mnemonic::Inc, AddrMode::ZpX)), None,
    Some((Mnemonic::Sed, AddrMode::Impl)), Some((Mnemonic::Sbc, AddrMode::AbsY)), None, None, None, Some((Mnemonic::Sbc, AddrMode::AbsX)), Some((Mnemonic::Inc, AddrMode::AbsX)), None,
];

#[rustfmt::skip]
static BASE_CYCLES: [u8; 256] = [
    7, 6, 2, 8, 3, 3, 5, 5, 3, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 4, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 3, 2, 2, 2, 3, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 8, 3, 3, 5, 5, 4, 2, 2, 2, 5, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    6, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 6, 2, 6, 4, 4, 4, 4, 2, 5, 2, 5, 5, 5, 5, 5,
    2, 6, 2, 6, 3, 3, 3, 3, 2, 2, 2, 2, 4, 4, 4, 4,
    2, 5, 2, 5, 4, 4, 4, 4, 2, 4, 2, 4, 4, 4, 4, 4,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
    2, 6, 2, 8, 3, 3, 5, 5, 2, 2, 2, 2, 4, 4, 6, 6,
    2, 5, 2, 8, 4, 4, 6, 6, 2, 4, 2, 7, 4, 4, 7, 7,
];
