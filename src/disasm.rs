//! Textual disassembly of a single instruction at an arbitrary address.
//!
//! Reads through the [`Bus`] like a real fetch, so it observes the same
//! side effects `Cpu::step` would (see the module-level note in
//! [`crate::bus`] about memory-mapped reads). Callers that must not disturb
//! device state should not disassemble at live I/O addresses.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::opcodes;

/// Disassembles the instruction at `pc`, returning its text and length in
/// bytes. Returns `(String::new(), 0)` for an opcode byte with no table
/// entry.
#[must_use]
pub fn disassemble(bus: &mut impl Bus, pc: u16) -> (String, u16) {
    let opcode = bus.read(pc);
    let Some(entry) = opcodes::lookup(opcode) else {
        return (String::new(), 0);
    };
    let mnemonic = entry.mnemonic.as_str();
    let operand_pc = pc.wrapping_add(1);

    match entry.mode {
        AddrMode::Impl => (mnemonic.to_string(), 1),
        AddrMode::Acc => (format!("{mnemonic}  A"), 1),
        AddrMode::Imm => {
            let value = bus.read(operand_pc);
            (format!("{mnemonic}  #${value:02X}"), 2)
        }
        AddrMode::Zp => {
            let addr = bus.read(operand_pc);
            (format!("{mnemonic}  ${addr:02X}"), 2)
        }
        AddrMode::ZpX => {
            let addr = bus.read(operand_pc);
            (format!("{mnemonic}  ${addr:02X},X"), 2)
        }
        AddrMode::ZpY => {
            let addr = bus.read(operand_pc);
            (format!("{mnemonic}  ${addr:02X},Y"), 2)
        }
        AddrMode::Rel => {
            let offset = bus.read(operand_pc) as i8;
            let next_pc = operand_pc.wrapping_add(1);
            let target = next_pc.wrapping_add(offset as u16);
            (format!("{mnemonic}  {offset} ; (${target:04X})"), 2)
        }
        AddrMode::Abs => {
            let addr = bus.read_u16(operand_pc);
            (format!("{mnemonic}  ${addr:04X}"), 3)
        }
        AddrMode::AbsX => {
            let addr = bus.read_u16(operand_pc);
            (format!("{mnemonic}  ${addr:04X},X"), 3)
        }
        AddrMode::AbsY => {
            let addr = bus.read_u16(operand_pc);
            (format!("{mnemonic}  ${addr:04X},Y"), 3)
        }
        AddrMode::Ind => {
            let addr = bus.read_u16(operand_pc);
            (format!("{mnemonic}  (${addr:04X})"), 3)
        }
        AddrMode::XInd => {
            let zp = bus.read(operand_pc);
            (format!("{mnemonic}  (${zp:02X},X)"), 2)
        }
        AddrMode::IndY => {
            let zp = bus.read(operand_pc);
            (format!("{mnemonic}  (${zp:02X}),Y"), 2)
        }
    }
}
