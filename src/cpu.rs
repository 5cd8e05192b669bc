//! CPU state, the fetch/decode/execute step driver, and interrupt servicing.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::error::{CpuError, StepOutcome, StepResult};
use crate::instructions;
use crate::opcodes::{self, Mnemonic};
use crate::status::Status;
use crate::vmcall::HostCall;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Interrupt and reset vector addresses.
pub mod vectors {
    /// Non-maskable interrupt vector.
    pub const NMI: u16 = 0xFFFA;
    /// Reset vector.
    pub const RESET: u16 = 0xFFFC;
    /// IRQ/BRK vector.
    pub const IRQ: u16 = 0xFFFE;
}

const STACK_BASE: u16 = 0x0100;

/// Consumes the cycles a step bills, for callers that need to keep a system
/// clock (PPU/APU dot counters, a wall-clock throttle, ...) in lockstep with
/// the CPU. Most single-step callers can ignore this and read
/// [`StepOutcome::cycles`] instead; [`run_step`] is the convenience entry
/// point for callers that do want one driven automatically.
pub trait Timekeeper {
    /// Advances the system clock by `cycles` CPU cycles.
    fn advance(&mut self, cycles: u32);
}

/// A decoded instruction: the output of [`Cpu::decode`], consumed by
/// [`crate::instructions::execute`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Decoded {
    pub mnemonic: Mnemonic,
    pub mode: AddrMode,
    /// Effective address for memory-referencing modes; `None` for
    /// `Impl`/`Acc`/`Imm`.
    pub addr: Option<u16>,
    /// The fetched operand byte for `Imm` mode only.
    pub imm: Option<u8>,
    /// Set when indexed addressing crossed a page boundary (extra cycle) or,
    /// for `Rel`, when the branch target is on a different page than the
    /// branch instruction itself.
    pub page_cross: bool,
    pub opcode: u8,
    pub pc: u16,
    pub base_cycles: u8,
}

/// MOS 6502 CPU core: registers, status, and the step driver.
///
/// Holds no reference to memory — every read/write goes through the [`Bus`]
/// passed into [`Cpu::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Cpu {
    /// Accumulator.
    pub a: u8,
    /// X index register.
    pub x: u8,
    /// Y index register.
    pub y: u8,
    /// Stack pointer (offset into page 1, `$0100`–`$01FF`).
    pub sp: u8,
    /// Program counter.
    pub pc: u16,
    /// Processor status register.
    pub status: Status,
    nmi_pending: bool,
    irq_pending: bool,
    total_cycles: u64,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// Creates a CPU with power-on register values. Call [`Cpu::reset`]
    /// before stepping to load `PC` from the reset vector.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0xFD,
            pc: 0,
            status: Status::POWER_ON,
            nmi_pending: false,
            irq_pending: false,
            total_cycles: 0,
        }
    }

    /// Total cycles billed across this CPU's lifetime.
    #[must_use]
    pub const fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    /// Resets the CPU: `SP -= 3` is not modeled (power-on `SP` is used
    /// directly, matching a cold boot), `I` is set, and `PC` is loaded from
    /// the reset vector.
    pub fn reset(&mut self, bus: &mut impl Bus) {
        self.sp = 0xFD;
        self.status = Status::POWER_ON;
        self.pc = bus.read_u16(vectors::RESET);
        self.nmi_pending = false;
        self.irq_pending = false;
        log::debug!("reset: pc=0x{:04X}", self.pc);
    }

    /// Latches a non-maskable interrupt request. Edge-triggered: the request
    /// is serviced at most once, on the next step, regardless of how the
    /// line behaves afterward.
    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    /// Sets the level of the maskable interrupt line. While `true`, IRQ is
    /// serviced on every step for which `I` is clear, matching level-
    /// triggered hardware behavior (the embedder is expected to call this
    /// once per edge of the real IRQ line, not to need to call it every
    /// step).
    pub fn set_irq_line(&mut self, asserted: bool) {
        self.irq_pending = asserted;
    }

    /// Pushes a byte onto the stack.
    pub(crate) fn push(&mut self, bus: &mut impl Bus, value: u8) {
        bus.write(STACK_BASE + u16::from(self.sp), value);
        self.sp = self.sp.wrapping_sub(1);
    }

    /// Pulls a byte from the stack.
    pub(crate) fn pull(&mut self, bus: &mut impl Bus) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        bus.read(STACK_BASE + u16::from(self.sp))
    }

    pub(crate) fn push_u16(&mut self, bus: &mut impl Bus, value: u16) {
        self.push(bus, (value >> 8) as u8);
        self.push(bus, (value & 0xFF) as u8);
    }

    pub(crate) fn pull_u16(&mut self, bus: &mut impl Bus) -> u16 {
        let lo = u16::from(self.pull(bus));
        let hi = u16::from(self.pull(bus));
        (hi << 8) | lo
    }

    /// Services any pending interrupts at the start of a Step. NMI has
    /// priority over IRQ: NMI is serviced first (unconditionally, if
    /// pending), then IRQ is serviced in the same Step if it is still
    /// deliverable (it never is, immediately after an NMI, since NMI entry
    /// sets `I`). Returns the combined cycles billed for whatever was
    /// serviced; 0 if nothing was pending.
    ///
    /// This does not end the Step: the normal fetch-decode-execute always
    /// follows, from whatever `PC` interrupt service left behind, with the
    /// interrupt cost added to that instruction's cost (spec.md §4.4/§4.5).
    fn service_interrupts(&mut self, bus: &mut impl Bus) -> u32 {
        let mut cycles = 0u32;
        if self.nmi_pending {
            self.nmi_pending = false;
            log::trace!("servicing NMI at pc=0x{:04X}", self.pc);
            let pc = self.pc;
            let status_byte = self.status.to_stack_byte(false);
            self.push_u16(bus, pc);
            self.push(bus, status_byte);
            self.status.set_flag(Status::I, true);
            self.pc = bus.read_u16(vectors::NMI);
            cycles += 8;
        }
        if self.irq_pending && !self.status.contains(Status::I) {
            self.irq_pending = false;
            log::trace!("servicing IRQ at pc=0x{:04X}", self.pc);
            let pc = self.pc;
            let status_byte = self.status.to_stack_byte(false);
            self.push_u16(bus, pc);
            self.push(bus, status_byte);
            self.status.set_flag(Status::I, true);
            self.pc = bus.read_u16(vectors::IRQ);
            cycles += 7;
        }
        cycles
    }

    /// Decodes the instruction at `self.pc`, without mutating any register
    /// other than advancing `self.pc` past the instruction's bytes.
    pub(crate) fn decode(&mut self, bus: &mut impl Bus) -> Result<Decoded, CpuError> {
        let start_pc = self.pc;
        let opcode = bus.read(start_pc);
        let entry = opcodes::lookup(opcode).ok_or(CpuError::IllegalInstruction {
            opcode,
            pc: start_pc,
        })?;

        let operand_pc = start_pc.wrapping_add(1);
        let (addr, imm, page_cross) = match entry.mode {
            AddrMode::Impl | AddrMode::Acc => (None, None, false),
            AddrMode::Imm => {
                let value = bus.read(operand_pc);
                (None, Some(value), false)
            }
            AddrMode::Zp => {
                let zp = bus.read(operand_pc);
                (Some(u16::from(zp)), None, false)
            }
            AddrMode::ZpX => {
                let zp = bus.read(operand_pc).wrapping_add(self.x);
                (Some(u16::from(zp)), None, false)
            }
            AddrMode::ZpY => {
                let zp = bus.read(operand_pc).wrapping_add(self.y);
                (Some(u16::from(zp)), None, false)
            }
            AddrMode::Rel => {
                let offset = bus.read(operand_pc) as i8;
                let next_pc = operand_pc.wrapping_add(1);
                let target = next_pc.wrapping_add(offset as u16);
                // Page cross is measured against the branch instruction's own
                // page, not the post-instruction PC (spec.md §8 scenario 4).
                let crossed = (target & 0xFF00) != (start_pc & 0xFF00);
                (Some(target), None, crossed)
            }
            AddrMode::Abs => {
                let addr = bus.read_u16(operand_pc);
                (Some(addr), None, false)
            }
            AddrMode::AbsX => {
                let base = bus.read_u16(operand_pc);
                let addr = base.wrapping_add(u16::from(self.x));
                let crossed = (base & 0xFF00) != (addr & 0xFF00);
                (Some(addr), None, crossed)
            }
            AddrMode::AbsY => {
                let base = bus.read_u16(operand_pc);
                let addr = base.wrapping_add(u16::from(self.y));
                let crossed = (base & 0xFF00) != (addr & 0xFF00);
                (Some(addr), None, crossed)
            }
            AddrMode::Ind => {
                let ptr = bus.read_u16(operand_pc);
                let addr = bus.read_u16_wrap(ptr);
                (Some(addr), None, false)
            }
            AddrMode::XInd => {
                let zp = bus.read(operand_pc).wrapping_add(self.x);
                let lo = u16::from(bus.read(u16::from(zp)));
                let hi = u16::from(bus.read(u16::from(zp.wrapping_add(1))));
                (Some((hi << 8) | lo), None, false)
            }
            AddrMode::IndY => {
                let zp = bus.read(operand_pc);
                let lo = u16::from(bus.read(u16::from(zp)));
                let hi = u16::from(bus.read(u16::from(zp.wrapping_add(1))));
                let base = (hi << 8) | lo;
                let addr = base.wrapping_add(u16::from(self.y));
                let crossed = (base & 0xFF00) != (addr & 0xFF00);
                (Some(addr), None, crossed)
            }
        };
        // Page-cross penalties only ever apply to the modes that declare
        // themselves eligible for one; a mismatch here would mean a match arm
        // above computed `crossed` for a mode that shouldn't carry one.
        debug_assert!(!page_cross || entry.mode.has_page_cross_penalty());

        // Instruction length is the opcode byte plus this mode's operand size.
        let bytes = 1u16 + u16::from(entry.mode.operand_size());
        self.pc = start_pc.wrapping_add(bytes);

        Ok(Decoded {
            mnemonic: entry.mnemonic,
            mode: entry.mode,
            addr,
            imm,
            page_cross,
            opcode,
            pc: start_pc,
            base_cycles: entry.base_cycles,
        })
    }

    /// Runs one fetch/decode/execute/bill cycle.
    ///
    /// Order: service a pending interrupt if one is latched; otherwise
    /// decode and execute the instruction at `PC`. Returns the cycles billed
    /// on success, or [`CpuError::IllegalInstruction`] if the opcode byte has
    /// no table entry (`PC` is left pointing at the offending opcode so a
    /// caller can inspect or recover).
    pub fn step(&mut self, bus: &mut impl Bus, host: &mut impl HostCall) -> StepResult {
        let interrupt_cycles = self.service_interrupts(bus);

        let decoded = match self.decode(bus) {
            Ok(decoded) => decoded,
            Err(err) => {
                // Interrupts already serviced this Step bill regardless of
                // whether the instruction that follows them decodes.
                self.total_cycles += u64::from(interrupt_cycles);
                return Err(err);
            }
        };
        let extra = instructions::execute(self, bus, host, &decoded);
        let cycles = interrupt_cycles + u32::from(decoded.base_cycles) + extra;
        self.total_cycles += u64::from(cycles);
        Ok(StepOutcome { cycles })
    }
}

/// Runs one [`Cpu::step`] and forwards the cycles billed to `timekeeper`.
///
/// Convenience for embedders that drive a system clock (PPU/APU dot
/// counters, a throttle) off CPU cycles; callers that don't need this can
/// call [`Cpu::step`] directly.
pub fn run_step(
    cpu: &mut Cpu,
    bus: &mut impl Bus,
    host: &mut impl HostCall,
    timekeeper: &mut impl Timekeeper,
) -> StepResult {
    let outcome = cpu.step(bus, host)?;
    timekeeper.advance(outcome.cycles);
    Ok(outcome)
}
