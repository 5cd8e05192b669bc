//! Evaluators: one function body per mnemonic, dispatched from
//! [`execute`] over the [`Mnemonic`] tag the decoder reads out of the
//! opcode table.

use crate::addressing::AddrMode;
use crate::bus::Bus;
use crate::cpu::{vectors, Cpu, Decoded};
use crate::opcodes::Mnemonic;
use crate::status::Status;
use crate::vmcall::HostCall;

/// Executes a decoded instruction against `cpu`, `bus`, and `host`, and
/// returns the cycles to add to the opcode's base cost (branch-taken and
/// page-cross penalties; `0` for instructions that don't have one).
pub(crate) fn execute(
    cpu: &mut Cpu,
    bus: &mut impl Bus,
    host: &mut impl HostCall,
    decoded: &Decoded,
) -> u32 {
    use Mnemonic::{
        Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp,
        Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha,
        Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa,
        Txs, Tya, Vmcall,
    };

    match decoded.mnemonic {
        Adc => {
            let m = operand(bus, decoded);
            add_with_carry(cpu, m);
            page_cross_extra(decoded)
        }
        Sbc => {
            let m = operand(bus, decoded);
            add_with_carry(cpu, !m);
            page_cross_extra(decoded)
        }
        And => {
            let m = operand(bus, decoded);
            cpu.a &= m;
            cpu.status.set_zn(cpu.a);
            page_cross_extra(decoded)
        }
        Ora => {
            let m = operand(bus, decoded);
            cpu.a |= m;
            cpu.status.set_zn(cpu.a);
            page_cross_extra(decoded)
        }
        Eor => {
            let m = operand(bus, decoded);
            cpu.a ^= m;
            cpu.status.set_zn(cpu.a);
            page_cross_extra(decoded)
        }
        Cmp => {
            let m = operand(bus, decoded);
            compare(cpu, cpu.a, m);
            page_cross_extra(decoded)
        }
        Cpx => {
            let m = operand(bus, decoded);
            compare(cpu, cpu.x, m);
            0
        }
        Cpy => {
            let m = operand(bus, decoded);
            compare(cpu, cpu.y, m);
            0
        }
        Bit => {
            let m = operand(bus, decoded);
            cpu.status.set_flag(Status::Z, cpu.a & m == 0);
            cpu.status.set_flag(Status::N, m & 0x80 != 0);
            cpu.status.set_flag(Status::V, m & 0x40 != 0);
            0
        }
        Asl => {
            shift(cpu, bus, decoded, |v| (v << 1, v & 0x80 != 0));
            0
        }
        Lsr => {
            shift(cpu, bus, decoded, |v| (v >> 1, v & 0x01 != 0));
            0
        }
        Rol => {
            let carry_in = u8::from(cpu.status.contains(Status::C));
            shift(cpu, bus, decoded, |v| ((v << 1) | carry_in, v & 0x80 != 0));
            0
        }
        Ror => {
            let carry_in = u8::from(cpu.status.contains(Status::C));
            shift(cpu, bus, decoded, |v| {
                ((v >> 1) | (carry_in << 7), v & 0x01 != 0)
            });
            0
        }
        Inc => {
            rmw(cpu, bus, decoded, |v| v.wrapping_add(1));
            0
        }
        Dec => {
            rmw(cpu, bus, decoded, |v| v.wrapping_sub(1));
            0
        }
        Inx => {
            cpu.x = cpu.x.wrapping_add(1);
            cpu.status.set_zn(cpu.x);
            0
        }
        Dex => {
            cpu.x = cpu.x.wrapping_sub(1);
            cpu.status.set_zn(cpu.x);
            0
        }
        Iny => {
            cpu.y = cpu.y.wrapping_add(1);
            cpu.status.set_zn(cpu.y);
            0
        }
        Dey => {
            cpu.y = cpu.y.wrapping_sub(1);
            cpu.status.set_zn(cpu.y);
            0
        }
        Lda => {
            cpu.a = operand(bus, decoded);
            cpu.status.set_zn(cpu.a);
            page_cross_extra(decoded)
        }
        Ldx => {
            cpu.x = operand(bus, decoded);
            cpu.status.set_zn(cpu.x);
            page_cross_extra(decoded)
        }
        Ldy => {
            cpu.y = operand(bus, decoded);
            cpu.status.set_zn(cpu.y);
            page_cross_extra(decoded)
        }
        Sta => {
            bus.write(decoded.addr.expect("STA always has an address"), cpu.a);
            0
        }
        Stx => {
            bus.write(decoded.addr.expect("STX always has an address"), cpu.x);
            0
        }
        Sty => {
            bus.write(decoded.addr.expect("STY always has an address"), cpu.y);
            0
        }
        Tax => {
            cpu.x = cpu.a;
            cpu.status.set_zn(cpu.x);
            0
        }
        Tay => {
            cpu.y = cpu.a;
            cpu.status.set_zn(cpu.y);
            0
        }
        Txa => {
            cpu.a = cpu.x;
            cpu.status.set_zn(cpu.a);
            0
        }
        Tya => {
            cpu.a = cpu.y;
            cpu.status.set_zn(cpu.a);
            0
        }
        Tsx => {
            cpu.x = cpu.sp;
            cpu.status.set_zn(cpu.x);
            0
        }
        Txs => {
            // Unlike the other transfers, TXS does not touch any flag.
            cpu.sp = cpu.x;
            0
        }
        Pha => {
            let a = cpu.a;
            cpu.push(bus, a);
            0
        }
        Pla => {
            cpu.a = cpu.pull(bus);
            cpu.status.set_zn(cpu.a);
            0
        }
        Php => {
            // Pushed byte has B=1, U=1; the in-register P is left untouched.
            let byte = cpu.status.to_stack_byte(true);
            cpu.push(bus, byte);
            0
        }
        Plp => {
            let byte = cpu.pull(bus);
            cpu.status = Status::from_stack_byte(byte);
            0
        }
        Jmp => {
            cpu.pc = decoded.addr.expect("JMP always has a target");
            0
        }
        Jsr => {
            let return_addr = decoded.pc.wrapping_add(2);
            cpu.push_u16(bus, return_addr);
            cpu.pc = decoded.addr.expect("JSR always has a target");
            0
        }
        Rts => {
            let addr = cpu.pull_u16(bus);
            cpu.pc = addr.wrapping_add(1);
            0
        }
        Brk => {
            // BRK's second byte is a padding/signature byte, skipped but
            // still accounted for in the return address pushed to the stack.
            cpu.pc = cpu.pc.wrapping_add(1);
            let return_addr = cpu.pc;
            cpu.push_u16(bus, return_addr);
            let byte = cpu.status.to_stack_byte(true);
            cpu.push(bus, byte);
            cpu.status.set_flag(Status::I, true);
            cpu.pc = bus.read_u16(vectors::IRQ);
            0
        }
        Rti => {
            let byte = cpu.pull(bus);
            cpu.status = Status::from_stack_byte(byte);
            cpu.pc = cpu.pull_u16(bus);
            0
        }
        Bcc => {
            let taken = !cpu.status.contains(Status::C);
            branch(cpu, decoded, taken)
        }
        Bcs => {
            let taken = cpu.status.contains(Status::C);
            branch(cpu, decoded, taken)
        }
        Beq => {
            let taken = cpu.status.contains(Status::Z);
            branch(cpu, decoded, taken)
        }
        Bne => {
            let taken = !cpu.status.contains(Status::Z);
            branch(cpu, decoded, taken)
        }
        Bmi => {
            let taken = cpu.status.contains(Status::N);
            branch(cpu, decoded, taken)
        }
        Bpl => {
            let taken = !cpu.status.contains(Status::N);
            branch(cpu, decoded, taken)
        }
        Bvs => {
            let taken = cpu.status.contains(Status::V);
            branch(cpu, decoded, taken)
        }
        Bvc => {
            let taken = !cpu.status.contains(Status::V);
            branch(cpu, decoded, taken)
        }
        Clc => {
            cpu.status.set_flag(Status::C, false);
            0
        }
        Sec => {
            cpu.status.set_flag(Status::C, true);
            0
        }
        Cli => {
            cpu.status.set_flag(Status::I, false);
            0
        }
        Sei => {
            cpu.status.set_flag(Status::I, true);
            0
        }
        Cld => {
            cpu.status.set_flag(Status::D, false);
            0
        }
        Sed => {
            cpu.status.set_flag(Status::D, true);
            0
        }
        Clv => {
            cpu.status.set_flag(Status::V, false);
            0
        }
        Nop => 0,
        Vmcall => {
            let arg8 = decoded.imm.expect("VMCALL is always immediate-encoded");
            host.handle_vmcall(cpu, arg8);
            0
        }
    }
}

/// Reads the instruction's operand: the immediate byte for `Imm`, otherwise
/// a bus read at the decoded effective address.
fn operand(bus: &mut impl Bus, decoded: &Decoded) -> u8 {
    match decoded.mode {
        AddrMode::Imm => decoded.imm.expect("Imm mode always carries a value"),
        _ => bus.read(decoded.addr.expect("non-Imm modes always carry an address")),
    }
}

/// Extra cycle for indexed modes that crossed a page boundary on a read —
/// never applies to stores or read-modify-write instructions, which already
/// bill their worst case in the base cycle table.
fn page_cross_extra(decoded: &Decoded) -> u32 {
    u32::from(decoded.page_cross)
}

fn add_with_carry(cpu: &mut Cpu, m: u8) {
    let a = cpu.a;
    let carry_in = u16::from(cpu.status.contains(Status::C));
    let sum = u16::from(a) + u16::from(m) + carry_in;
    let result = sum as u8;
    let overflow = (!(a ^ m) & (a ^ result) & 0x80) != 0;
    cpu.status.set_flag(Status::C, sum > 0xFF);
    cpu.status.set_flag(Status::V, overflow);
    cpu.a = result;
    cpu.status.set_zn(result);
}

fn compare(cpu: &mut Cpu, reg: u8, m: u8) {
    let result = reg.wrapping_sub(m);
    cpu.status.set_flag(Status::C, reg >= m);
    cpu.status.set_zn(result);
}

/// Shared shape for ASL/LSR/ROL/ROR: operates on `A` in `Acc` mode, or on a
/// memory byte (read-modify-write) otherwise. `op` takes the input byte and
/// returns `(result, carry_out)`.
fn shift(cpu: &mut Cpu, bus: &mut impl Bus, decoded: &Decoded, op: impl Fn(u8) -> (u8, bool)) {
    if matches!(decoded.mode, AddrMode::Acc) {
        let (result, carry) = op(cpu.a);
        cpu.a = result;
        cpu.status.set_flag(Status::C, carry);
        cpu.status.set_zn(result);
    } else {
        let addr = decoded
            .addr
            .expect("non-Acc shift modes always carry an address");
        let value = bus.read(addr);
        let (result, carry) = op(value);
        bus.write(addr, result);
        cpu.status.set_flag(Status::C, carry);
        cpu.status.set_zn(result);
    }
}

fn rmw(cpu: &mut Cpu, bus: &mut impl Bus, decoded: &Decoded, op: impl Fn(u8) -> u8) {
    let addr = decoded.addr.expect("INC/DEC always carry an address");
    let value = bus.read(addr);
    let result = op(value);
    bus.write(addr, result);
    cpu.status.set_zn(result);
}

fn branch(cpu: &mut Cpu, decoded: &Decoded, taken: bool) -> u32 {
    if taken {
        cpu.pc = decoded.addr.expect("Rel mode always carries a target");
        1 + page_cross_extra(decoded)
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vmcall::HostCall;

    struct TestBus {
        mem: [u8; 0x10000],
    }

    impl TestBus {
        fn new() -> Self {
            Self { mem: [0; 0x10000] }
        }
        fn load(&mut self, addr: u16, bytes: &[u8]) {
            for (i, &b) in bytes.iter().enumerate() {
                self.mem[addr as usize + i] = b;
            }
        }
        fn set_reset_vector(&mut self, addr: u16) {
            self.mem[0xFFFC] = (addr & 0xFF) as u8;
            self.mem[0xFFFD] = (addr >> 8) as u8;
        }
    }

    impl Bus for TestBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.mem[addr as usize]
        }
        fn write(&mut self, addr: u16, value: u8) {
            self.mem[addr as usize] = value;
        }
        fn peek(&self, addr: u16) -> u8 {
            self.mem[addr as usize]
        }
    }

    struct NoHost;
    impl HostCall for NoHost {
        fn handle_vmcall(&mut self, _cpu: &mut Cpu, _arg8: u8) {}
    }

    #[test]
    fn adc_sets_carry_and_overflow_on_signed_overflow() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x8000);
        bus.load(0x8000, &[0xA9, 0x7F, 0x69, 0x01]); // LDA #$7F, ADC #$01
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let mut host = NoHost;
        cpu.step(&mut bus, &mut host).unwrap();
        cpu.step(&mut bus, &mut host).unwrap();
        assert_eq!(cpu.a, 0x80);
        assert!(cpu.status.contains(Status::V));
        assert!(cpu.status.contains(Status::N));
        assert!(!cpu.status.contains(Status::C));
    }

    #[test]
    fn sbc_is_binary_even_with_decimal_flag_set() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x8000);
        // SED, SEC, LDA #$10, SBC #$05
        bus.load(0x8000, &[0xF8, 0x38, 0xA9, 0x10, 0xE9, 0x05]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let mut host = NoHost;
        for _ in 0..4 {
            cpu.step(&mut bus, &mut host).unwrap();
        }
        assert_eq!(cpu.a, 0x0B);
        assert!(cpu.status.contains(Status::C));
    }

    #[test]
    fn xind_indexed_indirect_wraps_zero_page() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x8000);
        // LDX #$04, LDA ($FE,X) -> pointer at zero page $FE+$04=$102 wraps to $02
        bus.load(0x8000, &[0xA2, 0x04, 0xA1, 0xFE]);
        bus.mem[0x02] = 0x00;
        bus.mem[0x03] = 0x90;
        bus.mem[0x9000] = 0x55;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let mut host = NoHost;
        cpu.step(&mut bus, &mut host).unwrap(); // LDX
        cpu.step(&mut bus, &mut host).unwrap(); // LDA
        assert_eq!(cpu.a, 0x55);
    }

    #[test]
    fn php_does_not_mutate_in_register_status() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x8000);
        bus.load(0x8000, &[0x08]); // PHP
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let before = cpu.status;
        let mut host = NoHost;
        cpu.step(&mut bus, &mut host).unwrap();
        assert_eq!(cpu.status, before);
        assert!(!before.contains(Status::B));
    }

    #[test]
    fn brk_pushes_pc_plus_two_and_sets_b_on_stack() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x8000);
        bus.load(0x8000, &[0x00, 0x00]); // BRK
        bus.mem[0xFFFE] = 0x00;
        bus.mem[0xFFFF] = 0x90;
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        let sp_before = cpu.sp;
        let mut host = NoHost;
        cpu.step(&mut bus, &mut host).unwrap();
        assert_eq!(cpu.pc, 0x9000);
        assert_eq!(cpu.sp, sp_before.wrapping_sub(3));
        assert!(cpu.status.contains(Status::I));
    }

    #[test]
    fn branch_taken_across_page_boundary_adds_two_cycles() {
        let mut bus = TestBus::new();
        bus.set_reset_vector(0x80FC);
        // BEQ with a displacement that crosses from page $80 to $81
        bus.load(0x80FC, &[0xF0, 0x05]);
        let mut cpu = Cpu::new();
        cpu.reset(&mut bus);
        cpu.status.set_flag(Status::Z, true);
        let mut host = NoHost;
        let outcome = cpu.step(&mut bus, &mut host).unwrap();
        assert_eq!(cpu.pc, 0x8103);
        assert_eq!(outcome.cycles, 4);
    }
}
