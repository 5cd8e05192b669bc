//! Black-box validation of the concrete scenarios and round-trip laws this
//! core is contractually required to satisfy: LDA flag setting, ADC overflow,
//! the indirect-JMP page-wrap bug, branch cycle costs, the full BRK sequence,
//! and indexed-indirect zero-page wrap.

use mos6502_core::{Bus, Cpu, HostCall, Status};

struct FlatBus {
    mem: [u8; 0x1_0000],
}

impl FlatBus {
    fn new() -> Self {
        Self { mem: [0; 0x1_0000] }
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

impl Bus for FlatBus {
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

fn powered_on(reset_at: u16) -> (Cpu, FlatBus) {
    let mut bus = FlatBus::new();
    bus.set_reset_vector(reset_at);
    let mut cpu = Cpu::new();
    cpu.reset(&mut bus);
    (cpu, bus)
}

/// Scenario 1: `LDA #$80` sets N, clears Z, takes 2 cycles.
#[test]
fn scenario_lda_immediate_negative() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0xA9, 0x80]);
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.a, 0x80);
    assert!(cpu.status.contains(Status::N));
    assert!(!cpu.status.contains(Status::Z));
    assert_eq!(cpu.pc, 0x8002);
    assert_eq!(outcome.cycles, 2);
}

/// Scenario 2: `ADC #$50` against `A=$50, C=0` signals carry-clear overflow.
#[test]
fn scenario_adc_signed_overflow() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0x69, 0x50]);
    cpu.a = 0x50;
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.a, 0xA0);
    assert!(!cpu.status.contains(Status::C));
    assert!(cpu.status.contains(Status::V));
    assert!(cpu.status.contains(Status::N));
    assert!(!cpu.status.contains(Status::Z));
    assert_eq!(outcome.cycles, 2);
}

/// Scenario 3: `JMP ($10FF)` reads its high byte from `$1000`, not `$1100`.
#[test]
fn scenario_indirect_jmp_page_wrap_bug() {
    let (mut cpu, mut bus) = powered_on(0x0000);
    bus.load(0x0000, &[0x6C, 0xFF, 0x10]);
    bus.mem[0x10FF] = 0x34;
    bus.mem[0x1000] = 0x12;
    bus.mem[0x1100] = 0xAB;
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.pc, 0x1234);
    assert_eq!(outcome.cycles, 5);
}

/// Scenario 4: a taken `BEQ` that also crosses a page bills base+1+1.
#[test]
fn scenario_branch_taken_across_page() {
    let (mut cpu, mut bus) = powered_on(0x10FE);
    bus.load(0x10FE, &[0xF0, 0x02]);
    cpu.status.set_flag(Status::Z, true);
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.pc, 0x1102);
    assert_eq!(outcome.cycles, 4);
}

/// Scenario 5: the full `BRK` path — padding byte, stack contents, vector.
#[test]
fn scenario_brk_full_path() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0x00]);
    bus.mem[0xFFFE] = 0x00;
    bus.mem[0xFFFF] = 0x90;
    cpu.status.set_flag(Status::I, false);
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.pc, 0x9000);
    assert!(cpu.status.contains(Status::I));
    assert_eq!(outcome.cycles, 7);

    // Stack grew downward by 3: status, PCL, PCH (pop order is the reverse of push).
    let p_addr = 0x0100 | u16::from(cpu.sp.wrapping_add(1));
    let pcl_addr = 0x0100 | u16::from(cpu.sp.wrapping_add(2));
    let pch_addr = 0x0100 | u16::from(cpu.sp.wrapping_add(3));
    assert_eq!(bus.mem[pch_addr as usize], 0x80);
    assert_eq!(bus.mem[pcl_addr as usize], 0x02);
    assert_eq!(bus.mem[p_addr as usize] & 0x10, 0x10, "B must be set on the pushed byte");
}

/// Scenario 6: `LDA ($FE,X)` with `X=$01` wraps the pointer fetch within page 0.
#[test]
fn scenario_xind_zero_page_wrap() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0xA1, 0xFE]);
    cpu.x = 0x01;
    bus.mem[0x00FF] = 0x34;
    bus.mem[0x0000] = 0x12;
    bus.mem[0x1234] = 0x77;
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.a, 0x77);
    assert_eq!(outcome.cycles, 6);
}

/// `PHA; PLA` leaves A unchanged and updates Z/N from A.
#[test]
fn round_trip_pha_pla() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0xA9, 0x55, 0x48, 0xA9, 0x00, 0x68]); // LDA #$55, PHA, LDA #$00, PLA
    let mut host = NoHost;

    for _ in 0..4 {
        cpu.step(&mut bus, &mut host).unwrap();
    }

    assert_eq!(cpu.a, 0x55);
    assert!(!cpu.status.contains(Status::Z));
}

/// `PHP; PLP` restores every flag except forcing B=0, U=1.
#[test]
fn round_trip_php_plp() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0x08, 0x28]); // PHP, PLP
    cpu.status = Status::C | Status::V | Status::N;
    let before = cpu.status;
    let mut host = NoHost;

    cpu.step(&mut bus, &mut host).unwrap(); // PHP
    cpu.step(&mut bus, &mut host).unwrap(); // PLP

    assert_eq!(cpu.status, before | Status::U);
    assert!(!cpu.status.contains(Status::B));
}

/// `JSR target; ...; RTS` returns to the instruction after the JSR.
#[test]
fn round_trip_jsr_rts() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0x20, 0x00, 0x90]); // JSR $9000
    bus.mem[0x9000] = 0x60; // RTS
    let sp_before = cpu.sp;
    let mut host = NoHost;

    cpu.step(&mut bus, &mut host).unwrap(); // JSR
    assert_eq!(cpu.pc, 0x9000);

    cpu.step(&mut bus, &mut host).unwrap(); // RTS
    assert_eq!(cpu.pc, 0x8003);
    assert_eq!(cpu.sp, sp_before);
}

/// NMI takes priority over a simultaneously pending IRQ: NMI is serviced,
/// and IRQ is not (NMI entry sets I, so IRQ cannot also be serviced in the
/// same Step). The Step Driver then proceeds to decode/execute the
/// instruction at the NMI vector and bills its cost alongside the 8 cycles
/// of interrupt service (spec.md §4.4/§4.5).
#[test]
fn nmi_takes_priority_over_pending_irq() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.mem[0xFFFA] = 0x00;
    bus.mem[0xFFFB] = 0xA0;
    bus.load(0xA000, &[0xEA]); // NOP, 2 cycles
    cpu.status.set_flag(Status::I, false);
    cpu.request_nmi();
    cpu.set_irq_line(true);
    let mut host = NoHost;

    let outcome = cpu.step(&mut bus, &mut host).unwrap();

    assert_eq!(cpu.pc, 0xA001);
    assert_eq!(outcome.cycles, 10);
    assert!(cpu.status.contains(Status::I));
}

/// An illegal opcode byte surfaces as an error and leaves PC pointing at it.
#[test]
fn illegal_opcode_is_reported() {
    let (mut cpu, mut bus) = powered_on(0x8000);
    bus.load(0x8000, &[0x02]);
    let mut host = NoHost;

    let err = cpu.step(&mut bus, &mut host).unwrap_err();

    assert_eq!(cpu.pc, 0x8000);
    assert!(matches!(
        err,
        mos6502_core::CpuError::IllegalInstruction { opcode: 0x02, pc: 0x8000 }
    ));
}
