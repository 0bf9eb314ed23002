use coco3_core::core::{BusMasterComponent, InterruptLine, bus::source};
use coco3_core::cpu::{Cpu, CpuStateTrait};
use coco3_core::cpu::m6809::{CcFlag, M6809, SoftHalt, vector};
mod common;
use common::{CPU, TestBus, run};

/// CPU with S at 0x8000, running NOPs from 0x0000, and every hardware
/// vector pointing at its own NOP-filled handler page.
fn setup() -> (M6809, TestBus) {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.memory[..0xF000].fill(0x12); // NOP
    bus.set_vector(vector::NMI, 0x5000);
    bus.set_vector(vector::FIRQ, 0x6000);
    bus.set_vector(vector::IRQ, 0x7000);
    bus.set_vector(vector::SWI, 0x9000);
    bus.set_vector(vector::RESET, 0xC000);
    cpu.s = 0x8000;
    (cpu, bus)
}

#[test]
fn test_irq_stacks_entire_state() {
    let (mut cpu, mut bus) = setup();
    cpu.a = 0xAA;
    cpu.pc = 0x0100;
    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);

    let cycles = run(&mut cpu, &mut bus, 1);

    // Vectored, then the handler's first NOP ran in the same step.
    assert_eq!(cpu.pc, 0x7001);
    assert_eq!(cycles, 12 + 2);
    assert_eq!(cpu.s, 0x8000 - 12);
    assert!(cpu.flag(CcFlag::I));
    assert!(!cpu.flag(CcFlag::F));

    let stacked_cc = bus.memory[0x7FF4];
    assert_ne!(stacked_cc & CcFlag::E as u8, 0, "E marks a full frame");
    assert_eq!(bus.memory[0x7FF5], 0xAA);
    assert_eq!(bus.read_word(0x7FFE), 0x0100);
}

#[test]
fn test_irq_masked_by_i_flag() {
    let (mut cpu, mut bus) = setup();
    cpu.cc |= CcFlag::I as u8;
    bus.lines.assert(InterruptLine::Irq, source::GIME_TIMER);
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.pc, 0x0003);
    assert_eq!(cpu.s, 0x8000);
}

#[test]
fn test_firq_stacks_pc_and_cc_only() {
    let (mut cpu, mut bus) = setup();
    cpu.pc = 0x0200;
    bus.lines.assert(InterruptLine::Firq, source::PIA_CART);

    run(&mut cpu, &mut bus, 1);

    assert_eq!(cpu.pc, 0x6001);
    assert_eq!(cpu.s, 0x8000 - 3);
    assert_eq!(bus.memory[0x7FFD] & CcFlag::E as u8, 0);
    assert_eq!(bus.read_word(0x7FFE), 0x0200);
    assert!(cpu.flag(CcFlag::F));
    assert!(cpu.flag(CcFlag::I));
}

#[test]
fn test_priority_nmi_then_firq_then_irq() {
    let (mut cpu, mut bus) = setup();
    bus.lines.assert(InterruptLine::Nmi, source::DISK);
    bus.lines.assert(InterruptLine::Firq, source::PIA_CART);
    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);

    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x5001, "NMI wins");
    assert!(
        !bus.lines.is_asserted(InterruptLine::Nmi),
        "NMI is acknowledged once taken"
    );

    // NMI entry masked both lines; open FIRQ only.
    cpu.cc &= !(CcFlag::F as u8);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x6001, "FIRQ outranks IRQ");

    cpu.cc &= !(CcFlag::I as u8 | CcFlag::F as u8);
    bus.lines.clear(InterruptLine::Firq, source::PIA_CART);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x7001);
}

#[test]
fn test_masked_firq_lets_irq_through() {
    let (mut cpu, mut bus) = setup();
    cpu.cc |= CcFlag::F as u8;
    bus.lines.assert(InterruptLine::Firq, source::PIA_CART);
    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x7001);
}

#[test]
fn test_masked_firq_stays_pending_behind_irq() {
    let (mut cpu, mut bus) = setup();
    cpu.pc = 0x0300;
    cpu.cc |= CcFlag::F as u8;
    bus.load(0x7000, &[0x1C, 0xBF]); // ANDCC #$BF: handler unmasks FIRQ
    bus.lines.assert(InterruptLine::Firq, source::PIA_CART);
    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);

    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x7002);
    assert_eq!(cpu.s, 0x8000 - 12, "IRQ pushed a full frame");
    assert_ne!(bus.memory[0x7FF4] & CcFlag::E as u8, 0);
    assert_eq!(bus.read_word(0x7FFE), 0x0300);
    assert!(bus.lines.is_asserted(InterruptLine::Firq));

    // Once unmasked inside the IRQ handler, FIRQ preempts it.
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x6001);
    assert_eq!(cpu.s, 0x8000 - 12 - 3);
    assert_eq!(bus.read_word(0x7FF2), 0x7002);
}

#[test]
fn test_nmi_outranks_reset() {
    let (mut cpu, mut bus) = setup();
    bus.lines.assert(InterruptLine::Reset, source::RESET_SWITCH);
    bus.lines.assert(InterruptLine::Nmi, source::DISK);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x5001);
    assert!(bus.lines.is_asserted(InterruptLine::Reset));

    // NMI entry set I and F, so only RESET remains serviceable.
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0xC001);
    assert!(!bus.lines.is_asserted(InterruptLine::Reset));
}

#[test]
fn test_reset_vector() {
    let (mut cpu, mut bus) = setup();
    bus.load(0xC000, &[0x12]);
    cpu.dp = 0x20;
    cpu.reset();
    bus.lines.assert(InterruptLine::Reset, source::RESET_SWITCH);

    run(&mut cpu, &mut bus, 1);

    assert_eq!(cpu.pc, 0xC001);
    assert_eq!(cpu.dp, 0);
    assert!(cpu.flag(CcFlag::I));
    assert!(cpu.flag(CcFlag::F));
}

#[test]
fn test_rti_after_irq_restores_everything() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x7000, &[0x3B]); // RTI
    cpu.pc = 0x0100;
    cpu.a = 0x11;
    cpu.x = 0x2222;
    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);

    // Entry plus the RTI in one step; the restored CC re-opens IRQ.
    let cycles = run(&mut cpu, &mut bus, 1);
    bus.lines.clear(InterruptLine::Irq, source::PIA_VSYNC);

    assert_eq!(cpu.pc, 0x0100);
    assert_eq!(cpu.s, 0x8000);
    assert_eq!(cpu.a, 0x11);
    assert_eq!(cpu.x, 0x2222);
    assert!(!cpu.flag(CcFlag::I));
    assert_eq!(cycles, 12 + 6 + 12);
}

#[test]
fn test_rti_after_firq_pulls_short_frame() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x6000, &[0x3B]); // RTI
    cpu.pc = 0x0100;
    bus.lines.assert(InterruptLine::Firq, source::PIA_CART);
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x0100);
    assert_eq!(cpu.s, 0x8000);
    assert_eq!(cycles, 3 + 6 + 3);
}

#[test]
fn test_cwai_waits_without_restacking() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x3C, 0xEF]); // CWAI #$EF (clear I)
    cpu.cc |= CcFlag::I as u8;

    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.soft_halt(), SoftHalt::CwaiWait);
    assert!(cpu.is_sleeping());
    assert_eq!(cpu.s, 0x8000 - 12);
    assert!(!cpu.flag(CcFlag::I));

    run(&mut cpu, &mut bus, 5);
    assert_eq!(cpu.pc, 0x0002, "no fetch while waiting");

    bus.lines.assert(InterruptLine::Irq, source::GIME_VBORDER);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.soft_halt(), SoftHalt::None);
    assert_eq!(cpu.pc, 0x7001);
    assert_eq!(cpu.s, 0x8000 - 12, "state was stacked by CWAI");
}

#[test]
fn test_sync_resumes_on_masked_interrupt() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x13, 0x12]); // SYNC; NOP
    cpu.cc |= CcFlag::I as u8;

    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.soft_halt(), SoftHalt::SyncWait);
    assert_eq!(cpu.pc, 0x0001);

    bus.lines.assert(InterruptLine::Irq, source::PIA_HSYNC);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.soft_halt(), SoftHalt::None);
    assert_eq!(cpu.pc, 0x0002, "masked IRQ falls through to the next instruction");
    assert_eq!(cpu.s, 0x8000);
}

#[test]
fn test_sync_vectors_on_unmasked_interrupt() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x13]);
    run(&mut cpu, &mut bus, 1);
    bus.lines.assert(InterruptLine::Irq, source::PIA_HSYNC);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x7001);
}

#[test]
fn test_swi_masks_and_vectors() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x3F]); // SWI
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x9000);
    assert!(cpu.flag(CcFlag::I));
    assert!(cpu.flag(CcFlag::F));
    assert_eq!(cpu.s, 0x8000 - 12);
    assert_eq!(cycles, 19 + 12);
}

#[test]
fn test_invalid_opcode_halts_until_reset() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x01]);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.soft_halt(), SoftHalt::InvalidOpcode);

    bus.lines.assert(InterruptLine::Irq, source::PIA_VSYNC);
    bus.lines.assert(InterruptLine::Nmi, source::DISK);
    run(&mut cpu, &mut bus, 4);
    assert_eq!(cpu.pc, 0x0001, "only RESET recovers");
    assert_eq!(cpu.s, 0x8000);
    bus.lines.clear_line(InterruptLine::Nmi);
    bus.lines.clear_line(InterruptLine::Irq);

    bus.lines.assert(InterruptLine::Reset, source::RESET_SWITCH);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.soft_halt(), SoftHalt::None);
    assert_eq!(cpu.pc, 0xC001);
}

#[test]
fn test_undefined_prefix_pair_runs_second_byte() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x10, 0x86, 0x42]); // undefined page-2 slot, then LDA #$42
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.pc, 0x0003);
}

#[test]
fn test_tick_spreads_instruction_cycles() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x86, 0x01, 0x86, 0x02]); // LDA #1; LDA #2

    assert!(cpu.tick_with_bus(&mut bus, CPU), "boundary: LDA #1 runs");
    assert_eq!(cpu.a, 0x01);
    assert_eq!(cpu.pending_cycles(), 1);
    assert!(!cpu.tick_with_bus(&mut bus, CPU));
    assert!(cpu.tick_with_bus(&mut bus, CPU));
    assert_eq!(cpu.a, 0x02);
}

#[test]
fn test_hardware_halt_blocks_instruction_start() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x86, 0x01]);
    bus.halted = true;
    for _ in 0..10 {
        assert!(!cpu.tick_with_bus(&mut bus, CPU));
    }
    assert_eq!(cpu.pc, 0);

    bus.halted = false;
    assert!(cpu.tick_with_bus(&mut bus, CPU));
    assert_eq!(cpu.a, 0x01);
}

#[test]
fn test_force_pc_wakes_cpu() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x01]);
    run(&mut cpu, &mut bus, 1);
    assert!(cpu.is_sleeping());
    cpu.force_pc(0x0400);
    assert!(!cpu.is_sleeping());
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x0401);
}

#[test]
fn test_cwai_irq_rti_round_trip() {
    let (mut cpu, mut bus) = setup();
    bus.load(0x0000, &[0x3C, 0xFF, 0x12]); // CWAI #$FF; NOP
    bus.load(0x7000, &[0x3B]); // RTI
    cpu.a = 0x01;
    cpu.b = 0x02;
    cpu.dp = 0x03;
    cpu.x = 0x0405;
    cpu.y = 0x0607;
    cpu.u = 0x0809;
    let before = cpu.snapshot();

    run(&mut cpu, &mut bus, 1);
    bus.lines.assert(InterruptLine::Irq, source::GIME_TIMER);
    run(&mut cpu, &mut bus, 1);
    bus.lines.clear(InterruptLine::Irq, source::GIME_TIMER);

    let after = cpu.snapshot();
    assert_eq!(after.pc, 0x0002, "resumes after CWAI");
    assert_eq!(after.s, before.s);
    assert_eq!(
        (after.a, after.b, after.dp, after.x, after.y, after.u),
        (before.a, before.b, before.dp, before.x, before.y, before.u)
    );
    assert_eq!(after.cc, before.cc | CcFlag::E as u8);
}

#[test]
fn test_reset_then_add_and_store() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.set_vector(vector::RESET, 0x4000);
    bus.load(
        0x4000,
        &[
            0x86, 0x05, // LDA #$05
            0x8B, 0x03, // ADDA #$03
            0xB7, 0x01, 0x00, // STA $0100
        ],
    );
    cpu.reset();
    bus.lines.assert(InterruptLine::Reset, source::RESET_SWITCH);

    run(&mut cpu, &mut bus, 3);

    assert_eq!(bus.memory[0x0100], 0x08);
    assert_eq!(cpu.a, 0x08);
    for flag in [CcFlag::Z, CcFlag::N, CcFlag::V, CcFlag::C] {
        assert!(!cpu.flag(flag));
    }
}
