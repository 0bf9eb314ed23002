use coco3_core::cpu::m6809::M6809;
mod common;
use common::{TestBus, run};

fn with_x(x: u16, program: &[u8]) -> (M6809, TestBus) {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0x1000, program);
    cpu.pc = 0x1000;
    cpu.x = x;
    (cpu, bus)
}

// ==========================================================================
// Indexed post-bytes
// ==========================================================================

#[test]
fn test_indexed_zero_offset() {
    let (mut cpu, mut bus) = with_x(0x2000, &[0xA6, 0x84]); // LDA ,X
    bus.memory[0x2000] = 0x5A;
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x5A);
    assert_eq!(cpu.x, 0x2000);
    assert_eq!(cycles, 4);
}

#[test]
fn test_indexed_five_bit_negative_offset() {
    let (mut cpu, mut bus) = with_x(0x2000, &[0xA6, 0x1F]); // LDA -1,X
    bus.memory[0x1FFF] = 0x77;
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x77);
    assert_eq!(cycles, 5);
}

#[test]
fn test_indexed_post_increment_and_pre_decrement() {
    let (mut cpu, mut bus) = with_x(
        0x2000,
        &[
            0xA6, 0x80, // LDA ,X+
            0xE6, 0x80, // LDB ,X+
            0xA6, 0x82, // LDA ,-X
        ],
    );
    bus.load(0x2000, &[0x01, 0x02]);
    run(&mut cpu, &mut bus, 2);
    assert_eq!((cpu.a, cpu.b), (0x01, 0x02));
    assert_eq!(cpu.x, 0x2002);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x02);
    assert_eq!(cpu.x, 0x2001);
}

#[test]
fn test_indexed_indirect_double_increment() {
    let (mut cpu, mut bus) = with_x(0x2000, &[0xA6, 0x91]); // LDA [,X++]
    bus.load(0x2000, &[0x30, 0x00]);
    bus.memory[0x3000] = 0x99;
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x99);
    assert_eq!(cpu.x, 0x2002);
    assert_eq!(cycles, 4 + 6);
}

#[test]
fn test_indexed_other_registers_and_offsets() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(
        0,
        &[
            0x10, 0x8E, 0x30, 0x00, // LDY #$3000
            0xA6, 0xA8, 0xF0, // LDA -16,Y
            0xC6, 0x04, // LDB #$04
            0xA6, 0xA5, // LDA B,Y
            0xEC, 0xA9, 0x01, 0x00, // LDD $0100,Y
        ],
    );
    bus.memory[0x2FF0] = 0xAA;
    bus.memory[0x3004] = 0xBB;
    bus.load(0x3100, &[0xCC, 0xDD]);

    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xAA);
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.a, 0xBB);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.d(), 0xCCDD);
}

#[test]
fn test_indexed_pc_relative() {
    let (mut cpu, mut bus) = with_x(0, &[0xA6, 0x8C, 0x10]); // LDA $10,PCR
    bus.memory[0x1013] = 0x3C;
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x3C);
}

#[test]
fn test_indexed_extended_indirect() {
    let (mut cpu, mut bus) = with_x(0, &[0xA6, 0x9F, 0x40, 0x00]); // LDA [$4000]
    bus.load(0x4000, &[0x50, 0x10]);
    bus.memory[0x5010] = 0xE1;
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0xE1);
    assert_eq!(cycles, 4 + 5);
}

#[test]
fn test_undefined_post_byte_uses_base_register() {
    let (mut cpu, mut bus) = with_x(0x2000, &[0xA6, 0x87]);
    bus.memory[0x2000] = 0x42;
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.a, 0x42);
    assert_eq!(cpu.pc, 0x1002);
}

#[test]
fn test_leax_self_increment_leaves_register() {
    let (mut cpu, mut bus) = with_x(
        0x2000,
        &[
            0x30, 0x80, // LEAX ,X+
            0x31, 0x81, // LEAY ,X++
        ],
    );
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.x, 0x2000);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.y, 0x2000);
    assert_eq!(cpu.x, 0x2002);
}

#[test]
fn test_word_read_wraps_at_top_of_memory() {
    let (mut cpu, mut bus) = with_x(0xFFFF, &[0xEC, 0x84]); // LDD ,X
    bus.memory[0xFFFF] = 0x12;
    bus.memory[0x0000] = 0x34;
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.d(), 0x1234);
}

// ==========================================================================
// Branches
// ==========================================================================

#[test]
fn test_short_branch_taken_and_not_taken() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(
        0,
        &[
            0x4F, // CLRA (Z=1)
            0x26, 0x10, // BNE +$10 (not taken)
            0x27, 0x10, // BEQ +$10 (taken)
        ],
    );
    run(&mut cpu, &mut bus, 2);
    assert_eq!(cpu.pc, 0x0003);
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x0015);
    assert_eq!(cycles, 3);
}

#[test]
fn test_backward_branch_wraps() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(0, &[0x20, 0xFC]); // BRA -4
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0xFFFE);
}

#[test]
fn test_long_branch_extra_cycle_when_taken() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(
        0,
        &[
            0x4F, // CLRA
            0x10, 0x27, 0x01, 0x00, // LBEQ +$0100
        ],
    );
    run(&mut cpu, &mut bus, 1);
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x0105);
    assert_eq!(cycles, 6);

    let mut cpu = M6809::new();
    bus.load(0, &[0x16, 0x00, 0x10]); // LBRA +$10
    let cycles = run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x0013);
    assert_eq!(cycles, 5);
}

#[test]
fn test_signed_conditions() {
    let mut cpu = M6809::new();
    let mut bus = TestBus::new();
    bus.load(
        0,
        &[
            0x86, 0x80, // LDA #$80 (-128)
            0x81, 0x01, // CMPA #$01
            0x2D, 0x02, // BLT +2 (taken: -128 < 1)
            0x12, 0x12, // NOP NOP
            0x22, 0x02, // BHI +2 (taken: 0x80 > 0x01 unsigned)
        ],
    );
    run(&mut cpu, &mut bus, 3);
    assert_eq!(cpu.pc, 0x0008);
    run(&mut cpu, &mut bus, 1);
    assert_eq!(cpu.pc, 0x000C);
}
