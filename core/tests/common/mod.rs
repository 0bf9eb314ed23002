#![allow(dead_code)]

use coco3_core::core::{Bus, BusMaster, InterruptLine, InterruptLines, bus::InterruptState};
use coco3_core::cpu::M6809;

/// Minimal bus for testing: flat 64KB read/write memory, driveable
/// interrupt lines and a hardware HALT switch.
pub struct TestBus {
    pub memory: [u8; 0x10000],
    pub lines: InterruptLines,
    pub halted: bool,
}

impl TestBus {
    pub fn new() -> Self {
        Self {
            memory: [0; 0x10000],
            lines: InterruptLines::new(),
            halted: false,
        }
    }

    pub fn load(&mut self, addr: u16, data: &[u8]) {
        let start = addr as usize;
        self.memory[start..start + data.len()].copy_from_slice(data);
    }

    pub fn set_vector(&mut self, vector: u16, target: u16) {
        self.load(vector, &target.to_be_bytes());
    }

    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_be_bytes([
            self.memory[addr as usize],
            self.memory[addr.wrapping_add(1) as usize],
        ])
    }
}

impl Bus for TestBus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        self.memory[addr as usize]
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        self.memory[addr as usize] = data;
    }

    fn is_halted_for(&self, _master: BusMaster) -> bool {
        self.halted
    }

    fn check_interrupts(&self, _target: BusMaster) -> InterruptState {
        self.lines.state()
    }

    fn acknowledge_interrupt(&mut self, _target: BusMaster, line: InterruptLine) {
        if matches!(line, InterruptLine::Nmi | InterruptLine::Reset) {
            self.lines.clear_line(line);
        }
    }
}

pub const CPU: BusMaster = BusMaster::Cpu(0);

/// Run `count` whole instructions, returning the cycles charged.
pub fn run(cpu: &mut M6809, bus: &mut TestBus, count: usize) -> u32 {
    (0..count).map(|_| cpu.step(bus, CPU)).sum()
}
