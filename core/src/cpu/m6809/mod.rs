mod addressing;
mod alu;
mod branch;
mod load_store;
pub mod opcodes;
mod stack;
mod transfer;

pub use addressing::Operand;
pub use opcodes::{AddressingMode, OpcodeInfo};
pub use transfer::Register;

use crate::core::{
    Bus, BusMaster, InterruptLine, InterruptState,
    component::{BusMasterComponent, Component},
};
use crate::cpu::{
    Cpu,
    state::{CpuStateTrait, M6809State},
};
use opcodes::{Op, PAGE1, StackReg};

#[repr(u8)]
#[derive(Copy, Clone, Debug)]
pub enum CcFlag {
    C = 0x01, // Carry
    V = 0x02, // Overflow
    Z = 0x04, // Zero
    N = 0x08, // Negative
    I = 0x10, // IRQ mask
    H = 0x20, // Half carry
    F = 0x40, // FIRQ mask
    E = 0x80, // Entire
}

/// Interrupt and software-interrupt vector addresses.
pub mod vector {
    pub const SWI3: u16 = 0xFFF2;
    pub const SWI2: u16 = 0xFFF4;
    pub const FIRQ: u16 = 0xFFF6;
    pub const IRQ: u16 = 0xFFF8;
    pub const SWI: u16 = 0xFFFA;
    pub const NMI: u16 = 0xFFFC;
    pub const RESET: u16 = 0xFFFE;
}

/// Push/pull post-byte bits.
pub mod stack_mask {
    pub const CC: u8 = 0x01;
    pub const A: u8 = 0x02;
    pub const B: u8 = 0x04;
    pub const DP: u8 = 0x08;
    pub const X: u8 = 0x10;
    pub const Y: u8 = 0x20;
    /// The opposite stack pointer (U when stacking on S, S when stacking on U).
    pub const SU: u8 = 0x40;
    pub const PC: u8 = 0x80;
    pub const ALL: u8 = 0xFF;
}

/// Internal halt states that suspend fetch/execute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SoftHalt {
    #[default]
    None,
    /// CWAI executed; registers already stacked, waiting for an interrupt.
    CwaiWait,
    /// SYNC executed; any interrupt edge resumes execution.
    SyncWait,
    /// Undefined opcode fetched. Only RESET recovers.
    InvalidOpcode,
}

/// Working state for the instruction being executed.
pub(crate) struct Instruction {
    pub(crate) info: OpcodeInfo,
    /// Running cycle total: base cycles plus addressing and stacking surcharges.
    pub(crate) cycles: u32,
}

pub struct M6809 {
    // Registers (a,b,x,y,u,s,pc,cc)
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
    pub cc: u8,

    halt: SoftHalt,
    /// Ticks left before the next instruction boundary.
    pending_cycles: u32,
    total_cycles: u64,
    instructions: u64,
}

impl Default for M6809 {
    fn default() -> Self {
        Self::new()
    }
}

impl M6809 {
    pub fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            dp: 0,
            x: 0,
            y: 0,
            u: 0,
            s: 0,
            pc: 0,
            cc: CcFlag::E as u8,
            halt: SoftHalt::None,
            pending_cycles: 0,
            total_cycles: 0,
            instructions: 0,
        }
    }

    pub(crate) fn get_d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }

    pub(crate) fn set_d(&mut self, val: u16) {
        let bytes = val.to_be_bytes();
        self.a = bytes[0];
        self.b = bytes[1];
    }

    /// 16-bit accumulator D (A high, B low).
    pub fn d(&self) -> u16 {
        self.get_d()
    }

    #[inline]
    pub(crate) fn set_flag(&mut self, flag: CcFlag, set: bool) {
        if set {
            self.cc |= flag as u8
        } else {
            self.cc &= !(flag as u8)
        }
    }

    #[inline]
    pub fn flag(&self, flag: CcFlag) -> bool {
        self.cc & flag as u8 != 0
    }

    pub fn soft_halt(&self) -> SoftHalt {
        self.halt
    }

    /// Cycles still owed by the instruction in progress.
    pub fn pending_cycles(&self) -> u32 {
        self.pending_cycles
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn instructions_retired(&self) -> u64 {
        self.instructions
    }

    /// Execute one CPU clock.
    ///
    /// Burns a cycle of the instruction in progress, or at a boundary runs a
    /// full [`step`](Self::step) and charges its remaining cycles. Returns
    /// true when a step ran.
    pub fn execute_cycle<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> bool {
        if self.pending_cycles > 0 {
            self.pending_cycles -= 1;
            return false;
        }
        if bus.is_halted_for(master) {
            return false;
        }
        let cycles = self.step(bus, master);
        self.pending_cycles = cycles.saturating_sub(1);
        true
    }

    /// Interrupt check, then fetch/decode/execute one instruction unless
    /// soft-halted. Returns the cycles charged.
    pub fn step<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        let ints = bus.check_interrupts(master);
        let mut cycles = self.service_interrupts(ints, bus, master);

        if self.halt != SoftHalt::None {
            self.total_cycles += cycles as u64;
            return cycles;
        }

        let start_pc = self.pc;
        let first = self.fetch_byte(bus, master);
        let (opcode, info) = if first == 0x10 || first == 0x11 {
            let second = self.fetch_byte(bus, master);
            match opcodes::lookup_prefixed(first, second) {
                Some(info) => (u16::from_be_bytes([first, second]), Some(info)),
                // Undefined prefixed pair: run the second byte as a page-1 opcode.
                None => (second as u16, PAGE1[second as usize]),
            }
        } else {
            (first as u16, PAGE1[first as usize])
        };

        let Some(info) = info else {
            log::error!("invalid opcode {opcode:02X} at {start_pc:04X}, halting CPU");
            self.halt = SoftHalt::InvalidOpcode;
            self.total_cycles += cycles as u64;
            return cycles;
        };

        let mut inst = Instruction {
            info,
            cycles: info.cycles as u32,
        };
        let operand = self.resolve(&mut inst, bus, master);
        log::trace!("{start_pc:04X}: {} {operand:?}", info.mnemonic);
        self.execute(&mut inst, operand, bus, master);

        cycles += inst.cycles;
        self.total_cycles += cycles as u64;
        self.instructions += 1;
        cycles
    }

    /// Service at most one interrupt line, in the order NMI, FIRQ, IRQ, RESET.
    /// A masked FIRQ/IRQ still releases SYNC-wait and lets lower lines through.
    fn service_interrupts<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        ints: InterruptState,
        bus: &mut B,
        master: BusMaster,
    ) -> u32 {
        let mut cycles = 0;
        let in_cwai = self.halt == SoftHalt::CwaiWait;
        // A CPU stopped on an undefined opcode answers only RESET.
        let live = self.halt != SoftHalt::InvalidOpcode;

        if ints.nmi && live {
            if !in_cwai {
                self.set_flag(CcFlag::E, true);
                cycles += self.push_registers(bus, master, StackReg::S, stack_mask::ALL);
            }
            self.set_flag(CcFlag::F, true);
            self.set_flag(CcFlag::I, true);
            self.enter_vector(bus, master, vector::NMI);
            bus.acknowledge_interrupt(master, InterruptLine::Nmi);
            return cycles;
        }

        if ints.firq && live {
            if !self.flag(CcFlag::F) {
                if !in_cwai {
                    self.set_flag(CcFlag::E, false);
                    cycles += self.push_registers(
                        bus,
                        master,
                        StackReg::S,
                        stack_mask::PC | stack_mask::CC,
                    );
                }
                self.set_flag(CcFlag::F, true);
                self.set_flag(CcFlag::I, true);
                self.enter_vector(bus, master, vector::FIRQ);
                return cycles;
            }
            self.release_sync();
        }

        if ints.irq && live {
            if !self.flag(CcFlag::I) {
                if !in_cwai {
                    self.set_flag(CcFlag::E, true);
                    cycles += self.push_registers(bus, master, StackReg::S, stack_mask::ALL);
                }
                self.set_flag(CcFlag::I, true);
                self.enter_vector(bus, master, vector::IRQ);
                return cycles;
            }
            self.release_sync();
        }

        if ints.reset {
            self.dp = 0;
            self.set_flag(CcFlag::F, true);
            self.set_flag(CcFlag::I, true);
            self.enter_vector(bus, master, vector::RESET);
            bus.acknowledge_interrupt(master, InterruptLine::Reset);
            log::debug!("CPU reset, PC={:04X}", self.pc);
            cycles += 2;
        }

        cycles
    }

    fn enter_vector<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        vector: u16,
    ) {
        self.halt = SoftHalt::None;
        self.pc = Self::read_word(bus, master, vector);
    }

    fn release_sync(&mut self) {
        if self.halt == SoftHalt::SyncWait {
            self.halt = SoftHalt::None;
        }
    }

    fn execute<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        match inst.info.op {
            Op::Unary(op, target) => self.op_unary(op, target, operand, bus, master),
            Op::Alu8(op, acc) => self.op_alu8(op, acc, operand, bus, master),
            Op::Store8(acc) => self.op_store8(acc, operand, bus, master),
            Op::Alu16(op, reg) => self.op_alu16(op, reg, operand, bus, master),
            Op::Store16(reg) => self.op_store16(reg, operand, bus, master),
            Op::Lea(reg) => self.op_lea(reg, operand),
            Op::Branch(cond) => self.op_branch(cond, operand),
            Op::LongBranch(cond) => self.op_long_branch(inst, cond, operand),
            Op::Bsr | Op::Lbsr | Op::Jsr => self.op_call(operand, bus, master),
            Op::Jmp => self.op_jmp(operand),
            Op::Rts => self.op_rts(inst, bus, master),
            Op::Rti => self.op_rti(inst, bus, master),
            Op::Swi => self.op_swi(inst, bus, master, vector::SWI, true),
            Op::Swi2 => self.op_swi(inst, bus, master, vector::SWI2, false),
            Op::Swi3 => self.op_swi(inst, bus, master, vector::SWI3, false),
            Op::Cwai => self.op_cwai(inst, operand, bus, master),
            Op::Sync => self.halt = SoftHalt::SyncWait,
            Op::Nop => {}
            Op::Daa => self.op_daa(),
            Op::Orcc => self.cc |= Self::operand_byte(bus, master, operand),
            Op::Andcc => self.cc &= Self::operand_byte(bus, master, operand),
            Op::Sex => self.op_sex(),
            Op::Exg => self.op_exg(Self::operand_byte(bus, master, operand)),
            Op::Tfr => self.op_tfr(Self::operand_byte(bus, master, operand)),
            Op::Abx => self.x = self.x.wrapping_add(self.b as u16),
            Op::Mul => self.op_mul(),
            Op::Psh(stack) => {
                let mask = Self::operand_byte(bus, master, operand);
                inst.cycles += self.push_registers(bus, master, stack, mask);
            }
            Op::Pul(stack) => {
                let mask = Self::operand_byte(bus, master, operand);
                inst.cycles += self.pull_registers(bus, master, stack, mask);
            }
        }
    }
}

impl Component for M6809 {
    fn tick(&mut self) -> bool {
        // Clock-domain only ticks (no bus); use tick_with_bus to execute
        false
    }
}

impl BusMasterComponent for M6809 {
    type Bus = dyn Bus<Address = u16, Data = u8>;

    fn tick_with_bus(&mut self, bus: &mut Self::Bus, master: BusMaster) -> bool {
        self.execute_cycle(bus, master)
    }
}

impl Cpu for M6809 {
    fn reset(&mut self) {
        let total_cycles = self.total_cycles;
        *self = Self::new();
        self.cc |= CcFlag::I as u8 | CcFlag::F as u8;
        self.total_cycles = total_cycles;
    }

    fn force_pc(&mut self, pc: u16) {
        self.pc = pc;
        self.pending_cycles = 0;
        self.halt = SoftHalt::None;
    }

    fn is_sleeping(&self) -> bool {
        self.halt != SoftHalt::None
    }
}

impl CpuStateTrait for M6809 {
    type Snapshot = M6809State;

    fn snapshot(&self) -> M6809State {
        M6809State {
            a: self.a,
            b: self.b,
            dp: self.dp,
            x: self.x,
            y: self.y,
            u: self.u,
            s: self.s,
            pc: self.pc,
            cc: self.cc,
        }
    }
}
