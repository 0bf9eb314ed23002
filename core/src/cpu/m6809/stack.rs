use super::opcodes::StackReg;
use super::{CcFlag, Instruction, M6809, Operand, SoftHalt, stack_mask};
use crate::core::{Bus, BusMaster};

impl M6809 {
    // Multi-register transfer protocol shared by PSH/PUL, RTS/RTI, the SWIs,
    // CWAI and hardware interrupt entry. Push order is PC, U/S, Y, X, DP, B,
    // A, CC (stack grows down); pull is the exact reverse. Each word costs
    // two cycles and each byte one; the cost is returned to the caller.

    fn stack_pointer(&self, stack: StackReg) -> u16 {
        match stack {
            StackReg::S => self.s,
            StackReg::U => self.u,
        }
    }

    fn set_stack_pointer(&mut self, stack: StackReg, value: u16) {
        match stack {
            StackReg::S => self.s = value,
            StackReg::U => self.u = value,
        }
    }

    /// The register selected by the SU mask bit: U when using S, S when using U.
    fn other_stack_pointer(&self, stack: StackReg) -> u16 {
        match stack {
            StackReg::S => self.u,
            StackReg::U => self.s,
        }
    }

    fn set_other_stack_pointer(&mut self, stack: StackReg, value: u16) {
        match stack {
            StackReg::S => self.u = value,
            StackReg::U => self.s = value,
        }
    }

    pub(crate) fn push_registers<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: StackReg,
        mask: u8,
    ) -> u32 {
        let mut sp = self.stack_pointer(stack);
        let mut cycles = 0;

        let words = [
            (stack_mask::PC, self.pc),
            (stack_mask::SU, self.other_stack_pointer(stack)),
            (stack_mask::Y, self.y),
            (stack_mask::X, self.x),
        ];
        for (bit, value) in words {
            if mask & bit != 0 {
                sp = sp.wrapping_sub(2);
                Self::write_word(bus, master, sp, value);
                cycles += 2;
            }
        }

        let bytes = [
            (stack_mask::DP, self.dp),
            (stack_mask::B, self.b),
            (stack_mask::A, self.a),
            (stack_mask::CC, self.cc),
        ];
        for (bit, value) in bytes {
            if mask & bit != 0 {
                sp = sp.wrapping_sub(1);
                bus.write(master, sp, value);
                cycles += 1;
            }
        }

        self.set_stack_pointer(stack, sp);
        cycles
    }

    pub(crate) fn pull_registers<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
        stack: StackReg,
        mask: u8,
    ) -> u32 {
        let mut sp = self.stack_pointer(stack);
        let mut cycles = 0;

        for bit in [stack_mask::CC, stack_mask::A, stack_mask::B, stack_mask::DP] {
            if mask & bit == 0 {
                continue;
            }
            let value = bus.read(master, sp);
            sp = sp.wrapping_add(1);
            cycles += 1;
            match bit {
                stack_mask::CC => self.cc = value,
                stack_mask::A => self.a = value,
                stack_mask::B => self.b = value,
                _ => self.dp = value,
            }
        }

        for bit in [stack_mask::X, stack_mask::Y, stack_mask::SU, stack_mask::PC] {
            if mask & bit == 0 {
                continue;
            }
            let value = Self::read_word(bus, master, sp);
            sp = sp.wrapping_add(2);
            cycles += 2;
            match bit {
                stack_mask::X => self.x = value,
                stack_mask::Y => self.y = value,
                stack_mask::SU => self.set_other_stack_pointer(stack, value),
                _ => self.pc = value,
            }
        }

        self.set_stack_pointer(stack, sp);
        cycles
    }

    pub(crate) fn op_rts<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        bus: &mut B,
        master: BusMaster,
    ) {
        inst.cycles += self.pull_registers(bus, master, StackReg::S, stack_mask::PC);
    }

    /// RTI: pull CC, then the full frame if E is set or just PC if clear.
    pub(crate) fn op_rti<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        bus: &mut B,
        master: BusMaster,
    ) {
        inst.cycles += self.pull_registers(bus, master, StackReg::S, stack_mask::CC);
        let rest = if self.flag(CcFlag::E) {
            stack_mask::ALL & !stack_mask::CC
        } else {
            stack_mask::PC
        };
        inst.cycles += self.pull_registers(bus, master, StackReg::S, rest);
    }

    /// SWI/SWI2/SWI3: stack everything with E set. Only SWI masks IRQ and FIRQ.
    pub(crate) fn op_swi<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        bus: &mut B,
        master: BusMaster,
        vector: u16,
        mask_interrupts: bool,
    ) {
        self.set_flag(CcFlag::E, true);
        inst.cycles += self.push_registers(bus, master, StackReg::S, stack_mask::ALL);
        if mask_interrupts {
            self.set_flag(CcFlag::I, true);
            self.set_flag(CcFlag::F, true);
        }
        self.pc = Self::read_word(bus, master, vector);
    }

    /// CWAI: AND CC with the immediate, stack the entire state, then wait.
    pub(crate) fn op_cwai<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        self.cc &= Self::operand_byte(bus, master, operand);
        self.set_flag(CcFlag::E, true);
        inst.cycles += self.push_registers(bus, master, StackReg::S, stack_mask::ALL);
        self.halt = SoftHalt::CwaiWait;
    }
}
