use super::opcodes::Condition;
use super::{CcFlag, Instruction, M6809, Operand};
use crate::core::{Bus, BusMaster};

impl M6809 {
    /// Evaluate a branch condition against CC.
    pub(crate) fn condition_met(&self, cond: Condition) -> bool {
        let c = self.flag(CcFlag::C);
        let v = self.flag(CcFlag::V);
        let z = self.flag(CcFlag::Z);
        let n = self.flag(CcFlag::N);
        match cond {
            Condition::Always => true,
            Condition::Never => false,
            Condition::Hi => !(c || z),
            Condition::Ls => c || z,
            Condition::Cc => !c,
            Condition::Cs => c,
            Condition::Ne => !z,
            Condition::Eq => z,
            Condition::Vc => !v,
            Condition::Vs => v,
            Condition::Pl => !n,
            Condition::Mi => n,
            Condition::Ge => n == v,
            Condition::Lt => n != v,
            Condition::Gt => !z && n == v,
            Condition::Le => z || n != v,
        }
    }

    pub(crate) fn op_branch(&mut self, cond: Condition, operand: Operand) {
        if let Operand::Address(target) = operand
            && self.condition_met(cond)
        {
            self.pc = target;
        }
    }

    /// Long branches. A taken conditional long branch costs one extra cycle;
    /// LBRA and LBRN do not.
    pub(crate) fn op_long_branch(&mut self, inst: &mut Instruction, cond: Condition, operand: Operand) {
        if let Operand::Address(target) = operand
            && self.condition_met(cond)
        {
            self.pc = target;
            if cond != Condition::Always {
                inst.cycles += 1;
            }
        }
    }

    pub(crate) fn op_jmp(&mut self, operand: Operand) {
        if let Operand::Address(target) = operand {
            self.pc = target;
        }
    }

    /// BSR, LBSR and JSR: push the return address on S and jump.
    pub(crate) fn op_call<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let Operand::Address(target) = operand else {
            return;
        };
        self.s = self.s.wrapping_sub(2);
        Self::write_word(bus, master, self.s, self.pc);
        self.pc = target;
    }
}
