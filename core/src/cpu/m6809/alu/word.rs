use crate::core::{Bus, BusMaster};
use crate::cpu::m6809::opcodes::{WordOp, WordReg};
use crate::cpu::m6809::{M6809, Operand};

impl M6809 {
    pub(crate) fn word_register(&self, reg: WordReg) -> u16 {
        match reg {
            WordReg::D => self.get_d(),
            WordReg::X => self.x,
            WordReg::Y => self.y,
            WordReg::U => self.u,
            WordReg::S => self.s,
        }
    }

    pub(crate) fn set_word_register(&mut self, reg: WordReg, value: u16) {
        match reg {
            WordReg::D => self.set_d(value),
            WordReg::X => self.x = value,
            WordReg::Y => self.y = value,
            WordReg::U => self.u = value,
            WordReg::S => self.s = value,
        }
    }

    /// ADDD, SUBD, CMPD/X/Y/U/S and the 16-bit loads.
    pub(crate) fn op_alu16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: WordOp,
        reg: WordReg,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let m = Self::operand_word(bus, master, operand);
        let r = self.word_register(reg);
        match op {
            WordOp::Add => {
                let result = self.add16(r, m);
                self.set_word_register(reg, result);
            }
            WordOp::Sub => {
                let result = self.sub16(r, m);
                self.set_word_register(reg, result);
            }
            WordOp::Cmp => {
                self.sub16(r, m);
            }
            WordOp::Ld => {
                self.set_flags_logical16(m);
                self.set_word_register(reg, m);
            }
        }
    }

    pub(crate) fn add16(&mut self, a: u16, m: u16) -> u16 {
        let sum = a as u32 + m as u32;
        let result = sum as u16;
        let overflow = (!(a ^ m) & (a ^ result)) & 0x8000 != 0;
        self.set_flags_arithmetic16(result, overflow, sum > 0xFFFF);
        result
    }

    pub(crate) fn sub16(&mut self, a: u16, m: u16) -> u16 {
        let result = a.wrapping_sub(m);
        let overflow = ((a ^ m) & (a ^ result)) & 0x8000 != 0;
        self.set_flags_arithmetic16(result, overflow, m > a);
        result
    }
}
