use super::opcodes::{Acc, AluOp};
use super::{CcFlag, M6809, Operand};
use crate::core::{Bus, BusMaster};

mod binary;
mod shift;
mod unary;
mod word;

impl M6809 {
    /// Helper to set N, Z, V (cleared) flags for logical operations
    #[inline]
    pub(crate) fn set_flags_logical(&mut self, result: u8) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, false);
    }

    /// Helper to set N, Z, V, C flags for arithmetic operations
    #[inline]
    pub(crate) fn set_flags_arithmetic(&mut self, result: u8, overflow: bool, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        self.set_flag(CcFlag::C, carry);
    }

    /// Helper to set N, Z, V, C flags for 16-bit arithmetic
    #[inline]
    pub(crate) fn set_flags_arithmetic16(&mut self, result: u16, overflow: bool, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x8000 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, overflow);
        self.set_flag(CcFlag::C, carry);
    }

    /// Helper to set N, Z, V (cleared) flags for 16-bit logical operations
    #[inline]
    pub(crate) fn set_flags_logical16(&mut self, result: u16) {
        self.set_flag(CcFlag::N, result & 0x8000 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, false);
    }

    fn accumulator(&self, acc: Acc) -> u8 {
        match acc {
            Acc::A => self.a,
            Acc::B => self.b,
        }
    }

    fn set_accumulator(&mut self, acc: Acc, value: u8) {
        match acc {
            Acc::A => self.a = value,
            Acc::B => self.b = value,
        }
    }

    /// 8-bit accumulator instructions in every addressing mode.
    pub(crate) fn op_alu8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: AluOp,
        acc: Acc,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let m = Self::operand_byte(bus, master, operand);
        let r = self.accumulator(acc);
        let carry = self.flag(CcFlag::C) as u8;
        let result = match op {
            AluOp::Add => self.add8(r, m, 0),
            AluOp::Adc => self.add8(r, m, carry),
            AluOp::Sub => self.sub8(r, m, 0),
            AluOp::Sbc => self.sub8(r, m, carry),
            AluOp::Cmp => {
                self.sub8(r, m, 0);
                return;
            }
            AluOp::And => self.logical8(r & m),
            AluOp::Or => self.logical8(r | m),
            AluOp::Eor => self.logical8(r ^ m),
            AluOp::Bit => {
                self.logical8(r & m);
                return;
            }
            AluOp::Ld => self.logical8(m),
        };
        self.set_accumulator(acc, result);
    }

    /// DAA: BCD-correct A after an addition.
    pub(crate) fn op_daa(&mut self) {
        let high = self.a >> 4;
        let low = self.a & 0x0F;
        let mut correction: u16 = 0;
        if self.flag(CcFlag::C) || high > 9 || (high > 8 && low > 9) {
            correction |= 0x60;
        }
        if self.flag(CcFlag::H) || low > 9 {
            correction |= 0x06;
        }
        let result = self.a as u16 + correction;
        self.a = result as u8;
        self.set_flag(CcFlag::N, self.a & 0x80 != 0);
        self.set_flag(CcFlag::Z, self.a == 0);
        if result > 0xFF {
            self.set_flag(CcFlag::C, true);
        }
    }

    /// MUL: D = A * B (unsigned). C mirrors bit 7 of the low byte.
    pub(crate) fn op_mul(&mut self) {
        let product = self.a as u16 * self.b as u16;
        self.set_d(product);
        self.set_flag(CcFlag::Z, product == 0);
        self.set_flag(CcFlag::C, product & 0x0080 != 0);
    }

    /// SEX: sign-extend B into A.
    pub(crate) fn op_sex(&mut self) {
        self.a = if self.b & 0x80 != 0 { 0xFF } else { 0x00 };
        self.set_flag(CcFlag::N, self.b & 0x80 != 0);
        self.set_flag(CcFlag::Z, self.get_d() == 0);
    }
}
