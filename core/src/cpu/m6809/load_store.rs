use super::opcodes::{Acc, WordReg};
use super::{CcFlag, M6809, Operand};
use crate::core::{Bus, BusMaster};

impl M6809 {
    /// STA/STB: N, Z from the stored value, V cleared.
    pub(crate) fn op_store8<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        acc: Acc,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let value = match acc {
            Acc::A => self.a,
            Acc::B => self.b,
        };
        self.set_flags_logical(value);
        if let Operand::Address(addr) = operand {
            bus.write(master, addr, value);
        }
    }

    /// STD/STX/STY/STU/STS (big-endian).
    pub(crate) fn op_store16<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        reg: WordReg,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let value = self.word_register(reg);
        self.set_flags_logical16(value);
        if let Operand::Address(addr) = operand {
            Self::write_word(bus, master, addr, value);
        }
    }

    /// LEAX/LEAY set Z from the result; LEAS/LEAU leave CC alone.
    pub(crate) fn op_lea(&mut self, reg: WordReg, operand: Operand) {
        let Operand::Address(ea) = operand else {
            return;
        };
        self.set_word_register(reg, ea);
        if matches!(reg, WordReg::X | WordReg::Y) {
            self.set_flag(CcFlag::Z, ea == 0);
        }
    }
}
