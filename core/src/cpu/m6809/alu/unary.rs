use crate::core::{Bus, BusMaster};
use crate::cpu::m6809::opcodes::{Target, UnaryOp};
use crate::cpu::m6809::{CcFlag, M6809, Operand};

impl M6809 {
    /// Read-modify-write on A, B or memory. TST only reads; CLR still
    /// performs the dummy read of the memory operand.
    pub(crate) fn op_unary<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        op: UnaryOp,
        target: Target,
        operand: Operand,
        bus: &mut B,
        master: BusMaster,
    ) {
        let value = match target {
            Target::A => self.a,
            Target::B => self.b,
            Target::Memory => Self::operand_byte(bus, master, operand),
        };

        let result = match op {
            UnaryOp::Neg => self.perform_neg(value),
            UnaryOp::Com => self.perform_com(value),
            UnaryOp::Lsr => self.perform_lsr(value),
            UnaryOp::Ror => self.perform_ror(value),
            UnaryOp::Asr => self.perform_asr(value),
            UnaryOp::Asl => self.perform_asl(value),
            UnaryOp::Rol => self.perform_rol(value),
            UnaryOp::Dec => self.perform_dec(value),
            UnaryOp::Inc => self.perform_inc(value),
            UnaryOp::Clr => self.perform_clr(),
            UnaryOp::Tst => {
                self.set_flags_logical(value);
                return;
            }
        };

        match target {
            Target::A => self.a = result,
            Target::B => self.b = result,
            Target::Memory => {
                if let Operand::Address(addr) = operand {
                    bus.write(master, addr, result);
                }
            }
        }
    }

    /// NEG: two's complement. C = input was non-zero, V = input was 0x80.
    #[inline]
    fn perform_neg(&mut self, val: u8) -> u8 {
        let result = 0u8.wrapping_sub(val);
        self.set_flags_arithmetic(result, val == 0x80, val != 0);
        result
    }

    #[inline]
    fn perform_com(&mut self, val: u8) -> u8 {
        let result = !val;
        self.set_flags_arithmetic(result, false, true);
        result
    }

    /// INC: C unaffected, V when crossing 0x7F -> 0x80.
    #[inline]
    fn perform_inc(&mut self, val: u8) -> u8 {
        let result = val.wrapping_add(1);
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, val == 0x7F);
        result
    }

    /// DEC: C unaffected, V when crossing 0x80 -> 0x7F.
    #[inline]
    fn perform_dec(&mut self, val: u8) -> u8 {
        let result = val.wrapping_sub(1);
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::V, val == 0x80);
        result
    }

    #[inline]
    fn perform_clr(&mut self) -> u8 {
        self.set_flags_arithmetic(0, false, false);
        0
    }
}
