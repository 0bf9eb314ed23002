use super::opcodes::{AddressingMode, Op, WordReg};
use super::{Instruction, M6809};
use crate::core::{Bus, BusMaster};

/// Result of addressing-mode resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Inherent instructions carry no operand.
    None,
    /// Immediate byte, including TFR/EXG and push/pull post-bytes.
    Byte(u8),
    /// Immediate word.
    Word(u16),
    /// Effective address (direct, extended, indexed, relative).
    Address(u16),
}

/// Index register selected by bits 6..5 of an indexed post-byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum IndexReg {
    X,
    Y,
    U,
    S,
}

impl IndexReg {
    fn from_postbyte(postbyte: u8) -> Self {
        match (postbyte >> 5) & 0x03 {
            0 => IndexReg::X,
            1 => IndexReg::Y,
            2 => IndexReg::U,
            _ => IndexReg::S,
        }
    }

    fn as_word_reg(self) -> WordReg {
        match self {
            IndexReg::X => WordReg::X,
            IndexReg::Y => WordReg::Y,
            IndexReg::U => WordReg::U,
            IndexReg::S => WordReg::S,
        }
    }
}

impl M6809 {
    #[inline]
    pub(crate) fn fetch_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u8 {
        let value = bus.read(master, self.pc);
        self.pc = self.pc.wrapping_add(1);
        value
    }

    #[inline]
    pub(crate) fn fetch_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        bus: &mut B,
        master: BusMaster,
    ) -> u16 {
        let hi = self.fetch_byte(bus, master);
        let lo = self.fetch_byte(bus, master);
        u16::from_be_bytes([hi, lo])
    }

    /// Big-endian word read; the second byte comes from `addr + 1` modulo 64K.
    #[inline]
    pub(crate) fn read_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        bus: &mut B,
        master: BusMaster,
        addr: u16,
    ) -> u16 {
        let hi = bus.read(master, addr);
        let lo = bus.read(master, addr.wrapping_add(1));
        u16::from_be_bytes([hi, lo])
    }

    #[inline]
    pub(crate) fn write_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        bus: &mut B,
        master: BusMaster,
        addr: u16,
        value: u16,
    ) {
        let [hi, lo] = value.to_be_bytes();
        bus.write(master, addr, hi);
        bus.write(master, addr.wrapping_add(1), lo);
    }

    /// Consume the operand bytes for `inst` and produce its operand. Extra
    /// cycles charged by the mode are added to `inst.cycles`.
    pub(crate) fn resolve<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        bus: &mut B,
        master: BusMaster,
    ) -> Operand {
        match inst.info.mode {
            AddressingMode::Inherent => Operand::None,
            AddressingMode::ImmediateByte
            | AddressingMode::ImmediateRegs
            | AddressingMode::ImmediateStack => Operand::Byte(self.fetch_byte(bus, master)),
            AddressingMode::ImmediateWord => Operand::Word(self.fetch_word(bus, master)),
            AddressingMode::Direct => {
                let low = self.fetch_byte(bus, master);
                Operand::Address(u16::from_be_bytes([self.dp, low]))
            }
            AddressingMode::Extended => Operand::Address(self.fetch_word(bus, master)),
            AddressingMode::RelativeByte => {
                let offset = self.fetch_byte(bus, master) as i8;
                Operand::Address(self.pc.wrapping_add(offset as i16 as u16))
            }
            AddressingMode::RelativeWord => {
                let offset = self.fetch_word(bus, master);
                Operand::Address(self.pc.wrapping_add(offset))
            }
            AddressingMode::Indexed => Operand::Address(self.resolve_indexed(inst, bus, master)),
        }
    }

    fn index_value(&self, reg: IndexReg) -> u16 {
        match reg {
            IndexReg::X => self.x,
            IndexReg::Y => self.y,
            IndexReg::U => self.u,
            IndexReg::S => self.s,
        }
    }

    fn set_index_value(&mut self, reg: IndexReg, value: u16) {
        match reg {
            IndexReg::X => self.x = value,
            IndexReg::Y => self.y = value,
            IndexReg::U => self.u = value,
            IndexReg::S => self.s = value,
        }
    }

    /// Indexed post-byte decode.
    ///
    /// | post-byte (reg bits masked) | form         | extra cycles |
    /// |-----------------------------|--------------|--------------|
    /// | 0rrnnnnn                    | n5,R         | 1            |
    /// | 1rr00100 / 1rr10100         | ,R / [,R]    | 0 / 3        |
    /// | 1rr01000 / 1rr11000         | n8,R         | 1 / 4        |
    /// | 1rr01001 / 1rr11001         | n16,R        | 4 / 7        |
    /// | 1rr00110 / 1rr10110         | A,R          | 1 / 4        |
    /// | 1rr00101 / 1rr10101         | B,R          | 1 / 4        |
    /// | 1rr01011 / 1rr11011         | D,R          | 4 / 7        |
    /// | 1rr00000                    | ,R+          | 2            |
    /// | 1rr00001 / 1rr10001         | ,R++         | 3 / 6        |
    /// | 1rr00010                    | ,-R          | 2            |
    /// | 1rr00011 / 1rr10011         | ,--R         | 3 / 6        |
    /// | 1xx01100 / 1xx11100         | n8,PCR       | 1 / 4        |
    /// | 1xx01101 / 1xx11101         | n16,PCR      | 5 / 8        |
    /// | 1xx11111                    | [n16]        | 5            |
    ///
    /// Auto-increment and auto-decrement leave R untouched when the
    /// instruction is a LEA whose destination is R itself.
    fn resolve_indexed<B: Bus<Address = u16, Data = u8> + ?Sized>(
        &mut self,
        inst: &mut Instruction,
        bus: &mut B,
        master: BusMaster,
    ) -> u16 {
        let postbyte = self.fetch_byte(bus, master);
        let reg = IndexReg::from_postbyte(postbyte);
        let base = self.index_value(reg);

        if postbyte & 0x80 == 0 {
            // 5-bit signed offset: sign-extend bit 4.
            let offset = (((postbyte & 0x1F) << 3) as i8 >> 3) as i16 as u16;
            inst.cycles += 1;
            return base.wrapping_add(offset);
        }

        let lea_self = matches!(inst.info.op, Op::Lea(target) if target == reg.as_word_reg());
        let indirect = postbyte & 0x10 != 0;

        let (address, extra) = match postbyte & 0x0F {
            0x04 => (base, 0),
            0x08 => {
                let offset = self.fetch_byte(bus, master) as i8 as i16 as u16;
                (base.wrapping_add(offset), 1)
            }
            0x09 => {
                let offset = self.fetch_word(bus, master);
                (base.wrapping_add(offset), 4)
            }
            0x06 => (base.wrapping_add(self.a as i8 as i16 as u16), 1),
            0x05 => (base.wrapping_add(self.b as i8 as i16 as u16), 1),
            0x0B => (base.wrapping_add(self.get_d()), 4),
            0x00 if !indirect => {
                if !lea_self {
                    self.set_index_value(reg, base.wrapping_add(1));
                }
                (base, 2)
            }
            0x01 => {
                if !lea_self || indirect {
                    self.set_index_value(reg, base.wrapping_add(2));
                }
                (base, 3)
            }
            0x02 if !indirect => {
                let address = base.wrapping_sub(1);
                if !lea_self {
                    self.set_index_value(reg, address);
                }
                (address, 2)
            }
            0x03 => {
                let address = base.wrapping_sub(2);
                if !lea_self || indirect {
                    self.set_index_value(reg, address);
                }
                (address, 3)
            }
            0x0C => {
                let offset = self.fetch_byte(bus, master) as i8 as i16 as u16;
                (self.pc.wrapping_add(offset), 1)
            }
            0x0D => {
                let offset = self.fetch_word(bus, master);
                (self.pc.wrapping_add(offset), 5)
            }
            0x0F if indirect => {
                // Extended indirect: the indirect surcharge is folded in below.
                let address = self.fetch_word(bus, master);
                (address, 2)
            }
            _ => {
                log::warn!(
                    "undefined indexed post-byte {postbyte:02X} at {:04X}",
                    self.pc.wrapping_sub(1)
                );
                return base;
            }
        };

        if indirect {
            inst.cycles += extra + 3;
            Self::read_word(bus, master, address)
        } else {
            inst.cycles += extra;
            address
        }
    }

    /// Byte operand: the literal for immediate modes, else a bus read.
    #[inline]
    pub(crate) fn operand_byte<B: Bus<Address = u16, Data = u8> + ?Sized>(
        bus: &mut B,
        master: BusMaster,
        operand: Operand,
    ) -> u8 {
        match operand {
            Operand::Byte(value) => value,
            Operand::Word(value) => value as u8,
            Operand::Address(addr) => bus.read(master, addr),
            Operand::None => 0,
        }
    }

    /// Word operand: the literal for immediate modes, else a big-endian read.
    #[inline]
    pub(crate) fn operand_word<B: Bus<Address = u16, Data = u8> + ?Sized>(
        bus: &mut B,
        master: BusMaster,
        operand: Operand,
    ) -> u16 {
        match operand {
            Operand::Word(value) => value,
            Operand::Byte(value) => value as u16,
            Operand::Address(addr) => Self::read_word(bus, master, addr),
            Operand::None => 0,
        }
    }
}
