use super::M6809;

/// TFR/EXG register codes (one nibble of the post-byte).
///
/// Codes 6-7 and 12-15 name no register: they read as 0xFFFF / 0xFF and
/// writes to them are discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    D,
    X,
    Y,
    U,
    S,
    Pc,
    InvalidWord,
    A,
    B,
    Cc,
    Dp,
    InvalidByte,
}

impl Register {
    pub fn from_code(code: u8) -> Register {
        match code & 0x0F {
            0x0 => Register::D,
            0x1 => Register::X,
            0x2 => Register::Y,
            0x3 => Register::U,
            0x4 => Register::S,
            0x5 => Register::Pc,
            0x6 | 0x7 => Register::InvalidWord,
            0x8 => Register::A,
            0x9 => Register::B,
            0xA => Register::Cc,
            0xB => Register::Dp,
            _ => Register::InvalidByte,
        }
    }

    pub fn is_word(self) -> bool {
        matches!(
            self,
            Register::D
                | Register::X
                | Register::Y
                | Register::U
                | Register::S
                | Register::Pc
                | Register::InvalidWord
        )
    }

    /// Value a byte register contributes when widened to 16 bits: CC and DP
    /// duplicate into both halves, A and B get a 0xFF high byte, and the
    /// invalid code yields 0xFFFF.
    fn widen(self, value: u8) -> u16 {
        match self {
            Register::Cc | Register::Dp => u16::from_be_bytes([value, value]),
            Register::A | Register::B => 0xFF00 | value as u16,
            _ => 0xFFFF,
        }
    }
}

impl M6809 {
    pub fn read_register(&self, reg: Register) -> u16 {
        match reg {
            Register::D => self.get_d(),
            Register::X => self.x,
            Register::Y => self.y,
            Register::U => self.u,
            Register::S => self.s,
            Register::Pc => self.pc,
            Register::InvalidWord => 0xFFFF,
            Register::A => self.a as u16,
            Register::B => self.b as u16,
            Register::Cc => self.cc as u16,
            Register::Dp => self.dp as u16,
            Register::InvalidByte => 0xFF,
        }
    }

    /// Byte registers take the low byte of `value`.
    pub fn write_register(&mut self, reg: Register, value: u16) {
        match reg {
            Register::D => self.set_d(value),
            Register::X => self.x = value,
            Register::Y => self.y = value,
            Register::U => self.u = value,
            Register::S => self.s = value,
            Register::Pc => self.pc = value,
            Register::A => self.a = value as u8,
            Register::B => self.b = value as u8,
            Register::Cc => self.cc = value as u8,
            Register::Dp => self.dp = value as u8,
            Register::InvalidWord | Register::InvalidByte => {}
        }
    }

    /// TFR: post-byte high nibble is the source, low nibble the destination.
    pub(crate) fn op_tfr(&mut self, postbyte: u8) {
        let src = Register::from_code(postbyte >> 4);
        let dst = Register::from_code(postbyte);
        let value = self.read_register(src);
        let value = match (src.is_word(), dst.is_word()) {
            (false, true) => src.widen(value as u8),
            _ => value,
        };
        self.write_register(dst, value);
    }

    /// EXG: swap two registers, applying the TFR widening rules when the
    /// sizes differ.
    pub(crate) fn op_exg(&mut self, postbyte: u8) {
        let first = Register::from_code(postbyte >> 4);
        let second = Register::from_code(postbyte);

        // EXG A,D behaves as EXG A,B.
        if first == Register::A && second == Register::D {
            std::mem::swap(&mut self.a, &mut self.b);
            return;
        }

        let v1 = self.read_register(first);
        let v2 = self.read_register(second);
        match (first.is_word(), second.is_word()) {
            (false, true) => {
                self.write_register(first, v2);
                self.write_register(second, first.widen(v1 as u8));
            }
            (true, false) => {
                self.write_register(first, 0xFF00 | v2);
                self.write_register(second, v1);
            }
            _ => {
                self.write_register(first, v2);
                self.write_register(second, v1);
            }
        }
    }
}
