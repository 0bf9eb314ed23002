use crate::cpu::m6809::{CcFlag, M6809};

impl M6809 {
    // --- Internal Shift/Rotate Helpers ---
    // LSR, ASR and ROR leave V alone; ASL and ROL set V = bit7 ^ bit6 of the input.

    #[inline]
    fn set_flags_shift(&mut self, result: u8, carry: bool) {
        self.set_flag(CcFlag::N, result & 0x80 != 0);
        self.set_flag(CcFlag::Z, result == 0);
        self.set_flag(CcFlag::C, carry);
    }

    #[inline]
    pub(crate) fn perform_asl(&mut self, val: u8) -> u8 {
        let result = val << 1;
        self.set_flags_shift(result, val & 0x80 != 0);
        self.set_flag(CcFlag::V, (val ^ (val << 1)) & 0x80 != 0);
        result
    }

    #[inline]
    pub(crate) fn perform_asr(&mut self, val: u8) -> u8 {
        let result = ((val as i8) >> 1) as u8;
        self.set_flags_shift(result, val & 0x01 != 0);
        result
    }

    #[inline]
    pub(crate) fn perform_lsr(&mut self, val: u8) -> u8 {
        let result = val >> 1;
        self.set_flags_shift(result, val & 0x01 != 0);
        result
    }

    #[inline]
    pub(crate) fn perform_rol(&mut self, val: u8) -> u8 {
        let old_carry = self.flag(CcFlag::C) as u8;
        let result = (val << 1) | old_carry;
        self.set_flags_shift(result, val & 0x80 != 0);
        self.set_flag(CcFlag::V, (val ^ (val << 1)) & 0x80 != 0);
        result
    }

    #[inline]
    pub(crate) fn perform_ror(&mut self, val: u8) -> u8 {
        let old_carry = self.flag(CcFlag::C) as u8;
        let result = (val >> 1) | (old_carry << 7);
        self.set_flags_shift(result, val & 0x01 != 0);
        result
    }
}
