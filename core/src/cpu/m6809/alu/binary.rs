use crate::cpu::m6809::{CcFlag, M6809};

impl M6809 {
    /// `a + m + carry_in`. Sets H, N, Z, V, C.
    pub(crate) fn add8(&mut self, a: u8, m: u8, carry_in: u8) -> u8 {
        let sum = a as u16 + m as u16 + carry_in as u16;
        let result = sum as u8;
        let half = (a & 0x0F) + (m & 0x0F) + carry_in > 0x0F;
        let overflow = (!(a ^ m) & (a ^ result)) & 0x80 != 0;
        self.set_flag(CcFlag::H, half);
        self.set_flags_arithmetic(result, overflow, sum > 0xFF);
        result
    }

    /// `a - m - borrow_in`. Sets N, Z, V, C (borrow); H is left alone.
    pub(crate) fn sub8(&mut self, a: u8, m: u8, borrow_in: u8) -> u8 {
        let subtrahend = m as u16 + borrow_in as u16;
        let result = (a as u16).wrapping_sub(subtrahend) as u8;
        let overflow = ((a ^ m) & (a ^ result)) & 0x80 != 0;
        self.set_flags_arithmetic(result, overflow, subtrahend > a as u16);
        result
    }

    /// AND/OR/EOR/LD/BIT result: N, Z from the value, V cleared.
    #[inline]
    pub(crate) fn logical8(&mut self, result: u8) -> u8 {
        self.set_flags_logical(result);
        result
    }
}
