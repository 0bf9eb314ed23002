//! CPU state snapshot types and traits

/// Trait for CPU types that can provide state snapshots
pub trait CpuStateTrait {
    type Snapshot;
    fn snapshot(&self) -> Self::Snapshot;
}

/// M6809 CPU state snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct M6809State {
    pub a: u8,   // Accumulator A
    pub b: u8,   // Accumulator B
    pub dp: u8,  // Direct Page register
    pub x: u16,  // Index register X
    pub y: u16,  // Index register Y
    pub u: u16,  // User stack pointer
    pub s: u16,  // Hardware stack pointer
    pub pc: u16, // Program counter
    pub cc: u8,  // Condition codes
}

impl M6809State {
    /// 16-bit accumulator D (A high, B low).
    pub fn d(&self) -> u16 {
        u16::from_be_bytes([self.a, self.b])
    }
}

impl std::fmt::Display for M6809State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "PC={:04X} A={:02X} B={:02X} DP={:02X} X={:04X} Y={:04X} U={:04X} S={:04X} CC={:02X}",
            self.pc, self.a, self.b, self.dp, self.x, self.y, self.u, self.s, self.cc
        )
    }
}
