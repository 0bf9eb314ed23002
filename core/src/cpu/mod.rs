use crate::core::component::BusMasterComponent;

/// Generic CPU interface
pub trait Cpu: BusMasterComponent + CpuStateTrait {
    /// Return to the power-on register state. The reset vector is fetched on
    /// the next step once the RESET line is asserted.
    fn reset(&mut self);

    /// Redirect execution to `pc` (program loaders only).
    fn force_pc(&mut self, pc: u16);

    /// Query if CPU is halted internally (CWAI, SYNC, invalid opcode)
    fn is_sleeping(&self) -> bool;
}

// Re-export state types
pub mod state;
pub use state::{CpuStateTrait, M6809State};

pub mod m6809;
pub use m6809::M6809;
