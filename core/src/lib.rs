pub mod core;
pub mod cpu;
pub mod device;

pub mod prelude {
    pub use crate::core::machine::{InputButton, Machine};
    pub use crate::core::{
        Bus, BusMaster, BusMasterComponent, Component, InterruptLine, InterruptLines,
        InterruptState, bus::source,
    };
    pub use crate::cpu::{Cpu, CpuStateTrait, M6809, M6809State};
}
