use thiserror::Error;

use crate::core::{InterruptLine, InterruptLines};

/// Failures a peripheral reports through its own status. They never reach
/// the CPU as errors; software sees them only as status register bits.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeripheralError {
    #[error("drive {0} is not attached")]
    DriveNotAttached(u8),
    #[error("no media in drive {0}")]
    NoMedia(u8),
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),
}

/// Result of one `advance_state` poll.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PeripheralStatus {
    #[default]
    Idle,
    Busy,
    Complete,
    Failed(PeripheralError),
}

/// The narrow slice of the board a peripheral may touch: physical RAM for
/// DMA-style transfers, its interrupt sources, and the CPU HALT line.
pub struct PeripheralContext<'a> {
    ram: &'a mut [u8],
    interrupts: &'a mut InterruptLines,
    halt: &'a mut bool,
}

impl<'a> PeripheralContext<'a> {
    pub fn new(
        ram: &'a mut [u8],
        interrupts: &'a mut InterruptLines,
        halt: &'a mut bool,
    ) -> Self {
        Self {
            ram,
            interrupts,
            halt,
        }
    }

    /// Physical addresses wrap to the installed RAM size.
    pub fn read_physical(&self, addr: u32) -> u8 {
        match self.ram.len() {
            0 => 0xFF,
            len => self.ram[addr as usize % len],
        }
    }

    pub fn write_physical(&mut self, addr: u32, data: u8) {
        let len = self.ram.len();
        if len != 0 {
            self.ram[addr as usize % len] = data;
        }
    }

    pub fn assert_interrupt(&mut self, line: InterruptLine, source: u16) {
        self.interrupts.assert(line, source);
    }

    pub fn clear_interrupt(&mut self, line: InterruptLine, source: u16) {
        self.interrupts.clear(line, source);
    }

    /// Stall the CPU at its next instruction boundary.
    pub fn assert_halt(&mut self) {
        *self.halt = true;
    }

    pub fn release_halt(&mut self) {
        *self.halt = false;
    }

    pub fn halted(&self) -> bool {
        *self.halt
    }
}

/// A device reached through the FF40-FF8F register windows.
///
/// The board forwards every access whose address the peripheral claims and
/// polls `advance_state` once per master clock.
pub trait Peripheral {
    fn name(&self) -> &str;

    /// True when `addr` falls in one of this device's register windows.
    fn claims(&self, addr: u16) -> bool;

    fn register_read(&mut self, addr: u16, ctx: &mut PeripheralContext) -> u8;

    fn register_write(&mut self, addr: u16, data: u8, ctx: &mut PeripheralContext);

    fn advance_state(&mut self, _ctx: &mut PeripheralContext) -> PeripheralStatus {
        PeripheralStatus::Idle
    }

    fn reset(&mut self) {}
}
