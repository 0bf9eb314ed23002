/// Identifies who is accessing the bus (CPU or a DMA-capable peripheral)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusMaster {
    Cpu(usize), // CPU 0, CPU 1, etc.
    Dma,        // Peripheral transfers into physical memory (disk sector buffers)
}

/// Generic bus interface supporting hardware halt and interrupt polling.
pub trait Bus {
    type Address: Copy + Into<u64>; // u16 for 8-bit CPUs
    type Data; // u8

    fn read(&mut self, master: BusMaster, addr: Self::Address) -> Self::Data;
    fn write(&mut self, master: BusMaster, addr: Self::Address, data: Self::Data);

    /// Check if the bus is halted for this master (peripheral-asserted HALT).
    /// Returns true if the master must not start its next instruction.
    fn is_halted_for(&self, master: BusMaster) -> bool;

    /// Snapshot of which interrupt lines have at least one source asserted.
    fn check_interrupts(&self, target: BusMaster) -> InterruptState;

    /// Called by the CPU once it has serviced an edge-style line (NMI, RESET)
    /// so the latch can be dropped. Level lines are cleared by their sources.
    fn acknowledge_interrupt(&mut self, _target: BusMaster, _line: InterruptLine) {}
}

#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct InterruptState {
    pub nmi: bool,
    pub firq: bool,
    pub irq: bool,
    pub reset: bool,
}

/// Physical CPU interrupt inputs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InterruptLine {
    Nmi,
    Firq,
    Irq,
    Reset,
}

impl InterruptLine {
    pub const ALL: [InterruptLine; 4] = [
        InterruptLine::Nmi,
        InterruptLine::Firq,
        InterruptLine::Irq,
        InterruptLine::Reset,
    ];

    fn index(self) -> usize {
        match self {
            InterruptLine::Nmi => 0,
            InterruptLine::Firq => 1,
            InterruptLine::Irq => 2,
            InterruptLine::Reset => 3,
        }
    }
}

/// Logical interrupt sources. Several sources may drive the same line.
pub mod source {
    pub const PIA_VSYNC: u16 = 1 << 0;
    pub const PIA_HSYNC: u16 = 1 << 1;
    pub const GIME_TIMER: u16 = 1 << 2;
    pub const GIME_HBORDER: u16 = 1 << 3;
    pub const GIME_VBORDER: u16 = 1 << 4;
    pub const GIME_SERIAL: u16 = 1 << 5;
    pub const GIME_KEYBOARD: u16 = 1 << 6;
    pub const GIME_CART: u16 = 1 << 7;
    pub const PIA_CART: u16 = 1 << 8;
    pub const DISK: u16 = 1 << 9;
    pub const RESET_SWITCH: u16 = 1 << 10;

    /// Every source that originates inside the GIME.
    pub const GIME_ALL: u16 =
        GIME_TIMER | GIME_HBORDER | GIME_VBORDER | GIME_SERIAL | GIME_KEYBOARD | GIME_CART;
}

/// Per-line source bitmasks. The CPU only sees "any bit set" per line.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct InterruptLines {
    lines: [u16; 4],
}

impl InterruptLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assert(&mut self, line: InterruptLine, source: u16) {
        self.lines[line.index()] |= source;
    }

    /// Drop one source. Other sources on the same line stay asserted.
    pub fn clear(&mut self, line: InterruptLine, source: u16) {
        self.lines[line.index()] &= !source;
    }

    pub fn clear_line(&mut self, line: InterruptLine) {
        self.lines[line.index()] = 0;
    }

    /// Assert or clear a source depending on `active`.
    pub fn set(&mut self, line: InterruptLine, source: u16, active: bool) {
        if active {
            self.assert(line, source);
        } else {
            self.clear(line, source);
        }
    }

    pub fn is_asserted(&self, line: InterruptLine) -> bool {
        self.lines[line.index()] != 0
    }

    pub fn sources(&self, line: InterruptLine) -> u16 {
        self.lines[line.index()]
    }

    pub fn state(&self) -> InterruptState {
        InterruptState {
            nmi: self.is_asserted(InterruptLine::Nmi),
            firq: self.is_asserted(InterruptLine::Firq),
            irq: self.is_asserted(InterruptLine::Irq),
            reset: self.is_asserted(InterruptLine::Reset),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clearing_one_source_keeps_others() {
        let mut lines = InterruptLines::new();
        lines.assert(InterruptLine::Irq, source::PIA_VSYNC);
        lines.assert(InterruptLine::Irq, source::GIME_TIMER);
        lines.clear(InterruptLine::Irq, source::PIA_VSYNC);
        assert!(lines.is_asserted(InterruptLine::Irq));
        assert_eq!(lines.sources(InterruptLine::Irq), source::GIME_TIMER);
        lines.clear(InterruptLine::Irq, source::GIME_TIMER);
        assert!(!lines.is_asserted(InterruptLine::Irq));
    }

    #[test]
    fn lines_are_independent() {
        let mut lines = InterruptLines::new();
        lines.assert(InterruptLine::Firq, source::GIME_TIMER);
        let state = lines.state();
        assert!(state.firq);
        assert!(!state.irq && !state.nmi && !state.reset);
        lines.clear_line(InterruptLine::Firq);
        assert_eq!(lines.state(), InterruptState::default());
    }
}
