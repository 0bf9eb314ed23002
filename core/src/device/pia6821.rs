/// One side (A or B) of an MC6821.
///
/// Holds the output register, data direction register, the writable control
/// bits 5:0, the external input pins and both interrupt flags. The two sides
/// of the chip are identical apart from wiring, so all behaviour lives here.
#[derive(Clone, Debug, Default)]
struct PiaPort {
    output: u8, // Output register (ORx), written by CPU
    ddr: u8,    // Data direction: 0=input, 1=output
    ctrl: u8,   // Control register bits 5:0
    input: u8,  // External input pins (set by board logic)

    irq1: bool, // Set by C1 active edge
    irq2: bool, // Set by C2 active edge (C2 as input)

    c1: bool,
    c2: bool,
}

impl PiaPort {
    fn data_selected(&self) -> bool {
        self.ctrl & 0x04 != 0
    }

    fn read_data(&mut self) -> u8 {
        if self.data_selected() {
            self.irq1 = false;
            self.irq2 = false;
            (self.input & !self.ddr) | (self.output & self.ddr)
        } else {
            self.ddr
        }
    }

    fn read_control(&self) -> u8 {
        ((self.irq1 as u8) << 7) | ((self.irq2 as u8) << 6) | (self.ctrl & 0x3F)
    }

    fn write_data(&mut self, data: u8) {
        if self.data_selected() {
            self.output = data;
        } else {
            self.ddr = data;
        }
    }

    fn write_control(&mut self, data: u8) {
        self.ctrl = data & 0x3F;
        if self.c2_is_output() && self.ctrl & 0x10 != 0 {
            self.c2 = self.ctrl & 0x08 != 0;
        }
    }

    /// C1 edge detect; control bit 1 selects rising (1) or falling (0).
    fn set_c1(&mut self, state: bool) {
        let rising = state && !self.c1;
        let falling = !state && self.c1;
        self.c1 = state;
        let on_rising = self.ctrl & 0x02 != 0;
        if (on_rising && rising) || (!on_rising && falling) {
            self.irq1 = true;
        }
    }

    /// C2 edge detect when C2 is an input; control bit 4 selects the edge.
    fn set_c2(&mut self, state: bool) {
        if self.c2_is_output() {
            return;
        }
        let rising = state && !self.c2;
        let falling = !state && self.c2;
        self.c2 = state;
        let on_rising = self.ctrl & 0x10 != 0;
        if (on_rising && rising) || (!on_rising && falling) {
            self.irq2 = true;
        }
    }

    fn c2_is_output(&self) -> bool {
        self.ctrl & 0x20 != 0
    }

    /// Driven C2 level; false while C2 is an input.
    fn c2_output(&self) -> bool {
        self.c2_is_output() && self.c2
    }

    /// IRQ = (irq1 AND CR.0) OR (irq2 AND CR.3 AND C2 input)
    fn irq(&self) -> bool {
        let c1_active = self.irq1 && self.ctrl & 0x01 != 0;
        let c2_active = self.irq2 && !self.c2_is_output() && self.ctrl & 0x08 != 0;
        c1_active || c2_active
    }
}

/// MC6821 Peripheral Interface Adapter.
///
/// The Color Computer 3 carries two: PIA0 scans the keyboard, reads the
/// joystick comparator and latches HSYNC (CA1) and field sync (CB1); PIA1
/// drives the 6-bit DAC and takes the cartridge interrupt on CB1.
///
/// | Offset | CRx.2 | Register     |
/// |--------|-------|--------------|
/// | 0      | 0     | DDRA         |
/// | 0      | 1     | Port A data  |
/// | 1      | x     | CRA          |
/// | 2      | 0     | DDRB         |
/// | 2      | 1     | Port B data  |
/// | 3      | x     | CRB          |
#[derive(Clone, Debug, Default)]
pub struct Pia6821 {
    a: PiaPort,
    b: PiaPort,
}

impl Pia6821 {
    /// All registers zeroed: every pin an input, no interrupts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a register. Reading a data port clears that side's IRQ flags.
    pub fn read(&mut self, offset: u8) -> u8 {
        match offset & 0x03 {
            0 => self.a.read_data(),
            1 => self.a.read_control(),
            2 => self.b.read_data(),
            _ => self.b.read_control(),
        }
    }

    /// Side-effect free register view (debuggers, status dumps).
    pub fn peek(&self, offset: u8) -> u8 {
        match offset & 0x03 {
            0 => self.a.clone().read_data(),
            1 => self.a.read_control(),
            2 => self.b.clone().read_data(),
            _ => self.b.read_control(),
        }
    }

    /// Write a register. Control bits 7:6 are read-only flags.
    pub fn write(&mut self, offset: u8, data: u8) {
        match offset & 0x03 {
            0 => self.a.write_data(data),
            1 => self.a.write_control(data),
            2 => self.b.write_data(data),
            _ => self.b.write_control(data),
        }
    }

    pub fn set_port_a_input(&mut self, data: u8) {
        self.a.input = data;
    }

    pub fn set_port_b_input(&mut self, data: u8) {
        self.b.input = data;
    }

    pub fn set_ca1(&mut self, state: bool) {
        self.a.set_c1(state);
    }

    pub fn set_cb1(&mut self, state: bool) {
        self.b.set_c1(state);
    }

    pub fn set_ca2(&mut self, state: bool) {
        self.a.set_c2(state);
    }

    pub fn set_cb2(&mut self, state: bool) {
        self.b.set_c2(state);
    }

    pub fn irq_a(&self) -> bool {
        self.a.irq()
    }

    pub fn irq_b(&self) -> bool {
        self.b.irq()
    }

    /// Port A pins the CPU is driving (ORA masked by DDRA).
    pub fn read_output_a(&self) -> u8 {
        self.a.output & self.a.ddr
    }

    /// Port B pins the CPU is driving (ORB masked by DDRB).
    pub fn read_output_b(&self) -> u8 {
        self.b.output & self.b.ddr
    }

    /// Port B line levels as seen by external logic: driven pins carry ORB,
    /// input pins float high.
    pub fn port_b_lines(&self) -> u8 {
        (self.b.output & self.b.ddr) | !self.b.ddr
    }

    pub fn ca2_output(&self) -> bool {
        self.a.c2_output()
    }

    pub fn cb2_output(&self) -> bool {
        self.b.c2_output()
    }
}
