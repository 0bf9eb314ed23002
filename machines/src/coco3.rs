use coco3_core::core::bus::{InterruptState, source};
use coco3_core::core::machine::{InputButton, Machine};
use coco3_core::core::{Bus, BusMaster, BusMasterComponent, InterruptLine, InterruptLines};
use coco3_core::cpu::state::M6809State;
use coco3_core::cpu::{Cpu, CpuStateTrait, m6809::M6809};
use coco3_core::device::gime::{INIT0_FIRQ_ENABLE, INIT0_IRQ_ENABLE};
use coco3_core::device::keyboard::{COLUMNS, KEY_NAMES, ROWS};
use coco3_core::device::{
    Gime, JoystickMux, Keyboard, Peripheral, PeripheralContext, PeripheralStatus, Pia6821, Rom,
    RomRoute, VideoRegisters,
};

use crate::binary::{self, BinaryError, BinaryImage};
use crate::registry::MachineEntry;
use crate::rom_loader::{RomImage, RomLoadError, RomSet};

// ---------------------------------------------------------------------------
// Timing constants (NTSC, in GIME master clocks)
// ---------------------------------------------------------------------------

/// Master clocks per scanline.
pub const DOTS_PER_SCANLINE: u16 = 1820;

/// Scanlines per field.
pub const SCANLINES_PER_FRAME: u16 = 262;

pub const MASTER_CYCLES_PER_FRAME: u64 = DOTS_PER_SCANLINE as u64 * SCANLINES_PER_FRAME as u64;

/// HSYNC drives PIA0 CA1 low at dot 0 and releases it here.
const HSYNC_PULSE_END: u16 = 160;

/// Field sync falling edge on PIA0 CB1 (trailing edge of the vertical sync pulse).
const FIELD_SYNC_DOT: u16 = 1422;
const FIELD_SYNC_SCANLINE: u16 = 230;

/// GIME vertical border interrupt.
const VBORDER_SCANLINE: u16 = 13;

/// Fast timer source: one count per 8 master clocks (279.4 ns).
const FAST_TIMER_PERIOD: u64 = 8;

const CPU: BusMaster = BusMaster::Cpu(0);

// ---------------------------------------------------------------------------
// ROM definitions
// ---------------------------------------------------------------------------

/// Internal Color BASIC / Extended / Super Extended BASIC ROM, 32KB.
pub static COCO3_ROM: RomImage = RomImage {
    label: "Super Extended Color BASIC",
    names: &["coco3.rom", "bas3.rom"],
    sizes: &[0x8000],
    crc32: &[0xB4C8_8D6C],
};

/// Disk Extended Color BASIC, plugged into the cartridge slot when present.
pub static DISK_ROM: RomImage = RomImage {
    label: "Disk BASIC",
    names: &["disk11.rom", "disk10.rom"],
    sizes: &[0x2000],
    crc32: &[],
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RamSize {
    #[default]
    K128,
    K512,
}

impl RamSize {
    pub fn bytes(self) -> usize {
        match self {
            RamSize::K128 => 128 * 1024,
            RamSize::K512 => 512 * 1024,
        }
    }

    pub fn kilobytes(self) -> u32 {
        (self.bytes() / 1024) as u32
    }

    pub fn from_kilobytes(kb: u32) -> Option<Self> {
        match kb {
            128 => Some(RamSize::K128),
            512 => Some(RamSize::K512),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Coco3Config {
    pub ram_size: RamSize,
}

// ---------------------------------------------------------------------------
// Input map
// ---------------------------------------------------------------------------

const KEY_COUNT: usize = ROWS * COLUMNS;

pub const INPUT_RIGHT_FIRE: u8 = KEY_COUNT as u8;
pub const INPUT_LEFT_FIRE: u8 = KEY_COUNT as u8 + 1;
pub const INPUT_RIGHT_STICK_LEFT: u8 = KEY_COUNT as u8 + 2;
pub const INPUT_RIGHT_STICK_RIGHT: u8 = KEY_COUNT as u8 + 3;
pub const INPUT_RIGHT_STICK_UP: u8 = KEY_COUNT as u8 + 4;
pub const INPUT_RIGHT_STICK_DOWN: u8 = KEY_COUNT as u8 + 5;

/// Keyboard matrix keys first (id = row * 8 + column), then joystick inputs.
static COCO3_INPUT_MAP: [InputButton; KEY_COUNT + 6] = build_input_map();

const fn build_input_map() -> [InputButton; KEY_COUNT + 6] {
    let mut map = [InputButton { id: 0, name: "" }; KEY_COUNT + 6];
    let mut i = 0;
    while i < KEY_COUNT {
        map[i] = InputButton {
            id: i as u8,
            name: KEY_NAMES[i / COLUMNS][i % COLUMNS],
        };
        i += 1;
    }
    map[KEY_COUNT] = InputButton {
        id: INPUT_RIGHT_FIRE,
        name: "Right Fire",
    };
    map[KEY_COUNT + 1] = InputButton {
        id: INPUT_LEFT_FIRE,
        name: "Left Fire",
    };
    map[KEY_COUNT + 2] = InputButton {
        id: INPUT_RIGHT_STICK_LEFT,
        name: "Right Stick Left",
    };
    map[KEY_COUNT + 3] = InputButton {
        id: INPUT_RIGHT_STICK_RIGHT,
        name: "Right Stick Right",
    };
    map[KEY_COUNT + 4] = InputButton {
        id: INPUT_RIGHT_STICK_UP,
        name: "Right Stick Up",
    };
    map[KEY_COUNT + 5] = InputButton {
        id: INPUT_RIGHT_STICK_DOWN,
        name: "Right Stick Down",
    };
    map
}

// ---------------------------------------------------------------------------
// Coco3Bus
// ---------------------------------------------------------------------------

/// Everything on the Color Computer 3 board except the CPU: physical RAM,
/// the internal and cartridge ROMs, the GIME, both PIAs, the keyboard and
/// joysticks, peripherals on the FF40-FF8F windows, the interrupt lines and
/// the video timing counters.
///
/// | Logical       | Decode                                          |
/// |---------------|-------------------------------------------------|
/// | 0000-FEFF     | GIME translation to RAM, or ROM overlay          |
/// | FF00-FF1F     | PIA0 (keyboard, joystick comparator, sync)      |
/// | FF20-FF3F     | PIA1 (DAC, cartridge FIRQ)                      |
/// | FF40-FF8F     | Peripheral register windows                     |
/// | FF90-FFDF     | GIME registers, MMU, palette, SAM               |
/// | FFE0-FFFF     | Interrupt vectors from internal ROM             |
pub struct Coco3Bus {
    ram: Vec<u8>,
    ram_mask: u32,
    internal_rom: Option<Rom>,
    external_rom: Option<Rom>,

    gime: Gime,
    pia0: Pia6821,
    pia1: Pia6821,
    keyboard: Keyboard,
    peripherals: Vec<Box<dyn Peripheral>>,

    interrupts: InterruptLines,
    hardware_halt: bool,

    // Video timing
    master_cycles: u64,
    dot: u16,
    scanline: u16,
    frame_count: u64,
}

impl Coco3Bus {
    pub fn new(config: Coco3Config) -> Self {
        let size = config.ram_size.bytes();
        let mut bus = Self {
            ram: vec![0; size],
            ram_mask: (size - 1) as u32,
            internal_rom: None,
            external_rom: None,
            gime: Gime::new(),
            pia0: Pia6821::new(),
            pia1: Pia6821::new(),
            keyboard: Keyboard::new(),
            peripherals: Vec::new(),
            interrupts: InterruptLines::new(),
            hardware_halt: false,
            master_cycles: 0,
            dot: 0,
            scanline: 0,
            frame_count: 0,
        };
        bus.fill_power_on_pattern();
        bus
    }

    /// DRAM comes up in alternating runs of four 0xFF and four 0x00 bytes.
    fn fill_power_on_pattern(&mut self) {
        for (i, byte) in self.ram.iter_mut().enumerate() {
            *byte = if (i / 4) % 2 == 0 { 0xFF } else { 0x00 };
        }
    }

    // --- Accessors ---

    pub fn gime(&self) -> &Gime {
        &self.gime
    }

    pub fn pia0(&self) -> &Pia6821 {
        &self.pia0
    }

    pub fn pia1(&self) -> &Pia6821 {
        &self.pia1
    }

    pub fn keyboard(&self) -> &Keyboard {
        &self.keyboard
    }

    pub fn keyboard_mut(&mut self) -> &mut Keyboard {
        &mut self.keyboard
    }

    pub fn interrupts(&self) -> &InterruptLines {
        &self.interrupts
    }

    pub fn ram_size(&self) -> usize {
        self.ram.len()
    }

    pub fn master_cycles(&self) -> u64 {
        self.master_cycles
    }

    pub fn dot(&self) -> u16 {
        self.dot
    }

    pub fn scanline(&self) -> u16 {
        self.scanline
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn blink(&self) -> bool {
        self.gime.blink()
    }

    pub fn hardware_halt(&self) -> bool {
        self.hardware_halt
    }

    pub fn video_registers(&self) -> VideoRegisters {
        let mut regs = self.gime.video_registers();
        regs.start_address &= self.ram_mask;
        regs
    }

    // --- ROM and peripheral installation ---

    /// Install the internal ROM. Returns false for an empty image.
    pub fn load_internal_rom(&mut self, data: Vec<u8>) -> bool {
        self.internal_rom = Rom::new(data);
        self.internal_rom.is_some()
    }

    /// Insert a cartridge ROM. Returns false for an empty image.
    pub fn load_cartridge(&mut self, data: Vec<u8>) -> bool {
        self.external_rom = Rom::new(data);
        self.external_rom.is_some()
    }

    pub fn eject_cartridge(&mut self) {
        self.external_rom = None;
    }

    pub fn attach_peripheral(&mut self, peripheral: Box<dyn Peripheral>) {
        log::debug!("attached peripheral {}", peripheral.name());
        self.peripherals.push(peripheral);
    }

    // --- Physical memory ---

    pub fn translate(&self, addr: u16) -> u32 {
        self.gime.translate(addr) & self.ram_mask
    }

    pub fn read_physical(&self, addr: u32) -> u8 {
        self.ram[(addr & self.ram_mask) as usize]
    }

    pub fn write_physical(&mut self, addr: u32, data: u8) {
        self.ram[(addr & self.ram_mask) as usize] = data;
    }

    fn read_memory(&self, addr: u16) -> u8 {
        let phys = self.gime.translate(addr);
        match self.gime.rom_route(addr, phys) {
            Some((RomRoute::Internal, offset)) => {
                self.internal_rom.as_ref().map_or(0xFF, |rom| rom.read(offset))
            }
            Some((RomRoute::External, offset)) => {
                self.external_rom.as_ref().map_or(0xFF, |rom| rom.read(offset))
            }
            None => self.read_physical(phys),
        }
    }

    fn write_memory(&mut self, addr: u16, data: u8) {
        let phys = self.gime.translate(addr);
        if self.gime.rom_route(addr, phys).is_none() {
            self.write_physical(phys, data);
        }
    }

    /// Vector fetches always come from the top of the internal ROM.
    fn read_vector(&self, addr: u16) -> u8 {
        match &self.internal_rom {
            Some(rom) => rom.read((addr & 0x7FFF) as usize),
            None => self.read_physical(self.gime.translate(addr)),
        }
    }

    // --- PIA wiring ---

    /// Present keyboard rows and the joystick comparator on PIA0 port A.
    fn refresh_pia0_inputs(&mut self) {
        let rows = self.keyboard.scan(self.pia0.port_b_lines()) & 0x7F;
        let dac = self.pia1.read_output_a() >> 2;
        let mux = JoystickMux {
            vertical: self.pia0.ca2_output(),
            left: self.pia0.cb2_output(),
        };
        let comparator = if self.keyboard.comparator(dac, mux) {
            0x80
        } else {
            0x00
        };
        self.pia0.set_port_a_input(rows | comparator);
    }

    /// PIA0 outputs drive IRQ, PIA1 outputs drive FIRQ.
    fn update_pia_interrupts(&mut self) {
        self.interrupts
            .set(InterruptLine::Irq, source::PIA_HSYNC, self.pia0.irq_a());
        self.interrupts
            .set(InterruptLine::Irq, source::PIA_VSYNC, self.pia0.irq_b());
        self.interrupts.set(
            InterruptLine::Firq,
            source::PIA_CART,
            self.pia1.irq_a() || self.pia1.irq_b(),
        );
    }

    /// Cartridge CART* line: PIA1 CB1 plus the GIME EI0 source.
    pub fn set_cartridge_interrupt(&mut self, active: bool) {
        self.pia1.set_cb1(!active);
        if active {
            self.raise_gime(source::GIME_CART);
        }
        self.update_pia_interrupts();
    }

    fn raise_gime(&mut self, sources: u16) {
        let fired = self.gime.raise(sources);
        if fired.irq {
            self.interrupts.assert(InterruptLine::Irq, sources);
        }
        if fired.firq {
            self.interrupts.assert(InterruptLine::Firq, sources);
        }
    }

    // --- Peripheral dispatch ---

    fn peripheral_read(&mut self, addr: u16) -> u8 {
        let Self {
            peripherals,
            ram,
            interrupts,
            hardware_halt,
            ..
        } = self;
        match peripherals.iter_mut().find(|p| p.claims(addr)) {
            Some(peripheral) => {
                let mut ctx = PeripheralContext::new(ram, interrupts, hardware_halt);
                peripheral.register_read(addr, &mut ctx)
            }
            None => 0xFF,
        }
    }

    fn peripheral_write(&mut self, addr: u16, data: u8) {
        let Self {
            peripherals,
            ram,
            interrupts,
            hardware_halt,
            ..
        } = self;
        if let Some(peripheral) = peripherals.iter_mut().find(|p| p.claims(addr)) {
            let mut ctx = PeripheralContext::new(ram, interrupts, hardware_halt);
            peripheral.register_write(addr, data, &mut ctx);
        }
    }

    fn advance_peripherals(&mut self) {
        let Self {
            peripherals,
            ram,
            interrupts,
            hardware_halt,
            ..
        } = self;
        for peripheral in peripherals.iter_mut() {
            let mut ctx = PeripheralContext::new(ram, interrupts, hardware_halt);
            if let PeripheralStatus::Failed(err) = peripheral.advance_state(&mut ctx) {
                log::warn!("{}: {err}", peripheral.name());
            }
        }
    }

    // --- Sequencer ---

    /// Advance one master clock. Returns true when the CPU is due a clock.
    pub fn clock(&mut self) -> bool {
        if self.dot == 0 {
            self.start_scanline();
        } else if self.dot == HSYNC_PULSE_END {
            self.pia0.set_ca1(true);
            self.update_pia_interrupts();
        }

        if self.dot == FIELD_SYNC_DOT && self.scanline == FIELD_SYNC_SCANLINE {
            self.pia0.set_cb1(false);
            self.update_pia_interrupts();
        }

        if self.gime.timer_fast() && self.master_cycles % FAST_TIMER_PERIOD == 0 {
            self.clock_timer();
        }

        self.advance_peripherals();

        let cpu_due = self.master_cycles % self.gime.cpu_divisor() as u64 == 0;

        self.master_cycles += 1;
        self.dot += 1;
        if self.dot == DOTS_PER_SCANLINE {
            self.dot = 0;
            self.scanline += 1;
            if self.scanline == SCANLINES_PER_FRAME {
                self.scanline = 0;
                self.frame_count += 1;
            }
        }

        cpu_due
    }

    fn start_scanline(&mut self) {
        // HSYNC leading edge
        self.pia0.set_ca1(false);
        if self.scanline == 0 {
            // Re-arm field sync for the next falling edge
            self.pia0.set_cb1(true);
        }
        self.update_pia_interrupts();

        self.raise_gime(source::GIME_HBORDER);
        if self.scanline == VBORDER_SCANLINE {
            self.raise_gime(source::GIME_VBORDER);
        }
        if !self.gime.timer_fast() {
            self.clock_timer();
        }
    }

    fn clock_timer(&mut self) {
        if self.gime.clock_timer() {
            self.raise_gime(source::GIME_TIMER);
        }
    }

    // --- Reset ---

    /// Return every chip to its reset state and assert RESET. RAM, ROMs and
    /// the video timing chain are left alone.
    pub fn reset(&mut self) {
        self.gime.reset();
        self.pia0 = Pia6821::new();
        self.pia1 = Pia6821::new();
        self.hardware_halt = false;
        for peripheral in &mut self.peripherals {
            peripheral.reset();
        }
        self.interrupts = InterruptLines::new();
        self.interrupts
            .assert(InterruptLine::Reset, source::RESET_SWITCH);
    }

    /// Cold start: power-on RAM pattern, counters zeroed, then reset.
    pub fn power_on(&mut self) {
        self.fill_power_on_pattern();
        self.master_cycles = 0;
        self.dot = 0;
        self.scanline = 0;
        self.frame_count = 0;
        self.keyboard.release_all();
        self.reset();
    }
}

impl Bus for Coco3Bus {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, _master: BusMaster, addr: u16) -> u8 {
        match addr {
            0xFFE0..=0xFFFF => self.read_vector(addr),
            0xFF00..=0xFF1F => {
                self.refresh_pia0_inputs();
                let data = self.pia0.read((addr & 0x03) as u8);
                self.update_pia_interrupts();
                data
            }
            0xFF20..=0xFF3F => {
                let data = self.pia1.read((addr & 0x03) as u8);
                self.update_pia_interrupts();
                data
            }
            0xFF40..=0xFF8F => self.peripheral_read(addr),
            0xFF90..=0xFFDF => {
                let data = self.gime.read(addr);
                match addr {
                    0xFF92 => self.interrupts.clear(InterruptLine::Irq, source::GIME_ALL),
                    0xFF93 => self.interrupts.clear(InterruptLine::Firq, source::GIME_ALL),
                    _ => {}
                }
                data
            }
            _ => self.read_memory(addr),
        }
    }

    fn write(&mut self, _master: BusMaster, addr: u16, data: u8) {
        match addr {
            0xFFE0..=0xFFFF => {
                if self.internal_rom.is_none() {
                    let phys = self.gime.translate(addr);
                    self.write_physical(phys, data);
                }
            }
            0xFF00..=0xFF1F => {
                self.pia0.write((addr & 0x03) as u8, data);
                self.update_pia_interrupts();
            }
            0xFF20..=0xFF3F => {
                self.pia1.write((addr & 0x03) as u8, data);
                self.update_pia_interrupts();
            }
            0xFF40..=0xFF8F => self.peripheral_write(addr, data),
            0xFF90..=0xFFDF => {
                self.gime.write(addr, data);
                if addr == 0xFF90 {
                    if data & INIT0_IRQ_ENABLE == 0 {
                        self.interrupts.clear(InterruptLine::Irq, source::GIME_ALL);
                    }
                    if data & INIT0_FIRQ_ENABLE == 0 {
                        self.interrupts.clear(InterruptLine::Firq, source::GIME_ALL);
                    }
                }
            }
            _ => self.write_memory(addr, data),
        }
    }

    fn is_halted_for(&self, master: BusMaster) -> bool {
        master == CPU && self.hardware_halt
    }

    fn check_interrupts(&self, target: BusMaster) -> InterruptState {
        match target {
            CPU => self.interrupts.state(),
            _ => InterruptState::default(),
        }
    }

    fn acknowledge_interrupt(&mut self, _target: BusMaster, line: InterruptLine) {
        match line {
            InterruptLine::Nmi | InterruptLine::Reset => self.interrupts.clear_line(line),
            InterruptLine::Firq | InterruptLine::Irq => {}
        }
    }
}

// ---------------------------------------------------------------------------
// Coco3
// ---------------------------------------------------------------------------

/// Tandy Color Computer 3: MC6809E driven by the GIME at 1/16 or 1/32 of
/// the 28.636 MHz master clock.
pub struct Coco3 {
    cpu: M6809,
    bus: Coco3Bus,
}

impl Coco3 {
    /// Build a powered-on machine with no ROM installed. The RESET line is
    /// asserted, so the first CPU step fetches the reset vector.
    pub fn new(config: Coco3Config) -> Self {
        let mut machine = Self {
            cpu: M6809::new(),
            bus: Coco3Bus::new(config),
        };
        machine.power_on();
        machine
    }

    pub fn cpu(&self) -> &M6809 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut M6809 {
        &mut self.cpu
    }

    pub fn bus(&self) -> &Coco3Bus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut Coco3Bus {
        &mut self.bus
    }

    pub fn load_rom_set(&mut self, rom_set: &RomSet, verify: bool) -> Result<(), RomLoadError> {
        self.bus.load_internal_rom(COCO3_ROM.load(rom_set, verify)?);
        match DISK_ROM.load_optional(rom_set, verify)? {
            Some(cartridge) => {
                self.bus.load_cartridge(cartridge);
            }
            None => self.bus.eject_cartridge(),
        }
        Ok(())
    }

    /// One master clock: sequencer events, then a CPU clock on divisor
    /// boundaries.
    pub fn tick(&mut self) {
        if self.bus.clock() {
            self.cpu.tick_with_bus(&mut self.bus, CPU);
        }
    }

    pub fn power_on(&mut self) {
        self.cpu.reset();
        self.bus.power_on();
    }

    pub fn set_key(&mut self, row: usize, column: usize, pressed: bool) {
        self.bus.keyboard.set_key(row, column, pressed);
    }

    pub fn set_joystick(&mut self, left: bool, x: u8, y: u8) {
        let stick = if left {
            &mut self.bus.keyboard.left_joystick
        } else {
            &mut self.bus.keyboard.right_joystick
        };
        stick.x = x.min(63);
        stick.y = y.min(63);
    }

    pub fn attach_peripheral(&mut self, peripheral: Box<dyn Peripheral>) {
        self.bus.attach_peripheral(peripheral);
    }

    /// Load a LOADM image through the current memory map.
    pub fn load_binary(&mut self, data: &[u8]) -> Result<BinaryImage, BinaryError> {
        binary::load(self, data)
    }

    /// Run CPU instructions until `count` have retired or the CPU sleeps,
    /// keeping the sequencer in step.
    pub fn run_instructions(&mut self, count: u64) {
        let target = self.cpu.instructions_retired() + count;
        while self.cpu.instructions_retired() < target {
            self.tick();
            if self.cpu.is_sleeping() && self.cpu.pending_cycles() == 0 {
                break;
            }
        }
    }
}

impl Machine for Coco3 {
    fn run_frame(&mut self) {
        for _ in 0..MASTER_CYCLES_PER_FRAME {
            self.tick();
        }
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        let keyboard = &mut self.bus.keyboard;
        match button {
            id if (id as usize) < KEY_COUNT => {
                keyboard.set_key(id as usize / COLUMNS, id as usize % COLUMNS, pressed)
            }
            INPUT_RIGHT_FIRE => keyboard.right_joystick.button = pressed,
            INPUT_LEFT_FIRE => keyboard.left_joystick.button = pressed,
            INPUT_RIGHT_STICK_LEFT => keyboard.right_joystick.x = if pressed { 0 } else { 32 },
            INPUT_RIGHT_STICK_RIGHT => keyboard.right_joystick.x = if pressed { 63 } else { 32 },
            INPUT_RIGHT_STICK_UP => keyboard.right_joystick.y = if pressed { 0 } else { 32 },
            INPUT_RIGHT_STICK_DOWN => keyboard.right_joystick.y = if pressed { 63 } else { 32 },
            _ => {}
        }
    }

    fn input_map(&self) -> &[InputButton] {
        &COCO3_INPUT_MAP
    }

    fn reset(&mut self) {
        self.cpu.reset();
        self.bus.reset();
    }

    fn translate(&self, addr: u16) -> u32 {
        self.bus.translate(addr)
    }

    fn write_physical(&mut self, addr: u32, data: u8) {
        self.bus.write_physical(addr, data);
    }

    fn read_physical(&self, addr: u32) -> u8 {
        self.bus.read_physical(addr)
    }

    fn force_pc(&mut self, pc: u16) {
        // A pending RESET would immediately overwrite the new PC.
        self.bus.interrupts.clear_line(InterruptLine::Reset);
        self.cpu.force_pc(pc);
    }

    fn frame_count(&self) -> u64 {
        self.bus.frame_count
    }

    fn cpu_state(&self) -> M6809State {
        self.cpu.snapshot()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

fn create(
    rom_set: &RomSet,
    skip_checksums: bool,
    ram_size: RamSize,
) -> Result<Box<dyn Machine>, RomLoadError> {
    let mut machine = Coco3::new(Coco3Config { ram_size });
    machine.load_rom_set(rom_set, !skip_checksums)?;
    Ok(Box::new(machine))
}

fn create_128k(rom_set: &RomSet, skip_checksums: bool) -> Result<Box<dyn Machine>, RomLoadError> {
    create(rom_set, skip_checksums, RamSize::K128)
}

fn create_512k(rom_set: &RomSet, skip_checksums: bool) -> Result<Box<dyn Machine>, RomLoadError> {
    create(rom_set, skip_checksums, RamSize::K512)
}

inventory::submit! {
    MachineEntry::new("coco3", "coco3", 128, create_128k)
}

inventory::submit! {
    MachineEntry::new("coco3-512k", "coco3", 512, create_512k)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_map_covers_matrix_and_joysticks() {
        let machine = Coco3::new(Coco3Config::default());
        let map = machine.input_map();
        assert_eq!(map.len(), KEY_COUNT + 6);
        assert_eq!(map[1].name, "A");
        assert_eq!(map[55].name, "SHIFT");
        assert!(map.iter().enumerate().all(|(i, b)| b.id as usize == i));
    }

    #[test]
    fn ram_size_round_trip() {
        assert_eq!(RamSize::from_kilobytes(512), Some(RamSize::K512));
        assert_eq!(RamSize::from_kilobytes(64), None);
        assert_eq!(RamSize::K128.kilobytes(), 128);
    }

    #[test]
    fn power_on_pattern() {
        let bus = Coco3Bus::new(Coco3Config::default());
        assert_eq!(bus.read_physical(0), 0xFF);
        assert_eq!(bus.read_physical(3), 0xFF);
        assert_eq!(bus.read_physical(4), 0x00);
        assert_eq!(bus.read_physical(8), 0xFF);
    }
}
