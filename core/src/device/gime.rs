use crate::core::bus::source;

/// Physical address on the 19-bit GIME bus (up to 512KB).
pub type PhysicalAddress = u32;

/// Which ROM socket an overlaid access lands in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RomRoute {
    Internal,
    External,
}

/// Interrupt lines a GIME source fired on after INIT0 and FF92/FF93 gating.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GimeInterrupt {
    pub irq: bool,
    pub firq: bool,
}

/// Video register snapshot for an external renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VideoRegisters {
    pub compat: bool,
    pub vmode: u8,          // FF98
    pub vres: u8,           // FF99
    pub border: u8,         // FF9A
    pub vscroll: u8,        // FF9C
    pub vert_offset: u16,   // FF9D:FF9E
    pub horiz_offset: u8,   // FF9F
    pub sam_video_mode: u8, // SAM V0-V2
    pub sam_page: u8,       // SAM F0-F6
    pub palette: [u8; 16],
    pub start_address: PhysicalAddress,
}

// INIT0 (FF90)
pub const INIT0_COCO_COMPAT: u8 = 0x80;
pub const INIT0_MMU_ENABLE: u8 = 0x40;
pub const INIT0_IRQ_ENABLE: u8 = 0x20;
pub const INIT0_FIRQ_ENABLE: u8 = 0x10;
pub const INIT0_CONST_VECTORS: u8 = 0x08;
pub const INIT0_SCS: u8 = 0x04;
pub const INIT0_ROM_MAP: u8 = 0x03;

// INIT1 (FF91)
pub const INIT1_MEMORY_TYPE: u8 = 0x40;
pub const INIT1_TIMER_FAST: u8 = 0x20;
pub const INIT1_TASK: u8 = 0x01;

/// FF92/FF93 status bit for each GIME interrupt source.
const SOURCE_BITS: [(u16, u8); 6] = [
    (source::GIME_TIMER, 0x20),
    (source::GIME_HBORDER, 0x10),
    (source::GIME_VBORDER, 0x08),
    (source::GIME_SERIAL, 0x04),
    (source::GIME_KEYBOARD, 0x02),
    (source::GIME_CART, 0x01),
];

/// Added to the programmed timer value when it is loaded.
const TIMER_OFFSET: u16 = 2;

/// Physical base of the fixed high 64KB (MMU off, constant vectors).
const FIXED_REGION: PhysicalAddress = 0x70000;

/// First physical bank the ROM overlay covers (0x78000-0x7FFFF).
const ROM_BANK_FIRST: u8 = 0x3C;

// SAM bit pair indices, (address - FFC0) / 2
const SAM_V_SHIFT: u16 = 0; // V0-V2
const SAM_F_SHIFT: u16 = 3; // F0-F6
const SAM_R1: u16 = 1 << 12;
const SAM_TY: u16 = 1 << 15;

/// GIME register file: memory map control (INIT0/INIT1, MMU, SAM), the
/// programmable timer, the interrupt enable/status latches, and the video
/// registers the renderer reads.
///
/// Occupies FF90-FFDF. The sequencer and the PIAs live on the board; this
/// type only holds chip state and answers translation queries.
#[derive(Clone, Debug)]
pub struct Gime {
    init0: u8,
    init1: u8,
    irq_enable: u8,  // FF92 write
    firq_enable: u8, // FF93 write
    irq_status: u8,  // FF92 read, cleared on read
    firq_status: u8, // FF93 read, cleared on read

    timer_value: u16,   // 12-bit programmed value
    timer_counter: u16, // Running countdown; 0 = stopped
    blink: bool,

    vmode: u8,
    vres: u8,
    border: u8,
    vscroll: u8,
    vert_offset_msb: u8,
    vert_offset_lsb: u8,
    horiz_offset: u8,

    mmu: [u8; 16],     // FFA0-FFAF bank numbers, task 0 then task 1
    palette: [u8; 16], // FFB0-FFBF, 6-bit colors
    sam: u16,          // SAM bit pairs, one bit per FFC0-FFDF pair
}

impl Default for Gime {
    fn default() -> Self {
        Self::new()
    }
}

impl Gime {
    pub fn new() -> Self {
        let mut mmu = [0u8; 16];
        for (i, bank) in mmu.iter_mut().enumerate() {
            *bank = 0x38 + (i as u8 & 0x07);
        }
        Self {
            init0: 0,
            init1: 0,
            irq_enable: 0,
            firq_enable: 0,
            irq_status: 0,
            firq_status: 0,
            timer_value: 0,
            timer_counter: 0,
            blink: false,
            vmode: 0,
            vres: 0,
            border: 0,
            vscroll: 0,
            vert_offset_msb: 0,
            vert_offset_lsb: 0,
            horiz_offset: 0,
            mmu,
            palette: [0; 16],
            sam: 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn mmu_enabled(&self) -> bool {
        self.init0 & INIT0_MMU_ENABLE != 0
    }

    pub fn constant_vectors(&self) -> bool {
        self.init0 & INIT0_CONST_VECTORS != 0
    }

    pub fn rom_map(&self) -> u8 {
        self.init0 & INIT0_ROM_MAP
    }

    pub fn task(&self) -> usize {
        (self.init1 & INIT1_TASK) as usize
    }

    pub fn timer_fast(&self) -> bool {
        self.init1 & INIT1_TIMER_FAST != 0
    }

    /// SAM TY bit: ROM overlay disabled.
    pub fn all_ram(&self) -> bool {
        self.sam & SAM_TY != 0
    }

    /// Master clocks per CPU clock (SAM R1: 16 when set, 32 when clear).
    pub fn cpu_divisor(&self) -> u32 {
        if self.sam & SAM_R1 != 0 { 16 } else { 32 }
    }

    pub fn blink(&self) -> bool {
        self.blink
    }

    pub fn mmu_bank(&self, index: usize) -> u8 {
        self.mmu[index & 0x0F]
    }

    /// Logical to physical translation. Never fails; the board masks the
    /// result to the installed RAM size.
    pub fn translate(&self, addr: u16) -> PhysicalAddress {
        if self.mmu_enabled() && (addr < 0xFE00 || !self.constant_vectors()) {
            let index = (addr >> 13) as usize + 8 * self.task();
            let base = self.mmu[index] as PhysicalAddress * 0x2000;
            base + (addr & 0x1FFF) as PhysicalAddress
        } else {
            FIXED_REGION + addr as PhysicalAddress
        }
    }

    /// ROM overlay decision for a translated access. Returns the socket and
    /// the offset into it, or `None` when the access goes to RAM.
    pub fn rom_route(&self, addr: u16, phys: PhysicalAddress) -> Option<(RomRoute, usize)> {
        if self.all_ram() {
            return None;
        }
        if self.constant_vectors() && (0xFE00..0xFF00).contains(&addr) {
            return None;
        }
        let bank = ((phys >> 13) & 0x3F) as u8;
        if bank < ROM_BANK_FIRST {
            return None;
        }
        let offset = (phys & 0x7FFF) as usize;
        let route = match self.rom_map() {
            0 | 1 if offset < 0x4000 => RomRoute::Internal,
            0 | 1 => RomRoute::External,
            2 => RomRoute::Internal,
            _ => RomRoute::External,
        };
        Some((route, offset))
    }

    /// Register read for FF90-FFDF. FF92/FF93 return and clear the latched
    /// status; the board drops the matching interrupt sources.
    pub fn read(&mut self, addr: u16) -> u8 {
        match addr {
            0xFF92 => std::mem::take(&mut self.irq_status),
            0xFF93 => std::mem::take(&mut self.firq_status),
            _ => self.peek(addr),
        }
    }

    /// Side-effect free register view.
    pub fn peek(&self, addr: u16) -> u8 {
        match addr {
            0xFF90 => self.init0,
            0xFF91 => self.init1,
            0xFF92 => self.irq_status,
            0xFF93 => self.firq_status,
            0xFF94 => (self.timer_value >> 8) as u8,
            0xFF95 => self.timer_value as u8,
            0xFF98 => self.vmode,
            0xFF99 => self.vres,
            0xFF9A => self.border,
            0xFF9C => self.vscroll,
            0xFF9D => self.vert_offset_msb,
            0xFF9E => self.vert_offset_lsb,
            0xFF9F => self.horiz_offset,
            0xFFA0..=0xFFAF => self.mmu[(addr & 0x0F) as usize],
            0xFFB0..=0xFFBF => self.palette[(addr & 0x0F) as usize],
            _ => 0xFF,
        }
    }

    pub fn write(&mut self, addr: u16, data: u8) {
        match addr {
            0xFF90 => {
                if (self.init0 ^ data) & (INIT0_MMU_ENABLE | INIT0_ROM_MAP) != 0 {
                    log::debug!(
                        "GIME INIT0 {data:02X}: MMU {}, ROM map {}",
                        if data & INIT0_MMU_ENABLE != 0 { "on" } else { "off" },
                        data & INIT0_ROM_MAP
                    );
                }
                self.init0 = data;
            }
            0xFF91 => self.init1 = data,
            0xFF92 => self.irq_enable = data & 0x3F,
            0xFF93 => self.firq_enable = data & 0x3F,
            0xFF94 => {
                self.timer_value = (self.timer_value & 0x00FF) | ((data as u16 & 0x0F) << 8);
                self.restart_timer();
            }
            0xFF95 => self.timer_value = (self.timer_value & 0x0F00) | data as u16,
            0xFF98 => self.vmode = data,
            0xFF99 => self.vres = data,
            0xFF9A => self.border = data & 0x3F,
            0xFF9C => self.vscroll = data & 0x0F,
            0xFF9D => self.vert_offset_msb = data,
            0xFF9E => self.vert_offset_lsb = data,
            0xFF9F => self.horiz_offset = data,
            0xFFA0..=0xFFAF => self.mmu[(addr & 0x0F) as usize] = data & 0x3F,
            0xFFB0..=0xFFBF => self.palette[(addr & 0x0F) as usize] = data & 0x3F,
            0xFFC0..=0xFFDF => {
                let bit = 1u16 << ((addr - 0xFFC0) >> 1);
                if addr & 1 != 0 {
                    self.sam |= bit;
                } else {
                    self.sam &= !bit;
                }
                if addr >= 0xFFDE {
                    log::debug!("SAM all-RAM mode {}", if self.all_ram() { "on" } else { "off" });
                }
            }
            _ => {}
        }
    }

    fn restart_timer(&mut self) {
        self.timer_counter = if self.timer_value == 0 {
            0
        } else {
            self.timer_value + TIMER_OFFSET
        };
    }

    /// One timer clock. Returns true when the countdown expired: the counter
    /// has reloaded and the blink flag toggled.
    pub fn clock_timer(&mut self) -> bool {
        if self.timer_counter == 0 {
            return false;
        }
        self.timer_counter -= 1;
        if self.timer_counter != 0 {
            return false;
        }
        self.restart_timer();
        self.blink = !self.blink;
        true
    }

    pub fn timer_counter(&self) -> u16 {
        self.timer_counter
    }

    /// Latch an interrupt from a GIME source and report which CPU lines it
    /// should drive. A line fires only when INIT0 enables it for the chip
    /// and FF92/FF93 enable it for this source.
    pub fn raise(&mut self, sources: u16) -> GimeInterrupt {
        let mut out = GimeInterrupt::default();
        for (mask, bit) in SOURCE_BITS {
            if sources & mask == 0 {
                continue;
            }
            if self.init0 & INIT0_IRQ_ENABLE != 0 && self.irq_enable & bit != 0 {
                self.irq_status |= bit;
                out.irq = true;
            }
            if self.init0 & INIT0_FIRQ_ENABLE != 0 && self.firq_enable & bit != 0 {
                self.firq_status |= bit;
                out.firq = true;
            }
        }
        out
    }

    /// First byte of the displayed frame. CoCo-compatible modes combine the
    /// SAM page select with the low offset bits; native modes use FF9D:FF9E
    /// as an 8-byte granular address.
    pub fn video_start_address(&self) -> PhysicalAddress {
        if self.init0 & INIT0_COCO_COMPAT != 0 {
            let page = ((self.sam >> SAM_F_SHIFT) & 0x7F) as PhysicalAddress;
            ((self.vert_offset_msb >> 5) as PhysicalAddress * 0x10000)
                + page * 512
                + (self.vert_offset_lsb & 0x3F) as PhysicalAddress * 8
        } else {
            ((self.vert_offset_msb as PhysicalAddress) << 11)
                | ((self.vert_offset_lsb as PhysicalAddress) << 3)
        }
    }

    pub fn video_registers(&self) -> VideoRegisters {
        VideoRegisters {
            compat: self.init0 & INIT0_COCO_COMPAT != 0,
            vmode: self.vmode,
            vres: self.vres,
            border: self.border,
            vscroll: self.vscroll,
            vert_offset: u16::from_be_bytes([self.vert_offset_msb, self.vert_offset_lsb]),
            horiz_offset: self.horiz_offset,
            sam_video_mode: ((self.sam >> SAM_V_SHIFT) & 0x07) as u8,
            sam_page: ((self.sam >> SAM_F_SHIFT) & 0x7F) as u8,
            palette: self.palette,
            start_address: self.video_start_address(),
        }
    }
}
