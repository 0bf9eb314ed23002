//! Machine registry for automatic front-end discovery.
//!
//! Each machine variant self-registers via [`inventory::submit!`] with a
//! [`MachineEntry`] holding its CLI name, ROM set name, installed RAM and a
//! factory function. The front end finds variants at runtime without a
//! central list.

use coco3_core::core::machine::Machine;

use crate::rom_loader::{RomLoadError, RomSet};

/// Factory signature: build a machine from a ROM set. The flag skips CRC32
/// validation.
pub type CreateFn = fn(&RomSet, bool) -> Result<Box<dyn Machine>, RomLoadError>;

/// Describes a front-end-capable machine variant.
pub struct MachineEntry {
    /// CLI name used to select this machine (e.g., "coco3").
    pub name: &'static str,
    /// ROM set name for ZIP/directory lookup (e.g., "coco3").
    pub rom_name: &'static str,
    /// Installed RAM in kilobytes.
    pub ram_kb: u32,
    pub create: CreateFn,
}

impl MachineEntry {
    pub const fn new(
        name: &'static str,
        rom_name: &'static str,
        ram_kb: u32,
        create: CreateFn,
    ) -> Self {
        Self {
            name,
            rom_name,
            ram_kb,
            create,
        }
    }
}

inventory::collect!(MachineEntry);

/// Return all registered machines, sorted by name.
pub fn all() -> Vec<&'static MachineEntry> {
    let mut entries: Vec<_> = inventory::iter::<MachineEntry>.into_iter().collect();
    entries.sort_by_key(|e| e.name);
    entries
}

/// Look up a machine by its CLI name.
pub fn find(name: &str) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.name == name)
}

/// Look up the variant with the given ROM set and RAM size.
pub fn find_by_ram(rom_name: &str, ram_kb: u32) -> Option<&'static MachineEntry> {
    inventory::iter::<MachineEntry>
        .into_iter()
        .find(|e| e.rom_name == rom_name && e.ram_kb == ram_kb)
}
