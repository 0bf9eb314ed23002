pub mod binary;
pub mod coco3;
pub mod registry;
pub mod rom_loader;

pub use coco3::{Coco3, Coco3Bus, Coco3Config, RamSize};
