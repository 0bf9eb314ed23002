pub mod gime;
pub mod keyboard;
pub mod peripheral;
pub mod pia6821;
pub mod rom;

pub use gime::{Gime, GimeInterrupt, PhysicalAddress, RomRoute, VideoRegisters};
pub use keyboard::{Joystick, JoystickMux, Keyboard};
pub use peripheral::{Peripheral, PeripheralContext, PeripheralError, PeripheralStatus};
pub use pia6821::Pia6821;
pub use rom::Rom;
