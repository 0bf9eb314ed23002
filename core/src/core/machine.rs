use crate::cpu::state::M6809State;

/// Describes a single input button that a machine accepts.
#[derive(Clone, Copy, Debug)]
pub struct InputButton {
    /// Machine-defined button identifier, passed to `set_input()`.
    pub id: u8,
    /// Human-readable name for display/configuration (e.g., "A", "ENTER").
    pub name: &'static str,
}

/// Machine-agnostic interface for emulated systems.
///
/// The front end drives a machine only through this trait: it advances
/// frames, feeds input and loads programs into physical memory. Video
/// rendering lives outside the machine.
pub trait Machine {
    /// Run one frame of emulation (advance the clock by one frame's worth of cycles).
    fn run_frame(&mut self);

    /// Handle an input event. `button` is a machine-defined ID from `input_map()`.
    /// `pressed` is true for key-down, false for key-up.
    fn set_input(&mut self, button: u8, pressed: bool);

    /// Get the list of input buttons this machine accepts.
    fn input_map(&self) -> &[InputButton];

    /// Reset the machine (asserts the CPU RESET line).
    fn reset(&mut self);

    /// Resolve a logical CPU address to a physical RAM address using the
    /// current memory map.
    fn translate(&self, addr: u16) -> u32;

    /// Store a byte directly into physical RAM (program loaders).
    fn write_physical(&mut self, addr: u32, data: u8);

    /// Read a byte directly from physical RAM.
    fn read_physical(&self, addr: u32) -> u8;

    /// Redirect execution, bypassing the reset vector.
    fn force_pc(&mut self, pc: u16);

    /// Number of complete video frames emulated since power-on.
    fn frame_count(&self) -> u64;

    /// Current CPU register state.
    fn cpu_state(&self) -> M6809State;
}
