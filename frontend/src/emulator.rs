use std::collections::VecDeque;

use coco3_core::core::machine::Machine;

use crate::input::{KeyMap, KeyStroke};

/// Frames a typed key is held, then released, so the keyboard scan sees
/// each press and each release.
const HOLD_FRAMES: u32 = 3;

/// Feeds a string into the emulated keyboard one key at a time.
pub struct Typist {
    pending: VecDeque<KeyStroke>,
    held: Option<KeyStroke>,
    wait: u32,
}

impl Typist {
    pub fn new(text: &str, key_map: &KeyMap) -> Self {
        let mut pending = VecDeque::new();
        for ch in text.chars() {
            match key_map.get(ch) {
                Some(stroke) => pending.push_back(stroke),
                None => log::warn!("no key for {ch:?}, skipped"),
            }
        }
        Self {
            pending,
            held: None,
            wait: 0,
        }
    }

    pub fn is_done(&self) -> bool {
        self.pending.is_empty() && self.held.is_none()
    }

    /// Called once per frame before the frame runs.
    pub fn step(&mut self, machine: &mut dyn Machine) {
        if self.wait > 0 {
            self.wait -= 1;
            return;
        }
        if let Some(stroke) = self.held.take() {
            machine.set_input(stroke.button, false);
            if let Some(shift) = stroke.shift {
                machine.set_input(shift, false);
            }
            self.wait = HOLD_FRAMES;
            return;
        }
        if let Some(stroke) = self.pending.pop_front() {
            if let Some(shift) = stroke.shift {
                machine.set_input(shift, true);
            }
            machine.set_input(stroke.button, true);
            self.held = Some(stroke);
            self.wait = HOLD_FRAMES;
        }
    }
}

/// Run `frames` frames headless, typing as it goes.
pub fn run(machine: &mut dyn Machine, frames: u64, typist: &mut Typist) {
    for _ in 0..frames {
        typist.step(machine);
        machine.run_frame();
    }
    if !typist.is_done() {
        log::warn!("ran out of frames before typing finished");
    }
}
