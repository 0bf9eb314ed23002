//! Keyboard matrix and joystick comparator wired to PIA0.
//!
//! PIA0 port B drives the eight column strobes (active low); port A bits 0-6
//! read back the seven rows (active low) and bit 7 carries the joystick
//! comparator output. The comparator matches PIA1's 6-bit DAC against the
//! joystick axis chosen by PIA0 CA2 (axis) and CB2 (stick).

pub const ROWS: usize = 7;
pub const COLUMNS: usize = 8;

/// Key names by row, column.
pub const KEY_NAMES: [[&str; COLUMNS]; ROWS] = [
    ["@", "A", "B", "C", "D", "E", "F", "G"],
    ["H", "I", "J", "K", "L", "M", "N", "O"],
    ["P", "Q", "R", "S", "T", "U", "V", "W"],
    ["X", "Y", "Z", "UP", "DOWN", "LEFT", "RIGHT", "SPACE"],
    ["0", "1", "2", "3", "4", "5", "6", "7"],
    ["8", "9", ":", ";", ",", "-", ".", "/"],
    ["ENTER", "CLEAR", "BREAK", "ALT", "CTRL", "F1", "F2", "SHIFT"],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Joystick {
    /// Horizontal position, 0 (left) to 63 (right).
    pub x: u8,
    /// Vertical position, 0 (up) to 63 (down).
    pub y: u8,
    pub button: bool,
}

impl Joystick {
    pub const CENTERED: Joystick = Joystick {
        x: 32,
        y: 32,
        button: false,
    };
}

impl Default for Joystick {
    fn default() -> Self {
        Self::CENTERED
    }
}

/// Comparator input selection from PIA0 CA2 / CB2.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JoystickMux {
    /// CA2: false = horizontal axis, true = vertical axis.
    pub vertical: bool,
    /// CB2: false = right joystick, true = left joystick.
    pub left: bool,
}

#[derive(Clone, Debug, Default)]
pub struct Keyboard {
    /// One byte per column; bit n set = key in row n held.
    columns: [u8; COLUMNS],
    pub right_joystick: Joystick,
    pub left_joystick: Joystick,
}

impl Keyboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key(&mut self, row: usize, column: usize, pressed: bool) {
        if row >= ROWS || column >= COLUMNS {
            return;
        }
        if pressed {
            self.columns[column] |= 1 << row;
        } else {
            self.columns[column] &= !(1 << row);
        }
    }

    pub fn release_all(&mut self) {
        self.columns = [0; COLUMNS];
    }

    /// Row lines seen on PIA0 port A bits 0-6 for a column strobe written to
    /// port B. Both are active low: a zero strobe bit selects a column and
    /// a zero row bit reports a held key. Bit 7 is left set.
    pub fn scan(&self, strobe: u8) -> u8 {
        let mut rows = 0u8;
        for (column, keys) in self.columns.iter().enumerate() {
            if strobe & (1 << column) == 0 {
                rows |= keys;
            }
        }
        // Joystick fire buttons pull rows 0 (right) and 1 (left) low
        // regardless of the strobe.
        if self.right_joystick.button {
            rows |= 0x01;
        }
        if self.left_joystick.button {
            rows |= 0x02;
        }
        !rows
    }

    /// Comparator output: true when the selected axis is at or beyond the
    /// DAC level. `dac` is the 6-bit value from PIA1 port A bits 7-2.
    pub fn comparator(&self, dac: u8, mux: JoystickMux) -> bool {
        let stick = if mux.left {
            &self.left_joystick
        } else {
            &self.right_joystick
        };
        let axis = if mux.vertical { stick.y } else { stick.x };
        axis >= (dac & 0x3F)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_matrix_reads_all_high() {
        let kb = Keyboard::new();
        assert_eq!(kb.scan(0x00), 0xFF);
    }

    #[test]
    fn key_appears_only_under_its_column() {
        let mut kb = Keyboard::new();
        kb.set_key(0, 1, true); // "A"
        assert_eq!(KEY_NAMES[0][1], "A");
        assert_eq!(kb.scan(!0x02), 0xFE);
        assert_eq!(kb.scan(!0x04), 0xFF);
        kb.set_key(0, 1, false);
        assert_eq!(kb.scan(!0x02), 0xFF);
    }

    #[test]
    fn comparator_follows_mux() {
        let mut kb = Keyboard::new();
        kb.right_joystick.x = 40;
        kb.left_joystick.y = 10;
        let right_x = JoystickMux { vertical: false, left: false };
        let left_y = JoystickMux { vertical: true, left: true };
        assert!(kb.comparator(32, right_x));
        assert!(!kb.comparator(41, right_x));
        assert!(kb.comparator(10, left_y));
        assert!(!kb.comparator(11, left_y));
    }
}
