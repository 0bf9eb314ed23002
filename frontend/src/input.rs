use std::collections::HashMap;

use coco3_core::core::machine::InputButton;

/// One host character as machine buttons: the key, plus SHIFT when the
/// character is on the shifted half of a keycap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyStroke {
    pub button: u8,
    pub shift: Option<u8>,
}

/// Maps host characters to machine button IDs.
pub struct KeyMap {
    map: HashMap<char, KeyStroke>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn bind(&mut self, ch: char, stroke: KeyStroke) {
        self.map.insert(ch, stroke);
    }

    /// Lowercase letters type as their uppercase keys.
    pub fn get(&self, ch: char) -> Option<KeyStroke> {
        self.map.get(&ch.to_ascii_uppercase()).copied()
    }
}

/// Characters reached with SHIFT, by the unshifted key they sit on.
const SHIFTED: &[(char, char)] = &[
    ('!', '1'),
    ('"', '2'),
    ('#', '3'),
    ('$', '4'),
    ('%', '5'),
    ('&', '6'),
    ('\'', '7'),
    ('(', '8'),
    (')', '9'),
    ('*', ':'),
    ('+', ';'),
    ('<', ','),
    ('=', '-'),
    ('>', '.'),
    ('?', '/'),
];

/// Build a typing map from a machine's input buttons. Matching is by button
/// name, so any machine that names its keys after their caps gets a map.
pub fn default_key_map(buttons: &[InputButton]) -> KeyMap {
    let mut km = KeyMap::new();
    let shift = buttons.iter().find(|b| b.name == "SHIFT").map(|b| b.id);

    for button in buttons {
        let ch = match button.name {
            "ENTER" => Some('\n'),
            "SPACE" => Some(' '),
            name => {
                let mut chars = name.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
        };
        if let Some(ch) = ch {
            km.bind(
                ch,
                KeyStroke {
                    button: button.id,
                    shift: None,
                },
            );
        }
    }

    if let Some(shift) = shift {
        for &(shifted, base) in SHIFTED {
            if let Some(stroke) = km.get(base) {
                km.bind(
                    shifted,
                    KeyStroke {
                        button: stroke.button,
                        shift: Some(shift),
                    },
                );
            }
        }
    }

    km
}
