//! VT100 escape sequences for navigation, editing and function keys

use super::keymap::{usage, KeyId};
use std::fmt;

/// Escape introducer byte written before every sequence suffix
pub const ESC: u8 = 0x1B;

/// The ASCII suffix of a VT100 escape sequence (everything after ESC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EscapeSequence(&'static str);

impl EscapeSequence {
    pub const fn new(suffix: &'static str) -> Self {
        Self(suffix)
    }

    pub fn suffix(&self) -> &'static str {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Full sequence bytes: the introducer followed by the suffix
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.0.len() + 1);
        bytes.push(ESC);
        bytes.extend_from_slice(self.0.as_bytes());
        bytes
    }
}

impl fmt::Display for EscapeSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ESC{}", self.0)
    }
}

/// Look up the escape sequence for a key.
///
/// `None` means the key is not a special key at all.
pub fn escape_sequence(key: KeyId) -> Option<EscapeSequence> {
    let suffix = match key.0 {
        usage::UP => "[A",
        usage::DOWN => "[B",
        usage::RIGHT => "[C",
        usage::LEFT => "[D",
        usage::HOME => "[H",
        usage::END => "[F",
        usage::INSERT => "[2~",
        usage::DELETE => "[3~",
        usage::PAGE_UP => "[5~",
        usage::PAGE_DOWN => "[6~",
        usage::F1 => "OP",
        usage::F2 => "OQ",
        usage::F3 => "OR",
        usage::F4 => "OS",
        usage::F5 => "[15~",
        usage::F6 => "[17~",
        usage::F7 => "[18~",
        usage::F8 => "[19~",
        usage::F9 => "[20~",
        usage::F10 => "[21~",
        usage::F11 => "[23~",
        usage::F12 => "[24~",
        _ => return None,
    };
    Some(EscapeSequence(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::keymap::character;

    #[test]
    fn arrow_keys() {
        assert_eq!(escape_sequence(KeyId(usage::UP)).map(|s| s.suffix()), Some("[A"));
        assert_eq!(escape_sequence(KeyId(usage::DOWN)).map(|s| s.suffix()), Some("[B"));
        assert_eq!(escape_sequence(KeyId(usage::RIGHT)).map(|s| s.suffix()), Some("[C"));
        assert_eq!(escape_sequence(KeyId(usage::LEFT)).map(|s| s.suffix()), Some("[D"));
    }

    #[test]
    fn function_keys() {
        let expected = [
            "OP", "OQ", "OR", "OS", "[15~", "[17~", "[18~", "[19~", "[20~", "[21~", "[23~",
            "[24~",
        ];
        for (i, suffix) in expected.iter().enumerate() {
            let key = KeyId(usage::F1 + i as u8);
            assert_eq!(escape_sequence(key).map(|s| s.suffix()), Some(*suffix));
        }
    }

    #[test]
    fn editing_keys() {
        assert_eq!(escape_sequence(KeyId(usage::INSERT)).map(|s| s.suffix()), Some("[2~"));
        assert_eq!(escape_sequence(KeyId(usage::DELETE)).map(|s| s.suffix()), Some("[3~"));
        assert_eq!(escape_sequence(KeyId(usage::PAGE_UP)).map(|s| s.suffix()), Some("[5~"));
        assert_eq!(escape_sequence(KeyId(usage::PAGE_DOWN)).map(|s| s.suffix()), Some("[6~"));
        assert_eq!(escape_sequence(KeyId(usage::HOME)).map(|s| s.suffix()), Some("[H"));
        assert_eq!(escape_sequence(KeyId(usage::END)).map(|s| s.suffix()), Some("[F"));
    }

    #[test]
    fn ordinary_keys_have_no_sequence() {
        assert_eq!(escape_sequence(KeyId(usage::A)), None);
        assert_eq!(escape_sequence(KeyId(usage::ESCAPE)), None);
        assert_eq!(escape_sequence(KeyId(usage::KEYPAD_8)), None);
        assert_eq!(escape_sequence(KeyId(0)), None);
    }

    #[test]
    fn no_sequence_is_empty() {
        for id in 0..=u8::MAX {
            if let Some(seq) = escape_sequence(KeyId(id)) {
                assert!(!seq.is_empty(), "id {:#04x}", id);
            }
        }
    }

    #[test]
    fn tables_do_not_overlap() {
        for id in 0..=u8::MAX {
            let key = KeyId(id);
            if escape_sequence(key).is_some() {
                assert_eq!(character(key, false), None, "id {:#04x}", id);
                assert_eq!(character(key, true), None, "id {:#04x}", id);
            }
        }
    }

    #[test]
    fn bytes_start_with_introducer() {
        let seq = EscapeSequence::new("[5~");
        assert_eq!(seq.to_bytes(), vec![0x1B, b'[', b'5', b'~']);
        assert_eq!(seq.to_string(), "ESC[5~");
    }
}
