//! Key translation to terminal output

use super::escape::{escape_sequence, EscapeSequence};
use super::keymap::{character, KeyId};
use super::report::ModifierState;

/// What a newly pressed key produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Translation {
    /// A single output byte, control-folded when Ctrl is held
    Char(u8),
    /// ESC followed by the sequence suffix
    Escape(EscapeSequence),
    /// Key has no mapping; nothing is emitted
    Unmapped,
}

impl Translation {
    /// Bytes to hand to the output sink, `None` when nothing is emitted
    pub fn to_bytes(&self) -> Option<Vec<u8>> {
        match self {
            Translation::Char(c) => Some(vec![*c]),
            Translation::Escape(seq) => Some(seq.to_bytes()),
            Translation::Unmapped => None,
        }
    }

    pub fn is_mapped(&self) -> bool {
        !matches!(self, Translation::Unmapped)
    }
}

/// Translate one newly pressed key under the current modifiers.
///
/// Escape-mapped keys ignore modifiers entirely. Character keys pick the
/// shifted column when Shift is held, and letters fold to 0x01..=0x1A when
/// Ctrl is held.
pub fn translate(key: KeyId, modifiers: ModifierState) -> Translation {
    if let Some(seq) = escape_sequence(key).filter(|seq| !seq.is_empty()) {
        return Translation::Escape(seq);
    }

    match character(key, modifiers.shift) {
        Some(c) if modifiers.ctrl => Translation::Char(fold_control(c)),
        Some(c) => Translation::Char(c),
        None => Translation::Unmapped,
    }
}

/// Map a letter of either case to its control code; other bytes pass through
pub fn fold_control(c: u8) -> u8 {
    if c.is_ascii_alphabetic() {
        c.to_ascii_lowercase() - b'a' + 1
    } else {
        c
    }
}
