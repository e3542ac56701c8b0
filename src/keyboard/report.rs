//! Boot-protocol keyboard report and modifier decoding
//!
//! Layout (8 bytes):
//!
//! | Offset | Meaning |
//! |--------|---------|
//! | 0 | Modifier bitmask |
//! | 1 | Reserved |
//! | 2-7 | Up to six key ids, zero padded |

use super::keymap::KeyId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of a keyboard report in bytes
pub const REPORT_LEN: usize = 8;

/// Number of key slots in a report (6-key rollover)
pub const KEY_SLOTS: usize = 6;

/// Modifier bits of report byte 0
pub mod modifier {
    pub const LEFT_CTRL: u8 = 0x01;
    pub const LEFT_SHIFT: u8 = 0x02;
    pub const LEFT_ALT: u8 = 0x04;
    pub const LEFT_META: u8 = 0x08;
    pub const RIGHT_CTRL: u8 = 0x10;
    pub const RIGHT_SHIFT: u8 = 0x20;
    pub const RIGHT_ALT: u8 = 0x40;
    pub const RIGHT_META: u8 = 0x80;

    pub const CTRL: u8 = LEFT_CTRL | RIGHT_CTRL;
    pub const SHIFT: u8 = LEFT_SHIFT | RIGHT_SHIFT;
    pub const ALT: u8 = LEFT_ALT | RIGHT_ALT;
    pub const META: u8 = LEFT_META | RIGHT_META;
}

/// Report validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("report too short: expected {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
}

/// Shift/Ctrl/Alt state derived from a report's modifier byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ModifierState {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl ModifierState {
    /// Fold the left/right bit pairs of a modifier byte
    pub fn from_bits(bits: u8) -> Self {
        Self {
            shift: bits & modifier::SHIFT != 0,
            ctrl: bits & modifier::CTRL != 0,
            alt: bits & modifier::ALT != 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt)
    }
}

/// One keyboard report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyReport {
    /// Modifier bitmask
    pub modifiers: u8,
    /// Reserved byte, ignored
    pub reserved: u8,
    /// Key slots; 0 marks an empty slot
    pub keys: [u8; KEY_SLOTS],
}

impl KeyReport {
    /// Build a report from a modifier byte and up to six key ids.
    ///
    /// Ids past the sixth are dropped.
    pub fn new(modifiers: u8, keys: &[u8]) -> Self {
        let mut slots = [0u8; KEY_SLOTS];
        for (slot, key) in slots.iter_mut().zip(keys) {
            *slot = *key;
        }
        Self {
            modifiers,
            reserved: 0,
            keys: slots,
        }
    }

    /// Parse raw report bytes.
    ///
    /// Fewer than eight bytes is rejected. Trailing bytes past the eighth
    /// are ignored.
    pub fn parse(bytes: &[u8]) -> Result<Self, ReportError> {
        if bytes.len() < REPORT_LEN {
            return Err(ReportError::TooShort {
                expected: REPORT_LEN,
                actual: bytes.len(),
            });
        }
        let mut keys = [0u8; KEY_SLOTS];
        keys.copy_from_slice(&bytes[2..REPORT_LEN]);
        Ok(Self {
            modifiers: bytes[0],
            reserved: bytes[1],
            keys,
        })
    }

    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut bytes = [0u8; REPORT_LEN];
        bytes[0] = self.modifiers;
        bytes[1] = self.reserved;
        bytes[2..].copy_from_slice(&self.keys);
        bytes
    }

    pub fn modifier_state(&self) -> ModifierState {
        ModifierState::from_bits(self.modifiers)
    }

    /// Non-empty key slots in slot order
    pub fn pressed(&self) -> impl Iterator<Item = KeyId> + '_ {
        self.keys.iter().filter(|&&k| k != 0).map(|&k| KeyId(k))
    }

    /// True when no modifier and no key is held
    pub fn is_empty(&self) -> bool {
        self.modifiers == 0 && self.keys.iter().all(|&k| k == 0)
    }
}

impl TryFrom<&[u8]> for KeyReport {
    type Error = ReportError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::parse(bytes)
    }
}

impl From<[u8; REPORT_LEN]> for KeyReport {
    fn from(bytes: [u8; REPORT_LEN]) -> Self {
        let mut keys = [0u8; KEY_SLOTS];
        keys.copy_from_slice(&bytes[2..]);
        Self {
            modifiers: bytes[0],
            reserved: bytes[1],
            keys,
        }
    }
}
