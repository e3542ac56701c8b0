//! Assemble boot-protocol reports from discrete key down/up events
//!
//! Desktop sources see individual key transitions rather than reports. The
//! builder keeps the held set the way a keyboard would: modifier usages become
//! bits of byte 0, everything else takes the next free slot, and a seventh
//! concurrent key is dropped.

use super::keymap::{usage, KeyId};
use super::report::{KeyReport, KEY_SLOTS};

/// Held-key state that renders to a [`KeyReport`]
#[derive(Debug, Clone, Default)]
pub struct ReportBuilder {
    modifiers: u8,
    keys: Vec<KeyId>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            modifiers: 0,
            keys: Vec::with_capacity(KEY_SLOTS),
        }
    }

    /// Mark a key as held. Returns whether the report changed.
    pub fn press(&mut self, key: KeyId) -> bool {
        if key.is_none() {
            return false;
        }
        if let Some(bit) = modifier_bit(key) {
            let before = self.modifiers;
            self.modifiers |= bit;
            return before != self.modifiers;
        }
        if self.keys.contains(&key) || self.keys.len() >= KEY_SLOTS {
            return false;
        }
        self.keys.push(key);
        true
    }

    /// Mark a key as released. Returns whether the report changed.
    ///
    /// Keys after the released one move down a slot, keeping their order.
    pub fn release(&mut self, key: KeyId) -> bool {
        if let Some(bit) = modifier_bit(key) {
            let before = self.modifiers;
            self.modifiers &= !bit;
            return before != self.modifiers;
        }
        match self.keys.iter().position(|k| *k == key) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.modifiers = 0;
        self.keys.clear();
    }

    pub fn held_keys(&self) -> &[KeyId] {
        &self.keys
    }

    pub fn modifiers(&self) -> u8 {
        self.modifiers
    }

    pub fn report(&self) -> KeyReport {
        let ids: Vec<u8> = self.keys.iter().map(|k| k.0).collect();
        KeyReport::new(self.modifiers, &ids)
    }
}

/// Modifier byte bit for a modifier usage (0xE0..=0xE7)
fn modifier_bit(key: KeyId) -> Option<u8> {
    key.is_modifier().then(|| 1 << (key.0 - usage::LEFT_CTRL))
}
