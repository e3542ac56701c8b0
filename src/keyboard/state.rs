//! Report state tracking
//!
//! The tracker remembers which keys the previous report held so that each new
//! report yields only the keys that went down since then. Releases are not
//! reported.

use super::report::{KeyReport, ModifierState, ReportError, KEY_SLOTS};
use super::KeyId;

/// Edge detector over successive keyboard reports
#[derive(Debug, Clone, Default)]
pub struct ReportTracker {
    /// Keys held in the previous report (the pressed key set)
    pressed: Vec<KeyId>,
    /// Modifiers of the previous report
    modifiers: ModifierState,
}

impl ReportTracker {
    pub fn new() -> Self {
        Self {
            pressed: Vec::with_capacity(KEY_SLOTS),
            modifiers: ModifierState::default(),
        }
    }

    /// Validate raw bytes and diff them against the stored snapshot.
    ///
    /// A malformed report leaves the snapshot untouched.
    pub fn submit(&mut self, bytes: &[u8]) -> Result<Vec<KeyId>, ReportError> {
        let report = KeyReport::parse(bytes)?;
        Ok(self.diff(&report))
    }

    /// Return the keys held in `report` but not in the previous one, in slot
    /// order, then replace the snapshot with `report`.
    pub fn diff(&mut self, report: &KeyReport) -> Vec<KeyId> {
        let mut newly_pressed = Vec::new();
        let mut held = Vec::with_capacity(KEY_SLOTS);

        for key in report.pressed() {
            // Duplicate slots count as one press
            if held.contains(&key) {
                continue;
            }
            held.push(key);
            if !self.pressed.contains(&key) {
                newly_pressed.push(key);
            }
        }

        self.pressed = held;
        self.modifiers = report.modifier_state();
        newly_pressed
    }

    /// Drop `keys` from the held set so the next report containing them
    /// presses them again
    pub fn forget(&mut self, keys: &[KeyId]) {
        self.pressed.retain(|key| !keys.contains(key));
    }

    /// Forget everything held. Called on connect and disconnect.
    pub fn reset(&mut self) {
        self.pressed.clear();
        self.modifiers = ModifierState::default();
    }

    /// Keys held in the last accepted report
    pub fn pressed_keys(&self) -> &[KeyId] {
        &self.pressed
    }

    pub fn is_held(&self, key: KeyId) -> bool {
        self.pressed.contains(&key)
    }

    /// Modifiers of the last accepted report
    pub fn modifiers(&self) -> ModifierState {
        self.modifiers
    }
}
