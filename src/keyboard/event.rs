//! Report source events and the polling keyboard listener

use super::builder::ReportBuilder;
use super::scancode::ScanCode;
use super::KeyId;
use device_query::{DeviceQuery, DeviceState};
use log::{debug, info};
use std::sync::mpsc;

/// Something a report source tells the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceEvent {
    /// A keyboard became available, identified by name
    Connected(String),
    /// Raw report bytes, one per scan cycle or notification
    Report(Vec<u8>),
    /// The keyboard went away
    Disconnected,
}

/// Report a key transition through the builder, sending the new report if
/// it changed
fn send_transition(
    builder: &mut ReportBuilder,
    event_tx: &mpsc::Sender<SourceEvent>,
    key: KeyId,
    pressed: bool,
) -> bool {
    if key.is_none() {
        return false;
    }
    let changed = if pressed {
        builder.press(key)
    } else {
        builder.release(key)
    };
    if changed {
        let _ = event_tx.send(SourceEvent::Report(builder.report().to_bytes().to_vec()));
    }
    changed
}

/// Keyboard listener that polls the global key state and emits reports
pub struct KeyboardListener {
    device_state: DeviceState,
    last_keys: Vec<device_query::Keycode>,
    builder: ReportBuilder,
    event_tx: mpsc::Sender<SourceEvent>,
    announced: bool,
}

impl KeyboardListener {
    /// Display name announced when polling starts
    pub const DEVICE_NAME: &'static str = "System keyboard";

    /// Create a new keyboard listener
    pub fn new(event_tx: mpsc::Sender<SourceEvent>) -> Self {
        Self {
            device_state: DeviceState::new(),
            last_keys: Vec::new(),
            builder: ReportBuilder::new(),
            event_tx,
            announced: false,
        }
    }

    /// Poll for keyboard state changes.
    /// Returns the number of reports sent.
    pub fn poll(&mut self) -> usize {
        if !self.announced {
            info!("polling source started");
            let _ = self
                .event_tx
                .send(SourceEvent::Connected(Self::DEVICE_NAME.to_string()));
            self.announced = true;
        }

        let current_keys = self.device_state.get_keys();
        let mut report_count = 0;

        // Releases first so freed slots are available to new presses
        for key in &self.last_keys {
            if !current_keys.contains(key) {
                let id = ScanCode::from(*key).to_key_id();
                if send_transition(&mut self.builder, &self.event_tx, id, false) {
                    report_count += 1;
                }
            }
        }

        for key in &current_keys {
            if !self.last_keys.contains(key) {
                let id = ScanCode::from(*key).to_key_id();
                if id.is_none() {
                    debug!("no HID usage for {:?}", key);
                }
                if send_transition(&mut self.builder, &self.event_tx, id, true) {
                    report_count += 1;
                }
            }
        }

        self.last_keys = current_keys;
        report_count
    }

    /// Forget held keys without emitting anything
    pub fn reset(&mut self) {
        self.builder.clear();
        self.last_keys.clear();
    }
}
