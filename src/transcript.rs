//! Key logger transcript and export functionality

use crate::keyboard::describe::{
    describe_translation, format_report_hex, modifier_names, modifier_state_label,
};
use crate::keyboard::key_name;
use crate::session::{Keystroke, SessionStatus};
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

/// One translated keystroke as shown and exported
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeystrokeEntry {
    /// HID usage id
    pub key: u8,
    /// Key name, when the key has one
    pub name: Option<String>,
    /// Folded modifiers at the time of the press
    pub modifiers: String,
    /// What the key produced
    pub output: String,
    /// Whether anything was written to the sink
    pub mapped: bool,
}

impl From<&Keystroke> for KeystrokeEntry {
    fn from(stroke: &Keystroke) -> Self {
        Self {
            key: stroke.key.0,
            name: key_name(stroke.key).map(str::to_string),
            modifiers: modifier_state_label(stroke.modifiers),
            output: describe_translation(&stroke.translation),
            mapped: stroke.translation.is_mapped(),
        }
    }
}

/// One delivered report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Local wall-clock time of arrival
    pub timestamp: String,
    /// Raw report bytes as hex
    pub report_hex: String,
    /// Set modifier bits by name
    pub modifiers: String,
    /// Newly pressed keys in slot order
    pub keystrokes: Vec<KeystrokeEntry>,
    /// Rejection reason for malformed reports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<String>,
}

impl TranscriptEntry {
    fn stamped(bytes: &[u8]) -> Self {
        let now: DateTime<Local> = Local::now();
        Self {
            timestamp: now.format("%H:%M:%S%.3f").to_string(),
            report_hex: format_report_hex(bytes),
            modifiers: bytes.first().map(|m| modifier_names(*m)).unwrap_or_default(),
            keystrokes: Vec::new(),
            rejected: None,
        }
    }

    /// Entry for an accepted report
    pub fn accepted(bytes: &[u8], keystrokes: &[Keystroke]) -> Self {
        Self {
            keystrokes: keystrokes.iter().map(KeystrokeEntry::from).collect(),
            ..Self::stamped(bytes)
        }
    }

    /// Entry for a rejected report
    pub fn rejected(bytes: &[u8], reason: impl Into<String>) -> Self {
        Self {
            rejected: Some(reason.into()),
            ..Self::stamped(bytes)
        }
    }
}

/// Bounded log of recent reports
#[derive(Debug, Clone)]
pub struct Transcript {
    entries: VecDeque<TranscriptEntry>,
    capacity: usize,
    total: u64,
}

impl Transcript {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(1024)),
            capacity: capacity.max(1),
            total: 0,
        }
    }

    /// Append an entry, dropping the oldest past capacity
    pub fn push(&mut self, entry: TranscriptEntry) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        self.total += 1;
    }

    pub fn entries(&self) -> impl DoubleEndedIterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entries ever pushed, including evicted ones
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Exported transcript document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptExport {
    pub metadata: ExportMetadata,
    pub summary: ExportSummary,
    pub entries: Vec<TranscriptEntry>,
}

/// Export metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    /// Export timestamp
    pub generated_at: String,
    /// Application version
    pub version: String,
    /// Session duration in seconds
    pub duration_secs: f64,
    /// Keyboard name, if one was connected
    pub device: Option<String>,
}

/// Session counters at export time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportSummary {
    pub reports_processed: u64,
    pub reports_rejected: u64,
    pub bytes_emitted: u64,
    pub keystrokes: usize,
    pub unmapped: usize,
}

impl TranscriptExport {
    pub fn new(start_time: Instant, status: &SessionStatus, transcript: &Transcript) -> Self {
        let now: DateTime<Utc> = Utc::now();
        let entries: Vec<TranscriptEntry> = transcript.entries().cloned().collect();

        let keystrokes = entries.iter().map(|e| e.keystrokes.len()).sum();
        let unmapped = entries
            .iter()
            .flat_map(|e| e.keystrokes.iter())
            .filter(|k| !k.mapped)
            .count();

        Self {
            metadata: ExportMetadata {
                generated_at: now.to_rfc3339(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                duration_secs: start_time.elapsed().as_secs_f64(),
                device: status.device.clone(),
            },
            summary: ExportSummary {
                reports_processed: status.reports_processed,
                reports_rejected: status.reports_rejected,
                bytes_emitted: status.bytes_emitted,
                keystrokes,
                unmapped,
            },
            entries,
        }
    }

    /// Export to a JSON file
    pub fn export_json(&self, path: &Path) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Export to a JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
