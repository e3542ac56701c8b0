//! Translation session: the single entry point every transport feeds
//!
//! A [`Session`] owns the report tracker and an output sink. Transports push
//! raw reports in and the session writes terminal bytes out; it never calls
//! back into the transport.
//!
//! ```
//! use keyterm::session::Session;
//!
//! let mut session = Session::new(Vec::new());
//! session.connect("Test keyboard");
//! session.deliver_report(&[0x01, 0, 0x04, 0, 0, 0, 0, 0]).unwrap();
//! assert_eq!(session.sink().as_slice(), &[0x01]);
//! ```

use crate::keyboard::{
    translate, KeyId, KeyReport, ModifierState, ReportError, ReportTracker, SourceEvent,
    Translation,
};
use log::{debug, info, warn};
use std::io::{self, Write};
use thiserror::Error;

/// Consumer of translated output.
///
/// Each call to [`OutputSink::emit`] carries one complete translation (a
/// single byte or a whole escape sequence) and must be written as one unit.
pub trait OutputSink {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// In-memory sink, used by the key logger and tests
impl OutputSink for Vec<u8> {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

/// Sink over any writer: stdout, a serial device file, a socket
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

/// Session failure
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid report: {0}")]
    Report(#[from] ReportError),
    /// The sink failed partway through a report. `emitted` holds the
    /// keystrokes written before the failure; the keys after it are not
    /// held, so delivering the report again presses them.
    #[error("output sink failed: {source}")]
    Sink {
        source: io::Error,
        emitted: Vec<Keystroke>,
    },
}

/// One newly pressed key and what it produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keystroke {
    pub key: KeyId,
    pub modifiers: ModifierState,
    pub translation: Translation,
}

/// Read-only snapshot for status displays
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionStatus {
    pub connected: bool,
    pub device: Option<String>,
    pub modifiers: ModifierState,
    pub held_keys: Vec<KeyId>,
    pub reports_processed: u64,
    pub reports_rejected: u64,
    pub bytes_emitted: u64,
}

/// Tracker, translator and sink wired together
pub struct Session<S: OutputSink> {
    tracker: ReportTracker,
    sink: S,
    device: Option<String>,
    muted: bool,
    reports_processed: u64,
    reports_rejected: u64,
    bytes_emitted: u64,
}

impl<S: OutputSink> Session<S> {
    pub fn new(sink: S) -> Self {
        Self {
            tracker: ReportTracker::new(),
            sink,
            device: None,
            muted: false,
            reports_processed: 0,
            reports_rejected: 0,
            bytes_emitted: 0,
        }
    }

    /// Diff a raw report, translate every newly pressed key and write the
    /// results to the sink in slot order.
    ///
    /// A malformed report is rejected before any state changes. If the sink
    /// fails, the key it failed on and every later key stay unpressed.
    pub fn deliver_report(&mut self, bytes: &[u8]) -> Result<Vec<Keystroke>, SessionError> {
        let report = match KeyReport::parse(bytes) {
            Ok(report) => report,
            Err(e) => {
                self.reports_rejected += 1;
                warn!("rejected report: {}", e);
                return Err(e.into());
            }
        };

        if self.device.is_none() {
            debug!("report delivered outside a connected session");
        }

        let modifiers = report.modifier_state();
        let pressed = self.tracker.diff(&report);
        self.reports_processed += 1;

        let mut keystrokes = Vec::with_capacity(pressed.len());
        for (i, &key) in pressed.iter().enumerate() {
            let translation = translate(key, modifiers);
            match translation.to_bytes() {
                Some(_) if self.muted => debug!("key {:#04x} muted", key.0),
                Some(out) => {
                    debug!("key {:#04x} -> {:?}", key.0, translation);
                    if let Err(source) = self.sink.emit(&out) {
                        warn!("sink failed on key {:#04x}: {}", key.0, source);
                        self.tracker.forget(&pressed[i..]);
                        return Err(SessionError::Sink {
                            source,
                            emitted: keystrokes,
                        });
                    }
                    self.bytes_emitted += out.len() as u64;
                }
                None => debug!("key {:#04x} has no mapping", key.0),
            }
            keystrokes.push(Keystroke {
                key,
                modifiers,
                translation,
            });
        }

        if !keystrokes.is_empty() && !self.muted {
            if let Err(source) = self.sink.flush() {
                return Err(SessionError::Sink {
                    source,
                    emitted: keystrokes,
                });
            }
        }
        Ok(keystrokes)
    }

    /// Forget held keys and modifiers
    pub fn reset(&mut self) {
        debug!("session reset");
        self.tracker.reset();
    }

    /// Start a fresh session for a newly connected keyboard
    pub fn connect(&mut self, device: impl Into<String>) {
        let device = device.into();
        info!("keyboard connected: {}", device);
        self.tracker.reset();
        self.device = Some(device);
    }

    /// End the session; held keys are forgotten
    pub fn disconnect(&mut self) {
        match self.device.take() {
            Some(device) => info!("keyboard disconnected: {}", device),
            None => debug!("disconnect without a connected keyboard"),
        }
        self.tracker.reset();
    }

    /// Dispatch one source event
    pub fn handle(&mut self, event: &SourceEvent) -> Result<Vec<Keystroke>, SessionError> {
        match event {
            SourceEvent::Connected(name) => {
                self.connect(name.clone());
                Ok(Vec::new())
            }
            SourceEvent::Disconnected => {
                self.disconnect();
                Ok(Vec::new())
            }
            SourceEvent::Report(bytes) => self.deliver_report(bytes),
        }
    }

    /// While muted, reports still update held keys but nothing reaches the
    /// sink or the byte counter
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_connected(&self) -> bool {
        self.device.is_some()
    }

    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    pub fn modifiers(&self) -> ModifierState {
        self.tracker.modifiers()
    }

    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            connected: self.is_connected(),
            device: self.device.clone(),
            modifiers: self.tracker.modifiers(),
            held_keys: self.tracker.pressed_keys().to_vec(),
            reports_processed: self.reports_processed,
            reports_rejected: self.reports_rejected,
            bytes_emitted: self.bytes_emitted,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}
