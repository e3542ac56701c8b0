//! Main application state and logic

use crate::config::Config;
use crate::keyboard::{KeyReport, SourceEvent};
use crate::session::{Session, SessionError};
use crate::transcript::{Transcript, TranscriptEntry, TranscriptExport};
use log::warn;
use std::path::Path;
use std::time::Instant;

/// Translated bytes kept for the output view
const OUTPUT_KEEP: usize = 4096;

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Logger,
    Output,
    Help,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Logger => "Logger",
            Self::Output => "Output",
            Self::Help => "Help",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Logger, Self::Output, Self::Help]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Logger => 0,
            Self::Output => 1,
            Self::Help => 2,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Logger,
            1 => Self::Output,
            _ => Self::Help,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Paused,
    Quitting,
}

impl AppState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Running => "RUNNING",
            Self::Paused => "PAUSED",
            Self::Quitting => "QUITTING",
        }
    }
}

/// Key logger application
pub struct App {
    /// Current view
    pub view: AppView,
    /// Application state
    pub state: AppState,
    /// Configuration
    pub config: Config,
    /// Translation session writing into the output buffer
    pub session: Session<Vec<u8>>,
    /// Recent reports
    pub transcript: Transcript,
    /// Last accepted report, for the slot visual
    pub last_report: Option<KeyReport>,
    /// Application start time
    pub start_time: Instant,
    /// Total source events processed
    pub total_events: u64,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            view: AppView::Logger,
            state: AppState::Running,
            transcript: Transcript::new(config.ui.transcript_len),
            config,
            session: Session::new(Vec::new()),
            last_report: None,
            start_time: Instant::now(),
            total_events: 0,
            status_message: None,
            status_time: None,
        }
    }

    /// Feed one source event through the session.
    ///
    /// While paused the session still tracks held keys, so resuming does not
    /// replay them, but nothing is recorded or kept as output.
    pub fn handle_source_event(&mut self, event: &SourceEvent) {
        if self.state == AppState::Quitting {
            return;
        }
        self.total_events += 1;

        match event {
            SourceEvent::Connected(name) => {
                self.session.connect(name.clone());
                self.last_report = None;
                self.set_status(format!("Connected: {}", name));
            }
            SourceEvent::Disconnected => {
                self.session.disconnect();
                self.last_report = None;
                self.set_status("Keyboard disconnected".to_string());
            }
            SourceEvent::Report(bytes) => self.handle_report(bytes),
        }
    }

    fn handle_report(&mut self, bytes: &[u8]) {
        let result = self.session.deliver_report(bytes);
        if self.state == AppState::Paused {
            return;
        }

        match result {
            Ok(keystrokes) => {
                self.last_report = KeyReport::parse(bytes).ok();
                self.transcript
                    .push(TranscriptEntry::accepted(bytes, &keystrokes));
            }
            Err(SessionError::Report(e)) => {
                self.transcript
                    .push(TranscriptEntry::rejected(bytes, e.to_string()));
                self.set_status(format!("Rejected report: {}", e));
            }
            Err(SessionError::Sink { source, emitted }) => {
                warn!("output failed: {}", source);
                self.transcript
                    .push(TranscriptEntry::accepted(bytes, &emitted));
                self.set_status(format!("Output failed: {}", source));
            }
        }

        let output = self.session.sink_mut();
        if output.len() > OUTPUT_KEEP {
            let excess = output.len() - OUTPUT_KEEP;
            output.drain(..excess);
        }
    }

    /// Switch to the next view
    pub fn next_view(&mut self) {
        let next = (self.view.index() + 1) % AppView::all().len();
        self.view = AppView::from_index(next);
    }

    /// Switch to the previous view
    pub fn prev_view(&mut self) {
        let current = self.view.index();
        let prev = if current == 0 {
            AppView::all().len() - 1
        } else {
            current - 1
        };
        self.view = AppView::from_index(prev);
    }

    /// Toggle pause state
    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            AppState::Running => {
                self.session.set_muted(true);
                self.set_status("Paused".to_string());
                AppState::Paused
            }
            AppState::Paused => {
                self.session.set_muted(false);
                self.set_status("Resumed".to_string());
                AppState::Running
            }
            AppState::Quitting => AppState::Quitting,
        };
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Forget held keys and clear recorded output
    pub fn reset_session(&mut self) {
        self.session.reset();
        self.session.sink_mut().clear();
        self.transcript.clear();
        self.last_report = None;
        self.set_status("Session reset".to_string());
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Connection label for the status bar
    pub fn device_label(&self) -> String {
        match self.session.device() {
            Some(name) => name.to_string(),
            None => "no keyboard".to_string(),
        }
    }

    /// Translated output recorded so far
    pub fn output(&self) -> &[u8] {
        self.session.sink()
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        let mins = secs / 60;
        let secs = secs % 60;
        format!("{:02}:{:02}", mins, secs)
    }

    /// Snapshot the transcript for export
    pub fn generate_export(&self) -> TranscriptExport {
        TranscriptExport::new(self.start_time, &self.session.status(), &self.transcript)
    }

    /// Export the transcript to a JSON file
    pub fn export_transcript(&mut self, path: &Path) -> Result<String, std::io::Error> {
        self.generate_export().export_json(path)?;
        let msg = format!("Exported to {}", path.display());
        self.set_status(msg.clone());
        Ok(msg)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
