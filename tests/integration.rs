//! Integration tests for keyterm
//!
//! These drive the public API end to end: raw reports through the session
//! into a sink, simulated key events through the report builder, the key
//! logger app pipeline and config persistence.

use keyterm::config::{Config, InputSource, OutputMode, Theme};
use keyterm::keyboard::{
    modifier, usage, KeyId, KeyReport, ReportBuilder, SourceEvent, Translation,
};
use keyterm::session::{OutputSink, Session, SessionError, WriterSink};
use keyterm::transcript::{Transcript, TranscriptEntry, TranscriptExport};
use keyterm::ui::{App, AppState, AppView};
use std::io;
use std::time::Instant;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn bytes(modifiers: u8, keys: &[u8]) -> Vec<u8> {
    KeyReport::new(modifiers, keys).to_bytes().to_vec()
}

/// Sink recording each emit call separately
#[derive(Default)]
struct RecordingSink {
    calls: Vec<Vec<u8>>,
    flushes: usize,
}

impl OutputSink for RecordingSink {
    fn emit(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.calls.push(bytes.to_vec());
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}

/// Press and release each key through the builder, delivering every report
fn type_keys(session: &mut Session<Vec<u8>>, builder: &mut ReportBuilder, keys: &[u8]) {
    for &key in keys {
        builder.press(KeyId(key));
        session
            .deliver_report(&builder.report().to_bytes())
            .unwrap();
        builder.release(KeyId(key));
        session
            .deliver_report(&builder.report().to_bytes())
            .unwrap();
    }
}

// ---------------------------------------------------------------------------
// Session scenarios
// ---------------------------------------------------------------------------

#[test]
fn typing_a_shell_command() {
    let mut session = Session::new(Vec::new());
    let mut builder = ReportBuilder::new();
    session.connect("Test keyboard");

    // "ls -l" then Enter
    type_keys(
        &mut session,
        &mut builder,
        &[0x0F, 0x16, usage::SPACE, usage::MINUS, 0x0F, usage::ENTER],
    );
    assert_eq!(session.sink().as_slice(), b"ls -l\r");
}

#[test]
fn shifted_symbols_and_uppercase() {
    let mut session = Session::new(Vec::new());
    let mut builder = ReportBuilder::new();

    builder.press(KeyId(usage::LEFT_SHIFT));
    type_keys(&mut session, &mut builder, &[0x0B, usage::DIGIT_1, usage::SLASH]);
    builder.release(KeyId(usage::LEFT_SHIFT));
    type_keys(&mut session, &mut builder, &[usage::QUOTE]);

    assert_eq!(session.sink().as_slice(), b"H!?'");
}

#[test]
fn ctrl_c_produces_etx() {
    let mut session = Session::new(Vec::new());
    session
        .deliver_report(&bytes(modifier::RIGHT_CTRL, &[0x06]))
        .unwrap();
    assert_eq!(session.sink().as_slice(), &[0x03]);
}

#[test]
fn navigation_keys_ignore_modifiers() {
    let mut session = Session::new(Vec::new());
    let all = modifier::CTRL | modifier::SHIFT | modifier::ALT;
    session
        .deliver_report(&bytes(all, &[usage::HOME, usage::F5]))
        .unwrap();
    assert_eq!(session.sink().as_slice(), b"\x1b[H\x1b[15~");
}

#[test]
fn each_translation_is_one_emit_call() {
    let mut session = Session::new(RecordingSink::default());
    session
        .deliver_report(&bytes(0, &[usage::A, usage::UP, usage::KEYPAD_1]))
        .unwrap();

    let sink = session.sink();
    assert_eq!(sink.calls, vec![b"a".to_vec(), b"\x1b[A".to_vec()]);
    assert_eq!(sink.flushes, 1);
}

#[test]
fn held_key_is_not_repeated() {
    let mut session = Session::new(Vec::new());
    let held = bytes(0, &[usage::DOWN]);
    for _ in 0..10 {
        session.deliver_report(&held).unwrap();
    }
    assert_eq!(session.sink().as_slice(), b"\x1b[B");
}

#[test]
fn release_and_press_again_repeats() {
    let mut session = Session::new(Vec::new());
    session.deliver_report(&bytes(0, &[usage::A])).unwrap();
    session.deliver_report(&bytes(0, &[])).unwrap();
    session.deliver_report(&bytes(0, &[usage::A])).unwrap();
    assert_eq!(session.sink().as_slice(), b"aa");
}

#[test]
fn rollover_keeps_new_key_only() {
    let mut session = Session::new(Vec::new());
    session.deliver_report(&bytes(0, &[usage::A])).unwrap();
    let strokes = session
        .deliver_report(&bytes(0, &[0x05, usage::A]))
        .unwrap();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].translation, Translation::Char(b'b'));
}

#[test]
fn malformed_reports_leave_session_intact() {
    let mut session = Session::new(Vec::new());
    session.deliver_report(&bytes(0, &[usage::A])).unwrap();

    assert!(matches!(
        session.deliver_report(&[]),
        Err(SessionError::Report(_))
    ));
    assert!(session.deliver_report(&[0; 7]).is_err());

    // Still held, so nothing new
    session.deliver_report(&bytes(0, &[usage::A])).unwrap();
    assert_eq!(session.sink().as_slice(), b"a");

    let status = session.status();
    assert_eq!(status.reports_rejected, 2);
    assert_eq!(status.reports_processed, 2);
}

#[test]
fn oversized_report_uses_first_eight_bytes() {
    let mut session = Session::new(Vec::new());
    let mut long = bytes(0, &[usage::A]);
    long.extend_from_slice(&[0x05, 0x06]);
    session.deliver_report(&long).unwrap();
    assert_eq!(session.sink().as_slice(), b"a");
}

#[test]
fn reconnect_starts_fresh() {
    let mut session = Session::new(WriterSink::new(Vec::new()));
    let events = [
        SourceEvent::Connected("Keyboard A".to_string()),
        SourceEvent::Report(bytes(0, &[usage::TAB])),
        SourceEvent::Disconnected,
        SourceEvent::Connected("Keyboard B".to_string()),
        SourceEvent::Report(bytes(0, &[usage::TAB])),
    ];
    for event in &events {
        session.handle(event).unwrap();
    }
    assert_eq!(session.device(), Some("Keyboard B"));
    assert_eq!(session.into_sink().into_inner(), b"\t\t");
}

// ---------------------------------------------------------------------------
// Report builder
// ---------------------------------------------------------------------------

#[test]
fn builder_drops_seventh_key() {
    let mut builder = ReportBuilder::new();
    for key in usage::A..usage::A + 7 {
        builder.press(KeyId(key));
    }
    let report = builder.report();
    assert_eq!(report.keys, [0x04, 0x05, 0x06, 0x07, 0x08, 0x09]);
}

#[test]
fn builder_release_shifts_later_keys() {
    let mut builder = ReportBuilder::new();
    for key in [usage::A, 0x05, 0x06] {
        builder.press(KeyId(key));
    }
    builder.release(KeyId(0x05));
    assert_eq!(builder.report().keys, [0x04, 0x06, 0, 0, 0, 0]);
}

// ---------------------------------------------------------------------------
// App pipeline
// ---------------------------------------------------------------------------

#[test]
fn app_pipeline_records_transcript_and_output() {
    let mut app = App::default();
    app.handle_source_event(&SourceEvent::Connected("Test keyboard".to_string()));
    app.handle_source_event(&SourceEvent::Report(bytes(modifier::LEFT_SHIFT, &[usage::A])));
    app.handle_source_event(&SourceEvent::Report(bytes(0, &[])));
    app.handle_source_event(&SourceEvent::Report(bytes(0, &[usage::LEFT])));

    assert_eq!(app.output(), b"A\x1b[D");
    assert_eq!(app.transcript.len(), 3);
    assert_eq!(app.total_events, 4);

    let export = app.generate_export();
    assert_eq!(export.metadata.device.as_deref(), Some("Test keyboard"));
    assert_eq!(export.summary.keystrokes, 2);
    assert_eq!(export.summary.bytes_emitted, 4);
}

#[test]
fn app_state_transitions() {
    let mut app = App::default();
    assert_eq!(app.state, AppState::Running);
    app.toggle_pause();
    assert_eq!(app.state, AppState::Paused);
    app.toggle_pause();
    assert_eq!(app.state, AppState::Running);
    app.quit();
    app.toggle_pause();
    assert_eq!(app.state, AppState::Quitting);
}

#[test]
fn app_views_cover_all_tabs() {
    let mut app = App::default();
    let mut seen = Vec::new();
    for _ in 0..AppView::all().len() {
        seen.push(app.view);
        app.next_view();
    }
    assert_eq!(seen, AppView::all());
    assert_eq!(app.view, AppView::Logger);
}

#[test]
fn app_export_writes_json() {
    let mut app = App::default();
    app.handle_source_event(&SourceEvent::Report(bytes(0, &[usage::ENTER])));

    let path = std::env::temp_dir().join(format!("keyterm-export-{}.json", std::process::id()));
    let msg = app.export_transcript(&path).unwrap();
    assert!(msg.starts_with("Exported to"));

    let json = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["bytes_emitted"], 1);
    assert_eq!(value["entries"][0]["keystrokes"][0]["output"], "ASCII: CR (0x0d)");
    let _ = std::fs::remove_file(&path);
}

#[test]
fn transcript_export_round_trips_through_json() {
    let mut session = Session::new(Vec::new());
    let mut transcript = Transcript::new(4);
    let report = bytes(0, &[usage::ESCAPE]);
    let strokes = session.deliver_report(&report).unwrap();
    transcript.push(TranscriptEntry::accepted(&report, &strokes));

    let export = TranscriptExport::new(Instant::now(), &session.status(), &transcript);
    let json = export.to_json().unwrap();
    let parsed: TranscriptExport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.entries, export.entries);
    assert_eq!(parsed.entries[0].keystrokes[0].output, "ASCII: ESC (0x1b)");
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[test]
fn config_round_trip_through_file() {
    let path = std::env::temp_dir().join(format!("keyterm-int-{}.toml", std::process::id()));
    let mut config = Config::default();
    config.input.source = InputSource::Evdev;
    config.output.mode = OutputMode::Pipe;
    config.ui.theme = Theme::Light;
    config.ui.transcript_len = 10;
    config.save_to(&path).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);

    let app = App::new(loaded);
    assert_eq!(app.transcript.capacity(), 10);
    let _ = std::fs::remove_file(&path);
}
