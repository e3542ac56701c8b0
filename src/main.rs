//! keyterm - HID keyboard reports to VT100 terminal output
//!
//! Runs either as an interactive key logger (TUI) or as a pipe that writes
//! the translated byte stream to stdout or a file.

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyCode as CtKeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{error, info};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::Style,
    symbols::border,
    widgets::{Block, Borders},
    Terminal,
};
use std::{
    fs::OpenOptions,
    io::{self, stdout, Write},
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc, Arc,
    },
    thread,
    time::Instant,
};

use keyterm::{
    config::{Config, InputSource, LoggingConfig, OutputMode},
    keyboard::{KeyboardListener, SourceEvent},
    session::{Session, SessionError, WriterSink},
    transcript::{Transcript, TranscriptEntry, TranscriptExport},
    ui::{
        App, AppState, AppView, HelpPanel, OutputPanel, ReportVisual, StatusBar, TabBar, ThemeColors,
        TranscriptPanel,
    },
};

#[cfg(target_os = "linux")]
use keyterm::keyboard::{evdev_status, EvdevListener};

/// Translate keyboard reports into VT100 terminal output.
#[derive(Debug, Parser)]
#[command(
    name = "keyterm",
    about = "Translate HID keyboard reports into VT100 terminal output",
    version
)]
struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write translated bytes instead of running the key logger
    #[arg(long)]
    pipe: bool,

    /// Pipe mode output file; implies --pipe
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Report source
    #[arg(long, value_enum)]
    source: Option<InputSource>,

    /// Write the transcript as JSON on exit
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,
}

impl Cli {
    /// Load the config file and apply command line overrides
    fn load_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()))?,
            None => Config::load().context("loading config")?,
        };

        if let Some(source) = self.source {
            config.input.source = source;
        }
        if self.pipe || self.output.is_some() {
            config.output.mode = OutputMode::Pipe;
        }
        if let Some(path) = &self.output {
            config.output.path = Some(path.clone());
        }
        Ok(config)
    }
}

/// Route `log` output away from the TUI screen
fn init_logging(logging: &LoggingConfig, mode: OutputMode) -> Result<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(logging.level.as_str()),
    );

    match (&logging.file, mode) {
        (Some(path), _) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }
        // Nothing to log to without clobbering the screen
        (None, OutputMode::Tui) => return Ok(()),
        (None, OutputMode::Pipe) => {
            builder.target(env_logger::Target::Stderr);
        }
    }

    builder.try_init().context("initialising logger")?;
    Ok(())
}

/// The active report source
enum Source {
    Polling(KeyboardListener),
    #[cfg(target_os = "linux")]
    Evdev(EvdevListener),
}

impl Source {
    fn open(kind: InputSource, event_tx: mpsc::Sender<SourceEvent>) -> Result<Self> {
        match kind {
            InputSource::Polling => Ok(Self::Polling(KeyboardListener::new(event_tx))),
            #[cfg(target_os = "linux")]
            InputSource::Evdev => {
                let listener = EvdevListener::new(event_tx).context("opening evdev keyboards")?;
                Ok(Self::Evdev(listener))
            }
            #[cfg(not(target_os = "linux"))]
            InputSource::Evdev => anyhow::bail!("the evdev source is only available on Linux"),
            InputSource::Auto => {
                #[cfg(target_os = "linux")]
                {
                    if let Some(listener) = EvdevListener::try_new(event_tx.clone()) {
                        return Ok(Self::Evdev(listener));
                    }
                }
                Ok(Self::Polling(KeyboardListener::new(event_tx)))
            }
        }
    }

    fn poll(&mut self) -> usize {
        match self {
            Self::Polling(listener) => listener.poll(),
            #[cfg(target_os = "linux")]
            Self::Evdev(listener) => listener.poll(),
        }
    }

    fn reset(&mut self) {
        match self {
            Self::Polling(listener) => listener.reset(),
            #[cfg(target_os = "linux")]
            Self::Evdev(listener) => listener.reset(),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Polling(_) => "Polling source (device_query)".to_string(),
            #[cfg(target_os = "linux")]
            Self::Evdev(listener) => format!(
                "Evdev: {} open, {}",
                listener.device_count(),
                evdev_status()
            ),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.load_config()?;
    init_logging(&config.logging, config.output.mode)?;

    let (event_tx, event_rx) = mpsc::channel::<SourceEvent>();
    let source = Source::open(config.input.source, event_tx)?;
    info!("{}", source.describe());

    match config.output.mode {
        OutputMode::Tui => run_tui(config, source, event_rx, cli.export.as_deref()),
        OutputMode::Pipe => run_pipe(config, source, event_rx, cli.export.as_deref()),
    }
}

/// Raw bytes to stdout or a file until Ctrl+C
fn run_pipe(
    config: Config,
    mut source: Source,
    event_rx: mpsc::Receiver<SourceEvent>,
    export: Option<&Path>,
) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || flag.store(false, Ordering::Relaxed))
        .context("installing Ctrl+C handler")?;

    let writer: Box<dyn Write> = match &config.output.path {
        Some(path) => Box::new(
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening output {}", path.display()))?,
        ),
        None => Box::new(io::stdout()),
    };

    let start_time = Instant::now();
    let mut session = Session::new(WriterSink::new(writer));
    let mut transcript = Transcript::new(config.ui.transcript_len);

    while running.load(Ordering::Relaxed) {
        source.poll();

        while let Ok(event) = event_rx.try_recv() {
            match session.handle(&event) {
                Ok(keystrokes) => {
                    if let SourceEvent::Report(bytes) = &event {
                        transcript.push(TranscriptEntry::accepted(bytes, &keystrokes));
                    }
                }
                Err(SessionError::Report(e)) => {
                    if let SourceEvent::Report(bytes) = &event {
                        transcript.push(TranscriptEntry::rejected(bytes, e.to_string()));
                    }
                }
                Err(e) => return Err(e).context("writing terminal output"),
            }
        }

        thread::sleep(config.poll_interval());
    }

    info!("stopping after {} reports", session.status().reports_processed);
    if let Some(path) = export {
        TranscriptExport::new(start_time, &session.status(), &transcript)
            .export_json(path)
            .with_context(|| format!("exporting transcript to {}", path.display()))?;
    }
    Ok(())
}

/// Interactive key logger
fn run_tui(
    config: Config,
    source: Source,
    event_rx: mpsc::Receiver<SourceEvent>,
    export: Option<&Path>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config);
    app.set_status(source.describe());

    let result = tui_loop(&mut terminal, &mut app, source, &event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result?;

    if let Some(path) = export {
        app.export_transcript(path)
            .with_context(|| format!("exporting transcript to {}", path.display()))?;
    }

    let status = app.session.status();
    println!("\nkeyterm session complete.");
    println!("Reports processed: {}", status.reports_processed);
    println!("Bytes emitted: {}", status.bytes_emitted);
    println!("Session duration: {}", app.elapsed_formatted());
    Ok(())
}

fn tui_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    mut source: Source,
    event_rx: &mpsc::Receiver<SourceEvent>,
) -> Result<()> {
    let tick_rate = app.config.refresh_interval();
    let colors = ThemeColors::from_theme(app.config.ui.theme);

    loop {
        source.poll();
        while let Ok(event) = event_rx.try_recv() {
            app.handle_source_event(&event);
        }

        terminal.draw(|frame| {
            let size = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1), // Tab bar
                    Constraint::Length(5), // Report visual
                    Constraint::Min(6),    // Main content
                    Constraint::Length(1), // Status bar
                ])
                .split(size);

            let tab_names: Vec<&str> = AppView::all().iter().map(|v| v.name()).collect();
            frame.render_widget(TabBar::new(&tab_names, app.view.index(), colors), chunks[0]);

            let report_block = Block::default()
                .title(" Last report ")
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .border_style(Style::default().fg(colors.muted));
            let report_inner = report_block.inner(chunks[1]);
            frame.render_widget(report_block, chunks[1]);
            frame.render_widget(
                ReportVisual::new(app.last_report.as_ref(), colors),
                report_inner,
            );

            match app.view {
                AppView::Logger => frame.render_widget(
                    TranscriptPanel::new(&app.transcript, "Reports", colors),
                    chunks[2],
                ),
                AppView::Output => {
                    frame.render_widget(OutputPanel::new(app.output(), colors), chunks[2])
                }
                AppView::Help => frame.render_widget(HelpPanel::new(colors), chunks[2]),
            }

            let status = app.session.status();
            let elapsed = app.elapsed_formatted();
            let device = app.device_label();
            let bar = StatusBar::new(app.state.label(), &device, &elapsed, colors)
                .counters(status.reports_processed, status.bytes_emitted)
                .message(app.get_status());
            frame.render_widget(bar, chunks[3]);
        })?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        CtKeyCode::Char('q') | CtKeyCode::Esc => app.quit(),
                        CtKeyCode::BackTab => app.prev_view(),
                        CtKeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                            app.prev_view()
                        }
                        CtKeyCode::Tab => app.next_view(),
                        CtKeyCode::Char(' ') => app.toggle_pause(),
                        CtKeyCode::Char('r') => {
                            source.reset();
                            app.reset_session();
                        }
                        CtKeyCode::Char('e') => {
                            let filename = format!(
                                "keyterm_transcript_{}.json",
                                chrono::Utc::now().format("%Y%m%d_%H%M%S")
                            );
                            if let Err(e) = app.export_transcript(Path::new(&filename)) {
                                error!("export failed: {}", e);
                                app.set_status(format!("Export failed: {}", e));
                            }
                        }
                        _ => {}
                    }
                }
            }
        }

        if app.state == AppState::Quitting {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_to_tui() {
        let cli = Cli::parse_from(["keyterm"]);
        assert!(!cli.pipe);
        assert!(cli.output.is_none());
        assert!(cli.source.is_none());
    }

    #[test]
    fn cli_parses_source() {
        let cli = Cli::parse_from(["keyterm", "--source", "polling", "--pipe"]);
        assert_eq!(cli.source, Some(InputSource::Polling));
        assert!(cli.pipe);
    }

    #[test]
    fn cli_rejects_unknown_source() {
        assert!(Cli::try_parse_from(["keyterm", "--source", "bluetooth"]).is_err());
    }

    #[test]
    fn output_implies_pipe_mode() {
        let dir = std::env::temp_dir();
        let config_path = dir.join(format!("keyterm-cli-{}.toml", std::process::id()));
        Config::default().save_to(&config_path).unwrap();

        let cli = Cli::parse_from([
            "keyterm",
            "--config",
            config_path.to_str().unwrap(),
            "--output",
            "/tmp/keyterm.out",
            "--source",
            "evdev",
        ]);
        let config = cli.load_config().unwrap();
        assert_eq!(config.output.mode, OutputMode::Pipe);
        assert_eq!(config.output.path, Some(PathBuf::from("/tmp/keyterm.out")));
        assert_eq!(config.input.source, InputSource::Evdev);

        let _ = std::fs::remove_file(&config_path);
    }
}
