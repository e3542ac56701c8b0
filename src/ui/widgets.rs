//! Custom TUI widgets

use super::theme::ThemeColors;
use crate::keyboard::describe::render_output;
use crate::transcript::{Transcript, TranscriptEntry};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Widget listing the most recent transcript entries, newest last
pub struct TranscriptPanel<'a> {
    transcript: &'a Transcript,
    title: &'a str,
    colors: ThemeColors,
}

impl<'a> TranscriptPanel<'a> {
    pub fn new(transcript: &'a Transcript, title: &'a str, colors: ThemeColors) -> Self {
        Self {
            transcript,
            title,
            colors,
        }
    }

    fn entry_line(&self, entry: &'a TranscriptEntry) -> Line<'a> {
        let mut spans = vec![
            Span::styled(format!("{} ", entry.timestamp), Style::default().fg(self.colors.muted)),
            Span::styled(format!("{} ", entry.report_hex), Style::default().fg(self.colors.text)),
        ];

        if let Some(reason) = &entry.rejected {
            spans.push(Span::styled(
                format!("rejected: {}", reason),
                Style::default().fg(self.colors.error),
            ));
            return Line::from(spans);
        }

        if !entry.modifiers.is_empty() {
            spans.push(Span::styled(
                format!("[{}] ", entry.modifiers),
                Style::default().fg(self.colors.warn),
            ));
        }

        for stroke in &entry.keystrokes {
            let name = stroke
                .name
                .clone()
                .unwrap_or_else(|| format!("0x{:02x}", stroke.key));
            spans.push(Span::styled(
                format!("{} ", name),
                Style::default().fg(self.colors.accent).add_modifier(Modifier::BOLD),
            ));
            let color = if stroke.mapped {
                self.colors.ok
            } else {
                self.colors.muted
            };
            spans.push(Span::styled(
                format!("-> {}  ", stroke.output),
                Style::default().fg(color),
            ));
        }
        Line::from(spans)
    }
}

impl<'a> Widget for TranscriptPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.muted));

        let inner = block.inner(area);
        block.render(area, buf);

        if self.transcript.is_empty() {
            buf.set_string(
                inner.x,
                inner.y,
                "Press keys on the keyboard to see reports",
                Style::default().fg(self.colors.muted),
            );
            return;
        }

        let visible = inner.height as usize;
        let skip = self.transcript.len().saturating_sub(visible);
        for (row, entry) in self.transcript.entries().skip(skip).enumerate() {
            let line = self.entry_line(entry);
            buf.set_line(inner.x, inner.y + row as u16, &line, inner.width);
        }
    }
}

/// Widget showing the translated byte stream with control bytes visible
pub struct OutputPanel<'a> {
    output: &'a [u8],
    colors: ThemeColors,
}

impl<'a> OutputPanel<'a> {
    pub fn new(output: &'a [u8], colors: ThemeColors) -> Self {
        Self { output, colors }
    }
}

impl<'a> Widget for OutputPanel<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(format!("Terminal output ({} bytes)", self.output.len()))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.muted));

        let text = render_output(self.output);
        // Keep the tail in view
        let inner_width = area.width.saturating_sub(2).max(1) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;
        let chars: Vec<char> = text.chars().collect();
        let keep = inner_width * inner_height;
        let tail: String = chars[chars.len().saturating_sub(keep)..].iter().collect();

        Paragraph::new(tail)
            .style(Style::default().fg(self.colors.text))
            .wrap(Wrap { trim: false })
            .block(block)
            .render(area, buf);
    }
}

/// Widget for the help screen
pub struct HelpPanel {
    colors: ThemeColors,
}

impl HelpPanel {
    pub fn new(colors: ThemeColors) -> Self {
        Self { colors }
    }
}

impl Widget for HelpPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title("Help - keyterm")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.colors.accent));

        let inner = block.inner(area);
        block.render(area, buf);

        let help_text = [
            "",
            " NAVIGATION",
            " -----------",
            " Tab / Shift+Tab  : Switch between views",
            " q / Esc          : Quit application",
            "",
            " CONTROLS",
            " -----------",
            " Space            : Pause/Resume logging",
            " r                : Reset session (forget held keys)",
            " e                : Export transcript to JSON",
            "",
            " VIEWS",
            " -----------",
            " Logger           : Raw reports, key names and translations",
            " Output           : Bytes a VT100 terminal would receive",
            "",
            " A key is translated once when it appears in a report.",
            " Holding it produces nothing more until it is released.",
        ];

        for (i, line) in help_text.iter().enumerate() {
            if i as u16 >= inner.height {
                break;
            }
            let style = if line.contains("---") {
                Style::default().fg(self.colors.muted)
            } else if line.trim_start().chars().all(|c| c.is_ascii_uppercase()) && !line.trim().is_empty() {
                Style::default()
                    .fg(self.colors.warn)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.text)
            };
            buf.set_string(inner.x, inner.y + i as u16, line, style);
        }
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    state: &'a str,
    device: &'a str,
    elapsed: &'a str,
    reports: u64,
    bytes: u64,
    message: Option<&'a str>,
    colors: ThemeColors,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a str, device: &'a str, elapsed: &'a str, colors: ThemeColors) -> Self {
        Self {
            state,
            device,
            elapsed,
            reports: 0,
            bytes: 0,
            message: None,
            colors,
        }
    }

    pub fn counters(mut self, reports: u64, bytes: u64) -> Self {
        self.reports = reports;
        self.bytes = bytes;
        self
    }

    pub fn message(mut self, message: Option<&'a str>) -> Self {
        self.message = message;
        self
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bg_style = Style::default().bg(self.colors.bar).fg(self.colors.text);
        for x in area.x..area.x + area.width {
            buf.set_string(x, area.y, " ", bg_style);
        }

        let left = format!(" {} | {} ", self.state, self.device);
        buf.set_string(area.x, area.y, &left, bg_style.add_modifier(Modifier::BOLD));

        if let Some(msg) = self.message {
            let msg_style = bg_style.fg(self.colors.warn);
            let msg_x = area.x + (area.width / 2).saturating_sub(msg.len() as u16 / 2);
            buf.set_string(msg_x, area.y, msg, msg_style);
        }

        let right = format!(
            " {} | Reports: {} | Bytes: {} ",
            self.elapsed, self.reports, self.bytes
        );
        let right_x = area.x + area.width.saturating_sub(right.len() as u16);
        buf.set_string(right_x, area.y, &right, bg_style);
    }
}

/// Tab bar widget
pub struct TabBar<'a> {
    tabs: &'a [&'a str],
    selected: usize,
    colors: ThemeColors,
}

impl<'a> TabBar<'a> {
    pub fn new(tabs: &'a [&'a str], selected: usize, colors: ThemeColors) -> Self {
        Self {
            tabs,
            selected,
            colors,
        }
    }
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut x = area.x;

        for (i, tab) in self.tabs.iter().enumerate() {
            let style = if i == self.selected {
                Style::default()
                    .fg(self.colors.bg)
                    .bg(self.colors.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.colors.text).bg(self.colors.bar)
            };

            let label = format!(" {} ", tab);
            let width = label.len() as u16;

            if x + width <= area.x + area.width {
                buf.set_string(x, area.y, &label, style);
                x += width;

                if i < self.tabs.len() - 1 && x < area.x + area.width {
                    buf.set_string(x, area.y, "|", Style::default().fg(self.colors.muted));
                    x += 1;
                }
            }
        }

        for fill_x in x..area.x + area.width {
            buf.set_string(fill_x, area.y, " ", Style::default().bg(self.colors.bar));
        }
    }
}
