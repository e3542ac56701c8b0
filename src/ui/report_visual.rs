//! Visual rendering of the last report: modifier lamps and key slots

use super::theme::ThemeColors;
use crate::keyboard::describe::format_report_hex;
use crate::keyboard::{key_name, modifier, KeyId, KeyReport, KEY_SLOTS};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

const LAMPS: [(u8, &str); 8] = [
    (modifier::LEFT_CTRL, "LCtl"),
    (modifier::LEFT_SHIFT, "LSft"),
    (modifier::LEFT_ALT, "LAlt"),
    (modifier::LEFT_META, "LCmd"),
    (modifier::RIGHT_CTRL, "RCtl"),
    (modifier::RIGHT_SHIFT, "RSft"),
    (modifier::RIGHT_ALT, "RAlt"),
    (modifier::RIGHT_META, "RCmd"),
];

/// Report slots and modifier bits of the most recent report
pub struct ReportVisual<'a> {
    report: Option<&'a KeyReport>,
    colors: ThemeColors,
}

impl<'a> ReportVisual<'a> {
    pub fn new(report: Option<&'a KeyReport>, colors: ThemeColors) -> Self {
        Self { report, colors }
    }

    fn lamp_style(&self, set: bool) -> Style {
        if set {
            Style::default()
                .fg(self.colors.slot_label_filled)
                .bg(self.colors.lamp_lit)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.colors.muted)
                .bg(self.colors.slot_empty)
        }
    }

    fn slot_style(&self, filled: bool) -> Style {
        if filled {
            Style::default()
                .fg(self.colors.slot_label_filled)
                .bg(self.colors.slot_filled)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(self.colors.slot_label)
                .bg(self.colors.slot_empty)
        }
    }

    fn render_cell(buf: &mut Buffer, x: u16, y: u16, label: &str, w: u16, style: Style) {
        if y < buf.area.height && x + w <= buf.area.width {
            buf.set_string(x, y, format!("{:^w$}", label, w = w as usize), style);
        }
    }
}

/// Slot label: key name, else the raw usage id
fn slot_label(id: u8) -> String {
    if id == 0 {
        return "--".to_string();
    }
    match key_name(KeyId(id)) {
        Some(name) => name.to_string(),
        None => format!("0x{:02x}", id),
    }
}

impl<'a> Widget for ReportVisual<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 48 || area.height < 3 {
            buf.set_string(
                area.x,
                area.y,
                "Window too small",
                Style::default().fg(self.colors.muted),
            );
            return;
        }

        let x0 = area.x + 1;
        let y0 = area.y;
        let bits = self.report.map(|r| r.modifiers).unwrap_or(0);
        let keys = self.report.map(|r| r.keys).unwrap_or([0; KEY_SLOTS]);

        // Row 0: modifier lamps
        let lamp_w = 5u16;
        let mut x = x0;
        for (bit, label) in LAMPS {
            Self::render_cell(buf, x, y0, label, lamp_w, self.lamp_style(bits & bit != 0));
            x += lamp_w + 1;
        }

        // Row 1: key slots
        let slot_w = ((area.width.saturating_sub(2)) / KEY_SLOTS as u16).clamp(6, 12) - 1;
        x = x0;
        for id in keys {
            Self::render_cell(buf, x, y0 + 1, &slot_label(id), slot_w, self.slot_style(id != 0));
            x += slot_w + 1;
        }

        // Row 2: raw bytes
        let hex = match self.report {
            Some(report) => format_report_hex(&report.to_bytes()),
            None => "no report yet".to_string(),
        };
        buf.set_string(x0, y0 + 2, hex, Style::default().fg(self.colors.muted));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::usage;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn slot_labels() {
        assert_eq!(slot_label(0), "--");
        assert_eq!(slot_label(usage::A), "A");
        assert_eq!(slot_label(usage::KEYPAD_5), "0x5d");
    }

    #[test]
    fn renders_slots_and_hex() {
        let report = KeyReport::new(modifier::LEFT_SHIFT, &[usage::A, usage::UP]);
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        ReportVisual::new(Some(&report), ThemeColors::dark()).render(area, &mut buf);

        assert!(row(&buf, 0).contains("LSft"));
        let slots = row(&buf, 1);
        assert!(slots.contains(" A "));
        assert!(slots.contains("Up"));
        assert!(row(&buf, 2).contains("02 00 04 52 00 00 00 00"));
    }

    #[test]
    fn set_modifier_lights_its_lamp() {
        let colors = ThemeColors::dark();
        let report = KeyReport::new(modifier::LEFT_SHIFT, &[usage::A]);
        let area = Rect::new(0, 0, 80, 3);
        let mut buf = Buffer::empty(area);
        ReportVisual::new(Some(&report), colors).render(area, &mut buf);

        // LCtl lamp at x=1, LSft lamp at x=7, first key slot on row 1
        assert_eq!(buf[(1, 0)].bg, colors.slot_empty);
        assert_eq!(buf[(7, 0)].bg, colors.lamp_lit);
        assert_eq!(buf[(1, 1)].bg, colors.slot_filled);
    }

    #[test]
    fn small_area_shows_notice() {
        let area = Rect::new(0, 0, 20, 3);
        let mut buf = Buffer::empty(area);
        ReportVisual::new(None, ThemeColors::light()).render(area, &mut buf);
        assert!(row(&buf, 0).starts_with("Window too small"));
    }
}
