//! Colour palettes for the key logger
//!
//! Widgets take a [`ThemeColors`] by value and never pick colours themselves,
//! so switching `ui.theme` in the config restyles every view.

use crate::config::Theme;
use ratatui::style::Color;

/// Palette shared by every widget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub bg: Color,
    /// Report bytes, output text, help body
    pub text: Color,
    /// Borders, timestamps, unmapped keys
    pub muted: Color,
    /// Key names, active tab
    pub accent: Color,
    /// Emitted translations
    pub ok: Color,
    /// Modifier tags and status messages
    pub warn: Color,
    /// Rejected reports
    pub error: Color,
    /// Key slot holding no usage id
    pub slot_empty: Color,
    /// Key slot holding a usage id
    pub slot_filled: Color,
    pub slot_label: Color,
    pub slot_label_filled: Color,
    /// Modifier bit set in byte 0
    pub lamp_lit: Color,
    /// Status and tab bar fill
    pub bar: Color,
}

impl ThemeColors {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(22, 22, 30),
            text: Color::Rgb(200, 200, 210),
            muted: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            ok: Color::Rgb(80, 200, 120),
            warn: Color::Rgb(240, 180, 80),
            error: Color::Rgb(240, 90, 100),
            slot_empty: Color::Rgb(40, 40, 50),
            slot_filled: Color::Rgb(80, 200, 120),
            slot_label: Color::Rgb(180, 180, 190),
            slot_label_filled: Color::Rgb(20, 20, 25),
            lamp_lit: Color::Rgb(240, 180, 80),
            bar: Color::Rgb(55, 55, 70),
        }
    }

    /// For bright terminal backgrounds
    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(245, 245, 248),
            text: Color::Rgb(30, 30, 40),
            muted: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(0, 130, 160),
            ok: Color::Rgb(30, 150, 70),
            warn: Color::Rgb(180, 120, 0),
            error: Color::Rgb(200, 50, 60),
            slot_empty: Color::Rgb(220, 220, 228),
            slot_filled: Color::Rgb(30, 150, 70),
            slot_label: Color::Rgb(50, 50, 60),
            slot_label_filled: Color::Rgb(255, 255, 255),
            lamp_lit: Color::Rgb(180, 120, 0),
            bar: Color::Rgb(200, 200, 212),
        }
    }
}
