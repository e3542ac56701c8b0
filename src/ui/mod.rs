//! Terminal User Interface components

mod app;
mod report_visual;
pub mod theme;
mod widgets;

pub use app::{App, AppState, AppView};
pub use report_visual::ReportVisual;
pub use theme::ThemeColors;
pub use widgets::*;
