//! Keyboard report handling: tables, diffing, translation and report sources

mod builder;
pub mod describe;
mod escape;
mod event;
pub mod keymap;
mod report;
mod scancode;
mod state;
mod translate;

#[cfg(target_os = "linux")]
mod evdev_listener;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use builder::ReportBuilder;
pub use escape::{escape_sequence, EscapeSequence, ESC};
pub use event::{KeyboardListener, SourceEvent};
pub use keymap::{character, key_name, usage, KeyId};
pub use report::{modifier, KeyReport, ModifierState, ReportError, KEY_SLOTS, REPORT_LEN};
pub use scancode::ScanCode;
pub use state::ReportTracker;
pub use translate::{fold_control, translate, Translation};

#[cfg(target_os = "linux")]
pub use evdev_listener::{evdev_status, EvdevError, EvdevListener};
