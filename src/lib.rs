//! keyterm - HID keyboard reports to VT100 terminal output
//!
//! Turns 8-byte boot-protocol keyboard reports into the byte stream a VT100
//! compatible terminal expects: ASCII characters, control codes and escape
//! sequences. The core is transport independent; report sources for desktop
//! keyboards and a terminal key logger are built on top of it.

pub mod config;
pub mod keyboard;
pub mod session;
pub mod transcript;
pub mod ui;

pub use config::Config;
pub use session::{OutputSink, Session, SessionError, WriterSink};
