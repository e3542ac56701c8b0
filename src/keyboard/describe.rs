//! Human-readable descriptions of reports and output for the key logger

use super::escape::ESC;
use super::report::{modifier, ModifierState};
use super::translate::Translation;

const MODIFIER_NAMES: [(u8, &str); 8] = [
    (modifier::LEFT_CTRL, "LCtrl"),
    (modifier::LEFT_SHIFT, "LShift"),
    (modifier::LEFT_ALT, "LAlt"),
    (modifier::LEFT_META, "LCmd"),
    (modifier::RIGHT_CTRL, "RCtrl"),
    (modifier::RIGHT_SHIFT, "RShift"),
    (modifier::RIGHT_ALT, "RAlt"),
    (modifier::RIGHT_META, "RCmd"),
];

/// Names of the set modifier bits joined with `+`, in bit order
pub fn modifier_names(bits: u8) -> String {
    MODIFIER_NAMES
        .iter()
        .filter(|(bit, _)| bits & bit != 0)
        .map(|(_, name)| *name)
        .collect::<Vec<_>>()
        .join("+")
}

/// Short label for the folded modifier state, e.g. `Ctrl Shift`
pub fn modifier_state_label(state: ModifierState) -> String {
    let mut parts = Vec::new();
    if state.ctrl {
        parts.push("Ctrl");
    }
    if state.shift {
        parts.push("Shift");
    }
    if state.alt {
        parts.push("Alt");
    }
    parts.join(" ")
}

/// Space-separated lowercase hex of raw report bytes
pub fn format_report_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Readable form of a single output byte
pub fn describe_byte(b: u8) -> String {
    match b {
        b'\r' => "CR".to_string(),
        b'\n' => "LF".to_string(),
        b'\t' => "TAB".to_string(),
        ESC => "ESC".to_string(),
        0x7F => "DEL".to_string(),
        0x20..=0x7E => format!("'{}'", b as char),
        0x01..=0x1A => format!("Ctrl+{}", (b'A' + b - 1) as char),
        _ => format!("0x{:02x}", b),
    }
}

/// One-line description of a translation result
pub fn describe_translation(translation: &Translation) -> String {
    match translation {
        Translation::Char(c) => format!("ASCII: {} (0x{:02x})", describe_byte(*c), c),
        Translation::Escape(seq) => format!(
            "VT100: {} (hex: {})",
            seq,
            format_report_hex(&seq.to_bytes()).to_uppercase()
        ),
        Translation::Unmapped => "no mapping".to_string(),
    }
}

/// Render an output byte stream with control bytes made visible
pub fn render_output(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            0x20..=0x7E => out.push(b as char),
            ESC => out.push_str("^["),
            b'\r' => out.push_str("\u{21b5}"),
            0x7F => out.push_str("^?"),
            0x00..=0x1F => {
                out.push('^');
                out.push((b + b'@') as char);
            }
            _ => out.push_str(&format!("\\x{:02x}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::EscapeSequence;

    #[test]
    fn modifier_names_in_bit_order() {
        assert_eq!(modifier_names(0), "");
        assert_eq!(modifier_names(modifier::LEFT_CTRL), "LCtrl");
        assert_eq!(
            modifier_names(modifier::RIGHT_META | modifier::LEFT_SHIFT | modifier::LEFT_CTRL),
            "LCtrl+LShift+RCmd"
        );
    }

    #[test]
    fn modifier_state_labels() {
        let state = ModifierState {
            shift: true,
            ctrl: true,
            alt: false,
        };
        assert_eq!(modifier_state_label(state), "Ctrl Shift");
        assert_eq!(modifier_state_label(ModifierState::default()), "");
    }

    #[test]
    fn report_hex() {
        assert_eq!(
            format_report_hex(&[0x02, 0x00, 0x04, 0, 0, 0, 0, 0xff]),
            "02 00 04 00 00 00 00 ff"
        );
    }

    #[test]
    fn byte_descriptions() {
        assert_eq!(describe_byte(b'a'), "'a'");
        assert_eq!(describe_byte(b'\r'), "CR");
        assert_eq!(describe_byte(b'\t'), "TAB");
        assert_eq!(describe_byte(0x1B), "ESC");
        assert_eq!(describe_byte(0x01), "Ctrl+A");
        assert_eq!(describe_byte(0x1A), "Ctrl+Z");
        assert_eq!(describe_byte(0x08), "Ctrl+H");
    }

    #[test]
    fn translation_descriptions() {
        assert_eq!(describe_translation(&Translation::Char(b'a')), "ASCII: 'a' (0x61)");
        assert_eq!(
            describe_translation(&Translation::Escape(EscapeSequence::new("[A"))),
            "VT100: ESC[A (hex: 1B 5B 41)"
        );
        assert_eq!(describe_translation(&Translation::Unmapped), "no mapping");
    }

    #[test]
    fn rendered_output_shows_controls() {
        assert_eq!(render_output(b"hi"), "hi");
        assert_eq!(render_output(&[0x1B, b'[', b'A']), "^[[A");
        assert_eq!(render_output(&[0x03]), "^C");
    }
}
