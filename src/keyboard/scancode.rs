//! Linux input scancodes and their HID usage equivalents
//!
//! Both desktop sources speak Linux input event codes: evdev reports them
//! directly and `device_query` keycodes are mapped onto them first. Every
//! scancode is then converted to the HID key id a real keyboard report would
//! carry.

use super::keymap::{usage, KeyId};

/// A Linux input event key code (`KEY_*` in `input-event-codes.h`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScanCode(pub u16);

impl ScanCode {
    pub fn new(code: u16) -> Self {
        Self(code)
    }

    pub fn as_u16(&self) -> u16 {
        self.0
    }

    /// HID key id for this scancode, [`KeyId::NONE`] when there is no
    /// equivalent
    pub fn to_key_id(&self) -> KeyId {
        let id = match self.0 {
            1 => usage::ESCAPE,
            // KEY_1..KEY_0 line up with the HID digit row
            2..=11 => usage::DIGIT_1 + (self.0 - 2) as u8,
            12 => usage::MINUS,
            13 => usage::EQUAL,
            14 => usage::BACKSPACE,
            15 => usage::TAB,
            16 => 0x14, // Q
            17 => 0x1A, // W
            18 => 0x08, // E
            19 => 0x15, // R
            20 => 0x17, // T
            21 => 0x1C, // Y
            22 => 0x18, // U
            23 => 0x0C, // I
            24 => 0x12, // O
            25 => 0x13, // P
            26 => usage::LEFT_BRACKET,
            27 => usage::RIGHT_BRACKET,
            28 => usage::ENTER,
            29 => usage::LEFT_CTRL,
            30 => 0x04, // A
            31 => 0x16, // S
            32 => 0x07, // D
            33 => 0x09, // F
            34 => 0x0A, // G
            35 => 0x0B, // H
            36 => 0x0D, // J
            37 => 0x0E, // K
            38 => 0x0F, // L
            39 => usage::SEMICOLON,
            40 => usage::QUOTE,
            41 => usage::GRAVE,
            42 => usage::LEFT_SHIFT,
            43 => usage::BACKSLASH,
            44 => 0x1D, // Z
            45 => 0x1B, // X
            46 => 0x06, // C
            47 => 0x19, // V
            48 => 0x05, // B
            49 => 0x11, // N
            50 => 0x10, // M
            51 => usage::COMMA,
            52 => usage::PERIOD,
            53 => usage::SLASH,
            54 => usage::RIGHT_SHIFT,
            55 => usage::KEYPAD_MULTIPLY,
            56 => usage::LEFT_ALT,
            57 => usage::SPACE,
            58 => usage::CAPS_LOCK,
            // KEY_F1..KEY_F10
            59..=68 => usage::F1 + (self.0 - 59) as u8,
            69 => usage::NUM_LOCK,
            70 => usage::SCROLL_LOCK,
            71 => usage::KEYPAD_7,
            72 => usage::KEYPAD_8,
            73 => usage::KEYPAD_9,
            74 => usage::KEYPAD_MINUS,
            75 => usage::KEYPAD_4,
            76 => usage::KEYPAD_5,
            77 => usage::KEYPAD_6,
            78 => usage::KEYPAD_PLUS,
            79 => usage::KEYPAD_1,
            80 => usage::KEYPAD_2,
            81 => usage::KEYPAD_3,
            82 => usage::KEYPAD_0,
            83 => usage::KEYPAD_PERIOD,
            87 => usage::F11,
            88 => usage::F12,
            96 => usage::KEYPAD_ENTER,
            97 => usage::RIGHT_CTRL,
            98 => usage::KEYPAD_DIVIDE,
            99 => usage::PRINT_SCREEN,
            100 => usage::RIGHT_ALT,
            102 => usage::HOME,
            103 => usage::UP,
            104 => usage::PAGE_UP,
            105 => usage::LEFT,
            106 => usage::RIGHT,
            107 => usage::END,
            108 => usage::DOWN,
            109 => usage::PAGE_DOWN,
            110 => usage::INSERT,
            111 => usage::DELETE,
            119 => usage::PAUSE,
            125 => usage::LEFT_META,
            126 => usage::RIGHT_META,
            127 => usage::APPLICATION,
            _ => 0,
        };
        KeyId(id)
    }
}

impl From<u16> for ScanCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

impl From<device_query::Keycode> for ScanCode {
    fn from(keycode: device_query::Keycode) -> Self {
        use device_query::Keycode as DK;
        let code = match keycode {
            DK::Escape => 1,
            DK::Key1 => 2,
            DK::Key2 => 3,
            DK::Key3 => 4,
            DK::Key4 => 5,
            DK::Key5 => 6,
            DK::Key6 => 7,
            DK::Key7 => 8,
            DK::Key8 => 9,
            DK::Key9 => 10,
            DK::Key0 => 11,
            DK::Minus => 12,
            DK::Equal => 13,
            DK::Backspace => 14,
            DK::Tab => 15,
            DK::Q => 16,
            DK::W => 17,
            DK::E => 18,
            DK::R => 19,
            DK::T => 20,
            DK::Y => 21,
            DK::U => 22,
            DK::I => 23,
            DK::O => 24,
            DK::P => 25,
            DK::LeftBracket => 26,
            DK::RightBracket => 27,
            DK::Enter => 28,
            DK::LControl => 29,
            DK::A => 30,
            DK::S => 31,
            DK::D => 32,
            DK::F => 33,
            DK::G => 34,
            DK::H => 35,
            DK::J => 36,
            DK::K => 37,
            DK::L => 38,
            DK::Semicolon => 39,
            DK::Apostrophe => 40,
            DK::Grave => 41,
            DK::LShift => 42,
            DK::BackSlash => 43,
            DK::Z => 44,
            DK::X => 45,
            DK::C => 46,
            DK::V => 47,
            DK::B => 48,
            DK::N => 49,
            DK::M => 50,
            DK::Comma => 51,
            DK::Dot => 52,
            DK::Slash => 53,
            DK::RShift => 54,
            DK::NumpadMultiply => 55,
            DK::LAlt => 56,
            DK::Space => 57,
            DK::CapsLock => 58,
            DK::F1 => 59,
            DK::F2 => 60,
            DK::F3 => 61,
            DK::F4 => 62,
            DK::F5 => 63,
            DK::F6 => 64,
            DK::F7 => 65,
            DK::F8 => 66,
            DK::F9 => 67,
            DK::F10 => 68,
            DK::Numpad7 => 71,
            DK::Numpad8 => 72,
            DK::Numpad9 => 73,
            DK::NumpadSubtract => 74,
            DK::Numpad4 => 75,
            DK::Numpad5 => 76,
            DK::Numpad6 => 77,
            DK::NumpadAdd => 78,
            DK::Numpad1 => 79,
            DK::Numpad2 => 80,
            DK::Numpad3 => 81,
            DK::Numpad0 => 82,
            DK::F11 => 87,
            DK::F12 => 88,
            DK::RControl => 97,
            DK::NumpadDivide => 98,
            DK::RAlt => 100,
            DK::Home => 102,
            DK::Up => 103,
            DK::PageUp => 104,
            DK::Left => 105,
            DK::Right => 106,
            DK::End => 107,
            DK::Down => 108,
            DK::PageDown => 109,
            DK::Insert => 110,
            DK::Delete => 111,
            DK::LMeta => 125,
            DK::RMeta => 126,
            _ => 0,
        };
        Self(code)
    }
}
