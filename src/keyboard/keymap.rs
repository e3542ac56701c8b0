//! HID key identifiers and the US character tables
//!
//! Key identifiers are USB HID usage IDs from the Keyboard/Keypad page (0x07).
//! They name physical keys; the character a key produces depends on the
//! modifier state and is looked up in [`character`].

use serde::{Deserialize, Serialize};

/// A HID key identifier as it appears in a report key slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct KeyId(pub u8);

impl KeyId {
    /// Slot value meaning "no key"
    pub const NONE: KeyId = KeyId(0);

    pub fn new(id: u8) -> Self {
        Self(id)
    }

    pub fn as_u8(&self) -> u8 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Modifier keys (LeftCtrl..RightMeta) reported as key usages
    pub fn is_modifier(&self) -> bool {
        (usage::LEFT_CTRL..=usage::RIGHT_META).contains(&self.0)
    }

    pub fn is_keypad(&self) -> bool {
        (usage::NUM_LOCK..=usage::KEYPAD_PERIOD).contains(&self.0)
    }
}

impl From<u8> for KeyId {
    fn from(id: u8) -> Self {
        Self(id)
    }
}

/// Named HID usage IDs used across the crate
pub mod usage {
    pub const A: u8 = 0x04;
    pub const Z: u8 = 0x1D;
    pub const DIGIT_1: u8 = 0x1E;
    pub const DIGIT_0: u8 = 0x27;
    pub const ENTER: u8 = 0x28;
    pub const ESCAPE: u8 = 0x29;
    pub const BACKSPACE: u8 = 0x2A;
    pub const TAB: u8 = 0x2B;
    pub const SPACE: u8 = 0x2C;
    pub const MINUS: u8 = 0x2D;
    pub const EQUAL: u8 = 0x2E;
    pub const LEFT_BRACKET: u8 = 0x2F;
    pub const RIGHT_BRACKET: u8 = 0x30;
    pub const BACKSLASH: u8 = 0x31;
    pub const NON_US_HASH: u8 = 0x32;
    pub const SEMICOLON: u8 = 0x33;
    pub const QUOTE: u8 = 0x34;
    pub const GRAVE: u8 = 0x35;
    pub const COMMA: u8 = 0x36;
    pub const PERIOD: u8 = 0x37;
    pub const SLASH: u8 = 0x38;
    pub const CAPS_LOCK: u8 = 0x39;
    pub const F1: u8 = 0x3A;
    pub const F2: u8 = 0x3B;
    pub const F3: u8 = 0x3C;
    pub const F4: u8 = 0x3D;
    pub const F5: u8 = 0x3E;
    pub const F6: u8 = 0x3F;
    pub const F7: u8 = 0x40;
    pub const F8: u8 = 0x41;
    pub const F9: u8 = 0x42;
    pub const F10: u8 = 0x43;
    pub const F11: u8 = 0x44;
    pub const F12: u8 = 0x45;
    pub const PRINT_SCREEN: u8 = 0x46;
    pub const SCROLL_LOCK: u8 = 0x47;
    pub const PAUSE: u8 = 0x48;
    pub const INSERT: u8 = 0x49;
    pub const HOME: u8 = 0x4A;
    pub const PAGE_UP: u8 = 0x4B;
    pub const DELETE: u8 = 0x4C;
    pub const END: u8 = 0x4D;
    pub const PAGE_DOWN: u8 = 0x4E;
    pub const RIGHT: u8 = 0x4F;
    pub const LEFT: u8 = 0x50;
    pub const DOWN: u8 = 0x51;
    pub const UP: u8 = 0x52;
    pub const NUM_LOCK: u8 = 0x53;
    pub const KEYPAD_DIVIDE: u8 = 0x54;
    pub const KEYPAD_MULTIPLY: u8 = 0x55;
    pub const KEYPAD_MINUS: u8 = 0x56;
    pub const KEYPAD_PLUS: u8 = 0x57;
    pub const KEYPAD_ENTER: u8 = 0x58;
    pub const KEYPAD_1: u8 = 0x59;
    pub const KEYPAD_2: u8 = 0x5A;
    pub const KEYPAD_3: u8 = 0x5B;
    pub const KEYPAD_4: u8 = 0x5C;
    pub const KEYPAD_5: u8 = 0x5D;
    pub const KEYPAD_6: u8 = 0x5E;
    pub const KEYPAD_7: u8 = 0x5F;
    pub const KEYPAD_8: u8 = 0x60;
    pub const KEYPAD_9: u8 = 0x61;
    pub const KEYPAD_0: u8 = 0x62;
    pub const KEYPAD_PERIOD: u8 = 0x63;
    pub const APPLICATION: u8 = 0x65;
    pub const LEFT_CTRL: u8 = 0xE0;
    pub const LEFT_SHIFT: u8 = 0xE1;
    pub const LEFT_ALT: u8 = 0xE2;
    pub const LEFT_META: u8 = 0xE3;
    pub const RIGHT_CTRL: u8 = 0xE4;
    pub const RIGHT_SHIFT: u8 = 0xE5;
    pub const RIGHT_ALT: u8 = 0xE6;
    pub const RIGHT_META: u8 = 0xE7;
}

/// `(unshifted, shifted)` characters indexed by key id; `0` marks no character.
///
/// Covers 0x00..=0x38. Everything above (function keys, navigation, keypad,
/// modifiers) has no character.
static CHARACTERS: [(u8, u8); 0x39] = [
    // 0x00 - 0x03: no event, rollover error, POST fail, undefined
    (0, 0),
    (0, 0),
    (0, 0),
    (0, 0),
    // 0x04 - 0x1D: letters
    (b'a', b'A'),
    (b'b', b'B'),
    (b'c', b'C'),
    (b'd', b'D'),
    (b'e', b'E'),
    (b'f', b'F'),
    (b'g', b'G'),
    (b'h', b'H'),
    (b'i', b'I'),
    (b'j', b'J'),
    (b'k', b'K'),
    (b'l', b'L'),
    (b'm', b'M'),
    (b'n', b'N'),
    (b'o', b'O'),
    (b'p', b'P'),
    (b'q', b'Q'),
    (b'r', b'R'),
    (b's', b'S'),
    (b't', b'T'),
    (b'u', b'U'),
    (b'v', b'V'),
    (b'w', b'W'),
    (b'x', b'X'),
    (b'y', b'Y'),
    (b'z', b'Z'),
    // 0x1E - 0x27: digit row
    (b'1', b'!'),
    (b'2', b'@'),
    (b'3', b'#'),
    (b'4', b'$'),
    (b'5', b'%'),
    (b'6', b'^'),
    (b'7', b'&'),
    (b'8', b'*'),
    (b'9', b'('),
    (b'0', b')'),
    // 0x28 - 0x2C: enter, escape, backspace, tab, space
    (b'\r', b'\r'),
    (0x1B, 0x1B),
    (0x08, 0x08),
    (b'\t', b'\t'),
    (b' ', b' '),
    // 0x2D - 0x38: punctuation (0x32 is the non-US hash key)
    (b'-', b'_'),
    (b'=', b'+'),
    (b'[', b'{'),
    (b']', b'}'),
    (b'\\', b'|'),
    (0, 0),
    (b';', b':'),
    (b'\'', b'"'),
    (b'`', b'~'),
    (b',', b'<'),
    (b'.', b'>'),
    (b'/', b'?'),
];

/// Look up the character a key produces under the given shift state.
///
/// Returns `None` for keys outside the character table.
pub fn character(key: KeyId, shifted: bool) -> Option<u8> {
    let (plain, shift) = CHARACTERS.get(key.0 as usize).copied()?;
    let c = if shifted { shift } else { plain };
    (c != 0).then_some(c)
}

const LETTER_NAMES: [&str; 26] = [
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

const DIGIT_NAMES: [&str; 10] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"];

/// Human-readable name for a key, used by the key logger
pub fn key_name(key: KeyId) -> Option<&'static str> {
    let id = key.0;
    let name = match id {
        usage::A..=usage::Z => LETTER_NAMES[(id - usage::A) as usize],
        usage::DIGIT_1..=usage::DIGIT_0 => DIGIT_NAMES[(id - usage::DIGIT_1) as usize],
        usage::ENTER => "Enter",
        usage::ESCAPE => "Escape",
        usage::BACKSPACE => "Backspace",
        usage::TAB => "Tab",
        usage::SPACE => "Space",
        usage::MINUS => "- _",
        usage::EQUAL => "= +",
        usage::LEFT_BRACKET => "[ {",
        usage::RIGHT_BRACKET => "] }",
        usage::BACKSLASH => "\\ |",
        usage::SEMICOLON => "; :",
        usage::QUOTE => "' \"",
        usage::GRAVE => "` ~",
        usage::COMMA => ", <",
        usage::PERIOD => ". >",
        usage::SLASH => "/ ?",
        usage::CAPS_LOCK => "Caps Lock",
        usage::F1 => "F1",
        usage::F2 => "F2",
        usage::F3 => "F3",
        usage::F4 => "F4",
        usage::F5 => "F5",
        usage::F6 => "F6",
        usage::F7 => "F7",
        usage::F8 => "F8",
        usage::F9 => "F9",
        usage::F10 => "F10",
        usage::F11 => "F11",
        usage::F12 => "F12",
        usage::INSERT => "Insert",
        usage::HOME => "Home",
        usage::PAGE_UP => "Page Up",
        usage::DELETE => "Delete",
        usage::END => "End",
        usage::PAGE_DOWN => "Page Down",
        usage::RIGHT => "Right",
        usage::LEFT => "Left",
        usage::DOWN => "Down",
        usage::UP => "Up",
        _ => return None,
    };
    Some(name)
}
