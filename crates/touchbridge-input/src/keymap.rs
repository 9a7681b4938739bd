//! ASCII to evdev key mapping for text entry on a US layout.

use evdev::KeyCode as EvdevKey;

/// Key and shift state needed to type one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub key: EvdevKey,
    pub shift: bool,
}

impl KeyStroke {
    const fn plain(key: EvdevKey) -> Self {
        Self { key, shift: false }
    }

    const fn shifted(key: EvdevKey) -> Self {
        Self { key, shift: true }
    }
}

/// Map a character to the keystroke that produces it, if any.
#[allow(clippy::too_many_lines)]
pub fn ascii_to_keystroke(c: char) -> Option<KeyStroke> {
    if c.is_ascii_uppercase() {
        return letter(c.to_ascii_lowercase()).map(|s| KeyStroke::shifted(s.key));
    }
    if c.is_ascii_lowercase() {
        return letter(c);
    }

    let stroke = match c {
        '1' => KeyStroke::plain(EvdevKey::KEY_1),
        '2' => KeyStroke::plain(EvdevKey::KEY_2),
        '3' => KeyStroke::plain(EvdevKey::KEY_3),
        '4' => KeyStroke::plain(EvdevKey::KEY_4),
        '5' => KeyStroke::plain(EvdevKey::KEY_5),
        '6' => KeyStroke::plain(EvdevKey::KEY_6),
        '7' => KeyStroke::plain(EvdevKey::KEY_7),
        '8' => KeyStroke::plain(EvdevKey::KEY_8),
        '9' => KeyStroke::plain(EvdevKey::KEY_9),
        '0' => KeyStroke::plain(EvdevKey::KEY_0),

        '!' => KeyStroke::shifted(EvdevKey::KEY_1),
        '@' => KeyStroke::shifted(EvdevKey::KEY_2),
        '#' => KeyStroke::shifted(EvdevKey::KEY_3),
        '$' => KeyStroke::shifted(EvdevKey::KEY_4),
        '%' => KeyStroke::shifted(EvdevKey::KEY_5),
        '^' => KeyStroke::shifted(EvdevKey::KEY_6),
        '&' => KeyStroke::shifted(EvdevKey::KEY_7),
        '*' => KeyStroke::shifted(EvdevKey::KEY_8),
        '(' => KeyStroke::shifted(EvdevKey::KEY_9),
        ')' => KeyStroke::shifted(EvdevKey::KEY_0),

        ' ' => KeyStroke::plain(EvdevKey::KEY_SPACE),
        '\t' => KeyStroke::plain(EvdevKey::KEY_TAB),
        '\r' => KeyStroke::plain(EvdevKey::KEY_ENTER),
        '\u{8}' => KeyStroke::plain(EvdevKey::KEY_BACKSPACE),

        '-' => KeyStroke::plain(EvdevKey::KEY_MINUS),
        '_' => KeyStroke::shifted(EvdevKey::KEY_MINUS),
        '=' => KeyStroke::plain(EvdevKey::KEY_EQUAL),
        '+' => KeyStroke::shifted(EvdevKey::KEY_EQUAL),
        '[' => KeyStroke::plain(EvdevKey::KEY_LEFTBRACE),
        '{' => KeyStroke::shifted(EvdevKey::KEY_LEFTBRACE),
        ']' => KeyStroke::plain(EvdevKey::KEY_RIGHTBRACE),
        '}' => KeyStroke::shifted(EvdevKey::KEY_RIGHTBRACE),
        ';' => KeyStroke::plain(EvdevKey::KEY_SEMICOLON),
        ':' => KeyStroke::shifted(EvdevKey::KEY_SEMICOLON),
        '\'' => KeyStroke::plain(EvdevKey::KEY_APOSTROPHE),
        '"' => KeyStroke::shifted(EvdevKey::KEY_APOSTROPHE),
        '`' => KeyStroke::plain(EvdevKey::KEY_GRAVE),
        '~' => KeyStroke::shifted(EvdevKey::KEY_GRAVE),
        '\\' => KeyStroke::plain(EvdevKey::KEY_BACKSLASH),
        '|' => KeyStroke::shifted(EvdevKey::KEY_BACKSLASH),
        ',' => KeyStroke::plain(EvdevKey::KEY_COMMA),
        '<' => KeyStroke::shifted(EvdevKey::KEY_COMMA),
        '.' => KeyStroke::plain(EvdevKey::KEY_DOT),
        '>' => KeyStroke::shifted(EvdevKey::KEY_DOT),
        '/' => KeyStroke::plain(EvdevKey::KEY_SLASH),
        '?' => KeyStroke::shifted(EvdevKey::KEY_SLASH),

        _ => return None,
    };
    Some(stroke)
}

fn letter(c: char) -> Option<KeyStroke> {
    let key = match c {
        'a' => EvdevKey::KEY_A,
        'b' => EvdevKey::KEY_B,
        'c' => EvdevKey::KEY_C,
        'd' => EvdevKey::KEY_D,
        'e' => EvdevKey::KEY_E,
        'f' => EvdevKey::KEY_F,
        'g' => EvdevKey::KEY_G,
        'h' => EvdevKey::KEY_H,
        'i' => EvdevKey::KEY_I,
        'j' => EvdevKey::KEY_J,
        'k' => EvdevKey::KEY_K,
        'l' => EvdevKey::KEY_L,
        'm' => EvdevKey::KEY_M,
        'n' => EvdevKey::KEY_N,
        'o' => EvdevKey::KEY_O,
        'p' => EvdevKey::KEY_P,
        'q' => EvdevKey::KEY_Q,
        'r' => EvdevKey::KEY_R,
        's' => EvdevKey::KEY_S,
        't' => EvdevKey::KEY_T,
        'u' => EvdevKey::KEY_U,
        'v' => EvdevKey::KEY_V,
        'w' => EvdevKey::KEY_W,
        'x' => EvdevKey::KEY_X,
        'y' => EvdevKey::KEY_Y,
        'z' => EvdevKey::KEY_Z,
        _ => return None,
    };
    Some(KeyStroke::plain(key))
}
