//! Keyboard encoding: key events to PTY-bound byte sequences.
//!
//! The host captures physical keys however it likes (curses, crossterm,
//! a web page) and hands the engine logical [`KeyEvent`]s; the engine
//! answers with the bytes an xterm would send. Combinations with no wire
//! encoding produce an empty sequence.

use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// Shift key.
        const SHIFT = 1 << 0;
        /// Control key.
        const CTRL = 1 << 1;
    }
}

/// Logical key identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A regular character key.
    Char(char),
    /// Enter/Return key.
    Enter,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Escape key.
    Escape,
    /// Up arrow key.
    Up,
    /// Down arrow key.
    Down,
    /// Left arrow key.
    Left,
    /// Right arrow key.
    Right,
    /// Home key.
    Home,
    /// End key.
    End,
    /// Insert key.
    Insert,
    /// Delete key.
    Delete,
    /// Page Up key.
    PageUp,
    /// Page Down key.
    PageDown,
    /// Function key F1-F12.
    F(u8),
}

/// A key event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: Modifiers,
}

impl KeyEvent {
    /// Create a key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            mods: Modifiers::empty(),
        }
    }

    /// Create a key event with the given modifiers.
    #[must_use]
    pub const fn with_mods(code: KeyCode, mods: Modifiers) -> Self {
        Self { code, mods }
    }

    /// Encode this event as the byte sequence to write to the PTY master.
    ///
    /// Unknown combinations encode to an empty sequence.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        match self.code {
            KeyCode::Char(ch) => self.encode_char(ch),
            KeyCode::Enter => vec![b'\r'],
            KeyCode::Backspace => vec![0x7F],
            KeyCode::Tab => vec![b'\t'],
            KeyCode::Escape => vec![0x1B],
            KeyCode::Up => b"\x1b[A".to_vec(),
            KeyCode::Down => b"\x1b[B".to_vec(),
            KeyCode::Right => b"\x1b[C".to_vec(),
            KeyCode::Left => b"\x1b[D".to_vec(),
            KeyCode::Home => b"\x1b[H".to_vec(),
            KeyCode::End => b"\x1b[F".to_vec(),
            KeyCode::Insert => b"\x1b[2~".to_vec(),
            KeyCode::Delete => b"\x1b[3~".to_vec(),
            KeyCode::PageUp => b"\x1b[5~".to_vec(),
            KeyCode::PageDown => b"\x1b[6~".to_vec(),
            KeyCode::F(n) => encode_function_key(n),
        }
    }

    fn encode_char(&self, ch: char) -> Vec<u8> {
        if self.mods.contains(Modifiers::CTRL) {
            // Ctrl+letter folds into the 0x01..0x1A control range; other
            // Ctrl chords have no encoding in this subset.
            if ch.is_ascii_alphabetic() {
                return vec![(ch as u8) & 0x1F];
            }
            return Vec::new();
        }
        let ch = if self.mods.contains(Modifiers::SHIFT) {
            shifted(ch)
        } else {
            ch
        };
        let mut buf = [0u8; 4];
        ch.encode_utf8(&mut buf).as_bytes().to_vec()
    }
}

/// US-QWERTY shifted form of a character.
///
/// Characters with no shifted form pass through unchanged (non-ASCII input
/// arrives from the host already shifted).
fn shifted(ch: char) -> char {
    match ch {
        'a'..='z' => ch.to_ascii_uppercase(),
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        '`' => '~',
        _ => ch,
    }
}

/// F1-F4 use SS3 finals; F5-F12 use the xterm `CSI Ps ~` scheme.
fn encode_function_key(n: u8) -> Vec<u8> {
    match n {
        1 => b"\x1bOP".to_vec(),
        2 => b"\x1bOQ".to_vec(),
        3 => b"\x1bOR".to_vec(),
        4 => b"\x1bOS".to_vec(),
        5 => b"\x1b[15~".to_vec(),
        6 => b"\x1b[17~".to_vec(),
        7 => b"\x1b[18~".to_vec(),
        8 => b"\x1b[19~".to_vec(),
        9 => b"\x1b[20~".to_vec(),
        10 => b"\x1b[21~".to_vec(),
        11 => b"\x1b[23~".to_vec(),
        12 => b"\x1b[24~".to_vec(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(code: KeyCode) -> Vec<u8> {
        KeyEvent::new(code).encode()
    }

    #[test]
    fn plain_characters_encode_as_utf8() {
        assert_eq!(plain(KeyCode::Char('a')), b"a");
        assert_eq!(plain(KeyCode::Char('€')), "€".as_bytes());
    }

    #[test]
    fn ctrl_letter_masks_to_control_byte() {
        let ctrl_a = KeyEvent::with_mods(KeyCode::Char('a'), Modifiers::CTRL);
        assert_eq!(ctrl_a.encode(), vec![0x01]);
        let ctrl_z = KeyEvent::with_mods(KeyCode::Char('z'), Modifiers::CTRL);
        assert_eq!(ctrl_z.encode(), vec![0x1A]);
        // Case-insensitive: Ctrl+Shift+A still lands on 0x01.
        let ctrl_upper = KeyEvent::with_mods(KeyCode::Char('A'), Modifiers::CTRL);
        assert_eq!(ctrl_upper.encode(), vec![0x01]);
    }

    #[test]
    fn ctrl_non_letter_is_empty() {
        let ev = KeyEvent::with_mods(KeyCode::Char('1'), Modifiers::CTRL);
        assert!(ev.encode().is_empty());
    }

    #[test]
    fn shift_uppercases_letters() {
        let ev = KeyEvent::with_mods(KeyCode::Char('a'), Modifiers::SHIFT);
        assert_eq!(ev.encode(), b"A");
    }

    #[test]
    fn shift_maps_us_qwerty_punctuation() {
        let pairs = [
            ('1', "!"),
            ('2', "@"),
            ('3', "#"),
            ('4', "$"),
            ('5', "%"),
            ('6', "^"),
            ('7', "&"),
            ('8', "*"),
            ('9', "("),
            ('0', ")"),
            ('-', "_"),
            ('=', "+"),
            ('[', "{"),
            (']', "}"),
            ('\\', "|"),
            (';', ":"),
            ('\'', "\""),
            (',', "<"),
            ('.', ">"),
            ('/', "?"),
            ('`', "~"),
        ];
        for (input, expected) in pairs {
            let ev = KeyEvent::with_mods(KeyCode::Char(input), Modifiers::SHIFT);
            assert_eq!(ev.encode(), expected.as_bytes(), "Shift+{input}");
        }
    }

    #[test]
    fn editing_keys() {
        assert_eq!(plain(KeyCode::Enter), b"\r");
        assert_eq!(plain(KeyCode::Backspace), vec![0x7F]);
        assert_eq!(plain(KeyCode::Tab), b"\t");
        assert_eq!(plain(KeyCode::Escape), vec![0x1B]);
    }

    #[test]
    fn cursor_and_navigation_keys() {
        assert_eq!(plain(KeyCode::Up), b"\x1b[A");
        assert_eq!(plain(KeyCode::Down), b"\x1b[B");
        assert_eq!(plain(KeyCode::Right), b"\x1b[C");
        assert_eq!(plain(KeyCode::Left), b"\x1b[D");
        assert_eq!(plain(KeyCode::Home), b"\x1b[H");
        assert_eq!(plain(KeyCode::End), b"\x1b[F");
        assert_eq!(plain(KeyCode::Insert), b"\x1b[2~");
        assert_eq!(plain(KeyCode::Delete), b"\x1b[3~");
        assert_eq!(plain(KeyCode::PageUp), b"\x1b[5~");
        assert_eq!(plain(KeyCode::PageDown), b"\x1b[6~");
    }

    #[test]
    fn function_keys() {
        assert_eq!(plain(KeyCode::F(1)), b"\x1bOP");
        assert_eq!(plain(KeyCode::F(2)), b"\x1bOQ");
        assert_eq!(plain(KeyCode::F(3)), b"\x1bOR");
        assert_eq!(plain(KeyCode::F(4)), b"\x1bOS");
        assert_eq!(plain(KeyCode::F(5)), b"\x1b[15~");
        assert_eq!(plain(KeyCode::F(6)), b"\x1b[17~");
        assert_eq!(plain(KeyCode::F(7)), b"\x1b[18~");
        assert_eq!(plain(KeyCode::F(8)), b"\x1b[19~");
        assert_eq!(plain(KeyCode::F(9)), b"\x1b[20~");
        assert_eq!(plain(KeyCode::F(10)), b"\x1b[21~");
        assert_eq!(plain(KeyCode::F(11)), b"\x1b[23~");
        assert_eq!(plain(KeyCode::F(12)), b"\x1b[24~");
    }

    #[test]
    fn unknown_function_keys_are_empty() {
        assert!(plain(KeyCode::F(0)).is_empty());
        assert!(plain(KeyCode::F(13)).is_empty());
    }
}
