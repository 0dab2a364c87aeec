//! VT/ANSI parser.
//!
//! A deterministic state machine that converts the PTY output byte stream
//! into a sequence of actions for the terminal engine. It covers:
//!
//! - printable characters (ASCII + full UTF-8) -> [`Action::Print`]
//! - C0 controls -> dedicated actions
//! - CSI sequences (cursor motion, erase, SGR)
//! - ESC-level sequences (index, reverse index, next line, full reset)
//!
//! The parser never blocks and never looks ahead: bytes may arrive one at
//! a time or in arbitrary chunks and produce identical action streams.

use smallvec::SmallVec;
use tracing::trace;

use crate::utf8::{Utf8Decoder, Utf8Event};

/// Inline capacity for CSI parameter lists.
///
/// Cursor and SGR sequences in this subset carry ≤ 4 parameters; this
/// avoids a heap allocation for the common case while remaining
/// transparent to consumers via `Deref<Target = [u16]>`.
pub type CsiParams = SmallVec<[u16; 4]>;

/// Parser output actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a single character (ASCII or multi-byte UTF-8).
    Print(char),
    /// Bell (`\x07`).
    Bell,
    /// Backspace (`\x08`).
    Backspace,
    /// Horizontal tab (`\t`).
    Tab,
    /// Line feed (`\n`).
    Newline,
    /// Carriage return (`\r`).
    CarriageReturn,
    /// CUU (`CSI Ps A`): move cursor up by count (default 1).
    CursorUp(u16),
    /// CUD (`CSI Ps B`): move cursor down by count (default 1).
    CursorDown(u16),
    /// CUF (`CSI Ps C`): move cursor right by count (default 1).
    CursorRight(u16),
    /// CUB (`CSI Ps D`): move cursor left by count (default 1).
    CursorLeft(u16),
    /// CUP/HVP (`CSI Pr ; Pc H`, `CSI Pr ; Pc f`): absolute move,
    /// already converted to 0-indexed coordinates.
    CursorPosition { row: u16, col: u16 },
    /// ED (`CSI Ps J`): erase in display, mode 0, 1, or 2.
    EraseInDisplay(u8),
    /// EL (`CSI Ps K`): erase in line, mode 0, 1, or 2.
    EraseInLine(u8),
    /// SGR (`CSI ... m`): set graphics rendition parameters.
    ///
    /// Parameters are returned as parsed numeric values; interpretation is
    /// performed by the terminal engine (they are stateful/delta-based).
    Sgr(CsiParams),
    /// IND (`ESC D`): move cursor down one line, scrolling on the last row.
    Index,
    /// RI (`ESC M`): move cursor up one line, scrolling down on row 0.
    ReverseIndex,
    /// NEL (`ESC E`): carriage return then line feed.
    NextLine,
    /// RIS (`ESC c`): full reset to initial state.
    FullReset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    CsiParam,
}

/// VT/ANSI parser state.
#[derive(Debug, Clone)]
pub struct Parser {
    state: State,
    /// Raw CSI parameter bytes (digits, `;`, and private markers).
    params: Vec<u8>,
    utf8: Utf8Decoder,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a new parser in ground state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: State::Ground,
            params: Vec::new(),
            utf8: Utf8Decoder::new(),
        }
    }

    /// Feed a chunk of bytes and return parsed actions.
    #[must_use]
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Action> {
        let mut out = Vec::new();
        self.feed_into(bytes, &mut out);
        out
    }

    /// Feed a chunk of bytes, appending parsed actions to `out`.
    ///
    /// Callers on hot paths can reuse the same output buffer across reads
    /// by clearing it before each invocation while retaining capacity.
    pub fn feed_into(&mut self, bytes: &[u8], out: &mut Vec<Action>) {
        for &b in bytes {
            if let Some(action) = self.advance(b) {
                out.push(action);
            }
        }
    }

    /// Advance the parser by one byte.
    ///
    /// Returns an action when a complete token is recognized.
    pub fn advance(&mut self, byte: u8) -> Option<Action> {
        match self.state {
            State::Ground => self.advance_ground(byte),
            State::Escape => self.advance_escape(byte),
            State::CsiParam => self.advance_csi(byte),
        }
    }

    fn advance_ground(&mut self, byte: u8) -> Option<Action> {
        // C0 controls (and DEL) bypass the UTF-8 decoder and drop any
        // partial scalar: a control in the middle of a sequence means the
        // application emitted malformed output.
        if byte < 0x20 || byte == 0x7F {
            self.utf8.reset();
            return match byte {
                0x07 => Some(Action::Bell),
                0x08 => Some(Action::Backspace),
                0x09 => Some(Action::Tab),
                0x0A => Some(Action::Newline),
                0x0D => Some(Action::CarriageReturn),
                0x1B => {
                    self.state = State::Escape;
                    self.params.clear();
                    None
                }
                // NUL, VT, FF, SO/SI and the rest are ignored.
                _ => None,
            };
        }

        match self.utf8.feed(byte) {
            Utf8Event::Scalar(ch) => Some(Action::Print(ch)),
            Utf8Event::Incomplete => None,
            Utf8Event::Invalid(b) => {
                trace!(byte = b, "dropping invalid UTF-8 byte");
                None
            }
        }
    }

    fn advance_escape(&mut self, byte: u8) -> Option<Action> {
        if byte == b'[' {
            self.state = State::CsiParam;
            return None;
        }
        self.state = State::Ground;
        match byte {
            b'c' => Some(Action::FullReset),
            b'D' => Some(Action::Index),
            b'M' => Some(Action::ReverseIndex),
            b'E' => Some(Action::NextLine),
            // Other final bytes (DECSC, charset designators, ...) are
            // consumed without effect; bytes below 0x30 abort outright.
            0x30..=0x7E => None,
            _ => None,
        }
    }

    fn advance_csi(&mut self, byte: u8) -> Option<Action> {
        match byte {
            // Parameter bytes: digits, `;`, and the private markers
            // `: < = > ?` (which poison the sequence at dispatch).
            0x30..=0x3F => {
                self.params.push(byte);
                None
            }
            // Final byte per ECMA-48.
            0x40..=0x7E => {
                self.state = State::Ground;
                self.dispatch_csi(byte)
            }
            _ => {
                trace!(byte, "aborting CSI sequence");
                self.state = State::Ground;
                None
            }
        }
    }

    fn dispatch_csi(&mut self, final_byte: u8) -> Option<Action> {
        // DEC private sequences (`CSI ? ...`) and other prefixed forms are
        // outside the supported repertoire.
        if self.params.iter().any(|b| !matches!(b, b'0'..=b'9' | b';')) {
            trace!(final_byte, "ignoring private CSI sequence");
            return None;
        }
        let params = Self::parse_params(&self.params);

        match final_byte {
            b'A' => Some(Action::CursorUp(Self::count_or_one(params.first()))),
            b'B' => Some(Action::CursorDown(Self::count_or_one(params.first()))),
            b'C' => Some(Action::CursorRight(Self::count_or_one(params.first()))),
            b'D' => Some(Action::CursorLeft(Self::count_or_one(params.first()))),
            b'H' | b'f' => {
                // CUP/HVP use 1-indexed coordinates; 0 and missing are
                // treated as 1.
                let row = Self::count_or_one(params.first()) - 1;
                let col = Self::count_or_one(params.get(1)) - 1;
                Some(Action::CursorPosition { row, col })
            }
            b'J' => {
                let mode = params.first().copied().unwrap_or(0);
                if mode <= 2 {
                    Some(Action::EraseInDisplay(mode as u8))
                } else {
                    trace!(mode, "ignoring unknown ED mode");
                    None
                }
            }
            b'K' => {
                let mode = params.first().copied().unwrap_or(0);
                if mode <= 2 {
                    Some(Action::EraseInLine(mode as u8))
                } else {
                    trace!(mode, "ignoring unknown EL mode");
                    None
                }
            }
            b'm' => Some(Action::Sgr(params)),
            _ => {
                trace!(final_byte, "ignoring unknown CSI final");
                None
            }
        }
    }

    /// Parse accumulated parameter bytes into numeric values.
    ///
    /// Empty parameters become `0` (the "default" sentinel each dispatch
    /// case resolves for itself); values saturate at `u16::MAX`.
    fn parse_params(bytes: &[u8]) -> CsiParams {
        let mut out = CsiParams::new();
        if bytes.is_empty() {
            return out;
        }
        for part in bytes.split(|&b| b == b';') {
            let mut value: u32 = 0;
            for &digit in part {
                value = value
                    .saturating_mul(10)
                    .saturating_add(u32::from(digit - b'0'));
            }
            out.push(value.min(u32::from(u16::MAX)) as u16);
        }
        out
    }

    fn count_or_one(value: Option<&u16>) -> u16 {
        value.copied().unwrap_or(1).max(1)
    }
}
