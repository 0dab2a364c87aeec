//! Streaming UTF-8 decoder.
//!
//! PTY reads can split a multi-byte character anywhere, so the decoder is a
//! small value that accumulates one scalar at a time and survives across
//! input batches. One byte in, one event out.

/// Result of feeding a single byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Utf8Event {
    /// A complete Unicode scalar value.
    Scalar(char),
    /// More continuation bytes are needed.
    Incomplete,
    /// The byte cannot start or continue a scalar; it has been dropped.
    Invalid(u8),
}

/// Accumulator state for one in-progress scalar.
///
/// The payload bits are collected directly, without overlong-form checks:
/// the terminal drops whatever cannot become a `char` and keeps going, it
/// never gets to reject a whole read.
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Decoder {
    acc: u32,
    pending: u8,
}

impl Utf8Decoder {
    /// Create a decoder with no partial scalar buffered.
    #[must_use]
    pub const fn new() -> Self {
        Self { acc: 0, pending: 0 }
    }

    /// Whether a partial scalar is buffered.
    #[must_use]
    pub const fn in_progress(&self) -> bool {
        self.pending > 0
    }

    /// Drop any partial scalar and return to the initial state.
    pub fn reset(&mut self) {
        self.acc = 0;
        self.pending = 0;
    }

    /// Feed one byte.
    ///
    /// A non-continuation byte arriving while continuations are expected
    /// discards the partial scalar and is classified as the start of a new
    /// one, so decoding resynchronizes on the offending byte itself.
    pub fn feed(&mut self, byte: u8) -> Utf8Event {
        if self.pending > 0 {
            if (0x80..=0xBF).contains(&byte) {
                self.acc = (self.acc << 6) | u32::from(byte & 0x3F);
                self.pending -= 1;
                if self.pending > 0 {
                    return Utf8Event::Incomplete;
                }
                return match char::from_u32(self.acc) {
                    Some(ch) => Utf8Event::Scalar(ch),
                    // Surrogates and values past U+10FFFF are not scalars.
                    None => Utf8Event::Invalid(byte),
                };
            }
            self.pending = 0;
        }
        self.start(byte)
    }

    /// Classify a byte as a lead byte (or a lone ASCII scalar).
    fn start(&mut self, byte: u8) -> Utf8Event {
        match byte {
            0x00..=0x7F => Utf8Event::Scalar(byte as char),
            0xC0..=0xDF => {
                self.acc = u32::from(byte & 0x1F);
                self.pending = 1;
                Utf8Event::Incomplete
            }
            0xE0..=0xEF => {
                self.acc = u32::from(byte & 0x0F);
                self.pending = 2;
                Utf8Event::Incomplete
            }
            0xF0..=0xF7 => {
                self.acc = u32::from(byte & 0x07);
                self.pending = 3;
                Utf8Event::Incomplete
            }
            // Stray continuation bytes and 0xF8..=0xFF cannot lead.
            _ => Utf8Event::Invalid(byte),
        }
    }
}
