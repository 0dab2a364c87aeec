#![forbid(unsafe_code)]

//! Host-agnostic VT/ANSI terminal logic engine.
//!
//! `minivt-core` is the platform-independent model at the heart of minivt.
//! It translates the byte stream read from a PTY master into an attributed
//! cell grid plus a set of dirty rows, and translates key events into the
//! byte sequences written back to the PTY master — all without any host
//! I/O dependencies.
//!
//! # Primary responsibilities
//!
//! - **Grid**: 2D cell matrix representing the visible terminal screen.
//! - **Cell**: character content + foreground/background color attribute.
//! - **Parser**: VT/ANSI state machine over the xterm subset (C0, ESC, CSI).
//! - **Utf8Decoder**: streaming UTF-8 decoder, safe across read boundaries.
//! - **Keyboard encoding**: key events to control bytes and CSI sequences.
//! - **DirtyLines**: per-row change tracking for incremental redraw.
//!
//! # Design principles
//!
//! - **No I/O**: all types are pure data + logic; the host adapter supplies
//!   bytes and writes the replies. The engine can be instantiated many
//!   times per process and in unit tests without any terminal subsystem.
//! - **Deterministic**: identical byte sequences always produce identical
//!   state.
//! - **Total input handling**: PTY output never errors; every byte is
//!   either interpreted or dropped.
//! - **`#![forbid(unsafe_code)]`**: safety enforced at compile time.

pub mod cell;
pub mod cursor;
pub mod dirty;
pub mod grid;
pub mod key;
pub mod parser;
pub mod terminal;
pub mod utf8;

pub use cell::{AnsiColor, Cell, CharAttr, RgbColor};
pub use cursor::Cursor;
pub use dirty::DirtyLines;
pub use grid::Grid;
pub use key::{KeyCode, KeyEvent, Modifiers};
pub use parser::{Action, CsiParams, Parser};
pub use terminal::Terminal;
pub use utf8::{Utf8Decoder, Utf8Event};
