//! The frame shapes driving [`super::stack::ValueStack`] (`spec.md` §4.6).
//!
//! Mirrors the teacher's `parser.rs` `Frame`/`FrameStack`, but assembles a
//! [`Value`] tree instead of re-emitting parser events: each frame owns the
//! partially built container plus a [`Progress`] marker recording how far
//! into "read name, read colon, read value, store" the current object
//! entry has gotten. Token boundaries already coincide with scan
//! boundaries (the reader never returns a token until a whole lexeme is
//! available), so `Progress` exists to document the resumable states named
//! in `spec.md`'s object-read state machine rather than to re-validate
//! grammar the reader already enforces.
use alloc::string::String;

use crate::value::{Array, Map};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Progress {
    ProcessedStartToken,
    ProcessedReadName,
    ProcessedName,
    ProcessedReadValue,
    ProcessedValue,
}

#[derive(Debug)]
pub(super) enum Frame {
    Array {
        items: Array,
    },
    Object {
        map: Map,
        pending_key: Option<String>,
        progress: Progress,
    },
}
