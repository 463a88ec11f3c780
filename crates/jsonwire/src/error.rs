//! Error taxonomy shared by the reader, writer and converter engine
//! (`spec.md` §7).
//!
//! The teacher's own `ParserError` is a single flat struct; our surface is
//! wider (reader, writer, and a converter layer that didn't exist in the
//! teacher), so the taxonomy is split into one enum per producer instead of
//! one shared struct. All three carry an optional [`JsonPath`] so a caller
//! can report `$.foo.bar[3]` style locations without re-walking the
//! document.
use alloc::string::String;

use thiserror::Error;

use crate::path::JsonPath;

/// Errors raised while tokenizing input (reader C2) or scanning a lexeme
/// out of it (scanner C1).
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("{path}: unexpected token at line {line}, byte {byte_in_line}: {message}")]
    UnexpectedToken {
        message: String,
        path: JsonPath,
        line: u64,
        byte_in_line: u64,
    },

    #[error("{path}: mismatched closing bracket at line {line}, byte {byte_in_line}")]
    MismatchedBracket {
        path: JsonPath,
        line: u64,
        byte_in_line: u64,
    },

    #[error("{path}: maximum depth {max_depth} exceeded")]
    DepthExceeded { max_depth: usize, path: JsonPath },

    #[error("{path}: invalid escape sequence: {message}")]
    InvalidEscape { message: String, path: JsonPath },

    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { offset: u64 },

    #[error("{path}: invalid number literal: {message}")]
    InvalidNumber { message: String, path: JsonPath },

    /// The reader has been used past a prior error. Recovery mid-document
    /// is not supported (`spec.md` §7).
    #[error("reader is poisoned by a previous error")]
    Poisoned,
}

/// Errors raised while emitting tokens (writer C3).
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("invalid writer state: {message}")]
    InvalidState { message: String },

    #[error("output buffer overflow: wrote {attempted} bytes into a {capacity}-byte sink that refused to grow")]
    BufferOverflow { attempted: usize, capacity: usize },

    #[error("writer is poisoned by a previous error")]
    Poisoned,
}

/// Errors raised by the converter/serializer engine (C4-C6).
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error(transparent)]
    Reader(#[from] ReaderError),

    #[error(transparent)]
    Writer(#[from] WriterError),

    #[error("{path}: value cannot be represented as the target type: {message}")]
    Conversion { message: String, path: JsonPath },

    #[error("invalid options: {message}")]
    Configuration { message: String },

    #[error("no converter is registered for this type and no built-in converter applies")]
    NoConverter,

    #[error("invalid API usage: {message}")]
    ProgrammerError { message: String },
}
