//! The JSON writer (`spec.md` C3).
//!
//! New relative to the teacher, which is parse-only. The token-emission
//! shape (a container stack plus a "need separator" flag checked before
//! every value) is grounded on `other_examples`' `facet-rs-facet`
//! `JsonSerializer` (`Ctx::{Struct,Seq}` + `before_value`/`write_indent`),
//! and the escaping on [`crate::scanner::escape_into`] (itself generalized
//! from the teacher's `value.rs` `write_escaped_string`, which worked over
//! `core::fmt::Write` and `char`s rather than a byte sink).
use alloc::vec::Vec;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::WriterError;
use crate::scanner::escape_into;

pub use crate::scanner::EscapePolicy as EscapeMode;

/// A growable byte sink the writer appends to. Grounded on `spec.md`
/// §4.3's "growable byte buffer owned by the caller-provided sink; the
/// writer requests growth by a requested maximum and is free to
/// over-allocate" — `reserve` is the growth request, which a
/// fixed-capacity sink may refuse by returning [`WriterError::BufferOverflow`].
pub trait Sink {
    /// Requests room for at least `additional` more bytes. Implementations
    /// backed by an unbounded allocator (e.g. `Vec<u8>`) never fail.
    fn reserve(&mut self, additional: usize) -> Result<(), WriterError>;
    fn extend_from_slice(&mut self, bytes: &[u8]);
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Sink for Vec<u8> {
    fn reserve(&mut self, additional: usize) -> Result<(), WriterError> {
        Vec::reserve(self, additional);
        Ok(())
    }

    fn extend_from_slice(&mut self, bytes: &[u8]) {
        Vec::extend_from_slice(self, bytes);
    }

    fn len(&self) -> usize {
        Vec::len(self)
    }
}

/// A [`Sink`] over a caller-owned, fixed-size buffer that refuses to grow
/// past its capacity instead of allocating (`spec.md` §7's "buffer too
/// small when growth refused"). Useful when the output must land in
/// pre-allocated memory (e.g. a stack buffer or a pooled arena).
pub struct FixedCapacitySink<'a> {
    buf: &'a mut [u8],
    len: usize,
}

impl<'a> FixedCapacitySink<'a> {
    #[must_use]
    pub fn new(buf: &'a mut [u8]) -> Self {
        Self { buf, len: 0 }
    }

    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }
}

impl Sink for FixedCapacitySink<'_> {
    fn reserve(&mut self, additional: usize) -> Result<(), WriterError> {
        let capacity = self.buf.len();
        if self.len + additional > capacity {
            return Err(WriterError::BufferOverflow {
                attempted: self.len + additional,
                capacity,
            });
        }
        Ok(())
    }

    fn extend_from_slice(&mut self, bytes: &[u8]) {
        // Callers are expected to have checked `reserve` first; clamp rather
        // than panic if they didn't, since this trait method can't report
        // failure on its own.
        let room = self.buf.len() - self.len;
        let n = bytes.len().min(room);
        let end = self.len + n;
        self.buf[self.len..end].copy_from_slice(&bytes[..n]);
        self.len = end;
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// The hard ceiling on nesting depth, matching the reader's bitmap width
/// (`spec.md` requires writer and reader to share one `MaxDepth`).
pub const MAX_DEPTH_CEILING: usize = crate::reader::MAX_DEPTH_CEILING;

/// Configuration for a [`Writer`]. Cheap to copy, matching the teacher's
/// `ParserOptions: Clone + Copy`.
#[derive(Debug, Clone, Copy)]
pub struct WriterOptions {
    pub indented: bool,
    pub indent: &'static str,
    pub skip_validation: bool,
    pub escape_mode: EscapeMode,
    pub max_depth: usize,
}

impl Default for WriterOptions {
    fn default() -> Self {
        Self {
            indented: false,
            indent: "  ",
            skip_validation: false,
            escape_mode: EscapeMode::AsciiSafe,
            max_depth: MAX_DEPTH_CEILING,
        }
    }
}

impl WriterOptions {
    #[must_use]
    pub fn with_indented(mut self, indented: bool) -> Self {
        self.indented = indented;
        self
    }

    #[must_use]
    pub fn with_indent(mut self, indent: &'static str) -> Self {
        self.indent = indent;
        self.indented = true;
        self
    }

    #[must_use]
    pub fn with_skip_validation(mut self, skip: bool) -> Self {
        self.skip_validation = skip;
        self
    }

    #[must_use]
    pub fn with_escape_mode(mut self, mode: EscapeMode) -> Self {
        self.escape_mode = mode;
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// One level of writer nesting: which kind of container it is, whether it
/// has written anything yet (controls comma emission), and — for objects —
/// whether a property name has been written and a value is now expected.
/// Mirrors the reader's `ContainerFrame` shape per `spec.md` §4.2/§4.3 so a
/// future resumable stack (C6) can drive both with matching code.
#[derive(Debug, Clone, Copy)]
struct Frame {
    container: Container,
    first: bool,
    awaiting_value: bool,
}

/// Emits syntactically valid JSON into a [`Sink`], validating token order
/// against the previous token and the current container kind unless
/// `skip_validation` is set.
pub struct Writer<'a, S: Sink> {
    sink: &'a mut S,
    options: WriterOptions,
    stack: Vec<Frame>,
    root_written: bool,
    bytes_committed: usize,
    /// Set once any write fails. A partially written container or value may
    /// have already reached the sink, so further writes are refused rather
    /// than risking malformed output (`spec.md` §7, mirroring the reader's
    /// own poisoning).
    poisoned: bool,
}

impl<'a, S: Sink> Writer<'a, S> {
    pub fn new(sink: &'a mut S) -> Self {
        Self::with_options(sink, WriterOptions::default())
    }

    pub fn with_options(sink: &'a mut S, options: WriterOptions) -> Self {
        Self {
            sink,
            options,
            stack: Vec::new(),
            root_written: false,
            bytes_committed: 0,
            poisoned: false,
        }
    }

    fn check_poisoned(&self) -> Result<(), WriterError> {
        if self.poisoned {
            return Err(WriterError::Poisoned);
        }
        Ok(())
    }

    #[must_use]
    pub fn current_depth(&self) -> usize {
        self.stack.len()
    }

    /// Bytes already appended to the sink. There is no internal staging
    /// buffer, so this always equals [`Self::bytes_pending`]; both are
    /// exposed for parity with `spec.md`'s `BytesCommitted`/`BytesPending`.
    #[must_use]
    pub fn bytes_committed(&self) -> usize {
        self.bytes_committed
    }

    #[must_use]
    pub fn bytes_pending(&self) -> usize {
        self.sink.len() - self.bytes_committed
    }

    /// No-op: every write already lands in the sink. Present for API parity
    /// with `spec.md`'s `Flush`, since a future sink implementation might
    /// buffer internally.
    pub fn flush(&mut self) -> Result<(), WriterError> {
        self.bytes_committed = self.sink.len();
        Ok(())
    }

    /// Resets writer state (not the sink's contents) so the same `Writer`
    /// can emit another top-level value, matching `spec.md`'s `Reset`.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.root_written = false;
        self.bytes_committed = self.sink.len();
    }

    fn validate_value_position(&self) -> Result<(), WriterError> {
        if self.options.skip_validation {
            return Ok(());
        }
        match self.stack.last() {
            None => {
                if self.root_written {
                    return Err(WriterError::InvalidState {
                        message: "a root value has already been written".into(),
                    });
                }
            }
            Some(Frame {
                container: Container::Object,
                awaiting_value,
                ..
            }) => {
                if !awaiting_value {
                    return Err(WriterError::InvalidState {
                        message: "expected a property name, not a value".into(),
                    });
                }
            }
            Some(Frame {
                container: Container::Array,
                ..
            }) => {}
        }
        Ok(())
    }

    /// Called before writing a scalar/container value. Array entries are
    /// comma-separated here; object entries were already comma-separated
    /// and indented by [`Self::write_property_name`], so this only clears
    /// `awaiting_value` for them (matching `facet-rs-facet`'s
    /// `before_value`, where struct fields are separated by `field_key`
    /// rather than by the value write itself).
    fn before_value(&mut self) -> Result<(), WriterError> {
        self.check_poisoned()?;
        if let Err(e) = self.validate_value_position() {
            self.poisoned = true;
            return Err(e);
        }
        match self.stack.last_mut() {
            Some(frame @ Frame {
                container: Container::Array,
                ..
            }) => {
                if !frame.first {
                    self.sink.extend_from_slice(b",");
                }
                frame.first = false;
                self.write_indent();
            }
            Some(frame @ Frame {
                container: Container::Object,
                ..
            }) => {
                frame.awaiting_value = false;
            }
            None => {
                self.root_written = true;
            }
        }
        Ok(())
    }

    fn write_indent(&mut self) {
        if !self.options.indented {
            return;
        }
        if self.stack.is_empty() && !self.root_written {
            return;
        }
        self.sink.extend_from_slice(b"\n");
        for _ in 0..self.stack.len() {
            self.sink.extend_from_slice(self.options.indent.as_bytes());
        }
    }

    fn push_container(&mut self, container: Container, open: u8) -> Result<(), WriterError> {
        self.check_poisoned()?;
        if self.stack.len() >= self.options.max_depth {
            self.poisoned = true;
            return Err(WriterError::InvalidState {
                message: alloc::format!("maximum depth {} exceeded", self.options.max_depth),
            });
        }
        self.before_value()?;
        if let Err(e) = self.sink.reserve(1) {
            self.poisoned = true;
            return Err(e);
        }
        self.sink.extend_from_slice(&[open]);
        self.stack.push(Frame {
            container,
            first: true,
            awaiting_value: false,
        });
        Ok(())
    }

    fn pop_container(&mut self, container: Container, close: u8) -> Result<(), WriterError> {
        self.check_poisoned()?;
        let Some(frame) = self.stack.last().copied() else {
            if self.options.skip_validation {
                self.sink.extend_from_slice(&[close]);
                return Ok(());
            }
            self.poisoned = true;
            return Err(WriterError::InvalidState {
                message: "no open container to close".into(),
            });
        };
        if !self.options.skip_validation {
            if frame.container != container {
                self.poisoned = true;
                return Err(WriterError::InvalidState {
                    message: "mismatched closing bracket".into(),
                });
            }
            if frame.container == Container::Object && frame.awaiting_value {
                self.poisoned = true;
                return Err(WriterError::InvalidState {
                    message: "expected a value before closing the object".into(),
                });
            }
        }
        self.stack.pop();
        if !frame.first {
            self.write_indent();
        }
        self.sink.extend_from_slice(&[close]);
        Ok(())
    }

    pub fn write_start_object(&mut self) -> Result<(), WriterError> {
        self.push_container(Container::Object, b'{')
    }

    pub fn write_end_object(&mut self) -> Result<(), WriterError> {
        self.pop_container(Container::Object, b'}')
    }

    pub fn write_start_array(&mut self) -> Result<(), WriterError> {
        self.push_container(Container::Array, b'[')
    }

    pub fn write_end_array(&mut self) -> Result<(), WriterError> {
        self.pop_container(Container::Array, b']')
    }

    pub fn write_property_name(&mut self, name: &str) -> Result<(), WriterError> {
        self.check_poisoned()?;
        match self.stack.last_mut() {
            Some(frame) if frame.container == Container::Object && !frame.awaiting_value => {
                if !frame.first {
                    self.sink.extend_from_slice(b",");
                }
                frame.first = false;
                frame.awaiting_value = true;
            }
            _ if self.options.skip_validation => {}
            _ => {
                self.poisoned = true;
                return Err(WriterError::InvalidState {
                    message: "a property name may only be written inside an object, before its value".into(),
                });
            }
        }
        self.write_indent();
        self.write_escaped_string(name);
        self.sink.extend_from_slice(b":");
        if self.options.indented {
            self.sink.extend_from_slice(b" ");
        }
        Ok(())
    }

    fn write_escaped_string(&mut self, s: &str) {
        let mut escaped = Vec::with_capacity(s.len());
        escape_into(&mut escaped, s, self.options.escape_mode);
        let _ = self.sink.reserve(escaped.len() + 2);
        self.sink.extend_from_slice(b"\"");
        self.sink.extend_from_slice(&escaped);
        self.sink.extend_from_slice(b"\"");
    }

    pub fn write_string(&mut self, value: &str) -> Result<(), WriterError> {
        self.before_value()?;
        self.write_escaped_string(value);
        Ok(())
    }

    pub fn write_bool(&mut self, value: bool) -> Result<(), WriterError> {
        self.before_value()?;
        self.sink
            .extend_from_slice(if value { b"true" } else { b"false" });
        Ok(())
    }

    pub fn write_null(&mut self) -> Result<(), WriterError> {
        self.before_value()?;
        self.sink.extend_from_slice(b"null");
        Ok(())
    }

    /// Writes a raw, already-serialized JSON fragment verbatim (no
    /// escaping, no structural validation of its contents). `spec.md`'s
    /// `WriteRawValue`.
    pub fn write_raw_value(&mut self, raw: &[u8]) -> Result<(), WriterError> {
        self.before_value()?;
        self.sink.extend_from_slice(raw);
        Ok(())
    }

    /// Base64-encodes `bytes` and writes it as a JSON string, streaming
    /// through the encoder directly into the sink (`spec.md` §4.3).
    pub fn write_base64_string(&mut self, bytes: &[u8]) -> Result<(), WriterError> {
        self.before_value()?;
        self.sink.extend_from_slice(b"\"");
        let encoded = BASE64_STANDARD.encode(bytes);
        self.sink.extend_from_slice(encoded.as_bytes());
        self.sink.extend_from_slice(b"\"");
        Ok(())
    }

    pub fn write_f64(&mut self, value: f64) -> Result<(), WriterError> {
        self.before_value()?;
        if value.is_finite() {
            self.sink
                .extend_from_slice(alloc::format!("{value}").as_bytes());
        } else {
            // NaN/Infinity have no JSON representation; `null` matches
            // serde_json's and the teacher's own documented fallback.
            self.sink.extend_from_slice(b"null");
        }
        Ok(())
    }

    pub fn write_f32(&mut self, value: f32) -> Result<(), WriterError> {
        self.write_f64(f64::from(value))
    }
}

macro_rules! impl_write_int {
    ($($name:ident: $t:ty),* $(,)?) => {
        impl<'a, S: Sink> Writer<'a, S> {
            $(
                pub fn $name(&mut self, value: $t) -> Result<(), WriterError> {
                    self.before_value()?;
                    self.sink.extend_from_slice(alloc::format!("{value}").as_bytes());
                    Ok(())
                }
            )*
        }
    };
}

impl_write_int!(
    write_i8: i8, write_i16: i16, write_i32: i32, write_i64: i64, write_i128: i128,
    write_u8: u8, write_u16: u16, write_u32: u32, write_u64: u64, write_u128: u128,
);
