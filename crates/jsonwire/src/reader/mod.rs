//! The pull-based UTF-8 JSON reader (`spec.md` C2).
//!
//! Grounded on the teacher's `StreamingParser`/`ParseState`/`FrameStack`
//! trio (`parser.rs`), generalized from char-at-a-time lexing over an
//! owned `String` to byte-span tokens borrowed from the reader's own
//! internal buffer. Because [`crate::scanner`] scans a whole lexeme in one
//! pass rather than a char at a time, we don't need the teacher's separate
//! `LexState` machine: a [`ParseState`] alone tracks the structural
//! grammar, and an incomplete scan simply asks the caller to feed more
//! bytes and re-enters the same scan from the remembered start position.
use alloc::{string::String, vec::Vec};

use crate::error::ReaderError;
use crate::path::{JsonPath, PathComponent};
use crate::scanner::{self, ScanOutcome};

const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// The hard ceiling on nesting depth: the reader tracks "object or array"
/// per level in a `u64` bitmap, so depth cannot exceed the bitmap width.
/// [`ReaderOptions::max_depth`] is clamped to this ceiling.
pub const MAX_DEPTH_CEILING: usize = 64;

/// How the reader treats `//` and `/* */` comments, which are not part of
/// strict JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommentHandling {
    #[default]
    Disallow,
    Skip,
    Allow,
}

/// Configuration for a [`Reader`]. Cheap to copy, matching the teacher's
/// `ParserOptions: Clone + Copy`.
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    pub max_depth: usize,
    pub allow_trailing_commas: bool,
    pub comment_handling: CommentHandling,
    /// When set, the reader resets to `Start` after a complete top-level
    /// value instead of entering `End`, accepting a JSON-lines style
    /// sequence of values. Grounded on the teacher's
    /// `ParserOptions::multiple_values` field.
    pub allow_multiple_json_values: bool,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH_CEILING,
            allow_trailing_commas: false,
            comment_handling: CommentHandling::Disallow,
            allow_multiple_json_values: false,
        }
    }
}

impl ReaderOptions {
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.min(MAX_DEPTH_CEILING);
        self
    }

    #[must_use]
    pub fn with_allow_trailing_commas(mut self, allow: bool) -> Self {
        self.allow_trailing_commas = allow;
        self
    }

    #[must_use]
    pub fn with_comment_handling(mut self, handling: CommentHandling) -> Self {
        self.comment_handling = handling;
        self
    }

    #[must_use]
    pub fn with_allow_multiple_json_values(mut self, allow: bool) -> Self {
        self.allow_multiple_json_values = allow;
        self
    }
}

/// The kind of lexeme a [`Token`] carries. `None` is only ever the
/// "previous token" sentinel before the first real token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenType {
    None,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    PropertyName,
    String,
    Number,
    True,
    False,
    Null,
    Comment,
}

/// One lexeme produced by [`Reader::next_token`]. Never owns its bytes:
/// `bytes` borrows from the reader's internal buffer and is only valid
/// until the next call to a `&mut self` method on the reader.
#[derive(Debug, Clone, Copy)]
pub struct Token<'a> {
    pub token_type: TokenType,
    bytes: &'a [u8],
    /// Set for `String`/`PropertyName` tokens whose raw bytes still
    /// contain `\`-escapes that a caller wanting the decoded value must
    /// run through [`crate::scanner::unescape`].
    pub escaped: bool,
}

impl<'a> Token<'a> {
    /// The raw (still possibly escaped) UTF-8 bytes of a `String`,
    /// `PropertyName`, `Number`, or `Comment` token. Empty for structural
    /// tokens.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// The raw token text. Panics if the bytes are not valid UTF-8, which
    /// cannot happen for tokens produced by this reader (string bodies are
    /// validated as UTF-8 when scanned).
    #[must_use]
    pub fn as_str(&self) -> &'a str {
        core::str::from_utf8(self.bytes).expect("reader only emits valid UTF-8 token bytes")
    }

    /// The decoded value of a `String`/`PropertyName` token, running it
    /// through [`scanner::unescape`] when it still carries `\`-escapes.
    ///
    /// # Errors
    /// Propagates [`ReaderError`] from a malformed escape sequence.
    pub fn get_string(&self) -> Result<String, ReaderError> {
        if self.escaped {
            let mut decoded = String::new();
            scanner::unescape(self.bytes, &mut decoded, JsonPath::root)?;
            Ok(decoded)
        } else {
            Ok(self.as_str().into())
        }
    }

    /// Parses a `Number` token as an `i32`, `None` on overflow or a
    /// fractional literal.
    #[must_use]
    pub fn try_get_i32(&self) -> Option<i32> {
        self.as_str().parse().ok()
    }

    /// Parses a `Number` token as an `i64`, `None` on overflow or a
    /// fractional literal.
    #[must_use]
    pub fn try_get_i64(&self) -> Option<i64> {
        self.as_str().parse().ok()
    }

    /// Parses a `Number` token as an `f64`.
    #[must_use]
    pub fn try_get_f64(&self) -> Option<f64> {
        self.as_str().parse().ok()
    }

    /// Parses a `Number` token as an exact decimal, avoiding the rounding
    /// an `f64` round-trip would introduce.
    #[must_use]
    pub fn try_get_decimal(&self) -> Option<rust_decimal::Decimal> {
        core::str::FromStr::from_str(self.as_str()).ok()
    }

    /// Parses a `String` token as a hyphenated GUID.
    #[must_use]
    pub fn try_get_guid(&self) -> Option<uuid::Uuid> {
        uuid::Uuid::parse_str(self.as_str()).ok()
    }

    /// Parses a `String` token as an RFC 3339 timestamp.
    #[must_use]
    pub fn try_get_date_time(&self) -> Option<time::OffsetDateTime> {
        time::OffsetDateTime::parse(self.as_str(), &time::format_description::well_known::Rfc3339).ok()
    }

    /// Always `false`: a token's bytes are always a contiguous slice of the
    /// reader's own buffer, never split across non-contiguous segments.
    #[must_use]
    pub fn has_value_sequence(&self) -> bool {
        false
    }
}

enum TriviaOutcome {
    Done,
    NeedMoreData,
    Comment { start: usize, end: usize },
}

/// Runs [`Reader::skip_trivia`]; on `Comment`/`NeedMoreData` returns early
/// from the enclosing function with the appropriate `Ok(..)`, otherwise
/// falls through to the rest of the caller's body.
macro_rules! skip_trivia_or_return {
    ($self:expr) => {
        match $self.skip_trivia()? {
            TriviaOutcome::Comment { start, end } => {
                return Ok(Some(Token {
                    token_type: TokenType::Comment,
                    bytes: &$self.buf[start..end],
                    escaped: false,
                }));
            }
            TriviaOutcome::NeedMoreData => return Ok(None),
            TriviaOutcome::Done => {}
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Start,
    BeforePropertyName,
    AfterPropertyName,
    BeforePropertyValue,
    BeforeArrayValue,
    AfterPropertyValue,
    AfterArrayValue,
    End,
    Poisoned,
}

#[derive(Debug, Clone)]
enum ContainerFrame {
    Array { index: usize },
    Object { pending_key: Option<String> },
}

impl ContainerFrame {
    fn to_path_component(&self) -> PathComponent {
        match self {
            Self::Array { index } => PathComponent::Index(*index),
            Self::Object { pending_key } => {
                PathComponent::Key(pending_key.clone().unwrap_or_default())
            }
        }
    }
}

/// A pull-based reader over a UTF-8 byte stream that may arrive in
/// arbitrarily small chunks. Call [`Reader::feed`] to append bytes,
/// [`Reader::next_token`] to pull the next lexeme, and [`Reader::finish`]
/// once no further input is coming (so a truncated document is correctly
/// reported as an error instead of `NeedMoreData` forever).
#[derive(Debug)]
pub struct Reader {
    options: ReaderOptions,
    buf: Vec<u8>,
    pos: usize,
    end_of_input: bool,
    bom_checked: bool,
    parse_state: ParseState,
    /// Bit per nesting level: 1 = object, 0 = array. Width-limited by
    /// [`MAX_DEPTH_CEILING`].
    nesting: u64,
    depth: usize,
    frames: Vec<ContainerFrame>,
    line: u64,
    /// Absolute (never reset by buffer compaction) byte offset where the
    /// current line began.
    line_start_abs: u64,
    /// Absolute byte offset corresponding to `buf[0]`. Advances whenever
    /// [`Self::feed`] compacts fully-consumed bytes out of `buf`, so
    /// diagnostics stay accurate across chunk boundaries.
    absolute_base: u64,
    /// Reader depth at which an in-progress [`Self::try_skip`] started,
    /// persisted across `NeedMoreData` resumptions of the skip itself.
    skip_anchor: Option<usize>,
}

impl Reader {
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self {
            options,
            buf: Vec::new(),
            pos: 0,
            end_of_input: false,
            bom_checked: false,
            parse_state: ParseState::Start,
            nesting: 0,
            depth: 0,
            frames: Vec::new(),
            line: 0,
            line_start_abs: 0,
            absolute_base: 0,
            skip_anchor: None,
        }
    }

    /// Appends more input. May be called repeatedly as chunks arrive.
    pub fn feed(&mut self, bytes: &[u8]) {
        if self.pos == self.buf.len() {
            self.buf.clear();
            #[allow(clippy::cast_possible_truncation)]
            {
                self.absolute_base += self.pos as u64;
            }
            self.pos = 0;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Signals that no further input is coming. After this, a token that
    /// would otherwise return `NeedMoreData` is reported as a structural
    /// error (truncated document).
    pub fn finish(&mut self) {
        self.end_of_input = true;
    }

    #[must_use]
    pub fn current_path(&self) -> JsonPath {
        JsonPath(self.frames.iter().map(ContainerFrame::to_path_component).collect())
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    fn poison(&mut self) {
        self.parse_state = ParseState::Poisoned;
    }

    fn line_col(&self, byte_pos: usize) -> (u64, u64) {
        #[allow(clippy::cast_possible_truncation)]
        let abs_pos = self.absolute_base + byte_pos as u64;
        let col = abs_pos.saturating_sub(self.line_start_abs);
        (self.line, col)
    }

    fn skip_bom_once(&mut self) {
        if !self.bom_checked {
            self.bom_checked = true;
            if self.buf.len() >= 3 && self.buf[..3] == BOM {
                self.pos = 3;
            }
        }
    }

    /// Advances `pos` over whitespace and (depending on
    /// [`CommentHandling`]) comments, tracking line/column.
    fn skip_trivia(&mut self) -> Result<TriviaOutcome, ReaderError> {
        loop {
            let before = self.pos;
            self.pos = scanner::skip_whitespace(&self.buf, self.pos);
            for (i, &b) in self.buf[before..self.pos].iter().enumerate() {
                if b == b'\n' {
                    self.line += 1;
                    #[allow(clippy::cast_possible_truncation)]
                    {
                        self.line_start_abs = self.absolute_base + (before + i + 1) as u64;
                    }
                }
            }
            if self.buf.get(self.pos) != Some(&b'/') {
                // Either no byte at all (end of buffer) or something other
                // than the start of a comment: either way there is no more
                // trivia to consume here, and the caller decides whether
                // "no byte" means `NeedMoreData` or end-of-document.
                return Ok(TriviaOutcome::Done);
            }
            if self.pos + 1 >= self.buf.len() && !self.end_of_input {
                // A lone `/` at the end of the buffer so far: need one
                // more byte to disambiguate `//`/`/*` from a bare `/`.
                return Ok(TriviaOutcome::NeedMoreData);
            }
            if self.options.comment_handling == CommentHandling::Disallow {
                let (line, byte_in_line) = self.line_col(self.pos);
                return Err(ReaderError::UnexpectedToken {
                    message: "comments are not allowed".into(),
                    path: self.current_path(),
                    line,
                    byte_in_line,
                });
            }
            let start = self.pos;
            let end = match self.buf.get(self.pos + 1) {
                Some(b'/') => {
                    let mut i = self.pos + 2;
                    while matches!(self.buf.get(i), Some(b) if *b != b'\n') {
                        i += 1;
                    }
                    if i == self.buf.len() && !self.end_of_input {
                        return Ok(TriviaOutcome::NeedMoreData);
                    }
                    i
                }
                Some(b'*') => {
                    let mut i = self.pos + 2;
                    loop {
                        match (self.buf.get(i), self.buf.get(i + 1)) {
                            (Some(b'*'), Some(b'/')) => break i + 2,
                            (Some(_), _) => i += 1,
                            (None, _) => {
                                if self.end_of_input {
                                    let (line, byte_in_line) = self.line_col(start);
                                    return Err(ReaderError::UnexpectedToken {
                                        message: "unterminated block comment".into(),
                                        path: self.current_path(),
                                        line,
                                        byte_in_line,
                                    });
                                }
                                return Ok(TriviaOutcome::NeedMoreData);
                            }
                        }
                    }
                }
                _ => {
                    let (line, byte_in_line) = self.line_col(self.pos);
                    return Err(ReaderError::UnexpectedToken {
                        message: "stray `/`".into(),
                        path: self.current_path(),
                        line,
                        byte_in_line,
                    });
                }
            };
            let comment_start = self.pos;
            self.pos = end;
            if self.options.comment_handling == CommentHandling::Allow {
                return Ok(TriviaOutcome::Comment {
                    start: comment_start,
                    end,
                });
            }
            // Skip: loop again to consume any further trivia.
        }
    }

    fn push_frame(&mut self, is_object: bool) -> Result<(), ReaderError> {
        if self.depth >= self.options.max_depth {
            return Err(ReaderError::DepthExceeded {
                max_depth: self.options.max_depth,
                path: self.current_path(),
            });
        }
        if is_object {
            self.nesting |= 1 << self.depth;
            self.frames.push(ContainerFrame::Object { pending_key: None });
        } else {
            self.nesting &= !(1 << self.depth);
            self.frames.push(ContainerFrame::Array { index: 0 });
        }
        self.depth += 1;
        Ok(())
    }

    fn pop_frame(&mut self) {
        self.depth -= 1;
        self.frames.pop();
    }

    fn in_object(&self) -> bool {
        self.depth > 0 && (self.nesting & (1 << (self.depth - 1))) != 0
    }

    fn advance_array_index(&mut self) {
        if let Some(ContainerFrame::Array { index }) = self.frames.last_mut() {
            *index += 1;
        }
    }

    fn set_pending_key(&mut self, key: String) {
        if let Some(ContainerFrame::Object { pending_key }) = self.frames.last_mut() {
            *pending_key = Some(key);
        }
    }

    /// Pulls the next token. Returns `Ok(None)` when the buffer ends
    /// mid-token or mid-document and more input (or [`Reader::finish`]) is
    /// needed; the caller should [`Reader::feed`] more bytes and retry.
    ///
    /// # Errors
    /// Returns a [`ReaderError`] on any grammar violation, depth overflow,
    /// or invalid escape/number/UTF-8.
    pub fn next_token(&mut self) -> Result<Option<Token<'_>>, ReaderError> {
        if self.parse_state == ParseState::Poisoned {
            return Err(ReaderError::Poisoned);
        }
        self.skip_bom_once();
        let result = self.next_token_checked();
        if result.is_err() {
            self.poison();
        }
        result
    }

    fn next_token_checked(&mut self) -> Result<Option<Token<'_>>, ReaderError> {
        skip_trivia_or_return!(self);
        self.next_token_inner()
    }

    fn next_token_inner(&mut self) -> Result<Option<Token<'_>>, ReaderError> {
        use ParseState::{
            AfterArrayValue, AfterPropertyName, AfterPropertyValue, BeforeArrayValue,
            BeforePropertyName, BeforePropertyValue, End, Start,
        };

        let Some(&byte) = self.buf.get(self.pos) else {
            if self.end_of_input {
                return match self.parse_state {
                    End => Ok(None),
                    _ if self.depth == 0 && self.parse_state == Start => {
                        let (line, byte_in_line) = self.line_col(self.pos);
                        Err(ReaderError::UnexpectedToken {
                            message: "empty document".into(),
                            path: self.current_path(),
                            line,
                            byte_in_line,
                        })
                    }
                    _ => {
                        let (line, byte_in_line) = self.line_col(self.pos);
                        Err(ReaderError::UnexpectedToken {
                            message: "unexpected end of input".into(),
                            path: self.current_path(),
                            line,
                            byte_in_line,
                        })
                    }
                };
            }
            return Ok(None);
        };

        match self.parse_state {
            End => {
                if self.options.allow_multiple_json_values {
                    self.parse_state = Start;
                    self.next_token_inner()
                } else {
                    let (line, byte_in_line) = self.line_col(self.pos);
                    Err(ReaderError::UnexpectedToken {
                        message: "unexpected trailing content after top-level value".into(),
                        path: self.current_path(),
                        line,
                        byte_in_line,
                    })
                }
            }
            Start => self.read_value(byte, true),
            BeforePropertyName => self.read_property_name_or_close(byte),
            AfterPropertyName => self.expect_colon(byte),
            BeforePropertyValue => self.read_value(byte, false),
            BeforeArrayValue => self.read_array_value_or_close(byte),
            AfterPropertyValue | AfterArrayValue => self.read_separator(byte),
            ParseState::Poisoned => unreachable!("checked above"),
        }
    }

    fn expect_colon(&mut self, byte: u8) -> Result<Option<Token<'_>>, ReaderError> {
        if byte != b':' {
            let (line, byte_in_line) = self.line_col(self.pos);
            return Err(ReaderError::UnexpectedToken {
                message: alloc::format!("expected `:`, found `{}`", byte as char),
                path: self.current_path(),
                line,
                byte_in_line,
            });
        }
        self.pos += 1;
        self.parse_state = ParseState::BeforePropertyValue;
        skip_trivia_or_return!(self);
        self.next_token_inner()
    }

    fn read_separator(&mut self, byte: u8) -> Result<Option<Token<'_>>, ReaderError> {
        let object_context = self.in_object();
        match (object_context, byte) {
            (true, b'}') => {
                self.pos += 1;
                self.pop_frame();
                self.after_close();
                Ok(Some(Token {
                    token_type: TokenType::EndObject,
                    bytes: &[],
                    escaped: false,
                }))
            }
            (false, b']') => {
                self.pos += 1;
                self.pop_frame();
                self.after_close();
                Ok(Some(Token {
                    token_type: TokenType::EndArray,
                    bytes: &[],
                    escaped: false,
                }))
            }
            (true, b',') => {
                self.pos += 1;
                self.parse_state = ParseState::BeforePropertyName;
                skip_trivia_or_return!(self);
                self.read_property_name_or_close_after_comma()
            }
            (false, b',') => {
                self.pos += 1;
                self.parse_state = ParseState::BeforeArrayValue;
                skip_trivia_or_return!(self);
                self.next_token_inner()
            }
            (true, b']') | (false, b'}') => {
                let (line, byte_in_line) = self.line_col(self.pos);
                Err(ReaderError::MismatchedBracket {
                    path: self.current_path(),
                    line,
                    byte_in_line,
                })
            }
            _ => {
                let (line, byte_in_line) = self.line_col(self.pos);
                Err(ReaderError::UnexpectedToken {
                    message: alloc::format!("unexpected byte `{}`", byte as char),
                    path: self.current_path(),
                    line,
                    byte_in_line,
                })
            }
        }
    }

    fn read_property_name_or_close_after_comma(&mut self) -> Result<Option<Token<'_>>, ReaderError> {
        let Some(&byte) = self.buf.get(self.pos) else {
            return if self.end_of_input {
                let (line, byte_in_line) = self.line_col(self.pos);
                Err(ReaderError::UnexpectedToken {
                    message: "unexpected end of input".into(),
                    path: self.current_path(),
                    line,
                    byte_in_line,
                })
            } else {
                Ok(None)
            };
        };
        if byte == b'}' && self.options.allow_trailing_commas {
            self.pos += 1;
            self.pop_frame();
            self.after_close();
            return Ok(Some(Token {
                token_type: TokenType::EndObject,
                bytes: &[],
                escaped: false,
            }));
        }
        self.read_property_name_or_close(byte)
    }

    fn after_close(&mut self) {
        self.parse_state = if self.depth == 0 {
            ParseState::End
        } else if self.in_object() {
            ParseState::AfterPropertyValue
        } else {
            ParseState::AfterArrayValue
        };
    }

    fn read_property_name_or_close(&mut self, byte: u8) -> Result<Option<Token<'_>>, ReaderError> {
        if byte == b'}' {
            self.pos += 1;
            self.pop_frame();
            self.after_close();
            return Ok(Some(Token {
                token_type: TokenType::EndObject,
                bytes: &[],
                escaped: false,
            }));
        }
        if byte != b'"' {
            let (line, byte_in_line) = self.line_col(self.pos);
            return Err(ReaderError::UnexpectedToken {
                message: "expected a property name".into(),
                path: self.current_path(),
                line,
                byte_in_line,
            });
        }
        match scanner::scan_string(&self.buf, self.pos, || self.current_path())? {
            ScanOutcome::NeedMoreData => Ok(None),
            ScanOutcome::Complete(span) => {
                let content = &self.buf[self.pos + 1..span.end - 1];
                validate_utf8(content, self.pos as u64)?;
                let start = self.pos + 1;
                self.pos = span.end;
                self.parse_state = ParseState::AfterPropertyName;
                if !span.needs_unescape {
                    let key = core::str::from_utf8(content).unwrap_or_default();
                    self.set_pending_key(key.into());
                } else {
                    let mut decoded = String::new();
                    scanner::unescape(content, &mut decoded, || JsonPath::root())?;
                    self.set_pending_key(decoded);
                }
                Ok(Some(Token {
                    token_type: TokenType::PropertyName,
                    bytes: &self.buf[start..span.end - 1],
                    escaped: span.needs_unescape,
                }))
            }
        }
    }

    fn read_array_value_or_close(&mut self, byte: u8) -> Result<Option<Token<'_>>, ReaderError> {
        if byte == b']' {
            self.pos += 1;
            self.pop_frame();
            self.after_close();
            return Ok(Some(Token {
                token_type: TokenType::EndArray,
                bytes: &[],
                escaped: false,
            }));
        }
        self.read_value(byte, false)
    }

    #[allow(clippy::too_many_lines)]
    fn read_value(&mut self, byte: u8, is_top_level: bool) -> Result<Option<Token<'_>>, ReaderError> {
        let token = match byte {
            b'{' => {
                self.push_frame(true)?;
                self.pos += 1;
                self.parse_state = ParseState::BeforePropertyName;
                Some(Token {
                    token_type: TokenType::StartObject,
                    bytes: &[],
                    escaped: false,
                })
            }
            b'[' => {
                self.push_frame(false)?;
                self.pos += 1;
                self.parse_state = ParseState::BeforeArrayValue;
                Some(Token {
                    token_type: TokenType::StartArray,
                    bytes: &[],
                    escaped: false,
                })
            }
            b'"' => match scanner::scan_string(&self.buf, self.pos, || self.current_path())? {
                ScanOutcome::NeedMoreData => None,
                ScanOutcome::Complete(span) => {
                    let content = &self.buf[self.pos + 1..span.end - 1];
                    validate_utf8(content, self.pos as u64)?;
                    self.pos = span.end;
                    self.after_value();
                    Some(Token {
                        token_type: TokenType::String,
                        bytes: content,
                        escaped: span.needs_unescape,
                    })
                }
            },
            b'-' | b'0'..=b'9' => {
                match scanner::scan_number(&self.buf, self.pos, self.end_of_input, || {
                    self.current_path()
                })? {
                    ScanOutcome::NeedMoreData if self.end_of_input => {
                        return Err(ReaderError::InvalidNumber {
                            message: "truncated number literal".into(),
                            path: self.current_path(),
                        });
                    }
                    ScanOutcome::NeedMoreData => None,
                    ScanOutcome::Complete(end) => {
                        let content = &self.buf[self.pos..end];
                        self.pos = end;
                        self.after_value();
                        Some(Token {
                            token_type: TokenType::Number,
                            bytes: content,
                            escaped: false,
                        })
                    }
                }
            }
            b't' => self.read_literal(b"true", TokenType::True)?,
            b'f' => self.read_literal(b"false", TokenType::False)?,
            b'n' => self.read_literal(b"null", TokenType::Null)?,
            _ => {
                let (line, byte_in_line) = self.line_col(self.pos);
                return Err(ReaderError::UnexpectedToken {
                    message: alloc::format!("unexpected byte `{}`", byte as char),
                    path: self.current_path(),
                    line,
                    byte_in_line,
                });
            }
        };
        let _ = is_top_level;
        Ok(token)
    }

    fn read_literal(
        &mut self,
        literal: &'static [u8],
        token_type: TokenType,
    ) -> Result<Option<Token<'_>>, ReaderError> {
        if self.pos + literal.len() > self.buf.len() {
            if self.end_of_input {
                let (line, byte_in_line) = self.line_col(self.pos);
                return Err(ReaderError::UnexpectedToken {
                    message: "truncated literal".into(),
                    path: self.current_path(),
                    line,
                    byte_in_line,
                });
            }
            return Ok(None);
        }
        if &self.buf[self.pos..self.pos + literal.len()] != literal {
            let (line, byte_in_line) = self.line_col(self.pos);
            return Err(ReaderError::UnexpectedToken {
                message: alloc::format!("invalid literal, expected `{}`", unsafe {
                    core::str::from_utf8_unchecked(literal)
                }),
                path: self.current_path(),
                line,
                byte_in_line,
            });
        }
        self.pos += literal.len();
        self.after_value();
        Ok(Some(Token {
            token_type,
            bytes: &[],
            escaped: false,
        }))
    }

    fn after_value(&mut self) {
        if self.depth == 0 {
            self.parse_state = ParseState::End;
            return;
        }
        if self.in_object() {
            self.parse_state = ParseState::AfterPropertyValue;
        } else {
            self.advance_array_index();
            self.parse_state = ParseState::AfterArrayValue;
        }
    }

    /// Advances past a complete value (including any nested containers),
    /// discarding its tokens. Resumable like [`Self::next_token`]: returns
    /// `Ok(false)` when more input is needed.
    ///
    /// # Errors
    /// Propagates any [`ReaderError`] the underlying tokens would raise.
    pub fn try_skip(&mut self) -> Result<bool, ReaderError> {
        let anchor = *self.skip_anchor.get_or_insert(self.depth);
        loop {
            match self.next_token()? {
                None => return Ok(false),
                Some(token) => match token.token_type {
                    TokenType::PropertyName
                    | TokenType::Comment
                    | TokenType::StartObject
                    | TokenType::StartArray => {}
                    TokenType::EndObject | TokenType::EndArray if self.depth == anchor => {
                        self.skip_anchor = None;
                        return Ok(true);
                    }
                    TokenType::EndObject | TokenType::EndArray => {}
                    _ if self.depth == anchor => {
                        self.skip_anchor = None;
                        return Ok(true);
                    }
                    _ => {}
                },
            }
        }
    }
}

fn validate_utf8(bytes: &[u8], offset: u64) -> Result<(), ReaderError> {
    match core::str::from_utf8(bytes) {
        Ok(_) => Ok(()),
        Err(e) => Err(ReaderError::InvalidUtf8 {
            offset: offset + e.valid_up_to() as u64,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect_all(reader: &mut Reader) -> Vec<(TokenType, alloc::string::String)> {
        let mut out = Vec::new();
        loop {
            match reader.next_token() {
                Ok(Some(t)) => {
                    let text = if matches!(
                        t.token_type,
                        TokenType::String | TokenType::PropertyName | TokenType::Number
                    ) {
                        t.as_str().into()
                    } else {
                        alloc::string::String::new()
                    };
                    out.push((t.token_type, text));
                }
                Ok(None) => break,
                Err(e) => panic!("unexpected reader error: {e}"),
            }
        }
        out
    }

    #[test]
    fn s1_number_array_round_trip() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"[1,2,3]");
        reader.finish();
        let tokens = collect_all(&mut reader);
        assert_eq!(
            tokens,
            alloc::vec![
                (TokenType::StartArray, "".into()),
                (TokenType::Number, "1".into()),
                (TokenType::Number, "2".into()),
                (TokenType::Number, "3".into()),
                (TokenType::EndArray, "".into()),
            ]
        );
    }

    #[test]
    fn s3_chunked_object_matches_one_shot() {
        let mut chunked = Reader::new(ReaderOptions::default());
        chunked.feed(br#"{"x":12"#);
        let mut first_pass = Vec::new();
        while let Some(t) = chunked.next_token().unwrap() {
            first_pass.push(t.token_type);
        }
        chunked.feed(br#"34,"y":null}"#);
        chunked.finish();
        let mut second_pass = collect_all(&mut chunked);
        let mut combined: Vec<_> = first_pass
            .into_iter()
            .map(|tt| (tt, alloc::string::String::new()))
            .collect();
        combined.append(&mut second_pass);

        let mut one_shot = Reader::new(ReaderOptions::default());
        one_shot.feed(br#"{"x":1234,"y":null}"#);
        one_shot.finish();
        let one_shot_tokens = collect_all(&mut one_shot);

        let combined_types: Vec<_> = combined.iter().map(|(t, _)| *t).collect();
        let one_shot_types: Vec<_> = one_shot_tokens.iter().map(|(t, _)| *t).collect();
        assert_eq!(combined_types, one_shot_types);
    }

    #[test]
    fn s4_trailing_comma_rejected_by_default() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"[1,]");
        reader.finish();
        reader.next_token().unwrap();
        reader.next_token().unwrap();
        assert!(reader.next_token().is_err());
    }

    #[test]
    fn s4_trailing_comma_allowed_when_configured() {
        let mut reader =
            Reader::new(ReaderOptions::default().with_allow_trailing_commas(true));
        reader.feed(b"[1,]");
        reader.finish();
        let tokens = collect_all(&mut reader);
        assert_eq!(
            tokens,
            alloc::vec![
                (TokenType::StartArray, "".into()),
                (TokenType::Number, "1".into()),
                (TokenType::EndArray, "".into()),
            ]
        );
    }

    #[test]
    fn s5_depth_cap_exceeded() {
        let mut input = alloc::vec::Vec::new();
        for _ in 0..100 {
            input.push(b'[');
        }
        let mut reader = Reader::new(ReaderOptions::default().with_max_depth(64));
        reader.feed(&input);
        reader.finish();
        let mut result = Ok(None);
        for _ in 0..70 {
            result = reader.next_token();
            if result.is_err() {
                break;
            }
        }
        assert!(result.is_err());
    }

    #[test]
    fn s6_comment_handling_disallow_errors() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(br#"{/*c*/"a":1}"#);
        reader.finish();
        assert!(reader.next_token().is_err());
    }

    #[test]
    fn s6_comment_handling_skip() {
        let mut reader =
            Reader::new(ReaderOptions::default().with_comment_handling(CommentHandling::Skip));
        reader.feed(br#"{/*c*/"a":1}"#);
        reader.finish();
        let tokens = collect_all(&mut reader);
        assert_eq!(
            tokens,
            alloc::vec![
                (TokenType::StartObject, "".into()),
                (TokenType::PropertyName, "a".into()),
                (TokenType::Number, "1".into()),
                (TokenType::EndObject, "".into()),
            ]
        );
    }

    #[test]
    fn s6_comment_handling_allow_surfaces_comment() {
        let mut reader =
            Reader::new(ReaderOptions::default().with_comment_handling(CommentHandling::Allow));
        reader.feed(br#"{/*c*/"a":1}"#);
        reader.finish();
        let tokens = collect_all(&mut reader);
        assert_eq!(tokens[0].0, TokenType::Comment);
    }

    #[test]
    fn s2_escape_sequence_decodes() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"\"aA\\u00e9b\"");
        reader.finish();
        let Some(token) = reader.next_token().unwrap() else {
            panic!("expected token");
        };
        assert_eq!(token.token_type, TokenType::String);
        assert!(token.escaped);
        let mut decoded = alloc::string::String::new();
        scanner::unescape(token.as_bytes(), &mut decoded, JsonPath::root).unwrap();
        assert_eq!(decoded, "aAéb");
    }

    #[test]
    fn try_skip_advances_past_nested_container() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(br#"[1,[2,3],4]"#);
        reader.finish();
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::StartArray);
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::Number);
        assert!(reader.try_skip().unwrap());
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::Number);
    }

    #[test]
    fn typed_number_accessors_parse_the_lexeme() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"[-7,3.5]");
        reader.finish();
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::StartArray);
        let int_token = reader.next_token().unwrap().unwrap();
        assert_eq!(int_token.try_get_i32(), Some(-7));
        assert_eq!(int_token.try_get_i64(), Some(-7));
        assert_eq!(int_token.try_get_f64(), Some(-7.0));
        assert_eq!(
            int_token.try_get_decimal(),
            Some(rust_decimal::Decimal::from(-7))
        );
        let frac_token = reader.next_token().unwrap().unwrap();
        assert_eq!(frac_token.try_get_i32(), None);
        assert_eq!(frac_token.try_get_f64(), Some(3.5));
    }

    #[test]
    fn get_string_decodes_escapes_and_try_get_guid_parses_a_hyphenated_uuid() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"\"aA\\u00e9b\"");
        reader.finish();
        let token = reader.next_token().unwrap().unwrap();
        assert_eq!(token.get_string().unwrap(), "aAéb");

        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"\"f47ac10b-58cc-4372-a567-0e02b2c3d479\"");
        reader.finish();
        let token = reader.next_token().unwrap().unwrap();
        assert!(token.try_get_guid().is_some());
        assert!(!token.has_value_sequence());
    }

    #[test]
    fn mismatched_closing_bracket_is_rejected() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(br#"{"a":1]"#);
        reader.finish();
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::StartObject);
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::PropertyName);
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::Number);
        assert!(matches!(
            reader.next_token(),
            Err(ReaderError::MismatchedBracket { .. })
        ));

        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"[1}");
        reader.finish();
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::StartArray);
        assert_eq!(reader.next_token().unwrap().unwrap().token_type, TokenType::Number);
        assert!(matches!(
            reader.next_token(),
            Err(ReaderError::MismatchedBracket { .. })
        ));
    }

    #[test]
    fn try_get_date_time_parses_rfc3339() {
        let mut reader = Reader::new(ReaderOptions::default());
        reader.feed(b"\"2024-01-02T03:04:05Z\"");
        reader.finish();
        let token = reader.next_token().unwrap().unwrap();
        assert!(token.try_get_date_time().is_some());
    }
}
