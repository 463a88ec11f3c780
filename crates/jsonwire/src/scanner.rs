//! Byte-span scanners and the escape codec (`spec.md` C1).
//!
//! Every function here is a free function over a borrowed `&[u8]` plus a
//! starting position: nothing in this module owns a buffer. That mirrors
//! the teacher's unrealized `parser::byte_buffer` design (see that module's
//! doc comment in the reference corpus) but goes a step further: rather
//! than reassembling an owned byte ring, the reader (C2) re-presents the
//! same unconsumed tail to these functions on the next call, so scanning
//! itself never has to know about chunk boundaries.
use alloc::{string::String, vec::Vec};

use crate::error::ReaderError;
use crate::path::JsonPath;

/// Outcome of scanning a string or number lexeme: either it ended within
/// the given span, or the span ended first and the caller must supply more
/// bytes starting at or before `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanOutcome<T> {
    Complete(T),
    NeedMoreData,
}

/// Advances past ASCII whitespace (space, tab, CR, LF) starting at `pos`.
/// Does not recognize comments; that policy lives in the reader, which
/// calls [`skip_whitespace`] then separately detects `//` / `/* */`.
#[must_use]
pub fn skip_whitespace(span: &[u8], pos: usize) -> usize {
    let mut i = pos;
    while i < span.len() && matches!(span[i], b' ' | b'\t' | b'\r' | b'\n') {
        i += 1;
    }
    i
}

/// Result of [`scan_string`]: the end offset (one past the closing quote)
/// and whether any escape sequence was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringSpan {
    pub end: usize,
    pub needs_unescape: bool,
}

/// Scans a `"`-delimited string starting at `span[pos]` (which must be the
/// opening quote). Returns the offset just past the closing quote, and
/// whether the content contains an escape (so the reader knows whether it
/// can hand back a zero-copy slice or must unescape into a scratch buffer).
///
/// # Errors
/// Returns [`ReaderError::InvalidEscape`] for an unsupported escape letter,
/// or a lone/invalid surrogate pair.
pub fn scan_string(
    span: &[u8],
    pos: usize,
    path: impl FnOnce() -> JsonPath,
) -> Result<ScanOutcome<StringSpan>, ReaderError> {
    debug_assert_eq!(span.get(pos), Some(&b'"'));
    let mut i = pos + 1;
    let mut needs_unescape = false;
    loop {
        let Some(&byte) = span.get(i) else {
            return Ok(ScanOutcome::NeedMoreData);
        };
        match byte {
            b'"' => {
                return Ok(ScanOutcome::Complete(StringSpan {
                    end: i + 1,
                    needs_unescape,
                }));
            }
            b'\\' => {
                needs_unescape = true;
                let Some(&escape) = span.get(i + 1) else {
                    return Ok(ScanOutcome::NeedMoreData);
                };
                match escape {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                        i += 2;
                    }
                    b'u' => {
                        if i + 6 > span.len() {
                            return Ok(ScanOutcome::NeedMoreData);
                        }
                        validate_hex4(&span[i + 2..i + 6], &path)?;
                        i += 6;
                    }
                    other => {
                        return Err(ReaderError::InvalidEscape {
                            message: alloc::format!("unsupported escape `\\{}`", other as char),
                            path: path(),
                        });
                    }
                }
            }
            b if b < 0x20 => {
                return Err(ReaderError::InvalidEscape {
                    message: alloc::format!("control byte 0x{b:02x} in string literal"),
                    path: path(),
                });
            }
            _ => {
                i += 1;
            }
        }
    }
}

fn validate_hex4(bytes: &[u8], path: &impl Fn() -> JsonPath) -> Result<u16, ReaderError> {
    let text = core::str::from_utf8(bytes).map_err(|_| ReaderError::InvalidEscape {
        message: "invalid \\u escape".into(),
        path: path(),
    })?;
    u16::from_str_radix(text, 16).map_err(|_| ReaderError::InvalidEscape {
        message: alloc::format!("invalid \\u escape `{text}`"),
        path: path(),
    })
}

/// Scans a JSON number literal. Accepts optional `-`, `0` or `1-9` digits
/// (rejecting other leading zeros), optional `.` fraction digits, optional
/// exponent. Bytes are not parsed to a numeric value here; the raw span is
/// kept so callers can round-trip or parse lazily.
///
/// `eof` must be `true` when `span` is known to hold all remaining input
/// (i.e. [`crate::reader::Reader::finish`] was called): a number can only
/// be considered complete at the end of the span once we know no further
/// digits are coming.
///
/// # Errors
/// Returns a [`ReaderError::InvalidNumber`] if the integer part is a `0`
/// immediately followed by another digit (`spec.md` §4.1: "leading zeros
/// in the integer part are rejected").
pub fn scan_number(
    span: &[u8],
    pos: usize,
    eof: bool,
    path: impl FnOnce() -> JsonPath,
) -> Result<ScanOutcome<usize>, ReaderError> {
    let mut i = pos;
    let len = span.len();
    if i >= len {
        return Ok(ScanOutcome::NeedMoreData);
    }
    if span[i] == b'-' {
        i += 1;
    }
    match span.get(i) {
        Some(b'0') => {
            i += 1;
            match span.get(i) {
                Some(b'0'..=b'9') => {
                    return Err(ReaderError::InvalidNumber {
                        message: "leading zeros are not allowed".into(),
                        path: path(),
                    });
                }
                None if !eof => return Ok(ScanOutcome::NeedMoreData),
                _ => {}
            }
        }
        Some(b'1'..=b'9') => {
            i += 1;
            while matches!(span.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        Some(_) | None => return Ok(ScanOutcome::NeedMoreData),
    }
    if span.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        let mut j = frac_start;
        while matches!(span.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        if j == frac_start {
            return Ok(ScanOutcome::NeedMoreData);
        }
        i = j;
    }
    if matches!(span.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(span.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits_start = j;
        while matches!(span.get(j), Some(b'0'..=b'9')) {
            j += 1;
        }
        if j == exp_digits_start {
            return Ok(ScanOutcome::NeedMoreData);
        }
        i = j;
    }
    // A number is only unambiguously "complete" once we know the next byte
    // isn't itself part of the number (e.g. we stopped at `12` but `1234`
    // may still be incoming). At true end of input there is nothing left
    // to extend it with, so the span boundary itself is a valid terminator.
    if i == len && !eof {
        return Ok(ScanOutcome::NeedMoreData);
    }
    Ok(ScanOutcome::Complete(i))
}

/// Transcodes the escape sequences of a raw (still-escaped) string body
/// `src` (without surrounding quotes) into `dst`, appending.
///
/// # Errors
/// Fails on a lone surrogate half that is never paired.
pub fn unescape(
    src: &[u8],
    dst: &mut String,
    path: impl Fn() -> JsonPath,
) -> Result<(), ReaderError> {
    let mut i = 0;
    while i < src.len() {
        match src[i] {
            b'\\' => {
                let escape = src[i + 1];
                match escape {
                    b'"' => {
                        dst.push('"');
                        i += 2;
                    }
                    b'\\' => {
                        dst.push('\\');
                        i += 2;
                    }
                    b'/' => {
                        dst.push('/');
                        i += 2;
                    }
                    b'b' => {
                        dst.push('\u{8}');
                        i += 2;
                    }
                    b'f' => {
                        dst.push('\u{c}');
                        i += 2;
                    }
                    b'n' => {
                        dst.push('\n');
                        i += 2;
                    }
                    b'r' => {
                        dst.push('\r');
                        i += 2;
                    }
                    b't' => {
                        dst.push('\t');
                        i += 2;
                    }
                    b'u' => {
                        let high = validate_hex4(&src[i + 2..i + 6], &path)?;
                        i += 6;
                        let ch = if (0xD800..=0xDBFF).contains(&high) {
                            if src.get(i) != Some(&b'\\') || src.get(i + 1) != Some(&b'u') {
                                return Err(ReaderError::InvalidEscape {
                                    message: "unpaired high surrogate".into(),
                                    path: path(),
                                });
                            }
                            let low = validate_hex4(&src[i + 2..i + 6], &path)?;
                            if !(0xDC00..=0xDFFF).contains(&low) {
                                return Err(ReaderError::InvalidEscape {
                                    message: "invalid low surrogate".into(),
                                    path: path(),
                                });
                            }
                            i += 6;
                            let c = 0x10000
                                + (u32::from(high) - 0xD800) * 0x400
                                + (u32::from(low) - 0xDC00);
                            char::from_u32(c)
                        } else if (0xDC00..=0xDFFF).contains(&high) {
                            return Err(ReaderError::InvalidEscape {
                                message: "unpaired low surrogate".into(),
                                path: path(),
                            });
                        } else {
                            char::from_u32(u32::from(high))
                        };
                        match ch {
                            Some(c) => dst.push(c),
                            None => {
                                return Err(ReaderError::InvalidEscape {
                                    message: "invalid scalar value".into(),
                                    path: path(),
                                });
                            }
                        }
                    }
                    _ => unreachable!("validated by scan_string"),
                }
            }
            _ => {
                let start = i;
                while i < src.len() && src[i] != b'\\' {
                    i += 1;
                }
                // SAFETY: `src` is a sub-span of an input that scan_string
                // already validated as well-formed UTF-8 with no raw
                // control bytes; non-backslash runs are therefore valid
                // UTF-8 on their own.
                dst.push_str(core::str::from_utf8(&src[start..i]).unwrap_or_default());
            }
        }
    }
    Ok(())
}

/// ASCII-safe escaping policy: escapes the structural set plus everything
/// outside printable ASCII. Used by default so output is safe to embed in
/// HTML/XML/JS contexts without further processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapePolicy {
    #[default]
    AsciiSafe,
    MinimalUtf8,
}

/// Returns the byte index of the first character that needs escaping under
/// `policy`, or `None` if the whole string can be emitted verbatim.
#[must_use]
pub fn needs_escaping(value: &str, policy: EscapePolicy) -> Option<usize> {
    value.char_indices().find_map(|(idx, ch)| {
        if char_needs_escaping(ch, policy) {
            Some(idx)
        } else {
            None
        }
    })
}

fn char_needs_escaping(ch: char, policy: EscapePolicy) -> bool {
    match ch {
        '"' | '\\' => true,
        c if (c as u32) < 0x20 => true,
        '<' | '>' | '&' | '\'' | '+' => policy == EscapePolicy::AsciiSafe,
        c => policy == EscapePolicy::AsciiSafe && !c.is_ascii(),
    }
}

/// Appends `value` to `dst`, escaping per `policy`. Does not write the
/// surrounding quotes.
pub fn escape_into(dst: &mut Vec<u8>, value: &str, policy: EscapePolicy) {
    for ch in value.chars() {
        if char_needs_escaping(ch, policy) {
            escape_char(dst, ch);
        } else {
            let mut buf = [0u8; 4];
            dst.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
        }
    }
}

fn escape_char(dst: &mut Vec<u8>, ch: char) {
    match ch {
        '"' => dst.extend_from_slice(b"\\\""),
        '\\' => dst.extend_from_slice(b"\\\\"),
        '\u{8}' => dst.extend_from_slice(b"\\b"),
        '\u{c}' => dst.extend_from_slice(b"\\f"),
        '\n' => dst.extend_from_slice(b"\\n"),
        '\r' => dst.extend_from_slice(b"\\r"),
        '\t' => dst.extend_from_slice(b"\\t"),
        c if (c as u32) <= 0xFFFF => {
            dst.extend_from_slice(alloc::format!("\\u{:04x}", c as u32).as_bytes());
        }
        c => {
            let v = c as u32 - 0x10000;
            let high = 0xD800 + (v >> 10);
            let low = 0xDC00 + (v & 0x3FF);
            dst.extend_from_slice(alloc::format!("\\u{high:04x}\\u{low:04x}").as_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn skip_whitespace_stops_at_content() {
        assert_eq!(skip_whitespace(b"  \t\r\n x", 0), 5);
    }

    #[test]
    fn scan_string_basic() {
        let span = br#""hello""#;
        let ScanOutcome::Complete(s) = scan_string(span, 0, JsonPath::root).unwrap() else {
            panic!("expected complete");
        };
        assert_eq!(s.end, span.len());
        assert!(!s.needs_unescape);
    }

    #[test]
    fn scan_string_unterminated_needs_more() {
        let span = br#""hello"#;
        assert_eq!(
            scan_string(span, 0, JsonPath::root).unwrap(),
            ScanOutcome::NeedMoreData
        );
    }

    #[test]
    fn scan_string_rejects_control_byte() {
        let span = b"\"a\nb\"";
        assert!(scan_string(span, 0, JsonPath::root).is_err());
    }

    #[test]
    fn scan_number_variants() {
        assert_eq!(
            scan_number(b"123,", 0, false, JsonPath::root).unwrap(),
            ScanOutcome::Complete(3)
        );
        assert_eq!(
            scan_number(b"-0.5e+10]", 0, false, JsonPath::root).unwrap(),
            ScanOutcome::Complete(8)
        );
        assert_eq!(
            scan_number(b"123", 0, false, JsonPath::root).unwrap(),
            ScanOutcome::NeedMoreData
        );
        assert_eq!(
            scan_number(b"123", 0, true, JsonPath::root).unwrap(),
            ScanOutcome::Complete(3)
        );
    }

    #[test]
    fn scan_number_rejects_leading_zero_followed_by_digit() {
        assert!(scan_number(b"01", 0, true, JsonPath::root).is_err());
        assert!(scan_number(b"-01", 0, true, JsonPath::root).is_err());
    }

    #[test]
    fn scan_number_accepts_bare_zero_and_zero_fraction() {
        assert_eq!(
            scan_number(b"0,", 0, false, JsonPath::root).unwrap(),
            ScanOutcome::Complete(1)
        );
        assert_eq!(
            scan_number(b"0.5,", 0, false, JsonPath::root).unwrap(),
            ScanOutcome::Complete(3)
        );
    }

    #[test]
    fn unescape_handles_surrogate_pair() {
        let mut dst = String::new();
        unescape(b"\\uD83D\\uDE00", &mut dst, JsonPath::root).unwrap();
        assert_eq!(dst, "\u{1F600}");
    }

    #[test]
    fn unescape_plain_escape_chars() {
        let mut dst = String::new();
        unescape("aA\\u00e9b".as_bytes(), &mut dst, JsonPath::root).unwrap();
        assert_eq!(dst, "aAéb");
    }

    #[test]
    fn escape_round_trips_through_needs_escaping() {
        let mut out = Vec::new();
        escape_into(&mut out, "a\"b\\c", EscapePolicy::AsciiSafe);
        assert_eq!(String::from_utf8(out).unwrap(), r#"a\"b\\c"#.to_string());
    }
}
