//! A resumable driver that materializes a [`Value`] tree from a [`Reader`]
//! (`spec.md` C6, the "structural center" of the converter engine).
//!
//! Grounded on the teacher's `event_stack.rs` `EventStack`/`ValueBuilder`,
//! which assembles a `Value` from streamed parse events via
//! `enter_with`/`mutate_with`/`pop` on a zipper-style builder. We don't need
//! a zipper here because [`Frame`] already owns its in-progress container
//! directly (an owned `Map`/`Array` we push completed children into), so
//! "mutate the currently open frame" is just `self.frames.last_mut()`.
use alloc::string::String;

use crate::convert::frame::{Frame, Progress};
use crate::error::ConvertError;
use crate::path::JsonPath;
use crate::reader::{Reader, Token, TokenType};
use crate::scanner;
use crate::value::{Map, Value};

/// How a [`ValueStack`] resolves a second occurrence of the same property
/// name within one object (`spec.md` §4.5's resolved Open Question).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePropertyHandling {
    Error,
    #[default]
    Overwrite,
}

/// Drives a [`Reader`] to completion, assembling a [`Value`] tree.
///
/// Pauses whenever the reader reports `NeedMoreData` and resumes exactly
/// where it left off on the next call to [`ValueStack::drive`], so a
/// caller can feed a document one chunk at a time without re-parsing
/// anything already consumed.
#[derive(Debug, Default)]
pub struct ValueStack {
    frames: alloc::vec::Vec<Frame>,
    duplicate_property_handling: DuplicatePropertyHandling,
    /// A root value already resolved by [`Self::confirm_root`]'s look-ahead
    /// token (only possible in `allow_multiple_json_values` mode, where that
    /// token turned out to be a single-token document like `true` rather
    /// than the start of a longer one). Handed back on the next call to
    /// [`Self::drive`] before anything else.
    pending_root: Option<Value>,
}

impl ValueStack {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_duplicate_property_handling(mut self, handling: DuplicatePropertyHandling) -> Self {
        self.duplicate_property_handling = handling;
        self
    }

    /// `true` once the root value has been consumed and no container is
    /// open; a fresh or reset stack starts `true`.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.frames.is_empty()
    }

    /// Pulls tokens from `reader` until a complete root value is
    /// assembled or the reader needs more input.
    ///
    /// Once a root value is assembled, pulls one further token before
    /// returning it so the reader's own trailing-content check (only run
    /// when something actually asks for a token past the one that
    /// completed the value) gets a chance to fire — otherwise
    /// `deserialize::<Value>(b"{}xyz")` would silently return `{}`.
    ///
    /// # Errors
    /// Propagates reader errors and raises [`ConvertError::Conversion`] on
    /// a disallowed duplicate property name.
    pub fn drive(&mut self, reader: &mut Reader) -> Result<Option<Value>, ConvertError> {
        if let Some(root) = self.pending_root.take() {
            return Ok(Some(root));
        }
        loop {
            let Some(token) = reader.next_token()? else {
                return Ok(None);
            };
            if let Some(root) = self.accept(token)? {
                return self.confirm_root(reader, root);
            }
        }
    }

    /// Looks one token past a freshly completed root value.
    ///
    /// `Ok(None)` from the reader here means "not enough input yet to know
    /// either way", not confirmation of a clean end — the caller is free to
    /// feed more and call `drive` again. An error means the reader found
    /// trailing content it doesn't allow. A token only comes back in
    /// `allow_multiple_json_values` mode, where it's the next document's
    /// first token rather than garbage; feed it back through `accept` and
    /// stash whatever root it resolves to for the next call to `drive`.
    fn confirm_root(&mut self, reader: &mut Reader, root: Value) -> Result<Option<Value>, ConvertError> {
        match reader.next_token()? {
            None => Ok(Some(root)),
            Some(token) => {
                if let Some(second) = self.accept(token)? {
                    self.pending_root = Some(second);
                }
                Ok(Some(root))
            }
        }
    }

    fn accept(&mut self, token: Token<'_>) -> Result<Option<Value>, ConvertError> {
        let value = match token.token_type {
            TokenType::Comment | TokenType::None => return Ok(None),
            TokenType::StartObject => {
                self.frames.push(Frame::Object {
                    map: Map::new(),
                    pending_key: None,
                    progress: Progress::ProcessedStartToken,
                });
                return Ok(None);
            }
            TokenType::StartArray => {
                self.frames.push(Frame::Array {
                    items: alloc::vec::Vec::new(),
                });
                return Ok(None);
            }
            TokenType::PropertyName => {
                let name = decode_text(&token)?;
                match self.frames.last_mut() {
                    Some(Frame::Object {
                        pending_key,
                        progress,
                        ..
                    }) => {
                        *pending_key = Some(name);
                        *progress = Progress::ProcessedName;
                    }
                    _ => {
                        return Err(ConvertError::ProgrammerError {
                            message: "property name outside of an object frame".into(),
                        });
                    }
                }
                return Ok(None);
            }
            TokenType::EndObject => {
                let Some(Frame::Object { map, .. }) = self.frames.pop() else {
                    return Err(ConvertError::ProgrammerError {
                        message: "end-object with no matching object frame".into(),
                    });
                };
                Value::Object(map)
            }
            TokenType::EndArray => {
                let Some(Frame::Array { items }) = self.frames.pop() else {
                    return Err(ConvertError::ProgrammerError {
                        message: "end-array with no matching array frame".into(),
                    });
                };
                Value::Array(items)
            }
            TokenType::String => Value::String(decode_text(&token)?),
            TokenType::Number => Value::Number(parse_number(&token)?),
            TokenType::True => Value::Boolean(true),
            TokenType::False => Value::Boolean(false),
            TokenType::Null => Value::Null,
        };
        self.push_value(value)
    }

    fn push_value(&mut self, value: Value) -> Result<Option<Value>, ConvertError> {
        match self.frames.last_mut() {
            None => Ok(Some(value)),
            Some(Frame::Array { items }) => {
                items.push(value);
                Ok(None)
            }
            Some(Frame::Object {
                map,
                pending_key,
                progress,
            }) => {
                let key = pending_key.take().ok_or_else(|| ConvertError::ProgrammerError {
                    message: "object value with no pending property name".into(),
                })?;
                if map.contains_key(&key)
                    && self.duplicate_property_handling == DuplicatePropertyHandling::Error
                {
                    return Err(ConvertError::Conversion {
                        message: alloc::format!("duplicate property `{key}`"),
                        path: JsonPath::root(),
                    });
                }
                map.insert(key, value);
                *progress = Progress::ProcessedValue;
                Ok(None)
            }
        }
    }
}

fn decode_text(token: &Token<'_>) -> Result<String, ConvertError> {
    if token.escaped {
        let mut decoded = String::new();
        scanner::unescape(token.as_bytes(), &mut decoded, JsonPath::root)?;
        Ok(decoded)
    } else {
        Ok(token.as_str().into())
    }
}

fn parse_number(token: &Token<'_>) -> Result<f64, ConvertError> {
    token.as_str().parse::<f64>().map_err(|e| ConvertError::Conversion {
        message: alloc::format!("invalid number literal: {e}"),
        path: JsonPath::root(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ReaderOptions;

    fn materialize(input: &[u8]) -> Value {
        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new();
        reader.feed(input);
        reader.finish();
        stack.drive(&mut reader).unwrap().expect("value never completed")
    }

    #[test]
    fn flat_object_round_trips_into_value() {
        let v = materialize(br#"{"a":1,"b":"x"}"#);
        let Value::Object(map) = v else { panic!("expected object") };
        assert_eq!(map.get("a"), Some(&Value::Number(1.0)));
        assert_eq!(map.get("b"), Some(&Value::String("x".into())));
    }

    #[test]
    fn nested_array_round_trips_into_value() {
        let v = materialize(b"[1,[2,3],null]");
        assert_eq!(
            v,
            Value::Array(vec![
                Value::Number(1.0),
                Value::Array(vec![Value::Number(2.0), Value::Number(3.0)]),
                Value::Null,
            ])
        );
    }

    #[test]
    fn resumes_across_arbitrarily_small_chunks() {
        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new();
        let doc = br#"{"x":[1,2,3],"y":true}"#;
        let mut result = None;
        for byte in doc {
            reader.feed(&[*byte]);
            if let Some(v) = stack.drive(&mut reader).unwrap() {
                result = Some(v);
                break;
            }
        }
        // The closing `}` is unambiguous on its own, so the root can resolve
        // before `finish()` is ever called; a second `drive` call afterward
        // must not find anything left to do.
        reader.finish();
        assert!(stack.drive(&mut reader).unwrap().is_none());
        let v = result.expect("value never completed");
        let Value::Object(map) = v else { panic!("expected object") };
        assert_eq!(
            map.get("x"),
            Some(&Value::Array(vec![
                Value::Number(1.0),
                Value::Number(2.0),
                Value::Number(3.0)
            ]))
        );
        assert_eq!(map.get("y"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn duplicate_property_overwrites_by_default() {
        let v = materialize(br#"{"a":1,"a":2}"#);
        let Value::Object(map) = v else { panic!("expected object") };
        assert_eq!(map.get("a"), Some(&Value::Number(2.0)));
    }

    #[test]
    fn duplicate_property_errors_when_configured() {
        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new().with_duplicate_property_handling(DuplicatePropertyHandling::Error);
        reader.feed(br#"{"a":1,"a":2}"#);
        reader.finish();
        assert!(stack.drive(&mut reader).is_err());
    }

    #[test]
    fn rejects_trailing_content_after_root_value() {
        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new();
        reader.feed(b"{}xyz");
        reader.finish();
        assert!(stack.drive(&mut reader).is_err());
    }

    #[test]
    fn does_not_wait_for_trailing_content_that_never_arrives() {
        // Chunked, not-yet-finished input: the root is complete but the
        // reader can't yet tell whether more bytes are coming, so `drive`
        // must return the value instead of blocking on confirmation.
        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new();
        reader.feed(b"[1,2,3]");
        let v = stack.drive(&mut reader).unwrap().expect("value never completed");
        assert_eq!(
            v,
            Value::Array(vec![Value::Number(1.0), Value::Number(2.0), Value::Number(3.0)])
        );
    }

    #[test]
    fn multiple_json_values_mode_resolves_each_document_in_turn() {
        let mut reader = Reader::new(ReaderOptions::default().with_allow_multiple_json_values(true));
        let mut stack = ValueStack::new();
        reader.feed(b"1 2");
        reader.finish();
        assert_eq!(stack.drive(&mut reader).unwrap(), Some(Value::Number(1.0)));
        assert_eq!(stack.drive(&mut reader).unwrap(), Some(Value::Number(2.0)));
        assert_eq!(stack.drive(&mut reader).unwrap(), None);
    }
}
