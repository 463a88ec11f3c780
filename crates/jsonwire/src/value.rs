//! A materialized JSON value tree, used by the data-extension member
//! converter (`spec.md` §4.5) and as a convenient whole-document target for
//! callers who don't need the converter engine's typed mapping.
use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::fmt;

use crate::scanner::{EscapePolicy, escape_into};

pub type Map = BTreeMap<String, Value>;
pub type Array = Vec<Value>;

/// A JSON value as defined by [RFC 8259].
///
/// [RFC 8259]: https://datatracker.ietf.org/doc/html/rfc8259
#[cfg_attr(
    any(test, feature = "serde"),
    derive(serde::Serialize, serde::Deserialize)
)]
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Array),
    Object(Map),
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.into())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Self::Array(v)
    }
}

impl From<Map> for Value {
    fn from(v: Map) -> Self {
        Self::Object(v)
    }
}

impl Value {
    /// Returns `true` if the value is [`Null`](Value::Null).
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Boolean(..))
    }

    #[must_use]
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(..))
    }

    #[must_use]
    pub fn is_string(&self) -> bool {
        matches!(self, Self::String(..))
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(..))
    }

    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(..))
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        if let Self::String(s) = self { Some(s) } else { None }
    }

    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        if let Self::Number(n) = self { Some(*n) } else { None }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        if let Self::Array(a) = self { Some(a) } else { None }
    }

    #[must_use]
    pub fn as_object(&self) -> Option<&Map> {
        if let Self::Object(o) = self { Some(o) } else { None }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Boolean(b) => f.write_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => {
                let mut escaped = Vec::with_capacity(s.len() + 2);
                escaped.push(b'"');
                escape_into(&mut escaped, s, EscapePolicy::AsciiSafe);
                escaped.push(b'"');
                // `escape_into` under `AsciiSafe` never emits non-ASCII bytes.
                f.write_str(core::str::from_utf8(&escaped).unwrap_or_default())
            }
            Value::Array(arr) => {
                f.write_str("[")?;
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{v}")?;
                }
                f.write_str("]")
            }
            Value::Object(map) => {
                f.write_str("{")?;
                for (i, (k, v)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let mut escaped = Vec::with_capacity(k.len() + 2);
                    escaped.push(b'"');
                    escape_into(&mut escaped, k, EscapePolicy::AsciiSafe);
                    escaped.push(b'"');
                    write!(
                        f,
                        "{}:{v}",
                        core::str::from_utf8(&escaped).unwrap_or_default()
                    )?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::{string::ToString, vec};

    use super::*;

    #[test]
    fn predicates_match_variant() {
        assert!(Value::Null.is_null());
        assert!(Value::Boolean(true).is_bool());
        assert!(Value::Number(1.0).is_number());
        assert!(Value::from("x").is_string());
        assert!(Value::from(vec![Value::Null]).is_array());
        assert!(Value::from(Map::new()).is_object());
    }

    #[test]
    fn default_is_null() {
        assert_eq!(Value::default(), Value::Null);
    }

    #[test]
    fn display_escapes_strings_and_nests_containers() {
        let mut map = Map::new();
        map.insert("a\"b".into(), Value::from(vec![Value::Number(1.0)]));
        let v = Value::Object(map);
        assert_eq!(v.to_string(), r#"{"a\"b":[1]}"#);
    }
}
