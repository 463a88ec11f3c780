//! The built-in key-value-pair converter (`spec.md` §4.4): `(K, V)` is
//! encoded as a single-entry JSON object `{"<key>": <value>}`, mirroring
//! `System.Text.Json`'s `KeyValuePair<TKey, TValue>` converter.
use crate::error::ConvertError;
use crate::path::JsonPath;
use crate::value::{Map, Value};

use super::{FromValue, IntoValue};

impl<K, V> FromValue for (K, V)
where
    K: From<alloc::string::String>,
    V: FromValue,
{
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::Object(mut map) = value else {
            return Err(ConvertError::Conversion {
                message: "expected a single-entry object for a key-value pair".into(),
                path: JsonPath::root(),
            });
        };
        if map.len() != 1 {
            return Err(ConvertError::Conversion {
                message: alloc::format!(
                    "expected exactly one entry for a key-value pair, found {}",
                    map.len()
                ),
                path: JsonPath::root(),
            });
        }
        let (key, v) = map.pop_first().expect("checked len == 1 above");
        Ok((K::from(key), V::from_value(v)?))
    }
}

impl<K, V> IntoValue for (K, V)
where
    K: Into<alloc::string::String>,
    V: IntoValue,
{
    fn into_value(self) -> Value {
        let mut map = Map::new();
        map.insert(self.0.into(), self.1.into_value());
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_as_single_entry_object() {
        let pair: (alloc::string::String, i64) = ("count".into(), 3);
        assert_eq!(pair.into_value(), {
            let mut m = Map::new();
            m.insert("count".into(), Value::Number(3.0));
            Value::Object(m)
        });
    }

    #[test]
    fn decodes_single_entry_object() {
        let mut m = Map::new();
        m.insert("count".into(), Value::Number(3.0));
        let (k, v) = <(alloc::string::String, i64)>::from_value(Value::Object(m)).unwrap();
        assert_eq!(k, "count");
        assert_eq!(v, 3);
    }

    #[test]
    fn rejects_multi_entry_object() {
        let mut m = Map::new();
        m.insert("a".into(), Value::Number(1.0));
        m.insert("b".into(), Value::Number(2.0));
        assert!(<(alloc::string::String, i64)>::from_value(Value::Object(m)).is_err());
    }
}
