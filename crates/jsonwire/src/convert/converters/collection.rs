//! The built-in collection converters (`spec.md` §4.4): `Vec<T>` maps to a
//! JSON array and `BTreeMap<String, T>` to a JSON object, each delegating
//! element conversion to `T`'s own converter.
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::ConvertError;
use crate::path::JsonPath;
use crate::value::{Map, Value};

use super::{FromValue, IntoValue};

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::Array(items) = value else {
            return Err(ConvertError::Conversion {
                message: "expected a JSON array".into(),
                path: JsonPath::root(),
            });
        };
        items.into_iter().map(T::from_value).collect()
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn into_value(self) -> Value {
        Value::Array(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::Object(map) = value else {
            return Err(ConvertError::Conversion {
                message: "expected a JSON object".into(),
                path: JsonPath::root(),
            });
        };
        map.into_iter().map(|(k, v)| Ok((k, T::from_value(v)?))).collect()
    }
}

impl<T: IntoValue> IntoValue for BTreeMap<String, T> {
    fn into_value(self) -> Value {
        let mut map = Map::new();
        for (k, v) in self {
            map.insert(k, v.into_value());
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_round_trips_through_array() {
        let v = alloc::vec![1i64, 2, 3];
        let value = v.clone().into_value();
        assert_eq!(value, Value::Array(alloc::vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(3.0)
        ]));
        assert_eq!(Vec::<i64>::from_value(value).unwrap(), v);
    }

    #[test]
    fn map_round_trips_through_object() {
        let mut m = BTreeMap::new();
        m.insert(String::from("a"), 1i64);
        let value = m.clone().into_value();
        assert_eq!(BTreeMap::<String, i64>::from_value(value).unwrap(), m);
    }

    #[test]
    fn rejects_wrong_shaped_value() {
        assert!(Vec::<i64>::from_value(Value::Number(1.0)).is_err());
    }
}
