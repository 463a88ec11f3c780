//! The nullable converter: `Option<T>` maps `null` to `None` and otherwise
//! delegates to `T`'s own converter, per `spec.md` §4.4.
use crate::error::ConvertError;
use crate::value::Value;

use super::{FromValue, IntoValue};

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        if value.is_null() {
            Ok(None)
        } else {
            Ok(Some(T::from_value(value)?))
        }
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn into_value(self) -> Value {
        match self {
            Some(v) => v.into_value(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_maps_to_none() {
        assert_eq!(Option::<i64>::from_value(Value::Null).unwrap(), None);
    }

    #[test]
    fn value_maps_to_some() {
        assert_eq!(Option::<i64>::from_value(Value::Number(3.0)).unwrap(), Some(3));
    }

    #[test]
    fn none_encodes_as_null() {
        assert_eq!(None::<i64>.into_value(), Value::Null);
    }
}
