//! The built-in simple converter: scalars, strings, and the `Date`/`Guid`
//! string encodings `spec.md` §4.4 calls out by name.
//!
//! Numbers round-trip through `f64` exactly like [`crate::value::Value`]
//! itself; the teacher never had a typed layer at all; `Date`/`Guid`
//! formatting is grounded on `other_examples`' `facet-rs-facet` (which
//! reaches for `time`/`uuid` the same way) rather than on the teacher.
use alloc::string::String;

use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use uuid::Uuid;

use crate::error::ConvertError;
use crate::path::JsonPath;
use crate::value::Value;

use super::{FromValue, IntoValue};

macro_rules! impl_numeric {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FromValue for $t {
                fn from_value(value: Value) -> Result<Self, ConvertError> {
                    match value {
                        Value::Number(n) => {
                            #[allow(clippy::cast_possible_truncation)]
                            Ok(n as $t)
                        }
                        other => Err(ConvertError::Conversion {
                            message: alloc::format!("expected a number, found {other}"),
                            path: JsonPath::root(),
                        }),
                    }
                }
            }

            impl IntoValue for $t {
                fn into_value(self) -> Value {
                    #[allow(clippy::cast_precision_loss)]
                    Value::Number(self as f64)
                }
            }
        )+
    };
}

impl_numeric!(i8, i16, i32, i64, i128, u8, u16, u32, u64, u128, f32, f64);

impl FromValue for bool {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(ConvertError::Conversion {
                message: alloc::format!("expected a boolean, found {other}"),
                path: JsonPath::root(),
            }),
        }
    }
}

impl IntoValue for bool {
    fn into_value(self) -> Value {
        Value::Boolean(self)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        match value {
            Value::String(s) => Ok(s),
            other => Err(ConvertError::Conversion {
                message: alloc::format!("expected a string, found {other}"),
                path: JsonPath::root(),
            }),
        }
    }
}

impl IntoValue for String {
    fn into_value(self) -> Value {
        Value::String(self)
    }
}

/// Encodes as an RFC 3339 timestamp string, e.g. `2024-01-02T03:04:05Z`.
impl FromValue for OffsetDateTime {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::String(s) = value else {
            return Err(ConvertError::Conversion {
                message: "expected an RFC 3339 date-time string".into(),
                path: JsonPath::root(),
            });
        };
        OffsetDateTime::parse(&s, &Rfc3339).map_err(|e| ConvertError::Conversion {
            message: alloc::format!("invalid date-time: {e}"),
            path: JsonPath::root(),
        })
    }
}

impl IntoValue for OffsetDateTime {
    fn into_value(self) -> Value {
        Value::String(self.format(&Rfc3339).unwrap_or_default())
    }
}

/// Encodes as a hyphenated GUID string, e.g.
/// `67e55044-10b1-426f-9247-bb680e5fe0c8`.
impl FromValue for Uuid {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        let Value::String(s) = value else {
            return Err(ConvertError::Conversion {
                message: "expected a GUID string".into(),
                path: JsonPath::root(),
            });
        };
        Uuid::parse_str(&s).map_err(|e| ConvertError::Conversion {
            message: alloc::format!("invalid GUID: {e}"),
            path: JsonPath::root(),
        })
    }
}

impl IntoValue for Uuid {
    fn into_value(self) -> Value {
        Value::String(self.hyphenated().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_round_trips() {
        assert_eq!(i64::from_value(42i64.into_value()).unwrap(), 42);
        assert!((f64::from_value(1.5f64.into_value()).unwrap() - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn string_round_trips() {
        let s: String = "hi".into();
        assert_eq!(String::from_value(s.clone().into_value()).unwrap(), s);
    }

    #[test]
    fn guid_round_trips_through_hyphenated_string() {
        let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
        let value = id.into_value();
        assert_eq!(value, Value::String("67e55044-10b1-426f-9247-bb680e5fe0c8".into()));
        assert_eq!(Uuid::from_value(value).unwrap(), id);
    }

    #[test]
    fn date_time_round_trips_through_rfc3339() {
        let dt = OffsetDateTime::parse("2024-01-02T03:04:05Z", &Rfc3339).unwrap();
        let value = dt.into_value();
        assert_eq!(OffsetDateTime::from_value(value).unwrap(), dt);
    }

    #[test]
    fn rejects_wrong_shaped_value() {
        assert!(bool::from_value(Value::Number(1.0)).is_err());
    }
}
