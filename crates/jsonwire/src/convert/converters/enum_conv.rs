//! The built-in enum converter (`spec.md` §4.4): serializes as the
//! variant's declared name, falling back to the underlying numeric
//! discriminant on read when the name doesn't match (mirroring the
//! permissive "accept either form" behavior System.Text.Json-style enum
//! converters default to).
//!
//! There is no `enum` keyword reflection in Rust, so a caller builds an
//! [`EnumInfo<T>`] by hand, the same way a [`super::super::descriptor::ClassInfo`]
//! is hand-built for structs.
use alloc::vec::Vec;

use crate::error::ConvertError;
use crate::path::JsonPath;
use crate::value::Value;

pub struct EnumInfo<T> {
    variants: Vec<(&'static str, T, i64)>,
}

impl<T: Clone + PartialEq> EnumInfo<T> {
    #[must_use]
    pub fn new(variants: Vec<(&'static str, T, i64)>) -> Self {
        Self { variants }
    }

    #[must_use]
    pub fn to_value(&self, variant: &T) -> Value {
        self.variants
            .iter()
            .find(|(_, v, _)| v == variant)
            .map_or(Value::Null, |(name, ..)| Value::String((*name).into()))
    }

    /// # Errors
    /// Returns [`ConvertError::Conversion`] if `value` is neither a known
    /// variant name nor a known discriminant.
    pub fn from_value(&self, value: &Value) -> Result<T, ConvertError> {
        match value {
            Value::String(name) => self
                .variants
                .iter()
                .find(|(n, ..)| *n == name.as_str())
                .map(|(_, v, _)| v.clone())
                .ok_or_else(|| ConvertError::Conversion {
                    message: alloc::format!("unknown enum variant `{name}`"),
                    path: JsonPath::root(),
                }),
            Value::Number(n) => {
                #[allow(clippy::cast_possible_truncation)]
                let discriminant = *n as i64;
                self.variants
                    .iter()
                    .find(|(_, _, d)| *d == discriminant)
                    .map(|(_, v, _)| v.clone())
                    .ok_or_else(|| ConvertError::Conversion {
                        message: alloc::format!("unknown enum discriminant `{discriminant}`"),
                        path: JsonPath::root(),
                    })
            }
            other => Err(ConvertError::Conversion {
                message: alloc::format!("expected an enum name or discriminant, found {other}"),
                path: JsonPath::root(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Color {
        Red,
        Green,
        Blue,
    }

    fn color_enum_info() -> EnumInfo<Color> {
        EnumInfo::new(alloc::vec![
            ("Red", Color::Red, 0),
            ("Green", Color::Green, 1),
            ("Blue", Color::Blue, 2),
        ])
    }

    #[test]
    fn encodes_as_name() {
        let info = color_enum_info();
        assert_eq!(info.to_value(&Color::Green), Value::String("Green".into()));
    }

    #[test]
    fn decodes_from_name() {
        let info = color_enum_info();
        assert_eq!(info.from_value(&Value::String("Blue".into())).unwrap(), Color::Blue);
    }

    #[test]
    fn decodes_from_numeric_discriminant() {
        let info = color_enum_info();
        assert_eq!(info.from_value(&Value::Number(1.0)).unwrap(), Color::Green);
    }

    #[test]
    fn rejects_unknown_name() {
        let info = color_enum_info();
        assert!(info.from_value(&Value::String("Purple".into())).is_err());
    }
}
