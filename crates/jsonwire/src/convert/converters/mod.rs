//! Built-in converters, applied in the fixed fallback order `spec.md`
//! §4.4 specifies once no cached/user/declarative converter claims a type:
//! simple scalars, then `Option<T>` (nullable), then enums, then
//! `(K, V)` pairs, then collections, then the object fallback.
pub mod collection;
pub mod enum_conv;
pub mod kvp;
pub mod nullable;
pub mod object;
pub mod simple;

pub use enum_conv::EnumInfo;

use crate::error::ConvertError;
use crate::value::Value;

/// Reads a typed value out of a materialized [`Value`].
pub trait FromValue: Sized {
    /// # Errors
    /// Returns [`ConvertError::Conversion`] when `value` is not shaped the
    /// way `Self` expects.
    fn from_value(value: Value) -> Result<Self, ConvertError>;
}

/// Writes a typed value into a [`Value`].
pub trait IntoValue {
    fn into_value(self) -> Value;
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ConvertError> {
        Ok(value)
    }
}

impl IntoValue for Value {
    fn into_value(self) -> Value {
        self
    }
}
