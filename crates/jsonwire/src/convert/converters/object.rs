//! The built-in object-fallback converter (`spec.md` §4.4's last tier):
//! maps a type onto a JSON object via its registered
//! [`ClassInfo`](crate::convert::descriptor::ClassInfo).
use crate::convert::descriptor::ClassInfo;
use crate::error::ConvertError;
use crate::value::Value;

/// Serializes `instance` using `class_info`'s property table.
#[must_use]
pub fn to_value<T>(instance: &T, class_info: &ClassInfo<T>) -> Value {
    class_info.to_value(instance)
}

/// Builds a `T` from `value` using `class_info`'s property table.
///
/// # Errors
/// Propagates whatever [`ConvertError`] a property setter raises, and
/// raises [`ConvertError::Conversion`] when `value` is not an object.
pub fn from_value<T>(value: Value, class_info: &ClassInfo<T>) -> Result<T, ConvertError> {
    class_info.from_value(value)
}
