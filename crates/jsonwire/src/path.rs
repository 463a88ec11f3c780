//! A JSON-Path-like location used to annotate diagnostics (`spec.md` C7).
//!
//! A [`PathComponent`] is either a key into an object or an index into an
//! array; a [`JsonPath`] is simply a sequence of these, root first.
use alloc::{
    string::{String, ToString},
    vec::Vec,
};
use core::fmt;

/// A single step in a [`JsonPath`]: a key into an object, or an index into
/// an array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathComponent {
    Key(String),
    Index(usize),
}

impl PathComponent {
    #[must_use]
    pub fn as_index(&self) -> Option<&usize> {
        if let Self::Index(v) = self { Some(v) } else { None }
    }

    #[must_use]
    pub fn as_key(&self) -> Option<&String> {
        if let Self::Key(v) = self { Some(v) } else { None }
    }
}

macro_rules! impl_from_int_for_pathcomponent {
    ($($t:ty),*) => {
        $(
            impl From<$t> for PathComponent {
                fn from(i: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(i as usize)
                }
            }
        )*
    };
}
impl_from_int_for_pathcomponent!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);

impl From<&str> for PathComponent {
    fn from(s: &str) -> Self {
        Self::Key(s.to_string())
    }
}

impl From<String> for PathComponent {
    fn from(s: String) -> Self {
        Self::Key(s)
    }
}

/// Helper trait backing the [`crate::path!`] macro, so it can accept a
/// heterogeneous list of keys and indices.
#[doc(hidden)]
pub trait PathComponentFrom<T> {
    fn from_path_component(value: T) -> PathComponent;
}

macro_rules! impl_integer_as_path_component {
    ($($t:ty),+) => {
        $(
            impl PathComponentFrom<$t> for PathComponent {
                fn from_path_component(value: $t) -> Self {
                    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                    PathComponent::Index(value as usize)
                }
            }
        )+
    };
}
impl_integer_as_path_component!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PathComponentFrom<&str> for PathComponent {
    fn from_path_component(value: &str) -> Self {
        PathComponent::Key(value.to_string())
    }
}

impl PathComponentFrom<String> for PathComponent {
    fn from_path_component(value: String) -> Self {
        PathComponent::Key(value)
    }
}

/// A location within a JSON document, root first.
///
/// Rendered for diagnostics as `$.foo.bar[3].baz`, matching `spec.md` §6/§8
/// (scenario S4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JsonPath(pub Vec<PathComponent>);

impl JsonPath {
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, component: PathComponent) {
        self.0.push(component);
    }

    pub fn pop(&mut self) -> Option<PathComponent> {
        self.0.pop()
    }

    #[must_use]
    pub fn components(&self) -> &[PathComponent] {
        &self.0
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for component in &self.0 {
            match component {
                PathComponent::Key(k) => write!(f, ".{k}")?,
                PathComponent::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

impl From<Vec<PathComponent>> for JsonPath {
    fn from(v: Vec<PathComponent>) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::*;

    #[test]
    fn renders_mixed_path() {
        let path = JsonPath(alloc::vec![
            PathComponent::Key("foo".into()),
            PathComponent::Key("bar".into()),
            PathComponent::Index(3),
            PathComponent::Key("baz".into()),
        ]);
        assert_eq!(path.to_string(), "$.foo.bar[3].baz");
    }

    #[test]
    fn root_path_is_dollar() {
        assert_eq!(JsonPath::root().to_string(), "$");
    }
}
