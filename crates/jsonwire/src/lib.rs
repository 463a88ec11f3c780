//! A byte-span JSON reader and writer with a resumable, chunk-driven
//! converter engine.
//!
//! `jsonwire` is organized around three tightly coupled pieces:
//!
//! - [`reader`] — a pull-based [`Reader`] that tokenizes a (possibly
//!   incomplete) UTF-8 byte span without allocating for primitive values.
//! - [`writer`] — a [`Writer`] that emits syntactically valid JSON into a
//!   growable byte sink, with optional pretty-printing and structural
//!   validation.
//! - [`convert`] — a converter registry and resumable frame stack that maps
//!   typed values to and from JSON, pausing at any token boundary so a
//!   single logical (de)serialize can be driven across multiple input
//!   chunks.
//!
//! The reader/writer/scanner core has no dependency on an allocator-backed
//! runtime beyond `alloc`; the converter registry's process-wide cache (see
//! [`convert::registry`]) requires `std` and is gated behind the `std`
//! feature, which is on by default.
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::module_name_repetitions)]
extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

mod error;
mod path;
mod scanner;

pub mod reader;
pub mod writer;

pub mod value;

#[cfg(feature = "std")]
pub mod convert;

#[cfg(test)]
mod tests;

pub use error::{ConvertError, ReaderError, WriterError};
pub use path::{PathComponent, PathComponentFrom};
pub use reader::{CommentHandling, Reader, ReaderOptions, Token, TokenType};
pub use value::{Array, Map, Value};
pub use writer::{EscapeMode, FixedCapacitySink, Sink, Writer, WriterOptions};

#[cfg(feature = "std")]
pub use convert::{ConverterRegistry, SerializerOptions};

#[doc(hidden)]
pub use alloc::vec;

/// Builds a `Vec<PathComponent>` from a heterogeneous list of keys and
/// indices.
///
/// ```rust
/// extern crate alloc;
/// # use jsonwire::{path, PathComponent};
/// let p = path![0, "foo", 2];
/// assert_eq!(
///     p,
///     vec![
///         PathComponent::Index(0),
///         PathComponent::Key("foo".into()),
///         PathComponent::Index(2)
///     ]
/// );
/// ```
#[macro_export]
macro_rules! path {
    ( $( $elem:expr ),* $(,)? ) => {{
        use $crate::PathComponentFrom;
        $crate::vec![$($crate::PathComponent::from_path_component($elem)),*]
    }};
}
