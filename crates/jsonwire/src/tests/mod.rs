//! Cross-cutting tests that exercise the reader/writer/converter trio
//! together, kept separate from the per-module `#[cfg(test)]` blocks the
//! same way the teacher splits `src/tests/*` from inline unit tests.
mod arbitrary;
mod property_roundtrip;
mod scalar_writer_names;
mod table_driven;
