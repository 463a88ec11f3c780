//! The converter cache (`spec.md` C4).
//!
//! `spec.md` §4.4 describes a precedence chain: cached converter for this
//! exact type, then user-registered converters (first `CanConvert` match
//! wins), then a declaratively-attached converter, then the built-in
//! simple/nullable/enum/key-value-pair/collection converters, then the
//! object-fallback converter. Without reflection or a derive macro, the
//! "user-registered"/"declarative" tiers collapse into the same mechanism:
//! a caller builds a [`ClassInfo<T>`] by hand (see [`super::descriptor`])
//! and registers it once; every later (de)serialize of `T` hits the cache
//! instead of rebuilding the name-matching tables.
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::convert::descriptor::ClassInfo;
use crate::error::ConvertError;
use crate::value::Value;

/// A process-wide (or caller-owned) cache of [`ClassInfo`] instances keyed
/// by [`TypeId`], mirroring the teacher's preference for building
/// expensive per-type state once and reusing it.
#[derive(Default)]
pub struct ConverterRegistry {
    class_infos: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl ConverterRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `class_info` as the converter for `T`, replacing any
    /// previously registered one.
    pub fn register<T: 'static + Send + Sync>(&self, class_info: ClassInfo<T>) {
        let mut guard = self.class_infos.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.insert(TypeId::of::<T>(), Arc::new(class_info));
    }

    /// Looks up the registered [`ClassInfo`] for `T`, if any.
    #[must_use]
    pub fn get<T: 'static + Send + Sync>(&self) -> Option<Arc<ClassInfo<T>>> {
        let guard = self.class_infos.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard
            .get(&TypeId::of::<T>())
            .cloned()
            .and_then(|entry| entry.downcast::<ClassInfo<T>>().ok())
    }

    /// `true` if a converter for `T` is already cached.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        let guard = self.class_infos.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        guard.contains_key(&TypeId::of::<T>())
    }

    /// Materializes a `T` from `value` using the cached converter for `T`,
    /// the entry point for callers who don't have a `ClassInfo<T>` in hand
    /// and rely purely on whatever was registered (`spec.md` §4.4's
    /// precedence chain terminating in "no converter applies").
    ///
    /// # Errors
    /// Returns [`ConvertError::NoConverter`] if nothing is registered for
    /// `T`, or whatever [`ConvertError`] the property setters raise.
    pub fn from_value<T: 'static + Send + Sync>(&self, value: Value) -> Result<T, ConvertError> {
        let class_info = self.get::<T>().ok_or(ConvertError::NoConverter)?;
        class_info.from_value(value)
    }

    /// Converts `instance` to [`Value`] using the cached converter for `T`.
    ///
    /// # Errors
    /// Returns [`ConvertError::NoConverter`] if nothing is registered for
    /// `T`.
    pub fn to_value<T: 'static + Send + Sync>(&self, instance: &T) -> Result<Value, ConvertError> {
        let class_info = self.get::<T>().ok_or(ConvertError::NoConverter)?;
        Ok(class_info.to_value(instance))
    }
}
