//! Typed property mapping on top of a materialized [`Value`] tree
//! (`spec.md` C5).
//!
//! `spec.md`'s `ClassInfo`/`PropertyInfo` pairing assumes a runtime that can
//! reflect over arbitrary types; Rust has no such reflection and a derive
//! macro is out of scope here, so a [`ClassInfo<T>`] is hand-built from a
//! list of closures that read/write a [`Value`] on `T`'s behalf — `Value`
//! stands in for the "untyped box" a reflective runtime would otherwise
//! hand back. The two-tier name cache (a small ring of recently matched
//! names over a binary-searched sorted array) is `spec.md` §4.5's own
//! design, not adapted from the teacher, which has no property model at
//! all.
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use crate::error::ConvertError;
use crate::value::{Map, Value};

const RING_SIZE: usize = 8;

#[derive(Clone, Copy)]
struct RingEntry {
    hash: u64,
    len: usize,
    index: usize,
}

/// Recently-matched-name ring backed by a binary search over a
/// sorted-by-name index array, per `spec.md` §4.5.
struct NameCache {
    ring: Mutex<[Option<RingEntry>; RING_SIZE]>,
    next_slot: core::sync::atomic::AtomicUsize,
}

impl Default for NameCache {
    fn default() -> Self {
        Self {
            ring: Mutex::new([None; RING_SIZE]),
            next_slot: core::sync::atomic::AtomicUsize::new(0),
        }
    }
}

impl NameCache {
    fn lookup(&self, name: &str) -> Option<usize> {
        let hash = hash_name(name);
        let len = name.len();
        let ring = self.ring.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        ring.iter()
            .flatten()
            .find(|entry| entry.hash == hash && entry.len == len)
            .map(|entry| entry.index)
    }

    fn promote(&self, name: &str, index: usize) {
        let entry = RingEntry {
            hash: hash_name(name),
            len: name.len(),
            index,
        };
        let slot = self.next_slot.fetch_add(1, core::sync::atomic::Ordering::Relaxed) % RING_SIZE;
        let mut ring = self.ring.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        ring[slot] = Some(entry);
    }
}

fn hash_name(name: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

/// One mapped property of `T`: a name plus a get/set pair expressed in
/// terms of [`Value`].
pub struct PropertyInfo<T> {
    pub name: &'static str,
    get: Box<dyn Fn(&T) -> Value + Send + Sync>,
    set: Box<dyn Fn(&mut T, Value) -> Result<(), ConvertError> + Send + Sync>,
}

impl<T> PropertyInfo<T> {
    pub fn new(
        name: &'static str,
        get: impl Fn(&T) -> Value + Send + Sync + 'static,
        set: impl Fn(&mut T, Value) -> Result<(), ConvertError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name,
            get: Box::new(get),
            set: Box::new(set),
        }
    }
}

/// A hand-built reflective surface for `T`, built once and shared (via
/// [`super::registry::ConverterRegistry`]) across every (de)serialize call
/// for that type.
pub struct ClassInfo<T> {
    properties: Vec<PropertyInfo<T>>,
    sorted_by_name: Vec<usize>,
    /// Index of the property (if any) that absorbs member names with no
    /// matching [`PropertyInfo`], per `spec.md` §4.5's data-extension member.
    extension_member: Option<usize>,
    factory: Box<dyn Fn() -> T + Send + Sync>,
    name_cache: NameCache,
}

impl<T> ClassInfo<T> {
    pub fn new(
        factory: impl Fn() -> T + Send + Sync + 'static,
        properties: Vec<PropertyInfo<T>>,
    ) -> Self {
        let mut sorted_by_name: Vec<usize> = (0..properties.len()).collect();
        sorted_by_name.sort_by_key(|&i| properties[i].name);
        Self {
            properties,
            sorted_by_name,
            extension_member: None,
            factory: Box::new(factory),
            name_cache: NameCache::default(),
        }
    }

    #[must_use]
    pub fn with_extension_member(mut self, name: &'static str) -> Self {
        self.extension_member = self.properties.iter().position(|p| p.name == name);
        self
    }

    fn property_index(&self, name: &str) -> Option<usize> {
        if let Some(index) = self.name_cache.lookup(name) {
            if self.properties[index].name == name {
                return Some(index);
            }
        }
        let pos = self
            .sorted_by_name
            .binary_search_by(|&i| self.properties[i].name.cmp(name))
            .ok()?;
        let index = self.sorted_by_name[pos];
        self.name_cache.promote(name, index);
        Some(index)
    }

    /// Reads every mapped property off `instance` into a [`Value::Object`].
    #[must_use]
    pub fn to_value(&self, instance: &T) -> Value {
        let mut map = Map::new();
        for (i, prop) in self.properties.iter().enumerate() {
            if Some(i) == self.extension_member {
                continue;
            }
            map.insert(prop.name.into(), (prop.get)(instance));
        }
        if let Some(ext) = self.extension_member {
            if let Value::Object(extra) = (self.properties[ext].get)(instance) {
                for (k, v) in extra {
                    map.insert(k, v);
                }
            }
        }
        Value::Object(map)
    }

    /// Builds a fresh `T` via the factory and applies every member of
    /// `value` onto it. Members with no matching property fall through to
    /// the extension member, if one is configured, and are otherwise
    /// silently dropped (matching the teacher's and `spec.md`'s own
    /// "unknown members are ignored by default" posture).
    ///
    /// # Errors
    /// Propagates whatever [`ConvertError`] a property's setter raises, and
    /// raises [`ConvertError::Conversion`] when `value` is not an object.
    pub fn from_value(&self, value: Value) -> Result<T, ConvertError> {
        let Value::Object(map) = value else {
            return Err(ConvertError::Conversion {
                message: "expected a JSON object".into(),
                path: crate::path::JsonPath::root(),
            });
        };
        let mut instance = (self.factory)();
        let mut leftover = Map::new();
        for (key, v) in map {
            match self.property_index(&key) {
                Some(index) if Some(index) != self.extension_member => {
                    (self.properties[index].set)(&mut instance, v)?;
                }
                _ => {
                    leftover.insert(key, v);
                }
            }
        }
        if let Some(ext) = self.extension_member {
            (self.properties[ext].set)(&mut instance, Value::Object(leftover))?;
        }
        Ok(instance)
    }
}
