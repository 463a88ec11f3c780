//! Property tests for `spec.md` §8's round-trip and chunking-equivalence
//! properties, grounded on the teacher's `tests/property_partition.rs`
//! (arbitrary `Value`, arbitrary chunk splits, reconstruct and compare).
use alloc::vec::Vec;

use quickcheck::QuickCheck;
use quickcheck_macros::quickcheck;

use crate::convert::{ValueStack, deserialize, serialize};
use crate::tests::arbitrary::ArbitraryValue;
use crate::{Reader, ReaderOptions, SerializerOptions, Value};

/// `serialize` then `deserialize` must reproduce the original value exactly.
#[quickcheck]
fn round_trip_through_serialize_and_deserialize(value: ArbitraryValue) -> bool {
    let options = SerializerOptions::default();
    let mut bytes = Vec::new();
    if serialize(&options, value.0.clone(), &mut bytes).is_err() {
        return true;
    }
    let restored: Value = match deserialize(&SerializerOptions::default(), &bytes) {
        Ok(v) => v,
        Err(_) => return false,
    };
    restored == value.0
}

/// Feeding a serialized document through [`Reader`]/[`ValueStack`] in
/// arbitrary chunk sizes must resolve to the same value as one-shot
/// deserialization.
#[test]
fn chunking_is_equivalent_to_one_shot_feed() {
    fn prop(value: ArbitraryValue, splits: Vec<u8>) -> bool {
        if splits.is_empty() {
            return true;
        }
        let options = SerializerOptions::default();
        let mut bytes = Vec::new();
        if serialize(&options, value.0.clone(), &mut bytes).is_err() {
            return true;
        }

        let mut reader = Reader::new(ReaderOptions::default());
        let mut stack = ValueStack::new();
        let mut pos = 0;
        let mut result = None;
        for split in splits.iter().cycle() {
            if pos >= bytes.len() {
                break;
            }
            let step = (usize::from(*split) % 7) + 1;
            let end = (pos + step).min(bytes.len());
            reader.feed(&bytes[pos..end]);
            pos = end;
            match stack.drive(&mut reader) {
                Ok(Some(v)) => {
                    result = Some(v);
                    break;
                }
                Ok(None) => {}
                Err(_) => return false,
            }
        }
        if result.is_none() {
            reader.finish();
            result = match stack.drive(&mut reader) {
                Ok(v) => v,
                Err(_) => return false,
            };
        }
        result == Some(value.0)
    }

    QuickCheck::new()
        .tests(200)
        .quickcheck(prop as fn(ArbitraryValue, Vec<u8>) -> bool);
}
