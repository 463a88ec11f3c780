//! `quickcheck::Arbitrary` for [`Value`], grounded on the teacher's own
//! `tests/arbitrary.rs` (depth-bounded recursive generation, a dedicated
//! finite-float wrapper so NaN/Infinity never reach a property test that
//! assumes round-trippable numbers).
use alloc::string::String;
use alloc::vec::Vec;

use quickcheck::{Arbitrary, Gen};

use crate::value::Map;
use crate::Value;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FiniteNumber(pub f64);

impl Arbitrary for FiniteNumber {
    fn arbitrary(g: &mut Gen) -> Self {
        let mut value = f64::arbitrary(g);
        while !value.is_finite() {
            value = f64::arbitrary(g);
        }
        Self(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ArbitraryValue(pub Value);

impl Arbitrary for ArbitraryValue {
    fn arbitrary(g: &mut Gen) -> Self {
        fn gen_val(g: &mut Gen, depth: usize) -> Value {
            if depth == 0 {
                match usize::arbitrary(g) % 4 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Number(FiniteNumber::arbitrary(g).0),
                    _ => Value::String(String::arbitrary(g)),
                }
            } else {
                match usize::arbitrary(g) % 6 {
                    0 => Value::Null,
                    1 => Value::Boolean(bool::arbitrary(g)),
                    2 => Value::Number(FiniteNumber::arbitrary(g).0),
                    3 => Value::String(String::arbitrary(g)),
                    4 => {
                        let len = usize::arbitrary(g) % 3;
                        let mut items = Vec::new();
                        for _ in 0..len {
                            items.push(gen_val(g, depth - 1));
                        }
                        Value::Array(items)
                    }
                    _ => {
                        let len = usize::arbitrary(g) % 3;
                        let mut map = Map::new();
                        for _ in 0..len {
                            map.insert(String::arbitrary(g), gen_val(g, depth - 1));
                        }
                        Value::Object(map)
                    }
                }
            }
        }

        let depth = usize::arbitrary(g) % 3;
        Self(gen_val(g, depth))
    }
}
