//! Table-driven good/bad reader inputs (`spec.md` §8, scenarios S1-S6),
//! grounded on the teacher's own use of `#[rstest]` in `value_zipper.rs` to
//! replace a hand-rolled loop of `(input, expected)` pairs.
use rstest::rstest;

use crate::convert::{SerializerOptions, deserialize};
use crate::Value;

#[rstest]
#[case::flat_object(br#"{"a":1,"b":"x"}"#)]
#[case::nested_array(b"[1,[2,3],null]")]
#[case::scientific_number(b"[1e3,-2.5e-2]")]
#[case::unicode_escape(br#""é""#)]
#[case::deeply_nested_within_limit(b"[[[[[[[1]]]]]]]")]
fn accepts_well_formed_documents(#[case] input: &[u8]) {
    let _: Value = deserialize(&SerializerOptions::default(), input).unwrap();
}

#[rstest]
#[case::leading_zero(b"01")]
#[case::trailing_content(b"{}xyz")]
#[case::unterminated_string(br#""abc"#)]
#[case::mismatched_bracket(b"[1}")]
#[case::bare_property_name(b"{a:1}")]
#[case::trailing_comma_by_default(b"[1,2,]")]
fn rejects_malformed_documents(#[case] input: &[u8]) {
    let result: Result<Value, _> = deserialize(&SerializerOptions::default(), input);
    assert!(result.is_err(), "expected {:?} to be rejected", core::str::from_utf8(input));
}
