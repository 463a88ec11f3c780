//! Macro-generated per-scalar-type writer tests, grounded on the teacher's
//! use of `paste` to mint one test function per type in a repetitive table
//! (`examples/AaronFriel-jsonmodem`'s codegen-adjacent test modules) instead
//! of hand-writing ten near-identical bodies.
use alloc::vec::Vec;

use paste::paste;

use crate::writer::Writer;

macro_rules! scalar_writer_roundtrips_test {
    ($($write_fn:ident: $t:ty = $sample:expr => $expected:expr),* $(,)?) => {
        paste! {
            $(
                #[test]
                fn [<$write_fn _emits_the_decimal_lexeme>]() {
                    let mut buf: Vec<u8> = Vec::new();
                    let mut writer = Writer::new(&mut buf);
                    writer.$write_fn($sample).unwrap();
                    assert_eq!(core::str::from_utf8(&buf).unwrap(), $expected);
                }
            )*
        }
    };
}

scalar_writer_roundtrips_test! {
    write_i8: i8 = -12i8 => "-12",
    write_i16: i16 = -1234i16 => "-1234",
    write_i32: i32 = -123_456i32 => "-123456",
    write_i64: i64 = -123_456_789_012i64 => "-123456789012",
    write_i128: i128 = -1i128 => "-1",
    write_u8: u8 = 255u8 => "255",
    write_u16: u16 = 65_535u16 => "65535",
    write_u32: u32 = 4_294_967_295u32 => "4294967295",
    write_u64: u64 = 18_446_744_073_709_551_615u64 => "18446744073709551615",
    write_u128: u128 = 340_282_366_920_938_463_463_374_607_431_768_211_455u128 => "340282366920938463463374607431768211455",
}
