//! Address Decomposition Tests.
//!
//! Verifies tag / set-index / offset extraction for ordinary geometries and
//! for the `s = 0`, `b = 0` and full-width edge cases.

use csim_core::common::{Address, DecodedAddr};
use rstest::rstest;

use crate::common::harness::geometry;

#[rstest]
#[case::one_set_no_offset(0, 0, 0x8, 0x8, 0, 0)]
#[case::two_sets_two_byte_blocks(1, 1, 0xa, 0x2, 1, 0)]
#[case::sixteen_sets(4, 4, 0x110, 0x1, 1, 0)]
#[case::offset_kept(4, 4, 0x21f, 0x2, 1, 0xf)]
#[case::set_bits_only(3, 0, 0b1010_1101, 0b1_0101, 0b101, 0)]
#[case::block_bits_only(0, 3, 0b1010_1101, 0b1_0101, 0, 0b101)]
fn decodes_fields(
    #[case] s: u32,
    #[case] b: u32,
    #[case] addr: u64,
    #[case] tag: u64,
    #[case] set_index: usize,
    #[case] offset: u64,
) {
    let g = geometry(s, 1, b);
    assert_eq!(
        Address::new(addr).decode(&g),
        DecodedAddr {
            tag,
            set_index,
            offset
        }
    );
}

/// The set index never reaches `S`, whatever the high bits contain.
#[test]
fn set_index_always_in_range() {
    let g = geometry(3, 1, 2);
    for addr in [0, u64::MAX, 0xdead_beef, 0x7ff0_0005_b8, 1 << 63] {
        assert!(Address::new(addr).set_index(&g) < g.num_sets());
    }
}

/// With `s + b = 64` the tag is empty and nothing overflows.
#[test]
fn full_width_geometry_has_zero_tag() {
    let g = geometry(8, 1, 56);
    let a = Address::new(u64::MAX);
    assert_eq!(a.tag(&g), 0);
    assert_eq!(a.set_index(&g), 0xff);
    assert_eq!(a.offset(&g), (1u64 << 56) - 1);
}

/// An 11-hex-digit trace address keeps its high bits in the tag.
#[test]
fn wide_trace_address_fits() {
    let g = geometry(4, 1, 4);
    let a = Address::new(0x7ff_0005_b8);
    assert_eq!(a.tag(&g), 0x7ff_0005_b8 >> 8);
    assert_eq!(a.set_index(&g), 0xb);
    assert_eq!(a.offset(&g), 0x8);
}
