//! Property tests for width classification, range search and conversion

use proptest::prelude::*;
use unicode_width::UnicodeWidthChar;

use termucs_core::codepage::{self, Charset, Codepage};
use termucs_core::interval::{self, Interval};
use termucs_core::tables::{AMBIGUOUS, COMBINING, WIDE};
use termucs_core::{
    build_unicode_context, decode, encode, sequence_width, width, CellWidth, VtMode,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn is_control(point: u32) -> bool {
    (0x01..0x20).contains(&point) || (0x7F..0xA0).contains(&point)
}

fn tables() -> [(&'static str, &'static [Interval]); 3] {
    [
        ("combining", COMBINING),
        ("wide", WIDE),
        ("ambiguous", AMBIGUOUS),
    ]
}

#[test]
fn tables_are_sorted_and_disjoint() {
    for (name, table) in tables() {
        assert!(!table.is_empty(), "{} table is empty", name);
        assert!(interval::is_well_formed(table), "{} table is malformed", name);
    }
}

#[test]
fn range_search_finds_every_interval() {
    for (name, table) in tables() {
        for (index, iv) in table.iter().enumerate() {
            let mid = iv.first + (iv.last - iv.first) / 2;
            assert!(interval::contains(iv.first, table), "{} {:?}", name, iv);
            assert!(interval::contains(iv.last, table), "{} {:?}", name, iv);
            assert!(interval::contains(mid, table), "{} {:?}", name, iv);

            let touches_previous = index > 0 && table[index - 1].last + 1 == iv.first;
            if iv.first > 0 && !touches_previous {
                assert!(!interval::contains(iv.first - 1, table), "{} {:?}", name, iv);
            }
            let touches_next = table
                .get(index + 1)
                .is_some_and(|next| iv.last + 1 == next.first);
            if !touches_next {
                assert!(!interval::contains(iv.last + 1, table), "{} {:?}", name, iv);
            }
        }
    }
}

#[test]
fn documented_widths() {
    assert_eq!(width(0, false), CellWidth::Zero);
    assert_eq!(width(0x09, false), CellWidth::Invalid);
    assert_eq!(width(0x41, false), CellWidth::Narrow);
    assert_eq!(width(0x4E00, false), CellWidth::Wide);
    assert_eq!(width(0xB1, false), CellWidth::Narrow);
    assert_eq!(width(0xB1, true), CellWidth::Wide);
    assert_eq!(width(0x1160, false), CellWidth::Zero);
    assert_eq!(width(0x11A2, false), CellWidth::Zero);
    assert_eq!(sequence_width(&[0x41, 0x09, 0x42], false), None);
}

#[test]
fn agrees_with_unicode_width_on_stable_ranges() {
    let ranges = [
        (0x20u32, 0x7Eu32),
        (0xA1, 0xAC),
        (0xAE, 0xFF),
        (0x0300, 0x036F),
        (0x4E00, 0x9FA5),
        (0xAC00, 0xD7A3),
        (0xFF01, 0xFF60),
    ];
    for (first, last) in ranges {
        for point in first..=last {
            let Some(c) = char::from_u32(point) else {
                continue;
            };
            assert_eq!(
                width(point, false).columns(),
                c.width(),
                "U+{:04X} disagrees",
                point
            );
        }
    }
}

#[test]
fn latin1_round_trips_every_byte() {
    let codepage = Codepage::Named(Charset::Iso8859_1);
    for byte in 0..=255u8 {
        let decoded = decode(codepage, &[byte]);
        assert_eq!(decoded.consumed, 1);
        assert_eq!(encode(codepage, &decoded.points, None), vec![byte]);
    }
}

#[test]
fn context_build_is_idempotent_for_every_listed_codepage() {
    init_logging();
    for name in codepage::names() {
        for vt_mode in [VtMode::Unicode, VtMode::Poorman] {
            let first = build_unicode_context(Some(name), Codepage::Raw, vt_mode);
            let second = build_unicode_context(Some(name), Codepage::Raw, vt_mode);
            assert_eq!(first, second, "{} {:?}", name, vt_mode);
        }
    }
}

#[test]
fn unknown_names_resolve_to_utf8() {
    init_logging();
    assert_eq!(codepage::resolve_name(None), Codepage::Utf8);
    assert_eq!(codepage::resolve_name(Some("")), Codepage::Utf8);
    assert_eq!(codepage::resolve_name(Some("no-such-charset")), Codepage::Utf8);
}

proptest! {
    #[test]
    fn width_is_deterministic(point in any::<u32>(), ambiguous in any::<bool>()) {
        prop_assert_eq!(width(point, ambiguous), width(point, ambiguous));
    }

    #[test]
    fn only_controls_are_invalid(point in 0u32..=0x1FFF_FFFF, ambiguous in any::<bool>()) {
        let result = width(point, ambiguous);
        prop_assert_eq!(result == CellWidth::Invalid, is_control(point));
    }

    #[test]
    fn ambiguous_mode_only_widens(point in 0u32..=0x10FFFF) {
        let plain = width(point, false);
        let cjk = width(point, true);
        if plain != cjk {
            prop_assert_eq!(plain, CellWidth::Narrow);
            prop_assert_eq!(cjk, CellWidth::Wide);
        }
    }

    #[test]
    fn range_search_matches_linear_scan(point in 0u32..=0x110000) {
        for (_, table) in tables() {
            let linear = table.iter().any(|iv| iv.contains(point));
            prop_assert_eq!(interval::contains(point, table), linear);
        }
    }

    #[test]
    fn control_anywhere_invalidates_sequence(
        mut points in prop::collection::vec(0x20u32..0x7F, 0..16),
        control in 0x01u32..0x20,
        position in any::<prop::sample::Index>(),
    ) {
        let at = position.index(points.len() + 1);
        points.insert(at, control);
        prop_assert_eq!(sequence_width(&points, false), None);
    }

    #[test]
    fn utf8_decode_consumes_valid_prefix(
        text in "\\PC{0,24}",
        tail in prop::collection::vec(any::<u8>(), 0..4),
    ) {
        let mut bytes = text.as_bytes().to_vec();
        bytes.extend_from_slice(&tail);
        let decoded = decode(Codepage::Utf8, &bytes);
        prop_assert!(decoded.consumed >= text.len());
        let expected: Vec<u32> = text.chars().map(|c| c as u32).collect();
        prop_assert_eq!(&decoded.points[..expected.len()], &expected[..]);
        let reencoded = encode(Codepage::Utf8, &decoded.points, None);
        prop_assert_eq!(reencoded, bytes[..decoded.consumed].to_vec());
    }

    #[test]
    fn raw_round_trips(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let decoded = decode(Codepage::Raw, &bytes);
        prop_assert_eq!(encode(Codepage::Raw, &decoded.points, None), bytes);
    }
}
