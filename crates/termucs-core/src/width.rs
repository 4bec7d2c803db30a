//! Terminal cell width classification
//!
//! Decides how many grid columns a renderer advances for a code point.
//! The checks run in a fixed order and the first match wins; the
//! categories overlap in the underlying Unicode data, so the order is
//! part of the behaviour:
//!
//! 1. U+0000 is zero width.
//! 2. C0 controls, DEL and C1 controls are invalid.
//! 3. Anything else below U+0300 is narrow. This shadows the combining
//!    table entry for U+00AD SOFT HYPHEN, which stays narrow.
//! 4. Combining marks and format characters are zero width.
//! 5. Anything else below U+1100 is narrow.
//! 6. Hangul Jamo medial vowels and final consonants are zero width.
//! 7. East Asian Wide and Fullwidth characters are wide, the rest narrow.
//!
//! In ambiguous-wide mode a narrow result at or above U+0080 is widened
//! when the point is East Asian Ambiguous.

use crate::interval::contains;
use crate::tables::{AMBIGUOUS, COMBINING, WIDE};

/// Cell width of a single code point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellWidth {
    /// Occupies no cell (NUL, combining marks, Jamo medials/finals)
    Zero,
    /// One cell
    Narrow,
    /// Two cells
    Wide,
    /// Control character; has no width and should not be rendered
    Invalid,
}

impl CellWidth {
    /// Number of columns, or `None` for control characters
    pub const fn columns(self) -> Option<usize> {
        match self {
            Self::Zero => Some(0),
            Self::Narrow => Some(1),
            Self::Wide => Some(2),
            Self::Invalid => None,
        }
    }

    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }
}

/// Classify a code point.
///
/// `ambiguous_wide` selects the legacy CJK convention where East Asian
/// Ambiguous characters take two cells. Values above U+10FFFF are accepted
/// and fall through to narrow.
pub fn width(point: u32, ambiguous_wide: bool) -> CellWidth {
    let base = base_width(point);
    if ambiguous_wide && base == CellWidth::Narrow && point >= 0x80 && contains(point, AMBIGUOUS) {
        return CellWidth::Wide;
    }
    base
}

fn base_width(point: u32) -> CellWidth {
    // Fast path for controls and most of ISO 8859
    if point < 0x300 {
        return match point {
            0 => CellWidth::Zero,
            0x01..=0x1F | 0x7F..=0x9F => CellWidth::Invalid,
            _ => CellWidth::Narrow,
        };
    }

    if contains(point, COMBINING) {
        return CellWidth::Zero;
    }

    // Nothing below U+1100 is wide
    if point < 0x1100 {
        return CellWidth::Narrow;
    }

    if (0x1160..=0x11FF).contains(&point) {
        return CellWidth::Zero;
    }

    if contains(point, WIDE) {
        CellWidth::Wide
    } else {
        CellWidth::Narrow
    }
}

/// Total cell width of a run of code points.
///
/// A NUL element terminates the run. Returns `None` as soon as any
/// element is a control character, without reporting a partial width.
pub fn sequence_width(points: &[u32], ambiguous_wide: bool) -> Option<usize> {
    points
        .iter()
        .take_while(|&&point| point != 0)
        .try_fold(0usize, |total, &point| {
            width(point, ambiguous_wide)
                .columns()
                .map(|columns| total + columns)
        })
}

/// Total cell width of a string, see [`sequence_width`]
pub fn str_width(text: &str, ambiguous_wide: bool) -> Option<usize> {
    text.chars()
        .take_while(|&c| c != '\0')
        .try_fold(0usize, |total, c| {
            width(c as u32, ambiguous_wide)
                .columns()
                .map(|columns| total + columns)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nul_is_zero() {
        assert_eq!(width(0, false), CellWidth::Zero);
        assert_eq!(width(0, true), CellWidth::Zero);
    }

    #[test]
    fn test_controls_are_invalid() {
        for point in [0x01, 0x09, 0x0A, 0x1B, 0x1F, 0x7F, 0x80, 0x9F] {
            assert_eq!(width(point, false), CellWidth::Invalid, "U+{:04X}", point);
            assert_eq!(width(point, true), CellWidth::Invalid, "U+{:04X}", point);
        }
        assert_eq!(width(0x20, false), CellWidth::Narrow);
        assert_eq!(width(0xA0, false), CellWidth::Narrow);
    }

    #[test]
    fn test_basic_widths() {
        assert_eq!(width(0x41, false), CellWidth::Narrow);
        assert_eq!(width(0x4E00, false), CellWidth::Wide);
        assert_eq!(width(0xAC00, false), CellWidth::Wide);
        assert_eq!(width(0xFF21, false), CellWidth::Wide);
        assert_eq!(width(0x1F600, false), CellWidth::Wide);
        assert_eq!(width(0x20000, false), CellWidth::Wide);
        assert_eq!(width(0x0301, false), CellWidth::Zero);
        assert_eq!(width(0x200B, false), CellWidth::Zero);
        assert_eq!(width(0x0410, false), CellWidth::Narrow);
    }

    #[test]
    fn test_soft_hyphen_stays_narrow() {
        // In the combining table but shadowed by the fast path
        assert!(contains(0xAD, COMBINING));
        assert_eq!(width(0xAD, false), CellWidth::Narrow);
    }

    #[test]
    fn test_hangul_jamo_band() {
        assert_eq!(width(0x1100, false), CellWidth::Wide);
        assert_eq!(width(0x115F, false), CellWidth::Wide);
        assert_eq!(width(0x1160, false), CellWidth::Zero);
        assert_eq!(width(0x11A2, false), CellWidth::Zero);
        assert_eq!(width(0x11FF, false), CellWidth::Zero);
        assert_eq!(width(0x1200, false), CellWidth::Narrow);
        assert!(!contains(0x1160, COMBINING));
        assert!(!contains(0x11A2, COMBINING));
    }

    #[test]
    fn test_ambiguous_mode() {
        assert_eq!(width(0xB1, false), CellWidth::Narrow);
        assert_eq!(width(0xB1, true), CellWidth::Wide);
        assert_eq!(width(0x0391, true), CellWidth::Wide);
        // ASCII is never widened
        assert_eq!(width(0x41, true), CellWidth::Narrow);
        // Combining marks in the ambiguous table stay zero width
        assert_eq!(width(0x0300, true), CellWidth::Zero);
        // Soft hyphen is narrow in the base pass, then ambiguous
        assert_eq!(width(0xAD, true), CellWidth::Wide);
    }

    #[test]
    fn test_out_of_range_points() {
        assert_eq!(width(0x110000, false), CellWidth::Narrow);
        assert_eq!(width(0x1FFF_FFFF, true), CellWidth::Narrow);
        assert_eq!(width(u32::MAX, false), CellWidth::Narrow);
    }

    #[test]
    fn test_columns() {
        assert_eq!(CellWidth::Zero.columns(), Some(0));
        assert_eq!(CellWidth::Narrow.columns(), Some(1));
        assert_eq!(CellWidth::Wide.columns(), Some(2));
        assert_eq!(CellWidth::Invalid.columns(), None);
        assert!(CellWidth::Wide.is_wide());
        assert!(!CellWidth::Narrow.is_wide());
    }

    #[test]
    fn test_sequence_width() {
        assert_eq!(sequence_width(&[], false), Some(0));
        assert_eq!(sequence_width(&[0x41, 0x4E00, 0x0301], false), Some(3));
        assert_eq!(sequence_width(&[0xB1, 0xB1], true), Some(4));
    }

    #[test]
    fn test_sequence_width_control_short_circuits() {
        assert_eq!(sequence_width(&[0x41, 0x09, 0x42], false), None);
        assert_eq!(sequence_width(&[0x09, 0x41, 0x42], false), None);
        assert_eq!(sequence_width(&[0x41, 0x42, 0x09], false), None);
    }

    #[test]
    fn test_sequence_width_stops_at_nul() {
        assert_eq!(sequence_width(&[0x41, 0, 0x09], false), Some(1));
    }

    #[test]
    fn test_str_width() {
        assert_eq!(str_width("hello", false), Some(5));
        assert_eq!(str_width("日本語", false), Some(6));
        assert_eq!(str_width("e\u{301}", false), Some(1));
        assert_eq!(str_width("a\tb", false), None);
        assert_eq!(str_width("±", true), Some(2));
    }
}
