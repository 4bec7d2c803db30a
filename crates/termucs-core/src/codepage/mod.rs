//! Codepage identifiers and the name registry
//!
//! A line codepage is one of three things: UTF-8, raw passthrough onto the
//! font's own encoding, or one of the table-driven single-byte charsets.
//! The registry maps locale-style names onto these and back, and drives
//! the selection list shown by configuration UIs.

pub mod sbcs;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Display name of the raw passthrough pseudo-codepage
pub const FONT_ENCODING_NAME: &str = "Use font encoding";

/// Errors from strict codepage lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodepageError {
    #[error("Unknown codepage name: {0:?}")]
    UnknownName(String),

    #[error("Unknown codepage id: {0}")]
    UnknownId(u32),
}

/// Table-driven single-byte charsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Iso8859_1,
    Iso8859_2,
    Iso8859_5,
    Iso8859_15,
    Koi8R,
    Koi8U,
    Cp437,
    Cp850,
    Cp866,
    Cp1251,
    Cp1252,
}

impl Charset {
    /// All charsets, in selection-list order
    pub const ALL: [Charset; 11] = [
        Charset::Iso8859_1,
        Charset::Iso8859_2,
        Charset::Iso8859_5,
        Charset::Iso8859_15,
        Charset::Koi8R,
        Charset::Koi8U,
        Charset::Cp437,
        Charset::Cp850,
        Charset::Cp866,
        Charset::Cp1251,
        Charset::Cp1252,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Iso8859_1 => "ISO-8859-1",
            Self::Iso8859_2 => "ISO-8859-2",
            Self::Iso8859_5 => "ISO-8859-5",
            Self::Iso8859_15 => "ISO-8859-15",
            Self::Koi8R => "KOI8-R",
            Self::Koi8U => "KOI8-U",
            Self::Cp437 => "CP437",
            Self::Cp850 => "CP850",
            Self::Cp866 => "CP866",
            Self::Cp1251 => "CP1251",
            Self::Cp1252 => "CP1252",
        }
    }

    /// Windows codepage number
    pub const fn id(self) -> u32 {
        match self {
            Self::Iso8859_1 => 28591,
            Self::Iso8859_2 => 28592,
            Self::Iso8859_5 => 28595,
            Self::Iso8859_15 => 28605,
            Self::Koi8R => 20866,
            Self::Koi8U => 21866,
            Self::Cp437 => 437,
            Self::Cp850 => 850,
            Self::Cp866 => 866,
            Self::Cp1251 => 1251,
            Self::Cp1252 => 1252,
        }
    }

    /// Map a byte to Unicode, `None` if the byte is unassigned
    pub fn to_unicode(self, byte: u8) -> Option<u32> {
        if byte < 0x80 {
            return Some(byte as u32);
        }
        let entry = match self.high_half() {
            Some(table) => table[(byte - 0x80) as usize],
            // ISO-8859-1 is the first 256 code points
            None => byte as u16,
        };
        (entry != 0).then_some(entry as u32)
    }

    /// Map a code point back to a byte, `None` if unrepresentable
    pub fn from_unicode(self, point: u32) -> Option<u8> {
        if point < 0x80 {
            return Some(point as u8);
        }
        match self.high_half() {
            Some(table) => table
                .iter()
                .position(|&entry| entry != 0 && entry as u32 == point)
                .map(|index| 0x80 + index as u8),
            None => u8::try_from(point).ok(),
        }
    }

    fn high_half(self) -> Option<&'static [u16; 128]> {
        match self {
            Self::Iso8859_1 => None,
            Self::Iso8859_2 => Some(&sbcs::ISO_8859_2),
            Self::Iso8859_5 => Some(&sbcs::ISO_8859_5),
            Self::Iso8859_15 => Some(&sbcs::ISO_8859_15),
            Self::Koi8R => Some(&sbcs::KOI8_R),
            Self::Koi8U => Some(&sbcs::KOI8_U),
            Self::Cp437 => Some(&sbcs::CP437),
            Self::Cp850 => Some(&sbcs::CP850),
            Self::Cp866 => Some(&sbcs::CP866),
            Self::Cp1251 => Some(&sbcs::CP1251),
            Self::Cp1252 => Some(&sbcs::CP1252),
        }
    }
}

/// A line codepage.
///
/// Closed over exactly three cases; conversion dispatches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Codepage {
    /// UTF-8 multi-byte encoding
    Utf8,
    /// No translation: bytes map 1:1 onto the private direct-to-font range
    Raw,
    /// A table-driven single-byte charset
    Named(Charset),
}

impl Default for Codepage {
    fn default() -> Self {
        Self::Utf8
    }
}

impl Codepage {
    /// Numeric id of the UTF-8 codepage
    pub const UTF8_ID: u32 = 65001;
    /// Numeric id of the raw passthrough sentinel
    pub const RAW_ID: u32 = 0;

    pub const fn id(self) -> u32 {
        match self {
            Self::Utf8 => Self::UTF8_ID,
            Self::Raw => Self::RAW_ID,
            Self::Named(charset) => charset.id(),
        }
    }

    pub fn from_id(id: u32) -> Result<Self, CodepageError> {
        match id {
            Self::UTF8_ID => Ok(Self::Utf8),
            Self::RAW_ID => Ok(Self::Raw),
            _ => Charset::ALL
                .iter()
                .find(|charset| charset.id() == id)
                .map(|&charset| Self::Named(charset))
                .ok_or(CodepageError::UnknownId(id)),
        }
    }

    /// Display name; the raw sentinel reads as "Use font encoding"
    pub const fn name(self) -> &'static str {
        match self {
            Self::Utf8 => "UTF-8",
            Self::Raw => FONT_ENCODING_NAME,
            Self::Named(charset) => charset.name(),
        }
    }

    pub const fn is_raw(self) -> bool {
        matches!(self, Self::Raw)
    }
}

impl fmt::Display for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Codepage {
    type Err = CodepageError;

    /// Strict lookup: unknown and empty names are errors
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        lookup(name).ok_or_else(|| CodepageError::UnknownName(name.to_string()))
    }
}

/// Registry entries: display name, codepage, and whether the name is
/// offered in the selection list or only accepted as an alias
const ENTRIES: &[(&str, Codepage, bool)] = &[
    ("ISO-8859-1", Codepage::Named(Charset::Iso8859_1), true),
    ("ISO-8859-2", Codepage::Named(Charset::Iso8859_2), true),
    ("ISO-8859-5", Codepage::Named(Charset::Iso8859_5), true),
    ("ISO-8859-15", Codepage::Named(Charset::Iso8859_15), true),
    ("KOI8-R", Codepage::Named(Charset::Koi8R), true),
    ("KOI8-U", Codepage::Named(Charset::Koi8U), true),
    ("CP437", Codepage::Named(Charset::Cp437), true),
    ("CP850", Codepage::Named(Charset::Cp850), true),
    ("CP866", Codepage::Named(Charset::Cp866), true),
    ("CP1251", Codepage::Named(Charset::Cp1251), true),
    ("CP1252", Codepage::Named(Charset::Cp1252), true),
    ("UTF-8", Codepage::Utf8, true),
    ("Latin-1", Codepage::Named(Charset::Iso8859_1), false),
    ("Latin-2", Codepage::Named(Charset::Iso8859_2), false),
    ("Latin-9", Codepage::Named(Charset::Iso8859_15), false),
    ("IBM437", Codepage::Named(Charset::Cp437), false),
    ("IBM850", Codepage::Named(Charset::Cp850), false),
    ("IBM866", Codepage::Named(Charset::Cp866), false),
    ("Windows-1251", Codepage::Named(Charset::Cp1251), false),
    ("Windows-1252", Codepage::Named(Charset::Cp1252), false),
    (FONT_ENCODING_NAME, Codepage::Raw, false),
];

/// Compare names ignoring case and the separators people vary
fn names_match(a: &str, b: &str) -> bool {
    let significant = |c: &char| !matches!(c, '-' | '_' | ' ' | '.');
    a.chars()
        .filter(significant)
        .map(|c| c.to_ascii_lowercase())
        .eq(b.chars().filter(significant).map(|c| c.to_ascii_lowercase()))
}

fn lookup(name: &str) -> Option<Codepage> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let find = |candidate: &str| {
        ENTRIES
            .iter()
            .find(|(entry, _, _)| names_match(entry, candidate))
            .map(|&(_, codepage, _)| codepage)
    };
    find(name).or_else(|| {
        // Locale-style "language_TERRITORY.codeset"
        let (_, codeset) = name.rsplit_once('.')?;
        let codeset = codeset.split('@').next().unwrap_or(codeset);
        find(codeset)
    })
}

/// Resolve a configured codepage name.
///
/// Never fails: a missing, empty or unrecognised name gives UTF-8.
pub fn resolve_name(name: Option<&str>) -> Codepage {
    let Some(name) = name.filter(|n| !n.trim().is_empty()) else {
        return Codepage::Utf8;
    };
    lookup(name).unwrap_or_else(|| {
        log::debug!("Unknown codepage name {:?}, using UTF-8", name);
        Codepage::Utf8
    })
}

/// Display name of a codepage
pub fn name_of(codepage: Codepage) -> &'static str {
    codepage.name()
}

/// Name at `index` in the selection list, or `None` past the end.
///
/// The concrete codepages come first, followed by a single
/// "Use font encoding" entry.
pub fn enumerate(index: usize) -> Option<&'static str> {
    let mut listed = ENTRIES.iter().filter(|(_, _, listed)| *listed);
    match listed.nth(index) {
        Some(&(name, _, _)) => Some(name),
        None if index == listed_count() => Some(FONT_ENCODING_NAME),
        None => None,
    }
}

fn listed_count() -> usize {
    ENTRIES.iter().filter(|(_, _, listed)| *listed).count()
}

/// Iterate the selection list from the start
pub fn names() -> impl Iterator<Item = &'static str> {
    (0..).map_while(enumerate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_and_missing() {
        assert_eq!(resolve_name(None), Codepage::Utf8);
        assert_eq!(resolve_name(Some("")), Codepage::Utf8);
        assert_eq!(resolve_name(Some("   ")), Codepage::Utf8);
    }

    #[test]
    fn test_resolve_unknown_is_utf8() {
        assert_eq!(resolve_name(Some("EBCDIC-Klingon")), Codepage::Utf8);
    }

    #[test]
    fn test_resolve_known() {
        assert_eq!(
            resolve_name(Some("ISO-8859-1")),
            Codepage::Named(Charset::Iso8859_1)
        );
        assert_eq!(
            resolve_name(Some("koi8-r")),
            Codepage::Named(Charset::Koi8R)
        );
        assert_eq!(resolve_name(Some("utf8")), Codepage::Utf8);
        assert_eq!(
            resolve_name(Some("iso_8859_15")),
            Codepage::Named(Charset::Iso8859_15)
        );
        assert_eq!(
            resolve_name(Some("windows-1252")),
            Codepage::Named(Charset::Cp1252)
        );
        assert_eq!(resolve_name(Some(FONT_ENCODING_NAME)), Codepage::Raw);
    }

    #[test]
    fn test_resolve_locale_style() {
        assert_eq!(resolve_name(Some("en_US.UTF-8")), Codepage::Utf8);
        assert_eq!(
            resolve_name(Some("ru_RU.KOI8-R")),
            Codepage::Named(Charset::Koi8R)
        );
        assert_eq!(
            resolve_name(Some("de_DE.ISO-8859-15@euro")),
            Codepage::Named(Charset::Iso8859_15)
        );
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("CP437".parse::<Codepage>(), Ok(Codepage::Named(Charset::Cp437)));
        assert_eq!(
            "".parse::<Codepage>(),
            Err(CodepageError::UnknownName(String::new()))
        );
        assert!("nonsense".parse::<Codepage>().is_err());
    }

    #[test]
    fn test_enumerate() {
        let names: Vec<_> = names().collect();
        assert_eq!(names.first(), Some(&"ISO-8859-1"));
        assert_eq!(names.last(), Some(&FONT_ENCODING_NAME));
        assert_eq!(
            names.iter().filter(|&&n| n == FONT_ENCODING_NAME).count(),
            1
        );
        assert!(names.contains(&"UTF-8"));
        assert!(!names.contains(&"Latin-1"));

        let count = names.len();
        assert_eq!(enumerate(count - 1), Some(FONT_ENCODING_NAME));
        assert_eq!(enumerate(count), None);
        assert_eq!(enumerate(count + 10), None);
        // Restartable by index
        assert_eq!(enumerate(3), enumerate(3));
    }

    #[test]
    fn test_every_listed_name_resolves_to_itself() {
        for name in names() {
            let codepage = resolve_name(Some(name));
            assert_eq!(name_of(codepage), name);
        }
    }

    #[test]
    fn test_ids_round_trip() {
        for charset in Charset::ALL {
            let codepage = Codepage::Named(charset);
            assert_eq!(Codepage::from_id(codepage.id()), Ok(codepage));
        }
        assert_eq!(Codepage::from_id(65001), Ok(Codepage::Utf8));
        assert_eq!(Codepage::from_id(0), Ok(Codepage::Raw));
        assert_eq!(Codepage::from_id(12345), Err(CodepageError::UnknownId(12345)));
    }

    #[test]
    fn test_charset_tables() {
        assert_eq!(Charset::Iso8859_1.to_unicode(0xE9), Some(0xE9));
        assert_eq!(Charset::Iso8859_15.to_unicode(0xA4), Some(0x20AC));
        assert_eq!(Charset::Cp437.to_unicode(0xB3), Some(0x2502));
        assert_eq!(Charset::Koi8R.to_unicode(0xC1), Some(0x0430));
        assert_eq!(Charset::Koi8U.to_unicode(0xA4), Some(0x0454));
        assert_eq!(Charset::Cp1251.to_unicode(0xC0), Some(0x0410));
        assert_eq!(Charset::Cp866.to_unicode(0x80), Some(0x0410));
        assert_eq!(Charset::Cp1252.to_unicode(0x81), None);
        assert_eq!(Charset::Cp1252.to_unicode(0x41), Some(0x41));
    }

    #[test]
    fn test_charset_reverse() {
        assert_eq!(Charset::Cp1252.from_unicode(0x20AC), Some(0x80));
        assert_eq!(Charset::Iso8859_1.from_unicode(0xFF), Some(0xFF));
        assert_eq!(Charset::Iso8859_1.from_unicode(0x100), None);
        assert_eq!(Charset::Koi8R.from_unicode(0x0410), Some(0xE1));
        assert_eq!(Charset::Cp437.from_unicode(0x4E00), None);
    }

    #[test]
    fn test_high_halves_are_injective() {
        for charset in Charset::ALL {
            for byte in 0..=255u8 {
                if let Some(point) = charset.to_unicode(byte) {
                    assert_eq!(
                        charset.from_unicode(point),
                        Some(byte),
                        "{} byte 0x{:02X}",
                        charset.name(),
                        byte
                    );
                }
            }
        }
    }
}
