//! Per-session Unicode translation tables
//!
//! A `UnicodeContext` is built once when a session starts and again from
//! scratch whenever the line codepage, font charset or VT mode changes.
//! The four tables are only ever produced together since `ctrl` is
//! derived from `line`.

use serde::{Deserialize, Serialize};

use crate::codepage::{resolve_name, Charset, Codepage};
use crate::convert::{decode, direct_font, DIRECT_FONT_BASE};

/// Unicode replacement character
pub const REPLACEMENT: u32 = 0xFFFD;

/// How line-drawing characters are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VtMode {
    /// Font has X11 line-drawing glyphs in its bottom 32 positions
    XWindows,
    /// Line drawing from OEM and ANSI fonts
    OemAnsi,
    /// Line drawing from an OEM font only
    OemOnly,
    /// ASCII approximations
    Poorman,
    /// Unicode box-drawing characters
    #[default]
    Unicode,
}

/// G-set selected for translating a byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharsetSlot {
    /// Plain line codepage
    #[default]
    Line,
    /// DEC special graphics (ESC ( 0)
    LineDrawing,
    /// SCO alternate character set
    Scoacs,
}

/// DEC special graphics for bytes 0x5F..0x7F
const XTERM_STD: [u32; 32] = [
    0x2666, 0x2592, 0x2409, 0x240C, 0x240D, 0x240A, 0x00B0, 0x00B1,
    0x2424, 0x240B, 0x2518, 0x2510, 0x250C, 0x2514, 0x253C, 0x23BA,
    0x23BB, 0x2500, 0x23BC, 0x23BD, 0x251C, 0x2524, 0x2534, 0x252C,
    0x2502, 0x2264, 0x2265, 0x03C0, 0x2260, 0x00A3, 0x00B7, 0x0020,
];

const XTERM_POORMAN: &[u8; 32] = b"*#****o~**+++++-----++++|****L. ";

/// Glyphs shared by the MS OEM codepages for bytes 1..31 (and 127 at 0)
const OEM_GLYPH_OVERLAY: [u32; 32] = [
    0x2302, 0x263A, 0x263B, 0x2665, 0x2666, 0x2663, 0x2660, 0x2022,
    0x25D8, 0x25CB, 0x25D9, 0x2642, 0x2640, 0x266A, 0x266B, 0x263C,
    0x25B6, 0x25C0, 0x2195, 0x203C, 0x00B6, 0x00A7, 0x25AC, 0x21A8,
    0x2191, 0x2193, 0x2192, 0x2190, 0x221F, 0x2194, 0x25B2, 0x25BC,
];

/// Translation tables for one terminal session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnicodeContext {
    /// Byte to Unicode under the line codepage
    pub line: [u32; 256],
    /// As `line`, with DEC line drawing in 0x5F..0x7F
    pub xterm: [u32; 256],
    /// CP437 with the OEM control glyphs
    pub scoacs: [u32; 256],
    /// The byte itself where it is a control under the line codepage
    pub ctrl: [Option<u8>; 256],
    /// Line codepage the tables were built from
    pub line_codepage: Codepage,
    pub vt_mode: VtMode,
    /// Bytes go straight to the font with no Unicode mapping
    pub direct_to_font: bool,
}

impl UnicodeContext {
    /// Build the tables for a line codepage.
    ///
    /// A raw line codepage falls back to `font_charset`; if that is raw too
    /// the session runs direct-to-font, reported by the returned flag.
    pub fn build(line: Codepage, font_charset: Codepage, vt_mode: VtMode) -> (Self, bool) {
        let line_codepage = if line.is_raw() { font_charset } else { line };
        let direct_to_font = line_codepage.is_raw();
        if direct_to_font {
            log::debug!("No usable line codepage, running direct-to-font");
        }
        log::debug!(
            "Building unicode context: line codepage {}, vt mode {:?}",
            line_codepage,
            vt_mode
        );

        let line = build_line(line_codepage);
        let context = Self {
            xterm: build_xterm(&line, vt_mode),
            scoacs: build_scoacs(),
            ctrl: build_ctrl(&line),
            line,
            line_codepage,
            vt_mode,
            direct_to_font,
        };
        (context, direct_to_font)
    }

    /// Map a byte through the table for the active G-set
    pub fn translate(&self, byte: u8, slot: CharsetSlot) -> u32 {
        let table = match slot {
            CharsetSlot::Line => &self.line,
            CharsetSlot::LineDrawing => &self.xterm,
            CharsetSlot::Scoacs => &self.scoacs,
        };
        table[byte as usize]
    }

    /// Check if a byte is a control character under the line codepage
    pub fn is_control(&self, byte: u8) -> bool {
        self.ctrl[byte as usize].is_some()
    }
}

/// Resolve a line codepage name and build the context for it
pub fn build_unicode_context(
    line_codepage: Option<&str>,
    font_charset: Codepage,
    vt_mode: VtMode,
) -> (UnicodeContext, bool) {
    UnicodeContext::build(resolve_name(line_codepage), font_charset, vt_mode)
}

fn decode_byte(codepage: Codepage, byte: u8) -> Option<u32> {
    decode(codepage, &[byte]).points.first().copied()
}

fn build_line(codepage: Codepage) -> [u32; 256] {
    std::array::from_fn(|i| {
        let byte = i as u8;
        decode_byte(codepage, byte).unwrap_or(match codepage {
            // Lone bytes 0x80..=0xFF are not UTF-8
            Codepage::Utf8 => direct_font(byte),
            _ => REPLACEMENT,
        })
    })
}

fn build_xterm(line: &[u32; 256], vt_mode: VtMode) -> [u32; 256] {
    std::array::from_fn(|i| match i {
        0x5F..=0x7E => match vt_mode {
            VtMode::Poorman => XTERM_POORMAN[i & 0x1F] as u32,
            _ => XTERM_STD[i & 0x1F],
        },
        _ => line[i],
    })
}

fn build_scoacs() -> [u32; 256] {
    std::array::from_fn(|i| match i {
        1..=31 => OEM_GLYPH_OVERLAY[i],
        127 => OEM_GLYPH_OVERLAY[0],
        _ => decode_byte(Codepage::Named(Charset::Cp437), i as u8).unwrap_or(REPLACEMENT),
    })
}

fn build_ctrl(line: &[u32; 256]) -> [Option<u8>; 256] {
    std::array::from_fn(|i| {
        let point = line[i];
        let control = point < 0x20
            || (0x7F..0xA0).contains(&point)
            || (DIRECT_FONT_BASE..DIRECT_FONT_BASE + 0x20).contains(&point)
            || point == DIRECT_FONT_BASE + 0x7F;
        control.then_some(i as u8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_line_table() {
        let (ctx, direct) = UnicodeContext::build(
            Codepage::Named(Charset::Iso8859_1),
            Codepage::Raw,
            VtMode::Unicode,
        );
        assert!(!direct);
        for i in 0..256 {
            assert_eq!(ctx.line[i], i as u32);
        }
    }

    #[test]
    fn test_utf8_high_bytes_fall_back_to_private_range() {
        let (ctx, direct) = UnicodeContext::build(Codepage::Utf8, Codepage::Raw, VtMode::Unicode);
        assert!(!direct);
        assert_eq!(ctx.line[0x41], 0x41);
        assert_eq!(ctx.line[0x80], 0xF080);
        assert_eq!(ctx.line[0xFF], 0xF0FF);
    }

    #[test]
    fn test_unassigned_byte_is_replacement() {
        let (ctx, _) =
            UnicodeContext::build(Codepage::Named(Charset::Cp1252), Codepage::Raw, VtMode::Unicode);
        assert_eq!(ctx.line[0x80], 0x20AC);
        assert_eq!(ctx.line[0x81], REPLACEMENT);
    }

    #[test]
    fn test_raw_line_uses_font_charset() {
        let (ctx, direct) =
            UnicodeContext::build(Codepage::Raw, Codepage::Named(Charset::Koi8R), VtMode::Unicode);
        assert!(!direct);
        assert_eq!(ctx.line_codepage, Codepage::Named(Charset::Koi8R));
        assert_eq!(ctx.line[0xC1], 0x0430);
    }

    #[test]
    fn test_direct_to_font() {
        let (ctx, direct) = UnicodeContext::build(Codepage::Raw, Codepage::Raw, VtMode::Unicode);
        assert!(direct);
        assert!(ctx.direct_to_font);
        assert_eq!(ctx.line[0x41], 0xF041);
        // Controls are 0x00-0x1F and 0x7F, but 0x80-0x9F pass through
        assert!(ctx.is_control(0x00));
        assert!(ctx.is_control(0x1B));
        assert!(ctx.is_control(0x7F));
        assert!(!ctx.is_control(0x41));
        assert!(!ctx.is_control(0x85));
    }

    #[test]
    fn test_xterm_line_drawing() {
        let (ctx, _) = UnicodeContext::build(Codepage::Utf8, Codepage::Raw, VtMode::Unicode);
        assert_eq!(ctx.xterm[0x5E], 0x5E);
        assert_eq!(ctx.xterm[0x5F], 0x0020);
        assert_eq!(ctx.xterm[0x60], 0x2666);
        assert_eq!(ctx.xterm[0x71], 0x2500);
        assert_eq!(ctx.xterm[0x78], 0x2502);
        assert_eq!(ctx.xterm[0x7E], 0x00B7);
        assert_eq!(ctx.xterm[0x7F], ctx.line[0x7F]);
        assert_eq!(ctx.translate(0x71, CharsetSlot::LineDrawing), 0x2500);
        assert_eq!(ctx.translate(0x71, CharsetSlot::Line), 0x71);
    }

    #[test]
    fn test_xterm_poorman() {
        let (ctx, _) = UnicodeContext::build(Codepage::Utf8, Codepage::Raw, VtMode::Poorman);
        assert_eq!(ctx.xterm[0x60], '*' as u32);
        assert_eq!(ctx.xterm[0x61], '#' as u32);
        assert_eq!(ctx.xterm[0x71], '-' as u32);
        assert_eq!(ctx.xterm[0x78], '|' as u32);
    }

    #[test]
    fn test_scoacs() {
        let (ctx, _) = UnicodeContext::build(Codepage::Utf8, Codepage::Raw, VtMode::Unicode);
        assert_eq!(ctx.scoacs[0], 0);
        assert_eq!(ctx.scoacs[1], 0x263A);
        assert_eq!(ctx.scoacs[31], 0x25BC);
        assert_eq!(ctx.scoacs[127], 0x2302);
        assert_eq!(ctx.scoacs[0x41], 0x41);
        assert_eq!(ctx.scoacs[0xC4], 0x2500);
        assert_eq!(ctx.translate(0xDB, CharsetSlot::Scoacs), 0x2588);
    }

    #[test]
    fn test_ctrl_table() {
        let (ctx, _) = UnicodeContext::build(
            Codepage::Named(Charset::Iso8859_1),
            Codepage::Raw,
            VtMode::Unicode,
        );
        assert_eq!(ctx.ctrl[0x07], Some(0x07));
        assert_eq!(ctx.ctrl[0x9B], Some(0x9B));
        assert_eq!(ctx.ctrl[0x41], None);
        assert_eq!(ctx.ctrl[0xA0], None);

        // KOI8-R puts box drawing where ISO-8859-1 has C1 controls
        let (ctx, _) = UnicodeContext::build(
            Codepage::Named(Charset::Koi8R),
            Codepage::Raw,
            VtMode::Unicode,
        );
        assert!(!ctx.is_control(0x80));
        assert!(ctx.is_control(0x0D));
    }

    #[test]
    fn test_build_by_name() {
        let (ctx, direct) = build_unicode_context(Some("CP437"), Codepage::Raw, VtMode::Unicode);
        assert!(!direct);
        assert_eq!(ctx.line[0xB3], 0x2502);

        let (ctx, _) = build_unicode_context(None, Codepage::Raw, VtMode::Unicode);
        assert_eq!(ctx.line_codepage, Codepage::Utf8);

        let (_, direct) =
            build_unicode_context(Some("Use font encoding"), Codepage::Raw, VtMode::Unicode);
        assert!(direct);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = build_unicode_context(Some("KOI8-U"), Codepage::Raw, VtMode::Poorman);
        let b = build_unicode_context(Some("KOI8-U"), Codepage::Raw, VtMode::Poorman);
        assert_eq!(a, b);
    }
}
