//! Conversion between line bytes and Unicode code points
//!
//! Decoding stops at the first byte that cannot be turned into a complete
//! code point and reports how much input was used, leaving the rest for
//! the caller to re-buffer (for example across a pty read boundary).
//! Encoding never fails outright: unrepresentable points are substituted,
//! dropped or end the conversion depending on the codepage.

use crate::codepage::{Charset, Codepage};

/// Base of the private range used for direct-to-font bytes.
///
/// A byte `b` under the raw codepage decodes to `DIRECT_FONT_BASE | b`.
pub const DIRECT_FONT_BASE: u32 = 0xF000;

/// Tag a raw byte as a direct-to-font code point
pub const fn direct_font(byte: u8) -> u32 {
    DIRECT_FONT_BASE | byte as u32
}

/// Check if a code point is a tagged direct-to-font byte
pub const fn is_direct_font(point: u32) -> bool {
    point & !0xFF == DIRECT_FONT_BASE
}

/// Result of decoding a byte sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Decoded {
    /// Fully decoded code points
    pub points: Vec<u32>,
    /// Number of input bytes those points came from
    pub consumed: usize,
}

/// Result of encoding into a bounded buffer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Encoded {
    /// Bytes written to the output buffer
    pub written: usize,
    /// Input points consumed, including dropped ones
    pub consumed: usize,
}

/// Decode `bytes` under `codepage`
pub fn decode(codepage: Codepage, bytes: &[u8]) -> Decoded {
    match codepage {
        Codepage::Utf8 => decode_utf8(bytes),
        Codepage::Raw => Decoded {
            points: bytes.iter().map(|&b| direct_font(b)).collect(),
            consumed: bytes.len(),
        },
        Codepage::Named(charset) => decode_charset(charset, bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Decoded {
    let valid = bytes.utf8_chunks().next().map_or("", |chunk| chunk.valid());
    if valid.len() < bytes.len() {
        log::trace!("UTF-8 decode stopped at byte {} of {}", valid.len(), bytes.len());
    }
    Decoded {
        points: valid.chars().map(|c| c as u32).collect(),
        consumed: valid.len(),
    }
}

fn decode_charset(charset: Charset, bytes: &[u8]) -> Decoded {
    let mut points = Vec::with_capacity(bytes.len());
    for &byte in bytes {
        match charset.to_unicode(byte) {
            Some(point) => points.push(point),
            None => {
                log::trace!(
                    "{} decode stopped at unassigned byte 0x{:02x}",
                    charset.name(),
                    byte
                );
                break;
            }
        }
    }
    let consumed = points.len();
    Decoded { points, consumed }
}

/// Encode `points` under `codepage` into `out`.
///
/// `default_char` replaces points the codepage cannot represent; without
/// one they are dropped. UTF-8 has no substitution and stops at a
/// surrogate or an out-of-range value. Encoding also stops when `out` is
/// full.
pub fn encode_into(
    codepage: Codepage,
    points: &[u32],
    default_char: Option<u8>,
    out: &mut [u8],
) -> Encoded {
    match codepage {
        Codepage::Utf8 => encode_utf8(points, out),
        Codepage::Raw => encode_bytes(points, default_char, out, |point| {
            is_direct_font(point).then_some((point & 0xFF) as u8)
        }),
        Codepage::Named(charset) => encode_bytes(points, default_char, out, |point| {
            charset.from_unicode(point)
        }),
    }
}

/// Encode `points` under `codepage` into a new buffer, see [`encode_into`]
pub fn encode(codepage: Codepage, points: &[u32], default_char: Option<u8>) -> Vec<u8> {
    let per_point = match codepage {
        Codepage::Utf8 => 4,
        Codepage::Raw | Codepage::Named(_) => 1,
    };
    let mut out = vec![0; points.len() * per_point];
    let encoded = encode_into(codepage, points, default_char, &mut out);
    out.truncate(encoded.written);
    out
}

fn encode_utf8(points: &[u32], out: &mut [u8]) -> Encoded {
    let mut encoded = Encoded::default();
    for &point in points {
        let Some(c) = char::from_u32(point) else {
            break;
        };
        let len = c.len_utf8();
        if encoded.written + len > out.len() {
            break;
        }
        c.encode_utf8(&mut out[encoded.written..]);
        encoded.written += len;
        encoded.consumed += 1;
    }
    encoded
}

fn encode_bytes(
    points: &[u32],
    default_char: Option<u8>,
    out: &mut [u8],
    map: impl Fn(u32) -> Option<u8>,
) -> Encoded {
    let mut encoded = Encoded::default();
    for &point in points {
        if encoded.written == out.len() {
            break;
        }
        if let Some(byte) = map(point).or(default_char) {
            out[encoded.written] = byte;
            encoded.written += 1;
        }
        encoded.consumed += 1;
    }
    encoded
}
