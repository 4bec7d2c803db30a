//! termucs-core: Unicode width and codepage translation for terminals
//!
//! This crate provides the character-level building blocks a terminal
//! emulator needs between the wire and the grid:
//! - Cell width classification of code points (combining, wide, ambiguous)
//! - Codepage name registry and byte/Unicode conversion
//! - Per-session translation tables (line, line drawing, SCO ACS, controls)

pub mod codepage;
pub mod context;
pub mod convert;
pub mod interval;
pub mod tables;
pub mod width;

pub use codepage::{enumerate, name_of, resolve_name, Charset, Codepage, CodepageError};
pub use context::{build_unicode_context, CharsetSlot, UnicodeContext, VtMode};
pub use convert::{decode, encode, encode_into, Decoded, Encoded};
pub use interval::Interval;
pub use width::{sequence_width, str_width, width, CellWidth};
