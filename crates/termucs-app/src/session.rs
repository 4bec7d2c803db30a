//! Session management
//!
//! A session owns the translation settings and the Unicode context built
//! from them. Changing the settings builds a fresh context and swaps it in;
//! anyone still holding the previous `Arc` keeps a consistent old copy.
//!
//! Bytes held back between reads live under the same lock as the context,
//! so they are always decoded under the codepage they arrived with.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use termucs_core::context::REPLACEMENT;
use termucs_core::{convert, width, CellWidth, Codepage, UnicodeContext};

use crate::config::TranslationConfig;
use crate::locale::locale_is_utf8;

/// Global session ID counter
static SESSION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Generate a unique session ID
fn next_session_id() -> u64 {
    SESSION_ID_COUNTER.fetch_add(1, Ordering::SeqCst)
}

struct State {
    translation: TranslationConfig,
    context: Arc<UnicodeContext>,
    /// Bytes of an incomplete sequence left over from the last read
    pending: Vec<u8>,
}

/// Translation state for one terminal session
pub struct Session {
    /// Unique session ID
    pub id: u64,
    state: RwLock<State>,
    utf8_locale: bool,
}

impl Session {
    /// Create a session, detecting the locale from the environment
    pub fn new(translation: &TranslationConfig) -> Self {
        let utf8_locale = translation.utf8_override && locale_is_utf8();
        Self::with_locale(translation, utf8_locale)
    }

    /// Create a session with an explicit locale setting
    pub fn with_locale(translation: &TranslationConfig, utf8_locale: bool) -> Self {
        let id = next_session_id();
        log::debug!("Session {}: utf8 locale = {}", id, utf8_locale);
        Self {
            id,
            state: RwLock::new(build_state(translation)),
            utf8_locale,
        }
    }

    /// Replace the translation settings, rebuilding the context
    ///
    /// Bytes held back by [`feed`](Self::feed) belonged to the old line
    /// codepage and are discarded with it.
    pub fn apply(&self, translation: &TranslationConfig) {
        let state = build_state(translation);
        *self.state.write() = state;
        log::debug!("Session {}: translation settings replaced", self.id);
    }

    /// Current context
    pub fn context(&self) -> Arc<UnicodeContext> {
        Arc::clone(&self.state.read().context)
    }

    /// Current translation settings
    pub fn translation(&self) -> TranslationConfig {
        self.state.read().translation.clone()
    }

    /// Whether the POSIX locale selected UTF-8
    pub fn utf8_locale(&self) -> bool {
        self.utf8_locale
    }

    /// Whether bytes go straight to the font
    pub fn direct_to_font(&self) -> bool {
        self.state.read().context.direct_to_font
    }

    fn ambiguous_wide(&self) -> bool {
        self.state.read().translation.cjk_ambig_wide
    }

    /// Cell width of a code point under this session's settings.
    ///
    /// Direct-to-font bytes always take one cell.
    pub fn width(&self, point: u32) -> CellWidth {
        cell_width(point, self.ambiguous_wide())
    }

    /// Total cell width of a run of code points, `None` if any is a control.
    /// A NUL ends the run.
    pub fn text_width(&self, points: &[u32]) -> Option<usize> {
        let ambiguous_wide = self.ambiguous_wide();
        points
            .iter()
            .take_while(|&&point| point != 0)
            .try_fold(0usize, |total, &point| {
                cell_width(point, ambiguous_wide)
                    .columns()
                    .map(|columns| total + columns)
            })
    }

    /// Decode bytes read from the wire.
    ///
    /// An incomplete multi-byte sequence at the end is held back and
    /// completed by the next call. A byte that can never decode becomes
    /// U+FFFD.
    pub fn feed(&self, bytes: &[u8]) -> Vec<u32> {
        let mut state = self.state.write();
        let codepage = state.context.line_codepage;
        let pending = &mut state.pending;
        pending.extend_from_slice(bytes);

        let mut points = Vec::with_capacity(pending.len());
        let mut start = 0;
        while start < pending.len() {
            let decoded = convert::decode(codepage, &pending[start..]);
            points.extend(decoded.points);
            start += decoded.consumed;

            let rest = &pending[start..];
            if rest.is_empty() {
                break;
            }
            let Some(skip) = invalid_len(codepage, rest) else {
                break;
            };
            log::trace!("Session {}: undecodable byte 0x{:02x}", self.id, rest[0]);
            points.push(REPLACEMENT);
            start += skip;
        }

        pending.drain(..start);
        points
    }

    /// Encode locally typed text for the wire
    pub fn encode_input(&self, text: &str, default_char: Option<u8>) -> Vec<u8> {
        let codepage = self.state.read().context.line_codepage;
        let points: Vec<u32> = text.chars().map(|c| c as u32).collect();
        convert::encode(codepage, &points, default_char)
    }
}

fn build_state(translation: &TranslationConfig) -> State {
    let (context, direct_to_font) = UnicodeContext::build(
        translation.line_codepage(),
        translation.font_charset(),
        translation.vt_mode,
    );
    if direct_to_font {
        log::info!(
            "Line codepage {:?} has no Unicode mapping, using direct-to-font",
            translation.line_codepage
        );
    }
    State {
        translation: translation.clone(),
        context: Arc::new(context),
        pending: Vec::new(),
    }
}

fn cell_width(point: u32, ambiguous_wide: bool) -> CellWidth {
    // The private range overlaps the ambiguous table
    if convert::is_direct_font(point) {
        CellWidth::Narrow
    } else {
        width(point, ambiguous_wide)
    }
}

/// Length of the undecodable sequence at the start of `rest`, or `None`
/// if more input may still complete it
fn invalid_len(codepage: Codepage, rest: &[u8]) -> Option<usize> {
    match codepage {
        Codepage::Utf8 => std::str::from_utf8(rest).err()?.error_len(),
        Codepage::Raw | Codepage::Named(_) => Some(1),
    }
}
