//! termucs-app: Session-side use of the translation layer
//!
//! This crate holds what sits between configuration and the terminal loop:
//! persisted translation settings, per-session ownership of the Unicode
//! context, locale detection and logging setup.

pub mod config;
pub mod locale;
pub mod session;

pub use config::{load_config, save_config, Config, ConfigError, TranslationConfig};
pub use session::Session;

/// Initialise `env_logger`, defaulting to the `info` level.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
