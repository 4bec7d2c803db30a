//! Configuration management
//!
//! Handles loading and saving the translation settings file.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use termucs_core::codepage::{self, Codepage, FONT_ENCODING_NAME};
use termucs_core::VtMode;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config directory not found")]
    NoConfigDir,
}

/// Main configuration struct
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Character set translation settings
    pub translation: TranslationConfig,
}

/// Character set translation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranslationConfig {
    /// Codepage of the bytes on the wire ("" means UTF-8)
    pub line_codepage: String,
    /// Encoding of the font, used when the line codepage is
    /// "Use font encoding"
    pub font_charset: String,
    /// Line drawing presentation
    pub vt_mode: VtMode,
    /// Treat East Asian ambiguous-width characters as wide
    pub cjk_ambig_wide: bool,
    /// Honour a UTF-8 POSIX locale
    pub utf8_override: bool,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            line_codepage: "UTF-8".into(),
            font_charset: FONT_ENCODING_NAME.into(),
            vt_mode: VtMode::Unicode,
            cjk_ambig_wide: false,
            utf8_override: true,
        }
    }
}

impl TranslationConfig {
    /// Resolved line codepage; bad names fall back to UTF-8
    pub fn line_codepage(&self) -> Codepage {
        codepage::resolve_name(Some(&self.line_codepage))
    }

    /// Resolved font charset; an empty or unknown name means no usable
    /// font encoding
    pub fn font_charset(&self) -> Codepage {
        self.font_charset.parse().unwrap_or(Codepage::Raw)
    }

    /// Names that do not resolve strictly and were replaced by a fallback
    pub fn validate(&self) -> Vec<String> {
        let mut unresolved = Vec::new();
        if !self.line_codepage.trim().is_empty()
            && self.line_codepage.parse::<Codepage>().is_err()
        {
            unresolved.push(self.line_codepage.clone());
        }
        if !self.font_charset.trim().is_empty() && self.font_charset.parse::<Codepage>().is_err() {
            unresolved.push(self.font_charset.clone());
        }
        unresolved
    }
}

/// Get the config directory path
pub fn config_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "termucs", "termucs").map(|p| p.config_dir().to_path_buf())
}

/// Get the config file path
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Load configuration from the default location
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    load_config_from(&path)
}

/// Load configuration from a file, defaults if it doesn't exist
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    for name in config.translation.validate() {
        log::warn!("Unrecognised codepage {:?} in {}", name, path.display());
    }

    Ok(config)
}

/// Save configuration to the default location
pub fn save_config(config: &Config) -> Result<(), ConfigError> {
    let path = config_path().ok_or(ConfigError::NoConfigDir)?;
    save_config_to(config, &path)
}

/// Save configuration to a file
pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, &content)?;

    // Set restrictive permissions on config file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        let _ = std::fs::set_permissions(path, perms);
    }

    Ok(())
}
