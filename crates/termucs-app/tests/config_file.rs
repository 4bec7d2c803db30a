//! Config file round-trips and session setup from a saved file

use termucs_app::config::{load_config_from, save_config_to, Config, TranslationConfig};
use termucs_app::{init_logging, Session};
use termucs_core::{Charset, Codepage, VtMode};

#[test]
fn missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("config.toml")).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn save_then_load() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let config = Config {
        translation: TranslationConfig {
            line_codepage: "CP866".into(),
            font_charset: "CP437".into(),
            vt_mode: VtMode::OemOnly,
            cjk_ambig_wide: true,
            utf8_override: false,
        },
    };
    save_config_to(&config, &path).unwrap();
    assert_eq!(load_config_from(&path).unwrap(), config);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[translation\nline_codepage = ").unwrap();
    assert!(load_config_from(&path).is_err());
}

#[test]
fn unknown_codepage_in_file_still_loads() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[translation]\nline_codepage = \"EBCDIC-037\"\n").unwrap();

    let config = load_config_from(&path).unwrap();
    assert_eq!(config.translation.line_codepage(), Codepage::Utf8);

    let session = Session::with_locale(&config.translation, false);
    assert_eq!(session.context().line_codepage, Codepage::Utf8);
}

#[test]
fn session_from_saved_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[translation]\nline_codepage = \"koi8-u\"\nvt_mode = \"poorman\"\n",
    )
    .unwrap();

    let config = load_config_from(&path).unwrap();
    let session = Session::with_locale(&config.translation, false);
    let context = session.context();
    assert_eq!(context.line_codepage, Codepage::Named(Charset::Koi8U));
    assert_eq!(context.xterm[0x78], '|' as u32);
    assert_eq!(session.feed(&[0xA4]), vec![0x0454]);
}
