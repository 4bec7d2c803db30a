//! POSIX locale inspection

/// Check if the environment selects a UTF-8 locale
pub fn locale_is_utf8() -> bool {
    locale_is_utf8_with(|name| std::env::var(name).ok())
}

/// Check for a UTF-8 codeset using the first non-empty of `LC_ALL`,
/// `LC_CTYPE` and `LANG`
pub fn locale_is_utf8_with(lookup: impl Fn(&str) -> Option<String>) -> bool {
    let Some(locale) = ["LC_ALL", "LC_CTYPE", "LANG"]
        .into_iter()
        .filter_map(|name| lookup(name))
        .find(|value| !value.is_empty())
    else {
        return false;
    };

    let Some((_, codeset)) = locale.split_once('.') else {
        return false;
    };
    let codeset = codeset.split('@').next().unwrap_or(codeset);
    codeset.eq_ignore_ascii_case("UTF-8") || codeset.eq_ignore_ascii_case("utf8")
}
