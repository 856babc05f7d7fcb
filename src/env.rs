use std::sync::LazyLock;

use regex::{Captures, Regex};

/// `${NAME}` where NAME is letters, digits, `.`, `_` or `-`.
static ENV_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z0-9._\-]+)\}").expect("env reference pattern"));

/// Replace every `${NAME}` in `value` with `lookup(NAME)`, or nothing if unset.
///
/// Single pass: substituted text is not scanned again.
///
/// Takes the lookup as a function so tests can pass synthetic data instead of
/// the process environment.
pub fn expand(value: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    ENV_REF
        .replace_all(value, |caps: &Captures| lookup(&caps[1]).unwrap_or_default())
        .into_owned()
}

/// Lookup against the real process environment.
pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}
