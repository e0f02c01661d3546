//! Environment variable interpolation for config files.
//!
//! Supported forms:
//! - `${VAR}` - substitute with the value of `VAR`, error if unset
//! - `${VAR:-default}` - use `default` when `VAR` is unset or empty
//! - `$$` - a literal `$`

use regex::{Captures, Regex};
use std::env;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\$|\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
        .expect("placeholder pattern is valid")
});

/// Substitute environment variables in `input`.
///
/// On failure returns every problem found, one per entry, so a user fixing a
/// config sees all missing variables in a single run.
pub fn interpolate(input: &str) -> Result<String, Vec<String>> {
    let mut problems = Vec::new();

    let output = PLACEHOLDER.replace_all(input, |caps: &Captures| {
        let Some(name) = caps.get(1).map(|m| m.as_str()) else {
            return "$".to_string();
        };
        let fallback = caps.get(2).map(|m| m.as_str());

        match (env::var(name), fallback) {
            (Ok(value), _) if value.contains(['\n', '\r']) => {
                problems.push(format!("environment variable '{name}' contains newlines"));
                String::new()
            }
            (Ok(value), Some(fallback)) if value.is_empty() => fallback.to_string(),
            (Ok(value), _) => value,
            (Err(_), Some(fallback)) => fallback.to_string(),
            (Err(_), None) => {
                problems.push(format!("environment variable '{name}' is not set"));
                String::new()
            }
        }
    });

    if problems.is_empty() {
        Ok(output.into_owned())
    } else {
        Err(problems)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // SAFETY (for the helpers below): each test uses its own variable names,
    // so concurrent tests never touch the same key.
    fn set(key: &str, value: &str) {
        unsafe { env::set_var(key, value) }
    }

    fn unset(key: &str) {
        unsafe { env::remove_var(key) }
    }

    #[test]
    fn test_braced_substitution() {
        set("SLEET_TEST_DELIM", ";");
        assert_eq!(
            interpolate("delimiter: \"${SLEET_TEST_DELIM}\"").unwrap(),
            "delimiter: \";\""
        );
    }

    #[test]
    fn test_default_when_unset_or_empty() {
        unset("SLEET_TEST_UNSET");
        set("SLEET_TEST_EMPTY", "");
        let text = interpolate("a: ${SLEET_TEST_UNSET:-in.csv}, b: ${SLEET_TEST_EMPTY:-out}");
        assert_eq!(text.unwrap(), "a: in.csv, b: out");
    }

    #[test]
    fn test_all_missing_variables_reported() {
        unset("SLEET_TEST_MISS_A");
        unset("SLEET_TEST_MISS_B");
        let problems = interpolate("${SLEET_TEST_MISS_A} ${SLEET_TEST_MISS_B}").unwrap_err();
        assert_eq!(problems.len(), 2);
        assert!(problems[0].contains("SLEET_TEST_MISS_A"));
        assert!(problems[1].contains("SLEET_TEST_MISS_B"));
    }

    #[test]
    fn test_newlines_rejected() {
        set("SLEET_TEST_NEWLINE", "a\nb");
        let problems = interpolate("path: ${SLEET_TEST_NEWLINE}").unwrap_err();
        assert!(problems[0].contains("newlines"));
    }

    #[test]
    fn test_dollar_escape_and_plain_text() {
        assert_eq!(interpolate("cost: $$5").unwrap(), "cost: $5");
        assert_eq!(interpolate("no variables").unwrap(), "no variables");
    }
}
