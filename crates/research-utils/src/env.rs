//! Environment variable helpers

use std::str::FromStr;

/// Read an environment variable, treating unset and blank values alike
///
/// Surrounding whitespace is stripped from the returned value.
pub fn env_var(name: &str) -> Option<String> {
    clean_env_value(std::env::var(name).ok())
}

fn clean_env_value(raw: Option<String>) -> Option<String> {
    raw.map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Parse a value read from the environment variable `name`
///
/// Unparseable values are logged and reported as absent.
pub fn parse_env_value<T: FromStr>(name: &str, raw: &str) -> Option<T> {
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(variable = name, value = %raw, "ignoring unparseable environment value");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_value_is_absent() {
        assert_eq!(clean_env_value(Some("   ".to_string())), None);
        assert_eq!(clean_env_value(Some(String::new())), None);
        assert_eq!(clean_env_value(None), None);
    }

    #[test]
    fn test_value_is_trimmed() {
        assert_eq!(
            clean_env_value(Some("  pplx-123 ".to_string())).as_deref(),
            Some("pplx-123")
        );
    }

    #[test]
    fn test_unset_variable_is_absent() {
        assert_eq!(env_var("RESEARCH_UTILS_TEST_NEVER_SET"), None);
    }

    #[test]
    fn test_parse_env_value() {
        assert_eq!(parse_env_value::<u64>("RESEARCH_TIMEOUT_SECS", "90"), Some(90));
        assert_eq!(parse_env_value::<u64>("RESEARCH_TIMEOUT_SECS", " 45 "), Some(45));
        assert_eq!(parse_env_value::<u64>("RESEARCH_TIMEOUT_SECS", "ninety"), None);
    }
}
