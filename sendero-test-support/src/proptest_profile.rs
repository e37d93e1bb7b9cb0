//! Environment-driven tuning for property-test suites.

use std::env;

/// Environment variable overriding the number of cases per property.
pub const CASES_ENV_KEY: &str = "SENDERO_PROPTEST_CASES";
/// Environment variable enabling forked execution of property cases.
pub const FORK_ENV_KEY: &str = "SENDERO_PROPTEST_FORK";

/// Case count and fork mode for one property suite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProptestRunProfile {
    cases: u32,
    fork: bool,
}

impl ProptestRunProfile {
    /// Reads overrides from the environment, falling back to the defaults
    /// when a variable is unset or malformed.
    ///
    /// # Examples
    ///
    /// ```
    /// use sendero_test_support::proptest_profile::ProptestRunProfile;
    ///
    /// let profile = ProptestRunProfile::load(64, false);
    /// assert!(profile.cases() > 0);
    /// ```
    #[must_use]
    pub fn load(default_cases: u32, default_fork: bool) -> Self {
        Self {
            cases: read_env_or_default(CASES_ENV_KEY, default_cases, parse_cases),
            fork: read_env_or_default(FORK_ENV_KEY, default_fork, parse_bool),
        }
    }

    /// Cases to run per property.
    #[must_use]
    pub fn cases(&self) -> u32 {
        self.cases
    }

    /// Whether each case runs in a forked process.
    #[must_use]
    pub fn fork(&self) -> bool {
        self.fork
    }
}

fn read_env_or_default<T: Copy>(
    key: &'static str,
    default: T,
    parser: fn(&str) -> Result<T, String>,
) -> T {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    parser(&raw).unwrap_or_else(|reason| {
        tracing::warn!(
            env = key,
            raw = %raw,
            reason = %reason,
            "invalid property-test profile override; using default",
        );
        default
    })
}

fn parse_cases(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("cases must be > 0".to_owned()),
        Ok(cases) => Ok(cases),
        Err(error) => Err(format!("parse error: {error}")),
    }
}

fn parse_bool(raw: &str) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err("expected one of: true/false/1/0/yes/no/on/off".to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("1", Ok(1))]
    #[case(" 250 ", Ok(250))]
    #[case("0", Err(()))]
    #[case("-1", Err(()))]
    #[case("many", Err(()))]
    fn parses_case_counts(#[case] raw: &str, #[case] expected: Result<u32, ()>) {
        assert_eq!(parse_cases(raw).map_err(|_| ()), expected);
    }

    #[rstest]
    #[case("TRUE", Ok(true))]
    #[case("on", Ok(true))]
    #[case("0", Ok(false))]
    #[case("no", Ok(false))]
    #[case("", Err(()))]
    #[case("maybe", Err(()))]
    fn parses_fork_flags(#[case] raw: &str, #[case] expected: Result<bool, ()>) {
        assert_eq!(parse_bool(raw).map_err(|_| ()), expected);
    }
}
