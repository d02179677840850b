//! Required configuration gate
//!
//! Runs before anything else is read. An unset or empty required variable
//! aborts startup.

use crate::env::EnvSource;
use crate::error::{ConfigError, ConfigResult};

/// Variables that must be set and non-empty, in check order.
pub const REQUIRED_VARS: [&str; 6] = [
    "NAUTOBOT_ALLOWED_HOSTS",
    "NAUTOBOT_DB_USER",
    "NAUTOBOT_DB_PASSWORD",
    "NAUTOBOT_REDIS_HOST",
    "NAUTOBOT_REDIS_PASSWORD",
    "NAUTOBOT_SECRET_KEY",
];

fn is_present<E: EnvSource + ?Sized>(env: &E, key: &str) -> bool {
    env.var_os(key).is_some_and(|value| !value.is_empty())
}

/// Fail on the first required variable that is unset or empty.
///
/// A set value that is not valid unicode is present but unusable, and is
/// reported as `ConfigError::InvalidValue`.
pub fn ensure_required<E: EnvSource + ?Sized>(env: &E) -> ConfigResult<()> {
    for key in REQUIRED_VARS {
        let Some(value) = env.var_os(key).filter(|value| !value.is_empty()) else {
            return Err(ConfigError::MissingRequired(key));
        };
        if value.to_str().is_none() {
            return Err(ConfigError::invalid(key, "value is not valid unicode"));
        }
    }
    Ok(())
}

/// Every required variable that is unset or empty, in check order.
pub fn missing_required<E: EnvSource + ?Sized>(env: &E) -> Vec<&'static str> {
    REQUIRED_VARS
        .into_iter()
        .filter(|key| !is_present(env, key))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        REQUIRED_VARS.iter().map(|key| (*key, "value")).collect()
    }

    #[test]
    fn test_all_present() {
        assert_eq!(ensure_required(&full_env()), Ok(()));
        assert!(missing_required(&full_env()).is_empty());
    }

    #[test]
    fn test_every_subset_fails_naming_a_missing_var() {
        // 2^6 subsets of removed variables
        for mask in 1u32..(1 << REQUIRED_VARS.len()) {
            let mut env = full_env();
            let removed: Vec<&str> = REQUIRED_VARS
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, key)| *key)
                .collect();
            for key in &removed {
                env.remove(key);
            }

            match ensure_required(&env) {
                Err(ConfigError::MissingRequired(key)) => {
                    assert!(removed.contains(&key));
                    // First in check order
                    assert_eq!(key, removed[0]);
                }
                other => panic!("mask {:b}: expected MissingRequired, got {:?}", mask, other),
            }
            assert_eq!(missing_required(&env), removed);
        }
    }

    #[test]
    fn test_empty_counts_as_missing() {
        let mut env = full_env();
        env.insert("NAUTOBOT_REDIS_PASSWORD", "");
        assert_eq!(
            ensure_required(&env),
            Err(ConfigError::MissingRequired("NAUTOBOT_REDIS_PASSWORD"))
        );
    }

    /// Source holding raw OS strings, like a real process environment.
    #[cfg(unix)]
    struct RawEnv(HashMap<&'static str, std::ffi::OsString>);

    #[cfg(unix)]
    impl EnvSource for RawEnv {
        fn var(&self, key: &str) -> Option<String> {
            self.0.get(key).and_then(|value| value.to_str().map(str::to_string))
        }

        fn var_os(&self, key: &str) -> Option<std::ffi::OsString> {
            self.0.get(key).cloned()
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_non_unicode_value_is_invalid_not_missing() {
        use std::ffi::OsString;
        use std::os::unix::ffi::OsStringExt;

        let mut values: HashMap<&'static str, OsString> = REQUIRED_VARS
            .iter()
            .map(|key| (*key, OsString::from("value")))
            .collect();
        values.insert("NAUTOBOT_DB_PASSWORD", OsString::from_vec(vec![b'p', 0xff, b'w']));
        let env = RawEnv(values);

        assert!(matches!(
            ensure_required(&env),
            Err(ConfigError::InvalidValue { key: "NAUTOBOT_DB_PASSWORD", .. })
        ));
        assert!(missing_required(&env).is_empty());
    }

    #[test]
    fn test_whitespace_is_not_trimmed() {
        let mut env = full_env();
        env.insert("NAUTOBOT_SECRET_KEY", " ");
        assert_eq!(ensure_required(&env), Ok(()));
    }
}
