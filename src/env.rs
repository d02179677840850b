//! Environment module
//!
//! Typed lookups over an environment source. Every option in the settings
//! resolves through [`EnvReader`]: the variable's value, coerced, if set,
//! otherwise the documented default.

use std::borrow::Borrow;
use std::collections::{BTreeMap, HashMap};
use std::ffi::OsString;
use std::fmt;
use std::hash::{BuildHasher, Hash};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{ConfigError, ConfigResult};

/// Placeholder written in place of secret values.
pub const REDACTED: &str = "[REDACTED]";

/// Fragments that mark an option name as holding a credential.
const SECRET_KEY_MARKERS: &[&str] = &["password", "secret", "token"];

/// Spellings accepted as `true` by [`parse_truthy`].
const TRUTHY: &[&str] = &["y", "yes", "t", "true", "on", "1"];

/// Spellings accepted as `false` by [`parse_truthy`].
const FALSY: &[&str] = &["", "n", "no", "f", "false", "off", "0"];

/// A source of environment variables.
pub trait EnvSource {
    /// Value of `key`, or `None` when unset.
    fn var(&self, key: &str) -> Option<String>;

    /// Raw value of `key`, which need not be valid unicode.
    fn var_os(&self, key: &str) -> Option<OsString> {
        self.var(key).map(OsString::from)
    }
}

/// The current process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        // Non-unicode values read as unset here; `var_os` still sees them
        std::env::var(key).ok()
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }
}

impl<K, V, S> EnvSource for HashMap<K, V, S>
where
    K: Borrow<str> + Hash + Eq,
    V: AsRef<str>,
    S: BuildHasher,
{
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_string())
    }
}

impl<K, V> EnvSource for BTreeMap<K, V>
where
    K: Borrow<str> + Ord,
    V: AsRef<str>,
{
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).map(|v| v.as_ref().to_string())
    }
}

impl<T: EnvSource + ?Sized> EnvSource for &T {
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }

    fn var_os(&self, key: &str) -> Option<OsString> {
        (**self).var_os(key)
    }
}

/// Parse a string with truthy semantics.
///
/// Case-insensitive. Returns `None` for values that are neither a true nor a
/// false spelling.
pub fn parse_truthy(value: &str) -> Option<bool> {
    let lowered = value.to_ascii_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Whether an option named `key` holds a credential.
pub fn is_secret_key(key: &str) -> bool {
    let lowered = key.to_ascii_lowercase();
    SECRET_KEY_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}

/// A string value that must not leak into logs.
///
/// Serializes to the real value so the settings mapping stays usable; use
/// `Settings::to_redacted_mapping` for anything that is displayed.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The underlying value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl Serialize for Secret {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Typed lookups over an [`EnvSource`].
pub struct EnvReader<'a, E: ?Sized> {
    source: &'a E,
}

impl<'a, E: EnvSource + ?Sized> EnvReader<'a, E> {
    pub fn new(source: &'a E) -> Self {
        Self { source }
    }

    /// Raw value, if set. An empty value counts as set.
    pub fn optional(&self, key: &str) -> Option<String> {
        self.source.var(key)
    }

    /// Value if set, else `default`.
    pub fn string(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Value if set, else the lazily computed `default`.
    pub fn string_or_else(&self, key: &str, default: impl FnOnce() -> String) -> String {
        self.optional(key).unwrap_or_else(default)
    }

    pub fn secret(&self, key: &str, default: &str) -> Secret {
        Secret::new(self.string(key, default))
    }

    pub fn optional_secret(&self, key: &str) -> Option<Secret> {
        self.optional(key).map(Secret::new)
    }

    /// Parsed value if set, else `default`.
    ///
    /// Surrounding whitespace is ignored. A value that does not parse is an
    /// error rather than a silent fallback.
    pub fn parse<T>(&self, key: &'static str, default: T) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(key) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|e: T::Err| ConfigError::invalid(key, format!("{:?}: {}", raw, e))),
            None => Ok(default),
        }
    }

    /// Truthy-parsed value if set, else `default`.
    pub fn truthy(&self, key: &'static str, default: bool) -> ConfigResult<bool> {
        match self.optional(key) {
            Some(raw) => parse_truthy(&raw).ok_or_else(|| {
                ConfigError::invalid(key, format!("{:?} is not a recognised boolean", raw))
            }),
            None => Ok(default),
        }
    }
}
