//! Settings module
//!
//! Assembles the full settings mapping for the framework from the
//! environment. The result is built once at startup and then only read.

pub mod cache;
pub mod database;
pub mod display;
pub mod logging;
pub mod napalm;
pub mod plugins;
pub mod web;

use std::ffi::OsStr;

use serde::Serialize;
use serde_json::Value;

use crate::env::{is_secret_key, EnvReader, EnvSource, ProcessEnv, Secret, REDACTED};
use crate::error::ConfigResult;
use crate::ordered::OrderedList;
use crate::redis::{redact_location, RedisEndpoint};
use crate::required::ensure_required;

pub use cache::CacheSettings;
pub use database::{DatabaseSettings, Databases};
pub use display::{DisplaySettings, Localization};
pub use logging::{LogLevel, LoggingConfig};
pub use napalm::NapalmSettings;
pub use plugins::{ChatBackend, PluginsConfig};
pub use web::{CorsSettings, PermissionMap, RemoteAuthSettings, SessionSettings};

pub const DEBUG_TOOLBAR_APP: &str = "debug_toolbar";
pub const DEBUG_TOOLBAR_MIDDLEWARE: &str = "debug_toolbar.middleware.DebugToolbarMiddleware";

/// Recommended minimum length of the signing key.
pub const MIN_SECRET_KEY_LENGTH: usize = 50;

/// Release checks more frequent than this are not allowed.
pub const MIN_RELEASE_CHECK_TIMEOUT: u64 = 3600;

/// The framework's stock request-processing chain.
pub const DEFAULT_MIDDLEWARE: [&str; 14] = [
    "django_prometheus.middleware.PrometheusBeforeMiddleware",
    "corsheaders.middleware.CorsMiddleware",
    "django.contrib.sessions.middleware.SessionMiddleware",
    "django.middleware.common.CommonMiddleware",
    "django.middleware.csrf.CsrfViewMiddleware",
    "django.contrib.auth.middleware.AuthenticationMiddleware",
    "django.contrib.messages.middleware.MessageMiddleware",
    "django.middleware.clickjacking.XFrameOptionsMiddleware",
    "django.middleware.security.SecurityMiddleware",
    "nautobot.core.middleware.ExceptionHandlingMiddleware",
    "nautobot.core.middleware.RemoteUserMiddleware",
    "nautobot.core.middleware.ExternalAuthMiddleware",
    "nautobot.core.middleware.ObjectChangeMiddleware",
    "django_prometheus.middleware.PrometheusAfterMiddleware",
];

const ALLOWED_URL_SCHEMES: [&str; 14] = [
    "file", "ftp", "ftps", "http", "https", "irc", "mailto", "sftp", "ssh", "tel", "telnet",
    "tftp", "vnc", "xmpp",
];

const INTERNAL_IPS: [&str; 2] = ["127.0.0.1", "::1"];

/// The `DEBUG_TOOLBAR_CONFIG` mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DebugToolbarConfig {
    /// Result of the show-toolbar callback: debug mode outside the test runner
    #[serde(rename = "SHOW_TOOLBAR_CALLBACK")]
    pub show_toolbar: bool,
}

/// The complete settings mapping.
///
/// Serializes to a flat mapping keyed by the framework's option names.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Settings {
    /// Started as `<program> test`
    pub testing: bool,
    /// Preferred name first
    pub allowed_hosts: Vec<String>,
    pub databases: Databases,
    #[serde(flatten)]
    pub cache: CacheSettings,
    pub secret_key: Secret,

    /// `(name, email)` pairs notified of application errors
    pub admins: Vec<(String, String)>,
    pub allowed_url_schemes: Vec<String>,
    #[serde(flatten)]
    pub display: DisplaySettings,
    /// Days; 0 keeps changes forever
    pub changelog_retention: u32,
    #[serde(flatten)]
    pub cors: CorsSettings,
    pub debug: bool,
    pub enforce_global_unique: bool,
    pub exempt_view_permissions: Vec<String>,
    pub external_auth_default_groups: Vec<String>,
    pub external_auth_default_permissions: PermissionMap,
    pub force_script_name: Option<String>,
    pub hide_restricted_ui: bool,
    pub internal_ips: Vec<String>,
    pub log_level: LogLevel,
    pub logging: LoggingConfig,
    pub maintenance_mode: bool,
    pub metrics_enabled: bool,
    #[serde(flatten)]
    pub napalm: NapalmSettings,
    pub plugins: Vec<String>,
    pub plugins_config: PluginsConfig,
    pub prefer_ipv4: bool,
    #[serde(flatten)]
    pub remote_auth: RemoteAuthSettings,
    /// Seconds between release checks
    pub release_check_timeout: u64,
    pub release_check_url: Option<String>,
    #[serde(flatten)]
    pub session: SessionSettings,
    pub social_auth_enabled: bool,
    pub social_auth_postgres_jsonfield: bool,
    #[serde(flatten)]
    pub localization: Localization,

    pub extra_installed_apps: OrderedList,
    pub middleware: OrderedList,
    pub django_toolbar_enabled: bool,
    pub debug_toolbar_config: DebugToolbarConfig,
}

/// Whether the argument vector is a test-runner invocation.
///
/// Arguments need not be valid unicode.
pub fn is_test_invocation<I, S>(args: I) -> bool
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter()
        .nth(1)
        .is_some_and(|arg| arg.as_ref() == "test")
}

impl Settings {
    /// Load settings from the process environment and argument vector.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_source(&ProcessEnv, std::env::args_os())
    }

    /// Load settings from `env`, treating `args` as the argument vector.
    ///
    /// # Errors
    /// - `ConfigError::MissingRequired` for the first unset or empty required
    ///   variable; nothing else is read in that case
    /// - `ConfigError::InvalidValue` for a malformed integer or boolean
    pub fn from_source<E, I, S>(env: &E, args: I) -> ConfigResult<Self>
    where
        E: EnvSource + ?Sized,
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        ensure_required(env)?;

        let env = EnvReader::new(env);
        let testing = is_test_invocation(args);
        let redis = RedisEndpoint::from_env(&env)?;

        let debug = env.truthy("NAUTOBOT_DEBUG", false)?;
        let log_level = LogLevel::from_debug(debug);

        let mut settings = Self {
            testing,
            allowed_hosts: env
                .string("NAUTOBOT_ALLOWED_HOSTS", "")
                .split(' ')
                .map(str::to_string)
                .collect(),
            databases: Databases {
                default: DatabaseSettings::from_env(&env)?,
            },
            cache: CacheSettings::from_env(&env, &redis)?,
            secret_key: env.secret("NAUTOBOT_SECRET_KEY", ""),
            admins: Vec::new(),
            allowed_url_schemes: ALLOWED_URL_SCHEMES.map(String::from).to_vec(),
            display: DisplaySettings::from_env(&env)?,
            changelog_retention: env.parse("NAUTOBOT_CHANGELOG_RETENTION", 90)?,
            cors: CorsSettings::from_env(&env)?,
            debug,
            enforce_global_unique: env.truthy("NAUTOBOT_ENFORCE_GLOBAL_UNIQUE", false)?,
            exempt_view_permissions: Vec::new(),
            external_auth_default_groups: Vec::new(),
            external_auth_default_permissions: PermissionMap::new(),
            force_script_name: None,
            hide_restricted_ui: env.truthy("NAUTOBOT_HIDE_RESTRICTED_UI", false)?,
            internal_ips: INTERNAL_IPS.map(String::from).to_vec(),
            log_level,
            logging: LoggingConfig::new(log_level),
            maintenance_mode: env.truthy("NAUTOBOT_MAINTENANCE_MODE", false)?,
            metrics_enabled: env.truthy("NAUTOBOT_METRICS_ENABLED", false)?,
            napalm: NapalmSettings::from_env(&env)?,
            plugins: plugins::plugins(),
            plugins_config: PluginsConfig::from_env(&env)?,
            prefer_ipv4: env.truthy("NAUTOBOT_PREFER_IPV4", false)?,
            remote_auth: RemoteAuthSettings::default(),
            release_check_timeout: env.parse("NAUTOBOT_RELEASE_CHECK_TIMEOUT", 24 * 3600)?,
            release_check_url: env.optional("NAUTOBOT_RELEASE_CHECK_URL"),
            session: SessionSettings::from_env(&env)?,
            social_auth_enabled: false,
            social_auth_postgres_jsonfield: false,
            localization: Localization::from_env(&env),
            extra_installed_apps: OrderedList::new(),
            middleware: DEFAULT_MIDDLEWARE.into_iter().collect(),
            django_toolbar_enabled: env.truthy("NAUTOBOT_DJANGO_TOOLBAR_ENABLED", false)?,
            debug_toolbar_config: DebugToolbarConfig {
                show_toolbar: debug && !testing,
            },
        };

        if settings.django_toolbar_enabled {
            settings.apply_debug_toolbar();
        }

        Ok(settings)
    }

    /// Wire the debug toolbar into the app list and middleware chain.
    ///
    /// Safe to call repeatedly: the app is listed once and the middleware is
    /// first in the chain exactly once. Returns whether anything changed.
    pub fn apply_debug_toolbar(&mut self) -> bool {
        let app_added = self.extra_installed_apps.push_if_absent(DEBUG_TOOLBAR_APP);
        let middleware_moved = self
            .middleware
            .insert_front_if_absent(DEBUG_TOOLBAR_MIDDLEWARE);
        app_added || middleware_moved
    }

    /// Whether the debug toolbar is rendered for internal clients.
    pub fn show_toolbar(&self) -> bool {
        self.debug_toolbar_config.show_toolbar
    }

    /// Serialize into the framework's option-name mapping.
    ///
    /// Values are real, secrets included.
    pub fn to_mapping(&self) -> serde_json::Result<Value> {
        serde_json::to_value(self)
    }

    /// The option-name mapping with credentials masked, for display.
    ///
    /// String options named like a credential become `[REDACTED]`, and
    /// passwords inside connection strings are masked.
    pub fn to_redacted_mapping(&self) -> serde_json::Result<Value> {
        let mut mapping = self.to_mapping()?;
        redact_value(&mut mapping);
        Ok(mapping)
    }

    /// One-line description of the startup mode.
    pub fn summary(&self) -> String {
        format!(
            "debug: {}, testing: {}, log level: {}, toolbar: {}",
            self.debug, self.testing, self.log_level, self.django_toolbar_enabled
        )
    }

    /// Non-fatal problems with the assembled settings.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.secret_key.len() < MIN_SECRET_KEY_LENGTH {
            warnings.push(format!(
                "NAUTOBOT_SECRET_KEY is shorter than {} characters",
                MIN_SECRET_KEY_LENGTH
            ));
        }
        if self.release_check_timeout < MIN_RELEASE_CHECK_TIMEOUT {
            warnings.push(format!(
                "NAUTOBOT_RELEASE_CHECK_TIMEOUT is {}s, below the one-hour minimum",
                self.release_check_timeout
            ));
        }
        if self.cache.cacheops_defaults.timeout == 0 {
            warnings.push(
                "NAUTOBOT_CACHEOPS_TIMEOUT is 0; disable caching with NAUTOBOT_CACHEOPS_ENABLED instead"
                    .to_string(),
            );
        }
        for key in self.plugins_config.chatops.missing_credentials() {
            warnings.push(format!("{} is unset but its chat backend is enabled", key));
        }

        warnings
    }
}

fn redact_value(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for (key, field) in map.iter_mut() {
                if field.is_string() && is_secret_key(key) {
                    *field = Value::from(REDACTED);
                } else {
                    redact_value(field);
                }
            }
        }
        Value::Array(items) => items.iter_mut().for_each(redact_value),
        Value::String(text) if text.contains("://") => *text = redact_location(text),
        _ => {}
    }
}
