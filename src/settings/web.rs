//! Request-facing security settings
//!
//! Cross-origin policy, remote authentication and session lifetime.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::env::{EnvReader, EnvSource};
use crate::error::ConfigResult;

/// Default session lifetime: 14 days.
const SESSION_COOKIE_AGE: u64 = 14 * 24 * 3600;

/// Object-level permissions keyed by `<app>.<action>_<model>`.
pub type PermissionMap = BTreeMap<String, serde_json::Value>;

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CorsSettings {
    /// Overrides the two origin lists below when set
    pub cors_allow_all_origins: bool,
    pub cors_allowed_origins: Vec<String>,
    pub cors_allowed_origin_regexes: Vec<String>,
    pub csrf_trusted_origins: Vec<String>,
}

impl CorsSettings {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            cors_allow_all_origins: env.truthy("NAUTOBOT_CORS_ALLOW_ALL_ORIGINS", false)?,
            ..Self::default()
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct RemoteAuthSettings {
    pub remote_auth_enabled: bool,
    pub remote_auth_backend: String,
    pub remote_auth_header: String,
    pub remote_auth_auto_create_user: bool,
    pub remote_auth_default_groups: Vec<String>,
    pub remote_auth_default_permissions: PermissionMap,
}

impl Default for RemoteAuthSettings {
    fn default() -> Self {
        Self {
            remote_auth_enabled: false,
            remote_auth_backend: "nautobot.core.authentication.RemoteUserBackend".to_string(),
            remote_auth_header: "HTTP_REMOTE_USER".to_string(),
            remote_auth_auto_create_user: true,
            remote_auth_default_groups: Vec::new(),
            remote_auth_default_permissions: PermissionMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct SessionSettings {
    /// Seconds before a web UI login expires
    pub session_cookie_age: u64,
    /// File-backed sessions when set, database otherwise
    pub session_file_path: Option<String>,
}

impl SessionSettings {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            session_cookie_age: env.parse("NAUTOBOT_SESSION_COOKIE_AGE", SESSION_COOKIE_AGE)?,
            session_file_path: env.optional("NAUTOBOT_SESSION_FILE_PATH"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_cors_toggle() {
        let source = HashMap::from([("NAUTOBOT_CORS_ALLOW_ALL_ORIGINS", "yes")]);
        let cors = CorsSettings::from_env(&EnvReader::new(&source)).unwrap();
        assert!(cors.cors_allow_all_origins);
        assert!(cors.cors_allowed_origins.is_empty());
    }

    #[test]
    fn test_session_defaults_and_overrides() {
        let empty: HashMap<&str, &str> = HashMap::new();
        let session = SessionSettings::from_env(&EnvReader::new(&empty)).unwrap();
        assert_eq!(session.session_cookie_age, 1_209_600);
        assert_eq!(session.session_file_path, None);

        let source = HashMap::from([
            ("NAUTOBOT_SESSION_COOKIE_AGE", "3600"),
            ("NAUTOBOT_SESSION_FILE_PATH", "/tmp/sessions"),
        ]);
        let session = SessionSettings::from_env(&EnvReader::new(&source)).unwrap();
        assert_eq!(session.session_cookie_age, 3600);
        assert_eq!(session.session_file_path.as_deref(), Some("/tmp/sessions"));
    }

    #[test]
    fn test_remote_auth_defaults() {
        let value = serde_json::to_value(RemoteAuthSettings::default()).unwrap();
        assert_eq!(value["REMOTE_AUTH_ENABLED"], false);
        assert_eq!(value["REMOTE_AUTH_HEADER"], "HTTP_REMOTE_USER");
        assert_eq!(value["REMOTE_AUTH_AUTO_CREATE_USER"], true);
    }
}
