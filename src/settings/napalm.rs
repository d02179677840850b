//! NAPALM device-access settings

use std::collections::BTreeMap;

use serde::Serialize;

use crate::env::{EnvReader, EnvSource, Secret};
use crate::error::ConfigResult;

/// Credentials and options used when connecting to devices through NAPALM.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NapalmSettings {
    pub napalm_username: String,
    pub napalm_password: Secret,
    /// Seconds
    pub napalm_timeout: u64,
    /// Driver-specific optional arguments
    pub napalm_args: BTreeMap<String, serde_json::Value>,
}

impl NapalmSettings {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            napalm_username: env.string("NAUTOBOT_NAPALM_USERNAME", ""),
            napalm_password: env.secret("NAUTOBOT_NAPALM_PASSWORD", ""),
            napalm_timeout: env.parse("NAUTOBOT_NAPALM_TIMEOUT", 30)?,
            napalm_args: BTreeMap::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_napalm() {
        let source = HashMap::from([
            ("NAUTOBOT_NAPALM_USERNAME", "netops"),
            ("NAUTOBOT_NAPALM_PASSWORD", "s3cret"),
        ]);
        let napalm = NapalmSettings::from_env(&EnvReader::new(&source)).unwrap();
        assert_eq!(napalm.napalm_username, "netops");
        assert_eq!(napalm.napalm_password.expose(), "s3cret");
        assert_eq!(napalm.napalm_timeout, 30);
        assert!(napalm.napalm_args.is_empty());
    }
}
