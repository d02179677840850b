//! Database settings

use serde::Serialize;

use crate::env::{EnvReader, EnvSource, Secret};
use crate::error::ConfigResult;

pub const POSTGRES_ENGINE: &str = "django.db.backends.postgresql";
pub const MYSQL_ENGINE: &str = "django.db.backends.mysql";

/// The `DATABASES` mapping. Only a `default` connection is configured.
#[derive(Debug, Clone, Serialize)]
pub struct Databases {
    pub default: DatabaseSettings,
}

/// Connection parameters for one database.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DatabaseSettings {
    pub name: String,
    pub user: String,
    pub password: Secret,
    pub host: String,
    /// Blank means the driver's default port
    pub port: String,
    /// Seconds a connection may be reused
    pub conn_max_age: u64,
    pub engine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<DatabaseOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatabaseOptions {
    pub charset: String,
}

impl DatabaseSettings {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        let engine = env.string("NAUTOBOT_DB_ENGINE", POSTGRES_ENGINE);

        // MySQL needs utf8mb4 for full unicode support
        let options = (engine == MYSQL_ENGINE).then(|| DatabaseOptions {
            charset: "utf8mb4".to_string(),
        });

        Ok(Self {
            name: env.string("NAUTOBOT_DB_NAME", "nautobot"),
            user: env.string("NAUTOBOT_DB_USER", ""),
            password: env.secret("NAUTOBOT_DB_PASSWORD", ""),
            host: env.string("NAUTOBOT_DB_HOST", "localhost"),
            port: env.string("NAUTOBOT_DB_PORT", ""),
            conn_max_age: env.parse("NAUTOBOT_DB_TIMEOUT", 300)?,
            engine,
            options,
        })
    }

    pub fn is_mysql(&self) -> bool {
        self.engine == MYSQL_ENGINE
    }
}
