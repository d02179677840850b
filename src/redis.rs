//! Redis connection locator
//!
//! The primary cache, the cacheops layer and the Celery broker share one Redis
//! endpoint and are told apart only by logical database index.

use url::{form_urlencoded, Url};

use crate::env::{EnvReader, EnvSource, Secret, REDACTED};
use crate::error::ConfigResult;

/// Logical index of the primary (django-redis) cache.
pub const CACHE_DATABASE: u32 = 0;

/// Logical index of the cacheops query cache.
pub const CACHEOPS_DATABASE: u32 = 1;

/// Logical index of the Celery broker and result backend.
pub const CELERY_DATABASE: u32 = 0;

const DEFAULT_SCHEME: &str = "redis";
const TLS_SCHEME: &str = "rediss";
const UNIX_SCHEME: &str = "unix";
const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 6379;

/// Password placeholder inside connection strings; brackets would be
/// percent-encoded there.
const URL_REDACTED: &str = "REDACTED";

/// Connection parameters shared by every Redis consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisEndpoint {
    pub scheme: String,
    pub host: String,
    pub port: u16,
    pub username: String,
    password: Secret,
}

impl RedisEndpoint {
    pub fn new(host: impl Into<String>, port: u16, password: impl Into<String>) -> Self {
        Self {
            scheme: DEFAULT_SCHEME.to_string(),
            host: host.into(),
            port,
            username: String::new(),
            password: Secret::new(password),
        }
    }

    /// Read the endpoint from `NAUTOBOT_REDIS_*` variables.
    ///
    /// `NAUTOBOT_REDIS_SSL` upgrades the default scheme to `rediss`; an
    /// explicit `NAUTOBOT_REDIS_SCHEME` wins over it.
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        let ssl = env.truthy("NAUTOBOT_REDIS_SSL", false)?;
        let default_scheme = if ssl { TLS_SCHEME } else { DEFAULT_SCHEME };

        Ok(Self {
            scheme: env.string("NAUTOBOT_REDIS_SCHEME", default_scheme),
            host: env.string("NAUTOBOT_REDIS_HOST", DEFAULT_HOST),
            port: env.parse("NAUTOBOT_REDIS_PORT", DEFAULT_PORT)?,
            username: env.string("NAUTOBOT_REDIS_USERNAME", ""),
            password: env.secret("NAUTOBOT_REDIS_PASSWORD", ""),
        })
    }

    pub fn password(&self) -> &Secret {
        &self.password
    }

    /// Connection string for logical database `database`.
    ///
    /// TCP endpoints carry credentials in the authority, only when a username
    /// or password is set; the password is not URL-encoded. A unix socket has
    /// no authority, so its credentials go in the query next to `db`.
    pub fn location(&self, database: u32) -> String {
        if self.scheme == UNIX_SCHEME {
            let mut query = form_urlencoded::Serializer::new(String::new());
            query.append_pair("db", &database.to_string());
            if !self.username.is_empty() {
                query.append_pair("username", &self.username);
            }
            if !self.password.is_empty() {
                query.append_pair("password", self.password.expose());
            }
            return format!("{}://{}?{}", self.scheme, self.host, query.finish());
        }

        let creds = if self.username.is_empty() && self.password.is_empty() {
            String::new()
        } else {
            format!("{}:{}@", self.username, self.password.expose())
        };
        format!(
            "{}://{}{}:{}/{}",
            self.scheme, creds, self.host, self.port, database
        )
    }
}

/// Mask the password in a connection string.
///
/// Both the authority password and a `password` query pair are masked.
/// Strings that carry no password are returned unchanged. A string that does
/// not parse but contains `@` is masked whole unless it is the hostless
/// `unix://user:password@/path` socket form.
pub fn redact_location(location: &str) -> String {
    let Ok(mut url) = Url::parse(location) else {
        return redact_unparsed(location);
    };
    let mut changed = false;

    if url.password().is_some() {
        if url.set_password(Some(URL_REDACTED)).is_err() {
            return redact_unparsed(location);
        }
        changed = true;
    }

    if url.query_pairs().any(|(key, _)| key == "password") {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(key, value)| {
                let value = if key == "password" {
                    URL_REDACTED.to_string()
                } else {
                    value.into_owned()
                };
                (key.into_owned(), value)
            })
            .collect();
        url.query_pairs_mut().clear().extend_pairs(pairs);
        changed = true;
    }

    if changed {
        url.into()
    } else {
        location.to_string()
    }
}

fn redact_unparsed(location: &str) -> String {
    if let Some(redacted) = redact_socket_credentials(location) {
        return redacted;
    }
    if location.contains('@') {
        REDACTED.to_string()
    } else {
        location.to_string()
    }
}

// `unix://user:pw@/run/redis.sock` has credentials but no host, which URL
// parsing rejects. The socket path starts at the first `@/`.
fn redact_socket_credentials(location: &str) -> Option<String> {
    let (scheme, rest) = location.split_once("://")?;
    let (creds, path) = rest.split_once("@/")?;
    let (user, _) = creds.split_once(':')?;
    Some(format!("{}://{}:{}@/{}", scheme, user, URL_REDACTED, path))
}
