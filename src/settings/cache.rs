//! Cache and task-queue settings
//!
//! The django-redis cache, the cacheops query cache and the Celery broker all
//! default to the same Redis endpoint on different logical databases.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::env::{EnvReader, EnvSource, Secret};
use crate::error::ConfigResult;
use crate::redis::{RedisEndpoint, CACHEOPS_DATABASE, CACHE_DATABASE, CELERY_DATABASE};

const REDIS_CACHE_BACKEND: &str = "django_redis.cache.RedisCache";
const REDIS_CLIENT_CLASS: &str = "django_redis.client.DefaultClient";

/// Seconds a cached entry lives in the primary cache.
const CACHE_TIMEOUT: u64 = 300;

/// Seconds a job in the default queue may run.
const DEFAULT_QUEUE_TIMEOUT: u64 = 3600;

/// Queues that get their own entry, all backed by the default cache.
const QUEUE_NAMES: [&str; 4] = ["default", "check_releases", "custom_fields", "webhooks"];

/// The `CACHES` mapping.
#[derive(Debug, Clone, Serialize)]
pub struct Caches {
    pub default: CacheBackend,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CacheBackend {
    pub backend: String,
    pub location: String,
    pub timeout: u64,
    pub options: CacheOptions,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CacheOptions {
    pub client_class: String,
    pub password: Secret,
}

/// The `CACHEOPS_DEFAULTS` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CacheopsDefaults {
    /// Seconds. Zero is rejected by cacheops; disable caching instead.
    pub timeout: u64,
}

/// One entry of `CELERY_QUEUES`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CeleryQueue {
    pub use_redis_cache: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_timeout: Option<u64>,
}

/// Cache, cacheops and Celery options.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct CacheSettings {
    pub caches: Caches,
    pub cacheops_redis: String,
    pub cacheops_defaults: CacheopsDefaults,
    pub cacheops_enabled: bool,
    pub celery_queues: BTreeMap<String, CeleryQueue>,
    pub celery_broker_url: String,
    pub celery_result_backend: String,
}

impl CacheSettings {
    pub fn from_env<E: EnvSource + ?Sized>(
        env: &EnvReader<'_, E>,
        redis: &RedisEndpoint,
    ) -> ConfigResult<Self> {
        let caches = Caches {
            default: CacheBackend {
                backend: REDIS_CACHE_BACKEND.to_string(),
                location: redis.location(CACHE_DATABASE),
                timeout: CACHE_TIMEOUT,
                options: CacheOptions {
                    client_class: REDIS_CLIENT_CLASS.to_string(),
                    password: redis.password().clone(),
                },
            },
        };

        Ok(Self {
            caches,
            cacheops_redis: env.string_or_else("NAUTOBOT_CACHEOPS_REDIS", || {
                redis.location(CACHEOPS_DATABASE)
            }),
            cacheops_defaults: CacheopsDefaults {
                timeout: env.parse("NAUTOBOT_CACHEOPS_TIMEOUT", 900)?,
            },
            cacheops_enabled: env.truthy("NAUTOBOT_CACHEOPS_ENABLED", true)?,
            celery_queues: celery_queues(),
            celery_broker_url: env.string_or_else("NAUTOBOT_CELERY_BROKER_URL", || {
                redis.location(CELERY_DATABASE)
            }),
            celery_result_backend: env.string_or_else("NAUTOBOT_CELERY_RESULT_BACKEND", || {
                redis.location(CELERY_DATABASE)
            }),
        })
    }
}

/// The fixed `CELERY_QUEUES` mapping.
pub fn celery_queues() -> BTreeMap<String, CeleryQueue> {
    QUEUE_NAMES
        .into_iter()
        .map(|name| {
            let queue = CeleryQueue {
                use_redis_cache: "default".to_string(),
                default_timeout: (name == "default").then_some(DEFAULT_QUEUE_TIMEOUT),
            };
            (name.to_string(), queue)
        })
        .collect()
}
