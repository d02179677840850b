//! Common test utilities

use std::collections::HashMap;

pub const SECRET_KEY: &str = "r8OwDznj!!dci#P9ghmRfdu1Ysxm0AiPeDCQhKE+N_rClfWNj7c";

/// Environment with exactly the required variables set
pub fn required_env() -> HashMap<String, String> {
    [
        ("NAUTOBOT_ALLOWED_HOSTS", "*"),
        ("NAUTOBOT_DB_USER", "nautobot"),
        ("NAUTOBOT_DB_PASSWORD", "decinablesprewad"),
        ("NAUTOBOT_REDIS_HOST", "redis"),
        ("NAUTOBOT_REDIS_PASSWORD", "decinablesprewad"),
        ("NAUTOBOT_SECRET_KEY", SECRET_KEY),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// Required environment plus `overrides`
pub fn env_with(overrides: &[(&str, &str)]) -> HashMap<String, String> {
    let mut env = required_env();
    for (key, value) in overrides {
        env.insert(key.to_string(), value.to_string());
    }
    env
}

/// Argument vector of a normal server start
pub fn server_args() -> Vec<String> {
    vec!["nautobot-server".to_string(), "runserver".to_string()]
}
