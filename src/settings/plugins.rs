//! Plugin registration and plugin settings
//!
//! ChatOps backends and the Panorama integration read their credentials from
//! unprefixed environment variables.

use serde::Serialize;

use crate::env::{EnvReader, EnvSource, Secret};
use crate::error::ConfigResult;

pub const CHATOPS_PLUGIN: &str = "nautobot_chatops";
pub const PANORAMA_PLUGIN: &str = "nautobot_plugin_chatops_panorama";

/// The `PLUGINS` list.
pub fn plugins() -> Vec<String> {
    vec![CHATOPS_PLUGIN.to_string(), PANORAMA_PLUGIN.to_string()]
}

/// A chat platform the ChatOps plugin can serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatBackend {
    Slack,
    Webex,
    Mattermost,
    MsTeams,
}

impl ChatBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatBackend::Slack => "slack",
            ChatBackend::Webex => "webex",
            ChatBackend::Mattermost => "mattermost",
            ChatBackend::MsTeams => "ms_teams",
        }
    }
}

/// Settings for the `nautobot_chatops` plugin.
#[derive(Debug, Clone, Serialize)]
pub struct ChatopsConfig {
    pub enable_slack: bool,
    pub slack_api_token: Option<Secret>,
    pub slack_signing_secret: Option<Secret>,
    pub slack_slash_command_prefix: String,
    pub enable_webex: bool,
    pub webex_token: Option<Secret>,
    pub webex_signing_secret: Option<Secret>,
    pub enable_mattermost: bool,
    pub mattermost_api_token: Option<Secret>,
    pub mattermost_url: Option<String>,
    pub enable_ms_teams: bool,
    pub microsoft_app_id: Option<String>,
    pub microsoft_app_password: Option<Secret>,
}

impl ChatopsConfig {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            enable_slack: env.truthy("ENABLE_SLACK", false)?,
            slack_api_token: env.optional_secret("SLACK_API_TOKEN"),
            slack_signing_secret: env.optional_secret("SLACK_SIGNING_SECRET"),
            slack_slash_command_prefix: env.string("SLACK_SLASH_COMMAND_PREFIX", "/"),
            enable_webex: env.truthy("ENABLE_WEBEX", false)?,
            webex_token: env.optional_secret("WEBEX_TOKEN"),
            webex_signing_secret: env.optional_secret("WEBEX_SIGNING_SECRET"),
            enable_mattermost: env.truthy("ENABLE_MATTERMOST", false)?,
            mattermost_api_token: env.optional_secret("MATTERMOST_API_TOKEN"),
            mattermost_url: env.optional("MATTERMOST_URL"),
            enable_ms_teams: env.truthy("ENABLE_MS_TEAMS", false)?,
            microsoft_app_id: env.optional("MICROSOFT_APP_ID"),
            microsoft_app_password: env.optional_secret("MICROSOFT_APP_PASSWORD"),
        })
    }

    /// Chat platforms switched on, in a fixed order.
    pub fn enabled_backends(&self) -> Vec<ChatBackend> {
        [
            (self.enable_slack, ChatBackend::Slack),
            (self.enable_webex, ChatBackend::Webex),
            (self.enable_mattermost, ChatBackend::Mattermost),
            (self.enable_ms_teams, ChatBackend::MsTeams),
        ]
        .into_iter()
        .filter_map(|(enabled, backend)| enabled.then_some(backend))
        .collect()
    }

    /// Names of credential variables an enabled backend needs but lacks.
    pub fn missing_credentials(&self) -> Vec<&'static str> {
        fn unset(secret: &Option<Secret>) -> bool {
            secret.as_ref().map_or(true, Secret::is_empty)
        }

        let mut missing = Vec::new();
        for backend in self.enabled_backends() {
            let needed: Vec<(&'static str, bool)> = match backend {
                ChatBackend::Slack => vec![
                    ("SLACK_API_TOKEN", unset(&self.slack_api_token)),
                    ("SLACK_SIGNING_SECRET", unset(&self.slack_signing_secret)),
                ],
                ChatBackend::Webex => vec![
                    ("WEBEX_TOKEN", unset(&self.webex_token)),
                    ("WEBEX_SIGNING_SECRET", unset(&self.webex_signing_secret)),
                ],
                ChatBackend::Mattermost => vec![
                    ("MATTERMOST_API_TOKEN", unset(&self.mattermost_api_token)),
                    ("MATTERMOST_URL", self.mattermost_url.is_none()),
                ],
                ChatBackend::MsTeams => vec![
                    ("MICROSOFT_APP_ID", self.microsoft_app_id.is_none()),
                    ("MICROSOFT_APP_PASSWORD", unset(&self.microsoft_app_password)),
                ],
            };
            missing.extend(needed.into_iter().filter(|(_, gone)| *gone).map(|(key, _)| key));
        }
        missing
    }
}

/// Settings for the `nautobot_plugin_chatops_panorama` plugin.
#[derive(Debug, Clone, Serialize)]
pub struct PanoramaConfig {
    pub panorama_host: Option<String>,
    pub panorama_user: Option<String>,
    pub panorama_password: Option<Secret>,
}

impl PanoramaConfig {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> Self {
        Self {
            panorama_host: env.optional("PANORAMA_HOST"),
            panorama_user: env.optional("PANORAMA_USER"),
            panorama_password: env.optional_secret("PANORAMA_PASSWORD"),
        }
    }
}

/// The `PLUGINS_CONFIG` mapping, keyed by plugin name.
#[derive(Debug, Clone, Serialize)]
pub struct PluginsConfig {
    #[serde(rename = "nautobot_chatops")]
    pub chatops: ChatopsConfig,
    #[serde(rename = "nautobot_plugin_chatops_panorama")]
    pub panorama: PanoramaConfig,
}

impl PluginsConfig {
    pub fn from_env<E: EnvSource + ?Sized>(env: &EnvReader<'_, E>) -> ConfigResult<Self> {
        Ok(Self {
            chatops: ChatopsConfig::from_env(env)?,
            panorama: PanoramaConfig::from_env(env),
        })
    }

    pub fn enabled_backends(&self) -> Vec<ChatBackend> {
        self.chatops.enabled_backends()
    }
}
