use super::ConfigError;
use osb_domain::config::{
    ApiConfig, ApiConfigInner, BrokerConfig, SecurityConfig, ServerConfig, default_credentials,
    parse_tags,
};
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Raw, flat settings as read from the environment or a config file.
///
/// Every field is an uninterpreted string; [`BrokerSettings::resolve`] applies defaults
/// and parsing. Empty strings count as unset.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerSettings {
    pub service_name: Option<String>,
    pub service_plan_name: Option<String>,
    pub base_guid: Option<String>,
    pub credentials: Option<String>,
    pub tags: Option<String>,
    pub image_url: Option<String>,
    pub syslog_drain_url: Option<String>,
    pub fake_async: Option<String>,
    pub fake_stateful: Option<String>,
    pub auth_user: Option<String>,
    pub auth_password: Option<String>,
    pub port: Option<String>,
    pub address: Option<String>,
}

impl fmt::Debug for BrokerSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerSettings")
            .field("service_name", &self.service_name)
            .field("service_plan_name", &self.service_plan_name)
            .field("base_guid", &self.base_guid)
            .field("tags", &self.tags)
            .field("fake_async", &self.fake_async)
            .field("fake_stateful", &self.fake_stateful)
            .field("auth_user", &self.auth_user)
            .field("port", &self.port)
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl BrokerSettings {
    /// Resolves the raw settings into the typed, immutable [`ApiConfig`].
    ///
    /// # Errors
    /// Fails on an unparseable `PORT` or `ADDRESS`. A malformed `CREDENTIALS` document is
    /// not an error: it is logged and replaced by the placeholder credentials.
    pub fn resolve(self) -> Result<ApiConfig, ConfigError> {
        let defaults = BrokerConfig::default();

        let broker = BrokerConfig {
            service_name: non_empty(self.service_name).unwrap_or(defaults.service_name),
            plan_name: non_empty(self.service_plan_name).unwrap_or(defaults.plan_name),
            base_guid: non_empty(self.base_guid).unwrap_or(defaults.base_guid),
            credentials: non_empty(self.credentials)
                .map_or(defaults.credentials, |raw| parse_credentials(&raw)),
            tags: non_empty(self.tags).map_or(defaults.tags, |raw| parse_tags(&raw)),
            image_url: non_empty(self.image_url).unwrap_or_default(),
            syslog_drain_url: non_empty(self.syslog_drain_url),
            fake_async: flag(self.fake_async.as_deref()),
            fake_stateful: flag(self.fake_stateful.as_deref()),
        };

        let security = SecurityConfig {
            username: self.auth_user.unwrap_or_default(),
            password: self.auth_password.unwrap_or_default(),
        };

        let mut server = ServerConfig::default();
        if let Some(raw) = non_empty(self.port) {
            let port = raw.strip_prefix(':').unwrap_or(&raw);
            server.port = port
                .parse()
                .map_err(|err| ConfigError::invalid("PORT", format!("'{raw}': {err}")))?;
        }
        if let Some(raw) = non_empty(self.address) {
            server.address = raw
                .parse()
                .map_err(|err| ConfigError::invalid("ADDRESS", format!("'{raw}': {err}")))?;
        }

        Ok(ApiConfig::new(ApiConfigInner { server, security, broker }))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Only the literal `true` (any case) enables a flag.
fn flag(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.eq_ignore_ascii_case("true"))
}

fn parse_credentials(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|err| {
        warn!(error = %err, "CREDENTIALS is not valid JSON, using placeholder credentials");
        default_credentials()
    })
}
