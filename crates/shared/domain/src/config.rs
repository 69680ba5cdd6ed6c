use serde::Deserialize;
use serde_json::{Value, json};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub const DEFAULT_SERVICE_NAME: &str = "some-service-name";
pub const DEFAULT_PLAN_NAME: &str = "shared";
pub const DEFAULT_BASE_GUID: &str = "29140B3F-0E69-4C7E-8A35";
pub const DEFAULT_TAGS: &str = "shared,worlds-simplest-service-broker";
pub const DEFAULT_PORT: u16 = 3000;

/// Credentials handed out when none (or nothing parseable) is configured.
#[must_use]
pub fn default_credentials() -> Value {
    json!({ "port": "4000" })
}

/// Splits a comma-separated tag list, dropping blanks.
#[must_use]
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(str::trim).filter(|t| !t.is_empty()).map(str::to_owned).collect()
}

/// Top-level configuration, resolved once at startup.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub broker: BrokerConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl ApiConfig {
    #[must_use]
    pub fn new(inner: ApiConfigInner) -> Self {
        Self { inner: Arc::new(inner) }
    }
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
}

/// HTTP Basic credentials the platform must present on every `/v2` call.
#[derive(Default, Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Broker identity and behavior flags.
///
/// `fake_async` makes provision, update, and deprovision answer as if the work were
/// deferred; `fake_stateful` advertises (and backs) instance/binding retrieval.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrokerConfig {
    pub service_name: String,
    pub plan_name: String,
    pub base_guid: String,
    pub credentials: Value,
    pub tags: Vec<String>,
    pub image_url: String,
    pub syslog_drain_url: Option<String>,
    pub fake_async: bool,
    pub fake_stateful: bool,
}

impl BrokerConfig {
    #[must_use]
    pub fn service_id(&self) -> String {
        format!("{}-service-{}", self.base_guid, self.service_name)
    }

    #[must_use]
    pub fn plan_id(&self) -> String {
        format!("{}-plan-{}", self.base_guid, self.plan_name)
    }
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: DEFAULT_PORT }
    }
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE_NAME.to_owned(),
            plan_name: DEFAULT_PLAN_NAME.to_owned(),
            base_guid: DEFAULT_BASE_GUID.to_owned(),
            credentials: default_credentials(),
            tags: parse_tags(DEFAULT_TAGS),
            image_url: String::new(),
            syslog_drain_url: None,
            fake_async: false,
            fake_stateful: false,
        }
    }
}
