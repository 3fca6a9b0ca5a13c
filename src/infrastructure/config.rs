use crate::domain::navigation::{manufacturer_links, NavLink};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub broker: BrokerSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub credentials: CredentialSettings,
    #[serde(default = "manufacturer_links")]
    pub navigation: Vec<NavLink>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BrokerSettings {
    /// Bare host name, no scheme
    pub host: String,
    pub port: u16,
    pub client_id: String,
    pub keep_alive_secs: u64,
    pub reconnect_delay_ms: u64,
}

impl Default for BrokerSettings {
    fn default() -> Self {
        Self {
            host: "mqtt.eclipseprojects.io".to_string(),
            port: 1883,
            client_id: "factory-dashboard".to_string(),
            keep_alive_secs: 60,
            reconnect_delay_ms: 1000,
        }
    }
}

impl BrokerSettings {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs)
    }

    pub fn reconnect_delay(&self) -> Duration {
        Duration::from_millis(self.reconnect_delay_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct BackendSettings {
    pub count_url: String,
    pub stock_url: String,
    pub orders_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            count_url: "http://127.0.0.1:8000/api/count/".to_string(),
            stock_url: "http://127.0.0.1:8000/api/products/".to_string(),
            orders_url: "http://127.0.0.1:8000/api/orders/".to_string(),
            timeout_secs: 10,
        }
    }
}

impl BackendSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CredentialSettings {
    /// Seeds the credential store's `access_token` entry at startup
    #[serde(default)]
    pub access_token: Option<String>,
}

pub fn load_app_config() -> anyhow::Result<AppConfig> {
    load_app_config_from("config/dashboard")
}

/// Load the optional config file at `path` (extension inferred), then apply
/// `DASHBOARD_<SECTION>__<KEY>` environment overrides.
pub fn load_app_config_from(path: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(path).required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}
