use anyhow::{Context, Result};
use secrecy::SecretString;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "/etc/zabbix-rubrik/zabbix-rubrik.yaml";

/// Configuration file as written on disk. Every key is optional; defaults are
/// applied by [`Settings::resolve`].
#[derive(Debug, Deserialize, Clone, Default)]
pub struct FileConfig {
    #[serde(default)]
    pub zabbix: Option<ZabbixFileConfig>,
    /// Sequence of single-entry mappings, region name to connection details
    #[serde(default)]
    pub rubrik: Option<Vec<HashMap<String, Option<RegionConfig>>>>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ZabbixFileConfig {
    pub server: Option<String>,
    pub port: Option<u16>,
    pub host_name: Option<String>,
    pub timeout: Option<u64>,
    pub chunk_size: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct RegionConfig {
    pub node: Option<String>,
    pub api_token: Option<SecretString>,
    pub timeout: Option<u64>,
    pub verify_ssl: Option<bool>,
}

/// Resolved configuration for one invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub zabbix: ZabbixSettings,
    pub rubrik: RubrikEndpoint,
}

#[derive(Debug, Clone)]
pub struct ZabbixSettings {
    pub server: String,
    pub port: u16,
    pub host_name: String,
    pub timeout: Duration,
    pub chunk_size: usize,
}

/// Connection details for the requested region. `node` and `api_token` are
/// `None` when the region is not configured.
#[derive(Debug, Clone)]
pub struct RubrikEndpoint {
    pub region: String,
    pub node: Option<String>,
    pub api_token: Option<SecretString>,
    pub timeout: Duration,
    pub verify_ssl: bool,
}

fn default_server() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    10051
}

fn default_zabbix_timeout() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    250
}

fn default_rubrik_timeout() -> u64 {
    15
}

fn default_verify_ssl() -> bool {
    false
}

/// Local machine hostname, used as the Zabbix host when none is configured
pub fn local_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .unwrap_or_else(|| "localhost".to_string())
}

impl FileConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Load environment variables from .env if present
        dotenvy::dotenv().ok();

        let location = path.to_string_lossy().into_owned();
        let config = config::Config::builder()
            .add_source(config::File::new(&location, config::FileFormat::Yaml).required(true))
            .add_source(config::Environment::with_prefix("ZABBIX_RUBRIK").separator("__"))
            .build()
            .with_context(|| format!("Failed to read configuration file ({})", location))?;

        config
            .try_deserialize()
            .with_context(|| format!("Failed to deserialize configuration ({})", location))
    }

    /// Region names in file order
    pub fn region_names(&self) -> Option<Vec<String>> {
        self.rubrik.as_ref().map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.keys().next().cloned())
                .collect()
        })
    }

    /// Look up a region by name, ignoring case
    pub fn region(&self, name: &str) -> Option<&RegionConfig> {
        self.rubrik
            .as_ref()?
            .iter()
            .flat_map(|entry| entry.iter())
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .and_then(|(_, region)| region.as_ref())
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>, region: &str) -> Result<Self> {
        Ok(Self::resolve(&FileConfig::load(path)?, region))
    }

    pub fn resolve(file: &FileConfig, region: &str) -> Self {
        let zabbix = file.zabbix.clone().unwrap_or_default();
        let zabbix = ZabbixSettings {
            server: zabbix.server.unwrap_or_else(default_server),
            port: zabbix.port.unwrap_or_else(default_port),
            host_name: zabbix.host_name.unwrap_or_else(local_hostname),
            timeout: Duration::from_secs(zabbix.timeout.unwrap_or_else(default_zabbix_timeout)),
            chunk_size: zabbix.chunk_size.unwrap_or_else(default_chunk_size).max(1),
        };

        let found = file.region(region).cloned().unwrap_or_default();
        let rubrik = RubrikEndpoint {
            region: region.to_string(),
            node: found.node,
            api_token: found.api_token,
            timeout: Duration::from_secs(found.timeout.unwrap_or_else(default_rubrik_timeout)),
            verify_ssl: found.verify_ssl.unwrap_or_else(default_verify_ssl),
        };

        Self { zabbix, rubrik }
    }
}
