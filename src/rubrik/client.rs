//! Rubrik CDM REST Client
//!
//! A thin client for the internal statistics API of a Rubrik cluster.
//!
//! # Architecture
//!
//! - **Transport**: HTTPS via `reqwest`, one request per resource
//! - **Authentication**: API token sent as a bearer token
//! - **TLS**: Rubrik nodes ship self-signed certificates, so certificate and
//!   hostname checks are off unless `verify_ssl` is set for the region
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use secrecy::SecretString;
//! use zabbix_rubrik::config::RubrikEndpoint;
//! use zabbix_rubrik::rubrik::{RubrikClient, StatsSource};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let endpoint = RubrikEndpoint {
//!     region: "cbv".to_string(),
//!     node: Some("rubrik-cbv.example.net".to_string()),
//!     api_token: Some(SecretString::from("your-api-token")),
//!     timeout: Duration::from_secs(15),
//!     verify_ssl: false,
//! };
//!
//! let client = RubrikClient::connect(&endpoint)?;
//! let runway = client.runway_remaining().await?;
//! # Ok(())
//! # }
//! ```

use super::types::{RunwayRemaining, SystemStorage};
use super::StatsSource;
use crate::config::RubrikEndpoint;
use crate::error::{BridgeError, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Environment fallbacks used when the region has no node or token configured
pub const NODE_ENV: &str = "rubrik_cdm_node_ip";
pub const TOKEN_ENV: &str = "rubrik_cdm_token";

const USER_AGENT: &str = concat!("zabbix-rubrik/", env!("CARGO_PKG_VERSION"));

/// Client for one Rubrik cluster
pub struct RubrikClient {
    http: reqwest::Client,
    base_url: String,
    api_token: SecretString,
}

impl RubrikClient {
    /// Build a client for `endpoint`.
    ///
    /// No request is made here. Fails with [`BridgeError::Credentials`] when
    /// neither the configuration nor the environment supplies a node and a
    /// token.
    pub fn connect(endpoint: &RubrikEndpoint) -> Result<Self> {
        let node = endpoint
            .node
            .clone()
            .or_else(|| std::env::var(NODE_ENV).ok())
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| {
                BridgeError::Credentials(format!(
                    "no node configured for region '{}' and {} is not set",
                    endpoint.region, NODE_ENV
                ))
            })?;

        let api_token = endpoint
            .api_token
            .clone()
            .or_else(|| std::env::var(TOKEN_ENV).ok().map(SecretString::from))
            .filter(|t| !t.expose_secret().trim().is_empty())
            .ok_or_else(|| {
                BridgeError::Credentials(format!(
                    "no api_token configured for region '{}' and {} is not set",
                    endpoint.region, TOKEN_ENV
                ))
            })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(endpoint.timeout);

        if !endpoint.verify_ssl {
            // Custom TLS connector for self-signed certs
            let connector = native_tls::TlsConnector::builder()
                .danger_accept_invalid_certs(true)
                .danger_accept_invalid_hostnames(true)
                .build()?;
            builder = builder.use_preconfigured_tls(connector);
        }

        Ok(Self {
            http: builder.build()?,
            base_url: base_url(&node),
            api_token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET an endpoint of the internal API, e.g. `/stats/system_storage`
    async fn get_internal<T>(&self, path: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}/api/internal{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(self.api_token.expose_secret().trim())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BridgeError::RubrikApi(format!(
                "GET {} returned {}: {}",
                path,
                status,
                body.trim()
            )));
        }

        let text = response.text().await?;
        debug!("{} response: {}", path, text);
        serde_json::from_str(&text).map_err(|e| {
            BridgeError::RubrikApi(format!("unexpected response from {}: {}", path, e))
        })
    }
}

impl StatsSource for RubrikClient {
    async fn system_storage(&self) -> Result<SystemStorage> {
        self.get_internal("/stats/system_storage").await
    }

    async fn runway_remaining(&self) -> Result<RunwayRemaining> {
        self.get_internal("/stats/runway_remaining").await
    }
}

/// `https://<node>` unless the node already names a scheme
fn base_url(node: &str) -> String {
    let node = node.trim().trim_end_matches('/');
    if node.starts_with("http://") || node.starts_with("https://") {
        node.to_string()
    } else {
        format!("https://{}", node)
    }
}
