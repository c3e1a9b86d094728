use crate::metrics::{format_value, Metric};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One sample for the Zabbix trapper
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZabbixMetric {
    pub host: String,
    pub key: String,
    pub value: String,
}

impl ZabbixMetric {
    pub fn new(host: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Build one record per metric, preserving input order
pub fn make_packet(host: &str, region: &str, metrics: &[(Metric, Value)]) -> Vec<ZabbixMetric> {
    metrics
        .iter()
        .map(|(metric, value)| {
            let record = ZabbixMetric::new(host, metric.zabbix_key(region), format_value(value));
            debug!(
                "Packet.add host: {}, key: {}, val: {}",
                record.host, record.key, record.value
            );
            record
        })
        .collect()
}
