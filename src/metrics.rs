//! Rubrik Metric Definitions
//!
//! The fixed set of capacity and runway metrics this bridge knows about.
//! [`Metric`] is the single source of truth for:
//!
//! - which values `--metric` accepts
//! - which Rubrik statistics resource supplies each value
//! - the Zabbix item key each value is sent under
//!
//! # Item Keys
//!
//! | Group            | Key                                              |
//! |------------------|--------------------------------------------------|
//! | system storage   | `rubrik.stats.system_storage.<field>[<region>]`  |
//! | runway remaining | `rubrik.stats.runway_remaining[<region>]`        |

use crate::error::BridgeError;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Statistics resource a metric is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatGroup {
    /// `/stats/system_storage`
    SystemStorage,
    /// `/stats/runway_remaining`
    RunwayRemaining,
}

/// A metric exposed by the bridge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Total,
    Used,
    Available,
    Snapshot,
    LiveMount,
    PendingSnapshot,
    Cdp,
    Miscellaneous,
    LastUpdateTime,
    RunwayRemaining,
}

impl Metric {
    /// Every metric, storage fields first and runway last
    pub const ALL: [Metric; 10] = [
        Metric::Total,
        Metric::Used,
        Metric::Available,
        Metric::Snapshot,
        Metric::LiveMount,
        Metric::PendingSnapshot,
        Metric::Cdp,
        Metric::Miscellaneous,
        Metric::LastUpdateTime,
        Metric::RunwayRemaining,
    ];

    /// Name accepted on the command line. For storage metrics this is also
    /// the field name in the `system_storage` response.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Total => "total",
            Metric::Used => "used",
            Metric::Available => "available",
            Metric::Snapshot => "snapshot",
            Metric::LiveMount => "liveMount",
            Metric::PendingSnapshot => "pendingSnapshot",
            Metric::Cdp => "cdp",
            Metric::Miscellaneous => "miscellaneous",
            Metric::LastUpdateTime => "lastUpdateTime",
            Metric::RunwayRemaining => "runway_remaining",
        }
    }

    pub fn group(&self) -> StatGroup {
        match self {
            Metric::RunwayRemaining => StatGroup::RunwayRemaining,
            _ => StatGroup::SystemStorage,
        }
    }

    /// Storage metrics only
    pub fn system_storage() -> impl Iterator<Item = Metric> {
        Self::ALL
            .into_iter()
            .filter(|m| m.group() == StatGroup::SystemStorage)
    }

    /// Zabbix item key for this metric on `region`
    pub fn zabbix_key(&self, region: &str) -> String {
        match self.group() {
            StatGroup::SystemStorage => {
                format!("rubrik.stats.system_storage.{}[{}]", self.as_str(), region)
            }
            StatGroup::RunwayRemaining => format!("rubrik.stats.runway_remaining[{}]", region),
        }
    }

    /// Names joined for help and error text
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(Metric::as_str)
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| {
                BridgeError::Usage(format!(
                    "Invalid metric in command arg.\nValid metrics are {}",
                    Self::valid_names()
                ))
            })
    }
}

/// Result of a statistics query
#[derive(Debug, Clone, PartialEq)]
pub enum Stats {
    /// One requested metric
    Single { metric: Metric, value: Value },
    /// Every metric that the appliance reported, in [`Metric::ALL`] order
    All(Vec<(Metric, Value)>),
}

/// Render a scalar the way the monitoring agent expects to read it:
/// strings bare, everything else as JSON text.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
