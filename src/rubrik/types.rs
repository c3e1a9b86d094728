//! Rubrik API Type Definitions
//!
//! Response shapes for the two internal statistics resources the bridge reads.
//!
//! - `GET /api/internal/stats/system_storage` → [`SystemStorage`]
//! - `GET /api/internal/stats/runway_remaining` → [`RunwayRemaining`]

use serde::Deserialize;
use serde_json::{Map, Value};

/// Cluster storage breakdown. Kept as a raw field map: the appliance mixes
/// byte counts with a `lastUpdateTime` timestamp string, and newer releases
/// add fields the bridge does not export.
pub type SystemStorage = Map<String, Value>;

/// Days until the cluster runs out of capacity at the current ingest rate
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RunwayRemaining {
    pub days: Value,
}
