pub mod client;
pub mod types;

pub use client::RubrikClient;

use crate::error::{BridgeError, Result};
use crate::metrics::{Metric, StatGroup, Stats};
use std::future::Future;
use tracing::{debug, warn};
use types::{RunwayRemaining, SystemStorage};

/// Source of the two Rubrik statistics resources
pub trait StatsSource {
    fn system_storage(&self) -> impl Future<Output = Result<SystemStorage>> + Send;

    fn runway_remaining(&self) -> impl Future<Output = Result<RunwayRemaining>> + Send;
}

/// Query the statistics needed for `metric`, or for every metric when `None`.
///
/// A single metric touches only the resource that supplies it.
pub async fn fetch_stats<S>(source: &S, metric: Option<Metric>) -> Result<Stats>
where
    S: StatsSource,
{
    match metric {
        Some(metric) => {
            let value = match metric.group() {
                StatGroup::SystemStorage => {
                    let storage = source.system_storage().await?;
                    debug!("system_storage: {:?}", storage);
                    storage.get(metric.as_str()).cloned().ok_or_else(|| {
                        BridgeError::RubrikApi(format!(
                            "field '{}' missing from /stats/system_storage",
                            metric
                        ))
                    })?
                }
                StatGroup::RunwayRemaining => {
                    let runway = source.runway_remaining().await?;
                    debug!("runway_remaining: {:?}", runway);
                    runway.days
                }
            };
            debug!("{}: {}", metric, value);
            Ok(Stats::Single { metric, value })
        }
        None => {
            let storage = source.system_storage().await?;
            debug!("system_storage: {:?}", storage);
            let runway = source.runway_remaining().await?;
            debug!("runway_remaining: {:?}", runway);

            let mut all = Vec::with_capacity(Metric::ALL.len());
            for metric in Metric::system_storage() {
                match storage.get(metric.as_str()) {
                    Some(value) => all.push((metric, value.clone())),
                    None => warn!("field '{}' missing from /stats/system_storage", metric),
                }
            }
            let ignored: Vec<&str> = storage
                .keys()
                .map(String::as_str)
                .filter(|field| Metric::system_storage().all(|m| m.as_str() != *field))
                .collect();
            if !ignored.is_empty() {
                debug!("Ignoring system_storage fields: {}", ignored.join(", "));
            }

            all.push((Metric::RunwayRemaining, runway.days));
            Ok(Stats::All(all))
        }
    }
}
