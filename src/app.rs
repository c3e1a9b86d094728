//! Invocation Pipeline
//!
//! Turns a validated [`Invocation`] into output:
//!
//! ```text
//! --discovery            → discovery document
//! --region R --metric M  → single value
//! --region R             → every metric as a JSON object
//! --region R --send      → Zabbix packet pushed to the trapper
//! ```
//!
//! Every failure is fatal for the run. Nothing is retried.

use crate::cli::Invocation;
use crate::config::Settings;
use crate::discovery;
use crate::metrics::{format_value, Stats};
use crate::rubrik::{fetch_stats, RubrikClient, StatsSource};
use crate::zabbix::{make_packet, MetricSender, ZabbixSender};
use anyhow::Context;
use serde_json::{Map, Value};
use std::io::Write;
use tracing::debug;

/// Execute `invocation` against the real Rubrik cluster and Zabbix trapper
pub async fn run<W>(invocation: &Invocation, out: &mut W) -> anyhow::Result<()>
where
    W: Write,
{
    if invocation.discovery {
        let document = discovery::discover(&invocation.config_path)?;
        writeln!(out, "{}", document)?;
        return Ok(());
    }

    let region = invocation
        .region
        .as_deref()
        .context("--region is required when we are not in discovery mode.")?;
    let settings = Settings::load(&invocation.config_path, region)?;
    debug!(
        "Zabbix target is '{}:{}'",
        settings.zabbix.server, settings.zabbix.port
    );
    debug!("Region '{}'", region);
    debug!(
        "Rubrik Endpoint is '{}'",
        settings.rubrik.node.as_deref().unwrap_or("None")
    );

    let client = RubrikClient::connect(&settings.rubrik)
        .with_context(|| format!("Failed to connect to Rubrik region '{}'", region))?;
    let sender = ZabbixSender::new(&settings.zabbix);

    execute(invocation, &settings, &client, &sender, out).await
}

/// Query `source` and print or forward the result
pub async fn execute<S, T, W>(
    invocation: &Invocation,
    settings: &Settings,
    source: &S,
    sender: &T,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: StatsSource,
    T: MetricSender,
    W: Write,
{
    let region = settings.rubrik.region.as_str();

    let stats = fetch_stats(source, invocation.metric)
        .await
        .with_context(|| format!("Failed to query Rubrik region '{}'", region))?;

    match stats {
        Stats::Single { value, .. } => {
            writeln!(out, "{}", format_value(&value))?;
        }
        Stats::All(metrics) if !invocation.send => {
            let object: Map<String, Value> = metrics
                .into_iter()
                .map(|(metric, value)| (metric.as_str().to_string(), value))
                .collect();
            writeln!(out, "{}", discovery::to_spaced_json(&object)?)?;
        }
        Stats::All(metrics) => {
            let packet = make_packet(&settings.zabbix.host_name, region, &metrics);
            let response = sender.send(&packet).await.with_context(|| {
                format!(
                    "Failed to send metrics to Zabbix at {}:{}",
                    settings.zabbix.server, settings.zabbix.port
                )
            })?;
            debug!("Zabbix response: {}", response);
        }
    }

    Ok(())
}
