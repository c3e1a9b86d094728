//! End-to-end tests of the invocation pipeline with a stub appliance and a
//! recording sender.

use clap::Parser;
use serde_json::json;
use std::io::Write;
use std::sync::Mutex;
use tempfile::NamedTempFile;
use zabbix_rubrik::app;
use zabbix_rubrik::cli::{Args, Invocation};
use zabbix_rubrik::config::{FileConfig, Settings};
use zabbix_rubrik::error::Result;
use zabbix_rubrik::rubrik::types::{RunwayRemaining, SystemStorage};
use zabbix_rubrik::rubrik::StatsSource;
use zabbix_rubrik::zabbix::{MetricSender, ZabbixMetric, ZabbixResponse};

const CONFIG: &str = r#"
zabbix:
  server: 127.0.0.1
  port: 10051
  host_name: zbx-host
rubrik:
  - cbv:
      node: rubrik-cbv.example.net
      api_token: token-cbv
  - vdr:
      node: rubrik-vdr.example.net
      api_token: token-vdr
"#;

struct StubRubrik;

impl StatsSource for StubRubrik {
    async fn system_storage(&self) -> Result<SystemStorage> {
        let value = json!({
            "total": 100000,
            "used": 12345,
            "available": 87655,
            "snapshot": 9000,
            "liveMount": 0,
            "pendingSnapshot": 100,
            "cdp": 0,
            "miscellaneous": 3245,
            "lastUpdateTime": "2024-05-01T10:00:00.000Z"
        });
        Ok(serde_json::from_value(value)?)
    }

    async fn runway_remaining(&self) -> Result<RunwayRemaining> {
        Ok(RunwayRemaining { days: json!(187) })
    }
}

#[derive(Default)]
struct RecordingSender {
    batches: Mutex<Vec<Vec<ZabbixMetric>>>,
}

impl MetricSender for RecordingSender {
    async fn send(&self, packet: &[ZabbixMetric]) -> Result<ZabbixResponse> {
        self.batches.lock().unwrap().push(packet.to_vec());
        Ok(ZabbixResponse {
            processed: packet.len() as u64,
            total: packet.len() as u64,
            chunks: 1,
            ..Default::default()
        })
    }
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes())
        .expect("Failed to write config");
    file
}

fn invocation(config: &NamedTempFile, args: &[&str]) -> Invocation {
    let path = config.path().to_string_lossy().into_owned();
    let mut argv = vec!["zabbix-rubrik", "--config", path.as_str()];
    argv.extend_from_slice(args);
    Args::try_parse_from(argv)
        .expect("clap parse")
        .validate()
        .expect("valid arguments")
}

fn settings(config: &NamedTempFile, region: &str) -> Settings {
    Settings::resolve(&FileConfig::load(config.path()).unwrap(), region)
}

#[tokio::test]
async fn test_discovery_prints_regions_in_file_order() {
    // Given: A configuration with regions cbv and vdr
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["--discovery"]);

    // When: Running in discovery mode
    let mut out = Vec::new();
    app::run(&invocation, &mut out).await.expect("discovery failed");

    // Then: The document lists both sites in order
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "[{\"{#RUBRIKSITE}\": \"cbv\"}, {\"{#RUBRIKSITE}\": \"vdr\"}]\n"
    );
}

#[tokio::test]
async fn test_discovery_without_rubrik_key_fails_naming_the_file() {
    // Given: A configuration with no rubrik key
    let config = write_config("zabbix:\n  server: 127.0.0.1\n");
    let invocation = invocation(&config, &["--discovery"]);

    // When: Running in discovery mode
    let mut out = Vec::new();
    let err = app::run(&invocation, &mut out)
        .await
        .expect_err("discovery should fail");

    // Then: The message names the configuration file
    let message = format!("{:#}", err);
    assert!(message.contains("'rubrik' is not found in the configuration file"));
    assert!(message.contains(&config.path().display().to_string()));
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_single_metric_prints_bare_value() {
    // Given: --region cbv --metric used against a stub appliance
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["--region", "cbv", "--metric", "used"]);
    let sender = RecordingSender::default();

    // When: Executing
    let mut out = Vec::new();
    app::execute(&invocation, &settings(&config, "cbv"), &StubRubrik, &sender, &mut out)
        .await
        .expect("query failed");

    // Then: Exactly the value is printed and nothing is sent
    assert_eq!(String::from_utf8(out).unwrap(), "12345\n");
    assert!(sender.batches.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_runway_metric_prints_days() {
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["-r", "cbv", "-m", "runway_remaining"]);

    let mut out = Vec::new();
    app::execute(
        &invocation,
        &settings(&config, "cbv"),
        &StubRubrik,
        &RecordingSender::default(),
        &mut out,
    )
    .await
    .expect("query failed");

    assert_eq!(String::from_utf8(out).unwrap(), "187\n");
}

#[tokio::test]
async fn test_all_metrics_print_as_object_with_runway_last() {
    // Given: --region cbv without --metric or --send
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["-r", "cbv"]);

    // When: Executing
    let mut out = Vec::new();
    app::execute(
        &invocation,
        &settings(&config, "cbv"),
        &StubRubrik,
        &RecordingSender::default(),
        &mut out,
    )
    .await
    .expect("query failed");

    // Then: Storage fields come first and runway_remaining last
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("{\"total\": 100000, \"used\": 12345"));
    assert!(text.trim_end().ends_with("\"runway_remaining\": 187}"));
}

#[tokio::test]
async fn test_send_pushes_one_batch_with_every_metric() {
    // Given: --region cbv --send against a stub appliance
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["--region", "cbv", "--send"]);
    let sender = RecordingSender::default();

    // When: Executing
    let mut out = Vec::new();
    app::execute(&invocation, &settings(&config, "cbv"), &StubRubrik, &sender, &mut out)
        .await
        .expect("send failed");

    // Then: The sender was called once with all ten records
    let batches = sender.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    let packet = &batches[0];
    assert_eq!(packet.len(), 10);
    assert!(packet.iter().all(|r| r.host == "zbx-host"));
    assert_eq!(
        packet[1],
        ZabbixMetric::new("zbx-host", "rubrik.stats.system_storage.used[cbv]", "12345")
    );
    assert_eq!(
        packet.last().unwrap(),
        &ZabbixMetric::new("zbx-host", "rubrik.stats.runway_remaining[cbv]", "187")
    );
    assert!(out.is_empty());
}

#[tokio::test]
async fn test_unknown_region_fails_on_connect() {
    // Given: A region that is not in the configuration
    let config = write_config(CONFIG);
    let invocation = invocation(&config, &["--region", "lon"]);

    // When: Running the real pipeline
    std::env::remove_var("rubrik_cdm_node_ip");
    let mut out = Vec::new();
    let err = app::run(&invocation, &mut out)
        .await
        .expect_err("missing credentials should fail");

    // Then: The failure names the region and the missing credentials
    let message = format!("{:#}", err);
    assert!(message.contains("'lon'"));
    assert!(message.contains("Missing Rubrik credentials"));
}
