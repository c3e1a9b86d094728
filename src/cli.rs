use crate::config::DEFAULT_CONFIG_FILE;
use crate::error::{BridgeError, Result};
use crate::metrics::Metric;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(author, version, about = "Zabbix Sender from Rubrik metrics", long_about = None)]
pub struct Args {
    /// Debug mode
    #[arg(short, long)]
    pub debug: bool,

    /// Return {#RUBRIKSITE} json
    #[arg(long)]
    pub discovery: bool,

    /// Region to query, e.g. cbv | vdr (mandatory when not in discovery mode)
    #[arg(short, long)]
    pub region: Option<String>,

    /// total | used | available | snapshot | liveMount | pendingSnapshot | cdp | miscellaneous | lastUpdateTime | runway_remaining
    #[arg(short, long)]
    pub metric: Option<String>,

    /// Send all metrics to zabbix
    #[arg(long)]
    pub send: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        env = "ZABBIX_RUBRIK_CONFIG",
        default_value = DEFAULT_CONFIG_FILE
    )]
    pub config: PathBuf,
}

/// Validated command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub discovery: bool,
    /// Lowercased region, always present outside discovery mode
    pub region: Option<String>,
    pub metric: Option<Metric>,
    /// Effective send mode, never set together with `discovery`
    pub send: bool,
    pub config_path: PathBuf,
}

impl Args {
    /// Apply the flag rules in order: discovery disables send, a region is
    /// required outside discovery, the metric must be known, and a single
    /// metric cannot be sent.
    pub fn validate(self) -> Result<Invocation> {
        let discovery = self.discovery;
        let send = self.send && !discovery;
        debug!("Sender mode '{}'", send);

        if !discovery && self.region.is_none() {
            return Err(BridgeError::Usage(
                "--region is required when we are not in discovery mode.".to_string(),
            ));
        }

        let metric = self.metric.as_deref().map(str::parse::<Metric>).transpose()?;
        debug!("Metric '{:?}'", metric);

        let region = self.region.map(|r| r.to_lowercase());
        debug!("Region '{:?}'", region);

        if metric.is_some() && self.send {
            return Err(BridgeError::Usage(
                "send is only available without the metric argument.".to_string(),
            ));
        }

        Ok(Invocation {
            discovery,
            region,
            metric,
            send,
            config_path: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Invocation> {
        let mut argv = vec!["zabbix-rubrik"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).expect("clap parse").validate()
    }

    #[test]
    fn test_region_is_lowercased() {
        let invocation = parse(&["-r", "CBV"]).unwrap();
        assert_eq!(invocation.region.as_deref(), Some("cbv"));
        assert!(!invocation.discovery);
        assert!(!invocation.send);
    }

    #[test]
    fn test_discovery_does_not_need_region() {
        let invocation = parse(&["--discovery"]).unwrap();
        assert!(invocation.discovery);
        assert_eq!(invocation.region, None);
    }

    #[test]
    fn test_discovery_forces_send_off() {
        let invocation = parse(&["--discovery", "--send"]).unwrap();
        assert!(invocation.discovery);
        assert!(!invocation.send);
    }

    #[test]
    fn test_missing_region_is_rejected() {
        let err = parse(&["--send"]).unwrap_err().to_string();
        assert_eq!(err, "--region is required when we are not in discovery mode.");
    }

    #[test]
    fn test_region_is_checked_before_metric() {
        let err = parse(&["-m", "bogus"]).unwrap_err().to_string();
        assert!(err.starts_with("--region is required"));
    }

    #[test]
    fn test_invalid_metric_is_rejected() {
        let err = parse(&["-r", "cbv", "-m", "bogus"]).unwrap_err().to_string();
        assert!(err.contains("Valid metrics are"));
    }

    #[test]
    fn test_metric_with_send_is_rejected() {
        let err = parse(&["-r", "cbv", "-m", "used", "--send"])
            .unwrap_err()
            .to_string();
        assert!(err.contains("without the metric argument"));
    }

    #[test]
    fn test_metric_with_send_is_rejected_even_in_discovery() {
        assert!(parse(&["--discovery", "-m", "used", "--send"]).is_err());
    }

    #[test]
    fn test_config_path_override() {
        let invocation = parse(&["-r", "cbv", "-c", "/tmp/zr.yaml"]).unwrap();
        assert_eq!(invocation.config_path, PathBuf::from("/tmp/zr.yaml"));
    }
}
