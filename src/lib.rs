//! Zabbix Rubrik Bridge
//!
//! Polls a Rubrik CDM cluster for capacity and runway metrics and hands them to
//! Zabbix, either as values printed for an external check or pushed to a
//! trapper with the Zabbix sender protocol.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐   HTTPS (internal    ┌──────────────┐
//! │   Rubrik    │ ◄──────────────────► │    Bridge    │
//! │   cluster   │   stats API)         │              │
//! └─────────────┘                      │  ┌────────┐  │   ZBXD/TCP    ┌────────────┐
//!                                      │  │ Client │  │ ────────────► │   Zabbix   │
//!                                      │  └────────┘  │  sender data  │  trapper   │
//!                                      │  ┌────────┐  │               └────────────┘
//!                                      │  │ Sender │  │
//!                                      │  └────────┘  │
//!                                      └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`cli`] - Command-line flags and their validation
//! - [`config`] - YAML configuration and defaults
//! - [`rubrik`] - Rubrik REST client and response types
//! - [`metrics`] - The fixed metric set and Zabbix item keys
//! - [`zabbix`] - Packet building and the sender protocol
//! - [`discovery`] - `{#RUBRIKSITE}` low-level discovery document
//! - [`app`] - Wiring of the above for one invocation
//! - [`error`] - Error types
//!
//! # Quick Start
//!
//! ```no_run
//! use clap::Parser;
//! use zabbix_rubrik::{app, cli::Args};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let invocation = Args::parse().validate()?;
//!     app::run(&invocation, &mut std::io::stdout()).await
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod metrics;
pub mod rubrik;
pub mod zabbix;
