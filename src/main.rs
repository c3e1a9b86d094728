use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use zabbix_rubrik::{app, cli::Args};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing; stdout carries the value Zabbix reads
    let default_level = if args.debug { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if args.debug {
        info!("*** Debug mode is ON ***");
    }

    let invocation = match args.validate() {
        Ok(invocation) => invocation,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout();
    if let Err(e) = app::run(&invocation, &mut stdout).await {
        eprintln!("{:#}", e);
        std::process::exit(1);
    }
}
