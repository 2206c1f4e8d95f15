//! Token Bridge Bootstrap - one-shot setup of a custom Arbitrum token bridge
//!
//! Deploys the parent/child bridge and token contracts, links them, registers
//! the token pair with the canonical gateway router and bridges an initial
//! amount to the child chain.

use anyhow::Result;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

mod amount;
mod arbitrum;
mod artifacts;
mod chain;
mod config;
mod coordination;
mod error;
mod events;
mod state;
mod tx;

use chain::EthersConnector;
use config::Settings;

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();

    // Initialize logging
    init_logging();

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => warn!("Ignoring unreadable .env file: {}", e),
    }

    info!("Starting Token Bridge Bootstrap v{}", env!("CARGO_PKG_VERSION"));

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("Bootstrap aborted: {:#}", e);
            ExitCode::from(1)
        }
    }
}

async fn run() -> Result<u8> {
    let settings = Settings::load()?;
    let connector = EthersConnector::new(settings.clone());

    let report = coordination::execute(&settings, &connector).await;

    if let Some(path) = settings.bootstrap.record_target() {
        if let Err(e) = report.record.save(path) {
            warn!("Could not write deployment record: {}", e);
        }
    }

    Ok(report.exit_code())
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,token_bridge_bootstrap=debug,ethers=warn")
    });

    let json = std::env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
