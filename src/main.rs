#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::pedantic)]

//! Builds the channel to region map, prints it and PUTs it to the processor config endpoint
//!   (`http://localhost:37497/api/processors/101/config` unless overridden by
//!   `PROBE_ENDPOINT` / `PROBE_PROCESSOR_ID`).
//! Any failure ends the process with a non-zero exit code, nothing is retried.

use region_probe::{config::ProbeConfig, logger::setup_tracing, probe};
use reqwest::Client;

/// One-shot region map probe
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {

    setup_tracing()?;

    let config = ProbeConfig::from_env()?;
    probe(&config, &Client::new(), &mut std::io::stdout().lock()).await?;

    Ok(())
}
