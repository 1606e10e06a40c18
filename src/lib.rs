#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::pedantic)]

//! Sends a channel to region map to a locally running processor's config endpoint.
//! `region-probe` builds, prints and sends the map; `stub-processor` stands in for the
//!   processor so the probe can be tried without it.

pub mod config;
pub mod logger;
pub mod region_map;
pub mod sender;
pub mod stub;

use reqwest::Client;
use std::io::Write;
use tracing::info;

use crate::{
    config::ProbeConfig,
    region_map::RegionMap,
    sender::{send_config, ConfigRequest},
};

/// Builds the default region map, writes it to `out` as one line and only then PUTs it to the
///   configured processor (the binary passes stdout). Returns the request that was sent.
pub async fn probe<W: Write>(
    config: &ProbeConfig,
    client: &Client,
    out: &mut W,
) -> anyhow::Result<ConfigRequest> {

    let url = config.config_url()?;
    let map = RegionMap::default();
    let request = ConfigRequest {
        text: map.to_message(&config.stream_tag),
    };

    writeln!(out, "{}", request.text)?;
    out.flush()?;

    info!(processor_id = config.processor_id, entries = map.len(), "sending region map");
    send_config(client, &url, &request).await?;
    Ok(request)
}

// Hic sunt tests:
