#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::missing_docs_in_private_items)]
#![warn(clippy::pedantic)]

//! Stand-in processor service, accepting config PUTs at `/api/processors/:processor_id/config`
//!   and echoing them back. Binds `127.0.0.1:37497` unless `STUB_BIND_ADDR` says otherwise.

use region_probe::{
    logger::setup_tracing,
    stub::{router, StubState, BIND_ADDR_VAR, DEFAULT_BIND_ADDR},
};
use tracing::info;

/// Echo server for config requests
#[tokio::main]
async fn main() -> anyhow::Result<()> {

    setup_tracing()?;

    let bind_addr = std::env::var(BIND_ADDR_VAR).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    let app = router(StubState::default());

    // Start serving
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "stub processor listening");
    axum::serve(listener, app).await?;

    Ok(())
}
