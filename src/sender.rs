//! This module sends config text to a processor with a single PUT request.
//! There are no retries, any failure is returned to the caller as is.

use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use thiserror::Error;
use tracing::{error, info};

/// Body of a processor config request, `{"text": ...}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigRequest {
    /// Config text, interpreted by the processor
    pub text: String,
}

/// Failures of a config request
#[derive(Debug, Error)]
pub enum SendError {
    /// Request body could not be encoded
    #[error("failed to encode request body: {0}")]
    Serialize(#[from] serde_json::Error),
    /// Processor could not be reached (refused, DNS, timeout, ...)
    #[error("failed to reach {url}: {source}")]
    Connection {
        /// Target of the request
        url: Url,
        /// Transport error reported by the client
        #[source]
        source: reqwest::Error,
    },
    /// Processor answered with a non-success status
    #[error("{url} responded with {status}: {body}")]
    Status {
        /// Target of the request
        url: Url,
        /// Status of the response
        status: StatusCode,
        /// Response body, as far as it could be read
        body: String,
    },
}

/// PUTs `request` as JSON to `url` and returns the (successful) response status.
pub async fn send_config(
    client: &Client,
    url: &Url,
    request: &ConfigRequest,
) -> Result<StatusCode, SendError> {

    let start_time = Instant::now();
    let body = serde_json::to_vec(request)?;
    let request_len = body.len();

    let response = client
        .put(url.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await;

    match response {
        Err(err) => {
            error!(tag = "[OUTGOING API - ERROR]", request_method = "PUT", request_url = %url, request_bytes = request_len, error = %err, latency = format!("{:?}ms", start_time.elapsed().as_millis()));
            Err(SendError::Connection {
                url: url.clone(),
                source: err,
            })
        },
        Ok(response) => {
            let status = response.status();
            if status.is_success() {
                info!(tag = "[OUTGOING API]", request_method = "PUT", request_url = %url, request_bytes = request_len, status = %status, latency = format!("{:?}ms", start_time.elapsed().as_millis()));
                Ok(status)
            } else {
                let body = response.text().await.unwrap_or_default();
                error!(tag = "[OUTGOING API - ERROR]", request_method = "PUT", request_url = %url, request_bytes = request_len, status = %status, response = %body, latency = format!("{:?}ms", start_time.elapsed().as_millis()));
                Err(SendError::Status {
                    url: url.clone(),
                    status,
                    body,
                })
            }
        },
    }
}

// Hic sunt tests:
