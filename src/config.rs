//! This module provides ProbeConfig, the location of the processor being configured.

use reqwest::Url;
use thiserror::Error;

use crate::region_map::STREAM_TAG;

/// Base URL of the locally running processor service
pub const DEFAULT_ENDPOINT: &str = "http://localhost:37497";
/// Processor whose config is replaced
pub const DEFAULT_PROCESSOR_ID: u32 = 101;
/// Environment variable overriding [`DEFAULT_ENDPOINT`]
pub const ENDPOINT_VAR: &str = "PROBE_ENDPOINT";
/// Environment variable overriding [`DEFAULT_PROCESSOR_ID`]
pub const PROCESSOR_ID_VAR: &str = "PROBE_PROCESSOR_ID";

/// Invalid endpoint settings
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Endpoint is not a URL
    #[error("invalid endpoint {0:?}: {1}")]
    InvalidEndpoint(String, String),
    /// Endpoint is a URL that cannot carry a path (e.g. `mailto:`)
    #[error("endpoint {0:?} cannot have a path")]
    CannotBeABase(String),
    /// Processor id is not an unsigned integer
    #[error("invalid processor id {0:?}")]
    InvalidProcessorId(String),
}

/// ProbeConfig says where the region map is sent and how it is tagged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Base URL of the processor service, without the API path
    pub endpoint: String,
    /// Processor whose config is replaced
    pub processor_id: u32,
    /// Stream tag prefixed to the message
    pub stream_tag: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            processor_id: DEFAULT_PROCESSOR_ID,
            stream_tag: STREAM_TAG.to_string(),
        }
    }
}

impl ProbeConfig {
    /// Reads the overrides from the process environment, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`ProbeConfig::from_env`], with variables resolved by `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let endpoint = lookup(ENDPOINT_VAR).unwrap_or(defaults.endpoint);
        let processor_id = match lookup(PROCESSOR_ID_VAR) {
            None => defaults.processor_id,
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidProcessorId(raw.clone()))?,
        };

        let config = Self {
            endpoint,
            processor_id,
            stream_tag: defaults.stream_tag,
        };
        // Fail at startup rather than at send time
        config.config_url()?;
        Ok(config)
    }

    /// Full URL of the processor's config resource, `<endpoint>/api/processors/<id>/config`
    pub fn config_url(&self) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&self.endpoint)
            .map_err(|err| ConfigError::InvalidEndpoint(self.endpoint.clone(), err.to_string()))?;
        let processor_id = self.processor_id.to_string();
        url.path_segments_mut()
            .map_err(|()| ConfigError::CannotBeABase(self.endpoint.clone()))?
            .pop_if_empty()
            .extend(["api", "processors", processor_id.as_str(), "config"]);
        Ok(url)
    }
}

// Hic sunt tests:

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

/// Builds a lookup over given variables
fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_default_config_url() {

    let url = ProbeConfig::default().config_url().unwrap();

    assert_eq!(url.as_str(), "http://localhost:37497/api/processors/101/config");
    assert_eq!(url.query(), None);
}

#[test]
fn test_no_overrides_gives_defaults() {

    let config = ProbeConfig::from_lookup(lookup_from(&[])).unwrap();

    assert_eq!(config, ProbeConfig::default());
    assert_eq!(config.stream_tag, "ProbeA-AP ");
}

#[test]
fn test_overrides_are_applied() {

    let config = ProbeConfig::from_lookup(lookup_from(&[
        (ENDPOINT_VAR, "http://127.0.0.1:8080"),
        (PROCESSOR_ID_VAR, "7"),
    ]))
    .unwrap();

    assert_eq!(
        config.config_url().unwrap().as_str(),
        "http://127.0.0.1:8080/api/processors/7/config"
    );
}

#[test]
fn test_endpoint_with_trailing_slash() {

    let config = ProbeConfig {
        endpoint: "http://localhost:37497/".to_string(),
        ..ProbeConfig::default()
    };

    assert_eq!(
        config.config_url().unwrap().as_str(),
        "http://localhost:37497/api/processors/101/config"
    );
}

#[test]
fn test_invalid_processor_id() {

    let result = ProbeConfig::from_lookup(lookup_from(&[(PROCESSOR_ID_VAR, "one-oh-one")]));

    assert_eq!(result, Err(ConfigError::InvalidProcessorId("one-oh-one".to_string())));
}

#[test]
fn test_invalid_endpoints() {

    let not_a_url = ProbeConfig::from_lookup(lookup_from(&[(ENDPOINT_VAR, "localhost")]));
    assert!(matches!(not_a_url, Err(ConfigError::InvalidEndpoint(..))));

    let no_path = ProbeConfig::from_lookup(lookup_from(&[(ENDPOINT_VAR, "mailto:probe@lab")]));
    assert_eq!(no_path, Err(ConfigError::CannotBeABase("mailto:probe@lab".to_string())));
}
}
