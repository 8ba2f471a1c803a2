//! Validated runtime settings, built once from the CLI at startup.
//!
//! Base URLs are parsed with `url::Url` before any scraping starts; a
//! malformed value aborts the process rather than surfacing later as a
//! per-request failure.

use crate::cli::Cli;
use crate::pipeline::FetchOptions;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {source}")]
    InvalidBaseUrl {
        name: &'static str,
        #[source]
        source: url::ParseError,
    },
}

/// Validated settings shared by both execution modes.
#[derive(Debug, Clone)]
pub struct Settings {
    pub allrugby_base_url: String,
    pub rugbypass_base_url: String,
    pub worldathletics_base_url: String,
    pub proballers_base_url: String,
    pub retry_limit: u32,
    pub request_timeout: Duration,
    pub data_dir: PathBuf,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            allrugby_base_url: validate_base("ALLRUGBY_BASE_URL", &cli.allrugby_base_url)?,
            rugbypass_base_url: validate_base("RUGBYPASS_BASE_URL", &cli.rugbypass_base_url)?,
            worldathletics_base_url: validate_base(
                "WORLDATHLETICS_BASE_URL",
                &cli.worldathletics_base_url,
            )?,
            proballers_base_url: validate_base("PROBALLERS_BASE_URL", &cli.proballers_base_url)?,
            retry_limit: cli.retry_limit,
            request_timeout: Duration::from_secs(cli.request_timeout_secs),
            data_dir: PathBuf::from(&cli.data_dir),
        })
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            retry_limit: self.retry_limit,
            request_timeout: self.request_timeout,
            backoff: Duration::from_secs(1),
        }
    }
}

/// Parse-check a base URL and normalize away any trailing slash, since
/// detail paths are joined by plain concatenation.
fn validate_base(name: &'static str, value: &str) -> Result<String, ConfigError> {
    Url::parse(value).map_err(|source| ConfigError::InvalidBaseUrl { name, source })?;
    Ok(value.trim_end_matches('/').to_string())
}
