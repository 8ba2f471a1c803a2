//! Listing-page rendering behind a blocking seam.
//!
//! The original system drove a headless browser to load listing pages, a
//! coarse multi-second blocking operation. That discipline is kept here as
//! the [`RenderPage`] trait: rendering is a single synchronous call per
//! scrape target, and async callers must route it through
//! [`render_off_thread`] so a cooperatively-scheduled host (the presentation
//! server at startup) is never stalled by it.
//!
//! The shipped implementation, [`HttpRenderer`], fetches the listing over
//! plain HTTP with a desktop User-Agent. Sites that only populate their
//! listings via script would need a browser-backed implementation of the same
//! trait; nothing else in the pipeline changes.

use crate::pipeline::DESKTOP_USER_AGENT;
use reqwest::header::USER_AGENT;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("listing request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected listing status: {0}")]
    Status(reqwest::StatusCode),
    #[error("render task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A single blocking render of one listing page.
///
/// One renderer call owns whatever session it needs for that call and must
/// release it on every exit path.
pub trait RenderPage: Send + Sync {
    fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// [`RenderPage`] over a blocking HTTP GET.
///
/// A fresh `reqwest::blocking::Client` is built inside each call and dropped
/// with it, mirroring the one-session-per-scrape ownership the trait
/// requires. The blocking client may only be used off the async runtime,
/// which [`render_off_thread`] guarantees.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    timeout: Duration,
}

impl HttpRenderer {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl RenderPage for HttpRenderer {
    #[instrument(level = "info", skip(self))]
    fn render(&self, url: &str) -> Result<String, RenderError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client
            .get(url)
            .header(USER_AGENT, DESKTOP_USER_AGENT)
            .send()?;
        if !response.status().is_success() {
            return Err(RenderError::Status(response.status()));
        }
        let html = response.text()?;
        debug!(bytes = html.len(), "Rendered listing page");
        Ok(html)
    }
}

/// Run one blocking render on the blocking thread pool and await the result.
///
/// The join is awaited before any dependent fetch stage starts, so both
/// execution modes see the same sequential render-then-fetch pipeline.
pub async fn render_off_thread(
    renderer: Arc<dyn RenderPage>,
    url: String,
) -> Result<String, RenderError> {
    tokio::task::spawn_blocking(move || renderer.render(&url)).await?
}
