//! Site-specific scrapers and the orchestration they all share.
//!
//! Each supported site implements [`SiteScraper`] once: where its listing
//! page lives, how to turn that listing into a roster, and how to extract the
//! fields of one detail page. Everything else — rendering, the concurrent
//! profile fetch with bounded retries, the JSON logs — is shared and lives in
//! [`scrape_site`].
//!
//! # Supported sites
//!
//! | Site | Module | Listing | Detail fields |
//! |------|--------|---------|---------------|
//! | AllRugby | [`allrugby`] | Country player wall | bio, career, height/weight mined from prose |
//! | RugbyPass | [`rugbypass`] | Team carousel | age, position, height, weight |
//! | World Athletics | [`worldathletics`] | Federation search table | birthdate, age, athlete code |
//! | Proballers | [`proballers`] | League roster tables | height, date of birth, per-game stats, bio |
//!
//! Sites share no parsing logic; their quirks are independent and the trait
//! boundary is the only abstraction worth having across them.

pub mod allrugby;
pub mod proballers;
pub mod rugbypass;
pub mod worldathletics;

use crate::extract::FieldExtractor;
use crate::models::{PlayerProfile, RosterMap};
use crate::outputs::json;
use crate::pipeline::{self, FetchOptions, HttpFetcher};
use crate::render::{RenderPage, render_off_thread};
use std::error::Error;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// One supported site: listing location, listing parser, field extractor.
pub trait SiteScraper: Send + Sync {
    /// Short identifier used in paths (`logs_<name>`) and routes.
    fn name(&self) -> &'static str;

    /// Human-readable site title for the web UI.
    fn title(&self) -> &'static str;

    /// Absolute URL of the listing page to render.
    fn listing_url(&self) -> String;

    /// Prefix joined with each roster entry's `detail_path` to form the
    /// profile URL.
    fn profile_base(&self) -> String;

    /// Parse one rendered listing page into a roster.
    ///
    /// Malformed rows are skipped with a warning; a listing parse never
    /// fails as a whole. An unrecognizable page yields an empty roster.
    fn extract_listing(&self, html: &str) -> RosterMap;

    /// The site's detail-page field extractor.
    fn extractor(&self) -> &dyn FieldExtractor;
}

/// Run the full pipeline for one site: render the listing, extract the
/// roster, fetch every profile concurrently, write the JSON logs.
///
/// A failed or empty listing short-circuits to an empty batch — "no data
/// available this run" — without touching the cached `player_data.json`, so
/// readers keep whatever was cached before. Only log-writing errors
/// propagate.
#[instrument(level = "info", skip_all, fields(site = site.name()))]
pub async fn scrape_site(
    site: &dyn SiteScraper,
    renderer: Arc<dyn RenderPage>,
    options: &FetchOptions,
    data_dir: &Path,
) -> Result<Vec<PlayerProfile>, Box<dyn Error>> {
    let listing_url = site.listing_url();
    info!(%listing_url, "Rendering listing page");

    let html = match render_off_thread(renderer, listing_url.clone()).await {
        Ok(html) => html,
        Err(e) => {
            warn!(%listing_url, error = %e, "Listing render failed; no data this run");
            return Ok(Vec::new());
        }
    };

    let roster = site.extract_listing(&html);
    if roster.is_empty() {
        warn!(%listing_url, "Listing produced no players; no data this run");
        return Ok(Vec::new());
    }
    info!(players = roster.len(), "Extracted roster");

    let dir = json::site_dir(data_dir, site.name());
    json::write_roster_log(&dir, &roster).await?;

    let fetcher = HttpFetcher::new(options.request_timeout);
    let batch = pipeline::fetch_all(
        &fetcher,
        &site.profile_base(),
        &roster,
        site.extractor(),
        options,
    )
    .await;

    json::write_batch(&dir, &batch).await?;
    Ok(batch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ExtractError;
    use crate::models::FieldMap;
    use crate::render::RenderError;

    struct NoFields;

    impl FieldExtractor for NoFields {
        fn field_names(&self) -> &[&'static str] {
            &[]
        }

        fn extract(&self, _html: &str) -> Result<FieldMap, ExtractError> {
            Ok(FieldMap::new())
        }
    }

    struct BareSite;

    impl SiteScraper for BareSite {
        fn name(&self) -> &'static str {
            "baresite"
        }

        fn title(&self) -> &'static str {
            "Bare Site"
        }

        fn listing_url(&self) -> String {
            "https://baresite.example.com/players".to_string()
        }

        fn profile_base(&self) -> String {
            "https://baresite.example.com".to_string()
        }

        fn extract_listing(&self, html: &str) -> RosterMap {
            let mut roster = RosterMap::new();
            if html.contains("jane-doe") {
                roster.insert(
                    "Jane Doe".to_string(),
                    crate::models::PlayerRef::new("/jane-doe"),
                );
            }
            roster
        }

        fn extractor(&self) -> &dyn FieldExtractor {
            &NoFields
        }
    }

    struct OutageRenderer;

    impl RenderPage for OutageRenderer {
        fn render(&self, _url: &str) -> Result<String, RenderError> {
            Err(RenderError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
        }
    }

    struct EmptyWallRenderer;

    impl RenderPage for EmptyWallRenderer {
        fn render(&self, _url: &str) -> Result<String, RenderError> {
            Ok("<html><body>maintenance, come back later</body></html>".to_string())
        }
    }

    /// Pre-seed a site directory with a cached batch, returning its bytes.
    fn seed_cache(data_dir: &Path) -> (std::path::PathBuf, Vec<u8>) {
        let path = json::batch_path(data_dir, BareSite.name());
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let bytes = br#"[{"name":"Cached Player","profile_url":"https://baresite.example.com/cached","status":"ok"}]"#.to_vec();
        std::fs::write(&path, &bytes).unwrap();
        (path, bytes)
    }

    #[tokio::test]
    async fn test_render_failure_is_empty_batch_and_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (batch_file, seeded) = seed_cache(dir.path());

        let batch = scrape_site(
            &BareSite,
            Arc::new(OutageRenderer),
            &FetchOptions::default(),
            dir.path(),
        )
        .await
        .unwrap();

        assert!(batch.is_empty());
        assert_eq!(std::fs::read(&batch_file).unwrap(), seeded);
        // Nothing gets logged for a run that produced no roster.
        assert!(!batch_file.with_file_name(json::ROSTER_FILE).exists());
    }

    #[tokio::test]
    async fn test_empty_listing_is_empty_batch_and_keeps_cache() {
        let dir = tempfile::tempdir().unwrap();
        let (batch_file, seeded) = seed_cache(dir.path());

        let batch = scrape_site(
            &BareSite,
            Arc::new(EmptyWallRenderer),
            &FetchOptions::default(),
            dir.path(),
        )
        .await
        .unwrap();

        assert!(batch.is_empty());
        assert_eq!(std::fs::read(&batch_file).unwrap(), seeded);
        assert!(!batch_file.with_file_name(json::ROSTER_FILE).exists());
    }
}
