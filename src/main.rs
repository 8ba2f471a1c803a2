//! # Roster Scout
//!
//! Scrapes athlete profiles from four public sports sites, normalizes them
//! into one JSON record per athlete, and serves the cached results through a
//! minimal web UI.
//!
//! ## Pipeline
//!
//! 1. **Render**: load the site's listing page (a coarse blocking call, run
//!    off the async runtime)
//! 2. **Extract**: parse the listing into a roster of name → detail-page
//!    reference, skipping malformed rows
//! 3. **Fetch**: retrieve every athlete's detail page concurrently with
//!    bounded retries; exhausted retries produce a degraded record, never a
//!    missing one
//! 4. **Persist**: write the batch to `logs_<site>/player_data.json`
//! 5. **Serve** (`serve` mode): load the cached batches and expose them at
//!    `/sites/<name>`; sites missing their cache file are scraped at startup
//!
//! ## Usage
//!
//! ```sh
//! export ALLRUGBY_BASE_URL=... RUGBYPASS_BASE_URL=... \
//!        WORLDATHLETICS_BASE_URL=... PROBALLERS_BASE_URL=... RETRY_LIMIT=3
//! roster_scout scrape            # one-shot batch run
//! roster_scout serve             # scrape what's uncached, then serve
//! ```

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod extract;
mod models;
mod outputs;
mod pipeline;
mod render;
mod scrapers;
mod server;
mod utils;

use cli::{Cli, Command};
use config::Settings;
use outputs::json;
use render::{HttpRenderer, RenderPage};
use scrapers::{
    SiteScraper, allrugby::AllRugby, proballers::Proballers, rugbypass::RugbyPass,
    scrape_site, worldathletics::WorldAthletics,
};
use server::{AppState, SiteCache};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("roster_scout starting up");

    let args = Cli::parse();
    let settings = Settings::from_cli(&args)?;
    let sites = build_sites(&settings);
    let renderer: Arc<dyn RenderPage> = Arc::new(HttpRenderer::new(settings.request_timeout));
    let options = settings.fetch_options();

    match args.command {
        Command::Scrape { site } => {
            let selected: Vec<&Arc<dyn SiteScraper>> = match site.as_deref() {
                Some(name) => {
                    let Some(found) = sites.iter().find(|s| s.name() == name) else {
                        return Err(format!(
                            "unknown site {name:?}; expected one of: {}",
                            sites
                                .iter()
                                .map(|s| s.name())
                                .collect::<Vec<_>>()
                                .join(", ")
                        )
                        .into());
                    };
                    vec![found]
                }
                None => sites.iter().collect(),
            };

            for site in selected {
                let batch = scrape_site(
                    site.as_ref(),
                    Arc::clone(&renderer),
                    &options,
                    &settings.data_dir,
                )
                .await?;
                let degraded = batch.iter().filter(|r| r.is_degraded()).count();
                info!(
                    site = site.name(),
                    records = batch.len(),
                    degraded,
                    "Scrape complete"
                );
            }
        }
        Command::Serve { bind } => {
            let mut caches = Vec::new();
            for site in &sites {
                let path = json::batch_path(&settings.data_dir, site.name());
                if path.exists() {
                    info!(site = site.name(), "Cache present, skipping scrape");
                } else {
                    info!(site = site.name(), "Cache absent, scraping at startup");
                    if let Err(e) = scrape_site(
                        site.as_ref(),
                        Arc::clone(&renderer),
                        &options,
                        &settings.data_dir,
                    )
                    .await
                    {
                        warn!(site = site.name(), error = %e, "Startup scrape failed; serving empty");
                    }
                }

                let cache = Arc::new(SiteCache::new(site.name(), site.title(), path));
                cache.reload().await;
                caches.push(cache);
            }

            info!(
                elapsed_ms = start_time.elapsed().as_millis() as u64,
                "Startup complete"
            );
            server::serve(&bind, AppState::new(caches)).await?;
        }
    }

    info!(
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "Execution complete"
    );
    Ok(())
}

/// The four supported sites, with their fixed league/federation targets.
fn build_sites(settings: &Settings) -> Vec<Arc<dyn SiteScraper>> {
    vec![
        Arc::new(AllRugby::new(&settings.allrugby_base_url, "united-states")),
        Arc::new(RugbyPass::new(&settings.rugbypass_base_url, "usa")),
        Arc::new(WorldAthletics::new(
            &settings.worldathletics_base_url,
            "United States",
            "united-states",
        )),
        Arc::new(Proballers::new(&settings.proballers_base_url)),
    ]
}
