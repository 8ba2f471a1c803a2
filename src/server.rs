//! The presentation server: cached batches behind a minimal web UI.
//!
//! One read endpoint per site renders the cached batch as an HTML table.
//! Cached state lives in explicit [`SiteCache`] objects with a `reload()`
//! operation — the server owns them and decides when to refresh, there are no
//! ambient globals. End users only ever see the last successfully cached
//! batch, or an empty listing when none exists yet; fetch errors never reach
//! the browser.

use crate::models::PlayerProfile;
use axum::Router;
use axum::extract::{Path as RoutePath, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::get;
use serde_json::Value;
use std::collections::BTreeSet;
use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::outputs::json;
use crate::utils::escape_html;

/// One site's cached batch, reloadable from its `player_data.json`.
pub struct SiteCache {
    site: &'static str,
    title: &'static str,
    path: PathBuf,
    players: RwLock<Vec<PlayerProfile>>,
}

impl SiteCache {
    pub fn new(site: &'static str, title: &'static str, path: PathBuf) -> Self {
        Self {
            site,
            title,
            path,
            players: RwLock::new(Vec::new()),
        }
    }

    /// Replace the cached batch with the current file contents.
    ///
    /// A missing or unreadable file leaves an empty cache rather than
    /// failing: "no data yet" is a servable state.
    #[instrument(level = "info", skip(self), fields(site = self.site))]
    pub async fn reload(&self) -> usize {
        let loaded = match json::load_batch(&self.path).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "No cached batch to load");
                Vec::new()
            }
        };
        let count = loaded.len();
        *self.players.write().await = loaded;
        info!(records = count, "Cache reloaded");
        count
    }

    pub async fn len(&self) -> usize {
        self.players.read().await.len()
    }

    async fn render_table(&self) -> String {
        let players = self.players.read().await;
        render_site_page(self.title, &players)
    }
}

/// Shared handler state: the caches, in display order.
#[derive(Clone)]
pub struct AppState {
    caches: Arc<Vec<Arc<SiteCache>>>,
}

impl AppState {
    pub fn new(caches: Vec<Arc<SiteCache>>) -> Self {
        Self {
            caches: Arc::new(caches),
        }
    }

    fn find(&self, site: &str) -> Option<&Arc<SiteCache>> {
        self.caches.iter().find(|c| c.site == site)
    }
}

/// Build the router: site index, per-site listing, health probe.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/healthz", get(|| async { "ok" }))
        .route("/sites/:site", get(site_page))
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(bind: &str, state: AppState) -> Result<(), Box<dyn Error>> {
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "Presentation server listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn home(State(state): State<AppState>) -> Html<String> {
    let mut items = String::new();
    for cache in state.caches.iter() {
        let count = cache.len().await;
        items.push_str(&format!(
            "<li><a href=\"/sites/{site}\">{title}</a> — {count} players</li>\n",
            site = cache.site,
            title = escape_html(cache.title),
        ));
    }
    Html(page(
        "Roster Scout",
        &format!("<h1>Roster Scout</h1>\n<ul>\n{items}</ul>"),
    ))
}

async fn site_page(
    State(state): State<AppState>,
    RoutePath(site): RoutePath<String>,
) -> Result<Html<String>, StatusCode> {
    let cache = state.find(&site).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Html(cache.render_table().await))
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\">\
         <title>{title}</title></head>\n<body>\n{body}\n</body></html>\n",
        title = escape_html(title),
    )
}

/// Render one batch as an HTML table.
///
/// Columns are the union of field keys across the batch so degraded records
/// (whose values render blank) line up with full ones.
fn render_site_page(title: &str, players: &[PlayerProfile]) -> String {
    if players.is_empty() {
        return page(title, &format!(
            "<h1>{}</h1>\n<p>No data available yet.</p>\n<p><a href=\"/\">Back</a></p>",
            escape_html(title)
        ));
    }

    let columns: BTreeSet<&str> = players
        .iter()
        .flat_map(|p| p.fields.keys().map(String::as_str))
        .collect();

    let mut table = String::from("<table border=\"1\">\n<tr><th>Name</th>");
    for column in &columns {
        table.push_str(&format!("<th>{}</th>", escape_html(column)));
    }
    table.push_str("<th>Profile</th></tr>\n");

    for player in players {
        table.push_str(&format!("<tr><td>{}</td>", escape_html(&player.name)));
        for column in &columns {
            let cell = match player.fields.get(*column) {
                Some(Value::String(s)) => escape_html(s),
                Some(Value::Null) | None => String::new(),
                Some(other) => escape_html(&other.to_string()),
            };
            table.push_str(&format!("<td>{cell}</td>"));
        }
        table.push_str(&format!(
            "<td><a href=\"{url}\">profile</a></td></tr>\n",
            url = escape_html(&player.profile_url),
        ));
    }
    table.push_str("</table>");

    page(
        title,
        &format!(
            "<h1>{}</h1>\n{}\n<p><a href=\"/\">Back</a></p>",
            escape_html(title),
            table
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FieldMap;
    use serde_json::json;

    fn sample_batch() -> Vec<PlayerProfile> {
        let mut extracted = FieldMap::new();
        extracted.insert("position".into(), json!("Flanker"));
        extracted.insert("height_m".into(), json!(1.85));
        vec![
            PlayerProfile::success("Jane Doe", "https://example.com/jane-doe", &FieldMap::new(), extracted),
            PlayerProfile::degraded("John Roe", "https://example.com/john-roe", &["position", "height_m"]),
        ]
    }

    #[tokio::test]
    async fn test_cache_reload_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = json::write_batch(dir.path(), &sample_batch()).await.unwrap();

        let cache = SiteCache::new("allrugby", "AllRugby", path);
        assert_eq!(cache.len().await, 0);
        assert_eq!(cache.reload().await, 2);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_cache_reload_with_missing_file_serves_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SiteCache::new(
            "allrugby",
            "AllRugby",
            dir.path().join("logs_allrugby/player_data.json"),
        );
        assert_eq!(cache.reload().await, 0);

        let html = cache.render_table().await;
        assert!(html.contains("No data available yet."));
    }

    #[test]
    fn test_table_renders_all_records_with_aligned_columns() {
        let html = render_site_page("AllRugby", &sample_batch());
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("John Roe"));
        assert!(html.contains("Flanker"));
        assert!(html.contains("<th>position</th>"));
        // Degraded record's null cells render blank, not "null".
        assert!(!html.contains("null"));
    }

    #[test]
    fn test_table_escapes_scraped_text() {
        let mut fields = FieldMap::new();
        fields.insert("bio".into(), json!("<script>alert(1)</script>"));
        let players = vec![PlayerProfile::success(
            "Jane <Doe>",
            "https://example.com/jane",
            &FieldMap::new(),
            fields,
        )];
        let html = render_site_page("AllRugby", &players);
        assert!(!html.contains("<script>"));
        assert!(html.contains("Jane &lt;Doe&gt;"));
    }

    #[tokio::test]
    async fn test_unknown_site_is_404() {
        let state = AppState::new(vec![]);
        let result = site_page(State(state), RoutePath("nope".to_string())).await;
        assert_eq!(result.unwrap_err(), StatusCode::NOT_FOUND);
    }
}
