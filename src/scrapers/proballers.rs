//! Proballers scraper.
//!
//! The league roster page groups players into one table per letter. Rows give
//! name, team, age, height and home country up front, which become seed
//! fields. Detail pages carry an identity block (date of birth, height), a
//! per-game stat strip (points, rebounds, assists, steals, blocks) and a
//! biography paragraph.

use crate::extract::{ExtractError, FieldExtractor};
use crate::models::{FieldMap, PlayerRef, RosterMap};
use crate::utils::element_text;
use scraper::{Html, Selector};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::SiteScraper;

const GAME_STATS: [&str; 5] = ["points", "rebounds", "assists", "steals", "blocks"];

pub struct Proballers {
    base_url: String,
}

impl Proballers {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl SiteScraper for Proballers {
    fn name(&self) -> &'static str {
        "proballers"
    }

    fn title(&self) -> &'static str {
        "Proballers"
    }

    fn listing_url(&self) -> String {
        format!("{}/basketball/league/3/nba/players", self.base_url)
    }

    fn profile_base(&self) -> String {
        self.base_url.clone()
    }

    fn extract_listing(&self, html: &str) -> RosterMap {
        let document = Html::parse_document(html);
        let row_selector = Selector::parse("div.mb-3 table.table tbody tr").unwrap();
        let cell_selector = Selector::parse("td").unwrap();
        let player_link_selector = Selector::parse("a.list-player-entry").unwrap();
        let team_link_selector = Selector::parse("a.list-team-entry").unwrap();

        let mut roster = RosterMap::new();
        for row in document.select(&row_selector) {
            let Some(link) = row.select(&player_link_selector).next() else {
                warn!("Skipping roster row without a player link");
                continue;
            };
            let name = element_text(&link);
            let Some(href) = link.value().attr("href") else {
                warn!(%name, "Skipping roster row without an href");
                continue;
            };
            if name.is_empty() {
                warn!(href, "Skipping roster row with an empty name");
                continue;
            }

            let mut player = PlayerRef::new(href);
            if let Some(team_link) = row.select(&team_link_selector).next() {
                player = player.with_seed("team", json!(element_text(&team_link)));
                if let Some(team_href) = team_link.value().attr("href") {
                    player = player.with_seed("team_url", json!(team_href));
                }
            }

            // Remaining cells: age, height, home country. Any one of them
            // may be missing without dropping the row.
            let cells: Vec<String> = row
                .select(&cell_selector)
                .map(|td| element_text(&td))
                .collect();
            for (index, key) in [(2, "age"), (3, "height"), (4, "home_country")] {
                if let Some(value) = cells.get(index).filter(|v| !v.is_empty()) {
                    player = player.with_seed(key, json!(value));
                }
            }

            roster.insert(name, player);
        }

        debug!(players = roster.len(), "Parsed Proballers listing");
        roster
    }

    fn extractor(&self) -> &dyn FieldExtractor {
        &ProballersFields
    }
}

/// Detail-page extractor: identity block, stat strip, biography.
pub struct ProballersFields;

impl FieldExtractor for ProballersFields {
    fn field_names(&self) -> &[&'static str] {
        &[
            "assists",
            "bio",
            "blocks",
            "date_of_birth",
            "height",
            "points",
            "rebounds",
            "steals",
        ]
    }

    fn extract(&self, html: &str) -> Result<FieldMap, ExtractError> {
        let document = Html::parse_document(html);
        let profile_info_selector =
            Selector::parse("div.identity__stats div.identity__stats__profil span.info").unwrap();
        let stat_selector =
            Selector::parse("ul.identity__stats__stats li span.stat").unwrap();
        let bio_selector = Selector::parse("div.banner__biography__content p").unwrap();
        let stats_landmark = Selector::parse("div.identity__stats").unwrap();

        if document.select(&stats_landmark).next().is_none() {
            return Err(ExtractError::missing("div.identity__stats"));
        }

        let mut fields = FieldMap::new();
        for name in self.field_names() {
            fields.insert((*name).into(), Value::Null);
        }

        let mut info = document.select(&profile_info_selector);
        if let Some(dob) = info.next() {
            fields.insert("date_of_birth".into(), json!(element_text(&dob)));
        }
        if let Some(height) = info.next() {
            fields.insert("height".into(), json!(element_text(&height)));
        }

        for (stat, name) in document.select(&stat_selector).zip(GAME_STATS) {
            fields.insert(name.into(), json!(element_text(&stat)));
        }

        if let Some(bio) = document.select(&bio_selector).next() {
            fields.insert("bio".into(), json!(element_text(&bio)));
        }

        Ok(fields)
    }
}
