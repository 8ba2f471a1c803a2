//! RugbyPass scraper.
//!
//! The team page lists players in a flickity carousel; each cell links to a
//! profile whose URL ends in the player's slug. Detail pages expose a clean
//! key/value block (`div.player-details`), from which age, position, height
//! and weight are kept.

use crate::extract::{ExtractError, FieldExtractor};
use crate::models::{FieldMap, PlayerRef, RosterMap};
use crate::utils::{element_text, last_path_segment};
use scraper::{Html, Selector};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::SiteScraper;

/// Detail keys worth keeping; everything else in the block is ignored.
const KEPT_DETAILS: [&str; 4] = ["age", "position", "height", "weight"];

pub struct RugbyPass {
    base_url: String,
    team: String,
}

impl RugbyPass {
    pub fn new(base_url: &str, team: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            team: team.to_string(),
        }
    }
}

impl SiteScraper for RugbyPass {
    fn name(&self) -> &'static str {
        "rugbypass"
    }

    fn title(&self) -> &'static str {
        "RugbyPass"
    }

    fn listing_url(&self) -> String {
        format!("{}/teams/{}", self.base_url, self.team)
    }

    fn profile_base(&self) -> String {
        format!("{}/players", self.base_url)
    }

    fn extract_listing(&self, html: &str) -> RosterMap {
        let document = Html::parse_document(html);
        let cell_selector =
            Selector::parse("div.flickity-slider div.player-item.carousel-cell").unwrap();
        let name_selector = Selector::parse(".base .name .title").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();

        let mut roster = RosterMap::new();
        for cell in document.select(&cell_selector) {
            let Some(name_el) = cell.select(&name_selector).next() else {
                warn!("Skipping carousel cell without a name");
                continue;
            };
            let name = element_text(&name_el);

            // Card links are absolute ("{base}/players/jane-doe/"); only the
            // slug is kept as the detail path.
            let detail_path = cell
                .select(&link_selector)
                .next()
                .and_then(|a| a.value().attr("href"))
                .and_then(last_path_segment);
            let Some(detail_path) = detail_path else {
                warn!(%name, "Skipping carousel cell without a profile link");
                continue;
            };

            if name.is_empty() {
                warn!(%detail_path, "Skipping carousel cell with an empty name");
                continue;
            }
            roster.insert(name, PlayerRef::new(detail_path));
        }

        debug!(players = roster.len(), "Parsed RugbyPass listing");
        roster
    }

    fn extractor(&self) -> &dyn FieldExtractor {
        &RugbyPassFields
    }
}

/// Detail-page extractor over the `div.player-details` key/value block.
pub struct RugbyPassFields;

impl FieldExtractor for RugbyPassFields {
    fn field_names(&self) -> &[&'static str] {
        &["age", "height", "position", "weight"]
    }

    fn extract(&self, html: &str) -> Result<FieldMap, ExtractError> {
        let document = Html::parse_document(html);
        let details_selector = Selector::parse("div.player-details").unwrap();
        let detail_selector = Selector::parse("div.detail").unwrap();
        let key_selector = Selector::parse("h3").unwrap();
        let value_selector = Selector::parse("div").unwrap();

        // Only the first player-details block; team pages repeat it further
        // down for related players.
        let details = document
            .select(&details_selector)
            .next()
            .ok_or_else(|| ExtractError::missing("div.player-details"))?;

        let mut fields = FieldMap::new();
        for name in KEPT_DETAILS {
            fields.insert(name.into(), Value::Null);
        }

        for detail in details.select(&detail_selector) {
            let Some(key_el) = detail.select(&key_selector).next() else {
                continue;
            };
            let key = element_text(&key_el).to_lowercase();
            if !KEPT_DETAILS.contains(&key.as_str()) {
                continue;
            }
            // The value sits in the innermost div after the heading.
            if let Some(value_el) = detail.select(&value_selector).last() {
                fields.insert(key, json!(element_text(&value_el)));
            }
        }

        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <div class="flickity-viewport"><div class="flickity-slider">
          <div class="player-item carousel-cell">
            <a href="https://rugbypass.example.com/players/jane-doe/">
              <div class="base"><div class="name"><div class="title">Jane Doe</div></div></div>
            </a>
          </div>
          <div class="player-item carousel-cell">
            <div class="base"><div class="name"><div class="title">No Link</div></div></div>
          </div>
          <div class="player-item carousel-cell">
            <a href="https://rugbypass.example.com/players/john-roe/">
              <div class="base"><div class="name"><div class="title">John Roe</div></div></div>
            </a>
          </div>
        </div></div>
    "#;

    fn site() -> RugbyPass {
        RugbyPass::new("https://rugbypass.example.com", "usa")
    }

    #[test]
    fn test_listing_keeps_slug_only() {
        let roster = site().extract_listing(LISTING);
        assert_eq!(roster.len(), 2);
        assert_eq!(roster["Jane Doe"].detail_path, "/jane-doe");
        assert_eq!(roster["John Roe"].detail_path, "/john-roe");
    }

    #[test]
    fn test_listing_skips_cell_without_link() {
        let roster = site().extract_listing(LISTING);
        assert!(!roster.contains_key("No Link"));
    }

    #[test]
    fn test_profile_base_appends_players() {
        assert_eq!(site().profile_base(), "https://rugbypass.example.com/players");
    }

    #[test]
    fn test_fields_from_details_block() {
        let html = r#"
            <div class="player-details">
              <div class="detail"><h3>Age</h3><div>24</div></div>
              <div class="detail"><h3>Position</h3><div>Flanker</div></div>
              <div class="detail"><h3>Height</h3><div>185cm</div></div>
              <div class="detail"><h3>Points</h3><div>12</div></div>
            </div>
        "#;
        let fields = RugbyPassFields.extract(html).unwrap();
        assert_eq!(fields["age"], json!("24"));
        assert_eq!(fields["position"], json!("Flanker"));
        assert_eq!(fields["height"], json!("185cm"));
        // Unlisted detail stays a null sentinel; unknown keys are dropped.
        assert_eq!(fields["weight"], Value::Null);
        assert!(!fields.contains_key("points"));
    }

    #[test]
    fn test_missing_details_block_is_an_extract_error() {
        assert!(RugbyPassFields.extract("<html><body></body></html>").is_err());
    }
}
