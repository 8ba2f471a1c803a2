//! AllRugby scraper.
//!
//! The listing is a wall of player cards for one country. Each card carries
//! the player's name (surname in bold, given name as a bare text node), a
//! link to the detail page, and an age in trailing text like `"24 years"`.
//!
//! Detail pages have no structured data at all: height and weight are mined
//! from the biography prose with regexes, and the career is a plain `<li>`
//! list.

use crate::extract::{ExtractError, FieldExtractor};
use crate::models::{FieldMap, PlayerRef, RosterMap};
use crate::utils::{collapse_ws, element_text};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::SiteScraper;

static AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})\s*years").unwrap());
static HEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)\s*(?:m|meter|meters)\b").unwrap());
static WEIGHT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d{1,2})?)\s*(?:kg|kgs|kilogram|kilograms)\b").unwrap());

pub struct AllRugby {
    base_url: String,
    country: String,
}

impl AllRugby {
    pub fn new(base_url: &str, country: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
        }
    }
}

impl SiteScraper for AllRugby {
    fn name(&self) -> &'static str {
        "allrugby"
    }

    fn title(&self) -> &'static str {
        "AllRugby"
    }

    fn listing_url(&self) -> String {
        format!("{}/players/{}", self.base_url, self.country)
    }

    fn profile_base(&self) -> String {
        self.base_url.clone()
    }

    fn extract_listing(&self, html: &str) -> RosterMap {
        let document = Html::parse_document(html);
        let card_selector = Selector::parse("div.bloc.jou").unwrap();
        let link_selector = Selector::parse("a[href]").unwrap();
        let surname_selector = Selector::parse("b").unwrap();

        let mut roster = RosterMap::new();
        for card in document.select(&card_selector) {
            let Some(link) = card.select(&link_selector).next() else {
                warn!("Skipping player card without a link");
                continue;
            };
            let Some(href) = link.value().attr("href") else {
                warn!("Skipping player card without an href");
                continue;
            };

            // The card renders "SURNAME Given"; the bolded surname goes last
            // in the display name.
            let surname = link
                .select(&surname_selector)
                .next()
                .map(|b| element_text(&b))
                .unwrap_or_default();
            // The surname renders once, first; a plain replace would also
            // eat it out of a given name that contains it as a substring.
            let given = collapse_ws(&element_text(&link).replacen(&surname, "", 1));
            let name = collapse_ws(&format!("{given} {surname}"));
            if name.is_empty() {
                warn!(href, "Skipping player card without a name");
                continue;
            }

            let mut player = PlayerRef::new(href);
            let card_text = element_text(&card);
            if let Some(caps) = AGE_RE.captures(&card_text) {
                if let Ok(age) = caps[1].parse::<i64>() {
                    player = player.with_seed("age", json!(age));
                }
            }

            roster.insert(name, player);
        }

        debug!(players = roster.len(), "Parsed AllRugby listing");
        roster
    }

    fn extractor(&self) -> &dyn FieldExtractor {
        &AllRugbyFields
    }
}

/// Detail-page extractor: biography prose plus a career list.
pub struct AllRugbyFields;

impl FieldExtractor for AllRugbyFields {
    fn field_names(&self) -> &[&'static str] {
        &["bio", "career", "height_m", "weight_kg"]
    }

    fn extract(&self, html: &str) -> Result<FieldMap, ExtractError> {
        let document = Html::parse_document(html);
        let bio_selector = Selector::parse("div.bio").unwrap();
        let career_selector = Selector::parse("div.parcours li").unwrap();

        let bio = document.select(&bio_selector).next().map(|b| element_text(&b));
        let career: Vec<Value> = document
            .select(&career_selector)
            .map(|li| json!(element_text(&li)))
            .filter(|v| v.as_str().is_some_and(|s| !s.is_empty()))
            .collect();

        // A page with neither a biography nor a career block is not a player
        // profile; treat it as a failed attempt so the fetch retries.
        if bio.is_none() && career.is_empty() {
            return Err(ExtractError::missing("div.bio / div.parcours"));
        }

        let (height, weight) = bio
            .as_deref()
            .map(extract_height_weight)
            .unwrap_or((None, None));

        let mut fields = FieldMap::new();
        fields.insert("bio".into(), bio.map(|b| json!(b)).unwrap_or(Value::Null));
        fields.insert("career".into(), Value::Array(career));
        fields.insert(
            "height_m".into(),
            height.map(|h| json!(h)).unwrap_or(Value::Null),
        );
        fields.insert(
            "weight_kg".into(),
            weight.map(|w| json!(w)).unwrap_or(Value::Null),
        );
        Ok(fields)
    }
}

/// Mine height (meters) and weight (kilograms) out of biography prose.
fn extract_height_weight(bio: &str) -> (Option<f64>, Option<f64>) {
    let bio = bio.to_lowercase();
    let height = HEIGHT_RE
        .captures(&bio)
        .and_then(|caps| caps[1].parse::<f64>().ok());
    let weight = WEIGHT_RE
        .captures(&bio)
        .and_then(|caps| caps[1].parse::<f64>().ok());
    (height, weight)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <html><body>
          <div class="bloc jou">
            <a href="/rugby/jane-doe.html"><b>DOE</b> Jane</a>
            24 years, Flanker
          </div>
          <div class="bloc jou">
            <a href="/rugby/john-roe.html"><b>ROE</b> John</a>
            no age listed here
          </div>
          <div class="bloc jou">
            <span>card with no link at all</span>
          </div>
        </body></html>
    "#;

    fn site() -> AllRugby {
        AllRugby::new("https://allrugby.example.com/", "united-states")
    }

    #[test]
    fn test_listing_extracts_names_hrefs_and_ages() {
        let roster = site().extract_listing(LISTING);

        assert_eq!(roster.len(), 2);
        let jane = &roster["Jane DOE"];
        assert_eq!(jane.detail_path, "/rugby/jane-doe.html");
        assert_eq!(jane.seed_fields["age"], serde_json::json!(24));
        // Age is optional on the listing.
        assert!(roster["John ROE"].seed_fields.is_empty());
    }

    #[test]
    fn test_listing_keeps_given_name_containing_surname() {
        // "Leeann" contains the bolded surname "Lee"; only the leading
        // surname occurrence may be stripped from the link text.
        let html = r#"
            <div class="bloc jou">
              <a href="/rugby/leeann-lee.html"><b>Lee</b> Leeann</a>
              22 years, Scrum-half
            </div>
        "#;
        let roster = site().extract_listing(html);
        assert_eq!(roster.len(), 1);
        assert!(roster.contains_key("Leeann Lee"));
    }

    #[test]
    fn test_listing_skips_malformed_cards() {
        // The linkless third card is dropped, not fatal.
        let roster = site().extract_listing(LISTING);
        assert!(!roster.is_empty());
    }

    #[test]
    fn test_listing_url_joins_country() {
        assert_eq!(
            site().listing_url(),
            "https://allrugby.example.com/players/united-states"
        );
    }

    #[test]
    fn test_fields_from_bio_and_career() {
        let html = r#"
            <div class="bio">Jane Doe stands 1.85 m tall and weighs 98 kg.
              She debuted in 2019.</div>
            <div class="parcours"><ul>
              <li>2019 - 2021 Example RFC</li>
              <li>2021 - now Sample Rugby</li>
            </ul></div>
        "#;
        let fields = AllRugbyFields.extract(html).unwrap();
        assert_eq!(fields["height_m"], serde_json::json!(1.85));
        assert_eq!(fields["weight_kg"], serde_json::json!(98.0));
        assert_eq!(fields["career"].as_array().unwrap().len(), 2);
        assert!(fields["bio"].as_str().unwrap().contains("debuted in 2019"));
    }

    #[test]
    fn test_fields_missing_measurements_become_null() {
        let html = r#"<div class="bio">A fine player with no listed measurements.</div>"#;
        let fields = AllRugbyFields.extract(html).unwrap();
        assert_eq!(fields["height_m"], serde_json::Value::Null);
        assert_eq!(fields["weight_kg"], serde_json::Value::Null);
    }

    #[test]
    fn test_unrecognizable_page_is_an_extract_error() {
        assert!(AllRugbyFields.extract("<html><body>404</body></html>").is_err());
    }

    #[test]
    fn test_height_weight_regex_variants() {
        assert_eq!(
            extract_height_weight("about 2 m and 105.5 kg"),
            (Some(2.0), Some(105.5))
        );
        assert_eq!(
            extract_height_weight("1.85 meters, 72 kilograms"),
            (Some(1.85), Some(72.0))
        );
        assert_eq!(extract_height_weight("no numbers here"), (None, None));
        // "90 km" must not read as a weight, "10 min" not as a height.
        assert_eq!(extract_height_weight("ran 90 km in 10 min"), (None, None));
    }
}
