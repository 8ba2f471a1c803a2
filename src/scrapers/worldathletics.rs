//! World Athletics scraper.
//!
//! The athlete search page renders one federation's athletes into a results
//! table (the site ships hashed CSS-module class names, so selectors match on
//! class-name substrings). Detail pages carry a bio block with tag/value
//! spans: birthdate first, athlete code second. Age is computed from the
//! birthdate here rather than scraped.

use crate::extract::{ExtractError, FieldExtractor};
use crate::models::{FieldMap, PlayerRef, RosterMap};
use crate::utils::{age_from_birthdate, element_text, last_path_segment};
use scraper::{Html, Selector};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::SiteScraper;

pub struct WorldAthletics {
    base_url: String,
    country: String,
    country_slug: String,
}

impl WorldAthletics {
    pub fn new(base_url: &str, country: &str, country_slug: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            country: country.to_string(),
            country_slug: country_slug.to_string(),
        }
    }
}

impl SiteScraper for WorldAthletics {
    fn name(&self) -> &'static str {
        "worldathletics"
    }

    fn title(&self) -> &'static str {
        "World Athletics"
    }

    // The search page itself is the listing; the renderer is expected to
    // deliver it with the federation already selected.
    fn listing_url(&self) -> String {
        self.base_url.clone()
    }

    fn profile_base(&self) -> String {
        format!("{}/{}", self.base_url, self.country_slug)
    }

    fn extract_listing(&self, html: &str) -> RosterMap {
        let document = Html::parse_document(html);
        let row_selector = Selector::parse("table[class*='AthleteSearch_results'] tr").unwrap();
        let name_selector = Selector::parse("td[class*='AthleteSearch_name'] a[href]").unwrap();
        let cell_selector = Selector::parse("td").unwrap();

        let mut roster = RosterMap::new();
        for row in document.select(&row_selector) {
            let Some(link) = row.select(&name_selector).next() else {
                // Header row, or a row without a profile link.
                continue;
            };
            let name = element_text(&link);
            let Some(detail_path) = link.value().attr("href").and_then(last_path_segment) else {
                warn!(%name, "Skipping athlete row without a usable href");
                continue;
            };
            if name.is_empty() {
                warn!(%detail_path, "Skipping athlete row with an empty name");
                continue;
            }

            let mut player = PlayerRef::new(detail_path)
                .with_seed("country", json!(self.country));
            if let Some(gender_cell) = row.select(&cell_selector).nth(2) {
                player = player.with_seed("gender", json!(element_text(&gender_cell)));
            }
            roster.insert(name, player);
        }

        debug!(players = roster.len(), "Parsed World Athletics listing");
        roster
    }

    fn extractor(&self) -> &dyn FieldExtractor {
        &WorldAthleticsFields
    }
}

/// Detail-page extractor over the athlete bio tag/value spans.
pub struct WorldAthleticsFields;

impl FieldExtractor for WorldAthleticsFields {
    fn field_names(&self) -> &[&'static str] {
        &["age", "birthdate", "player_code"]
    }

    fn extract(&self, html: &str) -> Result<FieldMap, ExtractError> {
        let document = Html::parse_document(html);
        let container_selector =
            Selector::parse("div[class*='athletesBioDetailsContainer']").unwrap();
        let value_selector = Selector::parse("span[class*='athletesBioTagValue']").unwrap();

        let container = document
            .select(&container_selector)
            .next()
            .ok_or_else(|| ExtractError::missing("athletesBioDetailsContainer"))?;

        let mut values = container.select(&value_selector);
        // Birthdate renders as "12 Jun 1996 (29)"; only the date part is kept.
        let birthdate = values
            .next()
            .map(|span| element_text(&span))
            .map(|text| text.split(" (").next().unwrap_or_default().to_string());
        let player_code = values.next().map(|span| element_text(&span));

        let mut fields = FieldMap::new();
        match birthdate.filter(|b| !b.is_empty()) {
            Some(birthdate) => {
                fields.insert("age".into(), json!(age_from_birthdate(&birthdate)));
                fields.insert("birthdate".into(), json!(birthdate));
            }
            None => {
                fields.insert("age".into(), Value::Null);
                fields.insert("birthdate".into(), Value::Null);
            }
        }
        fields.insert(
            "player_code".into(),
            player_code.map(|c| json!(c)).unwrap_or(Value::Null),
        );
        Ok(fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"
        <table class="AthleteSearch_results__3W7HB"><tbody>
          <tr><th>Name</th><th>Event</th><th>Gender</th></tr>
          <tr>
            <td class="AthleteSearch_name__2z8I1"><a href="/athletes/united-states/jane-doe-14208194">Jane DOE</a></td>
            <td>100m</td>
            <td>Women</td>
          </tr>
          <tr>
            <td class="AthleteSearch_name__2z8I1"><span>row without link</span></td>
            <td>200m</td>
            <td>Men</td>
          </tr>
        </tbody></table>
    "#;

    fn site() -> WorldAthletics {
        WorldAthletics::new(
            "https://worldathletics.example.com/athletes",
            "United States",
            "united-states",
        )
    }

    #[test]
    fn test_listing_extracts_rows_with_seeds() {
        let roster = site().extract_listing(LISTING);
        assert_eq!(roster.len(), 1);

        let jane = &roster["Jane DOE"];
        assert_eq!(jane.detail_path, "/jane-doe-14208194");
        assert_eq!(jane.seed_fields["gender"], json!("Women"));
        assert_eq!(jane.seed_fields["country"], json!("United States"));
    }

    #[test]
    fn test_profile_base_includes_country_slug() {
        assert_eq!(
            site().profile_base(),
            "https://worldathletics.example.com/athletes/united-states"
        );
    }

    const DETAIL: &str = r#"
        <div class="athletesBio_athletesBioDetailsContainer__3_nDn">
          <div><span class="athletesBio_athletesBioTagValue__oKZC4">12 Jun 1996 (29)</span></div>
          <div><span class="athletesBio_athletesBioTagValue__oKZC4">14208194</span></div>
        </div>
    "#;

    #[test]
    fn test_fields_from_bio_spans() {
        let fields = WorldAthleticsFields.extract(DETAIL).unwrap();
        assert_eq!(fields["birthdate"], json!("12 Jun 1996"));
        assert_eq!(fields["player_code"], json!("14208194"));
        // Age is derived, not scraped; 1996 puts it well past 25.
        assert!(fields["age"].as_i64().unwrap() > 25);
    }

    #[test]
    fn test_unparseable_birthdate_gets_sentinel_age() {
        let html = r#"
            <div class="athletesBioDetailsContainer">
              <div><span class="athletesBioTagValue">sometime long ago</span></div>
            </div>
        "#;
        let fields = WorldAthleticsFields.extract(html).unwrap();
        assert_eq!(fields["age"], json!(-1));
        assert_eq!(fields["player_code"], Value::Null);
    }

    #[test]
    fn test_missing_bio_container_is_an_extract_error() {
        assert!(
            WorldAthleticsFields
                .extract("<html><body>nothing here</body></html>")
                .is_err()
        );
    }
}
