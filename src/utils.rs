//! Small helpers shared by the site scrapers: whitespace normalization,
//! element text extraction, URL path handling, and age computation.

use chrono::{Datelike, Local, NaiveDate};
use scraper::ElementRef;
use tracing::warn;

/// Collapse all runs of whitespace into single spaces and trim the ends.
///
/// Scraped text nodes arrive full of newlines and indentation; every
/// extracted string field goes through this first.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The whitespace-collapsed text content of an element and its descendants.
pub fn element_text(element: &ElementRef) -> String {
    collapse_ws(&element.text().collect::<Vec<_>>().join(" "))
}

/// The last path segment of an href, with a leading slash.
///
/// Several sites link detail pages with absolute URLs whose final segment is
/// the athlete's slug; only that segment is kept as the `detail_path`.
///
/// ```text
/// "https://example.com/players/jane-doe/" -> Some("/jane-doe")
/// ```
pub fn last_path_segment(href: &str) -> Option<String> {
    let trimmed = href.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?;
    if segment.is_empty() {
        None
    } else {
        Some(format!("/{segment}"))
    }
}

/// Age in whole years for a birthdate like `"12 Jun 1996"`.
///
/// Returns `-1` when the date does not parse, matching the sentinel the rest
/// of the record format uses for unusable values.
pub fn age_from_birthdate(birthdate: &str) -> i64 {
    match NaiveDate::parse_from_str(birthdate.trim(), "%d %b %Y") {
        Ok(born) => {
            let today = Local::now().date_naive();
            let mut age = i64::from(today.year() - born.year());
            if (today.month(), today.day()) < (born.month(), born.day()) {
                age -= 1;
            }
            age
        }
        Err(e) => {
            warn!(birthdate, error = %e, "Could not parse birthdate");
            -1
        }
    }
}

/// Escape the handful of characters that matter inside HTML text and
/// attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapse_ws() {
        assert_eq!(collapse_ws("  Jane \n\t Doe "), "Jane Doe");
        assert_eq!(collapse_ws(""), "");
    }

    #[test]
    fn test_last_path_segment() {
        assert_eq!(
            last_path_segment("https://example.com/players/jane-doe/"),
            Some("/jane-doe".to_string())
        );
        assert_eq!(
            last_path_segment("/athletes/jane-doe-14208194"),
            Some("/jane-doe-14208194".to_string())
        );
        assert_eq!(last_path_segment(""), None);
        assert_eq!(last_path_segment("///"), None);
    }

    #[test]
    fn test_age_from_birthdate() {
        // Someone born in 1900 is over 100 by any clock this test runs under.
        assert!(age_from_birthdate("12 Jun 1900") > 100);
        assert_eq!(age_from_birthdate("not a date"), -1);
        assert_eq!(age_from_birthdate(""), -1);
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
