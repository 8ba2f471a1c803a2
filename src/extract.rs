//! The field-extraction seam between the fetch pipeline and site parsers.
//!
//! Each supported site implements [`FieldExtractor`] once. The pipeline never
//! knows which site it is fetching for; it only needs two things from an
//! extractor: turn one detail page into fields, and name the fields so a
//! degraded record can carry null sentinels for all of them.

use crate::models::FieldMap;
use thiserror::Error;

/// A detail page could not be interpreted at all.
///
/// This is reserved for total parse failure (landmark element missing,
/// unrecognizable markup). Missing *optional* fields must not produce this
/// error; extractors return null values for those instead. An `ExtractError`
/// feeds the retry path in the fetch pipeline, the same as a network error.
#[derive(Debug, Error)]
#[error("field extraction failed: {0}")]
pub struct ExtractError(pub String);

impl ExtractError {
    pub fn missing(landmark: &str) -> Self {
        Self(format!("landmark element not found: {landmark}"))
    }
}

/// Pure mapping from one detail page's HTML to that site's field set.
///
/// Implementations hold no connection state and are shared read-only across
/// all concurrent entity fetches of a batch.
pub trait FieldExtractor: Send + Sync {
    /// Every field this site normally reports, in the order they should
    /// appear as null sentinels on a degraded record.
    fn field_names(&self) -> &[&'static str];

    /// Extract the site's fields from one detail page.
    ///
    /// Returns `Err` only when the page is unusable as a whole.
    fn extract(&self, html: &str) -> Result<FieldMap, ExtractError>;
}
