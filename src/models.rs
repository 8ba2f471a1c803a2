//! Data models for athlete rosters and their fetched profiles.
//!
//! This module defines the core data structures used throughout the application:
//! - [`PlayerRef`]: A minimal reference to one athlete, produced by a listing page
//! - [`RosterMap`]: The mapping of display name → [`PlayerRef`] for one scrape
//! - [`PlayerProfile`]: The terminal record written to the JSON log, one per roster entry
//! - [`RecordStatus`]: Whether a profile was fetched or degraded after exhausted retries
//!
//! Field maps use `BTreeMap` rather than `HashMap` so that identical inputs
//! always serialize to byte-identical JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Site-specific fields, keyed by snake_case field name.
pub type FieldMap = BTreeMap<String, Value>;

/// One listing page's output: unique display name → reference.
pub type RosterMap = BTreeMap<String, PlayerRef>;

/// A minimal reference to one athlete, extracted from a listing page.
///
/// `PlayerRef` is ephemeral: it is built fresh for every listing scrape and
/// consumed read-only by the profile fetcher.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerRef {
    /// Relative path of the athlete's detail page, appended to the site's
    /// profile base URL.
    pub detail_path: String,
    /// Fields already visible on the listing page (age, gender, team, ...)
    /// that are merged into the final record without a second fetch.
    #[serde(default)]
    pub seed_fields: FieldMap,
}

impl PlayerRef {
    /// A reference with no seed fields.
    pub fn new(detail_path: impl Into<String>) -> Self {
        Self {
            detail_path: detail_path.into(),
            seed_fields: FieldMap::new(),
        }
    }

    /// Attach one seed field, consuming and returning `self`.
    pub fn with_seed(mut self, key: &str, value: Value) -> Self {
        self.seed_fields.insert(key.to_string(), value);
        self
    }
}

/// Outcome marker on a [`PlayerProfile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Detail page fetched and extracted.
    Ok,
    /// Every retry exhausted; field values are null sentinels.
    Error,
}

/// One athlete's normalized record, the unit persisted to the JSON log.
///
/// Exactly one `PlayerProfile` exists per roster entry. On success the
/// site-specific fields come from the field extractor merged over the seed
/// fields. When all retries for an entity are exhausted a degraded record is
/// produced instead: same name and URL, `status: "error"`, and a null value
/// for every field the site normally reports — a batch is never short a
/// record.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerProfile {
    /// Display name, unique within a batch.
    pub name: String,
    /// Site-specific fields, flattened into the record.
    #[serde(flatten)]
    pub fields: FieldMap,
    /// Absolute URL of the fetched detail page.
    pub profile_url: String,
    /// Fetch outcome.
    pub status: RecordStatus,
}

impl PlayerProfile {
    /// Build a success record: extracted fields override seed fields on key
    /// collision, since the detail page is the fresher source.
    pub fn success(name: &str, profile_url: &str, seeds: &FieldMap, extracted: FieldMap) -> Self {
        let mut fields = seeds.clone();
        fields.extend(extracted);
        Self {
            name: name.to_string(),
            fields,
            profile_url: profile_url.to_string(),
            status: RecordStatus::Ok,
        }
    }

    /// Build the degraded placeholder emitted after exhausted retries.
    ///
    /// Seed fields are deliberately not carried over: once the detail fetch
    /// failed, the listing data for that athlete is unverified.
    pub fn degraded(name: &str, profile_url: &str, field_names: &[&str]) -> Self {
        let fields = field_names
            .iter()
            .map(|f| (f.to_string(), Value::Null))
            .collect();
        Self {
            name: name.to_string(),
            fields,
            profile_url: profile_url.to_string(),
            status: RecordStatus::Error,
        }
    }

    /// Whether this record is a degraded placeholder.
    pub fn is_degraded(&self) -> bool {
        self.status == RecordStatus::Error
    }
}
