//! Persisted JSON logs, one directory per site.
//!
//! ```text
//! data_dir/
//! ├── logs_allrugby/
//! │   ├── player_profile_urls.json   # roster log (name → reference)
//! │   └── player_data.json           # the batch; its absence triggers a rescrape
//! ├── logs_rugbypass/
//! ├── logs_worldathletics/
//! └── logs_proballers/
//! ```
//!
//! `player_data.json` is the cache the presentation server reads. There is no
//! TTL: absence of the file is the only invalidation signal.

pub mod json;
