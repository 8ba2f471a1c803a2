//! Command-line interface definitions.
//!
//! All site base URLs and the retry limit come from flags or environment
//! variables. The required ones have no defaults on purpose: a process
//! without a configured target is a misconfiguration and must fail at
//! startup, not at request time.

use clap::{Parser, Subcommand};

/// Command-line arguments for roster_scout.
///
/// # Examples
///
/// ```sh
/// # One-shot scrape of every site
/// roster_scout scrape
///
/// # One site only
/// roster_scout scrape --site rugbypass
///
/// # Scrape whatever is uncached, then serve the web UI
/// roster_scout serve --bind 0.0.0.0:8080
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// AllRugby site root
    #[arg(long, env = "ALLRUGBY_BASE_URL")]
    pub allrugby_base_url: String,

    /// RugbyPass site root
    #[arg(long, env = "RUGBYPASS_BASE_URL")]
    pub rugbypass_base_url: String,

    /// World Athletics athlete-search root
    #[arg(long, env = "WORLDATHLETICS_BASE_URL")]
    pub worldathletics_base_url: String,

    /// Proballers site root
    #[arg(long, env = "PROBALLERS_BASE_URL")]
    pub proballers_base_url: String,

    /// Attempts per player profile before a degraded record is emitted
    #[arg(long, env = "RETRY_LIMIT")]
    pub retry_limit: u32,

    /// Per-request timeout in seconds (there is no per-batch timeout)
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 15)]
    pub request_timeout_secs: u64,

    /// Directory holding the per-site JSON logs
    #[arg(short, long, env = "DATA_DIR", default_value = "logs")]
    pub data_dir: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape and write the JSON logs, then exit
    Scrape {
        /// Only this site (allrugby, rugbypass, worldathletics, proballers)
        #[arg(short, long)]
        site: Option<String>,
    },
    /// Scrape any site missing its cache, then serve the web UI
    Serve {
        /// Address to bind the HTTP server to (host:port)
        #[arg(short, long, env = "BIND", default_value = "127.0.0.1:8080")]
        bind: String,
    },
}
