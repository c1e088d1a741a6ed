//! Core search pipeline for the campus restroom locator.
//!
//! Nothing here performs I/O. Records and generated descriptions come in
//! through the traits in [`store`] and [`summary`], which the `radar-db` and
//! `radar-summarizer` crates implement.

pub mod app_config;
pub mod assemble;
pub mod config;
pub mod geo;
pub mod model;
pub mod search;
pub mod select;
pub mod store;
pub mod summary;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use assemble::{assemble, GroupingPolicy, MAX_GROUPS};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    directions_url, distance_miles, maps_search_url, walking_eta_minutes, BoundingBox, CAMPUS_BBOX,
};
pub use model::{
    LocationGroup, LocationQuery, QueryError, RestroomRecord, RestroomResult, RestroomType,
    ScoredCandidate, DEFAULT_RADIUS_MILES,
};
pub use search::{SearchError, SearchMode, SearchService, ENRICHED_CANDIDATE_LIMIT};
pub use select::{select_candidates, MAX_CANDIDATES};
pub use store::{MemoryRecordStore, RecordStore, StoreError};
pub use summary::{enrich_summaries, fallback_summary, summarize, DescriptionGenerator};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
