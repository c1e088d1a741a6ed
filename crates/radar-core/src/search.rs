//! The search pipeline: fetch, select, describe, group.

use thiserror::Error;

use crate::assemble::{assemble, GroupingPolicy};
use crate::model::{LocationGroup, LocationQuery, QueryError};
use crate::select::select_candidates;
use crate::store::{RecordStore, StoreError};
use crate::summary::{enrich_summaries, summarize, DescriptionGenerator};

/// Candidates handed to the text-generation service in one batch.
pub const ENRICHED_CANDIDATE_LIMIT: usize = 15;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no restrooms found in database")]
    NoDataAvailable,

    #[error("no restrooms found within the specified radius")]
    NoCandidatesInRadius,

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    #[error("record store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("unexpected search failure: {0}")]
    Unexpected(String),
}

impl From<StoreError> for SearchError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Unavailable(msg) => SearchError::StoreUnavailable(msg),
            StoreError::Query(msg) => SearchError::Unexpected(msg),
        }
    }
}

/// Which summary source and grouping policy a search uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchMode {
    /// Local summaries, one group per candidate.
    #[default]
    Fast,
    /// Generated summaries for the nearest candidates, grouped by building
    /// and address.
    Enriched,
}

impl SearchMode {
    #[must_use]
    pub fn grouping(self) -> GroupingPolicy {
        match self {
            SearchMode::Fast => GroupingPolicy::PerCandidate,
            SearchMode::Enriched => GroupingPolicy::ByBuildingAndAddress,
        }
    }

    /// Further cap applied after selection, if any.
    #[must_use]
    pub fn candidate_limit(self) -> Option<usize> {
        match self {
            SearchMode::Fast => None,
            SearchMode::Enriched => Some(ENRICHED_CANDIDATE_LIMIT),
        }
    }

    /// Whether an empty radius is reported as [`SearchError::NoCandidatesInRadius`]
    /// rather than as an empty result.
    #[must_use]
    pub fn empty_radius_is_error(self) -> bool {
        matches!(self, SearchMode::Fast)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SearchMode::Fast => "fast",
            SearchMode::Enriched => "enriched",
        }
    }
}

/// Runs searches against a record store, optionally enriching summaries.
///
/// Holds no per-request state; one instance is shared by every request.
#[derive(Debug)]
pub struct SearchService<S, G> {
    store: S,
    generator: Option<G>,
}

impl<S, G> SearchService<S, G>
where
    S: RecordStore,
    G: DescriptionGenerator,
{
    /// A service whose enriched path falls back to local summaries.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            generator: None,
        }
    }

    #[must_use]
    pub fn with_generator(store: S, generator: Option<G>) -> Self {
        Self { store, generator }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Nearest restroom groups to `query`, closest first.
    ///
    /// # Errors
    ///
    /// - [`SearchError::NoDataAvailable`] when the store returns no records.
    /// - [`SearchError::NoCandidatesInRadius`] when nothing lies within the
    ///   radius and `mode` is [`SearchMode::Fast`]. The enriched mode returns
    ///   an empty list instead.
    /// - [`SearchError::StoreUnavailable`] or [`SearchError::Unexpected`] when
    ///   the store fails.
    ///
    /// Text-generation failures never surface; those records get local
    /// summaries.
    pub async fn search(
        &self,
        query: &LocationQuery,
        mode: SearchMode,
    ) -> Result<Vec<LocationGroup>, SearchError> {
        let records = self.store.fetch_eligible_records().await?;
        if records.is_empty() {
            return Err(SearchError::NoDataAvailable);
        }

        let mut candidates = select_candidates(query, &records);
        tracing::debug!(
            mode = mode.as_str(),
            records = records.len(),
            candidates = candidates.len(),
            radius_miles = query.radius_miles(),
            "selected candidates"
        );

        if candidates.is_empty() {
            if mode.empty_radius_is_error() {
                return Err(SearchError::NoCandidatesInRadius);
            }
            return Ok(Vec::new());
        }

        if let Some(limit) = mode.candidate_limit() {
            candidates.truncate(limit);
        }

        let summaries: Vec<String> = match mode {
            SearchMode::Fast => candidates.iter().map(|c| summarize(&c.record)).collect(),
            SearchMode::Enriched => {
                let records: Vec<_> = candidates.iter().map(|c| c.record.clone()).collect();
                enrich_summaries(self.generator.as_ref(), &records).await
            }
        };

        let groups = assemble(&candidates, &summaries, mode.grouping());
        tracing::debug!(mode = mode.as_str(), groups = groups.len(), "assembled groups");
        Ok(groups)
    }
}

#[cfg(test)]
#[path = "search_test.rs"]
mod tests;
