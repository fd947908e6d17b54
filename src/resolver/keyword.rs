//! Keyword resolver
//!
//! Deterministic rule-based matching. Body and feature-type hints come from
//! the synonym table; every record in scope is scored on name, keyword and
//! category overlap with the query. A size word ("large", "tiny") adds a
//! bonus for records whose diameter fits.

use async_trait::async_trait;
use tracing::{debug, info, instrument};

use super::{mutual_contains, FeatureResolver};
use crate::catalog::{FeatureCatalog, FeatureRecord};
use crate::synonyms::SynonymTable;
use crate::types::{
    rank_candidates, Provider, Resolution, ResolveOutcome, ScoredCandidate, SizePreference,
};

/// Fixed confidence for keyword matches, below what the AI path can reach
pub const KEYWORD_CONFIDENCE: f64 = 0.7;

const NAME_SCORE: u32 = 50;
const KEYWORD_SCORE: u32 = 25;
const CATEGORY_SCORE: u32 = 30;
const SIZE_SCORE: u32 = 20;

pub struct KeywordResolver {
    synonyms: &'static SynonymTable,
}

impl Default for KeywordResolver {
    fn default() -> Self {
        Self::new(SynonymTable::standard())
    }
}

impl KeywordResolver {
    pub fn new(synonyms: &'static SynonymTable) -> Self {
        Self { synonyms }
    }

    /// Ranked candidates for a query, best first
    pub fn rank<'a>(&self, query: &str, catalog: &'a FeatureCatalog) -> Vec<ScoredCandidate<'a>> {
        let query_lower = query.trim().to_lowercase();
        if query_lower.is_empty() {
            return Vec::new();
        }

        let detected = self.synonyms.detect(&query_lower);
        let size = SizePreference::detect(&query_lower);
        debug!(
            "Keyword hints: body={:?} feature_type={:?} size={:?}",
            detected.body, detected.feature_type, size
        );

        let candidates = catalog
            .iter()
            .filter(|record| detected.body.map_or(true, |body| record.is_on(body)))
            .map(|record| ScoredCandidate {
                record,
                score: score_record(record, &query_lower, detected.feature_type, size),
            })
            .collect();

        rank_candidates(candidates)
    }

    pub fn search(&self, query: &str, catalog: &FeatureCatalog) -> Option<Resolution> {
        let ranked = self.rank(query, catalog);
        let resolution = Resolution::from_ranked(&ranked, KEYWORD_CONFIDENCE)?;

        info!(
            "Keyword provider match: '{}' with score {}",
            ranked[0].record.name, ranked[0].score
        );
        Some(resolution)
    }
}

fn score_record(
    record: &FeatureRecord,
    query_lower: &str,
    feature_type: Option<&str>,
    size: Option<SizePreference>,
) -> u32 {
    let mut score = 0;

    if mutual_contains(query_lower, &record.name.to_lowercase()) {
        score += NAME_SCORE;
    }

    if record
        .keywords
        .iter()
        .any(|kw| mutual_contains(query_lower, &kw.to_lowercase()))
    {
        score += KEYWORD_SCORE;
    }

    if let Some(feature_type) = feature_type {
        if record.category.to_lowercase().contains(feature_type) {
            score += CATEGORY_SCORE;
        }
    }

    // Only lifts records that already overlap the query
    if score > 0 {
        if let (Some(pref), Some(diameter)) = (size, record.diameter_km) {
            if pref.accepts(diameter) {
                score += SIZE_SCORE;
            }
        }
    }

    score
}

#[async_trait]
impl FeatureResolver for KeywordResolver {
    fn provider(&self) -> Provider {
        Provider::Keyword
    }

    #[instrument(skip(self, catalog), fields(query = %query))]
    async fn resolve(&self, query: &str, catalog: &FeatureCatalog) -> ResolveOutcome {
        self.search(query, catalog).into()
    }
}
