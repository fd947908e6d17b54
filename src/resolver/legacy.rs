//! Legacy resolver
//!
//! Last-resort substring scan. A coarse intent parser pulls a body hint and
//! a search term out of the query, then each record is scored by the first
//! rule it satisfies (no accumulation).

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, info, instrument};

use super::FeatureResolver;
use crate::catalog::{FeatureCatalog, FeatureRecord};
use crate::config::{DEFAULT_LEGACY_LIMIT, DEFAULT_LEGACY_SCAN_MULTIPLIER};
use crate::types::{Provider, Resolution, ResolveOutcome, ScoredCandidate};

const EXACT_NAME_SCORE: u32 = 100;
const NAME_SCORE: u32 = 50;
const KEYWORD_SCORE: u32 = 25;
const CATEGORY_SCORE: u32 = 10;

const STOP_WORDS: &[&str] = &["show", "me", "find", "the", "on", "in", "at", "crater", "craters"];

/// Body hints, checked in order; first hit wins
const BODY_HINTS: &[(&str, &[&str])] = &[
    ("moon", &["moon", "lunar", "selene"]),
    ("mars", &["mars", "martian", "red planet"]),
    ("mercury", &["mercury"]),
    ("venus", &["venus"]),
];

static CAPITALIZED_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("static capitalized word regex"));

/// Coarse query interpretation for the legacy scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryIntent {
    pub body: Option<&'static str>,
    pub search_term: String,
    pub raw_query: String,
}

impl QueryIntent {
    pub fn parse(query: &str) -> Self {
        let query_lower = query.to_lowercase();

        let body = BODY_HINTS
            .iter()
            .find(|(_, words)| words.iter().any(|w| query_lower.contains(w)))
            .map(|(body, _)| *body);

        // Capitalised words are taken as the feature name
        let capitalized: Vec<&str> = CAPITALIZED_WORD
            .find_iter(query)
            .map(|m| m.as_str())
            .collect();
        let base = if capitalized.is_empty() {
            query_lower
        } else {
            capitalized.join(" ")
        };

        let kept: Vec<&str> = base
            .split_whitespace()
            .filter(|w| !STOP_WORDS.contains(&w.to_lowercase().as_str()))
            .collect();
        let search_term = if kept.is_empty() {
            base.clone()
        } else {
            kept.join(" ")
        };

        Self {
            body,
            search_term,
            raw_query: query.to_string(),
        }
    }
}

pub struct LegacyResolver {
    limit: usize,
    scan_multiplier: usize,
}

impl Default for LegacyResolver {
    fn default() -> Self {
        Self::new(DEFAULT_LEGACY_LIMIT, DEFAULT_LEGACY_SCAN_MULTIPLIER)
    }
}

impl LegacyResolver {
    pub fn new(limit: usize, scan_multiplier: usize) -> Self {
        Self {
            limit,
            scan_multiplier,
        }
    }

    /// Scan the catalog for `term`, optionally restricted to one body.
    ///
    /// Collection stops once `limit * scan_multiplier` records have matched,
    /// so on large catalogs this is an approximate top-K.
    pub fn search<'a>(
        &self,
        term: &str,
        body: Option<&str>,
        limit: usize,
        catalog: &'a FeatureCatalog,
    ) -> Vec<ScoredCandidate<'a>> {
        let term = term.to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        let cap = limit.saturating_mul(self.scan_multiplier);
        let mut results = Vec::new();

        for record in catalog {
            if body.is_some_and(|b| !record.is_on(b)) {
                continue;
            }

            let score = score_record(record, &term);
            if score > 0 {
                results.push(ScoredCandidate { record, score });
            }

            if results.len() >= cap {
                break;
            }
        }

        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(limit);
        results
    }

    /// Intent parse + scan, packaged as a resolution
    pub fn find(&self, query: &str, catalog: &FeatureCatalog) -> Option<Resolution> {
        let intent = QueryIntent::parse(query);
        debug!(
            "Legacy intent: body={:?} search_term='{}'",
            intent.body, intent.search_term
        );

        let ranked = self.search(&intent.search_term, intent.body, self.limit, catalog);
        let top_score = ranked.first()?.score;
        info!("Legacy search success: {} results", ranked.len());

        Resolution::from_ranked(&ranked, f64::from(top_score) / f64::from(EXACT_NAME_SCORE))
    }
}

fn score_record(record: &FeatureRecord, term: &str) -> u32 {
    let name = record.name.to_lowercase();
    if name == term {
        EXACT_NAME_SCORE
    } else if name.contains(term) {
        NAME_SCORE
    } else if record.keywords.iter().any(|kw| kw.to_lowercase().contains(term)) {
        KEYWORD_SCORE
    } else if record.category.to_lowercase().contains(term) {
        CATEGORY_SCORE
    } else {
        0
    }
}

#[async_trait]
impl FeatureResolver for LegacyResolver {
    fn provider(&self) -> Provider {
        Provider::Legacy
    }

    #[instrument(skip(self, catalog), fields(query = %query))]
    async fn resolve(&self, query: &str, catalog: &FeatureCatalog) -> ResolveOutcome {
        self.find(query, catalog).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> FeatureCatalog {
        FeatureCatalog::from_records(vec![
            FeatureRecord::new("Tycho B", "moon", "crater", -44.0, -13.9)
                .with_keywords(["tycho"]),
            FeatureRecord::new("Tycho", "moon", "crater", -43.3, -11.2)
                .with_keywords(["tycho", "crater"]),
            FeatureRecord::new("Mare Tranquillitatis", "moon", "mare", 8.5, 31.4)
                .with_keywords(["tranquility", "apollo"]),
            FeatureRecord::new("Olympus Mons", "mars", "mons", 18.65, -133.8)
                .with_keywords(["olympus", "volcano"]),
        ])
    }

    #[test]
    fn test_parse_capitalized_name() {
        let intent = QueryIntent::parse("Show me Tycho crater on the Moon");
        assert_eq!(intent.body, Some("moon"));
        // "Show" is capitalised but is a stop word; "Moon" is kept
        assert_eq!(intent.search_term, "Tycho Moon");
    }

    #[test]
    fn test_parse_lowercase_query() {
        let intent = QueryIntent::parse("find craters on mars");
        assert_eq!(intent.body, Some("mars"));
        assert_eq!(intent.search_term, "mars");

        let intent = QueryIntent::parse("show me the crater");
        assert_eq!(intent.body, None);
        assert_eq!(intent.search_term, "show me the crater");
    }

    #[test]
    fn test_parse_venus() {
        assert_eq!(QueryIntent::parse("venus plains").body, Some("venus"));
    }

    #[test]
    fn test_exact_name_ranks_first() {
        let resolver = LegacyResolver::default();
        let catalog = catalog();
        let results = resolver.search("tycho", None, 10, &catalog);
        assert_eq!(results[0].record.name, "Tycho");
        assert_eq!(results[0].score, 100);
        assert_eq!(results[1].record.name, "Tycho B");
        assert_eq!(results[1].score, 50);
    }

    #[test]
    fn test_priority_chain() {
        let resolver = LegacyResolver::default();
        let catalog = catalog();

        let results = resolver.search("apollo", None, 10, &catalog);
        assert_eq!(results[0].score, 25);

        let results = resolver.search("mare", None, 10, &catalog);
        assert_eq!(results[0].score, 50);

        let results = resolver.search("mons", Some("moon"), 10, &catalog);
        assert!(results.is_empty());
    }

    #[test]
    fn test_scan_stops_early() {
        let records: Vec<FeatureRecord> = (0..20)
            .map(|i| FeatureRecord::new(format!("Crater {i}"), "moon", "crater", 0.0, 0.0))
            .chain(std::iter::once(FeatureRecord::new(
                "crater", "moon", "crater", 0.0, 0.0,
            )))
            .collect();
        let catalog = FeatureCatalog::from_records(records);

        // limit 2 → scan stops after 6 hits, the exact match at the end is never seen
        let resolver = LegacyResolver::new(2, 3);
        let results = resolver.search("crater", None, 2, &catalog);
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|c| c.score == 50));

        let resolver = LegacyResolver::new(2, 100);
        let results = resolver.search("crater", None, 2, &catalog);
        assert_eq!(results[0].score, 100);
    }

    #[test]
    fn test_find_builds_resolution() {
        let resolver = LegacyResolver::default();
        let resolution = resolver.find("Show me Olympus Mons", &catalog()).unwrap();

        assert_eq!(resolution.result.feature_name.as_deref(), Some("Olympus Mons"));
        assert_eq!(resolution.result.layer_id, "mars_default");
        assert_eq!(resolution.result.confidence, 1.0);
    }

    #[test]
    fn test_find_nothing() {
        let resolver = LegacyResolver::default();
        assert!(resolver.find("Mercury craters", &catalog()).is_none());
    }
}
