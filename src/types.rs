//! Shared types for feature resolution

use serde::{Deserialize, Serialize};

use crate::catalog::FeatureRecord;
use crate::error::ResolverError;

const LARGE_WORDS: &[&str] = &["large", "largest", "big", "biggest", "huge", "giant"];
const SMALL_WORDS: &[&str] = &["small", "smallest", "tiny", "little"];

/// Size preference extracted from a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizePreference {
    /// Diameter above 50 km
    Large,
    /// Diameter below 10 km
    Small,
}

impl SizePreference {
    pub const LARGE_THRESHOLD_KM: f64 = 50.0;
    pub const SMALL_THRESHOLD_KM: f64 = 10.0;

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "large" => Some(Self::Large),
            "small" => Some(Self::Small),
            _ => None,
        }
    }

    /// Size words in a lowercased query; "small" wins if both appear
    pub fn detect(query_lower: &str) -> Option<Self> {
        let mut detected = None;
        for word in query_lower.split(|c: char| !c.is_alphanumeric()) {
            if LARGE_WORDS.contains(&word) {
                detected = detected.or(Some(Self::Large));
            } else if SMALL_WORDS.contains(&word) {
                detected = Some(Self::Small);
            }
        }
        detected
    }

    pub fn accepts(&self, diameter_km: f64) -> bool {
        match self {
            Self::Large => diameter_km > Self::LARGE_THRESHOLD_KM,
            Self::Small => diameter_km < Self::SMALL_THRESHOLD_KM,
        }
    }
}

/// Structured interpretation of a query
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedIntent {
    pub body: Option<String>,
    pub feature_type: Option<String>,
    pub feature_name: Option<String>,
    pub size_preference: Option<SizePreference>,
    /// Always within [0, 1]
    pub confidence: f64,
}

/// A catalog record with its accumulated score
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub record: &'a FeatureRecord,
    pub score: u32,
}

/// Drop zero scores and sort descending; ties keep catalog order.
pub fn rank_candidates(mut candidates: Vec<ScoredCandidate<'_>>) -> Vec<ScoredCandidate<'_>> {
    candidates.retain(|c| c.score > 0);
    // sort_by is stable
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

/// Which resolver produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    DeepSeek,
    Keyword,
    Legacy,
    None,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::DeepSeek => "deepseek",
            Provider::Keyword => "keyword",
            Provider::Legacy => "legacy",
            Provider::None => "none",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Common result shape every resolver produces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub body: String,
    pub lat: f64,
    pub lon: f64,
    pub layer_id: String,
    pub confidence: f64,
    pub tags: Vec<String>,
    pub feature_name: Option<String>,
}

impl SearchResult {
    /// Build from the winning record; `layer_id` is derived from the body
    /// and confidence is clamped to [0, 1].
    pub fn from_record(record: &FeatureRecord, confidence: f64) -> Self {
        Self {
            body: record.body.clone(),
            lat: record.lat,
            lon: record.lon,
            layer_id: layer_id_for(&record.body),
            confidence: clamp_confidence(confidence),
            tags: record.keywords.clone(),
            feature_name: Some(record.name.clone()),
        }
    }
}

pub fn layer_id_for(body: &str) -> String {
    format!("{}_default", body)
}

/// NaN maps to 0.0
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// A successful resolution: the result plus the ranked records behind it
///
/// `matches[0]` is the record the result was built from.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub result: SearchResult,
    pub matches: Vec<FeatureRecord>,
}

impl Resolution {
    pub fn from_ranked(ranked: &[ScoredCandidate<'_>], confidence: f64) -> Option<Self> {
        let best = ranked.first()?;
        Some(Self {
            result: SearchResult::from_record(best.record, confidence),
            matches: ranked.iter().map(|c| c.record.clone()).collect(),
        })
    }

    pub fn primary(&self) -> Option<&FeatureRecord> {
        self.matches.first()
    }
}

/// Outcome of a single resolver attempt
#[derive(Debug)]
pub enum ResolveOutcome {
    Matched(Resolution),
    /// Ran cleanly, nothing matched (or resolver not available)
    Absent,
    /// Something went wrong; the pipeline treats this as absence
    Failed(ResolverError),
}

impl ResolveOutcome {
    pub fn is_match(&self) -> bool {
        matches!(self, ResolveOutcome::Matched(_))
    }

    pub fn into_resolution(self) -> Option<Resolution> {
        match self {
            ResolveOutcome::Matched(r) => Some(r),
            _ => None,
        }
    }
}

impl From<Option<Resolution>> for ResolveOutcome {
    fn from(value: Option<Resolution>) -> Self {
        match value {
            Some(r) => ResolveOutcome::Matched(r),
            None => ResolveOutcome::Absent,
        }
    }
}
