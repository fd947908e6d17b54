//! Synonym table for bodies and feature types
//!
//! Maps a canonical concept ("moon", "mountain") to the lowercase aliases a
//! query or catalog entry might use for it ("lunar", "mons", "montes").
//! Shared read-only by the keyword and AI resolvers.

use once_cell::sync::Lazy;

/// What a canonical key names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConceptKind {
    /// A celestial body (scopes the candidate set)
    Body,
    /// A feature type (matched against category)
    FeatureType,
}

/// One canonical concept and its aliases
#[derive(Debug, Clone)]
pub struct SynonymGroup {
    pub canonical: &'static str,
    pub kind: ConceptKind,
    pub aliases: &'static [&'static str],
}

/// Ordered canonical → aliases mapping
///
/// Order matters: when several groups of the same kind hit a query, the
/// last one wins.
#[derive(Debug, Clone)]
pub struct SynonymTable {
    groups: Vec<SynonymGroup>,
}

static STANDARD: Lazy<SynonymTable> = Lazy::new(|| {
    use ConceptKind::*;

    SynonymTable::new(vec![
        group("moon", Body, &["moon", "luna", "selene", "lunar"]),
        group("mars", Body, &["mars", "martian", "red planet"]),
        group("mercury", Body, &["mercury"]),
        group(
            "mountain",
            FeatureType,
            &["mountain", "mountains", "mons", "montes", "peak", "peaks"],
        ),
        group("crater", FeatureType, &["crater", "craters"]),
        group(
            "valley",
            FeatureType,
            &["vallis", "valley", "valleys", "valles"],
        ),
        group("sea", FeatureType, &["mare", "maria", "sea", "seas"]),
        group("bay", FeatureType, &["sinus", "bay", "bays"]),
        group(
            "ridge",
            FeatureType,
            &["dorsum", "dorsa", "ridge", "ridges"],
        ),
        group("plain", FeatureType, &["planitia", "plains", "plain"]),
    ])
});

fn group(
    canonical: &'static str,
    kind: ConceptKind,
    aliases: &'static [&'static str],
) -> SynonymGroup {
    SynonymGroup {
        canonical,
        kind,
        aliases,
    }
}

/// Body and feature-type hints found in a query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedConcepts {
    pub body: Option<&'static str>,
    pub feature_type: Option<&'static str>,
}

impl SynonymTable {
    pub fn new(groups: Vec<SynonymGroup>) -> Self {
        Self { groups }
    }

    /// The planetary table shared by all resolvers
    pub fn standard() -> &'static SynonymTable {
        &STANDARD
    }

    pub fn groups(&self) -> &[SynonymGroup] {
        &self.groups
    }

    /// Aliases for a canonical key, or the key itself when unknown
    pub fn expand<'a>(&self, key: &'a str) -> Vec<&'a str> {
        match self.groups.iter().find(|g| g.canonical == key) {
            Some(g) => g.aliases.to_vec(),
            None => vec![key],
        }
    }

    /// Scan a lowercased query for body and feature-type aliases
    pub fn detect(&self, query_lower: &str) -> DetectedConcepts {
        let mut detected = DetectedConcepts::default();

        for g in &self.groups {
            if !g.aliases.iter().any(|alias| query_lower.contains(alias)) {
                continue;
            }
            match g.kind {
                ConceptKind::Body => detected.body = Some(g.canonical),
                ConceptKind::FeatureType => detected.feature_type = Some(g.canonical),
            }
        }

        detected
    }
}
