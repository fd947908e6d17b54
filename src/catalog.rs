//! Feature catalog
//!
//! The catalog is loaded once, before the first query, and shared read-only
//! by every resolver. It is passed in explicitly (usually as an
//! `Arc<FeatureCatalog>`) so tests can build fixtures in memory.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::CatalogError;

/// One named surface feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Feature name, e.g. "Tycho" (may be empty)
    #[serde(default)]
    pub name: String,

    /// Lowercase body identifier: moon, mars, mercury
    #[serde(default)]
    pub body: String,

    /// Free-text classification, e.g. "crater", "Mons"
    #[serde(default)]
    pub category: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub lat: f64,

    #[serde(default)]
    pub lon: f64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diameter_km: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
}

impl FeatureRecord {
    /// Minimal constructor used by fixtures and tools
    pub fn new(
        name: impl Into<String>,
        body: impl Into<String>,
        category: impl Into<String>,
        lat: f64,
        lon: f64,
    ) -> Self {
        Self {
            name: name.into(),
            body: body.into().to_lowercase(),
            category: category.into(),
            keywords: Vec::new(),
            lat,
            lon,
            diameter_km: None,
            origin: None,
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_diameter(mut self, diameter_km: f64) -> Self {
        self.diameter_km = Some(diameter_km);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into());
        self
    }

    /// Whether the coordinates fall inside the valid lat/lon ranges
    pub fn has_valid_coordinates(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lon)
    }

    /// Body comparison, case-insensitive
    pub fn is_on(&self, body: &str) -> bool {
        self.body.eq_ignore_ascii_case(body)
    }
}

/// Immutable, ordered collection of feature records
#[derive(Debug, Clone, Default)]
pub struct FeatureCatalog {
    records: Vec<FeatureRecord>,
}

impl FeatureCatalog {
    /// Build a catalog from records, normalising bodies to lowercase and
    /// dropping records with out-of-range coordinates.
    pub fn from_records(records: Vec<FeatureRecord>) -> Self {
        let total = records.len();
        let records: Vec<FeatureRecord> = records
            .into_iter()
            .filter(FeatureRecord::has_valid_coordinates)
            .map(|mut r| {
                r.body = r.body.to_lowercase();
                r
            })
            .collect();

        let skipped = total - records.len();
        if skipped > 0 {
            warn!("Skipped {} feature records with invalid coordinates", skipped);
        }

        Self { records }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Load a JSON array of feature records
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let records: Vec<FeatureRecord> = serde_json::from_str(&content)?;
        let catalog = Self::from_records(records);

        info!(
            "Loaded {} planetary features from {}",
            catalog.len(),
            path.display()
        );
        info!("Feature distribution: {:?}", catalog.body_distribution());

        Ok(catalog)
    }

    /// Load the catalog, degrading to an empty one if the file is missing
    /// or unreadable.
    pub fn load_or_empty(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            warn!("Feature catalog {} not found, searches will find nothing", path.display());
            return Self::empty();
        }

        match Self::load_json(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                warn!("Error loading features from {}: {}", path.display(), e);
                Self::empty()
            }
        }
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FeatureRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// First `n` records in catalog order
    pub fn sample(&self, n: usize) -> &[FeatureRecord] {
        &self.records[..n.min(self.records.len())]
    }

    /// Record count per body
    pub fn body_distribution(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for record in &self.records {
            let body = if record.body.is_empty() {
                "unknown".to_string()
            } else {
                record.body.clone()
            };
            *counts.entry(body).or_insert(0) += 1;
        }
        counts
    }
}

impl<'a> IntoIterator for &'a FeatureCatalog {
    type Item = &'a FeatureRecord;
    type IntoIter = std::slice::Iter<'a, FeatureRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
