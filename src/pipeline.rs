//! Resolution pipeline - AI, then keyword, then legacy
//!
//! ```text
//! query
//!   │
//!   ├── AiResolver (only if configured) ── match ──► found (provider: deepseek)
//!   │        │ absent / failed / timed out
//!   ▼        ▼
//!   ├── KeywordResolver ──────────────── match ──► found (provider: keyword)
//!   │        │ absent
//!   ▼        ▼
//!   ├── LegacyResolver ───────────────── match ──► found (provider: legacy)
//!   │        │ absent
//!   ▼        ▼
//!   └── not found + suggestions (provider: none)
//! ```
//!
//! A resolver failure is logged and treated as "no match"; it never aborts
//! the request.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{FeatureCatalog, FeatureRecord};
use crate::config::SearchConfig;
use crate::error::{LlmError, ResolverError};
use crate::resolver::{AiResolver, FeatureResolver, KeywordResolver, LegacyResolver};
use crate::types::{Provider, Resolution, ResolveOutcome};

/// Zoom level sent with every found response
pub const DEFAULT_ZOOM: u8 = 6;

pub const SUGGESTIONS: [&str; 4] = [
    r#"Try: "Show me Tycho crater""#,
    r#"Try: "Find valleys on Mars""#,
    r#"Try: "Show me Olympus Mons""#,
    r#"Try: "Mercury craters""#,
];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub name: String,
    pub category: String,
    pub diameter_km: Option<f64>,
    pub origin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedFeature {
    pub name: String,
    pub category: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&FeatureRecord> for RelatedFeature {
    fn from(record: &FeatureRecord) -> Self {
        Self {
            name: record.name.clone(),
            category: record.category.clone(),
            lat: record.lat,
            lon: record.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoundResponse {
    pub found: bool,
    pub body: String,
    pub center: Center,
    pub feature: FeatureSummary,
    pub zoom: u8,
    pub layer: String,
    pub confidence: f64,
    pub related_features: Vec<RelatedFeature>,
    pub total_results: usize,
    pub provider: Provider,
    pub search_time_ms: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotFoundResponse {
    pub found: bool,
    pub message: String,
    pub suggestions: Vec<String>,
    pub provider: Provider,
    pub search_time_ms: f64,
}

/// Envelope returned to callers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    Found(FoundResponse),
    NotFound(NotFoundResponse),
}

impl PipelineResponse {
    pub fn is_found(&self) -> bool {
        matches!(self, PipelineResponse::Found(_))
    }

    pub fn provider(&self) -> Provider {
        match self {
            PipelineResponse::Found(r) => r.provider,
            PipelineResponse::NotFound(r) => r.provider,
        }
    }

    pub fn search_time_ms(&self) -> f64 {
        match self {
            PipelineResponse::Found(r) => r.search_time_ms,
            PipelineResponse::NotFound(r) => r.search_time_ms,
        }
    }

    pub fn as_found(&self) -> Option<&FoundResponse> {
        match self {
            PipelineResponse::Found(r) => Some(r),
            _ => None,
        }
    }
}

pub struct ResolutionPipeline {
    catalog: Arc<FeatureCatalog>,
    resolvers: Vec<Box<dyn FeatureResolver>>,
    config: SearchConfig,
}

impl ResolutionPipeline {
    /// Standard chain: AI (if configured), keyword, legacy
    pub fn new(catalog: Arc<FeatureCatalog>, config: SearchConfig) -> Result<Self, LlmError> {
        let resolvers: Vec<Box<dyn FeatureResolver>> = vec![
            Box::new(AiResolver::from_config(&config)?),
            Box::new(KeywordResolver::default()),
            Box::new(LegacyResolver::new(
                config.legacy_limit,
                config.legacy_scan_multiplier,
            )),
        ];
        Ok(Self::with_resolvers(catalog, config, resolvers))
    }

    /// Custom chain, tried in the given order
    pub fn with_resolvers(
        catalog: Arc<FeatureCatalog>,
        config: SearchConfig,
        resolvers: Vec<Box<dyn FeatureResolver>>,
    ) -> Self {
        Self {
            catalog,
            resolvers,
            config,
        }
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn resolvers(&self) -> &[Box<dyn FeatureResolver>] {
        &self.resolvers
    }

    /// Resolve a natural-language query to a feature
    pub async fn resolve(&self, query: &str) -> PipelineResponse {
        let start = Instant::now();
        info!(
            "Search request: '{}' (length: {} chars)",
            query,
            query.chars().count()
        );

        if query.trim().is_empty() {
            return self.not_found(query, start);
        }

        for resolver in &self.resolvers {
            let provider = resolver.provider();
            if !resolver.is_available() {
                debug!("Skipping {} provider: not configured", provider);
                continue;
            }

            info!("Attempting {} search...", provider);
            let outcome = AssertUnwindSafe(resolver.resolve(query, &self.catalog))
                .catch_unwind()
                .await
                .unwrap_or(ResolveOutcome::Failed(ResolverError::Panicked));

            match outcome {
                ResolveOutcome::Matched(resolution) => {
                    return self.found(resolution, provider, start);
                }
                ResolveOutcome::Absent => debug!("{} provider found nothing", provider),
                ResolveOutcome::Failed(e) => warn!("{} provider failed: {}", provider, e),
            }
        }

        self.not_found(query, start)
    }

    fn found(&self, resolution: Resolution, provider: Provider, start: Instant) -> PipelineResponse {
        let search_time_ms = elapsed_ms(start);
        let Resolution { result, matches } = resolution;

        let feature = match matches.first() {
            Some(primary) => FeatureSummary {
                name: primary.name.clone(),
                category: primary.category.clone(),
                diameter_km: primary.diameter_km,
                origin: primary.origin.clone(),
            },
            None => FeatureSummary {
                name: result.feature_name.clone().unwrap_or_default(),
                category: String::new(),
                diameter_km: None,
                origin: None,
            },
        };

        let related_features = matches
            .iter()
            .skip(1)
            .take(self.config.related_limit)
            .map(RelatedFeature::from)
            .collect();

        info!(
            "Search success: '{}' on {} via {} provider in {:.1}ms",
            feature.name, result.body, provider, search_time_ms
        );

        PipelineResponse::Found(FoundResponse {
            found: true,
            body: result.body,
            center: Center {
                lat: result.lat,
                lon: result.lon,
            },
            feature,
            zoom: DEFAULT_ZOOM,
            layer: result.layer_id,
            confidence: result.confidence,
            related_features,
            total_results: matches.len().max(1),
            provider,
            search_time_ms,
        })
    }

    fn not_found(&self, query: &str, start: Instant) -> PipelineResponse {
        let search_time_ms = elapsed_ms(start);
        info!(
            "No results found for query: '{}' ({:.1}ms)",
            query, search_time_ms
        );

        PipelineResponse::NotFound(NotFoundResponse {
            found: false,
            message: format!(r#"No results found for "{}""#, query),
            suggestions: SUGGESTIONS.iter().map(|s| s.to_string()).collect(),
            provider: Provider::None,
            search_time_ms,
        })
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
