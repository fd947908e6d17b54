//! Pipeline diagnostics
//!
//! A snapshot of what the pipeline is working with: catalog size, whether
//! the AI path is live, and a few sample records.

use serde::Serialize;

use crate::pipeline::ResolutionPipeline;
use crate::types::Provider;

const SAMPLE_BODY_WINDOW: usize = 100;
const SAMPLE_FEATURES: usize = 5;

#[derive(Debug, Clone, Serialize)]
pub struct AiConfigStatus {
    pub enabled: bool,
    pub has_api_key: bool,
    pub model: String,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SampleFeature {
    pub name: String,
    pub category: String,
    pub body: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PipelineStatus {
    pub status: &'static str,
    pub features_loaded: usize,
    pub ai_available: bool,
    pub ai_config: AiConfigStatus,
    pub sample_bodies: Vec<String>,
    pub sample_features: Vec<SampleFeature>,
    pub providers: Vec<Provider>,
}

impl ResolutionPipeline {
    pub fn status(&self) -> PipelineStatus {
        let catalog = self.catalog();
        let config = self.config();

        let mut sample_bodies: Vec<String> = Vec::new();
        for record in catalog.sample(SAMPLE_BODY_WINDOW) {
            if !sample_bodies.contains(&record.body) {
                sample_bodies.push(record.body.clone());
            }
        }

        let sample_features = catalog
            .sample(SAMPLE_FEATURES)
            .iter()
            .map(|r| SampleFeature {
                name: r.name.clone(),
                category: r.category.clone(),
                body: r.body.clone(),
            })
            .collect();

        PipelineStatus {
            status: "ok",
            features_loaded: catalog.len(),
            ai_available: self
                .resolvers()
                .iter()
                .any(|r| r.provider() == Provider::DeepSeek && r.is_available()),
            ai_config: AiConfigStatus {
                enabled: config.ai_enabled,
                has_api_key: config.api_key.is_some(),
                model: config.model.clone(),
                timeout_ms: u64::try_from(config.ai_timeout.as_millis()).unwrap_or(u64::MAX),
            },
            sample_bodies,
            sample_features,
            providers: self
                .resolvers()
                .iter()
                .filter(|r| r.is_available())
                .map(|r| r.provider())
                .collect(),
        }
    }
}
