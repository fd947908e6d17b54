//! Shared fixtures for integration tests
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use stellar_search::resolver::{AiResolver, FeatureResolver, KeywordResolver, LegacyResolver};
use stellar_search::{
    CompletionRequest, FeatureCatalog, FeatureRecord, LlmClient, LlmError, ResolutionPipeline,
    SearchConfig,
};

/// What the scripted client does when called
#[derive(Debug, Clone)]
pub enum Script {
    Respond(String),
    Fail(u16),
    Hang,
}

/// LlmClient double that follows a fixed script and counts calls
pub struct ScriptedClient {
    script: Script,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn responding(text: &str) -> Arc<Self> {
        Self::new(Script::Respond(text.to_string()))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn complete(&self, _request: &CompletionRequest) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.script {
            Script::Respond(text) => Ok(text.clone()),
            Script::Fail(status) => Err(LlmError::Status {
                status: *status,
                body: "scripted failure".to_string(),
            }),
            Script::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("{}".to_string())
            }
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }

    fn provider_name(&self) -> &str {
        "Scripted"
    }
}

/// Small catalog covering the moon, mars and an unnamed record
pub fn fixture_catalog() -> Arc<FeatureCatalog> {
    Arc::new(FeatureCatalog::from_records(vec![
        FeatureRecord::new("Tycho", "moon", "crater", -43.3, -11.2)
            .with_keywords(["tycho", "crater", "rays"])
            .with_diameter(85.0)
            .with_origin("Tycho Brahe, Danish astronomer"),
        FeatureRecord::new("Copernicus", "moon", "crater", 9.62, -20.08)
            .with_keywords(["copernicus", "crater"])
            .with_diameter(93.0),
        FeatureRecord::new("Mons Pico", "moon", "mons", 45.7, -8.9)
            .with_keywords(["pico", "mons", "mountain"])
            .with_diameter(5.0),
        FeatureRecord::new("Montes Apenninus", "moon", "montes", 18.9, -3.7)
            .with_keywords(["apenninus", "montes", "mountain"])
            .with_diameter(120.0),
        FeatureRecord::new("Mare Imbrium", "moon", "mare", 32.8, -15.6)
            .with_keywords(["imbrium", "mare", "sea"])
            .with_diameter(1145.0),
        FeatureRecord::new("Olympus Mons", "mars", "mons", 18.65, -133.8)
            .with_keywords(["olympus", "mons", "volcano"])
            .with_diameter(600.0),
        FeatureRecord::new("Valles Marineris", "mars", "vallis", -13.9, -59.2)
            .with_keywords(["valles", "marineris", "canyon"]),
        FeatureRecord::new("", "mars", "crater", 0.0, 0.0),
    ]))
}

/// Standard chain with an AI resolver backed by `client`
pub fn pipeline_with_ai(client: Arc<ScriptedClient>, timeout: Duration) -> ResolutionPipeline {
    let config = SearchConfig {
        ai_enabled: true,
        api_key: Some("sk-test".to_string()),
        ai_timeout: timeout,
        ..SearchConfig::default()
    };
    let resolvers: Vec<Box<dyn FeatureResolver>> = vec![
        Box::new(AiResolver::new(client, timeout)),
        Box::new(KeywordResolver::default()),
        Box::new(LegacyResolver::default()),
    ];
    ResolutionPipeline::with_resolvers(fixture_catalog(), config, resolvers)
}

/// Standard chain with AI switched off
pub fn pipeline_without_ai() -> ResolutionPipeline {
    ResolutionPipeline::new(fixture_catalog(), SearchConfig::default())
        .expect("pipeline without AI never builds an HTTP client")
}
