//! AI resolver
//!
//! Asks a text-completion model to interpret the query as a structured
//! intent, then scores catalog records against that intent. Best effort:
//! timeouts, upstream errors and unparseable answers all come back as
//! `ResolveOutcome::Failed` and the pipeline moves on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use super::FeatureResolver;
use crate::catalog::{FeatureCatalog, FeatureRecord};
use crate::config::SearchConfig;
use crate::deepseek_client::DeepSeekClient;
use crate::error::{LlmError, ResolverError};
use crate::intent::parse_intent_response;
use crate::llm_client::{CompletionRequest, LlmClient};
use crate::synonyms::SynonymTable;
use crate::types::{
    rank_candidates, ParsedIntent, Provider, Resolution, ResolveOutcome, ScoredCandidate,
};

/// Records sampled from the head of the catalog for prompt context
pub const PROMPT_SAMPLE_SIZE: usize = 50;

/// Example feature names embedded in the prompt
pub const PROMPT_EXAMPLE_NAMES: usize = 5;

const BODY_MATCH_SCORE: u32 = 40;
const UNCONSTRAINED_BODY_SCORE: u32 = 10;
const EXACT_NAME_SCORE: u32 = 100;
const PARTIAL_NAME_SCORE: u32 = 50;
const FEATURE_TYPE_SCORE: u32 = 30;
const SIZE_SCORE: u32 = 20;

pub struct AiResolver {
    client: Option<Arc<dyn LlmClient>>,
    timeout: Duration,
    synonyms: &'static SynonymTable,
}

impl AiResolver {
    pub fn new(client: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self {
            client: Some(client),
            timeout,
            synonyms: SynonymTable::standard(),
        }
    }

    /// A resolver that never attempts a call
    pub fn disabled() -> Self {
        Self {
            client: None,
            timeout: Duration::ZERO,
            synonyms: SynonymTable::standard(),
        }
    }

    /// DeepSeek-backed resolver when AI search is enabled and keyed
    pub fn from_config(config: &SearchConfig) -> Result<Self, LlmError> {
        if !config.is_ai_available() {
            return Ok(Self::disabled());
        }
        Ok(match DeepSeekClient::from_config(config)? {
            Some(client) => Self::new(Arc::new(client), config.ai_timeout),
            None => Self::disabled(),
        })
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Prompt asking for a strict JSON intent, with catalog context
    pub fn build_prompt(&self, query: &str, catalog: &FeatureCatalog) -> String {
        let sample = catalog.sample(PROMPT_SAMPLE_SIZE);
        let bodies = distinct(sample.iter().map(|f| f.body.as_str()));
        let categories = distinct(sample.iter().map(|f| f.category.as_str()));
        let examples: Vec<&str> = sample
            .iter()
            .take(10)
            .map(|f| f.name.as_str())
            .filter(|n| !n.is_empty())
            .take(PROMPT_EXAMPLE_NAMES)
            .collect();

        format!(
            r#"You are helping with planetary feature search. Parse this query and extract key information.

Query: "{query}"

Available bodies: {bodies}
Available categories: {categories}
Example features: {examples}

Please respond with a JSON object containing:
{{
    "body": "moon|mars|mercury|null",
    "feature_type": "crater|mountain|valley|sea|plain|ridge|bay|null",
    "feature_name": "specific feature name if mentioned|null",
    "size_preference": "large|small|null",
    "confidence": 0.0-1.0
}}

Examples:
- "show me large mountains on moon" -> {{"body": "moon", "feature_type": "mountain", "feature_name": null, "size_preference": "large", "confidence": 0.9}}
- "find Tycho crater" -> {{"body": null, "feature_type": "crater", "feature_name": "Tycho", "size_preference": null, "confidence": 0.95}}
- "Mars valleys" -> {{"body": "mars", "feature_type": "valley", "feature_name": null, "size_preference": null, "confidence": 0.8}}

Respond only with valid JSON, no explanations."#,
            query = query,
            bodies = bodies.join(", "),
            categories = categories.join(", "),
            examples = examples.join(", "),
        )
    }

    /// One completion call under the timeout budget, no retry
    async fn interpret(
        &self,
        client: &dyn LlmClient,
        query: &str,
        catalog: &FeatureCatalog,
    ) -> Result<ParsedIntent, ResolverError> {
        let request = CompletionRequest::new(self.build_prompt(query, catalog));

        let text = tokio::time::timeout(self.timeout, client.complete(&request))
            .await
            .map_err(|_| ResolverError::Timeout(self.timeout))??;

        debug!("{} raw response: {}", client.provider_name(), text);
        Ok(parse_intent_response(&text)?)
    }

    /// Score every record against a structured intent, best first
    pub fn rank<'a>(
        &self,
        intent: &ParsedIntent,
        catalog: &'a FeatureCatalog,
    ) -> Vec<ScoredCandidate<'a>> {
        let type_synonyms: Vec<String> = intent
            .feature_type
            .as_deref()
            .map(|t| {
                let key = t.to_lowercase();
                self.synonyms
                    .expand(&key)
                    .into_iter()
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let candidates = catalog
            .iter()
            .map(|record| ScoredCandidate {
                record,
                score: score_record(record, intent, &type_synonyms),
            })
            .collect();

        rank_candidates(candidates)
    }

    /// Best record for an intent; confidence is scaled by score and clamped
    pub fn match_intent(&self, intent: &ParsedIntent, catalog: &FeatureCatalog) -> Option<Resolution> {
        let ranked = self.rank(intent, catalog);
        let best_score = ranked.first()?.score;
        let confidence = intent.confidence * (f64::from(best_score) / 100.0);
        Resolution::from_ranked(&ranked, confidence)
    }

    /// Full AI path; `Ok(None)` means the model answered but nothing matched
    pub async fn search(
        &self,
        query: &str,
        catalog: &FeatureCatalog,
    ) -> Result<Option<Resolution>, ResolverError> {
        let Some(client) = self.client.as_deref() else {
            return Ok(None);
        };

        let start = Instant::now();
        let intent = self.interpret(client, query, catalog).await?;
        let resolution = self.match_intent(&intent, catalog);

        info!(
            "{} API call completed: latency={:.1}ms, result_found={}",
            client.provider_name(),
            start.elapsed().as_secs_f64() * 1000.0,
            resolution.is_some()
        );

        match &resolution {
            Some(r) => info!(
                "AI match: '{}' with confidence {:.2}",
                r.result.feature_name.as_deref().unwrap_or_default(),
                r.result.confidence
            ),
            None => warn!("AI found no matches for query: '{}'", query),
        }

        Ok(resolution)
    }
}

fn score_record(record: &FeatureRecord, intent: &ParsedIntent, type_synonyms: &[String]) -> u32 {
    let mut score = 0;

    match intent.body.as_deref() {
        Some(body) if record.is_on(body) => score += BODY_MATCH_SCORE,
        Some(_) => {}
        None => score += UNCONSTRAINED_BODY_SCORE,
    }

    if let Some(name) = intent.feature_name.as_deref().filter(|n| !n.is_empty()) {
        let record_name = record.name.to_lowercase();
        let wanted = name.to_lowercase();
        if record_name == wanted {
            score += EXACT_NAME_SCORE;
        } else if record_name.contains(&wanted) {
            score += PARTIAL_NAME_SCORE;
        }
    }

    if !type_synonyms.is_empty() {
        let category = record.category.to_lowercase();
        let keywords = record
            .keywords
            .iter()
            .map(|k| k.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        if type_synonyms
            .iter()
            .any(|syn| category.contains(syn.as_str()) || keywords.contains(syn.as_str()))
        {
            score += FEATURE_TYPE_SCORE;
        }
    }

    if let (Some(pref), Some(diameter)) = (intent.size_preference, record.diameter_km) {
        if pref.accepts(diameter) {
            score += SIZE_SCORE;
        }
    }

    score
}

/// Non-empty values in first-seen order
fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !value.is_empty() && !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

#[async_trait]
impl FeatureResolver for AiResolver {
    fn provider(&self) -> Provider {
        Provider::DeepSeek
    }

    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    #[instrument(skip(self, catalog), fields(query = %query))]
    async fn resolve(&self, query: &str, catalog: &FeatureCatalog) -> ResolveOutcome {
        match self.search(query, catalog).await {
            Ok(resolution) => resolution.into(),
            Err(e) => ResolveOutcome::Failed(e),
        }
    }
}
