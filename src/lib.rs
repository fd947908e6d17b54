//! Planetary feature resolution
//!
//! Turns a free-text query ("show me large mountains on moon") into a
//! ranked feature match with navigation coordinates, degrading through
//! three strategies of decreasing sophistication.
//!
//! # Architecture
//!
//! ```text
//! Query
//!   │
//!   ▼
//! ┌─────────────────────────────────────────┐
//! │  AiResolver (DeepSeek, 1.5s budget)     │
//! │  query → JSON intent → weighted scoring │
//! └─────────────────────────────────────────┘
//!   │ absent / failed / timeout
//!   ▼
//! ┌─────────────────────────────────────────┐
//! │  KeywordResolver (SynonymTable)         │
//! │  body scoping + name/keyword/category   │
//! └─────────────────────────────────────────┘
//!   │ absent
//!   ▼
//! ┌─────────────────────────────────────────┐
//! │  LegacyResolver                         │
//! │  stop-word intent + substring scan      │
//! └─────────────────────────────────────────┘
//!   │
//!   ▼
//! found { center, feature, layer, related_features, provider }
//!   or not found { suggestions }
//! ```
//!
//! The catalog is immutable and injected; nothing in resolution writes
//! shared state.

pub mod catalog;
pub mod config;
pub mod deepseek_client;
pub mod error;
pub mod intent;
pub mod llm_client;
pub mod pipeline;
pub mod resolver;
pub mod status;
pub mod synonyms;
pub mod types;

pub use catalog::{FeatureCatalog, FeatureRecord};
pub use config::SearchConfig;
pub use deepseek_client::DeepSeekClient;
pub use error::{CatalogError, IntentParseError, LlmError, ResolverError};
pub use llm_client::{CompletionRequest, LlmClient};
pub use pipeline::{PipelineResponse, ResolutionPipeline};
pub use resolver::{AiResolver, FeatureResolver, KeywordResolver, LegacyResolver};
pub use status::PipelineStatus;
pub use synonyms::SynonymTable;
pub use types::{ParsedIntent, Provider, Resolution, ResolveOutcome, SearchResult, SizePreference};
