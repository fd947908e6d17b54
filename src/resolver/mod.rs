//! Feature resolvers
//!
//! Each resolver turns a free-text query into a ranked feature match. They
//! share one interface so the pipeline can walk a fixed, ordered list.

use async_trait::async_trait;

use crate::catalog::FeatureCatalog;
use crate::types::{Provider, ResolveOutcome};

pub mod ai;
pub mod keyword;
pub mod legacy;

pub use ai::AiResolver;
pub use keyword::KeywordResolver;
pub use legacy::{LegacyResolver, QueryIntent};

#[async_trait]
pub trait FeatureResolver: Send + Sync {
    /// Provider label reported when this resolver satisfies a query
    fn provider(&self) -> Provider;

    /// Whether the resolver is configured to run at all
    fn is_available(&self) -> bool {
        true
    }

    /// Resolve `query` against the catalog
    async fn resolve(&self, query: &str, catalog: &FeatureCatalog) -> ResolveOutcome;
}

/// Either string contains the other; empty strings never match
pub(crate) fn mutual_contains(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a.contains(b) || b.contains(a)
}
