//! Resolver invariants checked across the fixture catalog

mod helpers;

use helpers::fixture_catalog;
use stellar_search::resolver::{AiResolver, KeywordResolver, LegacyResolver};
use stellar_search::synonyms::{ConceptKind, SynonymTable};
use stellar_search::{ParsedIntent, SizePreference};

#[test]
fn test_exact_name_is_top_candidate() {
    let catalog = fixture_catalog();
    let keyword = KeywordResolver::default();
    let legacy = LegacyResolver::default();

    for record in catalog.iter().filter(|r| !r.name.is_empty()) {
        for query in [record.name.clone(), record.name.to_uppercase()] {
            let ranked = keyword.rank(&query, &catalog);
            assert_eq!(ranked[0].record.name, record.name, "keyword: {query}");

            let results = legacy.search(&query, None, 10, &catalog);
            assert_eq!(results[0].record.name, record.name, "legacy: {query}");
            assert_eq!(results[0].score, 100);
        }
    }
}

#[test]
fn test_body_alias_scopes_keyword_candidates() {
    let catalog = fixture_catalog();
    let keyword = KeywordResolver::default();

    for group in SynonymTable::standard()
        .groups()
        .iter()
        .filter(|g| g.kind == ConceptKind::Body)
    {
        for alias in group.aliases {
            let query = format!("{alias} crater");
            let ranked = keyword.rank(&query, &catalog);
            assert!(
                ranked.iter().all(|c| c.record.body == group.canonical),
                "{query} leaked another body"
            );
        }
    }

    // no mercury records at all
    assert!(keyword.rank("mercury crater", &catalog).is_empty());
}

#[test]
fn test_ai_confidence_always_in_range() {
    let catalog = fixture_catalog();
    let ai = AiResolver::disabled();

    let bodies = [None, Some("moon"), Some("mars"), Some("venus")];
    let names = [None, Some("Olympus Mons"), Some("mons"), Some("Tycho")];
    let types = [None, Some("mountain"), Some("crater"), Some("canyon")];
    let sizes = [None, Some(SizePreference::Large), Some(SizePreference::Small)];

    for body in bodies {
        for name in names {
            for feature_type in types {
                for size in sizes {
                    let intent = ParsedIntent {
                        body: body.map(String::from),
                        feature_type: feature_type.map(String::from),
                        feature_name: name.map(String::from),
                        size_preference: size,
                        confidence: 1.0,
                    };
                    if let Some(resolution) = ai.match_intent(&intent, &catalog) {
                        let c = resolution.result.confidence;
                        assert!((0.0..=1.0).contains(&c), "{intent:?} gave {c}");
                        assert_eq!(
                            resolution.result.layer_id,
                            format!("{}_default", resolution.result.body)
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_large_outranks_small_under_ai_scoring() {
    let catalog = fixture_catalog();
    let ai = AiResolver::disabled();
    let intent = ParsedIntent {
        body: Some("moon".to_string()),
        feature_type: Some("mountain".to_string()),
        size_preference: Some(SizePreference::Large),
        confidence: 0.9,
        ..Default::default()
    };

    let ranked = ai.rank(&intent, &catalog);
    let position = |name: &str| ranked.iter().position(|c| c.record.name == name).unwrap();
    assert!(position("Montes Apenninus") < position("Mons Pico"));
}
