mod common;

use pantrymatch::services::classifier::{confidence_band, ClassifyOptions, ConfidenceBand, Source};
use pantrymatch::services::dictionary::Category;
use pantrymatch::services::normalizer::normalize;

#[test]
fn exact_dictionary_hit_for_branded_product() {
    let classifier = common::classifier();
    let results = classifier.classify("betapac curry powder 100g", &ClassifyOptions::default());

    assert!(!results.is_empty());
    let top = &results[0];
    assert_eq!(top.source, Source::Dictionary);
    assert_eq!(top.confidence, 0.97);
    assert_eq!(top.category, Category::Pantry);
    assert!(top.canonical_name.contains("Betapac"));
    assert!(top.canonical_name.contains("Curry Powder"));
    assert_eq!(top.matched_alias.as_deref(), Some("betapac curry powder 100g"));
    assert_eq!(confidence_band(top.confidence), ConfidenceBand::Auto);
}

#[test]
fn exact_hits_survive_marketing_noise_and_diacritics() {
    let classifier = common::classifier();
    let results = classifier.classify("Fresh Premium Callaloo Bunch!", &ClassifyOptions::default());
    let top = &results[0];
    assert_eq!(top.source, Source::Dictionary);
    assert_eq!(top.category, Category::Produce);
    assert_eq!(normalize("Café-Olé!"), normalize("cafe ole"));
}

#[test]
fn explicit_alias_resolves_to_its_entry() {
    let classifier = common::classifier();
    let results = classifier.classify("ting", &ClassifyOptions::default());
    let top = &results[0];
    assert_eq!(top.source, Source::Dictionary);
    assert!(top.canonical_name.contains("Ting"));
    assert_eq!(top.category, Category::Beverages);
}

#[test]
fn empty_input_returns_no_results() {
    let classifier = common::classifier();
    assert!(classifier.classify("", &ClassifyOptions::default()).is_empty());
    assert!(classifier.classify("   ", &ClassifyOptions::default()).is_empty());
    // Pure stopwords normalize to nothing as well.
    assert!(classifier.classify("fresh premium", &ClassifyOptions::default()).is_empty());
}

#[test]
fn unknown_item_falls_back_to_pantry_staple() {
    let classifier = common::classifier();
    let results = classifier.classify("zzz-nonexistent-item-zzz", &ClassifyOptions::default());

    assert_eq!(results.len(), 1);
    let fallback = &results[0];
    assert_eq!(fallback.source, Source::Fallback);
    assert_eq!(fallback.category, Category::Pantry);
    assert_eq!(fallback.canonical_name, "Pantry Staple");
    assert_eq!(fallback.confidence, 0.2);
    assert_eq!(confidence_band(fallback.confidence), ConfidenceBand::Suggestion);
}

#[test]
fn typo_lands_in_the_fuzzy_confidence_window() {
    let classifier = common::classifier();
    let results = classifier.classify("betapac cury powder", &ClassifyOptions::default());

    let fuzzy: Vec<_> = results.iter().filter(|r| r.source == Source::Fuzzy).collect();
    assert!(!fuzzy.is_empty(), "a one-letter typo must still fuzzy-match");
    for result in fuzzy {
        assert!(result.confidence >= 0.40 && result.confidence <= 0.88);
        assert!(result.matched_alias.is_some());
        assert!(result
            .explanation
            .as_deref()
            .unwrap_or_default()
            .contains('%'));
    }
}

#[test]
fn fuzzy_stays_strictly_below_dictionary_confidence() {
    let classifier = common::classifier();
    let results = classifier.classify("walkerswood jerk seasonin", &ClassifyOptions::default());
    for result in &results {
        if result.source == Source::Fuzzy {
            assert!(result.confidence < 0.97);
        }
    }
}

#[test]
fn vector_confidences_respect_their_bounds() {
    let classifier = common::classifier();
    let min_confidence = 0.28;
    let ranked = classifier.rank_vector("curry powder seasoning", 10, min_confidence);
    for result in &ranked {
        assert_eq!(result.source, Source::Ml);
        assert!(result.confidence >= min_confidence && result.confidence <= 0.75);
    }
}

#[test]
fn limit_zero_yields_no_results() {
    let classifier = common::classifier();
    let options = ClassifyOptions {
        limit: 0,
        ..ClassifyOptions::default()
    };
    // Even the pantry fallback must respect the cap.
    assert!(classifier.classify("curry powder", &options).is_empty());
    assert!(classifier.classify("zzz-nonexistent-item-zzz", &options).is_empty());
}

#[test]
fn result_list_is_capped_and_free_of_duplicates() {
    let classifier = common::classifier();
    for limit in [1, 2, 4, 8] {
        let options = ClassifyOptions {
            limit,
            ..ClassifyOptions::default()
        };
        let results = classifier.classify("curry powder", &options);
        assert!(results.len() <= limit);
        let mut seen = std::collections::HashSet::new();
        for result in &results {
            assert!(
                seen.insert(result.canonical_name.clone()),
                "duplicate canonical name {}",
                result.canonical_name
            );
        }
    }
}

#[test]
fn shared_alias_returns_every_exact_entry_in_canonical_order() {
    let classifier = common::classifier();
    // Both Betapac sizes share the bare "curry powder" alias.
    let results = classifier.classify("curry powder", &ClassifyOptions::default());
    let exact: Vec<_> = results
        .iter()
        .filter(|r| r.source == Source::Dictionary)
        .collect();
    assert!(exact.len() >= 2);
    let names: Vec<&str> = exact.iter().map(|r| r.canonical_name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted, "exact ties must come back in canonical order");
    for result in exact {
        assert_eq!(result.confidence, 0.97);
    }
}

#[test]
fn classification_is_deterministic() {
    let classifier = common::classifier();
    let options = ClassifyOptions::default();
    let first = classifier.classify("grace coconut milk", &options);
    let second = classifier.classify("grace coconut milk", &options);
    let names = |results: &[pantrymatch::services::classifier::ClassificationResult]| {
        results.iter().map(|r| r.canonical_name.clone()).collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
}
