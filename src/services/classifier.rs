use crate::constants::classify as classify_constants;
use crate::services::dictionary::{Category, DictionaryIndex};
use crate::services::logger::Logger;
use crate::services::normalizer::{normalize, tokenize};
use crate::utils::text::{build_vector, cosine_similarity, jaccard, levenshtein_score, round_to};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Dictionary,
    Fuzzy,
    Ml,
    Fallback,
    Manual,
    Merchant,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub category: Category,
    pub canonical_name: String,
    pub confidence: f64,
    pub source: Source,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct ClassifyOptions {
    pub limit: usize,
    pub min_confidence: f64,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            limit: classify_constants::DEFAULT_LIMIT,
            min_confidence: classify_constants::DEFAULT_MIN_CONFIDENCE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    Auto,
    NeedsReview,
    Suggestion,
}

/// Band a confidence for review routing. Kept separate from the merge step
/// so callers can re-band externally supplied confidences (manual overrides,
/// merchant hints) with the same cutoffs.
pub fn confidence_band(confidence: f64) -> ConfidenceBand {
    if confidence >= classify_constants::BAND_AUTO {
        ConfidenceBand::Auto
    } else if confidence >= classify_constants::BAND_REVIEW {
        ConfidenceBand::NeedsReview
    } else {
        ConfidenceBand::Suggestion
    }
}

/// Hybrid product classifier over an immutable dictionary index.
///
/// Matchers run in strict priority order: exact alias hits are always
/// included, fuzzy fills remaining slots, and the vector ranker only runs
/// when slots are still open. Purely synchronous; safe to share across
/// threads since the index never mutates after construction.
#[derive(Clone)]
pub struct Classifier {
    logger: Logger,
    index: Arc<DictionaryIndex>,
}

impl Classifier {
    pub fn new(logger: Logger, index: Arc<DictionaryIndex>) -> Self {
        Self {
            logger: logger.child("classify"),
            index,
        }
    }

    pub fn index(&self) -> &DictionaryIndex {
        &self.index
    }

    pub fn classify(&self, raw_name: &str, options: &ClassifyOptions) -> Vec<ClassificationResult> {
        let normalized = normalize(raw_name);
        if normalized.is_empty() || options.limit == 0 {
            return Vec::new();
        }
        let limit = options.limit;

        let mut results = self.match_dictionary(&normalized);

        for candidate in self.rank_fuzzy(&normalized, limit) {
            if results.len() >= limit {
                break;
            }
            if !results.iter().any(|r| r.canonical_name == candidate.canonical_name) {
                results.push(candidate);
            }
        }

        if results.len() < limit {
            for candidate in self.rank_vector(&normalized, limit, options.min_confidence) {
                if results.len() >= limit {
                    break;
                }
                if !results.iter().any(|r| r.canonical_name == candidate.canonical_name) {
                    results.push(candidate);
                }
            }
        }

        if results.is_empty() {
            self.logger.debug(
                "no match, falling back",
                Some(&serde_json::json!({ "normalized": normalized })),
            );
            results.push(fallback_result());
        }

        results.truncate(limit);
        results
    }

    /// Exact lookup of the normalized query in the alias index. Ties come
    /// back in index order, which is canonical-name order.
    pub fn match_dictionary(&self, normalized: &str) -> Vec<ClassificationResult> {
        self.index
            .lookup_alias(normalized)
            .iter()
            .map(|&position| {
                let indexed = &self.index.entries()[position];
                ClassificationResult {
                    category: indexed.entry.category,
                    canonical_name: indexed.entry.canonical_name.clone(),
                    confidence: classify_constants::DICTIONARY_CONFIDENCE,
                    source: Source::Dictionary,
                    matched_alias: Some(normalized.to_string()),
                    explanation: Some("Dictionary exact match".to_string()),
                }
            })
            .collect()
    }

    /// Blended token-overlap + edit-distance ranking over every entry's
    /// alias set, keeping the best alias per entry. Runs regardless of
    /// whether exact matches existed.
    pub fn rank_fuzzy(&self, normalized: &str, limit: usize) -> Vec<ClassificationResult> {
        let query_tokens = tokenize(normalized);
        let mut scored: Vec<(f64, usize, &str)> = Vec::new();

        for (position, indexed) in self.index.entries().iter().enumerate() {
            let mut best_score = 0.0;
            let mut matched_alias = "";
            for alias in &indexed.alias_set {
                let alias_tokens = tokenize(alias);
                let token_score = jaccard(&query_tokens, &alias_tokens);
                let lev_score = levenshtein_score(alias, normalized);
                let combined = round_to(
                    token_score * classify_constants::FUZZY_TOKEN_WEIGHT
                        + lev_score * classify_constants::FUZZY_LEV_WEIGHT,
                    4,
                );
                if combined > best_score {
                    best_score = combined;
                    matched_alias = alias;
                }
            }
            if best_score >= classify_constants::FUZZY_MIN_SCORE {
                scored.push((best_score, position, matched_alias));
            }
        }

        // Stable sort over the canonical-name-ordered entry list keeps ties
        // deterministic.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(score, position, alias)| {
                let indexed = &self.index.entries()[position];
                let confidence = round_to(
                    score
                        .max(classify_constants::FUZZY_FLOOR)
                        .min(classify_constants::FUZZY_CAP),
                    3,
                );
                ClassificationResult {
                    category: indexed.entry.category,
                    canonical_name: indexed.entry.canonical_name.clone(),
                    confidence,
                    source: Source::Fuzzy,
                    matched_alias: Some(alias.to_string()),
                    explanation: Some(format!("Fuzzy match {:.1}%", score * 100.0)),
                }
            })
            .collect()
    }

    /// Cosine similarity over precomputed term-frequency vectors. Cheapest
    /// signal, so it only fills slots the other matchers left open.
    pub fn rank_vector(
        &self,
        normalized: &str,
        limit: usize,
        min_confidence: f64,
    ) -> Vec<ClassificationResult> {
        let query_vector = build_vector(&tokenize(normalized));
        let mut scored: Vec<(f64, usize)> = Vec::new();
        for (position, indexed) in self.index.entries().iter().enumerate() {
            let score = cosine_similarity(&query_vector, &indexed.vector);
            if score >= min_confidence {
                scored.push((score, position));
            }
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(limit)
            .map(|(score, position)| {
                let indexed = &self.index.entries()[position];
                let confidence =
                    round_to(score.max(min_confidence).min(classify_constants::VECTOR_CAP), 3);
                ClassificationResult {
                    category: indexed.entry.category,
                    canonical_name: indexed.entry.canonical_name.clone(),
                    confidence,
                    source: Source::Ml,
                    matched_alias: None,
                    explanation: Some(format!("Vector similarity {:.1}%", score * 100.0)),
                }
            })
            .collect()
    }
}

fn fallback_result() -> ClassificationResult {
    ClassificationResult {
        category: Category::Pantry,
        canonical_name: "Pantry Staple".to_string(),
        confidence: classify_constants::FALLBACK_CONFIDENCE,
        source: Source::Fallback,
        matched_alias: None,
        explanation: Some("Defaulted to pantry staples".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bands_follow_the_cutoffs() {
        assert_eq!(confidence_band(0.97), ConfidenceBand::Auto);
        assert_eq!(confidence_band(0.70), ConfidenceBand::Auto);
        assert_eq!(confidence_band(0.69), ConfidenceBand::NeedsReview);
        assert_eq!(confidence_band(0.40), ConfidenceBand::NeedsReview);
        assert_eq!(confidence_band(0.39), ConfidenceBand::Suggestion);
        assert_eq!(confidence_band(0.0), ConfidenceBand::Suggestion);
    }
}
