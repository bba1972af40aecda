use crate::constants::resolve as resolve_constants;
use crate::errors::ResolveError;
use crate::services::logger::Logger;
use crate::services::normalizer::{normalize, tokenize};
use crate::stores::{AliasScope, BrandAliasRecord, BrandAliasStore, NewBrandAlias};
use crate::utils::text::{jaccard, levenshtein_score, round_to};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ResolveRequest {
    pub raw_name: String,
    pub store_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    MissingAlias,
    LowConfidence,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::MissingAlias => "missing_alias",
            FallbackReason::LowConfidence => "low_confidence",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictMatch {
    pub brand_id: Option<Uuid>,
    pub brand_name: Option<String>,
    pub confidence: f64,
    pub source: String,
}

/// Outcome of one brand resolution. Conflicts are genuine ambiguity and
/// demand human disambiguation; fallbacks are ordinary no-match results.
#[derive(Debug, Clone)]
pub enum BrandResolution {
    Matched {
        brand_id: Option<Uuid>,
        brand_name: Option<String>,
        confidence: f64,
        source: String,
    },
    AliasCreated {
        brand_id: Uuid,
        brand_name: Option<String>,
        confidence: f64,
    },
    Fallback {
        reason: FallbackReason,
        confidence: f64,
    },
    Conflict {
        matches: Vec<ConflictMatch>,
    },
}

impl BrandResolution {
    pub fn http_status(&self) -> u16 {
        match self {
            BrandResolution::Conflict { .. } => 409,
            _ => 200,
        }
    }

    /// The HTTP-shaped response body a thin server collaborator returns
    /// verbatim.
    pub fn to_response(&self) -> Value {
        match self {
            BrandResolution::Matched {
                brand_id,
                brand_name,
                confidence,
                source,
            } => json!({
                "status": "matched",
                "brand": brand_id.map(|id| json!({ "id": id, "name": brand_name })),
                "brandId": brand_id,
                "confidence": confidence,
                "source": source,
            }),
            BrandResolution::AliasCreated {
                brand_id,
                brand_name,
                confidence,
            } => json!({
                "status": "alias_created",
                "brandId": brand_id,
                "brand": brand_name,
                "confidence": confidence,
            }),
            BrandResolution::Fallback { reason, confidence } => json!({
                "status": "fallback",
                "reason": reason.as_str(),
                "confidence": confidence,
            }),
            BrandResolution::Conflict { matches } => json!({
                "status": "fallback",
                "reason": "conflict",
                "matches": matches,
            }),
        }
    }
}

/// Resolves raw store-receipt strings to brand identities over a persisted
/// alias table. Sibling of the product classifier: shares its normalization
/// and fuzzy blend, but works against collaborator-owned storage and may
/// create one alias row per call.
#[derive(Clone)]
pub struct BrandResolver {
    logger: Logger,
    store: Arc<dyn BrandAliasStore>,
}

impl BrandResolver {
    pub fn new(logger: Logger, store: Arc<dyn BrandAliasStore>) -> Self {
        Self {
            logger: logger.child("resolver"),
            store,
        }
    }

    pub async fn resolve(&self, request: &ResolveRequest) -> Result<BrandResolution, ResolveError> {
        let normalized = normalize(&request.raw_name);
        if normalized.is_empty() {
            return Ok(BrandResolution::Fallback {
                reason: FallbackReason::MissingAlias,
                confidence: 0.0,
            });
        }

        let needles = lookup_needles(&normalized);
        let mut candidates = Vec::new();
        if let Some(store_id) = request.store_id {
            candidates.extend(
                self.store
                    .search(AliasScope::Store(store_id), &needles, resolve_constants::LOOKUP_LIMIT)
                    .await?,
            );
        }
        candidates.extend(
            self.store
                .search(AliasScope::Generic, &needles, resolve_constants::LOOKUP_LIMIT)
                .await?,
        );

        if candidates.is_empty() {
            return self.handle_miss(request, &normalized).await;
        }

        let scored = rescore(&normalized, candidates);
        let distinct_brands: HashSet<Option<Uuid>> =
            scored.iter().map(|(_, record)| record.brand_id).collect();
        let top_confidence = scored[0].0;

        if distinct_brands.len() > 1 && top_confidence >= resolve_constants::CONFLICT_MIN_CONFIDENCE {
            self.logger.warn(
                "ambiguous alias",
                Some(&json!({
                    "normalized": normalized,
                    "brands": distinct_brands.len(),
                    "topConfidence": top_confidence,
                })),
            );
            let matches = scored
                .iter()
                .take(resolve_constants::CONFLICT_MATCH_LIMIT)
                .map(|(confidence, record)| ConflictMatch {
                    brand_id: record.brand_id,
                    brand_name: record.brand_name.clone(),
                    confidence: *confidence,
                    source: record.source.clone(),
                })
                .collect();
            return Ok(BrandResolution::Conflict { matches });
        }

        let (confidence, best) = &scored[0];
        if *confidence < resolve_constants::MATCH_MIN_CONFIDENCE {
            return Ok(BrandResolution::Fallback {
                reason: FallbackReason::LowConfidence,
                confidence: *confidence,
            });
        }

        Ok(BrandResolution::Matched {
            brand_id: best.brand_id,
            brand_name: best.brand_name.clone(),
            confidence: *confidence,
            source: best.source.clone(),
        })
    }

    async fn handle_miss(
        &self,
        request: &ResolveRequest,
        normalized: &str,
    ) -> Result<BrandResolution, ResolveError> {
        let Some(brand_id) = request.brand_id else {
            return Ok(BrandResolution::Fallback {
                reason: FallbackReason::MissingAlias,
                confidence: 0.0,
            });
        };

        let record = self
            .store
            .insert(NewBrandAlias {
                alias: normalized.to_string(),
                brand_id,
                store_id: request.store_id,
                confidence: resolve_constants::AUTO_ALIAS_CONFIDENCE,
                source: resolve_constants::AUTO_ALIAS_SOURCE.to_string(),
            })
            .await?;
        self.logger.info(
            "alias created",
            Some(&json!({ "alias": normalized, "brandId": brand_id })),
        );
        Ok(BrandResolution::AliasCreated {
            brand_id,
            brand_name: record.brand_name,
            confidence: record.confidence,
        })
    }
}

/// Query tokens worth searching for: at least MIN_NEEDLE_LEN characters and
/// not purely numeric, capped at MAX_LOOKUP_TOKENS. Falls back to the first
/// two tokens as one phrase when nothing qualifies.
fn lookup_needles(normalized: &str) -> Vec<String> {
    let tokens = tokenize(normalized);
    let needles: Vec<String> = tokens
        .iter()
        .filter(|token| {
            token.chars().count() >= resolve_constants::MIN_NEEDLE_LEN
                && !token.chars().all(|c| c.is_ascii_digit())
        })
        .take(resolve_constants::MAX_LOOKUP_TOKENS)
        .cloned()
        .collect();
    if !needles.is_empty() {
        return needles;
    }
    let phrase = tokens
        .iter()
        .take(2)
        .cloned()
        .collect::<Vec<_>>()
        .join(" ");
    if phrase.is_empty() {
        Vec::new()
    } else {
        vec![phrase]
    }
}

/// Blends each candidate's stored confidence with a fresh token/Levenshtein
/// score against the query, keeping whichever is higher. Sorted descending;
/// ties break on alias, then stored confidence, for deterministic output.
fn rescore(normalized: &str, candidates: Vec<BrandAliasRecord>) -> Vec<(f64, BrandAliasRecord)> {
    let query_tokens = tokenize(normalized);
    let mut scored: Vec<(f64, BrandAliasRecord)> = candidates
        .into_iter()
        .map(|record| {
            let alias_tokens = tokenize(&record.alias);
            let token_score = jaccard(&query_tokens, &alias_tokens);
            let lev_score = levenshtein_score(&record.alias, normalized);
            let recomputed = round_to((token_score + lev_score) / 2.0, 3);
            (record.confidence.max(recomputed).min(1.0), record)
        })
        .collect();
    scored.sort_by(|a, b| {
        b.0.total_cmp(&a.0)
            .then_with(|| a.1.alias.cmp(&b.1.alias))
            .then_with(|| b.1.confidence.total_cmp(&a.1.confidence))
    });
    scored
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_needles_skips_short_and_numeric_tokens() {
        assert_eq!(
            lookup_needles("grace baked bean 300g"),
            vec!["grace", "baked", "bean"]
        );
        assert_eq!(lookup_needles("ox 12 99"), vec!["ox 12"]);
        assert!(lookup_needles("").is_empty());
    }

    #[test]
    fn rescore_prefers_recomputed_when_higher() {
        let record = BrandAliasRecord {
            alias: "grace coconut milk".to_string(),
            brand_id: None,
            brand_name: None,
            confidence: 0.1,
            source: "seed".to_string(),
            store_id: None,
            created_at: chrono::Utc::now(),
        };
        let scored = rescore("grace coconut milk", vec![record]);
        assert_eq!(scored[0].0, 1.0);
    }

    #[test]
    fn rescore_keeps_stored_confidence_when_higher() {
        let record = BrandAliasRecord {
            alias: "completely different".to_string(),
            brand_id: None,
            brand_name: None,
            confidence: 0.9,
            source: "seed".to_string(),
            store_id: None,
            created_at: chrono::Utc::now(),
        };
        let scored = rescore("grace coconut milk", vec![record]);
        assert_eq!(scored[0].0, 0.9);
    }
}
