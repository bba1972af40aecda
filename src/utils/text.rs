use crate::constants::classify as classify_constants;
use std::collections::{HashMap, HashSet};

pub fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    if a_chars.is_empty() {
        return b_chars.len();
    }
    if b_chars.is_empty() {
        return a_chars.len();
    }

    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0; b_chars.len() + 1];

    for (i, ca) in a_chars.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b_chars.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }
    prev[b_chars.len()]
}

/// `1 - distance / max(len(a), len(b), 1)`, over character counts.
pub fn levenshtein_score(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count()).max(1);
    1.0 - levenshtein(a, b) as f64 / max_len as f64
}

/// Intersection-over-union of two token sets; 0 when either side is empty.
pub fn jaccard(a: &[String], b: &[String]) -> f64 {
    let set_a: HashSet<&str> = a.iter().map(|t| t.as_str()).collect();
    let set_b: HashSet<&str> = b.iter().map(|t| t.as_str()).collect();
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    intersection as f64 / union as f64
}

/// Term-frequency vector with a weight boost for long tokens.
pub fn build_vector(tokens: &[String]) -> HashMap<String, f64> {
    let mut vector = HashMap::new();
    for token in tokens {
        if token.is_empty() {
            continue;
        }
        let weight = if token.chars().count() > classify_constants::VECTOR_LONG_TOKEN_LEN {
            classify_constants::VECTOR_LONG_TOKEN_WEIGHT
        } else {
            1.0
        };
        *vector.entry(token.clone()).or_insert(0.0) += weight;
    }
    vector
}

pub fn cosine_similarity(a: &HashMap<String, f64>, b: &HashMap<String, f64>) -> f64 {
    let mut dot = 0.0;
    let mut norm_a = 0.0;
    for (token, value) in a {
        norm_a += value * value;
        if let Some(other) = b.get(token) {
            dot += value * other;
        }
    }
    let norm_b: f64 = b.values().map(|value| value * value).sum();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}

pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn levenshtein_counts_edits() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_score_is_bounded() {
        assert_eq!(levenshtein_score("abc", "abc"), 1.0);
        assert_eq!(levenshtein_score("abc", "xyz"), 0.0);
        assert!(levenshtein_score("curry", "cury") > 0.7);
    }

    #[test]
    fn jaccard_handles_empty_sides() {
        assert_eq!(jaccard(&[], &tokens(&["a"])), 0.0);
        assert_eq!(jaccard(&tokens(&["a", "b"]), &tokens(&["b", "c"])), 1.0 / 3.0);
    }

    #[test]
    fn build_vector_boosts_long_tokens() {
        let vector = build_vector(&tokens(&["curry", "powder", "curry"]));
        assert_eq!(vector.get("curry"), Some(&2.0));
        assert_eq!(vector.get("powder"), Some(&1.3));
    }

    #[test]
    fn cosine_similarity_of_identical_vectors_is_one() {
        let vector = build_vector(&tokens(&["curry", "powder"]));
        let score = cosine_similarity(&vector, &vector);
        assert!((score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn cosine_similarity_zero_when_disjoint() {
        let a = build_vector(&tokens(&["curry"]));
        let b = build_vector(&tokens(&["bleach"]));
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn round_to_truncates_noise() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(0.5554, 3), 0.555);
    }
}
