pub mod normalize {
    /// Tokens dropped during full normalization. Marketing filler and unit
    /// noise that never distinguishes one product from another.
    pub const STOP_WORDS: &[&str] = &[
        "the", "brand", "fresh", "quality", "premium", "new", "extra", "choice", "product",
        "jamaican", "flavour", "flavor", "original", "best", "select", "size", "pack",
    ];

    /// Tokens the seed expander leaves alone when generating plural aliases.
    pub const SEED_STOP_WORDS: &[&str] =
        &["pack", "pkt", "pkg", "original", "brand", "fresh", "jamaican"];

    /// Minimum token length before a trailing `-s` is treated as a plural.
    pub const SINGULARIZE_MIN_LEN: usize = 4;
}

pub mod classify {
    /// Confidence assigned to every exact alias-index hit.
    pub const DICTIONARY_CONFIDENCE: f64 = 0.97;

    /// Fuzzy blend weights: jaccard * TOKEN_WEIGHT + levenshtein * LEV_WEIGHT.
    pub const FUZZY_TOKEN_WEIGHT: f64 = 0.6;
    pub const FUZZY_LEV_WEIGHT: f64 = 0.4;
    /// Entries scoring below this are dropped from fuzzy ranking.
    pub const FUZZY_MIN_SCORE: f64 = 0.45;
    /// Fuzzy confidences are clamped to [FUZZY_FLOOR, FUZZY_CAP]. The cap
    /// keeps every fuzzy hit strictly below an exact dictionary hit.
    pub const FUZZY_FLOOR: f64 = 0.40;
    pub const FUZZY_CAP: f64 = 0.88;

    /// Vector confidences are clamped to [min_confidence, VECTOR_CAP].
    pub const VECTOR_CAP: f64 = 0.75;
    /// Default cosine-similarity cutoff for the vector ranker.
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.28;

    /// Default result-list cap for `classify`.
    pub const DEFAULT_LIMIT: usize = 4;

    /// Confidence of the synthesized pantry fallback result.
    pub const FALLBACK_CONFIDENCE: f64 = 0.2;

    /// Tokens longer than this get the boosted term-frequency weight.
    pub const VECTOR_LONG_TOKEN_LEN: usize = 5;
    pub const VECTOR_LONG_TOKEN_WEIGHT: f64 = 1.3;

    /// Confidence-band cutoffs: >= AUTO is auto, >= REVIEW is needs_review.
    pub const BAND_AUTO: f64 = 0.70;
    pub const BAND_REVIEW: f64 = 0.40;
}

pub mod resolve {
    /// Rows fetched per alias-table lookup (store-scoped and generic each).
    pub const LOOKUP_LIMIT: i64 = 10;
    /// At most this many query tokens become lookup needles.
    pub const MAX_LOOKUP_TOKENS: usize = 3;
    /// Tokens shorter than this (or purely numeric) make poor needles and
    /// are skipped.
    pub const MIN_NEEDLE_LEN: usize = 3;
    /// Candidates listed in a conflict response.
    pub const CONFLICT_MATCH_LIMIT: usize = 5;
    /// A conflict is only raised when the top recomputed confidence reaches
    /// this; weaker ambiguity falls through to the normal pick.
    pub const CONFLICT_MIN_CONFIDENCE: f64 = 0.60;
    /// Below this the top candidate is reported as a low-confidence fallback.
    pub const MATCH_MIN_CONFIDENCE: f64 = 0.55;
    /// Confidence and source stamped on auto-created alias rows.
    pub const AUTO_ALIAS_CONFIDENCE: f64 = 0.45;
    pub const AUTO_ALIAS_SOURCE: &str = "auto";
}

pub mod storage {
    pub const POOL_MAX_SIZE: u32 = 10;
    pub const CONNECT_TIMEOUT_MS: u64 = 5_000;
}
