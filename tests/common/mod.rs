#![allow(dead_code)]

use once_cell::sync::Lazy;
use pantrymatch::services::brand_resolver::BrandResolver;
use pantrymatch::services::classifier::Classifier;
use pantrymatch::services::dictionary::{load_builtin_seeds, DictionaryIndex};
use pantrymatch::services::logger::Logger;
use pantrymatch::stores::BrandAliasStore;
use std::sync::Arc;

/// One shared index for the whole test binary; building it per test would
/// just re-expand the same seed file.
pub static INDEX: Lazy<Arc<DictionaryIndex>> = Lazy::new(|| {
    let seeds = load_builtin_seeds().expect("builtin seed dictionary must parse");
    Arc::new(DictionaryIndex::from_seed_file(&seeds))
});

pub fn classifier() -> Classifier {
    Classifier::new(Logger::new("test"), INDEX.clone())
}

pub fn resolver(store: Arc<dyn BrandAliasStore>) -> BrandResolver {
    BrandResolver::new(Logger::new("test"), store)
}
