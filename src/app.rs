use crate::errors::ResolveError;
use crate::services::brand_resolver::BrandResolver;
use crate::services::classifier::Classifier;
use crate::services::dictionary::{load_builtin_seeds, DictionaryIndex};
use crate::services::logger::Logger;
use crate::stores::BrandAliasStore;
use std::sync::Arc;

/// Explicitly wired application state. The dictionary index is built once
/// here and shared read-only; nothing in the crate reaches for ambient
/// globals, so tests and embedders can hold several independently
/// configured instances.
pub struct App {
    pub logger: Logger,
    pub classifier: Classifier,
    pub resolver: Option<BrandResolver>,
}

impl App {
    pub fn initialize() -> Result<Self, ResolveError> {
        let logger = Logger::new("pantrymatch");
        let seeds = load_builtin_seeds().map_err(|err| {
            ResolveError::internal(format!("Seed dictionary failed to parse: {}", err))
        })?;
        let index = Arc::new(DictionaryIndex::from_seed_file(&seeds));
        logger.debug("dictionary ready", Some(&index.stats()));
        let classifier = Classifier::new(logger.clone(), index);
        Ok(Self {
            logger,
            classifier,
            resolver: None,
        })
    }

    /// Attaches a brand resolver backed by the given alias store.
    pub fn with_alias_store(mut self, store: Arc<dyn BrandAliasStore>) -> Self {
        self.resolver = Some(BrandResolver::new(self.logger.clone(), store));
        self
    }
}
