use crate::errors::ResolveError;
use crate::stores::{AliasScope, BrandAliasRecord, BrandAliasStore, NewBrandAlias};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory alias table with the same contract as the Postgres store.
/// Backs tests and offline runs; rows live for the process lifetime.
#[derive(Clone, Default)]
pub struct MemoryAliasStore {
    rows: Arc<RwLock<Vec<BrandAliasRecord>>>,
    brands: Arc<RwLock<HashMap<Uuid, String>>>,
}

impl MemoryAliasStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a brand display name so inserted rows can resolve it, the
    /// way the Postgres store joins the brands table.
    pub fn register_brand(&self, brand_id: Uuid, name: &str) {
        self.brands
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .insert(brand_id, name.to_string());
    }

    /// Seeds one alias row directly, bypassing the resolver.
    pub fn seed_alias(&self, record: BrandAliasRecord) {
        self.rows
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.read().unwrap_or_else(|err| err.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn brand_name(&self, brand_id: Uuid) -> Option<String> {
        self.brands
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .get(&brand_id)
            .cloned()
    }
}

#[async_trait]
impl BrandAliasStore for MemoryAliasStore {
    async fn search(
        &self,
        scope: AliasScope,
        needles: &[String],
        limit: i64,
    ) -> Result<Vec<BrandAliasRecord>, ResolveError> {
        if needles.is_empty() {
            return Ok(Vec::new());
        }
        let rows = self.rows.read().unwrap_or_else(|err| err.into_inner());
        let matches = rows
            .iter()
            .filter(|row| match scope {
                AliasScope::Store(store_id) => row.store_id == Some(store_id),
                AliasScope::Generic => row.store_id.is_none(),
            })
            .filter(|row| needles.iter().any(|needle| row.alias.contains(needle)))
            .take(limit.max(0) as usize)
            .cloned()
            .collect();
        Ok(matches)
    }

    async fn insert(&self, new: NewBrandAlias) -> Result<BrandAliasRecord, ResolveError> {
        let record = BrandAliasRecord {
            alias: new.alias,
            brand_id: Some(new.brand_id),
            brand_name: self.brand_name(new.brand_id),
            confidence: new.confidence,
            source: new.source,
            store_id: new.store_id,
            created_at: chrono::Utc::now(),
        };
        self.rows
            .write()
            .unwrap_or_else(|err| err.into_inner())
            .push(record.clone());
        Ok(record)
    }
}
