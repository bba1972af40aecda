mod memory_alias_store;
mod postgres_alias_store;

pub use memory_alias_store::MemoryAliasStore;
pub use postgres_alias_store::PostgresAliasStore;

use crate::errors::ResolveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A persisted mapping from an observed receipt string to a brand identity,
/// optionally scoped to one store. Rows are created by the resolver on cache
/// miss; updates are a collaborator concern.
#[derive(Debug, Clone, Serialize)]
pub struct BrandAliasRecord {
    pub alias: String,
    pub brand_id: Option<Uuid>,
    pub brand_name: Option<String>,
    pub confidence: f64,
    pub source: String,
    pub store_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBrandAlias {
    pub alias: String,
    pub brand_id: Uuid,
    pub store_id: Option<Uuid>,
    pub confidence: f64,
    pub source: String,
}

/// Which `store_id` predicate a lookup applies: rows for one store, or the
/// store-agnostic rows (`store_id IS NULL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AliasScope {
    Store(Uuid),
    Generic,
}

/// Capability boundary over the alias table. The resolver performs exactly
/// two scoped substring searches and at most one insert per call; callers
/// own timeouts and retries.
#[async_trait]
pub trait BrandAliasStore: Send + Sync {
    /// Rows in `scope` whose alias contains any of `needles` as a literal
    /// substring, capped at `limit`. One storage round-trip per call.
    async fn search(
        &self,
        scope: AliasScope,
        needles: &[String],
        limit: i64,
    ) -> Result<Vec<BrandAliasRecord>, ResolveError>;

    async fn insert(&self, new: NewBrandAlias) -> Result<BrandAliasRecord, ResolveError>;
}
