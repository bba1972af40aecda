use crate::constants::storage as storage_constants;
use crate::errors::ResolveError;
use crate::stores::{AliasScope, BrandAliasRecord, BrandAliasStore, NewBrandAlias};
use async_trait::async_trait;
use bb8::Pool;
use bb8_postgres::PostgresConnectionManager;
use std::str::FromStr;
use std::time::Duration;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Config, NoTls, Row};

const SEARCH_COLUMNS: &str =
    "ba.alias, ba.brand_id, b.name AS brand_name, ba.confidence, ba.source, ba.store_id, ba.created_at";

/// Alias table access over a pooled Postgres connection. Schema is
/// collaborator-owned: `brand_aliases (alias, brand_id, confidence, source,
/// store_id, created_at)` with a `brands (id, name)` join for display names.
#[derive(Clone)]
pub struct PostgresAliasStore {
    pool: Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresAliasStore {
    pub async fn connect(database_url: &str) -> Result<Self, ResolveError> {
        let config = Config::from_str(database_url)
            .map_err(|err| ResolveError::invalid_params(format!("Invalid database url: {}", err)))?;
        let manager = PostgresConnectionManager::new(config, NoTls);
        let pool = Pool::builder()
            .max_size(storage_constants::POOL_MAX_SIZE)
            .connection_timeout(Duration::from_millis(storage_constants::CONNECT_TIMEOUT_MS))
            .build(manager)
            .await
            .map_err(|err| ResolveError::internal(format!("Pool setup failed: {}", err)))?;
        Ok(Self { pool })
    }

    pub fn with_pool(pool: Pool<PostgresConnectionManager<NoTls>>) -> Self {
        Self { pool }
    }

    fn map_row(row: &Row) -> Result<BrandAliasRecord, ResolveError> {
        Ok(BrandAliasRecord {
            alias: row
                .try_get("alias")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            brand_id: row
                .try_get("brand_id")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            brand_name: row
                .try_get("brand_name")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            confidence: row
                .try_get("confidence")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            source: row
                .try_get("source")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            store_id: row
                .try_get("store_id")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|err| ResolveError::lookup_failed(err.to_string()))?,
        })
    }
}

/// Escapes LIKE wildcards so a needle only ever matches as a literal
/// substring.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    format!("%{}%", escaped)
}

#[async_trait]
impl BrandAliasStore for PostgresAliasStore {
    async fn search(
        &self,
        scope: AliasScope,
        needles: &[String],
        limit: i64,
    ) -> Result<Vec<BrandAliasRecord>, ResolveError> {
        if needles.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self
            .pool
            .get()
            .await
            .map_err(|err| ResolveError::lookup_failed(format!("Connection failed: {}", err)))?;

        let patterns: Vec<String> = needles.iter().map(|needle| like_pattern(needle)).collect();
        let mut params: Vec<&(dyn ToSql + Sync)> = Vec::new();
        let scope_clause = match &scope {
            AliasScope::Store(store_id) => {
                params.push(store_id);
                "ba.store_id = $1".to_string()
            }
            AliasScope::Generic => "ba.store_id IS NULL".to_string(),
        };
        let alias_clause = patterns
            .iter()
            .map(|pattern| {
                params.push(pattern);
                format!("ba.alias ILIKE ${}", params.len())
            })
            .collect::<Vec<_>>()
            .join(" OR ");
        params.push(&limit);

        let sql = format!(
            "SELECT {} FROM brand_aliases ba \
             LEFT JOIN brands b ON b.id = ba.brand_id \
             WHERE {} AND ({}) \
             ORDER BY ba.confidence DESC, ba.alias ASC LIMIT ${}",
            SEARCH_COLUMNS,
            scope_clause,
            alias_clause,
            params.len()
        );

        let rows = conn
            .query(&sql, &params)
            .await
            .map_err(|err| ResolveError::lookup_failed(format!("Alias lookup failed: {}", err)))?;

        rows.iter().map(Self::map_row).collect()
    }

    async fn insert(&self, new: NewBrandAlias) -> Result<BrandAliasRecord, ResolveError> {
        let conn = self
            .pool
            .get()
            .await
            .map_err(|err| ResolveError::insert_failed(format!("Connection failed: {}", err)))?;
        let row = conn
            .query_one(
                "INSERT INTO brand_aliases (alias, brand_id, store_id, confidence, source) \
                 VALUES ($1, $2, $3, $4, $5) \
                 RETURNING alias, brand_id, \
                   (SELECT name FROM brands WHERE id = $2) AS brand_name, \
                   confidence, source, store_id, created_at",
                &[
                    &new.alias,
                    &new.brand_id,
                    &new.store_id,
                    &new.confidence,
                    &new.source,
                ],
            )
            .await
            .map_err(|err| ResolveError::insert_failed(format!("Alias insert failed: {}", err)))?;
        Self::map_row(&row).map_err(|err| ResolveError::insert_failed(err.message))
    }
}

#[cfg(test)]
mod tests {
    use super::like_pattern;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("curry"), "%curry%");
        assert_eq!(like_pattern("100% juice"), "%100\\% juice%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }
}
