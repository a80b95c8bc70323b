//! PostgreSQL document index using `simple` full-text search over the JSON document.

use crate::search::{is_match_all, SearchError, SearchHits, SearchIndex};
use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, Row};

const SCHEMA: &str = "search";

/// Create the `search` schema, documents table and full-text index if missing.
pub async fn ensure_search_tables(pool: &PgPool) -> Result<(), SearchError> {
    let statements = [
        format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA),
        format!(
            r#"
            CREATE TABLE IF NOT EXISTS {}.documents (
                index_name VARCHAR(64) NOT NULL,
                id BIGINT NOT NULL,
                document JSONB NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                PRIMARY KEY (index_name, id)
            )
            "#,
            SCHEMA
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS documents_fts ON {}.documents USING GIN (to_tsvector('simple', document::text))",
            SCHEMA
        ),
    ];
    for sql in statements {
        sqlx::query(&sql).execute(pool).await?;
    }
    Ok(())
}

#[derive(Clone)]
pub struct PgSearchIndex {
    pool: PgPool,
}

impl PgSearchIndex {
    pub fn new(pool: PgPool) -> Self {
        PgSearchIndex { pool }
    }
}

#[async_trait]
impl SearchIndex for PgSearchIndex {
    async fn index(&self, index: &str, id: i64, document: Value) -> Result<(), SearchError> {
        let sql = format!(
            "INSERT INTO {}.documents (index_name, id, document) VALUES ($1, $2, $3) \
             ON CONFLICT (index_name, id) DO UPDATE SET document = EXCLUDED.document, updated_at = NOW()",
            SCHEMA
        );
        tracing::debug!(sql = %sql, index = %index, id, "search index");
        sqlx::query(&sql)
            .bind(index)
            .bind(id)
            .bind(document)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn remove(&self, index: &str, id: i64) -> Result<(), SearchError> {
        let sql = format!("DELETE FROM {}.documents WHERE index_name = $1 AND id = $2", SCHEMA);
        tracing::debug!(sql = %sql, index = %index, id, "search remove");
        sqlx::query(&sql).bind(index).bind(id).execute(&self.pool).await?;
        Ok(())
    }

    async fn search(
        &self,
        index: &str,
        query: &str,
        limit: Option<u64>,
        offset: u64,
    ) -> Result<SearchHits, SearchError> {
        let all = is_match_all(query);
        let filter = if all {
            String::new()
        } else {
            " AND to_tsvector('simple', document::text) @@ websearch_to_tsquery('simple', $2)".to_string()
        };
        let window = limit
            .map(|l| format!(" LIMIT {} OFFSET {}", l, offset))
            .unwrap_or_default();
        let select_sql = format!(
            "SELECT document FROM {}.documents WHERE index_name = $1{} ORDER BY id{}",
            SCHEMA, filter, window
        );
        let count_sql = format!("SELECT COUNT(*) FROM {}.documents WHERE index_name = $1{}", SCHEMA, filter);
        tracing::debug!(sql = %select_sql, index = %index, query = %query, "search");

        let mut select = sqlx::query(&select_sql).bind(index);
        let mut count = sqlx::query(&count_sql).bind(index);
        if !all {
            select = select.bind(query);
            count = count.bind(query);
        }
        let rows = select.fetch_all(&self.pool).await?;
        let total: i64 = count.fetch_one(&self.pool).await?.try_get(0)?;
        let documents = rows
            .iter()
            .map(|row| row.try_get::<Value, _>("document"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SearchHits {
            total: total.max(0) as u64,
            documents,
        })
    }
}
