//! Generic record execution against PostgreSQL.

use crate::error::AppError;
use crate::model::{ColumnKind, EntityDef, LinkRef, Record, Scalar};
use crate::query::{Predicate, Sort, Window};
use crate::sql::{self, QueryBuf};
use crate::store::RecordStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row};
use std::collections::HashMap;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn query_many(&self, q: &QueryBuf) -> Result<Vec<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        Ok(bind(q).fetch_all(&self.pool).await?)
    }

    async fn query_optional(&self, q: &QueryBuf) -> Result<Option<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        Ok(bind(q).fetch_optional(&self.pool).await?)
    }

    async fn execute_returning_one_tx(conn: &mut PgConnection, q: &QueryBuf) -> Result<Option<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        bind(q).fetch_optional(&mut *conn).await.map_err(constraint_error)
    }

    async fn execute_tx(conn: &mut PgConnection, q: &QueryBuf) -> Result<u64, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let done = bind(q).execute(&mut *conn).await.map_err(constraint_error)?;
        Ok(done.rows_affected())
    }

    /// Replace the join-table rows of `owner_id` with the links carried by `record`.
    async fn write_links(
        conn: &mut PgConnection,
        def: &EntityDef,
        owner_id: i64,
        record: &Record,
    ) -> Result<(), AppError> {
        for link in def.links {
            Self::execute_tx(conn, &sql::delete_links(link, owner_id)).await?;
            for target in record.links(link.name) {
                Self::execute_tx(conn, &sql::insert_link(link, owner_id, target.id)).await?;
            }
        }
        Ok(())
    }

    /// Fill the links of every record with one query per link.
    async fn hydrate_links(&self, def: &EntityDef, records: &mut [Record]) -> Result<(), AppError> {
        if def.links.is_empty() || records.is_empty() {
            return Ok(());
        }
        let ids: Vec<i64> = records.iter().filter_map(|r| r.id).collect();
        for link in def.links {
            let rows = self.query_many(&sql::select_links(link, &ids)).await?;
            let mut by_owner: HashMap<i64, Vec<LinkRef>> = HashMap::new();
            for row in rows {
                let owner: i64 = row.try_get("owner_id")?;
                let id: i64 = row.try_get("target_id")?;
                let label: Option<String> = row.try_get("label")?;
                by_owner.entry(owner).or_default().push(LinkRef { id, label });
            }
            for r in records.iter_mut() {
                let links = r.id.and_then(|id| by_owner.remove(&id)).unwrap_or_default();
                r.links.insert(link.name, links);
            }
        }
        Ok(())
    }

    async fn reload(&self, def: &'static EntityDef, row: PgRow) -> Result<Record, AppError> {
        let mut records = vec![row_to_record(def, &row)?];
        self.hydrate_links(def, &mut records).await?;
        records
            .pop()
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))
    }
}

fn bind(q: &QueryBuf) -> sqlx::query::Query<'_, Postgres, PgArguments> {
    let mut query = sqlx::query(&q.sql);
    for p in &q.params {
        query = query.bind(p.clone());
    }
    query
}

/// Unique and foreign-key violations are the caller's fault, not the server's.
fn constraint_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() || db.is_foreign_key_violation() {
            return AppError::Conflict(db.message().to_string());
        }
    }
    AppError::Db(e)
}

fn row_to_record(def: &EntityDef, row: &PgRow) -> Result<Record, AppError> {
    let id: i64 = row.try_get("id")?;
    let mut record = Record::new(Some(id));
    for c in def.columns {
        let value: Scalar = match c.kind {
            ColumnKind::BigInt | ColumnKind::Reference(_) => row.try_get::<Option<i64>, _>(c.name)?.into(),
            ColumnKind::Text | ColumnKind::Enum(_) => row.try_get::<Option<String>, _>(c.name)?.into(),
            ColumnKind::Instant => row.try_get::<Option<DateTime<Utc>>, _>(c.name)?.into(),
        };
        record.set(c.name, value);
    }
    Ok(record)
}

#[async_trait]
impl RecordStore for PgStore {
    async fn insert(&self, def: &'static EntityDef, record: Record) -> Result<Record, AppError> {
        let mut tx = self.pool.begin().await?;
        let row = Self::execute_returning_one_tx(&mut tx, &sql::insert(def, &record))
            .await?
            .ok_or_else(|| AppError::Db(sqlx::Error::RowNotFound))?;
        let id: i64 = row.try_get("id")?;
        Self::write_links(&mut tx, def, id, &record).await?;
        tx.commit().await?;
        self.reload(def, row).await
    }

    async fn update(&self, def: &'static EntityDef, id: i64, record: Record) -> Result<Option<Record>, AppError> {
        let mut tx = self.pool.begin().await?;
        let Some(row) = Self::execute_returning_one_tx(&mut tx, &sql::update(def, id, &record)).await? else {
            return Ok(None);
        };
        Self::write_links(&mut tx, def, id, &record).await?;
        tx.commit().await?;
        Ok(Some(self.reload(def, row).await?))
    }

    async fn find_by_id(&self, def: &'static EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        match self.query_optional(&sql::select_by_id(def, id)).await? {
            Some(row) => Ok(Some(self.reload(def, row).await?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, def: &'static EntityDef, id: i64) -> Result<bool, AppError> {
        let mut tx = self.pool.begin().await?;
        let removed = Self::execute_tx(&mut tx, &sql::delete(def, id)).await?;
        tx.commit().await?;
        Ok(removed > 0)
    }

    async fn select(
        &self,
        def: &'static EntityDef,
        predicate: &Predicate,
        sort: &Sort,
        window: Option<Window>,
    ) -> Result<Vec<Record>, AppError> {
        let rows = self.query_many(&sql::select(def, predicate, sort, window)).await?;
        let mut records = rows
            .iter()
            .map(|row| row_to_record(def, row))
            .collect::<Result<Vec<_>, _>>()?;
        self.hydrate_links(def, &mut records).await?;
        Ok(records)
    }

    async fn count(&self, def: &'static EntityDef, predicate: &Predicate) -> Result<u64, AppError> {
        let q = sql::count(def, predicate);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let n: i64 = bind(&q).fetch_one(&self.pool).await?.try_get(0)?;
        Ok(n.max(0) as u64)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}
