//! DDL generated from entity metadata: tables, foreign keys, join tables and indexes.
//! Every statement is idempotent, so migrations run on every start.

use crate::error::AppError;
use crate::model::{ColumnDef, ColumnKind, EntityDef};
use crate::sql::builder::quoted;
use sqlx::PgPool;

fn column_ddl(c: &ColumnDef) -> String {
    let mut def = format!("{} ", quoted(c.name));
    match c.kind {
        ColumnKind::BigInt => def.push_str("BIGINT"),
        ColumnKind::Text | ColumnKind::Enum(_) => def.push_str("VARCHAR(255)"),
        ColumnKind::Instant => def.push_str("TIMESTAMPTZ"),
        ColumnKind::Reference(_) => def.push_str("BIGINT"),
    }
    if c.required {
        def.push_str(" NOT NULL");
    }
    match c.kind {
        ColumnKind::Reference(table) => {
            def.push_str(&format!(" REFERENCES {} ({})", quoted(table), quoted("id")));
        }
        ColumnKind::Enum(values) => {
            let allowed: Vec<String> = values.iter().map(|v| format!("'{}'", v.replace('\'', "''"))).collect();
            def.push_str(&format!(" CHECK ({} IN ({}))", quoted(c.name), allowed.join(", ")));
        }
        _ => {}
    }
    def
}

/// Statements in execution order. `defs` must list referenced tables first.
pub fn ddl_statements(defs: &[&EntityDef]) -> Vec<String> {
    let mut out = Vec::new();
    for def in defs {
        let mut cols = vec![format!("{} BIGSERIAL PRIMARY KEY", quoted("id"))];
        cols.extend(def.columns.iter().map(column_ddl));
        out.push(format!(
            "CREATE TABLE IF NOT EXISTS {} (\n  {}\n)",
            quoted(def.table),
            cols.join(",\n  ")
        ));
        for c in def.columns {
            if matches!(c.kind, ColumnKind::Reference(_)) {
                out.push(format!(
                    "CREATE INDEX IF NOT EXISTS {} ON {} ({})",
                    quoted(&format!("idx_{}__{}", def.table, c.name)),
                    quoted(def.table),
                    quoted(c.name)
                ));
            }
        }
        for link in def.links {
            out.push(format!(
                "CREATE TABLE IF NOT EXISTS {join} (\n  {owner} BIGINT NOT NULL REFERENCES {table} ({id}) ON DELETE CASCADE,\n  {target} BIGINT NOT NULL REFERENCES {target_table} ({id}),\n  PRIMARY KEY ({owner}, {target})\n)",
                join = quoted(link.join_table),
                owner = quoted(link.owner_column),
                target = quoted(link.target_column),
                table = quoted(def.table),
                target_table = quoted(link.target_table),
                id = quoted("id"),
            ));
        }
    }
    out
}

/// Create every table that does not exist yet.
pub async fn apply_migrations(pool: &PgPool, defs: &[&EntityDef]) -> Result<(), AppError> {
    for sql in ddl_statements(defs) {
        tracing::debug!(sql = %sql, "migration");
        sqlx::query(&sql).execute(pool).await?;
    }
    tracing::info!(tables = defs.len(), "migrations applied");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DEPARTMENT, ENTITY_DEFS, JOB, JOB_HISTORY};

    #[test]
    fn required_and_reference_columns() {
        let ddl = ddl_statements(&[&DEPARTMENT]);
        assert!(ddl[0].contains("\"department_name\" VARCHAR(255) NOT NULL"));
        assert!(ddl[0].contains("\"location_id\" BIGINT REFERENCES \"location\" (\"id\")"));
        assert!(ddl.contains(&"CREATE INDEX IF NOT EXISTS \"idx_department__location_id\" ON \"department\" (\"location_id\")".to_string()));
    }

    #[test]
    fn enum_columns_are_checked() {
        let ddl = ddl_statements(&[&JOB_HISTORY]);
        assert!(ddl[0].contains("CHECK (\"language\" IN ('FRENCH', 'ENGLISH', 'SPANISH'))"));
    }

    #[test]
    fn join_table_follows_owner() {
        let ddl = ddl_statements(&[&JOB]);
        let last = ddl.last().unwrap();
        assert!(last.starts_with("CREATE TABLE IF NOT EXISTS \"rel_job__task\""));
        assert!(last.contains("PRIMARY KEY (\"job_id\", \"task_id\")"));
    }

    #[test]
    fn referenced_tables_are_created_first() {
        let ddl = ddl_statements(ENTITY_DEFS);
        let position = |table: &str| {
            ddl.iter()
                .position(|s| s.starts_with(&format!("CREATE TABLE IF NOT EXISTS \"{}\"", table)))
                .unwrap()
        };
        for def in ENTITY_DEFS {
            for c in def.columns {
                if let ColumnKind::Reference(target) = c.kind {
                    assert!(position(target) <= position(def.table), "{} before {}", target, def.table);
                }
            }
        }
    }
}
