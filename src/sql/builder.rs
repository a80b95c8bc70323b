//! Builds parameterized SELECT, COUNT, INSERT, UPDATE, DELETE from entity metadata and predicates.

use crate::model::{EntityDef, LinkDef, Record, Scalar};
use crate::query::{Clause, Condition, Predicate, Sort, Target, TextOp, Window};

const ALIAS: &str = "t";

/// Quote identifier for PostgreSQL (safe: only from static entity metadata).
pub(crate) fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

#[derive(Debug)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<Scalar>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: Scalar) -> usize {
        self.params.push(v);
        self.params.len()
    }

    /// Push a value and return its placeholder cast to `pg_type`.
    fn placeholder(&mut self, v: Scalar, pg_type: &str) -> String {
        let n = self.push_param(v);
        format!("${}::{}", n, pg_type)
    }
}

/// Column list: id first, then every declared column.
fn column_list(def: &EntityDef, alias: Option<&str>) -> String {
    let prefix = alias.map(|a| format!("{}.", a)).unwrap_or_default();
    std::iter::once("id")
        .chain(def.columns.iter().map(|c| c.name))
        .map(|c| format!("{}{}", prefix, quoted(c)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `%needle%`, lower-cased, with LIKE metacharacters escaped.
fn like_pattern(needle: &str) -> String {
    let escaped = needle
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

fn condition_sql(q: &mut QueryBuf, expr: &str, pg_type: &str, condition: &Condition) -> String {
    match condition {
        Condition::Range { op, value } => {
            let ph = q.placeholder(value.clone(), pg_type);
            format!("{} {} {}", expr, op.sql(), ph)
        }
        Condition::Text { op, value } => {
            let n = q.push_param(Scalar::Text(like_pattern(value)));
            let like = format!("LOWER({}) LIKE ${} ESCAPE '\\'", expr, n);
            match op {
                TextOp::Contains => like,
                TextOp::DoesNotContain => format!("NOT ({})", like),
            }
        }
        Condition::In(values) => {
            if values.is_empty() {
                return "FALSE".to_string();
            }
            let phs: Vec<String> = values.iter().map(|v| q.placeholder(v.clone(), pg_type)).collect();
            format!("{} IN ({})", expr, phs.join(", "))
        }
        Condition::Exists { present: true } => format!("{} IS NOT NULL", expr),
        Condition::Exists { present: false } => format!("{} IS NULL", expr),
    }
}

fn clause_sql(q: &mut QueryBuf, def: &EntityDef, clause: &Clause) -> String {
    let id = format!("{}.{}", ALIAS, quoted("id"));
    match clause.target {
        Target::Id => condition_sql(q, &id, "bigint", &clause.condition),
        Target::Column(c) => {
            let expr = format!("{}.{}", ALIAS, quoted(c));
            condition_sql(q, &expr, def.pg_type(c), &clause.condition)
        }
        Target::Related(path) => {
            let sub = format!(
                "SELECT 1 FROM {} r WHERE r.{} = {}",
                quoted(path.table),
                quoted(path.owner_column),
                id
            );
            match &clause.condition {
                Condition::Exists { present: true } => format!("EXISTS ({})", sub),
                Condition::Exists { present: false } => format!("NOT EXISTS ({})", sub),
                other => {
                    let expr = format!("r.{}", quoted(path.value_column));
                    let cond = condition_sql(q, &expr, "bigint", other);
                    format!("EXISTS ({} AND {})", sub, cond)
                }
            }
        }
    }
}

fn where_clause(q: &mut QueryBuf, def: &EntityDef, predicate: &Predicate) -> String {
    if predicate.is_all() {
        return String::new();
    }
    let parts: Vec<String> = predicate.clauses.iter().map(|c| clause_sql(q, def, c)).collect();
    format!(" WHERE {}", parts.join(" AND "))
}

/// Requested orders followed by an `id` tiebreak unless `id` is already ordered on.
fn order_clause(sort: &Sort) -> String {
    let mut parts: Vec<String> = sort
        .orders
        .iter()
        .map(|o| format!("{}.{} {}", ALIAS, quoted(o.column), o.direction.sql()))
        .collect();
    if !sort.orders.iter().any(|o| o.column == "id") {
        parts.push(format!("{}.{} ASC", ALIAS, quoted("id")));
    }
    format!(" ORDER BY {}", parts.join(", "))
}

/// SELECT rows matching the predicate, ordered, optionally windowed.
pub fn select(def: &EntityDef, predicate: &Predicate, sort: &Sort, window: Option<Window>) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, def, predicate);
    let window_sql = window
        .map(|w| format!(" LIMIT {} OFFSET {}", w.limit, w.offset))
        .unwrap_or_default();
    q.sql = format!(
        "SELECT {} FROM {} {}{}{}{}",
        column_list(def, Some(ALIAS)),
        quoted(def.table),
        ALIAS,
        where_sql,
        order_clause(sort),
        window_sql
    );
    q
}

pub fn count(def: &EntityDef, predicate: &Predicate) -> QueryBuf {
    let mut q = QueryBuf::new();
    let where_sql = where_clause(&mut q, def, predicate);
    q.sql = format!("SELECT COUNT(*) FROM {} {}{}", quoted(def.table), ALIAS, where_sql);
    q
}

pub fn select_by_id(def: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(Scalar::Int(id), "bigint");
    q.sql = format!(
        "SELECT {} FROM {} WHERE {} = {}",
        column_list(def, None),
        quoted(def.table),
        quoted("id"),
        ph
    );
    q
}

/// INSERT every declared column; the identifier comes from the sequence.
pub fn insert(def: &EntityDef, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let mut cols = Vec::new();
    let mut placeholders = Vec::new();
    for c in def.columns {
        cols.push(quoted(c.name));
        placeholders.push(q.placeholder(record.get(c.name), c.kind.pg_type()));
    }
    q.sql = format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING {}",
        quoted(def.table),
        cols.join(", "),
        placeholders.join(", "),
        column_list(def, None)
    );
    q
}

/// UPDATE every declared column of the row with `id`.
pub fn update(def: &EntityDef, id: i64, record: &Record) -> QueryBuf {
    let mut q = QueryBuf::new();
    let sets: Vec<String> = def
        .columns
        .iter()
        .map(|c| {
            let ph = q.placeholder(record.get(c.name), c.kind.pg_type());
            format!("{} = {}", quoted(c.name), ph)
        })
        .collect();
    let id_ph = q.placeholder(Scalar::Int(id), "bigint");
    q.sql = format!(
        "UPDATE {} SET {} WHERE {} = {} RETURNING {}",
        quoted(def.table),
        sets.join(", "),
        quoted("id"),
        id_ph,
        column_list(def, None)
    );
    q
}

pub fn delete(def: &EntityDef, id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(Scalar::Int(id), "bigint");
    q.sql = format!("DELETE FROM {} WHERE {} = {}", quoted(def.table), quoted("id"), ph);
    q
}

pub fn delete_links(link: &LinkDef, owner_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.placeholder(Scalar::Int(owner_id), "bigint");
    q.sql = format!(
        "DELETE FROM {} WHERE {} = {}",
        quoted(link.join_table),
        quoted(link.owner_column),
        ph
    );
    q
}

pub fn insert_link(link: &LinkDef, owner_id: i64, target_id: i64) -> QueryBuf {
    let mut q = QueryBuf::new();
    let owner = q.placeholder(Scalar::Int(owner_id), "bigint");
    let target = q.placeholder(Scalar::Int(target_id), "bigint");
    q.sql = format!(
        "INSERT INTO {} ({}, {}) VALUES ({}, {})",
        quoted(link.join_table),
        quoted(link.owner_column),
        quoted(link.target_column),
        owner,
        target
    );
    q
}

/// Links of several owners at once, with the target's label column. Columns: owner_id, target_id, label.
pub fn select_links(link: &LinkDef, owner_ids: &[i64]) -> QueryBuf {
    let mut q = QueryBuf::new();
    if owner_ids.is_empty() {
        q.sql = "SELECT NULL::bigint AS owner_id, NULL::bigint AS target_id, NULL::varchar AS label WHERE 1 = 0".into();
        return q;
    }
    let phs: Vec<String> = owner_ids
        .iter()
        .map(|id| q.placeholder(Scalar::Int(*id), "bigint"))
        .collect();
    q.sql = format!(
        "SELECT j.{owner} AS owner_id, j.{target} AS target_id, x.{label}::varchar AS label \
         FROM {join} j JOIN {table} x ON x.{id} = j.{target} \
         WHERE j.{owner} IN ({phs}) ORDER BY j.{owner}, j.{target}",
        owner = quoted(link.owner_column),
        target = quoted(link.target_column),
        label = quoted(link.label_column),
        join = quoted(link.join_table),
        table = quoted(link.target_table),
        id = quoted("id"),
        phs = phs.join(", ")
    );
    q
}
