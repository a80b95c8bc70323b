//! In-memory record store with the same predicate, ordering and link semantics as PostgreSQL.

use crate::error::AppError;
use crate::model::{ColumnKind, EntityDef, LinkDef, LinkRef, Record, RelationPath, Scalar};
use crate::query::{Clause, Direction, Predicate, Sort, Target, Window};
use crate::store::RecordStore;
use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tokio::sync::RwLock;

#[derive(Default)]
struct Tables {
    rows: HashMap<&'static str, BTreeMap<i64, Record>>,
    /// Join-table rows as (owner, target) pairs.
    joins: HashMap<&'static str, BTreeSet<(i64, i64)>>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn table(&self, name: &str) -> Option<&BTreeMap<i64, Record>> {
        self.rows.get(name)
    }

    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }

    /// First table still pointing at row `id` of `def`, through a join table or a foreign-key column.
    fn referenced_by(&self, def: &EntityDef, id: i64) -> Option<&'static str> {
        for other in crate::domain::ENTITY_DEFS {
            for link in other.links.iter().filter(|l| l.target_table == def.table) {
                if self.joins.get(link.join_table).is_some_and(|p| p.iter().any(|(_, t)| *t == id)) {
                    return Some(link.join_table);
                }
            }
            for c in other.columns {
                if c.kind != ColumnKind::Reference(def.table) {
                    continue;
                }
                if self.table(other.table).is_some_and(|rows| rows.values().any(|r| r.int(c.name) == Some(id))) {
                    return Some(other.table);
                }
            }
        }
        None
    }

    /// Identifiers reached from row `id` along `path`.
    fn related(&self, path: &RelationPath, id: i64) -> Vec<Scalar> {
        if let Some(pairs) = self.joins.get(path.table) {
            let owner_first = join_owner_first(path);
            return pairs
                .iter()
                .filter_map(|(a, b)| {
                    let (owner, value) = if owner_first { (*a, *b) } else { (*b, *a) };
                    (owner == id).then_some(Scalar::Int(value))
                })
                .collect();
        }
        self.table(path.table)
            .map(|rows| {
                rows.values()
                    .filter(|r| r.int(path.owner_column) == Some(id))
                    .map(|r| r.get(path.value_column))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn matches(&self, record: &Record, predicate: &Predicate) -> bool {
        predicate.clauses.iter().all(|clause| self.clause_matches(record, clause))
    }

    fn clause_matches(&self, record: &Record, clause: &Clause) -> bool {
        match clause.target {
            Target::Id => clause.condition.matches(&record.get("id")),
            Target::Column(c) => clause.condition.matches(&record.get(c)),
            Target::Related(path) => match record.id {
                Some(id) => clause.condition.matches_any(&self.related(path, id)),
                None => false,
            },
        }
    }

    fn links_of(&self, link: &LinkDef, owner: i64) -> Vec<LinkRef> {
        let targets = self.table(link.target_table);
        self.joins
            .get(link.join_table)
            .map(|pairs| {
                pairs
                    .iter()
                    .filter(|(o, _)| *o == owner)
                    .map(|(_, t)| LinkRef {
                        id: *t,
                        label: targets
                            .and_then(|rows| rows.get(t))
                            .and_then(|r| r.text(link.label_column)),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    fn hydrate(&self, def: &EntityDef, mut record: Record) -> Record {
        record.links.clear();
        if let Some(id) = record.id {
            for link in def.links {
                record.links.insert(link.name, self.links_of(link, id));
            }
        }
        record
    }

    fn write_links(&mut self, def: &EntityDef, owner: i64, record: &Record) {
        for link in def.links {
            let pairs = self.joins.entry(link.join_table).or_default();
            pairs.retain(|(o, _)| *o != owner);
            pairs.extend(record.links(link.name).iter().map(|l| (owner, l.id)));
        }
    }

    /// Stored rows keep scalar values only; links live in the join sets.
    fn stored(id: i64, record: &Record) -> Record {
        Record {
            id: Some(id),
            values: record.values.clone(),
            links: BTreeMap::new(),
        }
    }
}

/// Join tables are stored as (owner_column, target_column) of their [`LinkDef`];
/// a relation path may walk them from either side.
fn join_owner_first(path: &RelationPath) -> bool {
    crate::domain::ENTITY_DEFS
        .iter()
        .flat_map(|d| d.links.iter())
        .find(|l| l.join_table == path.table)
        .map(|l| l.owner_column == path.owner_column)
        .unwrap_or(true)
}

/// PostgreSQL ordering: NULLs sort after every value in ascending order, first in descending.
fn compare_for_sort(a: &Scalar, b: &Scalar) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.compare(b).unwrap_or(Ordering::Equal),
    }
}

fn compare_records(sort: &Sort, a: &Record, b: &Record) -> Ordering {
    for order in &sort.orders {
        let ord = compare_for_sort(&a.get(order.column), &b.get(order.column));
        let ord = match order.direction {
            Direction::Asc => ord,
            Direction::Desc => ord.reverse(),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.id.cmp(&b.id)
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Number of rows currently stored for an entity.
    pub async fn row_count(&self, def: &EntityDef) -> usize {
        self.tables.read().await.table(def.table).map(BTreeMap::len).unwrap_or(0)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn insert(&self, def: &'static EntityDef, record: Record) -> Result<Record, AppError> {
        let mut tables = self.tables.write().await;
        let id = tables.next_id(def.table);
        tables.rows.entry(def.table).or_default().insert(id, Tables::stored(id, &record));
        tables.write_links(def, id, &record);
        Ok(tables.hydrate(def, Tables::stored(id, &record)))
    }

    async fn update(&self, def: &'static EntityDef, id: i64, record: Record) -> Result<Option<Record>, AppError> {
        let mut tables = self.tables.write().await;
        if !tables.table(def.table).is_some_and(|rows| rows.contains_key(&id)) {
            return Ok(None);
        }
        tables.rows.entry(def.table).or_default().insert(id, Tables::stored(id, &record));
        tables.write_links(def, id, &record);
        Ok(Some(tables.hydrate(def, Tables::stored(id, &record))))
    }

    async fn find_by_id(&self, def: &'static EntityDef, id: i64) -> Result<Option<Record>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .table(def.table)
            .and_then(|rows| rows.get(&id))
            .cloned()
            .map(|r| tables.hydrate(def, r)))
    }

    async fn delete_by_id(&self, def: &'static EntityDef, id: i64) -> Result<bool, AppError> {
        let mut tables = self.tables.write().await;
        if let Some(table) = tables.referenced_by(def, id) {
            return Err(AppError::Conflict(format!(
                "{} {} is still referenced from {}",
                def.table, id, table
            )));
        }
        let removed = tables
            .rows
            .get_mut(def.table)
            .and_then(|rows| rows.remove(&id))
            .is_some();
        for link in def.links {
            if let Some(pairs) = tables.joins.get_mut(link.join_table) {
                pairs.retain(|(o, _)| *o != id);
            }
        }
        Ok(removed)
    }

    async fn select(
        &self,
        def: &'static EntityDef,
        predicate: &Predicate,
        sort: &Sort,
        window: Option<Window>,
    ) -> Result<Vec<Record>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Record> = tables
            .table(def.table)
            .map(|rows| rows.values().filter(|r| tables.matches(r, predicate)).cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| compare_records(sort, a, b));
        let rows = match window {
            Some(w) => rows
                .into_iter()
                .skip(w.offset as usize)
                .take(w.limit as usize)
                .collect(),
            None => rows,
        };
        Ok(rows.into_iter().map(|r| tables.hydrate(def, r)).collect())
    }

    async fn count(&self, def: &'static EntityDef, predicate: &Predicate) -> Result<u64, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .table(def.table)
            .map(|rows| rows.values().filter(|r| tables.matches(r, predicate)).count() as u64)
            .unwrap_or(0))
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
