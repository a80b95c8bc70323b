//! Static table/column descriptions. Identifiers in generated SQL only ever come from here.

/// Column kind: drives SQL casts, DDL types, row decoding and body validation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    BigInt,
    Text,
    Instant,
    /// Stored as VARCHAR, restricted to the listed values.
    Enum(&'static [&'static str]),
    /// Foreign key to the `id` of the named table.
    Reference(&'static str),
}

impl ColumnKind {
    /// PostgreSQL type used for placeholders and DDL.
    pub fn pg_type(&self) -> &'static str {
        match self {
            ColumnKind::BigInt | ColumnKind::Reference(_) => "bigint",
            ColumnKind::Text | ColumnKind::Enum(_) => "varchar",
            ColumnKind::Instant => "timestamptz",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ColumnDef {
    /// SQL column name.
    pub name: &'static str,
    /// Wire (DTO) field name. For references this is the nested object, e.g. `region`.
    pub field: &'static str,
    pub kind: ColumnKind,
    pub required: bool,
}

impl ColumnDef {
    pub const fn text(name: &'static str, field: &'static str) -> Self {
        ColumnDef { name, field, kind: ColumnKind::Text, required: false }
    }

    pub const fn big_int(name: &'static str, field: &'static str) -> Self {
        ColumnDef { name, field, kind: ColumnKind::BigInt, required: false }
    }

    pub const fn instant(name: &'static str, field: &'static str) -> Self {
        ColumnDef { name, field, kind: ColumnKind::Instant, required: false }
    }

    pub const fn enumeration(name: &'static str, field: &'static str, values: &'static [&'static str]) -> Self {
        ColumnDef { name, field, kind: ColumnKind::Enum(values), required: false }
    }

    pub const fn reference(name: &'static str, field: &'static str, table: &'static str) -> Self {
        ColumnDef { name, field, kind: ColumnKind::Reference(table), required: false }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// Owned side of a many-to-many relationship, stored in a join table.
#[derive(Clone, Copy, Debug)]
pub struct LinkDef {
    /// Wire field and record link name, e.g. `tasks`.
    pub name: &'static str,
    pub join_table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
    pub target_table: &'static str,
    /// Column of the target projected next to its id (`{id, title}`).
    pub label_column: &'static str,
}

/// Path from an entity row to related rows: rows of `table` whose `owner_column`
/// equals our id; the related identifier is read from `value_column`.
/// Covers reverse one-to-many (value_column = "id") and join tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelationPath {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub value_column: &'static str,
}

#[derive(Debug)]
pub struct EntityDef {
    /// Entity name used in alerts and error payloads (`country`, `jobHistory`).
    pub name: &'static str,
    /// Collection path segment (`countries`, `job-histories`).
    pub path: &'static str,
    pub table: &'static str,
    /// All columns except the `id` primary key.
    pub columns: &'static [ColumnDef],
    pub links: &'static [LinkDef],
    /// Lists and searches are served as pages with total-count headers.
    pub paginated: bool,
}

impl EntityDef {
    pub fn column(&self, name: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.field == field)
    }

    /// Resolve a wire field name (or `id`) to its SQL column for sorting.
    pub fn sort_column(&self, field: &str) -> Option<&'static str> {
        if field == "id" {
            return Some("id");
        }
        self.column_by_field(field).map(|c| c.name)
    }

    /// PostgreSQL type of a column, `id` included.
    pub fn pg_type(&self, column: &str) -> &'static str {
        self.column(column).map(|c| c.kind.pg_type()).unwrap_or("bigint")
    }
}
