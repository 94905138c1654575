//! Canonical schema-state types.
//!
//! A [`SchemaState`] is a source-agnostic snapshot of a database
//! schema. Both the model-derived and live-database builders produce
//! this shape, so the differ can compare them without caring which
//! engine or modeling convention produced either side.

use std::any;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Opaque tag linking a canonical table back to the application type
/// it was declared by.
///
/// Carries no behavior; downstream tooling uses it to map a table in a
/// diff back to its originating model. Live inspection produces tables
/// without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelHandle(String);

impl ModelHandle {
    /// Creates a handle for the model type `M`.
    #[must_use]
    pub fn of<M: 'static>() -> Self {
        Self(any::type_name::<M>().to_owned())
    }

    /// Creates a handle from an explicit type name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the recorded type name.
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.0
    }
}

/// Canonical description of a single column.
///
/// Two columns from different sources are never compared by raw field
/// equality alone; the dialect's equivalence oracle decides whether
/// aliased types or omitted lengths still describe the same column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnState {
    /// Lowercase base type name, length qualifier stripped.
    pub sql_type: String,
    /// Length qualifier; 0 means unspecified.
    pub varchar_len: u32,
    /// Normalized default expression, when one is declared.
    pub default_value: Option<String>,
    /// Whether the column is part of the primary key.
    pub is_pk: bool,
    /// Whether the column allows NULL.
    pub is_nullable: bool,
    /// Whether the column auto-increments.
    pub is_auto_increment: bool,
    /// Whether the column is a generated identity column.
    pub is_identity: bool,
}

/// One side of a foreign-key relationship: a (schema, table, columns)
/// tuple. Column order is positional correspondence for composite keys.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColumnRef {
    /// Schema the table lives in.
    pub schema: String,
    /// Table name.
    pub table: String,
    /// Ordered column list.
    pub columns: Vec<String>,
}

impl ColumnRef {
    /// Creates a reference to columns of `schema.table`.
    #[must_use]
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        columns: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// A foreign-key relationship descriptor.
///
/// Value equality and ordering derive purely from the referencing and
/// referenced tuples, so two independently built descriptors for the
/// same relationship collide when used as a map key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ForeignKey {
    /// The referencing side.
    pub from: ColumnRef,
    /// The referenced side.
    pub to: ColumnRef,
}

/// Canonical description of a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableState {
    /// Schema the table lives in.
    pub schema: String,
    /// Table name; (schema, name) is unique within a state.
    pub name: String,
    /// Originating model, when built from declarations.
    pub model: Option<ModelHandle>,
    /// Columns keyed by name.
    pub columns: BTreeMap<String, ColumnState>,
}

impl TableState {
    /// Looks up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnState> {
        self.columns.get(name)
    }
}

/// The canonical snapshot of a schema: tables plus the foreign keys
/// between them, each FK mapped to its constraint name (empty when the
/// source cannot know it, e.g. model declarations).
///
/// A state is an immutable value produced in one pass over its source;
/// it owns no connections or other external resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaState {
    /// Tables in deterministic source order.
    pub tables: Vec<TableState>,
    /// Foreign keys mapped to their constraint names.
    pub foreign_keys: BTreeMap<ForeignKey, String>,
}

impl SchemaState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a table by schema and name.
    #[must_use]
    pub fn table(&self, schema: &str, name: &str) -> Option<&TableState> {
        self.tables
            .iter()
            .find(|t| t.schema == schema && t.name == name)
    }
}
