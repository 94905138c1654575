//! Schema differ.
//!
//! Compares two canonical [`SchemaState`] snapshots (typically the
//! live database against the model-derived state) and produces the
//! ordered operations needed to migrate the first into the second.
//! Column comparison goes through the dialect's equivalence oracle,
//! never raw field equality.

use std::collections::BTreeMap;

use tracing::debug;

use crate::dialect::InspectorDialect;
use crate::state::{ColumnState, ForeignKey, SchemaState, TableState};

/// A single migration operation produced by the differ.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Create a table that only exists in the target state.
    CreateTable {
        /// The table to create.
        table: TableState,
    },
    /// Add a column that only exists in the target table.
    AddColumn {
        /// Schema of the owning table.
        schema: String,
        /// Name of the owning table.
        table: String,
        /// Column name.
        column: String,
        /// Target column definition.
        definition: ColumnState,
    },
    /// Add a foreign key that only exists in the target state.
    AddForeignKey {
        /// The relationship to constrain.
        fk: ForeignKey,
    },
    /// Change a column the oracle judges non-equivalent.
    AlterColumn {
        /// Schema of the owning table.
        schema: String,
        /// Name of the owning table.
        table: String,
        /// Column name.
        column: String,
        /// Current definition.
        from: ColumnState,
        /// Target definition.
        to: ColumnState,
    },
    /// Drop a foreign key absent from the target state.
    DropForeignKey {
        /// The relationship to unconstrain.
        fk: ForeignKey,
        /// Constraint name as reported by live inspection.
        constraint: String,
    },
    /// Drop a column absent from the target table.
    DropColumn {
        /// Schema of the owning table.
        schema: String,
        /// Name of the owning table.
        table: String,
        /// Column name.
        column: String,
    },
    /// Drop a table absent from the target state.
    DropTable {
        /// Schema of the table.
        schema: String,
        /// Table name.
        name: String,
    },
}

impl Operation {
    /// Whether the operation destroys existing schema objects.
    #[must_use]
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            Self::DropForeignKey { .. } | Self::DropColumn { .. } | Self::DropTable { .. }
        )
    }
}

/// The ordered outcome of diffing two states: additive operations
/// first, then alters, then destructive ones, each group sorted by
/// schema and name for reproducible output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Operations in application order.
    pub operations: Vec<Operation>,
}

impl ChangeSet {
    /// Returns `true` when the states are equivalent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Returns the destructive subset, in order.
    #[must_use]
    pub fn destructive(&self) -> Vec<&Operation> {
        self.operations.iter().filter(|op| op.is_destructive()).collect()
    }
}

/// Compares two states under a dialect's equivalence rules.
pub struct SchemaDiffer<'a> {
    dialect: &'a dyn InspectorDialect,
}

impl<'a> SchemaDiffer<'a> {
    /// Creates a differ using the given dialect's oracle.
    #[must_use]
    pub fn new(dialect: &'a dyn InspectorDialect) -> Self {
        Self { dialect }
    }

    /// Produces the operations that migrate `current` into `target`.
    #[must_use]
    pub fn diff(&self, current: &SchemaState, target: &SchemaState) -> ChangeSet {
        let current_tables = by_identity(current);
        let target_tables = by_identity(target);

        let mut creates = Vec::new();
        let mut adds = Vec::new();
        let mut alters = Vec::new();
        let mut drop_columns = Vec::new();
        let mut drop_tables = Vec::new();

        for (key, table) in &target_tables {
            match current_tables.get(key) {
                None => creates.push(Operation::CreateTable {
                    table: (*table).clone(),
                }),
                Some(existing) => {
                    self.diff_columns(existing, table, &mut adds, &mut alters, &mut drop_columns);
                }
            }
        }

        for (key, table) in &current_tables {
            if !target_tables.contains_key(key) {
                drop_tables.push(Operation::DropTable {
                    schema: table.schema.clone(),
                    name: table.name.clone(),
                });
            }
        }

        let mut add_fks = Vec::new();
        let mut drop_fks = Vec::new();
        for fk in target.foreign_keys.keys() {
            if !current.foreign_keys.contains_key(fk) {
                add_fks.push(Operation::AddForeignKey { fk: fk.clone() });
            }
        }
        for (fk, constraint) in &current.foreign_keys {
            if !target.foreign_keys.contains_key(fk) {
                drop_fks.push(Operation::DropForeignKey {
                    fk: fk.clone(),
                    constraint: constraint.clone(),
                });
            }
        }

        let mut operations = Vec::new();
        operations.extend(creates);
        operations.extend(adds);
        operations.extend(add_fks);
        operations.extend(alters);
        operations.extend(drop_fks);
        operations.extend(drop_columns);
        operations.extend(drop_tables);

        debug!(
            dialect = self.dialect.name(),
            operations = operations.len(),
            "schema diff computed"
        );
        ChangeSet { operations }
    }

    fn diff_columns(
        &self,
        current: &TableState,
        target: &TableState,
        adds: &mut Vec<Operation>,
        alters: &mut Vec<Operation>,
        drops: &mut Vec<Operation>,
    ) {
        for (name, column) in &target.columns {
            match current.columns.get(name) {
                None => adds.push(Operation::AddColumn {
                    schema: target.schema.clone(),
                    table: target.name.clone(),
                    column: name.clone(),
                    definition: column.clone(),
                }),
                Some(existing) if !self.dialect.equivalent(existing, column) => {
                    alters.push(Operation::AlterColumn {
                        schema: target.schema.clone(),
                        table: target.name.clone(),
                        column: name.clone(),
                        from: existing.clone(),
                        to: column.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        for name in current.columns.keys() {
            if !target.columns.contains_key(name) {
                drops.push(Operation::DropColumn {
                    schema: target.schema.clone(),
                    table: target.name.clone(),
                    column: name.clone(),
                });
            }
        }
    }
}

/// Indexes a state's tables by (schema, name). `BTreeMap` keeps the
/// per-group operation order deterministic.
fn by_identity(state: &SchemaState) -> BTreeMap<(&str, &str), &TableState> {
    state
        .tables
        .iter()
        .map(|t| ((t.schema.as_str(), t.name.as_str()), t))
        .collect()
}
