//! Declared-model metadata.
//!
//! The shapes an application's model layer hands to the
//! [`ModelInspector`](crate::inspector::ModelInspector): per table its
//! identity, ordered fields, and ordered relations. These are plain
//! snapshots; the registry that collects them is scoped to a single
//! inspection run.

use crate::state::ModelHandle;

/// A declared field: name, raw SQL type string, and constraint flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Column name.
    pub name: String,
    /// Raw SQL type string as declared (e.g. `varchar(255)`).
    pub sql_type: String,
    /// Whether the field is declared NOT NULL.
    pub not_null: bool,
    /// Whether the field is part of the primary key.
    pub is_pk: bool,
    /// Whether the field auto-increments.
    pub auto_increment: bool,
    /// Whether the field is a generated identity column.
    pub identity: bool,
    /// Declared default expression, if any.
    pub sql_default: Option<String>,
}

impl FieldDef {
    /// Creates a nullable field with the given name and type string.
    #[must_use]
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            not_null: false,
            is_pk: false,
            auto_increment: false,
            identity: false,
            sql_default: None,
        }
    }

    /// Marks the field NOT NULL.
    #[must_use]
    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    /// Marks the field as part of the primary key.
    #[must_use]
    pub fn primary_key(mut self) -> Self {
        self.is_pk = true;
        self.not_null = true;
        self
    }

    /// Marks the field auto-incrementing.
    #[must_use]
    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the field as an identity column.
    #[must_use]
    pub fn identity(mut self) -> Self {
        self.identity = true;
        self
    }

    /// Sets the default expression.
    #[must_use]
    pub fn default_expr(mut self, expr: impl Into<String>) -> Self {
        self.sql_default = Some(expr.into());
        self
    }
}

/// Kinds of declared relations between models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// This table holds the foreign key to the target.
    BelongsTo,
    /// One-to-one where this table holds the foreign key.
    HasOne,
    /// Inverse side of a belongs-to; no FK on this table.
    HasMany,
    /// Realized through a join table; no FK on this table.
    ManyToMany,
}

impl RelationKind {
    /// Whether the relation requires a foreign-key constraint on the
    /// declaring table. Has-many is the inverse of a belongs-to
    /// captured elsewhere, and many-to-many lives in its join table.
    #[must_use]
    pub fn owns_foreign_key(self) -> bool {
        matches!(self, Self::BelongsTo | Self::HasOne)
    }
}

/// A declared relation from one table to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDef {
    /// Relation kind.
    pub kind: RelationKind,
    /// Ordered local column names on the declaring table.
    pub base_columns: Vec<String>,
    /// Schema of the referenced table.
    pub target_schema: String,
    /// Name of the referenced table.
    pub target_table: String,
    /// Ordered column names on the referenced table.
    pub join_columns: Vec<String>,
}

impl RelationDef {
    /// Creates a relation of the given kind to `target_schema.target_table`.
    #[must_use]
    pub fn new(
        kind: RelationKind,
        target_schema: impl Into<String>,
        target_table: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            base_columns: Vec::new(),
            target_schema: target_schema.into(),
            target_table: target_table.into(),
            join_columns: Vec::new(),
        }
    }

    /// Adds a (local, referenced) column pair, preserving order.
    #[must_use]
    pub fn columns(mut self, base: impl Into<String>, join: impl Into<String>) -> Self {
        self.base_columns.push(base.into());
        self.join_columns.push(join.into());
        self
    }
}

/// A declared table: identity, originating model, fields, relations.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDef {
    /// Schema the table lives in.
    pub schema: String,
    /// Table name.
    pub name: String,
    /// Handle to the originating model type.
    pub model: Option<ModelHandle>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDef>,
    /// Relations in declaration order.
    pub relations: Vec<RelationDef>,
}

impl TableDef {
    /// Creates an empty table declaration.
    #[must_use]
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            model: None,
            fields: Vec::new(),
            relations: Vec::new(),
        }
    }

    /// Records the originating model type.
    #[must_use]
    pub fn model(mut self, handle: ModelHandle) -> Self {
        self.model = Some(handle);
        self
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a relation.
    #[must_use]
    pub fn relation(mut self, relation: RelationDef) -> Self {
        self.relations.push(relation);
        self
    }
}

/// Instance-scoped collection of table declarations.
///
/// Build a fresh registry per target snapshot: tables registered for a
/// prior run are never de-registered, so reusing a registry across
/// model sets would leak stale tables into the next state.
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    tables: Vec<TableDef>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table declaration.
    pub fn register(&mut self, table: TableDef) {
        self.tables.push(table);
    }

    /// Registers a table declaration, builder style.
    #[must_use]
    pub fn with(mut self, table: TableDef) -> Self {
        self.register(table);
        self
    }

    /// Returns all registered tables in registration order.
    #[must_use]
    pub fn tables(&self) -> &[TableDef] {
        &self.tables
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_builder_flags() {
        let field = FieldDef::new("id", "serial").primary_key().auto_increment();
        assert!(field.is_pk);
        assert!(field.not_null);
        assert!(field.auto_increment);
        assert!(!field.identity);
    }

    #[test]
    fn relation_kinds_owning_fks() {
        assert!(RelationKind::BelongsTo.owns_foreign_key());
        assert!(RelationKind::HasOne.owns_foreign_key());
        assert!(!RelationKind::HasMany.owns_foreign_key());
        assert!(!RelationKind::ManyToMany.owns_foreign_key());
    }

    #[test]
    fn relation_column_pairs_keep_order() {
        let rel = RelationDef::new(RelationKind::BelongsTo, "public", "users")
            .columns("tenant_id", "tenant_id")
            .columns("user_id", "id");
        assert_eq!(rel.base_columns, ["tenant_id", "user_id"]);
        assert_eq!(rel.join_columns, ["tenant_id", "id"]);
    }

    #[test]
    fn registry_preserves_registration_order() {
        let registry = ModelRegistry::new()
            .with(TableDef::new("public", "users"))
            .with(TableDef::new("public", "orders"));
        let names: Vec<&str> = registry.tables().iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["users", "orders"]);
    }
}
