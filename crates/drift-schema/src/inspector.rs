//! Inspector contract and the model-derived state builder.
//!
//! Two builders produce [`SchemaState`] values: the live-database
//! inspector (driver crates, e.g. drift-sqlite) and the
//! [`ModelInspector`] here, which derives the state an application's
//! declarations imply. The differ treats both uniformly through
//! [`Inspect`].

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::{Result, SchemaError};
use crate::model::{ModelRegistry, TableDef};
use crate::normalize::{normalize_default, parse_type_len};
use crate::state::{ColumnRef, ColumnState, ForeignKey, SchemaState, TableState};

/// Produces a canonical [`SchemaState`] snapshot from some source.
///
/// An error means no usable snapshot was produced; implementations
/// never return a partial state. Live implementations run one or more
/// catalog queries; dropping the returned future cancels the scan.
#[async_trait]
pub trait Inspect: Send + Sync {
    /// Builds the state snapshot.
    async fn inspect(&self) -> Result<SchemaState>;
}

/// Builds a [`SchemaState`] from declared model metadata.
///
/// Construct a fresh inspector per target snapshot; the registry it
/// consumes is scoped to exactly one set of tables (see
/// [`ModelRegistry`]).
#[derive(Debug)]
pub struct ModelInspector {
    registry: ModelRegistry,
}

impl ModelInspector {
    /// Creates an inspector over the given registry snapshot.
    #[must_use]
    pub fn new(registry: ModelRegistry) -> Self {
        Self { registry }
    }

    /// Builds the state synchronously. Pure transformation over the
    /// registry snapshot; no side effects.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::TypeParse`] if any field's declared type
    /// string has a malformed length qualifier. No partial state is
    /// returned.
    pub fn build(&self) -> Result<SchemaState> {
        let mut state = SchemaState::new();
        for table in self.registry.tables() {
            state.tables.push(build_table(table)?);

            for rel in &table.relations {
                // Has-many and many-to-many are nominal: the FK lives
                // on the other table or in the join table.
                if !rel.kind.owns_foreign_key() {
                    continue;
                }
                let fk = ForeignKey {
                    from: ColumnRef::new(
                        table.schema.clone(),
                        table.name.clone(),
                        rel.base_columns.iter().cloned(),
                    ),
                    to: ColumnRef::new(
                        rel.target_schema.clone(),
                        rel.target_table.clone(),
                        rel.join_columns.iter().cloned(),
                    ),
                };
                // The model side cannot know the constraint name; live
                // inspection fills in the real one.
                state.foreign_keys.insert(fk, String::new());
            }
        }
        Ok(state)
    }
}

#[async_trait]
impl Inspect for ModelInspector {
    async fn inspect(&self) -> Result<SchemaState> {
        self.build()
    }
}

fn build_table(table: &TableDef) -> Result<TableState> {
    let mut columns = BTreeMap::new();
    for field in &table.fields {
        let (sql_type, varchar_len) =
            parse_type_len(&field.sql_type).map_err(|source| SchemaError::TypeParse {
                table: table.name.clone(),
                column: field.name.clone(),
                source,
            })?;
        columns.insert(
            field.name.clone(),
            ColumnState {
                sql_type: sql_type.to_lowercase(),
                varchar_len,
                default_value: field.sql_default.as_deref().map(normalize_default),
                is_pk: field.is_pk,
                is_nullable: !field.not_null,
                is_auto_increment: field.auto_increment,
                is_identity: field.identity,
            },
        );
    }
    Ok(TableState {
        schema: table.schema.clone(),
        name: table.name.clone(),
        model: table.model.clone(),
        columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FieldDef, RelationDef, RelationKind};
    use crate::state::ModelHandle;

    struct User;

    fn users_table() -> TableDef {
        TableDef::new("public", "users")
            .model(ModelHandle::of::<User>())
            .field(FieldDef::new("id", "serial").primary_key().auto_increment())
            .field(
                FieldDef::new("email", "varchar(255)")
                    .not_null()
                    .default_expr("'USER@x.com'"),
            )
    }

    fn build(registry: ModelRegistry) -> SchemaState {
        ModelInspector::new(registry).build().unwrap()
    }

    #[test]
    fn columns_are_normalized() {
        let state = build(ModelRegistry::new().with(users_table()));
        let users = state.table("public", "users").unwrap();

        let id = users.column("id").unwrap();
        assert_eq!(id.sql_type, "serial");
        assert_eq!(id.varchar_len, 0);
        assert!(id.is_pk);
        assert!(id.is_auto_increment);
        assert!(!id.is_nullable);

        let email = users.column("email").unwrap();
        assert_eq!(email.sql_type, "varchar");
        assert_eq!(email.varchar_len, 255);
        assert_eq!(email.default_value.as_deref(), Some("'USER@x.com'"));
        assert!(!email.is_nullable);
    }

    #[test]
    fn type_names_are_lowercased() {
        let table =
            TableDef::new("public", "events").field(FieldDef::new("at", "TIMESTAMP").not_null());
        let state = build(ModelRegistry::new().with(table));
        let at = state.table("public", "events").unwrap().column("at").unwrap();
        assert_eq!(at.sql_type, "timestamp");
    }

    #[test]
    fn keyword_defaults_are_lowercased() {
        let table = TableDef::new("public", "events")
            .field(FieldDef::new("at", "timestamp").default_expr("CURRENT_TIMESTAMP"));
        let state = build(ModelRegistry::new().with(table));
        let at = state.table("public", "events").unwrap().column("at").unwrap();
        assert_eq!(at.default_value.as_deref(), Some("current_timestamp"));
    }

    #[test]
    fn model_handle_is_carried() {
        let state = build(ModelRegistry::new().with(users_table()));
        let users = state.table("public", "users").unwrap();
        assert!(users.model.as_ref().unwrap().type_name().ends_with("User"));
    }

    #[test]
    fn malformed_type_aborts_the_whole_build() {
        let registry = ModelRegistry::new().with(users_table()).with(
            TableDef::new("public", "prices").field(FieldDef::new("amount", "numeric(ten)")),
        );
        let err = ModelInspector::new(registry).build().unwrap_err();
        match err {
            SchemaError::TypeParse { table, column, source } => {
                assert_eq!(table, "prices");
                assert_eq!(column, "amount");
                assert_eq!(source.raw, "numeric(ten)");
            }
            other => panic!("expected TypeParse, got {other:?}"),
        }
    }

    #[test]
    fn belongs_to_produces_one_fk_with_empty_label() {
        let orders = TableDef::new("public", "orders")
            .field(FieldDef::new("id", "serial").primary_key())
            .field(FieldDef::new("user_id", "bigint").not_null())
            .relation(
                RelationDef::new(RelationKind::BelongsTo, "public", "users").columns("user_id", "id"),
            );
        let state = build(ModelRegistry::new().with(users_table()).with(orders));

        assert_eq!(state.foreign_keys.len(), 1);
        let (fk, label) = state.foreign_keys.iter().next().unwrap();
        assert!(label.is_empty());
        assert_eq!(fk.from, ColumnRef::new("public", "orders", ["user_id"]));
        assert_eq!(fk.to, ColumnRef::new("public", "users", ["id"]));
    }

    #[test]
    fn has_one_produces_one_fk_with_ordered_columns() {
        let profiles = TableDef::new("public", "profiles")
            .field(FieldDef::new("tenant_id", "bigint").not_null())
            .field(FieldDef::new("user_id", "bigint").not_null())
            .relation(
                RelationDef::new(RelationKind::HasOne, "public", "users")
                    .columns("tenant_id", "tenant_id")
                    .columns("user_id", "id"),
            );
        let state = build(ModelRegistry::new().with(users_table()).with(profiles));

        assert_eq!(state.foreign_keys.len(), 1);
        let (fk, label) = state.foreign_keys.iter().next().unwrap();
        assert!(label.is_empty());
        assert_eq!(
            fk.from,
            ColumnRef::new("public", "profiles", ["tenant_id", "user_id"])
        );
        assert_eq!(fk.to, ColumnRef::new("public", "users", ["tenant_id", "id"]));
    }

    #[test]
    fn nominal_relations_produce_no_fk() {
        let users = users_table()
            .relation(RelationDef::new(RelationKind::HasMany, "public", "orders").columns("id", "user_id"))
            .relation(RelationDef::new(RelationKind::ManyToMany, "public", "groups").columns("id", "user_id"));
        let state = build(ModelRegistry::new().with(users));
        assert!(state.foreign_keys.is_empty());
    }

    #[test]
    fn composite_fk_preserves_declaration_order() {
        let lines = TableDef::new("public", "order_lines")
            .field(FieldDef::new("order_id", "bigint").not_null())
            .field(FieldDef::new("tenant_id", "bigint").not_null())
            .relation(
                RelationDef::new(RelationKind::BelongsTo, "public", "orders")
                    .columns("tenant_id", "tenant_id")
                    .columns("order_id", "id"),
            );
        let state = build(ModelRegistry::new().with(lines));

        let fk = state.foreign_keys.keys().next().unwrap();
        assert_eq!(fk.from.columns, ["tenant_id", "order_id"]);
        assert_eq!(fk.to.columns, ["tenant_id", "id"]);
    }

    #[tokio::test]
    async fn inspect_matches_build() {
        let inspector = ModelInspector::new(ModelRegistry::new().with(users_table()));
        let built = inspector.build().unwrap();
        let inspected = inspector.inspect().await.unwrap();
        assert_eq!(built, inspected);
    }
}
