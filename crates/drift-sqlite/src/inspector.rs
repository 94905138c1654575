//! Live schema inspection for SQLite.
//!
//! Reads `sqlite_master` plus the `table_info` and `foreign_key_list`
//! pragmas and normalizes the result into the canonical
//! [`SchemaState`] shape, so it can be diffed against a model-derived
//! state. One inspector is scoped to one target set of tables; build a
//! fresh one per run.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use tracing::debug;

use drift_schema::error::{Result, SchemaError};
use drift_schema::inspector::Inspect;
use drift_schema::normalize::{normalize_default, parse_type_len};
use drift_schema::state::{ColumnRef, ColumnState, ForeignKey, SchemaState, TableState};

/// SQLite attaches every database under a schema name; the primary
/// one is always `main`.
pub const SCHEMA_NAME: &str = "main";

/// Inspects a live SQLite database.
pub struct SqliteInspector {
    pool: SqlitePool,
    exclude_tables: Vec<String>,
}

/// Per-table catalog data gathered in the first scan pass.
struct ScannedTable {
    name: String,
    columns: BTreeMap<String, ColumnState>,
    /// Primary-key columns in key order.
    pk_columns: Vec<String>,
}

impl SqliteInspector {
    /// Creates an inspector over the given pool, skipping the listed
    /// tables.
    #[must_use]
    pub fn new(pool: SqlitePool, exclude_tables: Vec<String>) -> Self {
        Self {
            pool,
            exclude_tables,
        }
    }

    async fn scan_tables(&self) -> Result<Vec<ScannedTable>> {
        let tables: Vec<(String, Option<String>)> = sqlx::query_as(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(SchemaError::catalog)?;

        let mut scanned = Vec::new();
        for (name, create_sql) in tables {
            if self.exclude_tables.contains(&name) {
                continue;
            }
            scanned.push(self.scan_table(name, create_sql.as_deref()).await?);
        }
        Ok(scanned)
    }

    async fn scan_table(&self, name: String, create_sql: Option<&str>) -> Result<ScannedTable> {
        let rows: Vec<(i64, String, String, i64, Option<String>, i64)> = sqlx::query_as(
            "SELECT cid, name, \"type\", \"notnull\", dflt_value, pk \
             FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(&name)
        .fetch_all(&self.pool)
        .await
        .map_err(SchemaError::catalog)?;

        // AUTOINCREMENT is only visible in the stored CREATE TABLE
        // text; the pragma does not report it.
        let autoincrement = create_sql
            .map(str::to_lowercase)
            .is_some_and(|sql| sql.contains("autoincrement"));

        let mut columns = BTreeMap::new();
        let mut pk_ordered: Vec<(i64, String)> = Vec::new();
        for (_cid, column, raw_type, notnull, dflt_value, pk) in rows {
            let (sql_type, varchar_len) =
                parse_type_len(&raw_type).map_err(|source| SchemaError::TypeParse {
                    table: name.clone(),
                    column: column.clone(),
                    source,
                })?;
            if pk > 0 {
                pk_ordered.push((pk, column.clone()));
            }
            columns.insert(
                column,
                ColumnState {
                    sql_type: sql_type.to_lowercase(),
                    varchar_len,
                    default_value: dflt_value.as_deref().map(normalize_default),
                    is_pk: pk > 0,
                    // SQLite reports rowid-alias PKs with notnull = 0;
                    // a primary key is never nullable canonically.
                    is_nullable: notnull == 0 && pk == 0,
                    is_auto_increment: false,
                    is_identity: false,
                },
            );
        }
        pk_ordered.sort_unstable();
        let pk_columns: Vec<String> = pk_ordered.into_iter().map(|(_, c)| c).collect();

        if autoincrement {
            if let [only_pk] = pk_columns.as_slice() {
                if let Some(col) = columns.get_mut(only_pk) {
                    col.is_auto_increment = true;
                }
            }
        }

        debug!(table = %name, columns = columns.len(), "scanned table");
        Ok(ScannedTable {
            name,
            columns,
            pk_columns,
        })
    }

    async fn scan_foreign_keys(
        &self,
        scanned: &[ScannedTable],
        state: &mut SchemaState,
    ) -> Result<()> {
        let pk_by_table: BTreeMap<&str, &[String]> = scanned
            .iter()
            .map(|t| (t.name.as_str(), t.pk_columns.as_slice()))
            .collect();

        for table in scanned {
            let rows: Vec<(i64, i64, String, String, Option<String>)> = sqlx::query_as(
                "SELECT id, seq, \"table\", \"from\", \"to\" \
                 FROM pragma_foreign_key_list(?) ORDER BY id, seq",
            )
            .bind(&table.name)
            .fetch_all(&self.pool)
            .await
            .map_err(SchemaError::catalog)?;

            let mut groups: BTreeMap<i64, (String, Vec<String>, Vec<Option<String>>)> =
                BTreeMap::new();
            for (id, _seq, target, from, to) in rows {
                let group = groups.entry(id).or_insert_with(|| (target, vec![], vec![]));
                group.1.push(from);
                group.2.push(to);
            }

            for (id, (target, from_cols, to_cols)) in groups {
                // A constraint into an excluded table would dangle in
                // the resulting state; skip it along with its target.
                if self.exclude_tables.contains(&target) {
                    continue;
                }
                // A FK declared without a column list references the
                // target's primary key; the pragma reports NULL there.
                let to_cols: Vec<String> = if to_cols.iter().all(Option::is_none) {
                    pk_by_table
                        .get(target.as_str())
                        .map(|cols| cols.to_vec())
                        .unwrap_or_default()
                } else {
                    to_cols.into_iter().flatten().collect()
                };
                let fk = ForeignKey {
                    from: ColumnRef::new(SCHEMA_NAME, table.name.clone(), from_cols),
                    to: ColumnRef::new(SCHEMA_NAME, target, to_cols),
                };
                // The pragma does not expose constraint names; the
                // label only needs to be stable per relationship.
                state
                    .foreign_keys
                    .insert(fk, format!("{}_fk_{id}", table.name));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Inspect for SqliteInspector {
    async fn inspect(&self) -> Result<SchemaState> {
        let scanned = self.scan_tables().await?;

        let mut state = SchemaState::new();
        self.scan_foreign_keys(&scanned, &mut state).await?;
        for table in scanned {
            state.tables.push(TableState {
                schema: SCHEMA_NAME.to_owned(),
                name: table.name,
                model: None,
                columns: table.columns,
            });
        }
        debug!(
            tables = state.tables.len(),
            foreign_keys = state.foreign_keys.len(),
            "live inspection complete"
        );
        Ok(state)
    }
}
