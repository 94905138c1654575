//! SQLite dialect plugin: live inspector factory plus equivalence
//! oracle.
//!
//! SQLite barely types its columns: a declared type only selects one
//! of five affinities, so `INT`, `INTEGER`, and `BIGINT` all describe
//! the same storage. The oracle compares columns by affinity and
//! tolerates omitted VARCHAR lengths, while nullability, primary-key
//! status, and default values stay strict.

use sqlx::sqlite::SqlitePool;

use drift_schema::dialect::InspectorDialect;
use drift_schema::inspector::Inspect;
use drift_schema::state::ColumnState;

use crate::inspector::SqliteInspector;

/// The five SQLite type affinities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Affinity {
    Integer,
    Text,
    Blob,
    Real,
    Numeric,
}

/// Determines a type name's affinity per SQLite's declared-type rules.
fn affinity(sql_type: &str) -> Affinity {
    let t = sql_type.to_lowercase();
    if t.contains("int") {
        Affinity::Integer
    } else if t.contains("char") || t.contains("clob") || t.contains("text") {
        Affinity::Text
    } else if t.is_empty() || t.contains("blob") {
        Affinity::Blob
    } else if t.contains("real") || t.contains("floa") || t.contains("doub") {
        Affinity::Real
    } else {
        Affinity::Numeric
    }
}

/// SQLite dialect handle owning the connection pool live inspectors
/// are built over.
#[derive(Clone)]
pub struct SqliteDialect {
    pool: SqlitePool,
}

impl SqliteDialect {
    /// Creates the dialect over an open pool. The pool's lifecycle
    /// stays with the caller.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl InspectorDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn live_inspector(&self, exclude_tables: &[String]) -> Box<dyn Inspect> {
        Box::new(SqliteInspector::new(
            self.pool.clone(),
            exclude_tables.to_vec(),
        ))
    }

    fn equivalent_type(&self, a: &ColumnState, b: &ColumnState) -> bool {
        if affinity(&a.sql_type) != affinity(&b.sql_type) {
            return false;
        }
        // Length qualifiers are advisory in SQLite; an omitted length
        // matches any declared one.
        a.varchar_len == b.varchar_len || a.varchar_len == 0 || b.varchar_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(sql_type: &str, varchar_len: u32) -> ColumnState {
        ColumnState {
            sql_type: sql_type.to_owned(),
            varchar_len,
            is_nullable: true,
            ..ColumnState::default()
        }
    }

    #[test]
    fn affinity_classification() {
        assert_eq!(affinity("integer"), Affinity::Integer);
        assert_eq!(affinity("bigint"), Affinity::Integer);
        assert_eq!(affinity("unsigned big int"), Affinity::Integer);
        assert_eq!(affinity("varchar"), Affinity::Text);
        assert_eq!(affinity("text"), Affinity::Text);
        assert_eq!(affinity("blob"), Affinity::Blob);
        assert_eq!(affinity(""), Affinity::Blob);
        assert_eq!(affinity("double precision"), Affinity::Real);
        assert_eq!(affinity("numeric"), Affinity::Numeric);
        assert_eq!(affinity("decimal"), Affinity::Numeric);
    }

    // Oracle tests go through a pool-less path: equivalent_type never
    // touches the connection, so a lazily connecting pool is enough.
    fn dialect() -> SqliteDialect {
        let pool = SqlitePool::connect_lazy("sqlite::memory:").unwrap();
        SqliteDialect::new(pool)
    }

    #[tokio::test]
    async fn integer_aliases_are_equivalent() {
        let d = dialect();
        assert!(d.equivalent_type(&col("int", 0), &col("integer", 0)));
        assert!(d.equivalent_type(&col("bigint", 0), &col("integer", 0)));
        assert!(!d.equivalent_type(&col("integer", 0), &col("text", 0)));
    }

    #[tokio::test]
    async fn omitted_varchar_length_is_tolerated() {
        let d = dialect();
        assert!(d.equivalent_type(&col("varchar", 0), &col("varchar", 255)));
        assert!(d.equivalent_type(&col("varchar", 255), &col("varchar", 255)));
        assert!(!d.equivalent_type(&col("varchar", 100), &col("varchar", 255)));
    }

    #[tokio::test]
    async fn strict_fields_still_differ() {
        let d = dialect();
        let a = col("integer", 0);
        let mut b = col("int", 0);
        b.is_nullable = false;
        assert!(d.equivalent_type(&a, &b));
        assert!(!d.equivalent(&a, &b));
    }
}
