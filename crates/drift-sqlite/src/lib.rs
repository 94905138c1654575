//! SQLite support for drift schema inspection.
//!
//! Provides the two capabilities a dialect plugin must register with
//! [`DialectRegistry`](drift_schema::dialect::DialectRegistry): a live
//! inspector over a `sqlx` SQLite pool, and the SQLite equivalence
//! oracle.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use drift_schema::prelude::*;
//! use drift_sqlite::SqliteDialect;
//!
//! let mut registry = DialectRegistry::new();
//! registry.register(Arc::new(SqliteDialect::new(pool)));
//! let state = registry.live_inspector("sqlite", &[])?.inspect().await?;
//! ```

mod dialect;
mod inspector;

pub use dialect::SqliteDialect;
pub use inspector::{SqliteInspector, SCHEMA_NAME};
