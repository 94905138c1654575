//! Canonical schema-state inspection and diffing.
//!
//! `drift-schema` turns heterogeneous database metadata into a single
//! comparable representation. Two builders produce the same
//! [`SchemaState`](state::SchemaState) shape:
//!
//! - the [`ModelInspector`](inspector::ModelInspector), which walks an
//!   application's declared tables, fields, and relations;
//! - a live inspector supplied by a dialect crate (e.g. drift-sqlite),
//!   which reads the connected database's catalogs.
//!
//! Because both sides speak the canonical shape, the
//! [`SchemaDiffer`](diff::SchemaDiffer) can compare them regardless of
//! which engine produced either one. Dialect idiosyncrasies that
//! survive normalization (type aliases, omitted default lengths,
//! identity vs. autoincrement spelling) are absorbed by the dialect's
//! equivalence oracle ([`InspectorDialect`](dialect::InspectorDialect)).
//!
//! # Example
//!
//! ```rust
//! use drift_schema::prelude::*;
//!
//! let registry = ModelRegistry::new().with(
//!     TableDef::new("public", "users")
//!         .field(FieldDef::new("id", "serial").primary_key().auto_increment())
//!         .field(FieldDef::new("email", "varchar(255)").not_null()),
//! );
//!
//! let state = ModelInspector::new(registry).build().unwrap();
//! let email = state.table("public", "users").unwrap().column("email").unwrap();
//! assert_eq!(email.sql_type, "varchar");
//! assert_eq!(email.varchar_len, 255);
//! ```
//!
//! This crate never executes migrations and never opens or closes
//! connections; states are plain values handed to downstream tooling.

pub mod dialect;
pub mod diff;
pub mod error;
pub mod inspector;
pub mod model;
pub mod normalize;
pub mod state;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{DialectRegistry, InspectorDialect};
    pub use crate::diff::{ChangeSet, Operation, SchemaDiffer};
    pub use crate::error::{Result, SchemaError};
    pub use crate::inspector::{Inspect, ModelInspector};
    pub use crate::model::{FieldDef, ModelRegistry, RelationDef, RelationKind, TableDef};
    pub use crate::normalize::{normalize_default, parse_type_len};
    pub use crate::state::{
        ColumnRef, ColumnState, ForeignKey, ModelHandle, SchemaState, TableState,
    };
}
