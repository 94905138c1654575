//! Dialect registration and the column equivalence oracle.
//!
//! A dialect plugin bundles two capabilities: a factory for a live
//! inspector scoped to a target database, and the equivalence oracle
//! that decides whether two canonically built columns describe the
//! same thing despite dialect type aliases. Lookup goes through an
//! explicit registry; an unregistered dialect is a configuration
//! error, not a panic.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{Result, SchemaError};
use crate::inspector::Inspect;
use crate::state::ColumnState;

/// A database dialect that supports live schema inspection.
pub trait InspectorDialect: Send + Sync {
    /// Dialect identifier (e.g. `"sqlite"`).
    fn name(&self) -> &'static str;

    /// Builds a live inspector for this dialect's database, skipping
    /// the given table names.
    fn live_inspector(&self, exclude_tables: &[String]) -> Box<dyn Inspect>;

    /// Whether two column types are equivalent under this dialect's
    /// aliasing rules (e.g. `serial` vs an integer with an identity
    /// flag, or a VARCHAR length left at the dialect default).
    fn equivalent_type(&self, a: &ColumnState, b: &ColumnState) -> bool;

    /// Whether two columns describe the same column.
    ///
    /// Type comparison is delegated to [`equivalent_type`]; nullability,
    /// primary-key status, and default value are genuine structural
    /// differences and are never papered over.
    ///
    /// [`equivalent_type`]: InspectorDialect::equivalent_type
    fn equivalent(&self, a: &ColumnState, b: &ColumnState) -> bool {
        self.equivalent_type(a, b)
            && a.is_pk == b.is_pk
            && a.is_nullable == b.is_nullable
            && a.default_value == b.default_value
    }
}

/// Explicit registry mapping dialect names to their inspection
/// capabilities.
#[derive(Default)]
pub struct DialectRegistry {
    dialects: BTreeMap<&'static str, Arc<dyn InspectorDialect>>,
}

impl DialectRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a dialect under its own name.
    pub fn register(&mut self, dialect: Arc<dyn InspectorDialect>) {
        self.dialects.insert(dialect.name(), dialect);
    }

    /// Looks up a registered dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedDialect`] when no dialect is
    /// registered under `name`.
    pub fn get(&self, name: &str) -> Result<&Arc<dyn InspectorDialect>> {
        self.dialects
            .get(name)
            .ok_or_else(|| SchemaError::UnsupportedDialect(name.to_owned()))
    }

    /// Builds a live inspector for the named dialect.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnsupportedDialect`] when no dialect is
    /// registered under `name`; the failure surfaces here, at
    /// construction, never mid-scan.
    pub fn live_inspector(&self, name: &str, exclude_tables: &[String]) -> Result<Box<dyn Inspect>> {
        Ok(self.get(name)?.live_inspector(exclude_tables))
    }
}
