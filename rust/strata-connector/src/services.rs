//! Seams for the services the connector depends on.
//!
//! The contracts of these services are owned by their respective subsystems;
//! the connector only requires them to be shareable across threads.

use std::fmt;

use strata_blockstream::FieldType;
use strata_common::Result;

/// Client of the table metastore.
pub trait Metastore: Send + Sync + 'static {
    /// Checks whether `schema.table` is registered.
    fn table_exists(&self, schema: &str, table: &str) -> Result<bool>;
}

/// Access to the file systems holding table data.
pub trait FileSystemEnvironment: Send + Sync + 'static {
    /// Resolves a table-relative path into a fully qualified location.
    fn resolve_location(&self, path: &str) -> Result<String>;
}

/// The engine type system.
pub trait TypeManager: Send + Sync + 'static {
    /// Maps an engine type signature onto a block field type, if the type can
    /// be stored in blocks.
    fn resolve_type(&self, signature: &str) -> Option<FieldType>;
}

/// Estimates the effect of filters, used when planning positional scans.
pub trait FilterStatsService: Send + Sync + 'static {
    /// Estimated fraction of rows selected by `predicate`, within `[0, 1]`.
    fn selectivity(&self, predicate: &str) -> Option<f64>;
}

/// Parses and formats row expressions pushed down into the connector.
pub trait RowExpressionService: Send + Sync + 'static {
    fn format_expression(&self, expression: &str) -> Result<String>;
}

/// Version of the engine node the connector runs on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeVersion(String);

impl NodeVersion {
    pub fn new(version: impl Into<String>) -> NodeVersion {
        NodeVersion(version.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
