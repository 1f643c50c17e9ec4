//! The connector metadata façade.

use std::sync::Arc;

use strata_blockstream::FieldType;
use strata_common::Result;

use crate::{
    codec::JsonCodec,
    commit::CommitTaskData,
    config::ConnectorConfig,
    services::{FileSystemEnvironment, FilterStatsService, Metastore, RowExpressionService, TypeManager},
};

/// Metadata façade handed to the engine for one transaction.
///
/// Holds shared handles to the connector services; cloning is cheap.
#[derive(Clone)]
pub struct ConnectorMetadata {
    pub(crate) config: Arc<ConnectorConfig>,
    pub(crate) metastore: Arc<dyn Metastore>,
    pub(crate) file_system: Arc<dyn FileSystemEnvironment>,
    pub(crate) type_manager: Arc<dyn TypeManager>,
    pub(crate) commit_task_codec: JsonCodec<CommitTaskData>,
    pub(crate) version: Arc<str>,
    pub(crate) filter_stats: Arc<dyn FilterStatsService>,
    pub(crate) row_expressions: Arc<dyn RowExpressionService>,
}

impl ConnectorMetadata {
    #[inline]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    /// Version string of the engine node, recorded in committed snapshots.
    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn metastore(&self) -> &Arc<dyn Metastore> {
        &self.metastore
    }

    pub fn file_system(&self) -> &Arc<dyn FileSystemEnvironment> {
        &self.file_system
    }

    pub fn type_manager(&self) -> &Arc<dyn TypeManager> {
        &self.type_manager
    }

    pub fn filter_stats(&self) -> &Arc<dyn FilterStatsService> {
        &self.filter_stats
    }

    pub fn row_expressions(&self) -> &Arc<dyn RowExpressionService> {
        &self.row_expressions
    }

    pub fn table_exists(&self, schema: &str, table: &str) -> Result<bool> {
        self.metastore.table_exists(schema, table)
    }

    /// Resolves the location of a data file of a table.
    pub fn data_location(&self, path: &str) -> Result<String> {
        self.file_system.resolve_location(path)
    }

    pub fn resolve_type(&self, signature: &str) -> Option<FieldType> {
        self.type_manager.resolve_type(signature)
    }

    /// Estimated selectivity of a pushed-down predicate, clamped to `[0, 1]`.
    pub fn selectivity(&self, predicate: &str) -> Option<f64> {
        self.filter_stats
            .selectivity(predicate)
            .filter(|s| !s.is_nan())
            .map(|s| s.clamp(0.0, 1.0))
    }

    pub fn format_expression(&self, expression: &str) -> Result<String> {
        self.row_expressions.format_expression(expression)
    }

    pub fn encode_commit_task(&self, task: &CommitTaskData) -> Result<Vec<u8>> {
        self.commit_task_codec.to_json_bytes(task)
    }

    pub fn decode_commit_task(&self, bytes: &[u8]) -> Result<CommitTaskData> {
        self.commit_task_codec.from_json_bytes(bytes)
    }
}
