//! Construction of [`ConnectorMetadata`] façades from injected services.

use std::sync::Arc;

use log::debug;
use strata_common::{Result, error::Error};

use crate::{
    codec::JsonCodec,
    commit::CommitTaskData,
    config::ConnectorConfig,
    metadata::ConnectorMetadata,
    services::{
        FileSystemEnvironment, FilterStatsService, Metastore, NodeVersion, RowExpressionService,
        TypeManager,
    },
};

/// Collects the services needed by a [`MetadataFactory`].
///
/// Every dependency must be provided; [`build()`](Self::build) names the first
/// missing one.
#[derive(Default)]
pub struct MetadataFactoryBuilder {
    config: Option<ConnectorConfig>,
    metastore: Option<Arc<dyn Metastore>>,
    file_system: Option<Arc<dyn FileSystemEnvironment>>,
    type_manager: Option<Arc<dyn TypeManager>>,
    commit_task_codec: Option<JsonCodec<CommitTaskData>>,
    node_version: Option<NodeVersion>,
    filter_stats: Option<Arc<dyn FilterStatsService>>,
    row_expressions: Option<Arc<dyn RowExpressionService>>,
}

impl MetadataFactoryBuilder {
    pub fn new() -> MetadataFactoryBuilder {
        Default::default()
    }

    pub fn config(mut self, config: ConnectorConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn metastore(mut self, metastore: Arc<dyn Metastore>) -> Self {
        self.metastore = Some(metastore);
        self
    }

    pub fn file_system(mut self, file_system: Arc<dyn FileSystemEnvironment>) -> Self {
        self.file_system = Some(file_system);
        self
    }

    pub fn type_manager(mut self, type_manager: Arc<dyn TypeManager>) -> Self {
        self.type_manager = Some(type_manager);
        self
    }

    pub fn commit_task_codec(mut self, codec: JsonCodec<CommitTaskData>) -> Self {
        self.commit_task_codec = Some(codec);
        self
    }

    pub fn node_version(mut self, version: NodeVersion) -> Self {
        self.node_version = Some(version);
        self
    }

    pub fn filter_stats(mut self, filter_stats: Arc<dyn FilterStatsService>) -> Self {
        self.filter_stats = Some(filter_stats);
        self
    }

    pub fn row_expressions(mut self, row_expressions: Arc<dyn RowExpressionService>) -> Self {
        self.row_expressions = Some(row_expressions);
        self
    }

    /// Validates the collected dependencies and creates the factory.
    ///
    /// # Errors
    ///
    /// Fails with a missing dependency error naming the first absent service,
    /// or with an invalid argument error if the configuration is invalid.
    pub fn build(self) -> Result<MetadataFactory> {
        let metastore = required(self.metastore, "metastore")?;
        let file_system = required(self.file_system, "file_system")?;
        let type_manager = required(self.type_manager, "type_manager")?;
        let commit_task_codec = required(self.commit_task_codec, "commit_task_codec")?;
        let node_version = required(self.node_version, "node_version")?;
        let filter_stats = required(self.filter_stats, "filter_stats")?;
        let row_expressions = required(self.row_expressions, "row_expressions")?;
        let config = required(self.config, "config")?;
        config.validate()?;

        debug!(
            "metadata factory built for node version {node_version}: {:?} catalog, {} files",
            config.catalog_type, config.file_format
        );
        Ok(MetadataFactory {
            config: Arc::new(config),
            metastore,
            file_system,
            type_manager,
            commit_task_codec,
            version: node_version.as_str().into(),
            filter_stats,
            row_expressions,
        })
    }
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| Error::missing_dependency(name))
}

/// Creates [`ConnectorMetadata`] façades sharing one set of validated
/// services.
#[derive(Clone)]
pub struct MetadataFactory {
    config: Arc<ConnectorConfig>,
    metastore: Arc<dyn Metastore>,
    file_system: Arc<dyn FileSystemEnvironment>,
    type_manager: Arc<dyn TypeManager>,
    commit_task_codec: JsonCodec<CommitTaskData>,
    version: Arc<str>,
    filter_stats: Arc<dyn FilterStatsService>,
    row_expressions: Arc<dyn RowExpressionService>,
}

impl MetadataFactory {
    pub fn builder() -> MetadataFactoryBuilder {
        MetadataFactoryBuilder::new()
    }

    #[inline]
    pub fn config(&self) -> &ConnectorConfig {
        &self.config
    }

    #[inline]
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn create(&self) -> ConnectorMetadata {
        ConnectorMetadata {
            config: self.config.clone(),
            metastore: self.metastore.clone(),
            file_system: self.file_system.clone(),
            type_manager: self.type_manager.clone(),
            commit_task_codec: self.commit_task_codec.clone(),
            version: self.version.clone(),
            filter_stats: self.filter_stats.clone(),
            row_expressions: self.row_expressions.clone(),
        }
    }
}
