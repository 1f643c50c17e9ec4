//! Connector metadata plumbing.
//!
//! The table-format connector exposes scans to the engine through a metadata
//! façade. The façade is assembled from externally owned services (metastore
//! client, file system environment, type system, statistics and expression
//! services) that are injected fully constructed. This crate defines the seams
//! for those services, the commit-task record exchanged between workers and the
//! coordinator, the connector configuration, and the factory that validates
//! the dependencies once and then hands out metadata façades.

pub mod codec;
pub mod commit;
pub mod config;
pub mod factory;
pub mod metadata;
pub mod services;

pub use codec::JsonCodec;
pub use commit::CommitTaskData;
pub use config::{CatalogType, CompressionCodec, ConnectorConfig, FileFormat};
pub use factory::{MetadataFactory, MetadataFactoryBuilder};
pub use metadata::ConnectorMetadata;
pub use services::{
    FileSystemEnvironment, FilterStatsService, Metastore, NodeVersion, RowExpressionService,
    TypeManager,
};
