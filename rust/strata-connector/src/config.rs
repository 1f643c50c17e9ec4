//! Connector configuration.

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_common::{Result, error::Error, verify_arg};

/// Where table metadata is catalogued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatalogType {
    #[default]
    Hive,
    Hadoop,
    Nessie,
}

/// Format of the data files written by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FileFormat {
    #[default]
    Parquet,
    Orc,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileFormat::Parquet => f.write_str("PARQUET"),
            FileFormat::Orc => f.write_str("ORC"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompressionCodec {
    None,
    Snappy,
    #[default]
    Gzip,
    Lz4,
    Zstd,
}

/// Connector configuration, as loaded from the catalog properties.
///
/// Missing keys take their default values. A loaded configuration is always
/// validated before use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConnectorConfig {
    pub catalog_type: CatalogType,
    pub file_format: FileFormat,
    pub compression_codec: CompressionCodec,
    /// Maximum number of partitions a single writer may open.
    pub max_partitions_per_writer: usize,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        ConnectorConfig {
            catalog_type: CatalogType::Hive,
            file_format: FileFormat::Parquet,
            compression_codec: CompressionCodec::Gzip,
            max_partitions_per_writer: 100,
        }
    }
}

impl ConnectorConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<ConnectorConfig> {
        let config: ConnectorConfig =
            serde_json::from_str(json).map_err(|e| Error::serialization("connector config", e))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::serialization("connector config", e))
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(max_partitions_per_writer, self.max_partitions_per_writer > 0);
        Ok(())
    }
}
