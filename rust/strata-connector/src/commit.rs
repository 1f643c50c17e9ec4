//! The record a writer task reports to the coordinator for each data file it
//! produced.

use serde::{Deserialize, Serialize};

use crate::config::FileFormat;

/// Describes one data file written by a task, to be committed into the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTaskData {
    pub path: String,
    pub file_size_in_bytes: u64,
    pub record_count: u64,
    /// Partition values of the file as a JSON document, absent for
    /// unpartitioned tables.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_data_json: Option<String>,
    pub file_format: FileFormat,
}

impl CommitTaskData {
    pub fn new(
        path: impl Into<String>,
        file_size_in_bytes: u64,
        record_count: u64,
        file_format: FileFormat,
    ) -> CommitTaskData {
        CommitTaskData {
            path: path.into(),
            file_size_in_bytes,
            record_count,
            partition_data_json: None,
            file_format,
        }
    }

    pub fn with_partition_data(mut self, json: impl Into<String>) -> Self {
        self.partition_data_json = Some(json.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::CommitTaskData;
    use crate::{JsonCodec, config::FileFormat};

    #[test]
    fn test_commit_task_json_shape() {
        let codec = JsonCodec::<CommitTaskData>::new();
        let task = CommitTaskData::new("s3://bucket/t/data/00001.parquet", 4096, 120, FileFormat::Parquet);
        let json = codec.to_json(&task).unwrap();
        assert_eq!(
            json,
            r#"{"path":"s3://bucket/t/data/00001.parquet","fileSizeInBytes":4096,"recordCount":120,"fileFormat":"PARQUET"}"#
        );
        assert_eq!(codec.from_json(&json).unwrap(), task);

        let partitioned = task.with_partition_data(r#"{"partitionValues":["2024"]}"#);
        let decoded = codec.from_json(&codec.to_json(&partitioned).unwrap()).unwrap();
        assert_eq!(
            decoded.partition_data_json.as_deref(),
            Some(r#"{"partitionValues":["2024"]}"#)
        );
    }
}
