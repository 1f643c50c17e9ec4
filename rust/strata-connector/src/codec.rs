//! JSON codecs for records exchanged between connector components.

use std::{any::type_name, fmt, marker::PhantomData};

use serde::{Serialize, de::DeserializeOwned};
use strata_common::{Result, error::Error};

/// Encodes and decodes values of `T` as JSON.
pub struct JsonCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new() -> JsonCodec<T> {
        JsonCodec {
            _marker: PhantomData,
        }
    }

    pub fn to_json(&self, value: &T) -> Result<String> {
        serde_json::to_string(value).map_err(|e| Error::serialization(type_name::<T>(), e))
    }

    pub fn to_json_bytes(&self, value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| Error::serialization(type_name::<T>(), e))
    }

    pub fn from_json(&self, json: &str) -> Result<T> {
        serde_json::from_str(json).map_err(|e| Error::serialization(type_name::<T>(), e))
    }

    pub fn from_json_bytes(&self, json: &[u8]) -> Result<T> {
        serde_json::from_slice(json).map_err(|e| Error::serialization(type_name::<T>(), e))
    }
}

impl<T> Default for JsonCodec<T>
where
    T: Serialize + DeserializeOwned,
{
    fn default() -> Self {
        JsonCodec::new()
    }
}

impl<T> Clone for JsonCodec<T> {
    fn clone(&self) -> Self {
        JsonCodec {
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for JsonCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonCodec<{}>", type_name::<T>())
    }
}

#[cfg(test)]
mod tests {
    use strata_common::error::ErrorKind;

    use super::JsonCodec;

    #[test]
    fn test_codec_reports_type_on_failure() {
        let codec = JsonCodec::<Vec<u32>>::new();
        assert_eq!(codec.to_json(&vec![1, 2]).unwrap(), "[1,2]");
        assert_eq!(codec.from_json_bytes(b"[3]").unwrap(), vec![3]);

        let err = codec.from_json("[\"x\"]").unwrap_err();
        match err.kind() {
            ErrorKind::Serialization { context, .. } => assert!(context.contains("Vec<u32>")),
            other => panic!("unexpected error kind: {other:?}"),
        }
    }
}
