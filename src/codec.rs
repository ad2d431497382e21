use crate::error::FetchError;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// JSON capabilities the fetcher needs from its host.
pub trait JsonCodec {
    /// Parses a response body into a document. Blank input and `null` yield `None`.
    fn read_tree(&self, body: &[u8]) -> Result<Option<Value>, FetchError>;

    /// Converts a parsed document into a typed value, e.g. a string-keyed map.
    fn convert<T: DeserializeOwned>(&self, node: Value) -> Result<T, FetchError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SerdeJsonCodec;

impl JsonCodec for SerdeJsonCodec {
    fn read_tree(&self, body: &[u8]) -> Result<Option<Value>, FetchError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        match serde_json::from_slice(body) {
            Ok(Value::Null) => Ok(None),
            Ok(node) => Ok(Some(node)),
            Err(source) => Err(FetchError::Malformed { source }),
        }
    }

    fn convert<T: DeserializeOwned>(&self, node: Value) -> Result<T, FetchError> {
        serde_json::from_value(node).map_err(|source| FetchError::Malformed { source })
    }
}
