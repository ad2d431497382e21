use bytes::{Buf, Bytes};
use serde_json::{Map, Value};

pub const PROVIDER_NAME_PROPERTY_KEY: &str = "provider";
pub const EDIT_URL_PROPERTY_KEY: &str = "edit_url";
pub const PROVIDER_NAME: &str = "GitHub";

/// A fetched file: decoded content plus the remaining API metadata.
///
/// Both parts are absent when GitHub answered with an empty body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resource {
    pub content: Option<Bytes>,
    pub metadata: Option<Map<String, Value>>,
}

impl Resource {
    /// Reads the decoded content as a stream.
    pub fn reader(&self) -> Option<bytes::buf::Reader<Bytes>> {
        self.content.clone().map(Buf::reader)
    }

    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.as_ref()?.get(key)?.as_str()
    }
}
