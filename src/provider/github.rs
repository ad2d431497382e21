use crate::codec::{JsonCodec, SerdeJsonCodec};
use crate::config::{Config, FetchConfiguration};
use crate::error::FetchError;
use crate::http::{HttpExchanger, ReqwestExchanger};
use crate::provider::Fetcher;
use crate::resource::{
    EDIT_URL_PROPERTY_KEY, PROVIDER_NAME, PROVIDER_NAME_PROPERTY_KEY, Resource,
};
use crate::url::{Endpoint, request_url};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use tracing::{debug, error, warn};

const CONTENT_KEY: &str = "content";
const HTML_URL_KEY: &str = "html_url";

/// Standard alphabet; GitHub pads its content but a missing pad is tolerated.
const CONTENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum EntryKind {
    Blob,
    Tree,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    #[serde(rename = "type", default)]
    item_type: EntryKind,
    #[serde(default)]
    path: String,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Option<Vec<TreeItem>>,
    #[serde(default)]
    truncated: Value,
}

/// Reads files and tree listings through the GitHub REST API.
///
/// The HTTP exchange and the JSON codec are injected; [`GitHubFetcher::new`] wires
/// the `reqwest` and `serde_json` adapters.
pub struct GitHubFetcher<E = ReqwestExchanger, J = SerdeJsonCodec> {
    config: FetchConfiguration,
    exchanger: E,
    codec: J,
}

impl GitHubFetcher {
    pub fn new(config: FetchConfiguration, settings: Config) -> Self {
        Self::with_parts(config, ReqwestExchanger::new(settings), SerdeJsonCodec)
    }
}

impl<E: HttpExchanger, J: JsonCodec> GitHubFetcher<E, J> {
    pub fn with_parts(config: FetchConfiguration, exchanger: E, codec: J) -> Self {
        Self {
            config,
            exchanger,
            codec,
        }
    }

    /// Fetches the configured file through the contents API.
    ///
    /// The base64 `content` field becomes [`Resource::content`]; every other field is
    /// kept as metadata, plus `provider` and, when `html_url` is present, `edit_url`.
    /// An empty 200 body is not an error: both parts of the resource are absent.
    pub async fn fetch_file_content(&self) -> Result<Resource, FetchError> {
        let url = request_url(&self.config, Endpoint::Contents)
            .inspect_err(|e| error!(error = %e, "invalid fetch configuration"))?;

        let body = self.exchanger.exchange(&url, &self.config).await?;

        self.decode_resource(&url, &body)
            .inspect_err(|e| error!(url = %url, error = %e, "unable to fetch GitHub content"))
    }

    /// Lists the blobs whose absolute path starts with the configured filepath.
    ///
    /// Paths come back prefixed with `/`, in the order GitHub returned them.
    pub async fn list_files_under_path(&self) -> Result<Vec<String>, FetchError> {
        let url = request_url(&self.config, Endpoint::Trees)
            .inspect_err(|e| error!(error = %e, "invalid fetch configuration"))?;

        let body = self.exchanger.exchange(&url, &self.config).await?;

        self.filter_tree(&url, &body)
            .inspect_err(|e| error!(url = %url, error = %e, "unable to list GitHub files"))
    }

    fn decode_resource(&self, url: &str, body: &[u8]) -> Result<Resource, FetchError> {
        if body.is_empty() {
            warn!(url, "GitHub responded with status 200 but the content is empty");
            return Ok(Resource::default());
        }

        let Some(node) = self.codec.read_tree(body)? else {
            return Ok(Resource::default());
        };

        let mut metadata: Map<String, Value> = self.codec.convert(node)?;

        let content = match metadata.shift_remove(CONTENT_KEY) {
            Some(value) => decode_content(&value)?,
            None => None,
        };

        let edit_url = metadata
            .get(HTML_URL_KEY)
            .filter(|v| !v.is_null())
            .map(|html_url| as_text(html_url).replace("blob", "edit"));
        if let Some(edit_url) = edit_url {
            metadata.insert(EDIT_URL_PROPERTY_KEY.to_string(), Value::String(edit_url));
        }

        metadata.insert(
            PROVIDER_NAME_PROPERTY_KEY.to_string(),
            Value::from(PROVIDER_NAME),
        );

        Ok(Resource {
            content,
            metadata: Some(metadata),
        })
    }

    fn filter_tree(&self, url: &str, body: &[u8]) -> Result<Vec<String>, FetchError> {
        if body.is_empty() {
            warn!(url, "GitHub responded with status 200 but the tree is empty");
            return Ok(Vec::new());
        }

        let Some(node) = self.codec.read_tree(body)? else {
            return Ok(Vec::new());
        };

        let response: TreeResponse = self.codec.convert(node)?;

        if response.truncated == Value::Bool(true) {
            warn!(url, "tree listing is truncated, some files may be missing");
        }

        let files: Vec<String> = response
            .tree
            .unwrap_or_default()
            .into_iter()
            .filter(|item| item.item_type == EntryKind::Blob && !item.path.is_empty())
            .map(|item| format!("/{}", item.path))
            .filter(|path| path.starts_with(&self.config.filepath))
            .collect();

        debug!(url, count = files.len(), "listed files");
        Ok(files)
    }
}

impl<E, J> Fetcher for GitHubFetcher<E, J>
where
    E: HttpExchanger + Sync,
    J: JsonCodec + Sync,
{
    fn fetch(&self) -> impl std::future::Future<Output = Result<Resource, FetchError>> + Send {
        self.fetch_file_content()
    }

    fn files(&self) -> impl std::future::Future<Output = Result<Vec<String>, FetchError>> + Send {
        self.list_files_under_path()
    }
}

/// Decodes the base64 `content` field, ignoring the line breaks GitHub inserts.
fn decode_content(value: &Value) -> Result<Option<Bytes>, FetchError> {
    if value.is_null() {
        return Ok(None);
    }

    let encoded: String = as_text(value).chars().filter(|c| *c != '\n').collect();
    if encoded.is_empty() {
        return Ok(None);
    }

    CONTENT_ENGINE
        .decode(encoded)
        .map(|decoded| Some(Bytes::from(decoded)))
        .map_err(|source| FetchError::Decode { source })
}

fn as_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        other => Cow::Owned(other.to_string()),
    }
}
