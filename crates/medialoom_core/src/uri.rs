//! Access points for stored files.

use crate::FileRecord;
use std::fmt;
use std::sync::Arc;

/// Attributes a [`StorageUri`] can be filtered on.
///
/// The first three belong to the URI itself; the rest are read from the
/// owning file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum UriField {
    /// The access scheme, e.g. `http` or `youtube`
    Scheme,
    /// The file-specific part of the URI
    FileUri,
    /// The separate server URI, if any
    ServerUri,
    /// The file's container format
    Container,
    /// The file's media kind
    Kind,
    /// The file's display name
    DisplayName,
    /// The file's backend identifier
    UniqueId,
}

/// One way of reaching a stored file.
///
/// `scheme` is an internal tag rather than a strict URI scheme: it may name
/// a backend such as `youtube` or a role such as `www` or `download`.
///
/// # Examples
///
/// ```
/// use medialoom_core::{FileRecord, MediaKind, StorageUri, UriField};
/// use std::sync::Arc;
///
/// let file = Arc::new(FileRecord::pending(1, 1, MediaKind::Video, "clip.flv").with_container("flv"));
/// let uri = StorageUri::new(file, "rtmp", "clip.flv").with_server_uri("rtmp://stream.example.org/vod/");
///
/// assert_eq!(uri.to_string(), "rtmp://stream.example.org/vod/clip.flv");
/// assert_eq!(uri.field(UriField::Container).as_deref(), Some("flv"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUri {
    /// The file this URI points to
    pub file: Arc<FileRecord>,
    /// Access scheme tag
    pub scheme: String,
    /// File-specific URI (the whole URI unless a server URI is set)
    pub file_uri: String,
    /// Streaming server URI, for protocols such as RTMP
    pub server_uri: Option<String>,
}

impl StorageUri {
    /// Create a URI without a separate server part.
    pub fn new(file: Arc<FileRecord>, scheme: impl Into<String>, file_uri: impl Into<String>) -> Self {
        Self {
            file,
            scheme: scheme.into(),
            file_uri: file_uri.into(),
            server_uri: None,
        }
    }

    /// Attach a server URI.
    pub fn with_server_uri(mut self, server_uri: impl Into<String>) -> Self {
        self.server_uri = Some(server_uri.into());
        self
    }

    /// Read a URI attribute, falling through to the owning file for
    /// file-level attributes.
    pub fn field(&self, field: UriField) -> Option<String> {
        match field {
            UriField::Scheme => Some(self.scheme.clone()),
            UriField::FileUri => Some(self.file_uri.clone()),
            UriField::ServerUri => self.server_uri.clone(),
            UriField::Container => self.file.container.clone(),
            UriField::Kind => Some(self.file.kind.to_string()),
            UriField::DisplayName => Some(self.file.display_name.clone()),
            UriField::UniqueId => self.file.unique_id.clone(),
        }
    }
}

impl fmt::Display for StorageUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.server_uri {
            Some(server) => write!(
                f,
                "{}/{}",
                server.trim_end_matches('/'),
                self.file_uri.trim_start_matches('/')
            ),
            None => write!(f, "{}", self.file_uri),
        }
    }
}
