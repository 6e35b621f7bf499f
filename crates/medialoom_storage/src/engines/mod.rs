//! Built-in storage engines.
//!
//! | type tag | family | singleton |
//! |----------|--------|-----------|
//! | `local_files` | file | no |
//! | `media_folders` | file | no |
//! | `amazon_s3` (feature `s3`) | file | no |
//! | `youtube`, `vimeo`, `bliptv`, `google_video` | embed | yes |
//! | `remote_urls` | | yes |

mod embed;
mod file;
mod local;
mod remote_url;
#[cfg(feature = "s3")]
mod s3;

pub use embed::{
    BLIPTV, EmbedSite, EmbedStorage, GOOGLE_VIDEO, OEMBED_ENDPOINT_KEY, VIMEO, YOUTUBE, bliptv,
    google_video, vimeo, youtube,
};
pub use file::{FileEngineSettings, parse_upload};
pub use local::{LocalFileStorage, LocalLayout, local_files, media_folders};
pub use remote_url::{RemoteUrlStorage, remote_urls};
#[cfg(feature = "s3")]
pub use s3::{AmazonS3Settings, AmazonS3Storage, amazon_s3};

use crate::EngineDescriptor;

/// Family of engines that accept uploaded files.
pub const FILE_FAMILY: &str = "file";

/// Family of engines that accept URLs of known video sites.
pub const EMBED_FAMILY: &str = "embed";

/// Descriptors of every built-in engine type.
pub fn builtin_descriptors() -> Vec<EngineDescriptor> {
    let mut descriptors = vec![local_files(), media_folders()];
    #[cfg(feature = "s3")]
    descriptors.push(amazon_s3());
    descriptors.extend([youtube(), vimeo(), bliptv(), google_video(), remote_urls()]);
    descriptors
}
