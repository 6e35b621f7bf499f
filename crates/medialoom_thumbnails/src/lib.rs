//! Thumbnail pipeline for the Medialoom media publishing core.
//!
//! Every media item and podcast owns a fixed set of JPEG thumbnails, one per
//! configured size, stored on disk as `{image_dir}/{category}/{id}{size}.jpg`
//! next to a verbatim backup of the uploaded original (`{id}orig.{ext}`).
//! Owners that have not been saved yet use the id `new`, which is also where
//! the placeholder set lives.
//!
//! # Example
//!
//! ```no_run
//! use medialoom_core::ThumbnailSettings;
//! use medialoom_thumbnails::{ThumbnailOwner, ThumbnailStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = ThumbnailSettings::builder()
//!     .image_dir("/srv/medialoom/images")
//!     .size("media", "s", (128, 72))
//!     .build()?;
//! let store = ThumbnailStore::new(settings);
//! let owner = ThumbnailOwner::media(Some(42));
//!
//! if !store.has_thumbs(&owner) {
//!     store.create_defaults(&owner)?;
//! }
//! println!("{:?}", store.url(&owner, "s", true));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod owner;
mod resize;
mod store;

pub use owner::{MEDIA_CATEGORY, PLACEHOLDER_ID, PODCAST_CATEGORY, ThumbnailOwner};
pub use resize::{crop_rect, resize_thumb, target_size};
pub use store::{PROBE_SIZE, Thumb, ThumbnailStore};
