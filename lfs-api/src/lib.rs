pub mod album;
pub use album::{Albums, Album, AlbumSummary, SmartAlbum};

pub mod photo;
pub use photo::{Photo, PhotoSummary, SizeVariant, SizeVariants};

mod time;

#[cfg(feature = "client")]
pub mod client;
