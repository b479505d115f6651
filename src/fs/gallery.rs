use bytes::Bytes;
use lfs_api::{Albums, Album, Photo};
use lfs_api::client::ApiClient;
use lfs_api::client::albums::{RetrieveAlbums, RetrieveAlbum};
use lfs_api::client::photos::{RetrievePhoto, DownloadPhoto};
use lfs_lib::ids;
use lfs_lib::quality::Quality;

use crate::fs::error::BoxDynError;

/// the remote photo gallery as seen by the filesystem. the session behind it
/// is shared by every photo for its later downloads
pub trait Gallery: Send + Sync {
    /// top level album groupings
    fn albums(&self) -> Result<Albums, BoxDynError>;

    /// subalbums and photos of a single album
    fn album(&self, id: ids::AlbumId) -> Result<Album, BoxDynError>;

    /// available tiers, timestamps and original size of a photo
    fn photo(&self, id: ids::PhotoId) -> Result<Photo, BoxDynError>;

    /// raw bytes of a photo at the given tier
    fn photo_bytes(&self, id: ids::PhotoId, quality: Quality) -> Result<Bytes, BoxDynError>;
}

impl Gallery for ApiClient {
    fn albums(&self) -> Result<Albums, BoxDynError> {
        Ok(RetrieveAlbums.send(self)?)
    }

    fn album(&self, id: ids::AlbumId) -> Result<Album, BoxDynError> {
        Ok(RetrieveAlbum::id(id).send(self)?)
    }

    fn photo(&self, id: ids::PhotoId) -> Result<Photo, BoxDynError> {
        Ok(RetrievePhoto::id(id).send(self)?)
    }

    fn photo_bytes(&self, id: ids::PhotoId, quality: Quality) -> Result<Bytes, BoxDynError> {
        let mut req = DownloadPhoto::id(id);
        req.quality(quality);

        Ok(req.send(self)?)
    }
}
