use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use lfs_lib::ids;
use lfs_lib::quality::{self, Quality, Tiers};

use crate::fs::content::Content;
use crate::fs::error::FsError;
use crate::fs::gallery::Gallery;

/// size reported for every album
pub const ALBUM_SIZE: u64 = 4096;
pub const ALBUM_MODE: u32 = 0o755;
pub const PHOTO_MODE: u32 = 0o444;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    Directory,
    RegularFile,
}

/// descriptive fields shared by albums and photos
#[derive(Debug, Clone)]
pub struct Meta {
    pub id: i64,
    pub title: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub size: u64,
    pub kind: Kind,
    pub mode: u32,
}

/// what attribute lookups hand back to the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
    pub id: i64,
    pub kind: Kind,
    pub size: u64,
    pub ctime: DateTime<Utc>,
    pub mtime: DateTime<Utc>,
    pub atime: DateTime<Utc>,
    pub mode: u32,
}

pub trait Common {
    fn meta(&self) -> &Meta;

    fn id(&self) -> i64 {
        self.meta().id
    }

    fn title(&self) -> &str {
        &self.meta().title
    }

    fn kind(&self) -> Kind {
        self.meta().kind
    }

    fn size(&self) -> u64 {
        self.meta().size
    }

    fn attributes(&self, atime: DateTime<Utc>) -> Attributes {
        let meta = self.meta();

        Attributes {
            id: meta.id,
            kind: meta.kind,
            size: meta.size,
            ctime: meta.created,
            mtime: meta.updated,
            atime,
            mode: meta.mode,
        }
    }
}

#[derive(Debug)]
pub struct AlbumData {
    meta: Meta,
    children: Vec<String>,
}

impl AlbumData {
    pub fn new<T>(id: ids::AlbumId, title: T, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self
    where
        T: Into<String>
    {
        AlbumData {
            meta: Meta {
                id,
                title: title.into(),
                created,
                updated,
                size: ALBUM_SIZE,
                kind: Kind::Directory,
                mode: ALBUM_MODE,
            },
            children: Vec::new(),
        }
    }

    /// the synthetic album at the top of the tree. it has no remote record so
    /// its timestamps are the time of the crawl
    pub fn root<T>(root_path: T, crawled: DateTime<Utc>) -> Self
    where
        T: Into<String>
    {
        AlbumData::new(ids::ROOT_ID, root_path, crawled, crawled)
    }

    /// child paths in crawl order
    pub fn children(&self) -> &[String] {
        &self.children
    }

    /// records a child path. a path that is already listed keeps its
    /// original position
    pub fn push_child(&mut self, path: String) -> bool {
        if self.children.contains(&path) {
            false
        } else {
            self.children.push(path);
            true
        }
    }
}

impl Common for AlbumData {
    fn meta(&self) -> &Meta {
        &self.meta
    }
}

pub struct PhotoData {
    meta: Meta,
    gallery: Arc<dyn Gallery>,
    quality: Quality,
    available: Tiers,
    content: Content,
}

impl PhotoData {
    /// builds a photo served at the best tier for the requested one. the
    /// reported size stays the one of the original file whatever tier gets
    /// resolved
    pub fn new(
        meta: PhotoMeta,
        gallery: Arc<dyn Gallery>,
        requested: Quality,
        available: Tiers,
    ) -> Self {
        let quality = quality::resolve(requested, &available);

        PhotoData {
            meta: Meta {
                id: meta.id,
                title: meta.title,
                created: meta.created,
                updated: meta.updated,
                size: meta.size,
                kind: Kind::RegularFile,
                mode: PHOTO_MODE,
            },
            gallery,
            quality,
            available,
            content: Content::new(),
        }
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    #[cfg(test)]
    pub fn is_fetched(&self) -> bool {
        self.content.is_ready()
    }

    /// bytes of the photo at its resolved tier, downloaded on first use
    pub fn content(&self) -> Result<Bytes, FsError> {
        let id = self.meta.id;
        let quality = self.quality;

        self.content.get_or_fetch(|| {
            tracing::debug!("fetching photo {id} at {quality}");

            let bytes = self.gallery.photo_bytes(id, quality)?;

            tracing::debug!("fetched photo {id}: {} bytes", bytes.len());

            Ok(bytes)
        }).map_err(|err| {
            tracing::warn!("failed to fetch photo {id}: {err}");

            FsError::transport(format!("failed to fetch photo {id} at {quality}"), err)
        })
    }
}

impl Common for PhotoData {
    fn meta(&self) -> &Meta {
        &self.meta
    }
}

impl std::fmt::Debug for PhotoData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoData")
            .field("meta", &self.meta)
            .field("quality", &self.quality)
            .field("available", &self.available)
            .field("content", &self.content)
            .finish()
    }
}

/// photo fields known once its detail has been retrieved
#[derive(Debug, Clone)]
pub struct PhotoMeta {
    pub id: ids::PhotoId,
    pub title: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub size: u64,
}

#[derive(Debug)]
pub enum Entity {
    Album(AlbumData),
    Photo(PhotoData),
}

impl Entity {
    pub fn is_album(&self) -> bool {
        matches!(self, Entity::Album(_))
    }

    pub fn as_album(&self) -> Option<&AlbumData> {
        match self {
            Entity::Album(album) => Some(album),
            Entity::Photo(_) => None,
        }
    }

    pub fn as_photo(&self) -> Option<&PhotoData> {
        match self {
            Entity::Album(_) => None,
            Entity::Photo(photo) => Some(photo),
        }
    }
}

impl Common for Entity {
    fn meta(&self) -> &Meta {
        match self {
            Entity::Album(album) => album.meta(),
            Entity::Photo(photo) => photo.meta(),
        }
    }
}

impl From<AlbumData> for Entity {
    fn from(album: AlbumData) -> Self {
        Entity::Album(album)
    }
}

impl From<PhotoData> for Entity {
    fn from(photo: PhotoData) -> Self {
        Entity::Photo(photo)
    }
}

#[cfg(test)]
mod test {
    use lfs_lib::quality::Quality;

    use super::*;
    use crate::fs::fake::FakeGallery;

    fn meta() -> PhotoMeta {
        let now = Utc::now();

        PhotoMeta {
            id: 42,
            title: String::from("sunset.jpg"),
            created: now,
            updated: now,
            size: 2048,
        }
    }

    #[test]
    fn album_attributes() {
        let now = Utc::now();
        let album = Entity::from(AlbumData::new(15, "Vacation", now, now));
        let attrs = album.attributes(now);

        assert_eq!(attrs.kind, Kind::Directory);
        assert_eq!(attrs.size, ALBUM_SIZE);
        assert_eq!(attrs.mode, ALBUM_MODE);
        assert_eq!(attrs.id, 15);
        assert!(album.is_album());
    }

    #[test]
    fn root_album() {
        let now = Utc::now();
        let root = AlbumData::root("/", now);

        assert_eq!(root.id(), ids::ROOT_ID);
        assert_eq!(root.title(), "/");
        assert_eq!(root.meta().created, now);
    }

    #[test]
    fn children_are_not_duplicated() {
        let now = Utc::now();
        let mut album = AlbumData::new(15, "Vacation", now, now);

        assert!(album.push_child(String::from("/Vacation/a.jpg")));
        assert!(album.push_child(String::from("/Vacation/b.jpg")));
        assert!(!album.push_child(String::from("/Vacation/a.jpg")));
        assert_eq!(album.children(), &["/Vacation/a.jpg", "/Vacation/b.jpg"]);
    }

    #[test]
    fn photo_keeps_original_size() {
        let gallery = Arc::new(FakeGallery::new());
        gallery.add_bytes(42, Quality::Full, vec![7u8; 4096]);

        let photo = PhotoData::new(
            meta(),
            gallery.clone(),
            Quality::Medium,
            Tiers::from([Quality::Small, Quality::Full]),
        );

        assert_eq!(photo.quality(), Quality::Full);
        assert_eq!(photo.size(), 2048);
        assert_eq!(photo.kind(), Kind::RegularFile);
        assert!(!photo.is_fetched());

        let bytes = photo.content().unwrap();

        // the size is not revised once the bytes are known
        assert_eq!(bytes.len(), 4096);
        assert_eq!(photo.size(), 2048);
        assert!(photo.is_fetched());
    }

    #[test]
    fn photo_fetches_at_resolved_tier() {
        let gallery = Arc::new(FakeGallery::new());
        gallery.add_bytes(42, Quality::Small, vec![1u8; 300]);

        let photo = PhotoData::new(
            meta(),
            gallery.clone(),
            Quality::Thumbnail,
            Tiers::from([Quality::Small, Quality::Full]),
        );

        assert_eq!(photo.quality(), Quality::Small);
        assert_eq!(photo.content().unwrap().len(), 300);
        assert_eq!(gallery.fetches(42), vec![Quality::Small]);
    }

    #[test]
    fn failed_fetch_is_transport_error() {
        let gallery = Arc::new(FakeGallery::new());

        let photo = PhotoData::new(meta(), gallery.clone(), Quality::Full, Tiers::new());

        match photo.content() {
            Err(FsError::Transport { .. }) => {},
            other => panic!("unexpected result {:?}", other),
        }

        assert!(!photo.is_fetched());
    }
}
