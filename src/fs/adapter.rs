use std::cmp;
use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use lfs_lib::path;
use lfs_lib::quality::Quality;

use crate::fs::entity::{Attributes, Common, Entity, Kind};
use crate::fs::error::FsError;
use crate::fs::gallery::Gallery;
use crate::fs::index::PathIndex;
use crate::fs::tree::TreeBuilder;

/// access mode bits of an open request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags(i32);

impl OpenFlags {
    pub const READ_ONLY: OpenFlags = OpenFlags(0);
    pub const WRITE_ONLY: OpenFlags = OpenFlags(1);
    pub const READ_WRITE: OpenFlags = OpenFlags(2);

    const ACCESS_MODE: i32 = 3;

    pub fn from_bits(bits: i32) -> Self {
        OpenFlags(bits)
    }

    pub fn access_mode(&self) -> i32 {
        self.0 & Self::ACCESS_MODE
    }

    /// anything other than a plain read only access mode
    pub fn is_write(&self) -> bool {
        self.access_mode() != Self::READ_ONLY.0
    }
}

impl From<i32> for OpenFlags {
    fn from(bits: i32) -> Self {
        OpenFlags(bits)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub path: String,
    pub kind: Kind,
}

/// the four operations exposed to a host bridge. every call is scoped to
/// itself and may run concurrently with any other. the gallery session lives
/// on in the photos of the index for their later downloads
pub struct Filesystem {
    index: Arc<PathIndex>,
}

impl Filesystem {
    pub fn new(index: PathIndex) -> Self {
        Filesystem {
            index: Arc::new(index),
        }
    }

    /// crawls the gallery and builds a filesystem over the result. nothing is
    /// served if the crawl fails
    pub fn crawl(gallery: Arc<dyn Gallery>, quality: Quality) -> Result<Self, FsError> {
        let index = TreeBuilder::new(gallery, quality).crawl()?;

        Ok(Filesystem::new(index))
    }

    pub fn index(&self) -> &Arc<PathIndex> {
        &self.index
    }

    fn lookup(&self, path: &str) -> Result<&Entity, FsError> {
        self.index.get(path)
            .ok_or_else(|| FsError::NotFound(path.to_owned()))
    }

    pub fn attributes<P>(&self, path: P) -> Result<Attributes, FsError>
    where
        P: AsRef<str>
    {
        let entity = self.lookup(path.as_ref())?;

        Ok(entity.attributes(Utc::now()))
    }

    /// entries of an album in crawl order. always the full listing
    pub fn list<P>(&self, path: P) -> Result<Vec<DirEntry>, FsError>
    where
        P: AsRef<str>
    {
        let path = path.as_ref();
        let Entity::Album(album) = self.lookup(path)? else {
            return Err(FsError::NotADirectory(path.to_owned()));
        };

        let mut rtn = Vec::with_capacity(album.children().len());

        for child in album.children() {
            let Some(entity) = self.index.get(child) else {
                tracing::warn!("listed child \"{child}\" of \"{path}\" is not indexed");
                continue;
            };

            rtn.push(DirEntry {
                name: path::basename(child).to_owned(),
                path: child.clone(),
                kind: entity.kind(),
            });
        }

        Ok(rtn)
    }

    /// validates an open request. content is not fetched until the first read
    pub fn open<P>(&self, path: P, flags: OpenFlags) -> Result<(), FsError>
    where
        P: AsRef<str>
    {
        let path = path.as_ref();
        let entity = self.lookup(path)?;

        if flags.is_write() {
            if entity.is_album() {
                return Err(FsError::IsADirectory(path.to_owned()));
            }

            return Err(FsError::PermissionDenied(path.to_owned()));
        }

        Ok(())
    }

    /// reads up to size bytes at offset, fetching the photo on first use.
    /// a range running past the end is clamped, an offset at or past the end
    /// is an error
    pub fn read<P>(&self, path: P, size: usize, offset: u64) -> Result<Bytes, FsError>
    where
        P: AsRef<str>
    {
        let path = path.as_ref();
        let photo = self.lookup(path)?
            .as_photo()
            .ok_or_else(|| FsError::IsADirectory(path.to_owned()))?;

        let bytes = photo.content()?;
        let length = bytes.len() as u64;

        if offset >= length {
            return Err(FsError::Range {
                path: path.to_owned(),
                offset,
                length,
            });
        }

        let count = cmp::min(size as u64, length - offset);
        let start = offset as usize;
        let end = start + count as usize;

        Ok(bytes.slice(start..end))
    }
}
