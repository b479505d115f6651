use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lfs_api::{AlbumSummary, PhotoSummary};
use lfs_lib::{ids, media, path};
use lfs_lib::quality::Quality;

use crate::fs::entity::{AlbumData, PhotoData, PhotoMeta};
use crate::fs::error::{FsError, SharedError};
use crate::fs::gallery::Gallery;
use crate::fs::index::PathIndex;

/// one shot crawl of the remote album hierarchy into a PathIndex.
///
/// the descent is depth first. subalbums are crawled before the photos of an
/// album are registered and an album is only registered once everything
/// below it is. any collaborator failure aborts the crawl.
pub struct TreeBuilder {
    gallery: Arc<dyn Gallery>,
    quality: Quality,
    crawled: DateTime<Utc>,
    index: PathIndex,
    /// ids of the albums between the root and the album being crawled
    descent: HashSet<ids::AlbumId>,
}

impl TreeBuilder {
    pub fn new(gallery: Arc<dyn Gallery>, quality: Quality) -> Self {
        TreeBuilder {
            gallery,
            quality,
            crawled: Utc::now(),
            index: PathIndex::new(path::ROOT),
            descent: HashSet::new(),
        }
    }

    pub fn root_path<R>(mut self, root: R) -> Self
    where
        R: AsRef<str>
    {
        self.index = PathIndex::new(root);
        self
    }

    /// retrieves the top level groupings and crawls everything under them
    pub fn crawl(self) -> Result<PathIndex, FsError> {
        tracing::debug!("retrieving top level albums");

        let albums = self.gallery.albums()
            .map_err(|e| FsError::transport("failed to retrieve top level albums", SharedError::new(e)))?;

        self.build_tree(albums.into_list())
    }

    pub fn build_tree(mut self, top: Vec<AlbumSummary>) -> Result<PathIndex, FsError> {
        let root_path = self.index.root_path().to_owned();
        let mut root = AlbumData::root(root_path.clone(), self.crawled);

        // the root has no remote record, its children are the top level
        // albums already in hand
        for summary in &top {
            self.visit_album(&mut root, &root_path, summary)?;
        }

        self.index.insert(root_path, root.into());

        tracing::info!("crawl finished with {} entries", self.index.len());

        Ok(self.index)
    }

    fn child_path(parent: &str, title: &str, id: i64) -> String {
        match path::entry_name(title) {
            Some(name) => path::join(parent, name),
            None => path::join(parent, id.to_string()),
        }
    }

    /// takes the path for a new child of the album. a sibling that already
    /// claimed it is dropped together with anything below it
    fn claim(&mut self, parent: &mut AlbumData, path: &str) {
        let removed = self.index.remove_tree(path);

        if removed > 0 {
            tracing::debug!("\"{path}\" is already taken, replacing {removed} entries");
        }

        parent.push_child(path.to_owned());
    }

    fn visit_album(
        &mut self,
        parent: &mut AlbumData,
        parent_path: &str,
        summary: &AlbumSummary
    ) -> Result<(), FsError> {
        let path = Self::child_path(parent_path, &summary.title, summary.id);

        self.claim(parent, &path);
        self.crawl_album(path, summary)
    }

    fn crawl_album(&mut self, path: String, summary: &AlbumSummary) -> Result<(), FsError> {
        let id = summary.id;

        // an album may show up under several parents, it only loops if it
        // is one of its own ancestors
        if !self.descent.insert(id) {
            return Err(FsError::Cycle(id));
        }

        tracing::info!("crawling album {id} \"{path}\"");

        let detail = self.gallery.album(id)
            .map_err(|e| FsError::transport(format!("failed to retrieve album {id}"), SharedError::new(e)))?;

        let created = detail.created_at.unwrap_or(self.crawled);
        let updated = detail.updated_at.unwrap_or(created);
        let mut album = AlbumData::new(id, summary.title.clone(), created, updated);
        let (albums, photos) = detail.into_parts();

        for sub in &albums {
            self.visit_album(&mut album, &path, sub)?;
        }

        for photo in &photos {
            self.visit_photo(&mut album, &path, photo)?;
        }

        self.index.insert(path, album.into());
        self.descent.remove(&id);

        Ok(())
    }

    fn visit_photo(
        &mut self,
        parent: &mut AlbumData,
        parent_path: &str,
        summary: &PhotoSummary
    ) -> Result<(), FsError> {
        let id = summary.id;
        let detail = self.gallery.photo(id)
            .map_err(|e| FsError::transport(format!("failed to retrieve photo {id}"), SharedError::new(e)))?;

        let title = if detail.title.is_empty() {
            summary.title.as_str()
        } else {
            detail.title.as_str()
        };
        let name = media::photo_file_name(title, detail.media_type.as_deref());
        let path = Self::child_path(parent_path, &name, id);

        self.claim(parent, &path);

        let created = detail.created_at.unwrap_or(self.crawled);
        let updated = detail.updated_at.unwrap_or(created);
        let photo = PhotoData::new(
            PhotoMeta {
                id,
                title: name,
                created,
                updated,
                size: detail.original_size(),
            },
            self.gallery.clone(),
            self.quality,
            detail.tiers(),
        );

        if photo.quality() != self.quality {
            tracing::debug!("photo {id} has no {} tier, serving {}", self.quality, photo.quality());
        }

        self.index.insert(path, photo.into());

        Ok(())
    }
}
