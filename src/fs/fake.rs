//! in memory gallery used by the tests

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use bytes::Bytes;
use chrono::{TimeZone, Utc};
use lfs_api::{Albums, Album, AlbumSummary, Photo, PhotoSummary, SizeVariant};
use lfs_lib::ids;
use lfs_lib::quality::Quality;

use crate::fs::error::BoxDynError;
use crate::fs::gallery::Gallery;

#[derive(Default)]
struct Inner {
    top: Vec<AlbumSummary>,
    albums: HashMap<ids::AlbumId, (Vec<AlbumSummary>, Vec<PhotoSummary>)>,
    photos: HashMap<ids::PhotoId, Photo>,
    bytes: HashMap<(ids::PhotoId, Quality), Bytes>,
    failing: HashSet<ids::PhotoId>,
    fail_albums: bool,
    album_calls: Vec<ids::AlbumId>,
    photo_calls: Vec<ids::PhotoId>,
    fetches: Vec<(ids::PhotoId, Quality)>,
}

#[derive(Default)]
pub struct FakeGallery {
    inner: Mutex<Inner>,
}

impl FakeGallery {
    pub fn new() -> Self {
        FakeGallery::default()
    }

    pub fn add_top(&self, id: ids::AlbumId, title: &str) {
        let mut inner = self.inner.lock().unwrap();

        inner.top.push(AlbumSummary { id, title: title.into() });
        inner.albums.entry(id).or_default();
    }

    pub fn add_album(&self, parent: ids::AlbumId, id: ids::AlbumId, title: &str) {
        let mut inner = self.inner.lock().unwrap();

        inner.albums.entry(parent).or_default().0.push(AlbumSummary { id, title: title.into() });
        inner.albums.entry(id).or_default();
    }

    /// adds a photo with the given tiers generated on the server
    pub fn add_photo(
        &self,
        album: ids::AlbumId,
        id: ids::PhotoId,
        title: &str,
        media_type: &str,
        size: u64,
        tiers: &[Quality],
    ) {
        let mut inner = self.inner.lock().unwrap();
        let mut photo = Photo {
            id,
            title: title.into(),
            media_type: Some(media_type.into()),
            created_at: Some(Utc.with_ymd_and_hms(2021, 5, 2, 10, 30, 0).unwrap()),
            updated_at: Some(Utc.with_ymd_and_hms(2021, 6, 1, 8, 0, 0).unwrap()),
            filesize: Some(size),
            ..Default::default()
        };

        for quality in tiers {
            photo.size_variants.set(*quality, Some(SizeVariant::default()));
        }

        inner.albums.entry(album).or_default().1.push(PhotoSummary { id, title: title.into() });
        inner.photos.insert(id, photo);
    }

    pub fn add_bytes<B>(&self, id: ids::PhotoId, quality: Quality, bytes: B)
    where
        B: Into<Bytes>
    {
        self.inner.lock().unwrap().bytes.insert((id, quality), bytes.into());
    }

    /// downloads of the photo fail until cleared
    pub fn set_failing(&self, id: ids::PhotoId, failing: bool) {
        let mut inner = self.inner.lock().unwrap();

        if failing {
            inner.failing.insert(id);
        } else {
            inner.failing.remove(&id);
        }
    }

    pub fn fail_albums(&self) {
        self.inner.lock().unwrap().fail_albums = true;
    }

    pub fn album_calls(&self) -> Vec<ids::AlbumId> {
        self.inner.lock().unwrap().album_calls.clone()
    }

    pub fn photo_calls(&self) -> Vec<ids::PhotoId> {
        self.inner.lock().unwrap().photo_calls.clone()
    }

    /// tiers requested for a photo, one entry per download
    pub fn fetches(&self, id: ids::PhotoId) -> Vec<Quality> {
        self.inner.lock().unwrap().fetches.iter()
            .filter(|(photo, _)| *photo == id)
            .map(|(_, quality)| *quality)
            .collect()
    }
}

impl Gallery for FakeGallery {
    fn albums(&self) -> Result<Albums, BoxDynError> {
        let inner = self.inner.lock().unwrap();

        Ok(Albums {
            smart: Vec::new(),
            albums: inner.top.clone(),
            shared: Vec::new(),
        })
    }

    fn album(&self, id: ids::AlbumId) -> Result<Album, BoxDynError> {
        let mut inner = self.inner.lock().unwrap();
        inner.album_calls.push(id);

        if inner.fail_albums {
            return Err("album request failed".into());
        }

        match inner.albums.get(&id) {
            Some((albums, photos)) => Ok(Album::new(albums.clone(), photos.clone())),
            None => Err(format!("album {id} not found").into()),
        }
    }

    fn photo(&self, id: ids::PhotoId) -> Result<Photo, BoxDynError> {
        let mut inner = self.inner.lock().unwrap();
        inner.photo_calls.push(id);

        inner.photos.get(&id)
            .cloned()
            .ok_or_else(|| format!("photo {id} not found").into())
    }

    fn photo_bytes(&self, id: ids::PhotoId, quality: Quality) -> Result<Bytes, BoxDynError> {
        let mut inner = self.inner.lock().unwrap();
        inner.fetches.push((id, quality));

        if inner.failing.contains(&id) {
            return Err(format!("download of photo {id} failed").into());
        }

        inner.bytes.get(&(id, quality))
            .cloned()
            .ok_or_else(|| format!("no {quality} bytes for photo {id}").into())
    }
}
