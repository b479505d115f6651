use std::collections::HashMap;

use chrono::{DateTime, Utc};
use lfs_lib::ids;
use lfs_lib::serde::{int_id, null_default};
use serde::{Serialize, Deserialize};
use strum::{AsRefStr, EnumIter, EnumString, IntoEnumIterator};

use crate::photo::PhotoSummary;
use crate::time;

/// curated albums the server assembles on its own. they are addressed by name
/// instead of by id so each one gets a reserved negative id
#[derive(
    Debug, Clone, Copy, PartialEq, Eq,
    AsRefStr, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum SmartAlbum {
    Unsorted,
    Starred,
    Public,
    Recent,
}

impl SmartAlbum {
    pub fn id(&self) -> ids::AlbumId {
        match self {
            SmartAlbum::Unsorted => -2,
            SmartAlbum::Starred => -3,
            SmartAlbum::Public => -4,
            SmartAlbum::Recent => -5,
        }
    }

    pub fn from_id(id: ids::AlbumId) -> Option<Self> {
        SmartAlbum::iter().find(|smart| smart.id() == id)
    }

    pub fn name(&self) -> &str {
        self.as_ref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumSummary {
    #[serde(with = "int_id")]
    pub id: ids::AlbumId,
    #[serde(default, deserialize_with = "null_default")]
    pub title: String,
}

#[derive(Debug, Deserialize)]
struct SmartSummary {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAlbums {
    #[serde(default, alias = "smart_albums")]
    smartalbums: Option<HashMap<String, Option<SmartSummary>>>,
    #[serde(default)]
    albums: Option<Vec<AlbumSummary>>,
    #[serde(default)]
    shared_albums: Option<Vec<AlbumSummary>>,
}

/// the top level groupings of the gallery
#[derive(Debug, Default, Deserialize)]
#[serde(from = "RawAlbums")]
pub struct Albums {
    pub smart: Vec<AlbumSummary>,
    pub albums: Vec<AlbumSummary>,
    pub shared: Vec<AlbumSummary>,
}

impl Albums {
    /// every album in listing order: curated first, then ordinary, then shared
    pub fn into_list(self) -> Vec<AlbumSummary> {
        let mut rtn = Vec::with_capacity(self.smart.len() + self.albums.len() + self.shared.len());
        rtn.extend(self.smart);
        rtn.extend(self.albums);
        rtn.extend(self.shared);
        rtn
    }
}

impl From<RawAlbums> for Albums {
    fn from(raw: RawAlbums) -> Self {
        let mut smart = Vec::new();

        if let Some(mut map) = raw.smartalbums {
            // known names are listed in a fixed order since the map has none
            for kind in SmartAlbum::iter() {
                if let Some(summary) = map.remove(kind.name()) {
                    let title = summary.and_then(|v| v.title)
                        .unwrap_or_else(|| kind.name().to_owned());

                    smart.push(AlbumSummary {
                        id: kind.id(),
                        title
                    });
                }
            }

            for name in map.keys() {
                tracing::warn!("skipping unknown smart album \"{name}\"");
            }
        }

        Albums {
            smart,
            albums: raw.albums.unwrap_or_default(),
            shared: raw.shared_albums.unwrap_or_default(),
        }
    }
}

/// full detail of a single album. the id is left out since curated albums
/// report a name there and the caller already knows which album it asked for
#[derive(Debug, Default, Deserialize)]
pub struct Album {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "time::lenient")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    albums: Option<Vec<AlbumSummary>>,
    #[serde(default)]
    photos: Option<Vec<PhotoSummary>>,
}

impl Album {
    pub fn new(albums: Vec<AlbumSummary>, photos: Vec<PhotoSummary>) -> Self {
        Album {
            title: None,
            created_at: None,
            updated_at: None,
            albums: Some(albums),
            photos: Some(photos),
        }
    }

    pub fn into_parts(self) -> (Vec<AlbumSummary>, Vec<PhotoSummary>) {
        (self.albums.unwrap_or_default(), self.photos.unwrap_or_default())
    }
}
