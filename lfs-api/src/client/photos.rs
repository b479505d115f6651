use bytes::Bytes;
use lfs_lib::ids;
use lfs_lib::quality::Quality;
use serde_json::json;

use crate::client::error::RequestError;
use crate::client::ApiClient;
use crate::photo::Photo;

pub struct RetrievePhoto {
    id: ids::PhotoId
}

impl RetrievePhoto {
    pub fn id(id: ids::PhotoId) -> Self {
        RetrievePhoto { id }
    }

    pub fn send(self, client: &ApiClient) -> Result<Photo, RequestError> {
        let res = client.post("api/Photo::get")?
            .json(&json!({"photoID": self.id.to_string()}))
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}

/// downloads the raw bytes of a single photo at the given tier
pub struct DownloadPhoto {
    id: ids::PhotoId,
    quality: Quality,
}

impl DownloadPhoto {
    pub fn id(id: ids::PhotoId) -> Self {
        DownloadPhoto {
            id,
            quality: Quality::Full
        }
    }

    pub fn quality(&mut self, quality: Quality) -> &mut Self {
        self.quality = quality;
        self
    }

    pub fn send(self, client: &ApiClient) -> Result<Bytes, RequestError> {
        let id = self.id.to_string();
        let res = client.get("api/Photo::getArchive")?
            .query(&[("photoIDs", id.as_str()), ("kind", self.quality.archive_kind())])
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.bytes()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}
