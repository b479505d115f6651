use lfs_lib::ids;
use serde_json::json;

use crate::client::error::RequestError;
use crate::client::ApiClient;
use crate::album::{Albums, Album, SmartAlbum};

pub struct RetrieveAlbums;

impl RetrieveAlbums {
    pub fn send(self, client: &ApiClient) -> Result<Albums, RequestError> {
        let res = client.post("api/Albums::get")?.send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}

pub struct RetrieveAlbum {
    id: ids::AlbumId
}

impl RetrieveAlbum {
    pub fn id(id: ids::AlbumId) -> Self {
        RetrieveAlbum { id }
    }

    pub fn send(self, client: &ApiClient) -> Result<Album, RequestError> {
        let body = match SmartAlbum::from_id(self.id) {
            Some(smart) => json!({"albumID": smart.name()}),
            None => json!({"albumID": self.id.to_string()})
        };

        let res = client.post("api/Album::get")?
            .json(&body)
            .send()?;

        match res.status() {
            reqwest::StatusCode::OK => Ok(res.json()?),
            _ => Err(RequestError::from_response(res))
        }
    }
}
