use std::io;
use std::io::ErrorKind;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use spdlog::error;

/// Bucket holding one top-level folder per album.
pub const IMAGE_BUCKET: &str = "images";

/// Thin adapter over the hosted object/table storage service. Constructed
/// once at startup and passed in through the app state, so tests can work
/// against the pure helpers below without a network.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
}

/// One entry from a folder listing. The service marks folders by returning
/// no metadata object for them.
#[derive(Deserialize, Debug, Clone)]
pub struct ObjectEntry {
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl ObjectEntry {
    pub fn is_folder(&self) -> bool {
        self.metadata.is_none()
    }
}

/// A row of the "albums" table. `year` and `order` arrive as numbers or
/// numeric strings depending on how the row was written; both are coerced
/// to i32 here so nothing downstream has to guess.
#[derive(Deserialize, Debug, Clone)]
pub struct AlbumRecord {
    pub name: String,
    pub path: String,
    #[serde(deserialize_with = "int_or_string")]
    pub year: i32,
    #[serde(deserialize_with = "int_or_string")]
    pub order: i32,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
}

#[derive(Serialize)]
struct ListRequest<'a> {
    prefix: &'a str,
    limit: u32,
    offset: u32,
}

const DEFAULT_LIST_LIMIT: u32 = 10000;

impl StorageClient {
    pub fn new(base_url: &str, api_key: &str) -> io::Result<StorageClient> {
        let mut headers = HeaderMap::new();
        let key_value = HeaderValue::from_str(api_key)
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Invalid storage api key: {}", e)))?;
        headers.insert("apikey", key_value);
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|e| io::Error::new(ErrorKind::InvalidInput, format!("Invalid storage api key: {}", e)))?;
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| io::Error::new(ErrorKind::Other, format!("Error building storage client: {}", e)))?;

        Ok(StorageClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists the immediate entries of a folder in the image bucket. One
    /// round-trip; failures are logged and degrade to an empty listing so
    /// the page renders "no content" instead of an error.
    pub async fn list_folder(&self, folder: &str, limit: Option<u32>) -> Vec<ObjectEntry> {
        let url = format!("{}/storage/v1/object/list/{}", self.base_url, IMAGE_BUCKET);
        let body = ListRequest {
            prefix: folder,
            limit: limit.unwrap_or(DEFAULT_LIST_LIMIT),
            offset: 0,
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error listing folder '{}': {}", folder, e);
                return vec![];
            }
        };

        match response.error_for_status() {
            Ok(response) => match response.json::<Vec<ObjectEntry>>().await {
                Ok(entries) => entries,
                Err(e) => {
                    error!("Error decoding listing of folder '{}': {}", folder, e);
                    vec![]
                }
            },
            Err(e) => {
                error!("Error listing folder '{}': {}", folder, e);
                vec![]
            }
        }
    }

    /// Fetches all rows of the albums table. Rows that cannot be coerced
    /// into an AlbumRecord are logged and dropped; a failed request
    /// degrades to an empty list.
    pub async fn fetch_albums(&self) -> Vec<AlbumRecord> {
        let url = format!("{}/rest/v1/albums?select=name,path,year,order,thumbnail,emoji", self.base_url);

        let response = match self.client.get(&url).send().await {
            Ok(response) => response,
            Err(e) => {
                error!("Error querying albums table: {}", e);
                return vec![];
            }
        };

        let rows: Vec<serde_json::Value> = match response.error_for_status() {
            Ok(response) => match response.json().await {
                Ok(rows) => rows,
                Err(e) => {
                    error!("Error decoding albums table response: {}", e);
                    return vec![];
                }
            },
            Err(e) => {
                error!("Error querying albums table: {}", e);
                return vec![];
            }
        };

        let mut albums = vec![];
        for row in rows {
            match serde_json::from_value::<AlbumRecord>(row) {
                Ok(album) => albums.push(album),
                Err(e) => error!("Dropping malformed album row: {}", e),
            }
        }
        albums
    }

    /// Downloads the raw bytes of one object. Only the placeholder
    /// generator calls this, and it handles per-file failures itself, so
    /// errors propagate here instead of degrading.
    pub async fn download(&self, path: &str) -> io::Result<Vec<u8>> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, IMAGE_BUCKET, path);

        let response = self.client.get(&url).send().await
            .and_then(|response| response.error_for_status())
            .map_err(|e| io::Error::new(ErrorKind::Other, format!("Error downloading '{}': {}", path, e)))?;

        let bytes = response.bytes().await
            .map_err(|e| io::Error::new(ErrorKind::Other, format!("Error reading body of '{}': {}", path, e)))?;

        Ok(bytes.to_vec())
    }
}

/// The storage folder of an album is the third segment of its stored
/// `path` (e.g. "photos/albums/bogota2023" -> "bogota2023"). Malformed
/// paths yield None and the album is dropped from the listing.
pub fn album_folder(path: &str) -> Option<&str> {
    let segment = path.split('/').nth(2)?;
    if segment.is_empty() {
        return None;
    }
    Some(segment)
}

fn int_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => i32::try_from(n).map_err(DeError::custom),
        IntOrString::Str(s) => s.trim().parse::<i32>().map_err(DeError::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_folder() {
        assert_eq!(album_folder("photos/albums/bogota2023"), Some("bogota2023"));
        assert_eq!(album_folder("photos/albums/bogota2023/extra"), Some("bogota2023"));
        assert_eq!(album_folder("photos/albums"), None);
        assert_eq!(album_folder("a//"), None);
    }

    #[test]
    fn test_album_record_coercion() {
        let row = serde_json::json!({
            "name": "Bogota",
            "path": "photos/albums/bogota2023",
            "year": "2023",
            "order": 4,
        });
        let album: AlbumRecord = serde_json::from_value(row).unwrap();
        assert_eq!(album.year, 2023);
        assert_eq!(album.order, 4);
        assert!(album.thumbnail.is_none());

        let bad = serde_json::json!({
            "name": "Bogota",
            "path": "photos/albums/bogota2023",
            "year": "twenty-three",
            "order": 4,
        });
        assert!(serde_json::from_value::<AlbumRecord>(bad).is_err());
    }

    #[test]
    fn test_folder_entries_have_no_metadata() {
        let raw = r#"[
            {"id": null, "name": "bogota2023", "metadata": null},
            {"id": "3f2a", "name": "img1.jpg", "metadata": {"size": 12345}}
        ]"#;
        let entries: Vec<ObjectEntry> = serde_json::from_str(raw).unwrap();
        assert!(entries[0].is_folder());
        assert!(!entries[1].is_folder());
    }
}
