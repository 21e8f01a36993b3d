use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use serde::{Deserialize, Serialize};
use spdlog::warn;

/// Dimensions reported when an image has no sidecar entry. Good enough
/// for the viewer to reserve space before the real image loads.
pub const FALLBACK_WIDTH: u32 = 800;
pub const FALLBACK_HEIGHT: u32 = 600;

/// One cached blur placeholder: a 16x16 downsample as a data URI plus the
/// intrinsic size of the original image.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlaceholderRecord {
    pub placeholder: String,
    pub width: u32,
    pub height: u32,
}

/// What the presentation layer gets back from a lookup. Always populated;
/// a miss carries the fallback dimensions and an empty data URI.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub placeholder: String,
    pub width: u32,
    pub height: u32,
}

/// The sidecar file produced by the placegen tool, keyed by
/// "{album}/{file}". A BTreeMap keeps the serialized file diff-friendly.
#[derive(Default, Debug)]
pub struct PlaceholderMap {
    records: BTreeMap<String, PlaceholderRecord>,
}

impl PlaceholderMap {
    pub fn from_records(records: BTreeMap<String, PlaceholderRecord>) -> PlaceholderMap {
        PlaceholderMap { records }
    }

    /// Loads the sidecar. A missing file is normal on a fresh checkout and
    /// yields an empty map; a corrupt file is an error for the caller to
    /// decide on (the server degrades, the generator starts fresh).
    pub fn load(path: &Path) -> io::Result<PlaceholderMap> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No placeholder sidecar at {}. Serving without blur data", path.display());
                return Ok(PlaceholderMap::default());
            }
            Err(e) => return Err(e),
        };

        let records: BTreeMap<String, PlaceholderRecord> = serde_json::from_str(&raw)
            .map_err(|e| io::Error::new(
                ErrorKind::InvalidData,
                format!("Error parsing placeholder sidecar {}: {}", path.display(), e)))?;

        Ok(PlaceholderMap { records })
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let raw = serde_json::to_string_pretty(&self.records)
            .map_err(|e| io::Error::new(ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, raw)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.records.contains_key(key)
    }

    pub fn insert(&mut self, key: String, record: PlaceholderRecord) {
        self.records.insert(key, record);
    }

    pub fn records(&self) -> &BTreeMap<String, PlaceholderRecord> {
        &self.records
    }

    /// Pure lookup by exact "{album}/{name}" key. An absent key yields the
    /// documented fallback, never an error.
    pub fn lookup(&self, album: &str, name: &str) -> ImageInfo {
        let key = format!("{}/{}", album, name);
        match self.records.get(&key) {
            Some(record) => ImageInfo {
                placeholder: record.placeholder.clone(),
                width: record.width,
                height: record.height,
            },
            None => ImageInfo {
                placeholder: String::new(),
                width: FALLBACK_WIDTH,
                height: FALLBACK_HEIGHT,
            },
        }
    }
}
