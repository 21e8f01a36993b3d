use std::collections::VecDeque;
use std::io::{Cursor, ErrorKind};
use std::io;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use spdlog::{error, info, warn};

use crate::placeholders::{PlaceholderMap, PlaceholderRecord};
use crate::storage::StorageClient;

/// The storage service drops a marker file into otherwise-empty folders;
/// it is not an image and never gets a placeholder.
pub const EMPTY_FOLDER_MARKER: &str = ".emptyFolderPlaceholder";

/// Edge length of the blur thumbnail.
const PLACEHOLDER_SIZE: u32 = 16;

/// Dimensions recorded when the probe cannot read the image header.
const METADATA_FALLBACK: (u32, u32) = (600, 400);

pub struct RunStats {
    pub discovered: usize,
    pub generated: usize,
    pub total: usize,
}

/// Walks the whole bucket from the root and returns every file as a full
/// slash-joined path. Entries without metadata are folders and are queued
/// for their own listing; the empty-folder marker is skipped.
pub async fn list_all_files(client: &StorageClient) -> Vec<String> {
    let mut files = vec![];
    let mut pending: VecDeque<String> = VecDeque::from([String::new()]);

    while let Some(prefix) = pending.pop_front() {
        for entry in client.list_folder(&prefix, None).await {
            if entry.name == EMPTY_FOLDER_MARKER {
                continue;
            }
            let full_path = join_prefix(&prefix, &entry.name);
            if entry.is_folder() {
                pending.push_back(full_path);
            } else {
                files.push(full_path);
            }
        }
    }

    files
}

/// One generator run: list the bucket, generate placeholders for files the
/// sidecar does not know yet, write the sidecar back in a single flush.
/// Existing entries are never regenerated. Per-file failures are logged
/// and processing continues with the next file.
pub async fn run(client: &StorageClient, sidecar_path: &Path) -> io::Result<RunStats> {
    info!("Listing all files in the bucket...");
    let all_files = list_all_files(client).await;

    if all_files.is_empty() {
        info!("No files found in the bucket");
        return Ok(RunStats { discovered: 0, generated: 0, total: 0 });
    }
    info!("Found {} files total", all_files.len());

    let mut placeholders = match PlaceholderMap::load(sidecar_path) {
        Ok(map) => {
            info!("Loaded {} existing placeholders", map.len());
            map
        }
        Err(e) => {
            warn!("{}. Starting fresh", e);
            PlaceholderMap::default()
        }
    };

    let mut generated = 0;
    for file_path in &all_files {
        if placeholders.contains(file_path) {
            continue;
        }

        let bytes = match client.download(file_path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error downloading {}: {}", file_path, e);
                continue;
            }
        };

        match make_placeholder(&bytes) {
            Ok(record) => {
                info!("Generated placeholder for {} ({}x{})", file_path, record.width, record.height);
                placeholders.insert(file_path.clone(), record);
                generated += 1;
            }
            Err(e) => error!("Error processing {}: {}", file_path, e),
        }
    }

    placeholders.save(sidecar_path)?;

    Ok(RunStats {
        discovered: all_files.len(),
        generated,
        total: placeholders.len(),
    })
}

/// Downsamples one image to a 16x16 data URI and records its intrinsic
/// dimensions. PNG stays PNG; every other decodable format is re-encoded
/// as JPEG, which is what the data-URI mime reflects.
pub fn make_placeholder(bytes: &[u8]) -> io::Result<PlaceholderRecord> {
    let (width, height) = match image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()
    {
        Ok(dimensions) => dimensions,
        Err(_) => METADATA_FALLBACK,
    };

    let img = image::load_from_memory(bytes)
        .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Not a decodable image: {}", e)))?;
    let tiny = img.resize_exact(PLACEHOLDER_SIZE, PLACEHOLDER_SIZE, FilterType::Triangle);

    let source_format = image::guess_format(bytes).unwrap_or(ImageFormat::Jpeg);
    let mut encoded = Cursor::new(Vec::new());
    let mime = match source_format {
        ImageFormat::Png => {
            tiny.write_to(&mut encoded, ImageFormat::Png)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Error encoding placeholder: {}", e)))?;
            "image/png"
        }
        _ => {
            // The JPEG encoder rejects alpha channels.
            DynamicImage::ImageRgb8(tiny.to_rgb8())
                .write_to(&mut encoded, ImageFormat::Jpeg)
                .map_err(|e| io::Error::new(ErrorKind::InvalidData, format!("Error encoding placeholder: {}", e)))?;
            "image/jpeg"
        }
    };

    let base64_data = general_purpose::STANDARD.encode(encoded.get_ref());

    Ok(PlaceholderRecord {
        placeholder: format!("data:{};base64,{}", mime, base64_data),
        width,
        height,
    })
}

fn join_prefix(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::{env, fs};

    use super::*;

    fn synthetic_png(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        });
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_join_prefix() {
        assert_eq!(join_prefix("", "bogota2023"), "bogota2023");
        assert_eq!(join_prefix("bogota2023", "img1.jpg"), "bogota2023/img1.jpg");
    }

    #[test]
    fn test_make_placeholder_from_png() {
        let bytes = synthetic_png(32, 20);
        let record = make_placeholder(&bytes).unwrap();
        assert_eq!(record.width, 32);
        assert_eq!(record.height, 20);
        assert!(record.placeholder.starts_with("data:image/png;base64,"));

        // The data URI payload must decode back into a 16x16 image.
        let payload = record.placeholder.split(',').nth(1).unwrap();
        let tiny_bytes = general_purpose::STANDARD.decode(payload).unwrap();
        let tiny = image::load_from_memory(&tiny_bytes).unwrap();
        assert_eq!((tiny.width(), tiny.height()), (16, 16));
    }

    #[test]
    fn test_make_placeholder_rejects_garbage() {
        assert!(make_placeholder(b"not an image at all").is_err());
    }

    #[test]
    fn test_sidecar_rewrite_is_idempotent() {
        let path = env::temp_dir().join(format!("folio-placegen-test-{}.json", std::process::id()));

        let mut records = BTreeMap::new();
        records.insert("bogota2023/img1.jpg".to_string(), make_placeholder(&synthetic_png(8, 8)).unwrap());
        let map = PlaceholderMap::from_records(records);
        map.save(&path).unwrap();
        let first = fs::read(&path).unwrap();

        // Reload and rewrite with no new entries: byte-identical file.
        let reloaded = PlaceholderMap::load(&path).unwrap();
        reloaded.save(&path).unwrap();
        let second = fs::read(&path).unwrap();
        assert_eq!(first, second);

        // One new file adds exactly one key and leaves the old entry as is.
        let mut grown = PlaceholderMap::load(&path).unwrap();
        grown.insert("bogota2023/img2.jpg".to_string(), make_placeholder(&synthetic_png(4, 4)).unwrap());
        grown.save(&path).unwrap();

        let final_map = PlaceholderMap::load(&path).unwrap();
        assert_eq!(final_map.len(), 2);
        assert_eq!(final_map.records().get("bogota2023/img1.jpg"),
                   map.records().get("bogota2023/img1.jpg"));

        fs::remove_file(&path).unwrap();
    }
}
