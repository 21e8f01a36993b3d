use lazy_static::lazy_static;
use regex::Regex;

use crate::storage::ObjectEntry;

/// An album joined with its storage folder and cover entry, ready for
/// grouping. `cover` is the first file the service listed for the folder,
/// or None for an empty album.
#[derive(Debug, Clone)]
pub struct AlbumEntry {
    pub name: String,
    pub folder: String,
    pub year: i32,
    pub order: i32,
    pub cover: Option<ObjectEntry>,
}

#[derive(Debug)]
pub struct YearGroup {
    pub year: i32,
    pub albums: Vec<AlbumEntry>,
}

/// Groups albums by year for the listing page: years descending, albums
/// within a year by their `order` field descending. Deterministic for the
/// same input rows.
pub fn group_by_year(mut albums: Vec<AlbumEntry>) -> Vec<YearGroup> {
    albums.sort_by(|a, b| b.year.cmp(&a.year).then(b.order.cmp(&a.order)));

    let mut groups: Vec<YearGroup> = vec![];
    for album in albums {
        match groups.last_mut() {
            Some(group) if group.year == album.year => group.albums.push(album),
            _ => groups.push(YearGroup { year: album.year, albums: vec![album] }),
        }
    }
    groups
}

/// Orders an album's files by the first run of digits in each name, so
/// "img10.jpg" comes after "img2.jpg". Names without digits sort as 0.
/// The sort is stable, which keeps the service order for ties.
pub fn sort_images_numeric(images: &mut [ObjectEntry]) {
    images.sort_by_key(|image| filename_number(&image.name));
}

fn filename_number(name: &str) -> u64 {
    lazy_static! {
        static ref DIGITS_REGEX: Regex = Regex::new(r"\d+").unwrap();
    }
    DIGITS_REGEX.find(name)
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .unwrap_or(0)
}

/// Turns a folder name like "bogota2023" into a display title
/// "Bogota 2023". Names that don't match the letters-then-digits shape
/// pass through unchanged.
pub fn format_album_title(folder: &str) -> String {
    lazy_static! {
        static ref TITLE_REGEX: Regex = Regex::new(r"([a-zA-Z]+)(\d+)").unwrap();
    }
    let Some(caps) = TITLE_REGEX.captures(folder) else {
        return folder.to_string();
    };

    let city = &caps[1];
    let year = &caps[2];
    let mut chars = city.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{} {}", capitalized, year)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> ObjectEntry {
        ObjectEntry {
            id: Some(name.to_string()),
            name: name.to_string(),
            metadata: Some(serde_json::json!({"size": 1})),
        }
    }

    fn album(name: &str, year: i32, order: i32) -> AlbumEntry {
        AlbumEntry {
            name: name.to_string(),
            folder: name.to_lowercase(),
            year,
            order,
            cover: None,
        }
    }

    #[test]
    fn test_numeric_image_sort() {
        let mut images = vec![entry("img2.jpg"), entry("img1.jpg"), entry("img10.jpg")];
        sort_images_numeric(&mut images);
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["img1.jpg", "img2.jpg", "img10.jpg"]);
    }

    #[test]
    fn test_numeric_sort_without_digits_is_stable() {
        let mut images = vec![entry("cover.jpg"), entry("closing.jpg"), entry("img1.jpg")];
        sort_images_numeric(&mut images);
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        // No digits sorts as 0, before img1, keeping relative order.
        assert_eq!(names, ["cover.jpg", "closing.jpg", "img1.jpg"]);
    }

    #[test]
    fn test_group_by_year() {
        let groups = group_by_year(vec![
            album("Bogota", 2023, 2),
            album("Oxford", 2024, 1),
            album("Cartagena", 2023, 5),
            album("Maastricht", 2024, 3),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].year, 2024);
        let names: Vec<&str> = groups[0].albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Maastricht", "Oxford"]);

        assert_eq!(groups[1].year, 2023);
        let names: Vec<&str> = groups[1].albums.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["Cartagena", "Bogota"]);
    }

    #[test]
    fn test_group_by_year_deterministic() {
        let rows = vec![
            album("A", 2022, 1),
            album("B", 2023, 1),
            album("C", 2022, 2),
        ];
        let first: Vec<i32> = group_by_year(rows.clone()).iter().map(|g| g.year).collect();
        let second: Vec<i32> = group_by_year(rows).iter().map(|g| g.year).collect();
        assert_eq!(first, vec![2023, 2022]);
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_album_title() {
        assert_eq!(format_album_title("bogota2023"), "Bogota 2023");
        assert_eq!(format_album_title("oxford2024"), "Oxford 2024");
        assert_eq!(format_album_title("no-year"), "no-year");
    }
}
