use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::albums::YearGroup;
use crate::placeholders::PlaceholderMap;

#[derive(ramhorns::Content)]
struct AlbumListPage {
    years: Vec<YearView>,
    has_albums: bool,
}

#[derive(ramhorns::Content)]
struct YearView {
    year: i32,
    albums: Vec<AlbumTile>,
}

#[derive(ramhorns::Content)]
struct AlbumTile {
    name: String,
    link: String,
    has_cover: bool,
    cover_url: String,
    blur_data: String,
}

pub struct AlbumListRenderer<'a> {
    pub template: Template<'a>,
}

impl AlbumListRenderer<'_> {
    pub fn new(albums_tpl_src: &str) -> io::Result<AlbumListRenderer> {
        let template = match Template::new(albums_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing album list template: {}", e)));
            }
        };

        Ok(AlbumListRenderer {
            template,
        })
    }

    pub fn render(&self, groups: &[YearGroup], placeholders: &PlaceholderMap, cdn_base: &str) -> String {
        let years: Vec<YearView> = groups.iter().map(|group| YearView {
            year: group.year,
            albums: group.albums.iter().map(|album| {
                match &album.cover {
                    Some(cover) => {
                        let info = placeholders.lookup(&album.folder, &cover.name);
                        AlbumTile {
                            name: album.name.clone(),
                            link: format!("/photos/{}/", album.folder),
                            has_cover: true,
                            cover_url: format!("{}/{}/{}", cdn_base, album.folder, cover.name),
                            blur_data: info.placeholder,
                        }
                    }
                    None => AlbumTile {
                        name: album.name.clone(),
                        link: format!("/photos/{}/", album.folder),
                        has_cover: false,
                        cover_url: String::new(),
                        blur_data: String::new(),
                    },
                }
            }).collect(),
        }).collect();

        self.template.render(&AlbumListPage {
            has_albums: !years.is_empty(),
            years,
        })
    }
}
