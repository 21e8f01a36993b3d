use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::placeholders::PlaceholderMap;
use crate::storage::ObjectEntry;
use crate::viewer::fit_within;

// Grid thumbnails never need intrinsic-resolution boxes; the lightbox
// gets the real dimensions through viewer_data.
const THUMB_MAX_WIDTH: u32 = 640;
const THUMB_MAX_HEIGHT: u32 = 640;

#[derive(ramhorns::Content)]
struct AlbumPage {
    album_title: String,
    has_images: bool,
    images: Vec<ImageView>,
    /// JSON for public/viewer.js, embedded in a script tag. Same order as
    /// the grid, so the lightbox index matches the clicked thumbnail.
    viewer_data: String,
}

#[derive(ramhorns::Content)]
struct ImageView {
    index: usize,
    url: String,
    name: String,
    blur_data: String,
    width: u32,
    height: u32,
}

pub struct AlbumRenderer<'a> {
    pub template: Template<'a>,
}

impl AlbumRenderer<'_> {
    pub fn new(album_tpl_src: &str) -> io::Result<AlbumRenderer> {
        let template = match Template::new(album_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing album template: {}", e)));
            }
        };

        Ok(AlbumRenderer {
            template,
        })
    }

    pub fn render(&self, album_title: &str, folder: &str, images: &[ObjectEntry],
                  placeholders: &PlaceholderMap, cdn_base: &str) -> String {
        let mut views = Vec::with_capacity(images.len());
        let mut viewer_images = Vec::with_capacity(images.len());

        for (index, image) in images.iter().enumerate() {
            let info = placeholders.lookup(folder, &image.name);
            let url = format!("{}/{}/{}", cdn_base, folder, image.name);

            viewer_images.push(serde_json::json!({
                "url": url,
                "name": image.name,
                "placeholder": info.placeholder,
                "width": info.width,
                "height": info.height,
            }));

            let (thumb_w, thumb_h) = fit_within(info.width, info.height, THUMB_MAX_WIDTH, THUMB_MAX_HEIGHT);
            views.push(ImageView {
                index,
                url,
                name: image.name.clone(),
                blur_data: info.placeholder,
                width: thumb_w,
                height: thumb_h,
            });
        }

        let viewer_data = serde_json::to_string(&viewer_images).unwrap_or_else(|_| "[]".to_string());

        self.template.render(&AlbumPage {
            album_title: album_title.to_string(),
            has_images: !views.is_empty(),
            images: views,
            viewer_data,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::placeholders::PlaceholderRecord;

    use super::*;

    fn image(name: &str) -> ObjectEntry {
        ObjectEntry {
            id: Some(name.to_string()),
            name: name.to_string(),
            metadata: Some(serde_json::json!({"size": 1})),
        }
    }

    #[test]
    fn render_album() {
        let template_src = "TITLE=[{{album_title}}]{{#images}}[{{index}}|{{url}}|{{width}}x{{height}}]{{/images}}";
        let renderer = AlbumRenderer::new(template_src).unwrap();

        let mut records = BTreeMap::new();
        records.insert("bogota2023/img1.jpg".to_string(), PlaceholderRecord {
            placeholder: "data:image/jpeg;base64,XYZ".to_string(),
            width: 4032,
            height: 3024,
        });
        let placeholders = PlaceholderMap::from_records(records);

        let images = vec![image("img1.jpg"), image("img2.jpg")];
        let res = renderer.render("Bogota 2023", "bogota2023", &images, &placeholders, "https://cdn.example");

        assert!(res.contains("TITLE=[Bogota 2023]"));
        // Grid dimensions are clamped to the thumbnail box.
        assert!(res.contains("[0|https://cdn.example/bogota2023/img1.jpg|640x480]"));
        // img2 has no sidecar entry; the 800x600 fallback fits to 640x480.
        assert!(res.contains("[1|https://cdn.example/bogota2023/img2.jpg|640x480]"));
    }

    #[test]
    fn render_empty_album_message() {
        let template_src = "{{^has_images}}This album does not exist.{{/has_images}}";
        let renderer = AlbumRenderer::new(template_src).unwrap();
        let res = renderer.render("Nowhere 2020", "nowhere2020", &[], &PlaceholderMap::default(), "https://cdn.example");
        assert_eq!(res, "This album does not exist.");
    }

    #[test]
    fn viewer_data_is_json() {
        let template_src = "{{{viewer_data}}}";
        let renderer = AlbumRenderer::new(template_src).unwrap();
        let res = renderer.render("Bogota 2023", "bogota2023", &[image("img1.jpg")],
                                  &PlaceholderMap::default(), "https://cdn.example");
        let parsed: Vec<serde_json::Value> = serde_json::from_str(&res).unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["name"], "img1.jpg");
        assert_eq!(parsed[0]["width"], 800);
    }
}
