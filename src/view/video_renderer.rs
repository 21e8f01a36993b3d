use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::videos::Video;

#[derive(ramhorns::Content)]
struct VideoPage<'a> {
    videos: Vec<VideoItem<'a>>,
    has_videos: bool,
}

#[derive(ramhorns::Content)]
struct VideoItem<'a> {
    link: String,
    title: &'a str,
    description: &'a str,
    thumbnail: &'a str,
}

pub struct VideoRenderer<'a> {
    pub template: Template<'a>,
}

impl VideoRenderer<'_> {
    pub fn new(videos_tpl_src: &str) -> io::Result<VideoRenderer> {
        let template = match Template::new(videos_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing video template: {}", e)));
            }
        };

        Ok(VideoRenderer {
            template,
        })
    }

    pub fn render(&self, videos: &[Video]) -> String {
        let videos: Vec<VideoItem> = videos.iter().map(|video| VideoItem {
            link: format!("https://www.youtube.com/watch?v={}", video.id),
            title: video.title.as_str(),
            description: video.description.as_str(),
            thumbnail: video.thumbnail.as_str(),
        }).collect();

        self.template.render(&VideoPage {
            has_videos: !videos.is_empty(),
            videos,
        })
    }
}
