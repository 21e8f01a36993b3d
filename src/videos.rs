use serde::Deserialize;
use spdlog::error;

const SEARCH_API: &str = "https://www.googleapis.com/youtube/v3/search";
const MAX_RESULTS: u32 = 50;

/// A video fetched live from the platform. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub thumbnail: String,
}

/// Thin adapter over the video platform's channel search API.
#[derive(Clone)]
pub struct VideoClient {
    client: reqwest::Client,
    api_key: String,
    channel_id: String,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: Option<ItemId>,
    snippet: Option<Snippet>,
}

#[derive(Deserialize)]
struct ItemId {
    kind: Option<String>,
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Deserialize)]
struct Snippet {
    title: Option<String>,
    description: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Deserialize)]
struct Thumbnails {
    medium: Option<Thumbnail>,
}

#[derive(Deserialize)]
struct Thumbnail {
    url: Option<String>,
}

impl VideoClient {
    pub fn new(api_key: &str, channel_id: &str) -> VideoClient {
        VideoClient {
            client: reqwest::Client::new(),
            api_key: api_key.to_string(),
            channel_id: channel_id.to_string(),
        }
    }

    /// Up to 50 most recent uploads of the configured channel. Search
    /// results also contain playlists and channels; only items whose kind
    /// marks them as a video survive. Any upstream failure degrades to an
    /// empty list, which the page renders as an empty grid.
    pub async fn recent_videos(&self) -> Vec<Video> {
        let max_results = MAX_RESULTS.to_string();
        let response = match self.client.get(SEARCH_API)
            .query(&[
                ("key", self.api_key.as_str()),
                ("channelId", self.channel_id.as_str()),
                ("part", "snippet"),
                ("order", "date"),
                ("maxResults", max_results.as_str()),
            ])
            .send()
            .await
            .and_then(|response| response.error_for_status())
        {
            Ok(response) => response,
            Err(e) => {
                error!("Error fetching channel videos: {}", e);
                return vec![];
            }
        };

        let search: SearchResponse = match response.json().await {
            Ok(search) => search,
            Err(e) => {
                error!("Error decoding video search response: {}", e);
                return vec![];
            }
        };

        project_videos(search)
    }
}

fn project_videos(search: SearchResponse) -> Vec<Video> {
    let mut videos = vec![];
    for item in search.items {
        let Some(id) = item.id else { continue };
        if id.kind.as_deref() != Some("youtube#video") {
            continue;
        }
        let Some(video_id) = id.video_id else { continue };
        let snippet = item.snippet;

        let field = |value: Option<String>| unescape_entities(&value.unwrap_or_default());
        let (title, description, thumbnail) = match snippet {
            Some(snippet) => {
                let thumbnail = snippet.thumbnails
                    .and_then(|t| t.medium)
                    .and_then(|t| t.url)
                    .unwrap_or_default();
                (field(snippet.title), field(snippet.description), thumbnail)
            }
            None => (String::new(), String::new(), String::new()),
        };

        videos.push(Video {
            id: video_id,
            title,
            description,
            thumbnail,
        });
    }
    videos
}

// The search API escapes apostrophes in titles and descriptions.
fn unescape_entities(text: &str) -> String {
    text.replace("&#39;", "'")
}
