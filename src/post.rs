use std::fmt::Formatter;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::{fmt, fs, io};

use chrono::NaiveDate;
use markdown::Options;
use serde::Deserialize;

/// A blog document after the explicit parse step. The slug comes from the
/// file name, everything else from the front-matter block and the body.
/// `date` stays a `YYYY-MM-DD` string so listings can sort lexically.
#[derive(Debug)]
pub struct Post {
    pub slug: String,
    pub title: String,
    pub date: String,
    pub description: String,
    pub body: String,
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "slug={}, date={}\ntitle={}\ndescription={}",
               self.slug, self.date, self.title, self.description)
    }
}

#[derive(Deserialize)]
struct FrontMatter {
    title: Option<String>,
    date: Option<String>,
    description: Option<String>,
}

const FRONT_MATTER_FENCE: &str = "+++";

/// Example of post (content/first-post.md):
/// +++
/// title = "My first post"
/// date = "2024-11-02"
/// description = "Hello from the new blog"
/// +++
///
/// # Heading
/// Body in GFM markdown...
impl Post {
    pub fn from_file(slug: &str, file_path: &PathBuf) -> io::Result<Post> {
        let raw = fs::read_to_string(file_path)?;
        Self::from_string(slug, &raw)
    }

    pub fn from_string(slug: &str, raw: &str) -> io::Result<Post> {
        let (front_matter, body) = split_front_matter(slug, raw)?;

        let meta: FrontMatter = match toml::from_str(front_matter) {
            Ok(meta) => meta,
            Err(e) => return Err(invalid_post(slug, &format!("bad front matter: {}", e))),
        };

        let title = required_field(slug, "title", meta.title)?;
        let date = required_field(slug, "date", meta.date)?;
        let description = required_field(slug, "description", meta.description)?;

        if NaiveDate::parse_from_str(&date, "%Y-%m-%d").is_err() {
            return Err(invalid_post(slug, &format!("date '{}' is not YYYY-MM-DD", date)));
        }

        Ok(Post {
            slug: slug.to_string(),
            title,
            date,
            description,
            body: body.to_string(),
        })
    }

    pub fn render_body(&self) -> io::Result<String> {
        match markdown::to_html_with_options(self.body.as_str(), &Options::gfm()) {
            Ok(html) => Ok(html),
            Err(e) => Err(io::Error::new(ErrorKind::InvalidInput, e.reason.as_str())),
        }
    }
}

/// Splits a raw document into the text between the two `+++` fences and the
/// body after the closing fence. Leading blank lines before the opening
/// fence are tolerated.
fn split_front_matter<'a>(slug: &str, raw: &'a str) -> io::Result<(&'a str, &'a str)> {
    let after_blank = raw.trim_start_matches(['\n', '\r', ' ', '\t']);
    let Some(rest) = after_blank.strip_prefix(FRONT_MATTER_FENCE) else {
        return Err(invalid_post(slug, "missing front matter block"));
    };

    let Some(end) = rest.find(&format!("\n{}", FRONT_MATTER_FENCE)) else {
        return Err(invalid_post(slug, "front matter block is not closed"));
    };

    let front_matter = &rest[..end];
    let body = &rest[end + 1 + FRONT_MATTER_FENCE.len()..];
    Ok((front_matter, body.trim_start_matches(['\n', '\r'])))
}

fn required_field(slug: &str, name: &str, value: Option<String>) -> io::Result<String> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(invalid_post(slug, &format!("missing required field '{}'", name))),
    }
}

fn invalid_post(slug: &str, reason: &str) -> io::Error {
    io::Error::new(ErrorKind::InvalidData, format!("Invalid post '{}': {}", slug, reason))
}

#[cfg(test)]
mod tests {
    use crate::test_data::POST_DATA_MD;

    use super::*;

    #[test]
    fn test_from_string() {
        let post = Post::from_string("first-post", POST_DATA_MD).unwrap();
        assert_eq!(post.slug, "first-post");
        assert_eq!(post.title, "My first post");
        assert_eq!(post.date, "2024-11-02");
        assert_eq!(post.description, "Hello from the new blog");
        assert!(post.body.starts_with("# Hello"));
    }

    #[test]
    fn test_render_body() {
        let post = Post::from_string("first-post", POST_DATA_MD).unwrap();
        let html = post.render_body().unwrap();
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>markdown</em>"));
    }

    #[test]
    fn test_missing_field_is_named() {
        let raw = r#"+++
title = "No date here"
description = "desc"
+++
body
"#;
        let err = Post::from_string("broken", raw).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().contains("missing required field 'date'"));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn test_bad_date_rejected() {
        let raw = r#"+++
title = "t"
date = "02/11/2024"
description = "d"
+++
body
"#;
        let err = Post::from_string("baddate", raw).unwrap_err();
        assert!(err.to_string().contains("not YYYY-MM-DD"));
    }

    #[test]
    fn test_missing_front_matter() {
        let err = Post::from_string("plain", "# Just markdown\n").unwrap_err();
        assert!(err.to_string().contains("missing front matter"));
    }

    #[test]
    fn test_unclosed_front_matter() {
        let err = Post::from_string("open", "+++\ntitle = \"t\"\n").unwrap_err();
        assert!(err.to_string().contains("not closed"));
    }
}
