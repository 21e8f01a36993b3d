use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{fs, io};

use spdlog::warn;

use crate::post::Post;

/// Reads blog documents from the content directory. Enumeration happens on
/// every call so new posts show up without a restart.
pub struct PostStore {
    pub content_dir: PathBuf,
}

impl PostStore {
    pub fn new(content_dir: PathBuf) -> PostStore {
        PostStore { content_dir }
    }

    /// All valid posts, sorted by date descending. Documents that fail
    /// validation are logged and left out of the listing.
    pub fn all_posts(&self) -> io::Result<Vec<Post>> {
        let mut posts = vec![];
        for (slug, path) in self.list_documents()? {
            match Post::from_file(&slug, &path) {
                Ok(post) => posts.push(post),
                Err(e) => warn!("Skipping post {}: {}", path.to_str().unwrap_or(&slug), e),
            }
        }

        // Dates are YYYY-MM-DD strings, so a lexical comparison orders them.
        // sort_by is stable, which keeps equal dates in enumeration order.
        posts.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(posts)
    }

    /// Resolves a single slug. An unknown slug is a NotFound error for the
    /// page layer to turn into a not-found page.
    pub fn post(&self, slug: &str) -> io::Result<Post> {
        let path = self.content_dir.join(format!("{}.md", slug));
        if !is_valid_slug(slug) || !path.is_file() {
            return Err(io::Error::new(
                ErrorKind::NotFound, format!("No post with slug '{}'", slug)));
        }
        Post::from_file(slug, &path)
    }

    fn list_documents(&self) -> io::Result<Vec<(String, PathBuf)>> {
        let mut documents = vec![];
        let entries = fs::read_dir(self.content_dir.as_path())?;
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            if let Some(slug) = slug_from_file_name(Path::new(&file_name)) {
                documents.push((slug, entry.path()));
            }
        }
        Ok(documents)
    }
}

fn slug_from_file_name(file_name: &Path) -> Option<String> {
    let name = file_name.to_str()?;
    let slug = name.strip_suffix(".md")?;
    if slug.is_empty() {
        return None;
    }
    Some(slug.to_string())
}

fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
