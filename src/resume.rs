use std::io::ErrorKind;
use std::path::Path;
use std::{fs, io};

use serde::Deserialize;

/// Resume data for the home page, read from a TOML document so the CV
/// content lives next to the blog posts instead of inside the code.
#[derive(Deserialize, Debug)]
pub struct Resume {
    pub profile: Vec<String>,
    #[serde(default)]
    pub education: Vec<TimelineItem>,
    #[serde(default)]
    pub work: Vec<TimelineItem>,
    #[serde(default)]
    pub skills: Vec<SectionItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct TimelineItem {
    pub title: String,
    pub date: String,
    pub location: String,
    #[serde(default)]
    pub subitems: Vec<SubItem>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SubItem {
    #[serde(default)]
    pub category: Option<String>,
    pub description: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SectionItem {
    pub category: String,
    pub description: String,
}

impl Resume {
    pub fn from_file(path: &Path) -> io::Result<Resume> {
        let raw = fs::read_to_string(path)
            .map_err(|e| io::Error::new(e.kind(), format!("Error opening resume file {}: {}", path.display(), e)))?;
        Self::from_string(&raw)
    }

    pub fn from_string(raw: &str) -> io::Result<Resume> {
        toml::from_str(raw).map_err(|e| io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing resume file: {}", e)))
    }
}
