use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;
use spdlog::warn;

#[derive(Deserialize)]
pub struct Site {
    pub title: String,
    pub author: String,
}

#[derive(Deserialize)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
    pub content_dir: PathBuf,
    pub resume_file: PathBuf,
    pub placeholder_file: PathBuf,
}

#[derive(Deserialize)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Copy, Clone)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize)]
pub struct Config {
    pub site: Site,
    pub paths: Paths,
    pub server: Server,
    pub log: Option<Log>,
}

/// Credentials and service endpoints come from the environment, not from
/// folio.toml, so the config file can be committed alongside the site data.
#[derive(Clone, Default)]
pub struct ServiceEnv {
    pub storage_url: Option<String>,
    pub storage_key: Option<String>,
    pub video_api_key: Option<String>,
    pub video_channel_id: Option<String>,
    pub cdn_base_url: Option<String>,
}

impl ServiceEnv {
    pub fn from_env() -> ServiceEnv {
        ServiceEnv {
            storage_url: read_var("STORAGE_API_URL"),
            storage_key: read_var("STORAGE_API_KEY"),
            video_api_key: read_var("VIDEO_API_KEY"),
            video_channel_id: read_var("VIDEO_CHANNEL_ID"),
            cdn_base_url: read_var("CDN_BASE_URL"),
        }
    }
}

fn read_var(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Some(value),
        _ => {
            warn!("{} is not set. Dependent pages will render empty", name);
            None
        }
    }
}

fn parse_path(path: PathBuf) -> PathBuf {
    if path.starts_with("${exe_dir}") {
        let cur_exe = env::current_exe().unwrap();
        let exe_dir = cur_exe.parent().unwrap().to_str().unwrap();
        let str_path = path.to_str().unwrap();
        PathBuf::from(str_path.replace("${exe_dir}", exe_dir))
    } else {
        path
    }
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.to_str().unwrap(), e))),
    };

    let mut cfg: Config = match toml::from_str::<Config>(cfg_content.as_str()) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir),
        public_dir: parse_path(cfg.paths.public_dir),
        content_dir: parse_path(cfg.paths.content_dir),
        resume_file: parse_path(cfg.paths.resume_file),
        placeholder_file: parse_path(cfg.paths.placeholder_file),
    };

    Ok(cfg)
}
