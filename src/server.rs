use std::path::Path;
use std::sync::{Arc, Mutex};
use std::{fs, io};

use ntex::web;
use ntex_files::NamedFile;
use spdlog::{info, warn};

use crate::albums::{format_album_title, group_by_year, sort_images_numeric, AlbumEntry};
use crate::config::{Config, ServiceEnv};
use crate::placeholders::PlaceholderMap;
use crate::post_store::PostStore;
use crate::resume::Resume;
use crate::storage::{album_folder, StorageClient};
use crate::videos::VideoClient;
use crate::view::album_list_renderer::AlbumListRenderer;
use crate::view::album_renderer::AlbumRenderer;
use crate::view::home_renderer::HomeRenderer;
use crate::view::not_found_renderer::NotFoundRenderer;
use crate::view::post_list_renderer::PostListRenderer;
use crate::view::post_renderer::PostRenderer;
use crate::view::video_renderer::VideoRenderer;

struct AppState {
    config: Config,
    resume: Resume,
    posts: PostStore,
    placeholders: PlaceholderMap,
    storage: Option<StorageClient>,
    videos: Option<VideoClient>,
    cdn_base: String,
}

fn load_template(template_dir: &Path, name: &str) -> io::Result<String> {
    fs::read_to_string(template_dir.join(name))
}

fn html_ok(body: String) -> web::HttpResponse {
    web::HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn html_not_found(body: String) -> web::HttpResponse {
    web::HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn render_not_found(template_dir: &Path, message: &str, back_link: &str, back_label: &str) -> io::Result<String> {
    let template_src = load_template(template_dir, "not_found.tpl")?;
    let renderer = NotFoundRenderer::new(&template_src)?;
    Ok(renderer.render(message, back_link, back_label))
}

// Begin: Redirect region --------
#[web::get("/blog/{slug}")]
async fn blog_view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", format!("/blog/{}/", path.into_inner()))
        .content_type("text/html; charset=utf-8")
        .finish()
}

#[web::get("/photos/{album}")]
async fn album_view_wo_slash(path: web::types::Path<String>) -> web::HttpResponse {
    web::HttpResponse::TemporaryRedirect()
        .header("Location", format!("/photos/{}/", path.into_inner()))
        .content_type("text/html; charset=utf-8")
        .finish()
}
// End: Redirect region --------

#[web::get("/")]
async fn index(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let template_dir = &state.config.paths.template_dir;

    let rendered = load_template(template_dir, "home.tpl")
        .and_then(|src| HomeRenderer::new(&src)
            .map(|renderer| renderer.render(&state.config.site.title, &state.resume)));

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering home page: {}", e)),
    }
}

#[web::get("/blog")]
async fn blog_list(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let template_dir = &state.config.paths.template_dir;

    let posts = match state.posts.all_posts() {
        Ok(posts) => posts,
        Err(e) => return web::HttpResponse::InternalServerError()
            .body(format!("Error listing posts: {}", e)),
    };

    let rendered = load_template(template_dir, "postlist.tpl")
        .and_then(|src| PostListRenderer::new(&src).map(|renderer| renderer.render(&posts)));

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering post list: {}", e)),
    }
}

#[web::get("/blog/{slug}/")]
async fn blog_view(path: web::types::Path<String>, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let state = state.lock().unwrap();
    let template_dir = &state.config.paths.template_dir;
    let slug = path.into_inner();

    let rendered = state.posts.post(&slug).and_then(|post| {
        let body = post.render_body()?;
        let template_src = load_template(template_dir, "post.tpl")?;
        let renderer = PostRenderer::new(&template_src)?;
        Ok(renderer.render(&post, &body))
    });

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => {
            // Unknown or unreadable slugs get the themed not-found page,
            // never a server error.
            warn!("Post '{}' could not be served: {}", slug, e);
            match render_not_found(template_dir, "This post does not exist.", "/blog", "Back to blog") {
                Ok(body) => html_not_found(body),
                Err(e) => web::HttpResponse::InternalServerError()
                    .body(format!("Error rendering not-found page: {}", e)),
            }
        }
    }
}

#[web::get("/photos")]
async fn album_list(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let (storage, template_dir, cdn_base) = {
        let state = state.lock().unwrap();
        (state.storage.clone(), state.config.paths.template_dir.clone(), state.cdn_base.clone())
    };

    let mut entries: Vec<AlbumEntry> = vec![];
    if let Some(storage) = storage {
        for record in storage.fetch_albums().await {
            let Some(folder) = album_folder(&record.path).map(str::to_string) else {
                warn!("Album '{}' has a malformed path '{}'", record.name, record.path);
                continue;
            };
            // One file per folder is enough for a cover tile.
            let cover = storage.list_folder(&folder, Some(1)).await.into_iter().next();
            entries.push(AlbumEntry {
                name: record.name,
                folder,
                year: record.year,
                order: record.order,
                cover,
            });
        }
    }

    let groups = group_by_year(entries);

    let state = state.lock().unwrap();
    let rendered = load_template(&template_dir, "albums.tpl")
        .and_then(|src| AlbumListRenderer::new(&src)
            .map(|renderer| renderer.render(&groups, &state.placeholders, &cdn_base)));

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering album list: {}", e)),
    }
}

#[web::get("/photos/{album}/")]
async fn album_view(path: web::types::Path<String>, state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let album = path.into_inner();
    let (storage, template_dir, cdn_base) = {
        let state = state.lock().unwrap();
        (state.storage.clone(), state.config.paths.template_dir.clone(), state.cdn_base.clone())
    };

    let mut images = match storage {
        Some(storage) => storage.list_folder(&album, None).await,
        None => vec![],
    };
    images.retain(|entry| !entry.is_folder() && entry.name != crate::generator::EMPTY_FOLDER_MARKER);
    sort_images_numeric(&mut images);

    let state = state.lock().unwrap();
    let rendered = load_template(&template_dir, "album.tpl")
        .and_then(|src| AlbumRenderer::new(&src).map(|renderer| {
            renderer.render(&format_album_title(&album), &album, &images, &state.placeholders, &cdn_base)
        }));

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering album {}: {}", album, e)),
    }
}

#[web::get("/videos")]
async fn video_list(state: web::types::State<Arc<Mutex<AppState>>>) -> web::HttpResponse {
    let (videos, template_dir) = {
        let state = state.lock().unwrap();
        (state.videos.clone(), state.config.paths.template_dir.clone())
    };

    let videos = match videos {
        Some(client) => client.recent_videos().await,
        None => vec![],
    };

    let rendered = load_template(&template_dir, "videos.tpl")
        .and_then(|src| VideoRenderer::new(&src).map(|renderer| renderer.render(&videos)));

    match rendered {
        Ok(body) => html_ok(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error rendering video list: {}", e)),
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<Mutex<AppState>>>) -> Result<NamedFile, web::Error> {
    if path.contains("../") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let state = state.lock().unwrap();
    let file_path = state.config.paths.public_dir.join(path.into_inner());

    Ok(NamedFile::open(file_path)?)
}

fn build_storage_client(env: &ServiceEnv) -> Option<StorageClient> {
    match (&env.storage_url, &env.storage_key) {
        (Some(url), Some(key)) => match StorageClient::new(url, key) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!("Could not build storage client: {}. Photo pages will render empty", e);
                None
            }
        },
        _ => None,
    }
}

fn build_video_client(env: &ServiceEnv) -> Option<VideoClient> {
    match (&env.video_api_key, &env.video_channel_id) {
        (Some(key), Some(channel)) => Some(VideoClient::new(key, channel)),
        _ => None,
    }
}

pub async fn server_run(config: Config, env: ServiceEnv) -> io::Result<()> {
    let resume = Resume::from_file(&config.paths.resume_file)?;

    let posts = PostStore::new(config.paths.content_dir.clone());
    match posts.all_posts() {
        Ok(posts) => info!("Serving {} posts", posts.len()),
        Err(e) => warn!("Could not list posts yet: {}", e),
    }

    let placeholders = match PlaceholderMap::load(&config.paths.placeholder_file) {
        Ok(map) => {
            info!("Loaded {} blur placeholders", map.len());
            map
        }
        Err(e) => {
            warn!("{}. Serving without blur data", e);
            PlaceholderMap::default()
        }
    };

    let storage = build_storage_client(&env);
    let videos = build_video_client(&env);
    let cdn_base = env.cdn_base_url.clone()
        .map(|base| base.trim_end_matches('/').to_string())
        .unwrap_or_default();

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(Mutex::new(AppState {
        config,
        resume,
        posts,
        placeholders,
        storage,
        videos,
        cdn_base,
    }));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(public_files)
            .service(blog_list)
            .service(blog_view)
            .service(blog_view_wo_slash)
            .service(album_list)
            .service(album_view)
            .service(album_view_wo_slash)
            .service(video_list)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
