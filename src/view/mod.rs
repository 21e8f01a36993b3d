pub mod home_renderer;
pub mod post_list_renderer;
pub mod post_renderer;
pub mod album_list_renderer;
pub mod album_renderer;
pub mod video_renderer;
pub mod not_found_renderer;
