pub mod config;
pub mod logger;
pub mod server;
pub mod generator;
pub mod storage;
pub mod placeholders;
pub mod viewer;
mod albums;
mod post;
mod post_store;
mod resume;
mod test_data;
mod videos;
mod view;
