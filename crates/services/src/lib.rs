pub mod api;
pub mod config;
pub mod download;

pub use api::BackendClient;
pub use config::ClientSettings;
