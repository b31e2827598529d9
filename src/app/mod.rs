pub mod config;

pub use config::{AppConfig, CategoriesConfig, ServerConfig, StorageConfig};
