//! Configuration loading

mod file_config;
mod loader;

pub use file_config::{FileConfig, FileCoordinatorConfig, FileNotifyConfig, FileStorageConfig};
pub use loader::ConfigLoader;
