pub mod config;
pub mod path_utils;

pub use config::AppConfig;

use tracing::info;

pub fn init() {
    info!("📁 FileTracker core initialized");
}
