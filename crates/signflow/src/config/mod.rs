pub mod app_config;
pub mod loader;
pub mod schema;

pub use app_config::AppConfig;
pub use loader::{load_config, load_config_from_str, validate_config};
pub use schema::{CacheConfig, PollConfig, SignFlowConfig, WorkerSettings};
