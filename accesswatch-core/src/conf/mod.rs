mod error;
mod loader;
mod template;
mod types;


pub use error::ConfigError;
pub use loader::{load_config, parse_config};
pub use template::DEFAULT_CONFIG;
pub use types::{StreamConfig, StreamSettings};
