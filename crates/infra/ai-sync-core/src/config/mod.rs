//! Layered configuration.
//!
//! Precedence, lowest to highest:
//! 1. Defaults
//! 2. Global config (`~/.config/ai-sync/ai-sync.json`)
//! 3. Local config (`./ai-sync.json`)
//! 4. `AI_SYNC_*` environment variables
//! 5. Command-line flags (applied by the binary)

pub mod loader;
pub mod merge;
pub mod schema;
pub mod types;
pub mod validation;
pub mod writer;

pub use loader::{ConfigPaths, LoadedConfig, load_merged};
pub use schema::schema_json_pretty;
pub use types::{AiSyncConfig, LoggingConfig};
pub use validation::AdvisoryWarning;
