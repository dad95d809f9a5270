//! Configuration types for ai-sync.
//!
//! Every field has a default, so partial config files are valid.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classify::ClassificationPolicy;
use crate::git::Transport;

/// Root configuration, loaded from `ai-sync.json` files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AiSyncConfig {
    /// Optional JSON Schema URL for IDE autocomplete support.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Target directory used when none is given on the command line.
    /// Falls back to `~/.copilot`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target_path: Option<String>,

    /// Base directory for relative target paths. Without one, relative
    /// targets are rejected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,

    /// Which files and directories count as assistant-config content.
    pub policy: ClassificationPolicy,

    /// Clone transport.
    pub transport: Transport,

    /// Parent directory for the ephemeral clone. Defaults to the system temp dir.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_dir: Option<PathBuf>,

    /// Logging and diagnostics.
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,

    /// Whether to emit JSON-formatted logs.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            json: false,
        }
    }
}
