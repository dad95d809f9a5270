//! JSON Schema for `ai-sync.json`, for editor autocomplete.

use crate::config::types::AiSyncConfig;
use schemars::{Schema, generate::SchemaSettings};

pub fn schema() -> Schema {
    SchemaSettings::default()
        .into_generator()
        .into_root_schema_for::<AiSyncConfig>()
}

pub fn schema_json_pretty() -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&schema())?)
}
