//! Configuration loading.
//!
//! 1. Read global config from `~/.config/ai-sync/ai-sync.json`
//! 2. Read local config from `./ai-sync.json`
//! 3. Merge-patch local over global at the JSON level
//! 4. Deserialize once into [`AiSyncConfig`]
//! 5. Apply `AI_SYNC_*` env overrides
//! 6. Run advisory validation

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::config::merge::merge_patch;
use crate::config::types::AiSyncConfig;
use crate::config::validation::{AdvisoryWarning, validate};

pub const LOCAL_FILE: &str = "ai-sync.json";
pub const GLOBAL_DIR: &str = "ai-sync";
pub const GLOBAL_FILE: &str = "ai-sync.json";

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub local: PathBuf,
    pub global: PathBuf,
}

#[derive(Debug)]
pub struct LoadedConfig {
    pub config: AiSyncConfig,
    pub warnings: Vec<AdvisoryWarning>,
    pub paths: ConfigPaths,
}

pub fn global_config_path() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Could not determine config dir")?;
    Ok(base.join(GLOBAL_DIR).join(GLOBAL_FILE))
}

pub fn local_config_path(local_dir: &Path) -> PathBuf {
    local_dir.join(LOCAL_FILE)
}

/// Load global and local config files, merged, with env overrides applied.
pub fn load_merged(local_dir: &Path) -> Result<LoadedConfig> {
    let paths = ConfigPaths {
        local: local_config_path(local_dir),
        global: global_config_path()?,
    };
    let config = load_from(&paths.global, &paths.local)?;
    let warnings = validate(&config);
    for warning in &warnings {
        tracing::debug!(%warning, "config advisory");
    }

    Ok(LoadedConfig {
        config,
        warnings,
        paths,
    })
}

/// Merge two explicit config files and apply env overrides.
pub fn load_from(global: &Path, local: &Path) -> Result<AiSyncConfig> {
    let mut merged = read_json_object_or_empty(global)?;
    merge_patch(&mut merged, read_json_object_or_empty(local)?);

    let mut cfg: AiSyncConfig =
        serde_json::from_value(merged).context("Failed to deserialize merged ai-sync config")?;
    apply_env_overrides(&mut cfg)?;
    Ok(cfg)
}

fn apply_env_overrides(cfg: &mut AiSyncConfig) -> Result<()> {
    if let Some(v) = env_trimmed("AI_SYNC_DEFAULT_TARGET") {
        cfg.default_target_path = Some(v);
    }
    if let Some(v) = env_trimmed("AI_SYNC_BASE_DIR") {
        cfg.base_dir = Some(v.into());
    }
    if let Some(v) = env_trimmed("AI_SYNC_WORKSPACE_DIR") {
        cfg.workspace_dir = Some(v.into());
    }
    if let Some(v) = env_trimmed("AI_SYNC_POLICY") {
        cfg.policy = v
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid AI_SYNC_POLICY")?;
    }
    if let Some(v) = env_trimmed("AI_SYNC_TRANSPORT") {
        cfg.transport = v
            .parse()
            .map_err(|e: String| anyhow::anyhow!(e))
            .context("Invalid AI_SYNC_TRANSPORT")?;
    }
    if let Some(v) = env_trimmed("AI_SYNC_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_trimmed("AI_SYNC_LOG_JSON") {
        cfg.logging.json = v.eq_ignore_ascii_case("true") || v == "1";
    }
    Ok(())
}

fn env_trimmed(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn read_json_object_or_empty(path: &Path) -> Result<Value> {
    if !path.exists() {
        return Ok(Value::Object(serde_json::Map::new()));
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let v: Value = serde_json::from_str(&raw)
        .with_context(|| format!("Invalid JSON in {}", path.display()))?;

    if !v.is_object() {
        anyhow::bail!("Config root must be a JSON object: {}", path.display());
    }
    Ok(v)
}
