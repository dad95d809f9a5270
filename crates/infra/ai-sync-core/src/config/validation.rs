//! Advisory validation for [`AiSyncConfig`].
//!
//! Warnings never block a sync; callers decide whether to surface them.

use crate::config::types::AiSyncConfig;

const KNOWN_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvisoryWarning {
    /// Machine-readable warning code.
    pub code: &'static str,
    pub message: String,
    /// JSON path to the offending field.
    pub path: &'static str,
}

impl std::fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

pub fn validate(cfg: &AiSyncConfig) -> Vec<AdvisoryWarning> {
    let mut warnings = vec![];

    if cfg
        .default_target_path
        .as_deref()
        .is_some_and(|p| p.trim().is_empty())
    {
        warnings.push(AdvisoryWarning {
            code: "default_target_path.empty",
            path: "default_target_path",
            message: "value is empty; ~/.copilot will be used".into(),
        });
    }

    if let Some(dir) = &cfg.workspace_dir
        && dir.is_relative()
        && !dir.starts_with("~")
    {
        warnings.push(AdvisoryWarning {
            code: "workspace_dir.relative",
            path: "workspace_dir",
            message: format!(
                "'{}' is relative and resolves against the current directory",
                dir.display()
            ),
        });
    }

    // RUST_LOG-style directives (e.g. "ai_sync=debug") are left alone.
    let level = cfg.logging.level.trim().to_ascii_lowercase();
    if !level.contains('=') && !KNOWN_LEVELS.contains(&level.as_str()) {
        warnings.push(AdvisoryWarning {
            code: "logging.level.unknown",
            path: "logging.level",
            message: format!("unknown level '{}'", cfg.logging.level),
        });
    }

    warnings
}
