//! Path classification for assistant-config content.
//!
//! Two explicit policies exist. [`ClassificationPolicy::Strict`] matches path
//! segments and an enumerated set of file names; [`ClassificationPolicy::Permissive`]
//! additionally accepts substring matches and therefore over-matches (e.g.
//! `mycopilotnotes.txt`). Strict is the default.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name of the git metadata directory, never traversed.
pub const GIT_DIR_NAME: &str = ".git";

/// Name prefix of the tool's own ephemeral directories, never traversed.
pub const EPHEMERAL_DIR_PREFIX: &str = ".ai-sync";

const STRICT_FILE_NAMES: &[&str] = &[
    ".copilotignore",
    "copilot.yaml",
    "copilot.yml",
    "copilot.json",
    "copilot-instructions.md",
    "copilot.md",
];

const PERMISSIVE_FILE_NAMES: &[&str] = &[
    ".copilotignore",
    "copilot.yaml",
    "copilot.yml",
    "copilot.json",
];

const CONVENIENCE_DIRS: &[&str] = &["skills", "prompts", "agents"];

const GITHUB_CHILD_DIRS: &[&str] = &["copilot", "skills", "prompts"];

const PERMISSIVE_PATH_FRAGMENTS: &[&str] = &["/copilot", "/.copilot", "/.github/copilot"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassificationPolicy {
    /// Segment matching for directories, exact names for files.
    #[default]
    Strict,
    /// Segment or substring matching for directories and files.
    Permissive,
}

impl ClassificationPolicy {
    /// Whether a directory path (relative to the clone root) is assistant-config content.
    pub fn qualifies_dir(self, path: &str) -> bool {
        let normalized = normalize(path);
        let segments = segments(&normalized);
        match self {
            Self::Strict => strict_dir(&segments),
            Self::Permissive => permissive_dir(&normalized, &segments),
        }
    }

    /// Whether a bare file name is assistant-config content.
    pub fn qualifies_file(self, name: &str) -> bool {
        let lower = name.to_lowercase();
        match self {
            Self::Strict => STRICT_FILE_NAMES.contains(&lower.as_str()),
            Self::Permissive => {
                lower.contains("copilot") || PERMISSIVE_FILE_NAMES.contains(&lower.as_str())
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Permissive => "permissive",
        }
    }
}

impl fmt::Display for ClassificationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClassificationPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "permissive" => Ok(Self::Permissive),
            other => Err(format!(
                "unknown classification policy '{other}' (expected 'strict' or 'permissive')"
            )),
        }
    }
}

/// Directory names that are skipped during traversal regardless of policy.
pub fn is_excluded_dir_name(name: &str) -> bool {
    name == GIT_DIR_NAME || name.starts_with(EPHEMERAL_DIR_PREFIX)
}

fn normalize(path: &str) -> String {
    path.replace('\\', "/").to_lowercase()
}

fn segments(normalized: &str) -> Vec<&str> {
    normalized.split('/').filter(|s| !s.is_empty()).collect()
}

fn strict_dir(segments: &[&str]) -> bool {
    segments.iter().enumerate().any(|(i, segment)| {
        if matches!(*segment, "copilot" | ".copilot") || CONVENIENCE_DIRS.contains(segment) {
            return true;
        }
        if *segment != ".github" {
            return false;
        }
        match (segments.get(i + 1), segments.get(i + 2)) {
            (Some(next), _) if GITHUB_CHILD_DIRS.contains(next) => true,
            (Some(&"copilot"), Some(&"agents")) => true,
            _ => false,
        }
    })
}

fn permissive_dir(normalized: &str, segments: &[&str]) -> bool {
    if segments
        .iter()
        .any(|segment| matches!(*segment, "copilot" | ".copilot"))
    {
        return true;
    }
    let rooted = if normalized.starts_with('/') {
        normalized.to_string()
    } else {
        format!("/{normalized}")
    };
    PERMISSIVE_PATH_FRAGMENTS
        .iter()
        .any(|fragment| rooted.contains(fragment))
}
