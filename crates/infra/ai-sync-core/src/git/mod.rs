pub mod clone;
pub mod progress;

pub use clone::{GixCloner, RepoCloner, ShellGitCloner, Transport};
