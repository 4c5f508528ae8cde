use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Relative location of the per-project config file.
pub const CONFIG_FILE: &str = ".junction/config.toml";

/// Knobs for a single pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reject cyclic input with [`crate::JunctionError::CycleDetected`].
    #[serde(default = "default_true")]
    pub check_acyclic: bool,
    /// Check chordality, clique maximality and running intersection after
    /// the tree is assembled.
    #[serde(default = "default_true")]
    pub verify: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            check_acyclic: default_true(),
            verify: default_true(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Load a [`PipelineConfig`] from `path`, or the defaults when the file does
/// not exist.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    if !path.exists() {
        return Ok(PipelineConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<PipelineConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the project config under `project_root`.
///
/// # Errors
///
/// See [`load_config`].
pub fn load_project_config(project_root: &Path) -> Result<PipelineConfig> {
    load_config(&project_root.join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_project_config(dir.path()).expect("load");
        assert_eq!(config, PipelineConfig::default());
        assert!(config.check_acyclic);
        assert!(config.verify);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = TempDir::new().expect("tempdir");
        fs::create_dir_all(dir.path().join(".junction")).expect("mkdir");
        fs::write(dir.path().join(CONFIG_FILE), "verify = false\n").expect("write");

        let config = load_project_config(dir.path()).expect("load");
        assert!(config.check_acyclic);
        assert!(!config.verify);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "check_acyclic = \"maybe\"\n").expect("write");

        let err = load_config(&path).expect_err("bad type");
        assert!(err.to_string().contains("Failed to parse"));
    }
}
