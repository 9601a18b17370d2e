use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Where things live and what gets launched.
///
/// Relative paths are resolved against `base_dir`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LauncherConfig {
    pub base_dir: PathBuf,
    pub settings_file: PathBuf,
    pub env_dir: PathBuf,
    pub program: String,
    pub args: Vec<String>,
    pub pause: bool,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            settings_file: Path::new("input").join("settings.txt"),
            env_dir: PathBuf::from("venv"),
            program: "python".to_string(),
            args: vec!["LSVM.py".to_string()],
            pause: true,
        }
    }
}

/// Command-line values that win over the config file.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_dir: Option<PathBuf>,
    pub settings_file: Option<PathBuf>,
    pub env_dir: Option<PathBuf>,
    pub program: Option<String>,
    pub no_pause: bool,
}

impl LauncherConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("Invalid configuration file")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Defaults, then the optional file, then `overrides`.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };

        if let Some(base_dir) = overrides.base_dir {
            config.base_dir = base_dir;
        }
        if let Some(settings_file) = overrides.settings_file {
            config.settings_file = settings_file;
        }
        if let Some(env_dir) = overrides.env_dir {
            config.env_dir = env_dir;
        }
        if let Some(program) = overrides.program {
            config.program = program;
        }
        if overrides.no_pause {
            config.pause = false;
        }

        Ok(config)
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join(&self.settings_file)
    }

    pub fn env_path(&self) -> PathBuf {
        self.base_dir.join(&self.env_dir)
    }
}
