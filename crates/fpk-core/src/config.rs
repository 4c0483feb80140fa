use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// File name of the optional builder configuration, looked up in the input directory.
pub const CONFIG_FILE_NAME: &str = "fpk.toml";

/// fpk.toml configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuilderConfig {
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default)]
    pub packager: PackagerSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildSection {
    /// Output directory used when `--output` is not given
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackagerSection {
    /// Explicit fnpack binary, tried before any search
    pub path: Option<PathBuf>,
    /// Only emit the directory tree (same as `--skip-fnpack`)
    #[serde(default)]
    pub skip: bool,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl BuilderConfig {
    /// Load from fpk.toml in the given directory, or return defaults if not found.
    pub fn load(input_dir: &Path) -> crate::Result<Self> {
        let config_path = input_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            tracing::debug!(path = %config_path.display(), "loaded builder config");
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./dist")
}
