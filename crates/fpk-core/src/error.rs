use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("input directory does not exist: {0}")]
    InputDirNotFound(PathBuf),

    #[error("compose.yaml or docker-compose.yaml not found in {0}")]
    DescriptorNotFound(PathBuf),

    #[error("failed to read compose file {path}")]
    DescriptorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse compose yaml")]
    DescriptorParse { source: serde_yaml_ng::Error },

    #[error("invalid compose file: {reason}")]
    DescriptorShape { reason: String },

    #[error("failed to serialize cleaned compose file")]
    DescriptorSerialize { source: serde_yaml_ng::Error },

    // ── fpk.toml ──
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
