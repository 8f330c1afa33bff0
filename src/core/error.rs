use thiserror::Error;

/// Errors at the loading/validation edge of the kernel
///
/// The tick path itself never errors: invalid commands are silent no-ops,
/// missing entities are skipped, out-of-range values are clamped.
#[derive(Error, Debug)]
pub enum KernelError {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Invalid world: {0}")]
    InvalidWorld(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KernelError>;
