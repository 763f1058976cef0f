use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine the configuration directory")]
    ConfigDirNotFound,

    #[error("configuration store unavailable: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration file is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
