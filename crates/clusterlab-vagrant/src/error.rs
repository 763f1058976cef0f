//! Vagrant backend error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VagrantError {
    #[error("vagrant not found. Please install: https://developer.hashicorp.com/vagrant/install")]
    VagrantNotFound,

    #[error("vagrant command failed: {0}")]
    CommandFailed(String),

    #[error("could not parse vagrant output: {0}")]
    ParseError(String),

    #[error("could not determine the data directory")]
    DataDirNotFound,

    #[error("'{0}' is not a valid cluster name")]
    InvalidPrefix(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VagrantError> for clusterlab_provision::ProvisionError {
    fn from(e: VagrantError) -> Self {
        clusterlab_provision::ProvisionError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, VagrantError>;
