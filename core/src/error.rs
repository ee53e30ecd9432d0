use thiserror::Error;

use crate::params::Parameter;

#[derive(Error, Debug)]
pub enum TerrainError {
    #[error("invalid value for {parameter}: {reason}")]
    InvalidParameter {
        parameter: Parameter,
        reason: String,
    },

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    #[error("{parameter} expects a {expected} value")]
    TypeMismatch {
        parameter: Parameter,
        expected: &'static str,
    },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TerrainError {
    pub(crate) fn invalid(parameter: Parameter, reason: impl Into<String>) -> Self {
        TerrainError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TerrainError>;
