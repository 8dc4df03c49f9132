use crate::domain::{Finding, Severity};
use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort the verification workflow. A report that could not
/// be written is not a failed prerequisite and keeps the zero exit code.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("interpreter `{interpreter}` is not invokable")]
    MissingRuntime { interpreter: String },

    #[error("configuration file not found at {}", path.display())]
    MissingConfig { path: PathBuf },

    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

impl VerifyError {
    pub fn finding(&self) -> Finding {
        let (severity, check) = match self {
            Self::MissingRuntime { .. } => (Severity::Fatal, "runtime"),
            Self::MissingConfig { .. } => (Severity::Fatal, "config"),
            Self::Io(_) => (Severity::Warning, "output"),
        };
        Finding::new(severity, check, self.to_string())
    }

    pub fn exit_code(&self) -> u8 {
        match self {
            Self::MissingRuntime { .. } | Self::MissingConfig { .. } => 1,
            Self::Io(_) => 0,
        }
    }
}
