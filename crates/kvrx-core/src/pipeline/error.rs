//! Fatal run errors, tagged by cause.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::delivery::DeliveryError;
use crate::retry::FetchError;
use crate::run_log::RunLogError;

/// Cause of a failed run. Every kind ends the run through the same fatal
/// path; the tag only changes how it is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    RetriesExhausted,
    Fetch,
    Delivery,
    Filesystem,
    Log,
    Config,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("max tries {attempts} exceeded fetching {url}")]
    RetriesExhausted { url: String, attempts: u32 },
    #[error("fetch failed: {0}")]
    Fetch(#[source] FetchError),
    #[error("delivery failed: {0}")]
    Delivery(#[source] DeliveryError),
    #[error("cannot write {}: {source}", path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("run log: {0}")]
    Log(#[from] RunLogError),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::RetriesExhausted { .. } => FailureKind::RetriesExhausted,
            PipelineError::Fetch(_) => FailureKind::Fetch,
            PipelineError::Delivery(_) => FailureKind::Delivery,
            PipelineError::Filesystem { .. } => FailureKind::Filesystem,
            PipelineError::Log(_) => FailureKind::Log,
            PipelineError::Config(_) => FailureKind::Config,
        }
    }
}

impl From<FetchError> for PipelineError {
    fn from(e: FetchError) -> Self {
        match e {
            FetchError::RetriesExhausted { url, attempts } => {
                PipelineError::RetriesExhausted { url, attempts }
            }
            FetchError::Log(e) => PipelineError::Log(e),
            other => PipelineError::Fetch(other),
        }
    }
}

impl From<DeliveryError> for PipelineError {
    fn from(e: DeliveryError) -> Self {
        match e {
            DeliveryError::Log(e) => PipelineError::Log(e),
            other => PipelineError::Delivery(other),
        }
    }
}
