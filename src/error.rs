//! Errors reported by the OCR pipeline.
//!
//! Collaborators (document loaders, rasterizers, OCR engines) report failures
//! as [`anyhow::Error`]. The pipeline wraps them in [`PipelineError`] so that
//! callers can tell which stage failed and, for page-level failures, which
//! page.

use std::{io, time::Duration};

use thiserror::Error;

/// A failure of one pipeline run, or of the controller that performs runs.
#[derive(Debug, Error)]
pub enum PipelineError {
    // -- Run stages --
    #[error("could not read {description}")]
    Read {
        description: String,
        #[source]
        source: io::Error,
    },

    #[error("could not parse document")]
    Parse(#[source] anyhow::Error),

    #[error("could not render page {page}")]
    Render {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not recognize text on page {page}")]
    Recognition {
        page: usize,
        #[source]
        source: anyhow::Error,
    },

    #[error("page {page} did not finish within {timeout:?}")]
    PageTimeout { page: usize, timeout: Duration },

    // -- Engine lifecycle --
    #[error("could not load OCR model {model:?}")]
    ModelLoad {
        model: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("could not shut down OCR engine")]
    Teardown(#[source] anyhow::Error),

    // -- Controller misuse --
    #[error("OCR model is still loading")]
    NotReady,

    #[error("OCR model failed to load; this pipeline cannot process documents")]
    Unusable,

    #[error("this pipeline has already processed a document")]
    AlreadyUsed,
}

impl PipelineError {
    /// A short name for the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Read { .. } => "read",
            PipelineError::Parse(_) => "parse",
            PipelineError::Render { .. } => "render",
            PipelineError::Recognition { .. } => "recognition",
            PipelineError::PageTimeout { .. } => "page-timeout",
            PipelineError::ModelLoad { .. } => "model-load",
            PipelineError::Teardown(_) => "teardown",
            PipelineError::NotReady
            | PipelineError::Unusable
            | PipelineError::AlreadyUsed => "controller",
        }
    }

    /// The 1-based page that failed, for page-level errors.
    pub fn page(&self) -> Option<usize> {
        match self {
            PipelineError::Render { page, .. }
            | PipelineError::Recognition { page, .. }
            | PipelineError::PageTimeout { page, .. } => Some(*page),
            _ => None,
        }
    }
}

/// Misuse of an [`EngineHandle`](crate::engine::EngineHandle).
///
/// These are programming errors, and we fail fast instead of ignoring them.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineLifecycleError {
    #[error("OCR engine used before its model was loaded")]
    NotLoaded,

    #[error("OCR model loaded twice")]
    AlreadyLoaded,

    #[error("OCR engine used after it was destroyed")]
    Destroyed,
}
