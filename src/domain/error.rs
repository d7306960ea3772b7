// ============================================================
// Layer 3 — Error Taxonomy
// ============================================================
// Every stage method returns a typed error. Work below a stage
// reports a `StageFault`; the public stage methods wrap it with
// the name of the operation that was running, so the caller sees
// one error kind per stage with the underlying cause in `source()`.
//
//   StageFault ──wrapped by──► EvaluationError  (ModelEvaluation)
//              ──wrapped by──► PushError        (ModelPusher)

use std::path::PathBuf;
use thiserror::Error;

/// What went wrong underneath a stage.
#[derive(Debug, Error)]
pub enum StageFault {
    /// A config value that can never work (empty bucket, zero batch size...)
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O failure on '{}'", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The model bundle is missing, truncated, or does not match the architecture
    #[error("cannot load model from '{}'", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("cannot use tokenizer '{}': {reason}", path.display())]
    Tokenizer { path: PathBuf, reason: String },

    /// Test split rows that cannot be scored (bad label, missing column, shape mismatch)
    #[error("malformed test data in '{}': {reason}", path.display())]
    Data { path: PathBuf, reason: String },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("remote storage sync failed for gs://{bucket}/{object}")]
    Storage {
        bucket: String,
        object: String,
        #[source]
        source: anyhow::Error,
    },
}

impl StageFault {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    pub fn data(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Data { path: path.into(), reason: reason.into() }
    }

    pub fn tokenizer(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Tokenizer { path: path.into(), reason: reason.to_string() }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference(msg.into())
    }
}

/// Raised by every public method of the model evaluation stage.
#[derive(Debug, Error)]
#[error("{operation} method of ModelEvaluation failed")]
pub struct EvaluationError {
    /// The public method that was running
    pub operation: &'static str,
    #[source]
    pub source: StageFault,
}

impl EvaluationError {
    pub fn new(operation: &'static str, source: StageFault) -> Self {
        Self { operation, source }
    }

    pub fn fault(&self) -> &StageFault {
        &self.source
    }
}

/// Raised by the model pusher stage.
#[derive(Debug, Error)]
#[error("{operation} method of ModelPusher failed")]
pub struct PushError {
    pub operation: &'static str,
    #[source]
    pub source: StageFault,
}

impl PushError {
    pub fn new(operation: &'static str, source: StageFault) -> Self {
        Self { operation, source }
    }

    pub fn fault(&self) -> &StageFault {
        &self.source
    }
}
