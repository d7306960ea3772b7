// ============================================================
// Layer 3 — Stage Artifacts
// ============================================================
// Values passed between pipeline stages. Each is created once
// by the stage that owns it and only read afterwards.
//
// Upstream artifacts (trainer, transformation) arrive as JSON
// written by the earlier stages; the artifacts produced here are
// printed as JSON for the next stage to pick up.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::error::StageFault;

/// Produced by the training stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainerArtifact {
    pub trained_model_path: PathBuf,
    pub x_test_path:        PathBuf,
    pub y_test_path:        PathBuf,
}

/// Produced by the data transformation stage. Carried along, never read here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformationArtifact {
    pub transformed_train_path: PathBuf,
    pub transformed_test_path:  PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationArtifact {
    pub is_model_accepted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PusherArtifact {
    pub bucket_name: String,
}

/// Read an upstream artifact from its JSON file.
pub fn read_artifact<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, StageFault> {
    let json = std::fs::read_to_string(path).map_err(|e| StageFault::io(path, e))?;
    serde_json::from_str(&json)
        .map_err(|e| StageFault::config(format!("cannot parse artifact '{}': {e}", path.display())))
}
