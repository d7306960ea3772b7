// ============================================================
// Layer 3 — Stage Configuration
// ============================================================
// One value struct per stage. Built by the CLI (see
// cli/commands.rs) and owned by the stage for its lifetime.

use serde::{Deserialize, Serialize};
use std::{fmt, path::PathBuf, str::FromStr};

use crate::domain::constants;
use crate::domain::error::StageFault;

// ─── AcceptancePolicy ─────────────────────────────────────────────────────────
/// Which way the accuracy comparison against the promoted model goes.
///
/// `IncumbentOutperforms` is the behaviour the pipeline has always had:
/// the trained model is accepted when the promoted model scores *higher*.
/// It stays the default until the product owners confirm the intended
/// direction; `ChallengerOutperforms` accepts when the trained model wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AcceptancePolicy {
    #[default]
    IncumbentOutperforms,
    ChallengerOutperforms,
}

impl AcceptancePolicy {
    /// Apply the predicate to (best_accuracy, trained_accuracy).
    pub fn accepts(self, best_accuracy: f64, trained_accuracy: f64) -> bool {
        match self {
            Self::IncumbentOutperforms  => best_accuracy > trained_accuracy,
            Self::ChallengerOutperforms => trained_accuracy > best_accuracy,
        }
    }
}

impl fmt::Display for AcceptancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IncumbentOutperforms  => write!(f, "incumbent-outperforms"),
            Self::ChallengerOutperforms => write!(f, "challenger-outperforms"),
        }
    }
}

impl FromStr for AcceptancePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "incumbent-outperforms"  => Ok(Self::IncumbentOutperforms),
            "challenger-outperforms" => Ok(Self::ChallengerOutperforms),
            other => Err(format!(
                "unknown acceptance policy '{other}' \
                 (expected incumbent-outperforms or challenger-outperforms)"
            )),
        }
    }
}

// ─── EvaluationConfig ─────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    pub bucket_name:       String,
    pub model_name:        String,
    /// Local directory the promoted model is pulled into
    pub best_model_dir:    PathBuf,
    pub tokenizer_path:    PathBuf,
    pub max_len:           usize,
    pub batch_size:        usize,
    pub text_column:       String,
    pub acceptance_policy: AcceptancePolicy,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            bucket_name:       constants::BUCKET_NAME.to_string(),
            model_name:        constants::MODEL_NAME.to_string(),
            best_model_dir:    PathBuf::from(constants::BEST_MODEL_DIR),
            tokenizer_path:    PathBuf::from(constants::TOKENIZER_PATH),
            max_len:           constants::MAX_LEN,
            batch_size:        constants::EVAL_BATCH_SIZE,
            text_column:       constants::TEXT_COLUMN.to_string(),
            acceptance_policy: AcceptancePolicy::default(),
        }
    }
}

impl EvaluationConfig {
    /// Where the promoted model lands after a pull.
    pub fn best_model_path(&self) -> PathBuf {
        self.best_model_dir.join(&self.model_name)
    }

    pub fn validate(&self) -> Result<(), StageFault> {
        require_name("bucket_name", &self.bucket_name)?;
        require_name("model_name", &self.model_name)?;
        require_name("text_column", &self.text_column)?;
        if self.max_len == 0 {
            return Err(StageFault::config("max_len must be greater than 0"));
        }
        if self.batch_size == 0 {
            return Err(StageFault::config("batch_size must be greater than 0"));
        }
        Ok(())
    }
}

// ─── PusherConfig ─────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PusherConfig {
    pub bucket_name:       String,
    /// Directory holding the trained model bundle
    pub trained_model_dir: PathBuf,
    pub model_name:        String,
}

impl Default for PusherConfig {
    fn default() -> Self {
        Self {
            bucket_name:       constants::BUCKET_NAME.to_string(),
            trained_model_dir: PathBuf::from(constants::TRAINED_MODEL_DIR),
            model_name:        constants::MODEL_NAME.to_string(),
        }
    }
}

impl PusherConfig {
    pub fn validate(&self) -> Result<(), StageFault> {
        require_name("bucket_name", &self.bucket_name)?;
        require_name("model_name", &self.model_name)
    }
}

fn require_name(field: &str, value: &str) -> Result<(), StageFault> {
    if value.trim().is_empty() {
        return Err(StageFault::config(format!("{field} must not be empty")));
    }
    Ok(())
}
