// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the three subcommands: `evaluate`, `push`, `promote`
// and all their configurable flags. Defaults come from
// domain::constants so the CLI and the stage configs agree.

use anyhow::{bail, Result};
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::domain::{
    artifacts::{read_artifact, TrainerArtifact, TransformationArtifact},
    config::{AcceptancePolicy, EvaluationConfig, PusherConfig},
    constants,
    traits::RemoteStorage,
};
use crate::infra::storage::{GsutilSync, LocalBucketSync};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Score the trained model against the promoted one and print the decision
    Evaluate(EvaluateArgs),

    /// Upload the trained model to the bucket
    Push(PushArgs),

    /// Evaluate, then push only if the trained model was accepted
    Promote(PromoteArgs),
}

// ─── Shared flags ─────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum StorageKind {
    /// Google Cloud Storage via the gsutil CLI
    Gcs,
    /// A local directory laid out as <root>/<bucket>/<object>
    Local,
}

#[derive(Args, Debug)]
pub struct StorageArgs {
    /// Remote storage backend
    #[arg(long, value_enum, default_value_t = StorageKind::Gcs)]
    pub storage: StorageKind,

    /// Root directory for `--storage local`
    #[arg(long)]
    pub storage_root: Option<PathBuf>,

    /// gsutil executable for `--storage gcs`
    #[arg(long, default_value = "gsutil")]
    pub gsutil: String,
}

impl StorageArgs {
    pub fn build(&self) -> Result<Box<dyn RemoteStorage>> {
        match (self.storage, &self.storage_root) {
            (StorageKind::Gcs, _) => Ok(Box::new(GsutilSync::with_program(&self.gsutil))),
            (StorageKind::Local, Some(root)) => Ok(Box::new(LocalBucketSync::new(root))),
            (StorageKind::Local, None) => bail!("--storage local requires --storage-root"),
        }
    }
}

#[derive(Args, Debug)]
pub struct BucketArgs {
    /// Bucket holding the promoted model
    #[arg(long, default_value = constants::BUCKET_NAME)]
    pub bucket_name: String,

    /// Model file name, both locally and in the bucket
    #[arg(long, default_value = constants::MODEL_NAME)]
    pub model_name: String,
}

// ─── evaluate ─────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct EvaluateArgs {
    #[command(flatten)]
    pub bucket: BucketArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Directory the promoted model is pulled into
    #[arg(long, default_value = constants::BEST_MODEL_DIR)]
    pub best_model_dir: PathBuf,

    /// WordLevel tokenizer JSON shared by both models
    #[arg(long, default_value = constants::TOKENIZER_PATH)]
    pub tokenizer_path: PathBuf,

    /// Sequences are pre-padded / pre-truncated to this many tokens
    #[arg(long, default_value_t = constants::MAX_LEN)]
    pub max_len: usize,

    #[arg(long, default_value_t = constants::EVAL_BATCH_SIZE)]
    pub batch_size: usize,

    /// Name of the text column in the test feature CSV
    #[arg(long, default_value = constants::TEXT_COLUMN)]
    pub text_column: String,

    /// incumbent-outperforms | challenger-outperforms
    #[arg(long, default_value_t = AcceptancePolicy::default())]
    pub acceptance_policy: AcceptancePolicy,

    /// Trainer artifact JSON; overrides the three path flags below
    #[arg(long)]
    pub trainer_artifact: Option<PathBuf>,

    #[arg(long, default_value_os_t = default_trained_model_path())]
    pub trained_model_path: PathBuf,

    #[arg(long, default_value = constants::X_TEST_PATH)]
    pub x_test_path: PathBuf,

    #[arg(long, default_value = constants::Y_TEST_PATH)]
    pub y_test_path: PathBuf,

    /// Transformation artifact JSON, carried along for the logs
    #[arg(long)]
    pub transformation_artifact: Option<PathBuf>,
}

fn default_trained_model_path() -> PathBuf {
    PathBuf::from(constants::TRAINED_MODEL_DIR).join(constants::MODEL_NAME)
}

impl EvaluateArgs {
    pub fn trainer_artifact(&self) -> Result<TrainerArtifact> {
        match &self.trainer_artifact {
            Some(path) => Ok(read_artifact(path)?),
            None => Ok(TrainerArtifact {
                trained_model_path: self.trained_model_path.clone(),
                x_test_path:        self.x_test_path.clone(),
                y_test_path:        self.y_test_path.clone(),
            }),
        }
    }

    pub fn transformation_artifact(&self) -> Result<TransformationArtifact> {
        match &self.transformation_artifact {
            Some(path) => Ok(read_artifact(path)?),
            None => Ok(TransformationArtifact::default()),
        }
    }
}

/// The application layer never sees clap types.
impl From<&EvaluateArgs> for EvaluationConfig {
    fn from(a: &EvaluateArgs) -> Self {
        EvaluationConfig {
            bucket_name:       a.bucket.bucket_name.clone(),
            model_name:        a.bucket.model_name.clone(),
            best_model_dir:    a.best_model_dir.clone(),
            tokenizer_path:    a.tokenizer_path.clone(),
            max_len:           a.max_len,
            batch_size:        a.batch_size,
            text_column:       a.text_column.clone(),
            acceptance_policy: a.acceptance_policy,
        }
    }
}

// ─── push ─────────────────────────────────────────────────────────────────────

#[derive(Args, Debug)]
pub struct PushArgs {
    #[command(flatten)]
    pub bucket: BucketArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Directory holding the model file to upload
    #[arg(long, default_value = constants::TRAINED_MODEL_DIR)]
    pub trained_model_dir: PathBuf,
}

impl From<&PushArgs> for PusherConfig {
    fn from(a: &PushArgs) -> Self {
        PusherConfig {
            bucket_name:       a.bucket.bucket_name.clone(),
            trained_model_dir: a.trained_model_dir.clone(),
            model_name:        a.bucket.model_name.clone(),
        }
    }
}

// ─── promote ──────────────────────────────────────────────────────────────────

/// The model pushed is always the file that was evaluated.
#[derive(Args, Debug)]
pub struct PromoteArgs {
    #[command(flatten)]
    pub evaluate: EvaluateArgs,
}

impl PromoteArgs {
    /// Upload config for the evaluated `trained_model_path`. Its file name
    /// must be `--model-name`, the object the bucket stores and serves.
    pub fn pusher_config(&self, evaluated: &TrainerArtifact) -> Result<PusherConfig> {
        let bucket = &self.evaluate.bucket;
        let path   = &evaluated.trained_model_path;

        let file_name = path.file_name().and_then(|n| n.to_str());
        if file_name != Some(bucket.model_name.as_str()) {
            bail!(
                "evaluated model '{}' is not named '{}'; rename it or pass --model-name",
                path.display(),
                bucket.model_name
            );
        }
        let trained_model_dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(PusherConfig {
            bucket_name:       bucket.bucket_name.clone(),
            trained_model_dir,
            model_name:        bucket.model_name.clone(),
        })
    }
}
