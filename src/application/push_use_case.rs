// ============================================================
// Layer 2 — Model Pusher Stage
// ============================================================
// Uploads the accepted model bundle to the bucket and records
// where it went. The upload itself belongs to the RemoteStorage
// collaborator: no chunking, retry, or verification here.

use crate::domain::{
    artifacts::PusherArtifact,
    config::PusherConfig,
    error::{PushError, StageFault},
    traits::RemoteStorage,
};

const STAGE: &str = "ModelPusher";

pub struct ModelPusher<S> {
    config:  PusherConfig,
    storage: S,
}

impl<S: RemoteStorage> ModelPusher<S> {
    pub fn new(config: PusherConfig, storage: S) -> Self {
        Self { config, storage }
    }

    /// Push `trained_model_dir/model_name` to `bucket_name/model_name`.
    pub fn initiate(self) -> Result<PusherArtifact, PushError> {
        self.run().map_err(|e| PushError::new("initiate", e))
    }

    fn run(&self) -> Result<PusherArtifact, StageFault> {
        tracing::info!("Started the initiate method of {} class", STAGE);
        let cfg = &self.config;
        cfg.validate()?;

        self.storage
            .push(&cfg.bucket_name, &cfg.trained_model_dir, &cfg.model_name)
            .map_err(|source| StageFault::Storage {
                bucket: cfg.bucket_name.clone(),
                object: cfg.model_name.clone(),
                source,
            })?;
        tracing::info!("Uploaded best model to remote storage");

        let artifact = PusherArtifact { bucket_name: cfg.bucket_name.clone() };
        tracing::info!("Exited the initiate method of {} class", STAGE);
        Ok(artifact)
    }
}
