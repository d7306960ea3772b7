// ============================================================
// Layer 2 — Model Evaluation Stage
// ============================================================
// Decides whether the freshly trained model should replace the
// promoted ("best") model in the bucket:
//
//   Step 1: Load the trained model and the tokenizer
//   Step 2: Score the trained model on the test split
//   Step 3: Pull the promoted model from remote storage
//   Step 4: No promoted model yet       → accept
//           Otherwise score it as well  → apply the acceptance policy
//   Step 5: Return the EvaluationArtifact
//
// Every public method reports failure as an EvaluationError that
// names the method and carries the underlying StageFault.

use std::{fs, path::PathBuf};
use tokenizers::Tokenizer;

use crate::data::{sequences::SequenceEncoder, test_split::TestSplitLoader};
use crate::domain::{
    artifacts::{EvaluationArtifact, TrainerArtifact, TransformationArtifact},
    config::EvaluationConfig,
    error::{EvaluationError, StageFault},
    traits::{BinaryClassifier, ModelLoader, RemoteStorage},
};
use crate::infra::{metrics::EvaluationReport, tokenizer_store::TokenizerStore};

const STAGE: &str = "ModelEvaluation";

/// The test split after tokenisation, shared by every model scored in one run.
struct EncodedTestSet {
    rows:   Vec<Vec<u32>>,
    labels: Vec<u8>,
}

pub struct ModelEvaluation<S, L> {
    config:                  EvaluationConfig,
    trainer_artifact:        TrainerArtifact,
    transformation_artifact: TransformationArtifact,
    storage:                 S,
    loader:                  L,
}

impl<S: RemoteStorage, L: ModelLoader> ModelEvaluation<S, L> {
    pub fn new(
        config:                  EvaluationConfig,
        trainer_artifact:        TrainerArtifact,
        transformation_artifact: TransformationArtifact,
        storage:                 S,
        loader:                  L,
    ) -> Self {
        Self { config, trainer_artifact, transformation_artifact, storage, loader }
    }

    /// Pull the promoted model into the best-model directory and return
    /// where it should now be. The file may not exist afterwards.
    pub fn fetch_reference_model(&self) -> Result<PathBuf, EvaluationError> {
        self.pull_reference_model()
            .map_err(|e| EvaluationError::new("fetch_reference_model", e))
    }

    /// Accuracy of `model` on the test split.
    pub fn score<M: BinaryClassifier>(&self, model: &M) -> Result<f64, EvaluationError> {
        let run = || -> Result<EvaluationReport, StageFault> {
            self.config.validate()?;
            let tokenizer = TokenizerStore::new(&self.config.tokenizer_path).load()?;
            let test_set  = self.encode_test_set(&tokenizer)?;
            self.evaluate(model, &test_set)
        };
        run()
            .map(|report| report.accuracy)
            .map_err(|e| EvaluationError::new("score", e))
    }

    /// Run the whole stage. Consumes it: a stage instance is used once.
    pub fn initiate(self) -> Result<EvaluationArtifact, EvaluationError> {
        self.run().map_err(|e| EvaluationError::new("initiate", e))
    }

    fn run(&self) -> Result<EvaluationArtifact, StageFault> {
        tracing::info!("Entered the initiate method of {} class", STAGE);
        self.config.validate()?;
        tracing::debug!("Transformation artifact: {:?}", self.transformation_artifact);

        // ── Step 1: trained model + tokenizer ────────────────────────────────
        tracing::info!("Loading currently trained model");
        let trained_model = self.loader.load(&self.trainer_artifact.trained_model_path)?;
        let tokenizer     = TokenizerStore::new(&self.config.tokenizer_path).load()?;
        let test_set      = self.encode_test_set(&tokenizer)?;

        // ── Step 2: score it ─────────────────────────────────────────────────
        let trained = self.evaluate(&trained_model, &test_set)?;

        // ── Step 3: promoted model ───────────────────────────────────────────
        tracing::info!("Fetch best model from remote storage");
        let best_model_path = self.pull_reference_model()?;

        // ── Step 4: decide ───────────────────────────────────────────────────
        tracing::info!("Check is best model present in the remote storage or not ?");
        let is_model_accepted = if !best_model_path.is_file() {
            tracing::info!("No best model in remote storage, currently trained model accepted");
            true
        } else {
            tracing::info!("Load best model fetched from remote storage");
            let best_model = self.loader.load(&best_model_path)?;
            let best       = self.evaluate(&best_model, &test_set)?;

            tracing::info!(
                "Comparing accuracy: best_model={:.4} trained_model={:.4} (policy: {})",
                best.accuracy,
                trained.accuracy,
                self.config.acceptance_policy,
            );
            let accepted = self
                .config
                .acceptance_policy
                .accepts(best.accuracy, trained.accuracy);
            if accepted {
                tracing::info!("Trained model accepted");
            } else {
                tracing::info!("Trained model not accepted");
            }
            accepted
        };

        // ── Step 5: artifact ─────────────────────────────────────────────────
        tracing::info!("Returning the ModelEvaluationArtifact");
        tracing::info!("Exited the initiate method of {} class", STAGE);
        Ok(EvaluationArtifact { is_model_accepted })
    }

    fn pull_reference_model(&self) -> Result<PathBuf, StageFault> {
        tracing::info!("Entered the fetch_reference_model method of {} class", STAGE);
        let cfg = &self.config;

        fs::create_dir_all(&cfg.best_model_dir)
            .map_err(|e| StageFault::io(&cfg.best_model_dir, e))?;

        self.storage
            .pull(&cfg.bucket_name, &cfg.model_name, &cfg.best_model_dir)
            .map_err(|source| StageFault::Storage {
                bucket: cfg.bucket_name.clone(),
                object: cfg.model_name.clone(),
                source,
            })?;

        let best_model_path = cfg.best_model_path();
        tracing::info!("Exited the fetch_reference_model method of {} class", STAGE);
        Ok(best_model_path)
    }

    fn encode_test_set(&self, tokenizer: &Tokenizer) -> Result<EncodedTestSet, StageFault> {
        let split = TestSplitLoader::new(&self.config.text_column).load(
            &self.trainer_artifact.x_test_path,
            &self.trainer_artifact.y_test_path,
        )?;
        let rows = SequenceEncoder::new(tokenizer, self.config.max_len).encode_all(&split.texts)?;
        tracing::debug!("Encoded {} test rows to width {}", rows.len(), self.config.max_len);
        Ok(EncodedTestSet { rows, labels: split.labels })
    }

    /// Predict every row once, then derive loss, accuracy, and the confusion matrix.
    fn evaluate<M: BinaryClassifier>(
        &self,
        model:    &M,
        test_set: &EncodedTestSet,
    ) -> Result<EvaluationReport, StageFault> {
        tracing::info!("Entered the score method of {} class", STAGE);

        let probabilities = model
            .predict(&test_set.rows)
            .map_err(|e| StageFault::inference(format!("{e:#}")))?;
        if probabilities.len() != test_set.labels.len() {
            return Err(StageFault::inference(format!(
                "model returned {} predictions for {} rows",
                probabilities.len(),
                test_set.labels.len()
            )));
        }

        let report = EvaluationReport::from_predictions(&test_set.labels, &probabilities);
        tracing::info!("the test loss is {:.4}, the test accuracy is {:.4}", report.loss, report.accuracy);
        tracing::info!("the confusion_matrix is {}", report.confusion);
        tracing::info!("Exited the score method of {} class", STAGE);
        Ok(report)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::{FakeClassifier, FakeLoader, FakeStorage, Fixture};
    use crate::domain::config::AcceptancePolicy;

    // Labels in the fixture are [0, 1, 1, 0]
    const HALF_RIGHT: [f32; 4] = [0.2, 0.9, 0.4, 0.6]; // accuracy 0.5
    const ALL_RIGHT:  [f32; 4] = [0.1, 0.8, 0.7, 0.3]; // accuracy 1.0
    const ALL_WRONG:  [f32; 4] = [0.9, 0.1, 0.2, 0.8]; // accuracy 0.0

    fn stage(
        fx:      &Fixture,
        storage: FakeStorage,
        policy:  AcceptancePolicy,
        trained: [f32; 4],
        best:    [f32; 4],
    ) -> ModelEvaluation<FakeStorage, FakeLoader> {
        let loader = FakeLoader::new()
            .with_model("trained", trained.to_vec())
            .with_model("best", best.to_vec());
        let config = EvaluationConfig { acceptance_policy: policy, ..fx.evaluation_config() };
        ModelEvaluation::new(config, fx.trainer_artifact(), TransformationArtifact::default(), storage, loader)
    }

    #[test]
    fn test_no_reference_model_accepts_even_a_bad_model() {
        let fx = Fixture::new();
        let artifact = stage(&fx, FakeStorage::empty(), AcceptancePolicy::default(), ALL_WRONG, ALL_RIGHT)
            .initiate()
            .unwrap();
        assert!(artifact.is_model_accepted);
    }

    #[test]
    fn test_incumbent_policy_accepts_when_best_scores_higher() {
        let fx = Fixture::new();
        let storage = FakeStorage::holding(b"best");

        let accepted = stage(&fx, storage.clone(), AcceptancePolicy::IncumbentOutperforms, HALF_RIGHT, ALL_RIGHT)
            .initiate()
            .unwrap();
        assert!(accepted.is_model_accepted);

        let rejected = stage(&fx, storage, AcceptancePolicy::IncumbentOutperforms, ALL_RIGHT, HALF_RIGHT)
            .initiate()
            .unwrap();
        assert!(!rejected.is_model_accepted);
    }

    #[test]
    fn test_challenger_policy_accepts_when_trained_scores_higher() {
        let fx = Fixture::new();
        let storage = FakeStorage::holding(b"best");

        let accepted = stage(&fx, storage.clone(), AcceptancePolicy::ChallengerOutperforms, ALL_RIGHT, HALF_RIGHT)
            .initiate()
            .unwrap();
        assert!(accepted.is_model_accepted);

        let rejected = stage(&fx, storage, AcceptancePolicy::ChallengerOutperforms, HALF_RIGHT, ALL_RIGHT)
            .initiate()
            .unwrap();
        assert!(!rejected.is_model_accepted);
    }

    #[test]
    fn test_equal_accuracy_is_never_accepted_with_a_reference() {
        let fx = Fixture::new();
        for policy in [AcceptancePolicy::IncumbentOutperforms, AcceptancePolicy::ChallengerOutperforms] {
            let artifact = stage(&fx, FakeStorage::holding(b"best"), policy, HALF_RIGHT, HALF_RIGHT)
                .initiate()
                .unwrap();
            assert!(!artifact.is_model_accepted);
        }
    }

    #[test]
    fn test_score_uses_the_model_it_is_given() {
        let fx = Fixture::new();
        let st = stage(&fx, FakeStorage::empty(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT);

        assert_eq!(st.score(&FakeClassifier::new(ALL_RIGHT.to_vec())).unwrap(), 1.0);
        assert_eq!(st.score(&FakeClassifier::new(ALL_WRONG.to_vec())).unwrap(), 0.0);
    }

    #[test]
    fn test_score_of_four_row_example() {
        let fx = Fixture::new();
        let st = stage(&fx, FakeStorage::empty(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT);

        // predicted [0, 1, 0, 0] against [0, 1, 1, 0]
        let model = FakeClassifier::new(vec![0.2, 0.9, 0.4, 0.1]);
        let first = st.score(&model).unwrap();
        assert!((first - 0.75).abs() < 1e-12);
        assert_eq!(st.score(&model).unwrap(), first);
    }

    #[test]
    fn test_score_sees_padded_rows() {
        let fx = Fixture::new();
        let st = stage(&fx, FakeStorage::empty(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT);

        let model = FakeClassifier::new(HALF_RIGHT.to_vec());
        st.score(&model).unwrap();
        let rows = model.seen_rows();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.len() == fx.max_len));
    }

    #[test]
    fn test_fetch_reference_model_creates_dir_and_pulls_by_name() {
        let fx = Fixture::new();
        let storage = FakeStorage::empty();
        let st = stage(&fx, storage.clone(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT);

        let path = st.fetch_reference_model().unwrap();
        assert_eq!(path, fx.best_model_dir().join("model.mpk"));
        assert!(fx.best_model_dir().is_dir());
        assert!(!path.exists());
        assert_eq!(
            storage.pulls(),
            vec![("models".to_string(), "model.mpk".to_string(), fx.best_model_dir())]
        );
    }

    #[test]
    fn test_storage_failure_surfaces_as_evaluation_error() {
        let fx = Fixture::new();
        let err = stage(&fx, FakeStorage::failing(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT)
            .initiate()
            .unwrap_err();
        assert_eq!(err.operation, "initiate");
        assert!(matches!(err.fault(), StageFault::Storage { .. }));
    }

    #[test]
    fn test_missing_tokenizer_fails_scoring() {
        let fx = Fixture::new();
        let loader = FakeLoader::new().with_model("trained", HALF_RIGHT.to_vec());
        let config = EvaluationConfig {
            tokenizer_path: fx.dir().join("tokenizer.pickle"),
            ..fx.evaluation_config()
        };
        let st = ModelEvaluation::new(config, fx.trainer_artifact(), TransformationArtifact::default(), FakeStorage::empty(), loader);

        let err = st.score(&FakeClassifier::new(HALF_RIGHT.to_vec())).unwrap_err();
        assert_eq!(err.operation, "score");
        assert!(matches!(err.fault(), StageFault::Tokenizer { .. }));
    }

    #[test]
    fn test_score_rejects_zero_width_rows() {
        let fx = Fixture::new();
        let loader = FakeLoader::new();
        let config = EvaluationConfig { max_len: 0, ..fx.evaluation_config() };
        let st = ModelEvaluation::new(config, fx.trainer_artifact(), TransformationArtifact::default(), FakeStorage::empty(), loader);

        let model = FakeClassifier::new(HALF_RIGHT.to_vec());
        let err = st.score(&model).unwrap_err();
        assert_eq!(err.operation, "score");
        assert!(matches!(err.fault(), StageFault::Config(_)));
        assert!(model.seen_rows().is_empty());
    }

    #[test]
    fn test_wrong_prediction_count_is_inference_fault() {
        let fx = Fixture::new();
        let st = stage(&fx, FakeStorage::empty(), AcceptancePolicy::default(), HALF_RIGHT, ALL_RIGHT);
        let err = st.score(&FakeClassifier::new(vec![0.3])).unwrap_err();
        assert!(matches!(err.fault(), StageFault::Inference(_)));
    }

    #[test]
    fn test_unloadable_trained_model_is_reported() {
        let fx = Fixture::new();
        let loader = FakeLoader::new(); // knows no models
        let st = ModelEvaluation::new(
            fx.evaluation_config(),
            fx.trainer_artifact(),
            TransformationArtifact::default(),
            FakeStorage::empty(),
            loader,
        );
        let err = st.initiate().unwrap_err();
        assert!(matches!(err.fault(), StageFault::ModelLoad { .. }));
    }

    // ─── With a real Burn bundle and a local bucket ───────────────────────────

    mod with_burn_bundle {
        use super::*;
        use crate::infra::{model_bundle::save_bundle, storage::LocalBucketSync};
        use crate::ml::{classifier::BurnModelLoader, model::{TextClassifierConfig, TextClassifierModel}};
        use burn::backend::{ndarray::NdArrayDevice, NdArray};
        use std::path::Path;

        fn write_bundle(path: &Path, max_len: usize) {
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            let config = TextClassifierConfig::new(50, max_len).with_d_embed(8).with_d_hidden(4);
            let model: TextClassifierModel<NdArray> = config.init(&NdArrayDevice::default());
            save_bundle(&model, &config, path).unwrap();
        }

        fn burn_stage(fx: &Fixture, bucket_root: &Path) -> ModelEvaluation<LocalBucketSync, BurnModelLoader> {
            let artifact = fx.trainer_artifact();
            write_bundle(&artifact.trained_model_path, fx.max_len);
            ModelEvaluation::new(
                fx.evaluation_config(),
                artifact,
                TransformationArtifact::default(),
                LocalBucketSync::new(bucket_root),
                BurnModelLoader::new(2),
            )
        }

        #[test]
        fn test_first_model_is_accepted() {
            let fx     = Fixture::new();
            let bucket = tempfile::tempdir().unwrap();

            let artifact = burn_stage(&fx, bucket.path()).initiate().unwrap();
            assert!(artifact.is_model_accepted);
        }

        #[test]
        fn test_identical_reference_model_is_not_beaten() {
            let fx     = Fixture::new();
            let bucket = tempfile::tempdir().unwrap();
            let stage  = burn_stage(&fx, bucket.path());

            let remote = bucket.path().join("models/model.mpk");
            std::fs::create_dir_all(remote.parent().unwrap()).unwrap();
            std::fs::copy(&fx.trainer_artifact().trained_model_path, &remote).unwrap();

            let artifact = stage.initiate().unwrap();
            assert!(!artifact.is_model_accepted);
            assert!(fx.best_model_dir().join("model.mpk").is_file());
        }
    }
}
