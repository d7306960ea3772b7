// Defaults shared by the CLI and the stage configs.

/// Bucket holding the promoted model.
pub const BUCKET_NAME: &str = "tweet-classifier-models";

/// Object name of the model bundle, both locally and in the bucket.
pub const MODEL_NAME: &str = "model.mpk";

/// Where the promoted model is pulled to before scoring.
pub const BEST_MODEL_DIR: &str = "artifacts/best_model";

pub const TRAINED_MODEL_DIR: &str = "artifacts/trained_model";

pub const TOKENIZER_PATH: &str = "artifacts/tokenizer.json";

pub const X_TEST_PATH: &str = "artifacts/x_test.csv";
pub const Y_TEST_PATH: &str = "artifacts/y_test.csv";

/// Name of the raw-text column in the test feature CSV.
pub const TEXT_COLUMN: &str = "tweet";

/// Token sequences are padded / truncated to this length.
pub const MAX_LEN: usize = 300;

pub const EVAL_BATCH_SIZE: usize = 32;

/// Probabilities at or above this value are class 1.
pub const PREDICTION_THRESHOLD: f32 = 0.5;
