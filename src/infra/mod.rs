// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Cross-cutting concerns used by the stages:
//
//   model_bundle.rs    — single-file model format (config header +
//                        Burn MessagePack weights)
//
//   tokenizer_store.rs — loads the training-time tokenizer from an
//                        explicit path; can fit a new vocabulary
//
//   storage.rs         — RemoteStorage backends (gsutil, local dir)
//
//   metrics.rs         — thresholding, confusion matrix, loss and
//                        accuracy for one scoring pass

/// Model bundle save/load
pub mod model_bundle;

/// Tokenizer loading and fitting
pub mod tokenizer_store;

/// Remote bucket sync
pub mod storage;

/// Evaluation metrics
pub mod metrics;
