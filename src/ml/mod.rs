// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
// Burn code that runs the classifier:
//
//   model.rs      — Embedding → LSTM → sigmoid head architecture
//                   (only rebuilt to receive saved weights; no
//                   training happens in this crate)
//
//   classifier.rs — BurnClassifier: a loaded bundle on the CPU
//                   backend, predicting in DataLoader batches.
//                   BurnModelLoader plugs it into the stages.

/// Text classifier architecture
pub mod model;

/// Batched inference behind the BinaryClassifier trait
pub mod classifier;
