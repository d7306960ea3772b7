// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From the test split on disk to tensor batches:
//
//   x_test.csv / y_test.csv
//       │
//       ▼
//   TestSplitLoader   → raw texts + 0/1 labels
//       │
//       ▼
//   SequenceEncoder   → tokenise, drop OOV, pad to max_len
//       │
//       ▼
//   SequenceDataset   → implements Burn's Dataset trait
//       │
//       ▼
//   SequenceBatcher   → stacks rows into [batch, max_len] tensors

/// Reads the held-out test CSVs
pub mod test_split;

/// Tokenisation and pre-padding
pub mod sequences;

/// Burn Dataset over padded rows
pub mod dataset;

/// Burn Batcher producing Int tensors
pub mod batcher;
