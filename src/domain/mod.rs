// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain structs, enums and traits shared by every stage:
//
//   constants.rs — pipeline-wide defaults (bucket, model name, MAX_LEN)
//   config.rs    — per-stage configuration values
//   artifacts.rs — values handed from one pipeline stage to the next
//   error.rs     — the fault taxonomy and the per-stage wrapped errors
//   traits.rs    — collaborator seams (remote storage, classifier, loader)
//
// Rules for this layer:
//   - NO Burn framework types
//   - NO file I/O or network calls
//   - NO clap types (the CLI converts into these)

pub mod constants;

pub mod config;

pub mod artifacts;

pub mod error;

pub mod traits;
