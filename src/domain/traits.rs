// ============================================================
// Layer 3 — Collaborator Traits
// ============================================================
// The stages only see these traits. Concrete implementations:
//   - RemoteStorage   → GsutilSync, LocalBucketSync   (infra/storage.rs)
//   - BinaryClassifier → BurnClassifier               (ml/classifier.rs)
//   - ModelLoader      → BurnModelLoader              (ml/classifier.rs)
// Tests swap in in-memory fakes.

use anyhow::Result;
use std::path::Path;

use crate::domain::error::StageFault;

// ─── RemoteStorage ────────────────────────────────────────────────────────────
/// Object-level sync against a remote bucket.
pub trait RemoteStorage {
    /// Copy `bucket/object_name` into `dest_dir/object_name`.
    /// A missing object is not an error: nothing is written and the
    /// caller decides what an absent file means.
    fn pull(&self, bucket: &str, object_name: &str, dest_dir: &Path) -> Result<()>;

    /// Upload `src_dir/object_name` to `bucket/object_name`.
    fn push(&self, bucket: &str, src_dir: &Path, object_name: &str) -> Result<()>;
}

impl<S: RemoteStorage + ?Sized> RemoteStorage for Box<S> {
    fn pull(&self, bucket: &str, object_name: &str, dest_dir: &Path) -> Result<()> {
        (**self).pull(bucket, object_name, dest_dir)
    }

    fn push(&self, bucket: &str, src_dir: &Path, object_name: &str) -> Result<()> {
        (**self).push(bucket, src_dir, object_name)
    }
}

// ─── BinaryClassifier ─────────────────────────────────────────────────────────
/// A loaded model that scores padded token sequences.
pub trait BinaryClassifier {
    /// One probability of the positive class per row, in row order.
    fn predict(&self, rows: &[Vec<u32>]) -> Result<Vec<f32>>;
}

// ─── ModelLoader ──────────────────────────────────────────────────────────────
/// Turns a model file on disk into a classifier handle.
pub trait ModelLoader {
    type Model: BinaryClassifier;

    fn load(&self, path: &Path) -> std::result::Result<Self::Model, StageFault>;
}
