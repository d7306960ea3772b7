// ============================================================
// Layer 6 — Remote Storage Backends
// ============================================================
// Two RemoteStorage implementations:
//
//   GsutilSync      — Google Cloud Storage through the `gsutil`
//                     CLI, object by object:
//                       pull: gsutil cp gs://<bucket>/<obj> <dest>/<obj>
//                       push: gsutil cp <src>/<obj> gs://<bucket>/<obj>
//
//   LocalBucketSync — a directory standing in for the bucket
//                     service: <root>/<bucket>/<obj>. Used for
//                     offline runs and in tests.
//
// Neither retries or verifies; the stages decide what a missing
// file means.

use anyhow::{bail, Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use crate::domain::traits::RemoteStorage;

// ─── GsutilSync ───────────────────────────────────────────────────────────────
pub struct GsutilSync {
    program: String,
}

impl GsutilSync {
    pub fn new() -> Self {
        Self { program: "gsutil".to_string() }
    }

    /// Use a different executable (a wrapper script, a pinned SDK path...)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn copy(&self, from: &str, to: &str) -> Result<std::process::Output> {
        tracing::debug!("{} cp {} {}", self.program, from, to);
        Command::new(&self.program)
            .args(["cp", from, to])
            .output()
            .with_context(|| format!("cannot run '{}'", self.program))
    }
}

impl Default for GsutilSync {
    fn default() -> Self {
        Self::new()
    }
}

impl RemoteStorage for GsutilSync {
    fn pull(&self, bucket: &str, object_name: &str, dest_dir: &Path) -> Result<()> {
        let from = format!("gs://{bucket}/{object_name}");
        let to   = dest_dir.join(object_name);
        let output = self.copy(&from, &to.to_string_lossy())?;

        if output.status.success() {
            tracing::info!("Pulled {} into '{}'", from, dest_dir.display());
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        if is_missing_object(&stderr) {
            tracing::info!("{} does not exist yet, nothing pulled", from);
            return Ok(());
        }
        bail!("gsutil cp {} failed ({}): {}", from, output.status, stderr.trim())
    }

    fn push(&self, bucket: &str, src_dir: &Path, object_name: &str) -> Result<()> {
        let from = src_dir.join(object_name);
        let to   = format!("gs://{bucket}/{object_name}");
        let output = self.copy(&from.to_string_lossy(), &to)?;

        if !output.status.success() {
            bail!(
                "gsutil cp {} failed ({}): {}",
                from.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        tracing::info!("Pushed '{}' to {}", from.display(), to);
        Ok(())
    }
}

/// gsutil reports an absent source object this way on every platform.
fn is_missing_object(stderr: &str) -> bool {
    stderr.contains("No URLs matched") || stderr.contains("matched no objects")
}

// ─── LocalBucketSync ──────────────────────────────────────────────────────────
pub struct LocalBucketSync {
    root: PathBuf,
}

impl LocalBucketSync {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, object_name: &str) -> PathBuf {
        self.root.join(bucket).join(object_name)
    }
}

impl RemoteStorage for LocalBucketSync {
    fn pull(&self, bucket: &str, object_name: &str, dest_dir: &Path) -> Result<()> {
        let src = self.object_path(bucket, object_name);
        if !src.is_file() {
            tracing::info!("'{}' does not exist yet, nothing pulled", src.display());
            return Ok(());
        }

        fs::create_dir_all(dest_dir)
            .with_context(|| format!("cannot create '{}'", dest_dir.display()))?;
        let dest = dest_dir.join(object_name);
        fs::copy(&src, &dest)
            .with_context(|| format!("cannot copy '{}' to '{}'", src.display(), dest.display()))?;

        tracing::info!("Pulled '{}' into '{}'", src.display(), dest_dir.display());
        Ok(())
    }

    fn push(&self, bucket: &str, src_dir: &Path, object_name: &str) -> Result<()> {
        let src  = src_dir.join(object_name);
        let dest = self.object_path(bucket, object_name);

        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("cannot create bucket dir '{}'", parent.display()))?;
        }
        fs::copy(&src, &dest)
            .with_context(|| format!("cannot copy '{}' to '{}'", src.display(), dest.display()))?;

        tracing::info!("Pushed '{}' to '{}'", src.display(), dest.display());
        Ok(())
    }
}
