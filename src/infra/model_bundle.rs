// ============================================================
// Layer 6 — Model Bundle
// ============================================================
// A model travels between the trainer, the bucket, and this
// stage as ONE file, because remote sync copies single objects:
//
//   {"vocab_size":5000,"max_len":300,"d_embed":100,"d_hidden":100}\n
//   <named MessagePack record of the weights>
//
// The first line is the architecture config; it is needed to
// rebuild the module before the weights can be loaded into it.
// Loading fails if the record does not match the architecture.

use anyhow::anyhow;
use burn::{
    prelude::*,
    record::{FullPrecisionSettings, NamedMpkBytesRecorder, Recorder},
};
use std::{fs, path::Path};

use crate::domain::error::StageFault;
use crate::ml::model::{TextClassifierConfig, TextClassifierModel};

type BundleRecorder = NamedMpkBytesRecorder<FullPrecisionSettings>;

/// Write `model` and its config to `path` as a single bundle file.
/// Bundles are produced by the training stage; this writer exists for tests.
#[cfg(test)]
pub fn save_bundle<B: Backend>(
    model:  &TextClassifierModel<B>,
    config: &TextClassifierConfig,
    path:   &Path,
) -> Result<(), StageFault> {
    let load_err = |source: anyhow::Error| StageFault::ModelLoad { path: path.to_path_buf(), source };

    let header = serde_json::to_vec(config).map_err(|e| load_err(e.into()))?;
    let weights = Recorder::<B>::record(&BundleRecorder::default(), model.clone().into_record(), ())
        .map_err(|e| load_err(anyhow!("cannot encode weights: {e:?}")))?;

    let mut bytes = header;
    bytes.push(b'\n');
    bytes.extend_from_slice(&weights);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| StageFault::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| StageFault::io(path, e))?;

    tracing::debug!("Saved model bundle to '{}'", path.display());
    Ok(())
}

/// Rebuild the architecture from the header line, then load the weights into it.
pub fn load_bundle<B: Backend>(
    path:   &Path,
    device: &B::Device,
) -> Result<(TextClassifierConfig, TextClassifierModel<B>), StageFault> {
    let load_err = |source: anyhow::Error| StageFault::ModelLoad { path: path.to_path_buf(), source };

    let bytes = fs::read(path).map_err(|e| StageFault::io(path, e))?;

    let split = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| load_err(anyhow!("missing config header line")))?;
    let (header, weights) = (&bytes[..split], &bytes[split + 1..]);

    let config: TextClassifierConfig = serde_json::from_slice(header)
        .map_err(|e| load_err(anyhow!("bad config header: {e}")))?;

    let record = Recorder::<B>::load(&BundleRecorder::default(), weights.to_vec(), device)
        .map_err(|e| load_err(anyhow!("cannot decode weights: {e:?}")))?;
    let model = config.init::<B>(device).load_record(record);

    tracing::debug!(
        "Loaded model bundle '{}' (vocab_size={}, max_len={})",
        path.display(),
        config.vocab_size,
        config.max_len,
    );
    Ok((config, model))
}
