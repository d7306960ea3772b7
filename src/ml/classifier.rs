// ============================================================
// Layer 5 — Burn Classifier
// ============================================================
use anyhow::{bail, Result};
use burn::data::dataloader::DataLoaderBuilder;
use std::path::Path;

use crate::data::{batcher::SequenceBatcher, dataset::SequenceDataset};
use crate::domain::error::StageFault;
use crate::domain::traits::{BinaryClassifier, ModelLoader};
use crate::infra::model_bundle::load_bundle;
use crate::ml::model::TextClassifierModel;

type InferBackend = burn::backend::NdArray;
type InferDevice  = burn::backend::ndarray::NdArrayDevice;

/// A model bundle loaded onto the CPU for scoring.
pub struct BurnClassifier {
    model:      TextClassifierModel<InferBackend>,
    device:     InferDevice,
    batch_size: usize,
}

impl BurnClassifier {
    pub fn from_bundle(path: &Path, batch_size: usize) -> Result<Self, StageFault> {
        let device = InferDevice::default();
        let (_, model) = load_bundle::<InferBackend>(path, &device)?;
        let classifier = Self { model, device, batch_size };
        tracing::info!(
            "Model loaded from '{}' (vocabulary of {})",
            path.display(),
            classifier.vocab_size(),
        );
        Ok(classifier)
    }

    pub fn vocab_size(&self) -> usize {
        self.model.vocab_size
    }
}

impl BinaryClassifier for BurnClassifier {
    fn predict(&self, rows: &[Vec<u32>]) -> Result<Vec<f32>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Embedding lookups past the table would panic inside the backend
        let width = rows[0].len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                bail!("row {i} has {} tokens, expected {width}", row.len());
            }
            if let Some(&id) = row.iter().find(|&&id| id as usize >= self.model.vocab_size) {
                bail!("row {i}: token id {id} is outside the model vocabulary ({})", self.model.vocab_size);
            }
        }

        let batcher = SequenceBatcher::<InferBackend>::new(self.device.clone());
        let loader  = DataLoaderBuilder::new(batcher)
            .batch_size(self.batch_size)
            .build(SequenceDataset::new(rows));

        let mut probabilities = Vec::with_capacity(rows.len());
        for batch in loader.iter() {
            let probs = self.model.forward(batch.token_ids); // [batch, 1]
            let values = probs
                .into_data()
                .to_vec::<f32>()
                .map_err(|e| anyhow::anyhow!("cannot read predictions: {e:?}"))?;
            probabilities.extend(values);
        }

        tracing::debug!("Predicted {} rows in batches of {}", probabilities.len(), self.batch_size);
        Ok(probabilities)
    }
}

/// Loads model bundles as [`BurnClassifier`]s.
pub struct BurnModelLoader {
    batch_size: usize,
}

impl BurnModelLoader {
    pub fn new(batch_size: usize) -> Self {
        Self { batch_size }
    }
}

impl ModelLoader for BurnModelLoader {
    type Model = BurnClassifier;

    fn load(&self, path: &Path) -> Result<BurnClassifier, StageFault> {
        BurnClassifier::from_bundle(path, self.batch_size)
    }
}
