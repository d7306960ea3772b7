// ============================================================
// Layer 4 — Sequence Batcher
// ============================================================
// Implements Burn's Batcher trait: stacks N padded rows of
// length S into one [N, S] Int tensor on the target device.
//
//   [r1_t1, ..., r1_tS, r2_t1, ..., rN_tS] → reshape → [N, S]
//
// Every row was padded to the same width by SequenceEncoder,
// so no dynamic padding is needed here.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SequenceItem;

#[derive(Debug, Clone)]
pub struct SequenceBatch<B: Backend> {
    /// Token ids — shape: [batch_size, seq_len]
    pub token_ids: Tensor<B, 2, Int>,
}

#[derive(Clone, Debug)]
pub struct SequenceBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SequenceBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SequenceItem, SequenceBatch<B>> for SequenceBatcher<B> {
    fn batch(&self, items: Vec<SequenceItem>) -> SequenceBatch<B> {
        let batch_size = items.len();
        let seq_len    = items.first().map(|i| i.token_ids.len()).unwrap_or(0);

        // Burn Int tensors are built from i32
        let flat: Vec<i32> = items
            .iter()
            .flat_map(|i| i.token_ids.iter().map(|&t| t as i32))
            .collect();

        let token_ids = Tensor::<B, 1, Int>::from_ints(flat.as_slice(), &self.device)
            .reshape([batch_size, seq_len]);

        SequenceBatch { token_ids }
    }
}
