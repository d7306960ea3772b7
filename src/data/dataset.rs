use burn::data::dataset::Dataset;

/// One padded token row, ready for batching.
#[derive(Debug, Clone)]
pub struct SequenceItem {
    pub token_ids: Vec<u32>,
}

pub struct SequenceDataset {
    items: Vec<SequenceItem>,
}

impl SequenceDataset {
    pub fn new(rows: &[Vec<u32>]) -> Self {
        let items = rows
            .iter()
            .map(|r| SequenceItem { token_ids: r.clone() })
            .collect();
        Self { items }
    }
}

impl Dataset<SequenceItem> for SequenceDataset {
    fn get(&self, index: usize) -> Option<SequenceItem> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}
