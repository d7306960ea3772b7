// ============================================================
// Layer 4 — Text → Token Sequence Matrix
// ============================================================
// Turns raw test texts into the fixed-width integer matrix the
// classifier was trained on:
//
//   1. Tokenise each text with the training-time tokenizer
//   2. Drop out-of-vocabulary words ([UNK]); training sequences
//      never contained them
//   3. Pad / truncate every row to `max_len`
//
// Padding and truncation both happen at the FRONT of the row,
// so the most recent tokens are the ones the model sees last:
//
//   max_len = 4
//   [7, 3]             → [0, 0, 7, 3]
//   [5, 6, 7, 8, 9, 2] → [7, 8, 9, 2]

use tokenizers::Tokenizer;

use crate::domain::error::StageFault;

/// Id written into padding slots.
pub const PAD_ID: u32 = 0;

const UNK_TOKEN: &str = "[UNK]";

pub struct SequenceEncoder<'a> {
    tokenizer: &'a Tokenizer,
    max_len:   usize,
}

impl<'a> SequenceEncoder<'a> {
    pub fn new(tokenizer: &'a Tokenizer, max_len: usize) -> Self {
        Self { tokenizer, max_len }
    }

    /// Encode every text into a row of exactly `max_len` ids.
    pub fn encode_all(&self, texts: &[String]) -> Result<Vec<Vec<u32>>, StageFault> {
        let unk_id = self.tokenizer.token_to_id(UNK_TOKEN);

        let sequences = texts
            .iter()
            .map(|text| {
                let enc = self
                    .tokenizer
                    .encode(text.as_str(), false)
                    .map_err(|e| StageFault::inference(format!("tokenisation error: {e}")))?;
                Ok(enc
                    .get_ids()
                    .iter()
                    .copied()
                    .filter(|&id| Some(id) != unk_id && id != PAD_ID)
                    .collect())
            })
            .collect::<Result<Vec<Vec<u32>>, StageFault>>()?;

        Ok(pad_sequences(sequences, self.max_len))
    }
}

/// Left-pad with [`PAD_ID`] and keep the last `max_len` ids of long rows.
pub fn pad_sequences(sequences: Vec<Vec<u32>>, max_len: usize) -> Vec<Vec<u32>> {
    sequences
        .into_iter()
        .map(|seq| {
            if seq.len() >= max_len {
                seq[seq.len() - max_len..].to_vec()
            } else {
                let mut row = vec![PAD_ID; max_len - seq.len()];
                row.extend(seq);
                row
            }
        })
        .collect()
}
