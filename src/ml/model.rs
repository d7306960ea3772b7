use burn::{
    nn::{
        lstm::{Lstm, LstmConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

// #[derive(Config)] already provides Clone + Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct TextClassifierConfig {
    pub vocab_size: usize,
    pub max_len:    usize,
    #[config(default = 100)]
    pub d_embed:    usize,
    #[config(default = 100)]
    pub d_hidden:   usize,
}

impl TextClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> TextClassifierModel<B> {
        let embedding = EmbeddingConfig::new(self.vocab_size, self.d_embed).init(device);
        let lstm      = LstmConfig::new(self.d_embed, self.d_hidden, true).init(device);
        let output    = LinearConfig::new(self.d_hidden, 1).init(device);
        TextClassifierModel { embedding, lstm, output, vocab_size: self.vocab_size }
    }
}

/// Embedding → LSTM → dense sigmoid head. Binary text classifier.
#[derive(Module, Debug)]
pub struct TextClassifierModel<B: Backend> {
    pub embedding:  Embedding<B>,
    pub lstm:       Lstm<B>,
    pub output:     Linear<B>,
    pub vocab_size: usize,
}

impl<B: Backend> TextClassifierModel<B> {
    /// token_ids: [batch, seq_len] → probabilities: [batch, 1]
    pub fn forward(&self, token_ids: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let x = self.embedding.forward(token_ids); // [batch, seq_len, d_embed]

        // Rows are front-padded, so the final hidden state follows the real tokens.
        let (_, state) = self.lstm.forward(x, None);
        let logits = self.output.forward(state.hidden); // [batch, 1]

        burn::tensor::activation::sigmoid(logits)
    }
}
