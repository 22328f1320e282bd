use burn::{
    nn::{
        attention::{MultiHeadAttention, MultiHeadAttentionConfig},
        loss::CrossEntropyLossConfig,
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::backend::AutodiffBackend,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally — do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct LithoClassifierConfig {
    pub vocab_size:  usize,
    pub max_seq_len: usize,
    pub d_model:     usize,
    pub num_heads:   usize,
    pub num_layers:  usize,
    pub d_ff:        usize,
    pub dropout:     f64,
    pub num_labels:  usize,
}

impl LithoClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> LithoClassifierModel<B> {
        let token_embedding    = EmbeddingConfig::new(self.vocab_size, self.d_model).init(device);
        // Learned positions, table sized from max_seq_len — inputs can
        // never be longer than the table by construction.
        let position_embedding = EmbeddingConfig::new(self.max_seq_len, self.d_model).init(device);
        let layers: Vec<EncoderBlock<B>> = (0..self.num_layers)
            .map(|_| self.build_encoder_block(device))
            .collect();
        let final_norm = LayerNormConfig::new(self.d_model).init(device);
        let class_head = LinearConfig::new(self.d_model, self.num_labels).init(device);
        let dropout    = DropoutConfig::new(self.dropout).init();
        LithoClassifierModel {
            token_embedding, position_embedding, layers,
            final_norm, class_head, dropout,
            max_seq_len: self.max_seq_len,
            num_labels:  self.num_labels,
        }
    }

    fn build_encoder_block<B: Backend>(&self, device: &B::Device) -> EncoderBlock<B> {
        let self_attn   = MultiHeadAttentionConfig::new(self.d_model, self.num_heads)
            .with_dropout(self.dropout)
            .init(device);
        let ffn_linear1 = LinearConfig::new(self.d_model, self.d_ff).init(device);
        let ffn_linear2 = LinearConfig::new(self.d_ff, self.d_model).init(device);
        let norm1   = LayerNormConfig::new(self.d_model).init(device);
        let norm2   = LayerNormConfig::new(self.d_model).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        EncoderBlock { self_attn, ffn_linear1, ffn_linear2, norm1, norm2, dropout }
    }
}

#[derive(Module, Debug)]
pub struct EncoderBlock<B: Backend> {
    pub self_attn:   MultiHeadAttention<B>,
    pub ffn_linear1: Linear<B>,
    pub ffn_linear2: Linear<B>,
    pub norm1:       LayerNorm<B>,
    pub norm2:       LayerNorm<B>,
    pub dropout:     Dropout,
}

impl<B: Backend> EncoderBlock<B> {
    /// pad_mask: [batch, seq_len] Bool, true where the position is padding
    pub fn forward(&self, x: Tensor<B, 3>, pad_mask: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        use burn::nn::attention::MhaInput;
        let attn_input  = MhaInput::self_attn(x.clone()).mask_pad(pad_mask);
        let attn_output = self.self_attn.forward(attn_input).context;
        let x = self.norm1.forward(x + self.dropout.forward(attn_output));
        let ffn_out = self.ffn_linear2.forward(
            burn::tensor::activation::gelu(self.ffn_linear1.forward(x.clone()))
        );
        self.norm2.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct LithoClassifierModel<B: Backend> {
    pub token_embedding:    Embedding<B>,
    pub position_embedding: Embedding<B>,
    pub layers:             Vec<EncoderBlock<B>>,
    pub final_norm:         LayerNorm<B>,
    pub class_head:         Linear<B>,
    pub dropout:            Dropout,
    pub max_seq_len:        usize,
    pub num_labels:         usize,
}

impl<B: Backend> LithoClassifierModel<B> {
    /// input_ids, attention_mask: [batch, seq_len] → logits: [batch, num_labels]
    pub fn forward(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
    ) -> Tensor<B, 2> {
        let [batch_size, seq_len] = input_ids.dims();

        let tok_emb = self.token_embedding.forward(input_ids);

        // Self-attention is permutation-invariant, so position must be injected explicitly.
        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &tok_emb.device())
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        let pos_emb = self.position_embedding.forward(positions);

        // Padding positions are masked out of every attention score
        let pad_mask = attention_mask.equal_elem(0);

        let mut x = self.dropout.forward(tok_emb + pos_emb);
        for layer in &self.layers {
            x = layer.forward(x, pad_mask.clone());
        }
        let x = self.final_norm.forward(x); // [batch, seq_len, d_model]

        // Classify from the [CLS] position's hidden state
        let [_, _, d_model] = x.dims();
        let cls = x
            .slice([0..batch_size, 0..1, 0..d_model])
            .reshape([batch_size, d_model]);

        self.class_head.forward(cls) // [batch, num_labels]
    }

    /// Forward pass plus (optionally class-weighted) cross-entropy loss.
    pub fn forward_loss(
        &self,
        input_ids:      Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Int>,
        labels:         Tensor<B, 1, Int>,
        class_weights:  Option<&[f32]>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>)
    where
        B: AutodiffBackend,
    {
        let logits = self.forward(input_ids, attention_mask);

        let mut ce_cfg = CrossEntropyLossConfig::new();
        if let Some(w) = class_weights {
            // A weight vector of the wrong length would silently re-pair
            // classes and weights — refuse to train on one.
            assert_eq!(
                w.len(), self.num_labels,
                "class weight vector length {} does not match label count {}",
                w.len(), self.num_labels,
            );
            ce_cfg = ce_cfg.with_weights(Some(w.to_vec()));
        }
        let ce = ce_cfg.init(&logits.device());

        let loss = ce.forward(logits.clone(), labels);
        (loss, logits)
    }
}
