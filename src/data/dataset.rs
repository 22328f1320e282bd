use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

/// One fully tokenised and padded classification sample.
/// Sequence format: [CLS] description [SEP] [PAD]...
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LithoSample {
    pub input_ids:      Vec<u32>,
    pub attention_mask: Vec<u32>,
    /// Class index into the LabelSet
    pub label:          usize,
}

impl LithoSample {
    /// Number of non-padding positions
    pub fn real_len(&self) -> usize {
        self.attention_mask.iter().filter(|&&m| m == 1).count()
    }
}

pub struct LithoDataset {
    samples: Vec<LithoSample>,
}

impl LithoDataset {
    pub fn new(samples: Vec<LithoSample>) -> Self { Self { samples } }

    pub fn sample_count(&self) -> usize { self.samples.len() }
}

impl Dataset<LithoSample> for LithoDataset {
    fn get(&self, index: usize) -> Option<LithoSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
