// ============================================================
// Layer 2 — ClassifyUseCase
// ============================================================
// Loads the trained artifacts and classifies one description.
//
// Assembly order matters for error quality:
//   1. label set   — cheap, fails with "run train first"
//   2. tokenizer   — cheap, same failure mode
//   3. classifier  — rebuilds the model from the recorded
//                    config, cross-checks it against the label
//                    set, then loads the weights
//
// All three come from the SAME artifacts directory; the
// consistency checks in Classifier::from_artifacts are what
// stand between a stale directory and a silently wrong answer.
//
// Reference: Rust Book §9 (Error Handling)

use anyhow::Result;

use crate::domain::label_set::LabelSet;
use crate::domain::traits::Persistable;
use crate::infra::checkpoint::CheckpointManager;
use crate::infra::tokenizer_store::TokenizerStore;
use crate::ml::inferencer::{Classifier, Prediction};

pub struct ClassifyUseCase {
    classifier: Classifier,
}

impl ClassifyUseCase {
    /// Load all artifacts from the given directory.
    pub fn new(artifacts_dir: &str) -> Result<Self> {
        let ckpt_manager = CheckpointManager::new(artifacts_dir);

        let labels    = LabelSet::load(&ckpt_manager.labels_path())?;
        let tokenizer = TokenizerStore::new(artifacts_dir).load()?;

        let classifier = Classifier::from_artifacts(&ckpt_manager, labels, tokenizer)?;
        Ok(Self { classifier })
    }

    /// Predict the major lithology code for one description.
    pub fn classify(&self, description: &str) -> Result<Prediction> {
        self.classifier.predict(description)
    }
}
