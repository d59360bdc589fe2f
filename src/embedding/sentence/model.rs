use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use tokenizers::{Tokenizer, TruncationParams};

use super::config::SentenceConfig;
use crate::embedding::error::EmbeddingError;

/// BERT encoder with attention-masked mean pooling over the last hidden state.
pub(crate) struct MeanPooledBert {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    hidden_size: usize,
}

impl MeanPooledBert {
    pub(crate) fn load(config: &SentenceConfig, device: Device) -> Result<Self, EmbeddingError> {
        let config_content = std::fs::read_to_string(config.file("config.json"))?;
        let bert_config: Config =
            serde_json::from_str(&config_content).map_err(|e| EmbeddingError::ModelLoadFailed {
                reason: format!("Failed to parse config.json: {}", e),
            })?;

        let weights = config.file("model.safetensors");
        // SAFETY: the weights file is opened read-only and must not be modified while mapped.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };

        // Sentence-transformers exports store weights with or without the `bert.` prefix.
        let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
            BertModel::load(vb.pp("bert"), &bert_config)?
        } else {
            BertModel::load(vb, &bert_config)?
        };

        let mut tokenizer = Tokenizer::from_file(config.file("tokenizer.json")).map_err(|e| {
            EmbeddingError::TokenizationFailed {
                reason: format!("Failed to load tokenizer: {}", e),
            }
        })?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: config.max_seq_len,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::TokenizationFailed {
                reason: format!("Failed to configure truncation: {}", e),
            })?;
        tokenizer.with_padding(None);

        Ok(Self {
            model,
            tokenizer,
            device,
            hidden_size: bert_config.hidden_size,
        })
    }

    pub(crate) fn hidden_size(&self) -> usize {
        self.hidden_size
    }

    pub(crate) fn device(&self) -> &Device {
        &self.device
    }

    /// Returns the mean-pooled (not yet normalized) embedding of `text`.
    pub(crate) fn encode(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let encoding =
            self.tokenizer
                .encode(text, true)
                .map_err(|e| EmbeddingError::TokenizationFailed {
                    reason: e.to_string(),
                })?;

        let ids = encoding.get_ids();
        if ids.is_empty() {
            return Ok(vec![0.0; self.hidden_size]);
        }

        // Shapes: ids/mask [1, seq_len], hidden [1, seq_len, hidden_size].
        let input_ids = Tensor::new(ids, &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;

        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?;
        let pooled = summed.broadcast_div(&counts)?.squeeze(0)?;

        Ok(pooled.to_vec1::<f32>()?)
    }
}
