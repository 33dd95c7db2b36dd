//! Wrapper over a pretrained `tokenizers` vocabulary file.

use std::path::Path;

use tokenizers::Tokenizer;

use crate::error::{Result, ToxPipeError};

use super::TextEncoder;

/// Pretrained subword tokenizer loaded from a `tokenizer.json` file.
///
/// Special tokens are added by the backend; this wrapper only resolves the
/// padding id and hands raw ids to the pipeline.
pub struct PretrainedEncoder {
    inner: Tokenizer,
    pad_id: u32,
}

impl PretrainedEncoder {
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ToxPipeError::FileNotFound(path.to_path_buf()));
        }
        let inner = Tokenizer::from_file(path)
            .map_err(|e| ToxPipeError::EncoderLoad(e.to_string()))?;

        let pad_id = inner
            .get_padding()
            .map(|params| params.pad_id)
            .or_else(|| inner.token_to_id("<pad>"))
            .or_else(|| inner.token_to_id("[PAD]"))
            .unwrap_or(0);

        Ok(Self { inner, pad_id })
    }

    /// Size of the id space including added tokens. Classifiers index their
    /// embedding tables with this.
    pub fn vocab_size(&self) -> u32 {
        self.inner.get_vocab_size(true) as u32
    }
}

impl TextEncoder for PretrainedEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        let encoding = self
            .inner
            .encode(text, true)
            .map_err(|e| ToxPipeError::Encoder(e.to_string()))?;
        Ok(encoding.get_ids().to_vec())
    }

    fn pad_id(&self) -> u32 {
        self.pad_id
    }
}
