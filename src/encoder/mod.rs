//! Text encoding to fixed-length id sequences.
//!
//! The pretrained tokenizer is an external collaborator: the pipeline only
//! needs raw ids out of it and handles padding/truncation itself.

mod hashing;
mod pretrained;

pub use hashing::HashingEncoder;
pub use pretrained::PretrainedEncoder;

use crate::error::Result;

/// Fixed-length encoded sample. Both vectors are exactly `max_length` long;
/// the mask marks real tokens with 1 and padding with 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedSample {
    pub token_ids: Vec<u32>,
    pub attention_mask: Vec<u8>,
}

impl TokenizedSample {
    /// Number of real (non-padding) tokens.
    pub fn real_tokens(&self) -> usize {
        self.attention_mask.iter().map(|&m| m as usize).sum()
    }
}

/// Anything that maps text to token ids.
///
/// Implementations must return an empty id list for empty or whitespace-only
/// text instead of erroring; degenerate text is a normal outcome of cleaning.
pub trait TextEncoder: Send + Sync {
    /// Unpadded token ids, special tokens included where the backend has them.
    fn encode(&self, text: &str) -> Result<Vec<u32>>;

    /// Id used to pad out short sequences.
    fn pad_id(&self) -> u32;

    /// Encodes and pads/truncates to exactly `max_length`.
    fn encode_padded(&self, text: &str, max_length: usize) -> Result<TokenizedSample> {
        let mut ids = self.encode(text)?;
        ids.truncate(max_length);
        let real = ids.len();
        ids.resize(max_length, self.pad_id());

        let mut attention_mask = vec![1u8; real];
        attention_mask.resize(max_length, 0);

        Ok(TokenizedSample {
            token_ids: ids,
            attention_mask,
        })
    }
}
