//! Deterministic hashing encoder.
//!
//! Whitespace-split tokens hashed into a fixed id space (FNV-1a). No vocab
//! file, no state, stable across runs and platforms. Backs the reference
//! classifier and the test suites; real runs load a pretrained tokenizer.

use crate::error::Result;

use super::TextEncoder;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Id 0 is reserved for padding; hashed ids land in `1..buckets`.
#[derive(Debug, Clone)]
pub struct HashingEncoder {
    buckets: u32,
}

impl HashingEncoder {
    pub fn new(buckets: u32) -> Self {
        assert!(buckets > 1, "need at least one non-padding bucket");
        Self { buckets }
    }

    pub fn buckets(&self) -> u32 {
        self.buckets
    }

    fn hash_token(&self, token: &str) -> u32 {
        let mut hash = FNV_OFFSET;
        for byte in token.as_bytes() {
            hash ^= u64::from(*byte);
            hash = hash.wrapping_mul(FNV_PRIME);
        }
        1 + (hash % u64::from(self.buckets - 1)) as u32
    }
}

impl Default for HashingEncoder {
    fn default() -> Self {
        Self::new(1 << 18)
    }
}

impl TextEncoder for HashingEncoder {
    fn encode(&self, text: &str) -> Result<Vec<u32>> {
        Ok(text
            .split_whitespace()
            .map(|token| self.hash_token(token))
            .collect())
    }

    fn pad_id(&self) -> u32 {
        0
    }
}
