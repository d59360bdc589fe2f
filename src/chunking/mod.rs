//! Fixed-size, overlapping passage chunker.
//!
//! Offsets are counted in characters (Unicode scalar values), so a passage never splits a
//! UTF-8 sequence. Consecutive passages overlap by `size - step` characters.


use serde::Serialize;
use thiserror::Error;

use crate::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_CHUNK_STEP};

/// Errors returned when constructing a [`Chunker`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// Passage size must be at least one character.
    #[error("chunk size must be greater than zero")]
    ZeroSize,

    /// Step must satisfy `0 < step <= size`.
    #[error("chunk step {step} must be between 1 and the chunk size {size}")]
    InvalidStep {
        /// Requested step.
        step: usize,
        /// Requested size.
        size: usize,
    },
}

/// A contiguous slice of the corpus text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    ordinal: usize,
    text: String,
}

impl Passage {
    /// Creates a passage at `ordinal`.
    pub fn new(ordinal: usize, text: impl Into<String>) -> Self {
        Self {
            ordinal,
            text: text.into(),
        }
    }

    /// Position of the passage in the corpus; doubles as its lookup key.
    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Passage text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Length of the passage in characters.
    #[inline]
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Splits text into passages of `size` characters, starting every `step` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    size: usize,
    step: usize,
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            size: DEFAULT_CHUNK_SIZE,
            step: DEFAULT_CHUNK_STEP,
        }
    }
}

impl Chunker {
    /// Creates a chunker; requires `size > 0` and `0 < step <= size`.
    pub fn new(size: usize, step: usize) -> Result<Self, ChunkError> {
        if size == 0 {
            return Err(ChunkError::ZeroSize);
        }
        if step == 0 || step > size {
            return Err(ChunkError::InvalidStep { step, size });
        }
        Ok(Self { size, step })
    }

    /// Passage size in characters.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Step between passage starts in characters.
    #[inline]
    pub fn step(&self) -> usize {
        self.step
    }

    /// Characters shared by consecutive passages.
    #[inline]
    pub fn overlap(&self) -> usize {
        self.size - self.step
    }

    /// Number of passages [`chunk`](Self::chunk) produces for `char_len` characters.
    #[inline]
    pub fn expected_passages(&self, char_len: usize) -> usize {
        char_len.div_ceil(self.step)
    }

    /// Chunks `full_text` into ordered passages.
    ///
    /// Empty input yields no passages. The final passage may be shorter than `size` and is
    /// still emitted.
    pub fn chunk(&self, full_text: &str) -> Vec<Passage> {
        // Byte offset of every character start, plus the end of the text.
        let boundaries: Vec<usize> = full_text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(full_text.len()))
            .collect();
        let char_len = boundaries.len() - 1;

        let mut passages = Vec::with_capacity(self.expected_passages(char_len));
        let mut offset = 0;
        while offset < char_len {
            let end = (offset + self.size).min(char_len);
            let text = &full_text[boundaries[offset]..boundaries[end]];
            passages.push(Passage::new(passages.len(), text));
            offset += self.step;
        }

        passages
    }
}
