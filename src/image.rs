use serde::{Deserialize, Serialize};

use crate::error::ImageError;

pub const DEFAULT_CAPACITY: u16 = 1024;

/// Random access to emitted words, used by patch-back.
pub trait WordStore {
    fn read_word(&self, location: usize) -> Result<u16, ImageError>;
    fn write_word(&mut self, location: usize, word: u16) -> Result<(), ImageError>;
}

/// Append-only sequence of assembled words, indexed by location counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputImage {
    words: Vec<u16>,
    capacity: usize,
}

impl Default for OutputImage {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl OutputImage {
    pub fn new(capacity: u16) -> Self {
        Self {
            words: Vec::with_capacity(capacity as usize),
            capacity: capacity as usize,
        }
    }

    /// Appends a word and returns its location.
    pub fn push(&mut self, word: u16) -> Result<usize, ImageError> {
        if self.is_full() {
            return Err(ImageError::Full {
                capacity: self.capacity,
            });
        }
        self.words.push(word);
        Ok(self.words.len() - 1)
    }

    pub fn words(&self) -> &[u16] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.words.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.words.clear();
    }

    /// Little-endian, two bytes per word, in location order.
    pub fn to_le_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    pub fn from_le_bytes(bytes: &[u8], capacity: u16) -> Result<Self, ImageError> {
        if bytes.len() % 2 != 0 {
            return Err(ImageError::OddLength { len: bytes.len() });
        }
        let mut img = Self::new(capacity);
        for pair in bytes.chunks_exact(2) {
            img.push(u16::from_le_bytes([pair[0], pair[1]]))?;
        }
        Ok(img)
    }
}

impl WordStore for OutputImage {
    fn read_word(&self, location: usize) -> Result<u16, ImageError> {
        self.words.get(location).copied().ok_or(ImageError::OutOfRange {
            location,
            len: self.words.len(),
        })
    }

    fn write_word(&mut self, location: usize, word: u16) -> Result<(), ImageError> {
        let len = self.words.len();
        let slot = self
            .words
            .get_mut(location)
            .ok_or(ImageError::OutOfRange { location, len })?;
        *slot = word;
        Ok(())
    }
}
