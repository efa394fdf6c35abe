use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    #[error("output image full ({capacity} words)")]
    Full { capacity: usize },
    #[error("location {location} is outside the image ({len} words)")]
    OutOfRange { location: usize, len: usize },
    #[error("image data has odd length {len}; words are 2 bytes each")]
    OddLength { len: usize },
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolError {
    #[error("invalid symbol {0:?} (out of range)")]
    InvalidSymbol(char),
    #[error("symbol {label} already defined (value {value})")]
    AlreadyDefined { label: char, value: u16 },
    #[error("forward use recorded for symbol {0}, but it is already defined")]
    PendingOnDefined(char),
    #[error("patch-back failed: {0}")]
    Patch(#[from] ImageError),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid label defined: {0:?}")]
    InvalidLabel(char),
    #[error("malformed operand: {text:?}")]
    MalformedOperand { label: Option<char>, text: String },
}

/// Errors that end an assembly run.
#[derive(thiserror::Error, Debug)]
pub enum Fatal {
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error(transparent)]
    Image(#[from] ImageError),
    #[error("unable to read input: {0}")]
    Io(#[from] std::io::Error),
    #[error("assembly already finalized; initialize before assembling more lines")]
    Finalized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Warning,
    Error,
}

/// A recoverable problem found while assembling; the run continues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub line: usize, // 1-based source line
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
        };
        write!(f, "{tag}: line {}: {}", self.line, self.message)
    }
}
