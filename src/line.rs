//! Fixed-column source line parsing.
//!
//! ```text
//! col  0      label letter, or blank
//! cols 2..5   mnemonic
//! col  6..    operand: one letter (symbol) or a decimal integer
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

pub const LABEL_COL: usize = 0;
pub const MNEMONIC_COL: usize = 2;
pub const MNEMONIC_LEN: usize = 3;
pub const OPERAND_COL: usize = 6;
pub const DEFAULT_LINE_WIDTH: usize = 48;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operand {
    Absent,
    Literal(i32),
    Symbol(char),
}

impl Operand {
    pub fn is_symbol(&self) -> bool {
        matches!(self, Operand::Symbol(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedLine {
    pub label: Option<char>,
    pub mnemonic: String,
    pub operand: Operand,
}

/// Result of fitting a raw line into the fixed width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fitted {
    pub text: String,
    pub trimmed: bool,   // trailing spaces removed
    pub truncated: bool, // longer than the width
}

/// Drops trailing spaces and cuts the line to `width` columns.
pub fn fit(raw: &str, width: usize) -> Fitted {
    let stripped = raw.trim_end_matches(' ');
    let trimmed = stripped.len() != raw.len();
    let truncated = stripped.chars().count() > width;
    let text = if truncated {
        stripped.chars().take(width).collect()
    } else {
        stripped.to_string()
    };
    Fitted {
        text,
        trimmed,
        truncated,
    }
}

pub fn parse(raw: &str) -> Result<ParsedLine, ParseError> {
    let mut cols: Vec<char> = raw.chars().map(|c| c.to_ascii_uppercase()).collect();
    if cols.len() < OPERAND_COL {
        cols.resize(OPERAND_COL, ' ');
    }

    let label = match cols[LABEL_COL] {
        ' ' => None,
        c @ 'A'..='Z' => Some(c),
        c => return Err(ParseError::InvalidLabel(c)),
    };

    let mnemonic: String = cols[MNEMONIC_COL..MNEMONIC_COL + MNEMONIC_LEN].iter().collect();

    let text: String = cols[OPERAND_COL..].iter().collect();
    let text = text.trim();
    let mut chars = text.chars();
    let operand = match (chars.next(), chars.next()) {
        (None, _) => Operand::Absent,
        (Some(c @ 'A'..='Z'), None) => Operand::Symbol(c),
        _ => text
            .parse::<i32>()
            .map(Operand::Literal)
            .map_err(|_| ParseError::MalformedOperand {
                label,
                text: text.to_string(),
            })?,
    };

    Ok(ParsedLine {
        label,
        mnemonic,
        operand,
    })
}
