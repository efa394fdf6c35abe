//! Word format of the output image.
//!
//! Every word is 16 bits: the opcode sits in bits 15..10 and the operand in
//! bits 9..0. Operands wider than 10 bits lose their high bits when packed.

use serde::{Deserialize, Serialize};

use crate::opcode::OpcodeEntry;

pub const OPCODE_SHIFT: u32 = 10;
pub const OPERAND_MASK: u16 = 0x3FF;

/// Word emitted for a line that failed to assemble.
pub const PLACEHOLDER: u16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decoded {
    pub code: u8,
    pub operand: u16,
}

pub fn encode(entry: &OpcodeEntry, operand: u16) -> u16 {
    let word = (entry.code as u16) << OPCODE_SHIFT;
    if entry.has_operand {
        word | (operand & OPERAND_MASK)
    } else {
        word
    }
}

/// Replace the operand field of an already-emitted word.
pub fn patch_operand(word: u16, operand: u16) -> u16 {
    (word & !OPERAND_MASK) | (operand & OPERAND_MASK)
}

pub fn decode(word: u16) -> Decoded {
    Decoded {
        code: (word >> OPCODE_SHIFT) as u8,
        operand: word & OPERAND_MASK,
    }
}

/// True when `value` survives packing into the operand field unchanged.
pub fn fits_operand(value: i32) -> bool {
    (0..=OPERAND_MASK as i32).contains(&value)
}
