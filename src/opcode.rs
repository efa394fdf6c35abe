use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Op {
    Lod,
    Sto,
    Add,
    Bze,
    Bne,
    Bra,
    Inp,
    Out,
    Cla,
    Hlt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpcodeEntry {
    pub op: Op,
    pub mnemonic: &'static str,
    pub code: u8,
    pub has_operand: bool,
}

pub const TABLE: &[OpcodeEntry] = &[
    OpcodeEntry {
        op: Op::Lod,
        mnemonic: "LOD",
        code: 1,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Sto,
        mnemonic: "STO",
        code: 2,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Add,
        mnemonic: "ADD",
        code: 3,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Bze,
        mnemonic: "BZE",
        code: 4,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Bne,
        mnemonic: "BNE",
        code: 5,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Bra,
        mnemonic: "BRA",
        code: 6,
        has_operand: true,
    },
    OpcodeEntry {
        op: Op::Inp,
        mnemonic: "INP",
        code: 7,
        has_operand: false,
    },
    OpcodeEntry {
        op: Op::Out,
        mnemonic: "OUT",
        code: 8,
        has_operand: false,
    },
    OpcodeEntry {
        op: Op::Cla,
        mnemonic: "CLA",
        code: 9,
        has_operand: false,
    },
    OpcodeEntry {
        op: Op::Hlt,
        mnemonic: "HLT",
        code: 0,
        has_operand: false,
    },
];

/// Case-insensitive exact match on the mnemonic. `None` means an invalid
/// opcode; HLT shares code 0 with the placeholder word, so callers must test
/// the variant and never the code.
pub fn lookup(mnemonic: &str) -> Option<&'static OpcodeEntry> {
    TABLE
        .iter()
        .find(|e| e.mnemonic.eq_ignore_ascii_case(mnemonic))
}

pub fn by_code(code: u8) -> Option<&'static OpcodeEntry> {
    TABLE.iter().find(|e| e.code == code)
}
