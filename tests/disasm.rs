use casm::disasm::fmt_word;
use casm::{listing, Assembler, OutputImage};

#[test]
fn disasm_known_words() {
    assert_eq!(fmt_word(0x0403), "LOD 3");
    assert_eq!(fmt_word((6 << 10) | 1023), "BRA 1023");
    assert_eq!(fmt_word(9 << 10), "CLA");
    assert_eq!(fmt_word(0), "HLT");
}

#[test]
fn disasm_unknown_words() {
    // opcode field 10 is not in the table
    assert_eq!(fmt_word(10 << 10), ".word 0x2800");
    // no-operand opcode with operand bits set
    assert_eq!(fmt_word((7 << 10) | 1), ".word 0x1c01");
}

#[test]
fn image_bytes_are_little_endian() {
    let mut asm = Assembler::default();
    asm.assemble_source("A LOD 5\n  STO A\n  HLT\n".as_bytes()).unwrap();
    let bytes = asm.image().to_le_bytes();
    assert_eq!(bytes, vec![0x05, 0x04, 0x00, 0x08, 0x00, 0x00]);
    let back = OutputImage::from_le_bytes(&bytes, 1024).unwrap();
    assert_eq!(back.words(), asm.image().words());
    assert!(OutputImage::from_le_bytes(&bytes[..3], 1024).is_err());
}

#[test]
fn listing_shows_patched_words_and_placeholders() {
    let mut asm = Assembler::default();
    let lines = asm.assemble_source("  BRA B\n  XYZ\nB HLT\n".as_bytes()).unwrap();
    asm.finalize();
    let text = listing::render(&lines, asm.image());
    let rows: Vec<&str> = text.lines().collect();
    assert_eq!(rows, vec!["0000  1802    BRA B", "0001  ----    XYZ", "0002  0000  B HLT"]);
}
