use crate::opcode;
use crate::word;

pub fn fmt_word(w: u16) -> String {
    let d = word::decode(w);
    match opcode::by_code(d.code) {
        Some(e) if e.has_operand => format!("{} {}", e.mnemonic, d.operand),
        Some(e) if d.operand == 0 => e.mnemonic.to_string(),
        _ => format!(".word {w:#06x}"),
    }
}
