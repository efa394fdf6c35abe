use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use casm::symbols::{SymbolEntry, Unresolved};
use casm::{Assembler, Diagnostic, LineResult, OutputImage};

/// Everything a listing consumer needs from one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub words: Vec<u16>,
    pub lines: Vec<LineResult>,
    pub symbols: Vec<SymbolEntry>,
    pub unresolved: Vec<Unresolved>,
    pub diagnostics: Vec<Diagnostic>,
    pub errors: usize,
    pub warnings: usize,
}

/// Finalizes `asm` and collects the report.
pub fn build_report(asm: &mut Assembler, lines: Vec<LineResult>) -> Report {
    let fin = asm.finalize();
    Report {
        words: asm.image().words().to_vec(),
        lines,
        symbols: asm.symbols().entries(),
        unresolved: fin.unresolved,
        diagnostics: asm.diagnostics().to_vec(),
        errors: fin.errors,
        warnings: fin.warnings,
    }
}

pub fn assemble_file(asm: &mut Assembler, path: &Path) -> Result<Vec<LineResult>> {
    let file = File::open(path)
        .map_err(|e| anyhow::anyhow!("Unable to open input file {}: {e}", path.display()))?;
    asm.initialize();
    Ok(asm.assemble_source(BufReader::new(file))?)
}

pub fn load_image(path: &Path, capacity: u16) -> Result<OutputImage> {
    let bytes = std::fs::read(path)?;
    Ok(OutputImage::from_le_bytes(&bytes, capacity)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn report_collects_symbols_and_diagnostics() {
        let mut asm = Assembler::default();
        let src = "  BRA X\nX LOD 7\n  STO Y\n  HLT\n";
        let lines = asm.assemble_source(src.as_bytes()).unwrap();
        let report = build_report(&mut asm, lines);
        assert_eq!(report.words, vec![(6 << 10) | 1, (1 << 10) | 7, 2 << 10, 0]);
        assert_eq!(report.symbols.len(), 2);
        assert_eq!(report.unresolved, vec![Unresolved { label: 'Y', location: 2 }]);
        assert_eq!(report.errors, 1);
        assert!(report.diagnostics[0].message.contains("undefined symbol Y"));
    }

    #[test]
    fn image_file_loads_back() {
        let path = std::env::temp_dir().join(format!("casm_image_{}.bin", std::process::id()));
        std::fs::write(&path, [0x03u8, 0x04, 0x00, 0x00]).unwrap();
        let img = load_image(&path, 1024).unwrap();
        assert_eq!(img.words(), &[0x0403, 0x0000]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn report_serializes_to_json() {
        let mut asm = Assembler::default();
        let lines = asm.assemble_source("A LOD 5\n  STO A\n  HLT\n".as_bytes()).unwrap();
        let report = build_report(&mut asm, lines);
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(back.words, report.words);
        assert_eq!(back.errors, 0);
    }
}
