use std::borrow::Cow;
use std::io::BufRead;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Diagnostic, Fatal, ImageError, ParseError, Severity, SymbolError};
use crate::image::{OutputImage, DEFAULT_CAPACITY};
use crate::line::{self, Operand, DEFAULT_LINE_WIDTH};
use crate::opcode;
use crate::symbols::{Resolution, SymbolTable, Unresolved};
use crate::word;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AsmConfig {
    pub capacity: u16,     // words in the output image (M)
    pub line_width: usize, // usable source columns
    pub warn_trailing_spaces: bool,
    pub warn_truncated_operand: bool,
}

impl Default for AsmConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            line_width: DEFAULT_LINE_WIDTH,
            warn_trailing_spaces: true,
            warn_truncated_operand: true,
        }
    }
}

bitflags! {
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineFlags: u8 {
const LABEL_DEFINED = 1 << 0;
const SYMBOL_USED = 1 << 1;
const FORWARD_REF = 1 << 2; // operand patched once the symbol is defined
const PLACEHOLDER = 1 << 3; // line failed; word is inert
const OPERAND_IGNORED = 1 << 4;
}
}

/// One assembled source line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineResult {
    pub line: usize,
    pub location: usize,
    pub word: u16, // as emitted; forward references are patched later in the image
    pub flags: LineFlags,
    pub source: String,
}

impl LineResult {
    pub fn is_placeholder(&self) -> bool {
        self.flags.contains(LineFlags::PLACEHOLDER)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizationReport {
    pub unresolved: Vec<Unresolved>,
    pub errors: usize,
    pub warnings: usize,
}

impl FinalizationReport {
    /// Warnings alone do not fail a run.
    pub fn success(&self) -> bool {
        self.errors == 0
    }
}

/// One-pass assembler. Owns the symbol table and output image for a run;
/// `initialize` starts a fresh run.
#[derive(Debug, Clone)]
pub struct Assembler {
    cfg: AsmConfig,
    symbols: SymbolTable,
    image: OutputImage,
    line: usize,
    errors: usize,
    warnings: usize,
    diagnostics: Vec<Diagnostic>,
    report: Option<FinalizationReport>,
}

impl Default for Assembler {
    fn default() -> Self {
        Self::new(AsmConfig::default())
    }
}

impl Assembler {
    pub fn new(cfg: AsmConfig) -> Self {
        Self {
            cfg,
            symbols: SymbolTable::new(),
            image: OutputImage::new(cfg.capacity),
            line: 0,
            errors: 0,
            warnings: 0,
            diagnostics: Vec::new(),
            report: None,
        }
    }

    pub fn initialize(&mut self) {
        self.symbols.reset();
        self.image.clear();
        self.line = 0;
        self.errors = 0;
        self.warnings = 0;
        self.diagnostics.clear();
        self.report = None;
    }

    pub fn config(&self) -> &AsmConfig {
        &self.cfg
    }

    pub fn location_counter(&self) -> usize {
        self.image.len()
    }

    pub fn image(&self) -> &OutputImage {
        &self.image
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn error_count(&self) -> usize {
        self.errors
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }

    fn report_error(&mut self, line: usize, message: String) {
        debug!(line, "error: {message}");
        self.errors += 1;
        self.diagnostics.push(Diagnostic { severity: Severity::Error, line, message });
    }

    fn report_warning(&mut self, line: usize, message: String) {
        debug!(line, "warning: {message}");
        self.warnings += 1;
        self.diagnostics.push(Diagnostic { severity: Severity::Warning, line, message });
    }

    /// Assembles one raw line (no terminator) into exactly one word.
    /// Only fatal conditions return `Err`; everything else is a diagnostic.
    pub fn assemble_line(&mut self, raw: &str) -> Result<LineResult, Fatal> {
        if self.report.is_some() {
            return Err(Fatal::Finalized);
        }
        if self.image.is_full() {
            return Err(ImageError::Full { capacity: self.image.capacity() }.into());
        }
        self.line += 1;
        let line_no = self.line;
        let location = self.image.len();
        let mut flags = LineFlags::empty();

        let fitted = line::fit(raw, self.cfg.line_width);
        if fitted.trimmed && self.cfg.warn_trailing_spaces {
            self.report_warning(line_no, "trailing spaces trimmed".into());
        }
        if fitted.truncated {
            self.report_warning(
                line_no,
                format!("line longer than {} columns; truncated", self.cfg.line_width),
            );
        }

        let parsed = match line::parse(&fitted.text) {
            Ok(p) => p,
            Err(e) => {
                self.report_error(line_no, e.to_string());
                // keep the label so later uses still resolve
                if let ParseError::MalformedOperand { label: Some(label), .. } = e {
                    flags |= LineFlags::LABEL_DEFINED;
                    self.define_label(line_no, label, location)?;
                }
                return self.emit(line_no, word::PLACEHOLDER, flags | LineFlags::PLACEHOLDER, raw);
            }
        };

        if let Some(label) = parsed.label {
            flags |= LineFlags::LABEL_DEFINED;
            self.define_label(line_no, label, location)?;
        }

        let Some(entry) = opcode::lookup(&parsed.mnemonic) else {
            self.report_error(line_no, format!("invalid opcode {:?}", parsed.mnemonic));
            return self.emit(line_no, word::PLACEHOLDER, flags | LineFlags::PLACEHOLDER, raw);
        };

        let mut operand = 0u16;
        if entry.has_operand {
            match parsed.operand {
                Operand::Absent => {}
                Operand::Literal(v) => {
                    if !word::fits_operand(v) && self.cfg.warn_truncated_operand {
                        self.report_warning(
                            line_no,
                            format!("operand {v} does not fit in 10 bits; truncated"),
                        );
                    }
                    operand = v as u16;
                }
                Operand::Symbol(s) => {
                    flags |= LineFlags::SYMBOL_USED;
                    match self.symbols.reference(s, location)? {
                        Resolution::Known(v) => {
                            self.check_symbol_fits(line_no, s, v);
                            operand = v;
                        }
                        Resolution::Pending => flags |= LineFlags::FORWARD_REF,
                    }
                }
            }
        } else if parsed.operand != Operand::Absent {
            flags |= LineFlags::OPERAND_IGNORED;
            self.report_warning(line_no, format!("{} takes no operand; ignored", entry.mnemonic));
        }

        self.emit(line_no, word::encode(entry, operand), flags, raw)
    }

    fn define_label(&mut self, line_no: usize, label: char, location: usize) -> Result<(), Fatal> {
        let value = location as u16;
        match self.symbols.define(label, value, &mut self.image) {
            Ok(def) => {
                if !def.patched.is_empty() {
                    debug!(%label, patched = ?def.patched, "resolved forward references");
                }
                for _ in &def.patched {
                    self.check_symbol_fits(line_no, label, value);
                }
                Ok(())
            }
            Err(e @ SymbolError::AlreadyDefined { .. }) => {
                self.report_error(line_no, e.to_string());
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A symbol used as an operand must fit the 10-bit field.
    fn check_symbol_fits(&mut self, line_no: usize, label: char, value: u16) {
        if !word::fits_operand(value as i32) {
            self.report_error(
                line_no,
                format!("symbol {} value {value} does not fit in 10 bits", label.to_ascii_uppercase()),
            );
        }
    }

    fn emit(&mut self, line: usize, word: u16, flags: LineFlags, raw: &str) -> Result<LineResult, Fatal> {
        let location = self.image.push(word)?;
        debug!(line, location, word, "emit");
        Ok(LineResult {
            line,
            location,
            word,
            flags,
            source: raw.to_string(),
        })
    }

    /// Reports every still-pending forward use, one error per use. Words
    /// whose symbol never arrived keep their zero operand. Ends the run:
    /// `assemble_line` fails until `initialize` is called.
    pub fn finalize(&mut self) -> FinalizationReport {
        if let Some(report) = &self.report {
            return report.clone();
        }
        let unresolved = self.symbols.finalize();
        for u in &unresolved {
            self.report_error(
                u.location + 1,
                format!("undefined symbol {} used at location {}", u.label, u.location),
            );
        }
        let report = FinalizationReport {
            unresolved,
            errors: self.errors,
            warnings: self.warnings,
        };
        self.report = Some(report.clone());
        report
    }

    /// Reads lines until end of input. A final line without a terminator is
    /// accepted with a warning.
    pub fn assemble_source<R: BufRead>(&mut self, mut input: R) -> Result<Vec<LineResult>, Fatal> {
        let mut results = Vec::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let bytes = match buf.strip_suffix(b"\n") {
                Some(b) => b.strip_suffix(b"\r").unwrap_or(b),
                None => {
                    self.report_warning(
                        self.line + 1,
                        "EOF found before end of line (no trailing newline)".into(),
                    );
                    buf.as_slice()
                }
            };
            let text = match String::from_utf8_lossy(bytes) {
                Cow::Borrowed(t) => t.to_string(),
                Cow::Owned(t) => {
                    self.report_warning(self.line + 1, "invalid UTF-8 replaced".into());
                    t
                }
            };
            results.push(self.assemble_line(&text)?);
        }
        Ok(results)
    }
}
