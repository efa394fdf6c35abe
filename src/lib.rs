pub mod disasm;
pub mod engine;
pub mod error;
pub mod image;
pub mod line;
pub mod listing;
pub mod opcode;
pub mod symbols;
pub mod word;

pub use engine::{AsmConfig, Assembler, FinalizationReport, LineFlags, LineResult};
pub use error::{Diagnostic, Fatal, ImageError, ParseError, Severity, SymbolError};
pub use image::{OutputImage, WordStore};
pub use symbols::{Status, SymbolTable};
