//! Symbol table: one slot per letter A..Z.
//!
//! A slot moves Unused -> Defined or Unused -> Undefined -> Defined. Defining
//! a symbol that still has pending forward uses patches each of those words.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::SymbolError;
use crate::image::WordStore;
use crate::word;

pub const SYMBOL_COUNT: usize = 26;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Unused,
    Defined,
    Undefined,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Slot {
    #[default]
    Unused,
    Defined(u16),
    Undefined(Vec<usize>), // pending use locations, in order of appearance
}

/// Outcome of an operand reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Known(u16),
    Pending,
}

/// Locations rewritten when a forward-referenced symbol got its value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Definition {
    pub patched: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unresolved {
    pub label: char,
    pub location: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolEntry {
    pub label: char,
    pub status: Status,
    pub value: Option<u16>,
    pub pending: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct SymbolTable {
    slots: [Slot; SYMBOL_COUNT],
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

fn index(label: char) -> Result<usize, SymbolError> {
    let up = label.to_ascii_uppercase();
    if up.is_ascii_uppercase() {
        Ok((up as u8 - b'A') as usize)
    } else {
        Err(SymbolError::InvalidSymbol(label))
    }
}

fn letter(idx: usize) -> char {
    (b'A' + idx as u8) as char
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            slots: std::array::from_fn(|_| Slot::Unused),
        }
    }

    pub fn reset(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = Slot::Unused);
    }

    pub fn status(&self, label: char) -> Result<Status, SymbolError> {
        Ok(match self.slots[index(label)?] {
            Slot::Unused => Status::Unused,
            Slot::Defined(_) => Status::Defined,
            Slot::Undefined(_) => Status::Undefined,
        })
    }

    /// `None` unless the symbol is Defined.
    pub fn value(&self, label: char) -> Result<Option<u16>, SymbolError> {
        Ok(match self.slots[index(label)?] {
            Slot::Defined(v) => Some(v),
            _ => None,
        })
    }

    pub fn pending(&self, label: char) -> Result<&[usize], SymbolError> {
        Ok(match &self.slots[index(label)?] {
            Slot::Undefined(uses) => uses,
            _ => &[],
        })
    }

    /// Gives `label` its value. Pending forward uses are patched in `store`;
    /// redefinition fails and leaves the stored value untouched.
    pub fn define<S: WordStore>(
        &mut self,
        label: char,
        value: u16,
        store: &mut S,
    ) -> Result<Definition, SymbolError> {
        let idx = index(label)?;
        let slot = &mut self.slots[idx];
        if let Slot::Defined(old) = *slot {
            return Err(SymbolError::AlreadyDefined {
                label: letter(idx),
                value: old,
            });
        }
        let Slot::Undefined(uses) = std::mem::replace(slot, Slot::Defined(value)) else {
            return Ok(Definition::default());
        };
        for &loc in &uses {
            let w = store.read_word(loc)?;
            store.write_word(loc, word::patch_operand(w, value))?;
            debug!(label = %letter(idx), loc, value, "patched forward reference");
        }
        Ok(Definition { patched: uses })
    }

    /// Records a forward use at `location`. Recording against a Defined
    /// symbol is an internal error: the value should have been read instead.
    pub fn add_undefined(&mut self, label: char, location: usize) -> Result<(), SymbolError> {
        let idx = index(label)?;
        match &mut self.slots[idx] {
            slot @ Slot::Unused => *slot = Slot::Undefined(vec![location]),
            Slot::Undefined(uses) => uses.push(location),
            Slot::Defined(_) => return Err(SymbolError::PendingOnDefined(letter(idx))),
        }
        Ok(())
    }

    /// Operand use of `label` by the word at `location`.
    pub fn reference(&mut self, label: char, location: usize) -> Result<Resolution, SymbolError> {
        if let Some(v) = self.value(label)? {
            return Ok(Resolution::Known(v));
        }
        self.add_undefined(label, location)?;
        Ok(Resolution::Pending)
    }

    /// Every pending use still waiting for a definition, one entry per use.
    pub fn finalize(&self) -> Vec<Unresolved> {
        let mut out: Vec<Unresolved> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| match s {
                Slot::Undefined(uses) => Some((i, uses)),
                _ => None,
            })
            .flat_map(|(i, uses)| {
                uses.iter().map(move |&location| Unresolved {
                    label: letter(i),
                    location,
                })
            })
            .collect();
        out.sort_by_key(|u| u.location);
        out
    }

    /// Snapshot of every symbol that has been mentioned.
    pub fn entries(&self) -> Vec<SymbolEntry> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                let (status, value, pending) = match s {
                    Slot::Unused => return None,
                    Slot::Defined(v) => (Status::Defined, Some(*v), Vec::new()),
                    Slot::Undefined(uses) => (Status::Undefined, None, uses.clone()),
                };
                Some(SymbolEntry {
                    label: letter(i),
                    status,
                    value,
                    pending,
                })
            })
            .collect()
    }
}
