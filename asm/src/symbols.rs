use indexmap::IndexMap;

use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SymbolKind {
    Data = 1,
    Code = 2,
    Entry = 3,
    External = 4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Symbol {
    pub value: u16,
    pub kind: SymbolKind,
}

/// Insertion-ordered so `.ent` lines come out in definition order.
#[derive(Debug, Default)]
pub struct SymbolTable {
    table: IndexMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, kind: SymbolKind, value: u16) -> Result<(), Error> {
        if self.table.contains_key(name) {
            return Err(Error::SymbolExists(name.to_string()));
        }
        self.table.insert(name.to_string(), Symbol { value, kind });
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&Symbol> {
        self.table.get(name)
    }

    /// Overwrites the kind of an existing symbol. False when unknown.
    pub fn set_kind(&mut self, name: &str, kind: SymbolKind) -> bool {
        match self.table.get_mut(name) {
            Some(sym) => {
                sym.kind = kind;
                true
            }
            None => false,
        }
    }

    /// Rebase every data symbol once the code image size is known. Must be
    /// applied exactly once, between the two passes.
    pub fn shift_data(&mut self, icf: u16) {
        for sym in self.table.values_mut() {
            if sym.kind == SymbolKind::Data {
                sym.value += icf;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Symbol)> {
        self.table.iter().map(|(name, sym)| (name.as_str(), sym))
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

// ----------------------------------------------------------------------------
