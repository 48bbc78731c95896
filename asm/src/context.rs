use arch::word::Word;

use crate::order::Order;
use crate::symbols::SymbolTable;

pub const IC_START: u16 = 100;

/// All mutable state for one source file. A fresh context is built per
/// source, so nothing leaks between files.
#[derive(Debug)]
pub struct Context {
    pub symbols: SymbolTable,
    pub orders: Vec<Order>,
    pub data: Vec<Word>,
    /// One entry per external use site, in patch order.
    pub externals: Vec<(String, u16)>,
    pub entries: bool,
    pub ic: u16,
    pub dc: u16,
}

impl Context {
    pub fn new() -> Self {
        Context {
            symbols: SymbolTable::new(),
            orders: Vec::new(),
            data: Vec::new(),
            externals: Vec::new(),
            entries: false,
            ic: IC_START,
            dc: 0,
        }
    }

    /// Final instruction counter; meaningful once pass one is done.
    pub fn icf(&self) -> u16 {
        self.ic
    }

    pub fn dcf(&self) -> u16 {
        self.dc
    }

    /// Rebase data word addresses behind the code image. Data symbols were
    /// already shifted at the end of pass one.
    pub fn shift_data_words(&mut self) {
        let icf = self.icf();
        for word in &mut self.data {
            word.address += icf;
        }
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
