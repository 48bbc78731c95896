//! Pass two: resolution. Handles `.entry` directives, then patches every
//! unresolved operand word with its symbol's address and ARE bits.

use arch::word::{self, Are};

use crate::context::Context;
use crate::error::{Diag, Error};
use crate::lexer::{self, Directive};
use crate::order::CodeWord;
use crate::symbols::SymbolKind;

pub fn second_pass(text: &str, ctx: &mut Context) -> Vec<Diag> {
    let mut diags = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        scan_line(line, idx, ctx, &mut diags);
    }
    patch(ctx, &mut diags);
    diags
}

fn scan_line(line: &str, idx: usize, ctx: &mut Context, diags: &mut Vec<Diag>) {
    let mut i = lexer::skip_spaces(line, 0);
    if i >= line.len() || lexer::at(line, i) == b';' {
        return;
    }
    if let Some(colon) = lexer::symbol_definition_end(line, i) {
        i = lexer::skip_spaces(line, colon + 1);
    }
    // everything except `.entry` was fully handled in pass one
    let Some((Directive::Entry, end)) = lexer::directive_at(line, i) else {
        return;
    };
    ctx.entries = true;
    let i = lexer::skip_spaces(line, end);
    let Some(sym_end) = lexer::symbol_end(line, i) else {
        diags.push(Diag::error(idx, Error::ExpectedSymbol(".entry")));
        return;
    };
    let name = &line[i..sym_end];
    if !ctx.symbols.set_kind(name, SymbolKind::Entry) {
        diags.push(Diag::error(idx, Error::EntryMissing(name.to_string())));
    }
}

/// Overwrite every unresolved word with the referenced symbol's address.
/// External uses are recorded one entry per site.
fn patch(ctx: &mut Context, diags: &mut Vec<Diag>) {
    for order in &mut ctx.orders {
        for (idx, code_word) in order.words.iter_mut().enumerate() {
            let CodeWord::Symbol(name) = code_word else {
                continue;
            };
            let address = order.ic + idx as u16;
            match ctx.symbols.find(name) {
                None => {
                    diags.push(Diag::error(
                        order.line,
                        Error::UndefinedSymbol(name.clone()),
                    ));
                }
                Some(sym) if sym.kind == SymbolKind::External => {
                    ctx.externals.push((name.clone(), address));
                    *code_word = CodeWord::Ready(word::reference_word(sym.value, Are::External));
                }
                Some(sym) => {
                    *code_word =
                        CodeWord::Ready(word::reference_word(sym.value, Are::Relocatable));
                }
            }
        }
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::has_errors;
    use crate::firstpass::first_pass;

    fn run(src: &str) -> (Context, Vec<Diag>) {
        let mut ctx = Context::new();
        let diags = first_pass(src, &mut ctx);
        assert!(!has_errors(&diags), "{diags:?}");
        let diags = second_pass(src, &mut ctx);
        (ctx, diags)
    }

    #[test]
    fn internal_references_get_relocatable_bits() {
        let (ctx, diags) = run("MAIN: mov X, r3\nstop\nX: .data 7\n");
        assert!(!has_errors(&diags));
        // X sits at 104, directly behind the four code words
        assert_eq!(
            ctx.orders[0].words[1],
            CodeWord::Ready(word::reference_word(104, Are::Relocatable))
        );
        assert!(ctx.externals.is_empty());
    }

    #[test]
    fn external_references_are_recorded_per_site() {
        let (ctx, diags) = run(".extern E\njmp E\njmp E\nstop\n");
        assert!(!has_errors(&diags));
        assert_eq!(ctx.orders[0].words[1], CodeWord::Ready(0b0000000001));
        assert_eq!(
            ctx.externals,
            vec![("E".to_string(), 101), ("E".to_string(), 103)]
        );
    }

    #[test]
    fn entry_upgrades_symbol_kind() {
        let (ctx, diags) = run("MAIN: stop\n.entry MAIN\n");
        assert!(!has_errors(&diags));
        assert!(ctx.entries);
        assert_eq!(ctx.symbols.find("MAIN").unwrap().kind, SymbolKind::Entry);
    }

    #[test]
    fn entry_of_unknown_symbol_fails() {
        let (_, diags) = run("stop\n.entry NOWHERE\n");
        assert!(has_errors(&diags));
    }

    #[test]
    fn undefined_symbol_fails() {
        let (_, diags) = run("jmp NOWHERE\nstop\n");
        assert!(diags
            .iter()
            .any(|d| matches!(d.msg, crate::error::Msg::Error(Error::UndefinedSymbol(_)))));
    }
}
