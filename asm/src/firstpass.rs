//! Pass one: layout. Assigns addresses to labels, encodes instruction
//! words (symbol references left unresolved) and collects data words.

use arch::op::Op;
use arch::word::{self, Word, WordKind};

use crate::context::Context;
use crate::error::{Diag, Error};
use crate::lexer::{self, Directive};
use crate::operand::Operand;
use crate::order::Order;
use crate::symbols::SymbolKind;

pub fn first_pass(text: &str, ctx: &mut Context) -> Vec<Diag> {
    let mut diags = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        scan_line(line, idx, ctx, &mut diags);
    }
    // data symbols become absolute addresses behind the code image
    let icf = ctx.icf();
    ctx.symbols.shift_data(icf);
    diags
}

fn scan_line(line: &str, idx: usize, ctx: &mut Context, diags: &mut Vec<Diag>) {
    if line.chars().count() > lexer::MAX_LINE_LEN {
        diags.push(Diag::error(idx, Error::LineTooLong));
    }

    let mut i = lexer::skip_spaces(line, 0);
    if i >= line.len() || lexer::at(line, i) == b';' {
        return;
    }

    let mut label: Option<&str> = None;
    if let Some(colon) = lexer::symbol_definition_end(line, i) {
        label = Some(&line[i..colon]);
        i = lexer::skip_spaces(line, colon + 1);
    }

    if let Some((dir, end)) = lexer::directive_at(line, i) {
        let i = lexer::skip_spaces(line, end);
        match dir {
            Directive::Data | Directive::String | Directive::Mat => {
                if let Some(name) = label {
                    if let Err(e) = ctx.symbols.insert(name, SymbolKind::Data, ctx.dc) {
                        diags.push(Diag::error(idx, e));
                        return;
                    }
                }
                if let Err(e) = scan_payload(dir, line, i, ctx) {
                    diags.push(Diag::error(idx, e));
                }
            }
            Directive::Extern => {
                if label.is_some() {
                    diags.push(Diag::warning(idx, "Label before `.extern` is ignored"));
                }
                scan_extern(line, i, ctx, idx, diags);
            }
            Directive::Entry => {
                if label.is_some() {
                    diags.push(Diag::warning(idx, "Label before `.entry` is ignored"));
                }
                // resolved in the second pass; only the shape is checked here
                match lexer::symbol_end(line, i) {
                    Some(end) if lexer::rest_is_blank(line, end) => {}
                    Some(_) => diags.push(Diag::error(idx, Error::ExtraText)),
                    None => diags.push(Diag::error(idx, Error::ExpectedSymbol(".entry"))),
                }
            }
        }
        return;
    }

    scan_instruction(line, i, label, ctx, idx, diags);
}

// ----------------------------------------------------------------------------
// Directives

fn scan_payload(dir: Directive, line: &str, i: usize, ctx: &mut Context) -> Result<(), Error> {
    match dir {
        Directive::Data => {
            for value in lexer::parse_int_list(line, i)? {
                push_data(ctx, word::fit10(value));
            }
        }
        Directive::String => {
            let text = lexer::parse_string(line, i)?;
            for byte in text.bytes() {
                push_data(ctx, word::char_word(byte));
            }
            push_data(ctx, 0); // terminator
        }
        Directive::Mat => {
            let (rows, cols, end) = lexer::parse_mat_header(line, i)?;
            let values = lexer::parse_int_list(line, lexer::skip_spaces(line, end))?;
            let cells = rows as usize * cols as usize;
            if values.len() > cells {
                return Err(Error::MatrixOverflow);
            }
            // reserve the whole matrix; missing trailing cells are zero
            for cell in 0..cells {
                push_data(ctx, values.get(cell).map_or(0, |v| word::fit10(*v)));
            }
        }
        Directive::Extern | Directive::Entry => unreachable!("handled by the caller"),
    }
    Ok(())
}

fn push_data(ctx: &mut Context, value: u16) {
    ctx.data.push(Word {
        value,
        address: ctx.dc,
        kind: WordKind::Data,
    });
    ctx.dc += 1;
}

fn scan_extern(line: &str, i: usize, ctx: &mut Context, idx: usize, diags: &mut Vec<Diag>) {
    let Some(end) = lexer::symbol_end(line, i) else {
        diags.push(Diag::error(idx, Error::ExpectedSymbol(".extern")));
        return;
    };
    let name = &line[i..end];
    if !lexer::rest_is_blank(line, end) {
        diags.push(Diag::error(idx, Error::ExtraText));
        return;
    }
    match ctx.symbols.find(name) {
        // a repeated `.extern` of the same name changes nothing
        Some(sym) if sym.kind == SymbolKind::External => {}
        Some(_) => diags.push(Diag::error(idx, Error::ExternClash(name.to_string()))),
        None => {
            ctx.symbols.insert(name, SymbolKind::External, 0).ok();
        }
    }
}

// ----------------------------------------------------------------------------
// Instructions

fn scan_instruction(
    line: &str,
    i: usize,
    label: Option<&str>,
    ctx: &mut Context,
    idx: usize,
    diags: &mut Vec<Diag>,
) {
    if let Some(name) = label {
        if let Err(e) = ctx.symbols.insert(name, SymbolKind::Code, ctx.ic) {
            diags.push(Diag::error(idx, e));
            return;
        }
    }

    let mnemonic_end = line[i..]
        .find([' ', '\t'])
        .map_or(line.len(), |offset| i + offset);
    let mnemonic = &line[i..mnemonic_end];
    let Some(op) = Op::parse(mnemonic) else {
        diags.push(Diag::error(idx, Error::UnknownOperation(mnemonic.to_string())));
        return;
    };

    let (src, dst) = match parse_operands(line, mnemonic_end, op) {
        Ok(operands) => operands,
        Err(e) => {
            diags.push(Diag::error(idx, e));
            return;
        }
    };

    if let Some(mode) = src.as_ref().map(Operand::mode) {
        if !op.src_legal(mode) {
            diags.push(Diag::error(idx, Error::IllegalSrcMode(op)));
            return;
        }
    }
    if let Some(mode) = dst.as_ref().map(Operand::mode) {
        if !op.dst_legal(mode) {
            diags.push(Diag::error(idx, Error::IllegalDstMode(op)));
            return;
        }
    }

    let order = Order::encode(idx, ctx.ic, op, src, dst);
    ctx.ic += order.word_count();
    ctx.orders.push(order);
}

fn parse_operands(
    line: &str,
    after_mnemonic: usize,
    op: Op,
) -> Result<(Option<Operand>, Option<Operand>), Error> {
    let i = lexer::skip_spaces(line, after_mnemonic);
    match op.operands() {
        0 => {
            if !lexer::rest_is_blank(line, i) {
                return Err(Error::UnexpectedOperand(op));
            }
            Ok((None, None))
        }
        1 => {
            if lexer::rest_is_blank(line, i) {
                return Err(Error::MissingOperand(op));
            }
            let (dst, end) = Operand::parse(line, i)?;
            if !lexer::rest_is_blank(line, end) {
                return Err(Error::ExtraText);
            }
            Ok((None, Some(dst)))
        }
        _ => {
            if lexer::rest_is_blank(line, i) {
                return Err(Error::MissingOperand(op));
            }
            let (src, end) = Operand::parse(line, i)?;
            let j = lexer::skip_spaces(line, end);
            if lexer::at(line, j) != b',' {
                return Err(Error::MissingComma);
            }
            let j = lexer::skip_spaces(line, j + 1);
            if lexer::rest_is_blank(line, j) {
                return Err(Error::MissingOperand(op));
            }
            let (dst, end) = Operand::parse(line, j)?;
            if !lexer::rest_is_blank(line, end) {
                return Err(Error::ExtraText);
            }
            Ok((Some(src), Some(dst)))
        }
    }
}

// ----------------------------------------------------------------------------
