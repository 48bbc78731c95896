//! Macro preprocessing.
//!
//! `mcro NAME` opens a definition block, `mcroend` closes it, and a line
//! whose first token equals a known macro name is replaced by the macro's
//! body. Macros take no arguments and definitions do not nest; a `mcro`
//! inside a body is captured verbatim.

use indexmap::IndexMap;

use arch::op::Op;

use crate::error::{Diag, Error};
use crate::lexer::DIRECTIVE_NAMES;

pub const MACRO_START: &str = "mcro";
pub const MACRO_END: &str = "mcroend";

#[derive(Debug, Default)]
pub struct Macros {
    table: IndexMap<String, Vec<String>>,
}

impl Macros {
    fn define(&mut self, name: &str) {
        self.table.insert(name.to_string(), Vec::new());
    }

    fn push_line(&mut self, name: &str, line: &str) {
        if let Some(body) = self.table.get_mut(name) {
            body.push(line.to_string());
        }
    }

    fn find(&self, name: &str) -> Option<&[String]> {
        self.table.get(name).map(Vec::as_slice)
    }
}

/// A macro may not shadow an operation mnemonic or a directive keyword.
fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && Op::parse(name).is_none() && !DIRECTIVE_NAMES.contains(&name)
}

/// Expands all macros in `src`, producing the text both passes consume.
/// The output is returned even when diagnostics were raised so the caller
/// can still write the derived artifact.
pub fn preprocess(src: &str) -> (String, Vec<Diag>) {
    let mut out = String::new();
    let mut diags = Vec::new();
    let mut macros = Macros::default();
    let mut capturing: Option<String> = None;

    for (idx, line) in src.lines().enumerate() {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        let head = tokens.first().copied();

        if let Some(name) = capturing.take() {
            if head == Some(MACRO_END) {
                if tokens.len() > 1 {
                    diags.push(Diag::error(idx, Error::ExtraAfterMacroEnd));
                }
            } else {
                macros.push_line(&name, line);
                capturing = Some(name);
            }
            continue;
        }

        if head == Some(MACRO_START) {
            let name = tokens.get(1).copied().unwrap_or("");
            if !is_valid_name(name) {
                diags.push(Diag::error(idx, Error::InvalidMacroName(name.to_string())));
            }
            if tokens.len() > 2 {
                diags.push(Diag::error(idx, Error::ExtraAfterMacro(name.to_string())));
            }
            // the block is captured either way so `mcroend` closes it
            macros.define(name);
            capturing = Some(name.to_string());
            continue;
        }

        if let Some(body) = head.and_then(|h| macros.find(h)) {
            for body_line in body {
                out.push_str(body_line);
                out.push('\n');
            }
            continue;
        }

        out.push_str(line);
        out.push('\n');
    }

    (out, diags)
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::has_errors;

    #[test]
    fn expansion_replaces_the_invocation() {
        let src = "mcro GREET\nprn #1\nprn #2\nmcroend\nGREET\nstop\n";
        let (out, diags) = preprocess(src);
        assert!(!has_errors(&diags));
        assert_eq!(out, "prn #1\nprn #2\nstop\n");
    }

    #[test]
    fn repeated_invocations() {
        let src = "mcro TWICE\ninc r1\nmcroend\nTWICE\nTWICE\n";
        let (out, _) = preprocess(src);
        assert_eq!(out, "inc r1\ninc r1\n");
    }

    #[test]
    fn expansion_is_idempotent() {
        let src = "mcro GREET\nprn #1\nmcroend\nGREET\nstop\n";
        let (once, _) = preprocess(src);
        let (twice, diags) = preprocess(&once);
        assert!(!has_errors(&diags));
        assert_eq!(once, twice);
    }

    #[test]
    fn reserved_names_are_rejected() {
        let (_, diags) = preprocess("mcro mov\nmcroend\n");
        assert!(has_errors(&diags));
        let (_, diags) = preprocess("mcro .data\nmcroend\n");
        assert!(has_errors(&diags));
        let (_, diags) = preprocess("mcro fine\nmcroend\n");
        assert!(!has_errors(&diags));
    }

    #[test]
    fn trailing_tokens_are_rejected() {
        let (_, diags) = preprocess("mcro m extra\nmcroend\n");
        assert!(has_errors(&diags));
        let (_, diags) = preprocess("mcro m\nmcroend extra\n");
        assert!(has_errors(&diags));
    }

    #[test]
    fn nested_definitions_are_captured_verbatim() {
        let src = "mcro OUTER\nmcro INNER\nmcroend\nOUTER\n";
        let (out, diags) = preprocess(src);
        assert!(!has_errors(&diags));
        // the inner `mcro` line is body text, closed by the first `mcroend`
        assert_eq!(out, "mcro INNER\n");
    }

    #[test]
    fn unknown_names_fall_through() {
        let (out, diags) = preprocess("NOTDEFINED\n");
        assert!(!has_errors(&diags));
        assert_eq!(out, "NOTDEFINED\n");
    }
}
