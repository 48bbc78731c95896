use color_print::ceprintln;
use thiserror::Error;

use arch::op::Op;

#[derive(Error, Debug)]
pub enum Error {
    // macro preprocessing
    #[error("Invalid macro name: `{0}`")]
    InvalidMacroName(String),

    #[error("Extra characters after `mcro {0}`")]
    ExtraAfterMacro(String),

    #[error("Extra characters after `mcroend`")]
    ExtraAfterMacroEnd,

    // lexical
    #[error("Line too long (max 80 characters)")]
    LineTooLong,

    #[error("Invalid symbol name (a letter then alphanumerics, max 30 characters)")]
    InvalidSymbol,

    #[error("Invalid number")]
    InvalidNumber,

    #[error("Number too long (max 4 characters including sign)")]
    NumberTooLong,

    #[error("Invalid immediate operand")]
    InvalidImmediate,

    #[error("Cannot parse operand `{0}`")]
    InvalidOperand(String),

    // structure
    #[error("Leading comma in value list")]
    LeadingComma,

    #[error("Trailing comma in value list")]
    TrailingComma,

    #[error("Double comma in value list")]
    DoubleComma,

    #[error("Missing comma between values")]
    MissingValueComma,

    #[error("Missing comma between operands")]
    MissingComma,

    #[error("Extra characters after operand")]
    ExtraText,

    #[error("String must be enclosed in double quotes")]
    UnquotedString,

    #[error("Missing closing `\"` in string")]
    UnterminatedString,

    #[error("Matrix dimensions must be two positive numbers in brackets")]
    BadMatrixDims,

    #[error("Matrix initializer has more values than cells")]
    MatrixOverflow,

    // semantic
    #[error("Unknown operation: `{0}`")]
    UnknownOperation(String),

    #[error("`{0}` expects no operands")]
    UnexpectedOperand(Op),

    #[error("`{0}` is missing an operand")]
    MissingOperand(Op),

    #[error("Illegal source addressing mode for `{0}`")]
    IllegalSrcMode(Op),

    #[error("Illegal destination addressing mode for `{0}`")]
    IllegalDstMode(Op),

    #[error("Symbol `{0}` already exists")]
    SymbolExists(String),

    #[error("Symbol `{0}` already defined as non-external")]
    ExternClash(String),

    #[error("Expecting symbol after `{0}`")]
    ExpectedSymbol(&'static str),

    #[error("Symbol `{0}` does not exist")]
    EntryMissing(String),

    #[error("Undefined symbol: `{0}`")]
    UndefinedSymbol(String),

    // io
    #[error("Failed to open file: {0}")]
    FileOpen(String, #[source] std::io::Error),

    #[error("Failed to create file: {0}")]
    FileCreate(String, #[source] std::io::Error),

    #[error("Can't finish the assembler process on file: {0}")]
    Failed(String),
}

// ----------------------------------------------------------------------------
// Diagnostics

#[derive(Debug)]
pub enum Msg {
    Error(Error),
    Warning(String),
}

/// One diagnostic tied to a 0-based line of the text a pass consumed.
#[derive(Debug)]
pub struct Diag {
    pub line: usize,
    pub msg: Msg,
}

impl Diag {
    pub fn error(line: usize, error: Error) -> Self {
        Diag {
            line,
            msg: Msg::Error(error),
        }
    }

    pub fn warning(line: usize, text: impl Into<String>) -> Self {
        Diag {
            line,
            msg: Msg::Warning(text.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.msg, Msg::Error(_))
    }

    /// Print the diagnostic with file location and line content.
    pub fn print(&self, file: &str, lines: &[&str]) {
        let line_num = self.line + 1;
        match &self.msg {
            Msg::Error(e) => ceprintln!("<red,bold>error</>: {}", e),
            Msg::Warning(w) => ceprintln!("<yellow,bold>warning</>: {}", w),
        }
        ceprintln!("     <blue>--></> <underline>{}:{}</>", file, line_num);
        ceprintln!("      <blue>|</>");
        let content = lines.get(self.line).copied().unwrap_or("");
        ceprintln!(" <blue>{:>4} |</> {}", line_num, content);
        ceprintln!("      <blue>|</>");
    }
}

pub fn has_errors(diags: &[Diag]) -> bool {
    diags.iter().any(Diag::is_error)
}
