use arch::addr::AddrMode;
use arch::reg::Reg;

use crate::error::Error;
use crate::lexer::{self, NumberCheck};

/// One instruction operand, already classified by addressing mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Immediate(i16),
    Direct(String),
    Matrix(String, Reg, Reg),
    Register(Reg),
}

impl Operand {
    pub fn mode(&self) -> AddrMode {
        match self {
            Operand::Immediate(_) => AddrMode::Immediate,
            Operand::Direct(_) => AddrMode::Direct,
            Operand::Matrix(..) => AddrMode::Matrix,
            Operand::Register(_) => AddrMode::Register,
        }
    }

    /// Classifies the operand starting at `i` and returns it with the
    /// index just past its text.
    pub fn parse(line: &str, i: usize) -> Result<(Operand, usize), Error> {
        if let Some(check) = lexer::immediate_at(line, i) {
            return match check {
                NumberCheck::Valid { value, end } => Ok((Operand::Immediate(value), end)),
                NumberCheck::TooLong => Err(Error::NumberTooLong),
                NumberCheck::Invalid => Err(Error::InvalidImmediate),
            };
        }
        if let Some((reg, _)) = lexer::register_at(line, i) {
            return Ok((Operand::Register(reg), i + 2));
        }
        if let Some((name_end, r1, r2, end)) = lexer::matrix_at(line, i) {
            return Ok((Operand::Matrix(line[i..name_end].to_string(), r1, r2), end));
        }
        if let Some(end) = lexer::symbol_end(line, i) {
            return Ok((Operand::Direct(line[i..end].to_string()), end));
        }
        Err(Error::InvalidOperand(operand_text(line, i).to_string()))
    }
}

fn operand_text(line: &str, i: usize) -> &str {
    let end = line[i..]
        .find([' ', '\t', ','])
        .map_or(line.len(), |offset| i + offset);
    &line[i..end]
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification() {
        assert_eq!(
            Operand::parse("#-5", 0).unwrap(),
            (Operand::Immediate(-5), 3)
        );
        assert_eq!(
            Operand::parse("r3", 0).unwrap(),
            (Operand::Register(Reg::R3), 2)
        );
        assert_eq!(
            Operand::parse("LABEL", 0).unwrap(),
            (Operand::Direct("LABEL".to_string()), 5)
        );
        assert_eq!(
            Operand::parse("M[r1][r2]", 0).unwrap(),
            (Operand::Matrix("M".to_string(), Reg::R1, Reg::R2), 9)
        );
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            Operand::parse("#x", 0),
            Err(Error::InvalidImmediate)
        ));
        assert!(matches!(
            Operand::parse("#12345", 0),
            Err(Error::NumberTooLong)
        ));
        assert!(matches!(
            Operand::parse("5x", 0),
            Err(Error::InvalidOperand(_))
        ));
    }

    #[test]
    fn incomplete_matrix_is_a_direct_symbol() {
        // the caller's trailing-text check turns this into an error
        let (operand, end) = Operand::parse("M[r1]", 0).unwrap();
        assert_eq!(operand, Operand::Direct("M".to_string()));
        assert_eq!(end, 1);
    }
}
