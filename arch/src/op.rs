use num_enum::{IntoPrimitive, TryFromPrimitive};
use strum::{Display, EnumString};

use crate::addr::AddrMode;

/// The sixteen machine operations, in opcode order.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    IntoPrimitive,
    TryFromPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Op {
    Mov,
    Cmp,
    Add,
    Sub,
    Lea,
    Clr,
    Not,
    Inc,
    Dec,
    Jmp,
    Bne,
    Jsr,
    Red,
    Prn,
    Rts,
    Stop,
}

impl Op {
    pub fn parse(s: &str) -> Option<Self> {
        s.parse::<Self>().ok()
    }

    pub fn operands(self) -> usize {
        match u8::from(self) {
            0..=4 => 2,
            5..=13 => 1,
            _ => 0,
        }
    }

    pub fn src_legal(self, mode: AddrMode) -> bool {
        match self {
            Op::Mov | Op::Cmp | Op::Add | Op::Sub => true,
            Op::Lea => matches!(mode, AddrMode::Direct | AddrMode::Matrix),
            _ => false,
        }
    }

    pub fn dst_legal(self, mode: AddrMode) -> bool {
        match self {
            Op::Cmp | Op::Prn => true,
            Op::Rts | Op::Stop => false,
            _ => !matches!(mode, AddrMode::Immediate),
        }
    }
}

// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mnemonic_round_trip() {
        for code in 0u8..16 {
            let op = Op::try_from(code).unwrap();
            assert_eq!(Op::parse(&op.to_string()), Some(op));
            assert_eq!(u8::from(op), code);
        }
        assert_eq!(Op::parse("mov"), Some(Op::Mov));
        assert_eq!(Op::parse("stop"), Some(Op::Stop));
        assert_eq!(Op::parse("movx"), None);
        assert_eq!(Op::parse("MOV"), None);
    }

    #[test]
    fn operand_counts() {
        assert_eq!(Op::Mov.operands(), 2);
        assert_eq!(Op::Lea.operands(), 2);
        assert_eq!(Op::Clr.operands(), 1);
        assert_eq!(Op::Prn.operands(), 1);
        assert_eq!(Op::Rts.operands(), 0);
        assert_eq!(Op::Stop.operands(), 0);
    }

    #[test]
    fn legality_table() {
        use AddrMode::*;
        // mov/add/sub take any source but no immediate destination
        for op in [Op::Mov, Op::Add, Op::Sub] {
            for m in [Immediate, Direct, Matrix, Register] {
                assert!(op.src_legal(m));
            }
            assert!(!op.dst_legal(Immediate));
            assert!(op.dst_legal(Register));
        }
        // cmp and prn compare/print anything
        assert!(Op::Cmp.dst_legal(Immediate));
        assert!(Op::Prn.dst_legal(Immediate));
        // lea sources only from memory
        assert!(!Op::Lea.src_legal(Immediate));
        assert!(!Op::Lea.src_legal(Register));
        assert!(Op::Lea.src_legal(Matrix));
        // single-operand group rejects immediate destinations
        assert!(!Op::Jmp.dst_legal(Immediate));
        assert!(Op::Jmp.dst_legal(Direct));
    }
}
