use num_enum::{FromPrimitive, IntoPrimitive};
use strum::{Display, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    FromPrimitive,
    IntoPrimitive,
    EnumString,
    Display,
)]
#[repr(u8)]
#[strum(serialize_all = "lowercase")]
pub enum Reg {
    #[default]
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    pub fn parse(s: &str) -> Result<Self, String> {
        match s.parse::<Self>() {
            Ok(r) => Ok(r),
            Err(_) => Err(format!("Unknown register name: {s}")),
        }
    }
}

#[test]
fn test() {
    assert_eq!(Reg::parse("r3"), Ok(Reg::R3));
    assert_eq!(u8::from(Reg::R7), 7);
    assert_eq!(Reg::from(5u8), Reg::R5);
    assert!(Reg::parse("r8").is_err());
    assert!(Reg::parse("hoge").is_err());
}
