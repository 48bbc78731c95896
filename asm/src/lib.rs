pub mod context;
pub mod driver;
pub mod error;
pub mod firstpass;
pub mod lexer;
pub mod macros;
pub mod operand;
pub mod order;
pub mod output;
pub mod secondpass;
pub mod symbols;

pub use context::Context;
pub use error::{Diag, Error};
