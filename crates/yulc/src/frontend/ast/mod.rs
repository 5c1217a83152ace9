//! Abstract Syntax Tree definitions

mod expr;
mod object;
mod stmt;

pub use expr::*;
pub use object::*;
pub use stmt::*;
