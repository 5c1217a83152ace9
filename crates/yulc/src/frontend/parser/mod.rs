//! Parser module for Yul code blocks and objects

mod parser;

pub use parser::Parser;
