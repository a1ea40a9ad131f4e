//! Lowers the hindic AST to C source text.

pub mod emit;
