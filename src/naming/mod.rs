//! File-name handling: sanitization (`filter`) and the naming grammar (`grammar`).

pub mod filter;
pub mod grammar;

pub use filter::NameFilter;
pub use grammar::{GrammarError, NameGrammar, ParsedName};
