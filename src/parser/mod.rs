//! C source scanning and declaration extraction
//!
//! This module turns C source text into the list of functions it defines:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Extraction (tokens → declarations + malformed regions)
//! - [`ast`]: Declaration definitions
//!
//! # What is recognized
//!
//! Only the top level of a file is examined. A definition is
//! `[static|extern] type name(params) { ... }`; bodies are skipped by brace
//! counting. Prototypes, variables, structs, typedefs and initializers are
//! stepped over without producing anything.
//!
//! # Not supported
//!
//! - Macro expansion and conditional compilation (directives are skipped)
//! - Functions returning function pointers
//! - K&R-style parameter declarations

pub mod ast;
mod declarations;
pub mod lexer;
pub mod parse;

pub use ast::{Declaration, Parameter, SourceLocation, StorageClass};
pub use lexer::{scan, tokenize, Lexer, ScanError, Token, TokenKind};
pub use parse::{extract, Extraction, MalformedSourceError};
