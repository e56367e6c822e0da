//! # Introduction
//!
//! cheadergen reads a C source file, finds the functions it defines and
//! writes a matching header of forward declarations, optionally wrapped in an
//! include guard and headed by a templated comment.
//!
//! ## Generation pipeline
//!
//! ```text
//! Source → Lexer → Extractor → Declarations → Synthesizer → Header
//! ```
//!
//! 1. [`parser`] — tokenises the source and extracts top-level function
//!    definitions, collecting brace/paren mismatches instead of stopping.
//! 2. [`header`] — renders the declarations that pass the storage-class
//!    filter into a [`header::HeaderDocument`].
//! 3. [`pipeline`] — runs both in one call and reports through a
//!    [`pipeline::Sink`].
//! 4. [`config`] — layered options (defaults, TOML files, environment).
//! 5. [`host`] — filesystem reads and writes, project item lookup and the
//!    per-file generation job used by the binary.
//! 6. [`logging`] — the log line layout used by the binary's subscriber.
//!
//! ## Example
//!
//! ```
//! use cheadergen::config::GenerationConfig;
//! use cheadergen::header::HeaderContext;
//! use cheadergen::pipeline::{generate, TracingSink};
//!
//! let source = "static int twice(int x) { return 2 * x; }\nint api(void) { return twice(1); }";
//! let context = HeaderContext::new("api.h", "ada", "2024-03-01");
//! let generated = generate(source, &GenerationConfig::default(), &context, &TracingSink).unwrap();
//!
//! assert!(generated.document.lines().contains(&"int api(void);".to_string()));
//! assert!(!generated.document.to_text().contains("twice"));
//! ```

pub mod config;
pub mod header;
pub mod host;
pub mod logging;
pub mod parser;
pub mod pipeline;
