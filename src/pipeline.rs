//! Source text → header document in one call
//!
//! ```text
//! source ─ lexer::tokenize ─> tokens ─ parse::extract ─> declarations ─ header::synthesize ─> document
//! ```
//!
//! The pipeline holds no state between calls and never blocks; independent
//! inputs can be generated from as many threads as the caller likes.
//! Progress is reported through a [`Sink`] so the core does not depend on a
//! particular logging setup.

use crate::config::GenerationConfig;
use crate::header::{synthesize, HeaderContext, HeaderDocument};
use crate::parser::ast::Declaration;
use crate::parser::lexer::{tokenize, ScanError};
use crate::parser::parse::{extract, Extraction, MalformedSourceError};
use tracing::Level;

/// Receives diagnostics from the pipeline
pub trait Sink {
    fn emit(&self, level: Level, message: &str);
}

impl<F> Sink for F
where
    F: Fn(Level, &str),
{
    fn emit(&self, level: Level, message: &str) {
        self(level, message)
    }
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl Sink for TracingSink {
    fn emit(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            _ => tracing::trace!("{message}"),
        }
    }
}

/// Result of a run that got past scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Every definition found, before storage-class filtering
    pub declarations: Vec<Declaration>,
    /// Malformed regions that were skipped
    pub errors: Vec<MalformedSourceError>,
    pub document: HeaderDocument,
}

impl Generated {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Scan, extract and synthesize.
///
/// A [`ScanError`] aborts the run before extraction. Brace and paren
/// mismatches do not: they are collected in [`Generated::errors`] and the
/// header is built from whatever was recovered.
pub fn generate(
    source: &str,
    config: &GenerationConfig,
    context: &HeaderContext,
    sink: &dyn Sink,
) -> Result<Generated, ScanError> {
    let tokens = tokenize(source)?;
    sink.emit(Level::DEBUG, &format!("scanned {} tokens", tokens.len()));

    let Extraction {
        declarations,
        errors,
    } = extract(&tokens);
    for declaration in &declarations {
        sink.emit(
            Level::TRACE,
            &format!(
                "found {} function '{}' at line {}",
                declaration.storage_class, declaration.name, declaration.source_line
            ),
        );
    }

    let document = synthesize(&declarations, config, context);
    sink.emit(
        Level::DEBUG,
        &format!(
            "extracted {} definitions with {} malformed regions",
            declarations.len(),
            errors.len()
        ),
    );

    Ok(Generated {
        declarations,
        errors,
        document,
    })
}
