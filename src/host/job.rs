//! One generation job per source file
//!
//! read → pipeline → report malformed regions → write (or hand back the text)

use super::{Host, HostError, WriteOutcome};
use crate::config::Options;
use crate::header::{GuardRegistry, HeaderContext};
use crate::parser::lexer::ScanError;
use crate::parser::parse::MalformedSourceError;
use crate::pipeline::{self, TracingSink};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Host(#[from] HostError),

    #[error("{}: {source}", path.display())]
    Scan { path: PathBuf, source: ScanError },

    #[error("refusing to overwrite source '{}' with its header", path.display())]
    HeaderIsSource { path: PathBuf },
}

/// What a finished job produced
#[derive(Debug, Clone)]
pub struct Report {
    pub source: PathBuf,
    pub header: PathBuf,
    pub outcome: WriteOutcome,
    /// Prototypes written into the header
    pub prototypes: usize,
    pub errors: Vec<MalformedSourceError>,
    pub text: String,
}

/// Runs jobs against a host with one options snapshot.
///
/// Guards are tracked across every job of the generator so that two targets
/// mapping to the same guard are reported.
pub struct Generator<'a> {
    host: &'a dyn Host,
    options: &'a Options,
    author: String,
    date: Option<String>,
    guards: GuardRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(host: &'a dyn Host, options: &'a Options, author: impl Into<String>) -> Self {
        Self {
            host,
            options,
            author: author.into(),
            date: None,
            guards: GuardRegistry::new(),
        }
    }

    /// Use a fixed `{Date}` instead of today's date.
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    /// Generate the header for `source`, at `output` when given.
    pub fn generate_file(&mut self, source: &Path, output: Option<&Path>) -> Result<Report, GenerateError> {
        let text = self.host.read_source(source)?;
        let header = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.host.resolve_header_path(source));
        debug!("generating '{}' from '{}'", header.display(), source.display());

        if self.options.auto_save_files && self.host.same_file(source, &header) {
            return Err(GenerateError::HeaderIsSource {
                path: source.to_path_buf(),
            });
        }

        if self.options.generation.emit_include_guard {
            if let Err(collision) = self.guards.claim(&header) {
                warn!(
                    "include guard {} is shared by '{}' and '{}'",
                    collision.guard,
                    collision.first.display(),
                    collision.second.display()
                );
            }
        }

        let context = match &self.date {
            Some(date) => HeaderContext::new(&header, &self.author, date),
            None => HeaderContext::today(&header, &self.author),
        };

        let generated = pipeline::generate(&text, &self.options.generation, &context, &TracingSink)
            .map_err(|err| GenerateError::Scan {
                path: source.to_path_buf(),
                source: err,
            })?;

        for err in &generated.errors {
            warn!("{}:{}: {err}", source.display(), err.location().line);
        }

        let text = generated.document.to_text();
        let outcome = if self.options.auto_save_files {
            self.host.write_header(&header, &text)?
        } else {
            WriteOutcome::Skipped
        };

        let prototypes = generated
            .declarations
            .iter()
            .filter(|d| crate::header::is_included(d, &self.options.generation))
            .count();
        match outcome {
            WriteOutcome::Written => info!("wrote {} ({prototypes} prototypes)", header.display()),
            WriteOutcome::Unchanged => info!("{} is up to date", header.display()),
            WriteOutcome::Skipped => debug!("auto-save off, not writing {}", header.display()),
        }

        Ok(Report {
            source: source.to_path_buf(),
            header,
            outcome,
            prototypes,
            errors: generated.errors,
            text,
        })
    }
}
