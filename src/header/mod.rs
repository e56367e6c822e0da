//! Header synthesis
//!
//! Renders extracted [`Declaration`]s into the text of a header file:
//!
//! ```text
//! #ifndef GUARD_H        ┐ only with emit_include_guard
//! #define GUARD_H        ┘
//!
//! /* comment template */   only when the template is non-empty
//!
//! int add(int a, int b);   one line per included declaration
//!
//! #endif                   only with emit_include_guard
//! ```
//!
//! Synthesis is total: any input, including an empty declaration list,
//! produces a document.

mod comment;
mod guard;

pub use comment::render_comment;
pub use guard::{guard_name, GuardCollision, GuardRegistry};

use crate::config::GenerationConfig;
use crate::parser::ast::{Declaration, StorageClass};
use std::fmt;
use std::path::PathBuf;

/// Values the host supplies for one header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderContext {
    /// Target header; only its base name matters (for the guard)
    pub header_file: PathBuf,
    /// Substituted for `{Name}`
    pub name: String,
    /// Substituted for `{Date}`, an ISO-8601 date
    pub date: String,
}

impl HeaderContext {
    pub fn new(header_file: impl Into<PathBuf>, name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            header_file: header_file.into(),
            name: name.into(),
            date: date.into(),
        }
    }

    /// Context dated with the local calendar day.
    pub fn today(header_file: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        let date = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        Self::new(header_file, name, date)
    }
}

/// The generated header, one entry per line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderDocument {
    lines: Vec<String>,
}

impl HeaderDocument {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    /// Lines joined with `\n`, with a trailing newline.
    pub fn to_text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    /// Append a section, separated from the previous one by a blank line.
    fn push_section(&mut self, section: Vec<String>) {
        if section.is_empty() {
            return;
        }
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.lines.extend(section);
    }
}

impl fmt::Display for HeaderDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// Whether `config` lets `declaration` into the header.
pub fn is_included(declaration: &Declaration, config: &GenerationConfig) -> bool {
    match declaration.storage_class {
        StorageClass::Global => true,
        StorageClass::Static => config.include_static,
        StorageClass::Extern => config.include_extern,
    }
}

/// Render `declarations` into a header document.
///
/// Declarations keep their source order. Entries with an empty name are
/// skipped.
pub fn synthesize(
    declarations: &[Declaration],
    config: &GenerationConfig,
    context: &HeaderContext,
) -> HeaderDocument {
    let mut document = HeaderDocument::default();

    let guard = config
        .emit_include_guard
        .then(|| guard_name(&context.header_file));
    if let Some(guard) = &guard {
        document.push_section(vec![format!("#ifndef {guard}"), format!("#define {guard}")]);
    }

    document.push_section(render_comment(&config.header_comment, &context.name, &context.date));

    let prototypes = declarations
        .iter()
        .filter(|d| !d.name.is_empty() && is_included(d, config))
        .map(Declaration::prototype)
        .collect();
    document.push_section(prototypes);

    if guard.is_some() {
        document.push_section(vec!["#endif".to_string()]);
    }

    document
}
