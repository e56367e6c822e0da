//! Options that shape the generated header.

use serde::{Deserialize, Serialize};

/// Comment written at the top of every header unless overridden.
pub const DEFAULT_HEADER_COMMENT: &str = "/*
    Header file generated by C Header Generator.
    Executed by {Name} on {Date}.
*/";

/// Read-only snapshot consumed by [`crate::header::synthesize`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Surround the header with `#ifndef`/`#define`/`#endif`.
    #[serde(alias = "show_include_guard")]
    pub emit_include_guard: bool,

    /// Comment template; `{Name}` and `{Date}` are substituted.
    pub header_comment: String,

    /// Emit prototypes for `static` definitions.
    pub include_static: bool,

    /// Emit prototypes for `extern` definitions.
    pub include_extern: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            emit_include_guard: true,
            header_comment: DEFAULT_HEADER_COMMENT.to_string(),
            include_static: false,
            include_extern: false,
        }
    }
}
