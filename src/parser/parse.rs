//! Main extractor coordinator
//!
//! This module provides the [`Parser`] struct and the top-level scan that walks
//! a token stream at brace depth zero, plus the [`MalformedSourceError`] type
//! and the [`Extraction`] result.
//!
//! # Extractor Architecture
//!
//! - This module: Parser struct, token cursor helpers, the depth-0 loop and
//!   brace/paren bookkeeping
//! - `declarations`: recognizing a function signature in a run of tokens,
//!   splitting parameters and re-joining token text
//!
//! Bodies are never parsed. Once a `{` is seen at depth zero the parser only
//! counts braces until the matching `}`.
//!
//! # Error recovery
//!
//! Malformed regions are recorded and skipped. The parser resynchronizes at
//! the next top-level `;` or `}` so that one bad definition does not hide the
//! ones around it.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use thiserror::Error;

/// Brace or paren mismatch found while extracting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedSourceError {
    #[error("unmatched '}}' at {location}")]
    UnmatchedCloseBrace { location: SourceLocation },

    #[error("'{{' opened at {location} is never closed")]
    UnclosedBrace { location: SourceLocation },

    #[error("unmatched ')' at {location}")]
    UnmatchedCloseParen { location: SourceLocation },

    #[error("'(' opened at {location} is never closed")]
    UnclosedParen { location: SourceLocation },
}

impl MalformedSourceError {
    pub fn location(&self) -> SourceLocation {
        match self {
            MalformedSourceError::UnmatchedCloseBrace { location }
            | MalformedSourceError::UnclosedBrace { location }
            | MalformedSourceError::UnmatchedCloseParen { location }
            | MalformedSourceError::UnclosedParen { location } => *location,
        }
    }
}

/// Everything the extractor found in one token stream.
///
/// `declarations` keeps source order. `errors` lists every malformed region
/// in the order it was encountered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub declarations: Vec<Declaration>,
    pub errors: Vec<MalformedSourceError>,
}

impl Extraction {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Extract the function definitions from a token stream.
pub fn extract(tokens: &[Token]) -> Extraction {
    Parser::new(tokens).extract()
}

/// Depth-tracking extractor over a comment-free token stream
pub struct Parser<'a> {
    pub(crate) tokens: Vec<&'a Token>,
    pub(crate) position: usize,
    errors: Vec<MalformedSourceError>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens: tokens.iter().filter(|t| !t.is_comment()).collect(),
            position: 0,
            errors: Vec::new(),
        }
    }

    /// Walk the top level once, collecting definitions and errors.
    pub fn extract(mut self) -> Extraction {
        let mut declarations = Vec::new();
        let mut run_start = 0;
        let mut open_parens: Vec<SourceLocation> = Vec::new();
        let mut run_broken = false;

        while let Some(token) = self.peek() {
            let location = token.location;

            if token.is_punct("(") {
                open_parens.push(location);
                self.advance();
            } else if token.is_punct(")") {
                if open_parens.pop().is_none() {
                    self.errors
                        .push(MalformedSourceError::UnmatchedCloseParen { location });
                    run_broken = true;
                }
                self.advance();
            } else if token.is_punct(";") {
                // Declarations and prototypes end here; neither is emitted
                if let Some(open) = open_parens.first() {
                    self.errors
                        .push(MalformedSourceError::UnclosedParen { location: *open });
                }
                self.advance();
                run_start = self.position;
                open_parens.clear();
                run_broken = false;
            } else if token.is_punct("{") {
                let candidate = if let Some(open) = open_parens.first() {
                    self.errors
                        .push(MalformedSourceError::UnclosedParen { location: *open });
                    run_broken = true;
                    None
                } else if run_broken {
                    None
                } else {
                    self.function_signature(run_start, self.position)
                };
                let body_like = self.position > run_start && self.tokens[self.position - 1].is_punct(")");
                open_parens.clear();

                self.advance();
                if let Err(err) = self.skip_block(location) {
                    self.errors.push(err);
                    break;
                }

                // A body ends its run at the closing brace. Any other block
                // (struct body, initializer) is part of a run ending in ';'.
                if let Some(declaration) = candidate {
                    declarations.push(declaration);
                }
                if body_like || run_broken {
                    run_start = self.position;
                    run_broken = false;
                }
            } else if token.is_punct("}") {
                // Depth would go negative: drop the brace and resync after it
                self.errors
                    .push(MalformedSourceError::UnmatchedCloseBrace { location });
                self.advance();
                run_start = self.position;
                open_parens.clear();
                run_broken = false;
            } else {
                self.advance();
            }
        }

        if let Some(open) = open_parens.first() {
            self.errors
                .push(MalformedSourceError::UnclosedParen { location: *open });
        }

        Extraction {
            declarations,
            errors: self.errors,
        }
    }

    /// Skip tokens up to and including the `}` matching an already consumed
    /// `{` opened at `open`.
    fn skip_block(&mut self, open: SourceLocation) -> Result<(), MalformedSourceError> {
        let mut depth = 1usize;
        while let Some(token) = self.peek() {
            if token.is_punct("{") {
                depth += 1;
            } else if token.is_punct("}") {
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    return Ok(());
                }
            }
            self.advance();
        }
        Err(MalformedSourceError::UnclosedBrace { location: open })
    }

    // ===== Helper methods =====

    pub(crate) fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.position).copied()
    }

    pub(crate) fn advance(&mut self) -> Option<&'a Token> {
        let token = self.peek();
        if token.is_some() {
            self.position += 1;
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn run(source: &str) -> Extraction {
        extract(&tokenize(source).unwrap())
    }

    fn names(extraction: &Extraction) -> Vec<&str> {
        extraction
            .declarations
            .iter()
            .map(|d| d.name.as_str())
            .collect()
    }

    #[test]
    fn test_extract_simple_function() {
        let extraction = run("int main() { return 0; }");

        assert!(extraction.is_clean());
        assert_eq!(extraction.declarations.len(), 1);
        let decl = &extraction.declarations[0];
        assert_eq!(decl.name, "main");
        assert_eq!(decl.return_type, "int");
        assert!(decl.parameters.is_empty());
        assert_eq!(decl.storage_class, StorageClass::Global);
        assert_eq!(decl.source_line, 1);
    }

    #[test]
    fn test_prototypes_are_not_duplicated() {
        let extraction = run("void run(void);\nvoid run(void) { }");

        assert_eq!(names(&extraction), vec!["run"]);
        assert_eq!(extraction.declarations[0].source_line, 2);
    }

    #[test]
    fn test_nested_blocks_are_skipped() {
        let source = r#"
            int outer(int x) {
                if (x) { while (x--) { call(x); } }
                return x;
            }
            int after(void) { return 1; }
        "#;
        let extraction = run(source);

        assert!(extraction.is_clean());
        assert_eq!(names(&extraction), vec!["outer", "after"]);
    }

    #[test]
    fn test_structs_and_initializers_are_not_functions() {
        let source = r#"
            struct point { int x; int y; };
            typedef struct { int w; } box;
            int table[] = { 1, 2, 3 };
            static const char *names[] = { "a", "b" };
            struct point origin(void) { struct point p = { 0, 0 }; return p; }
        "#;
        let extraction = run(source);

        assert!(extraction.is_clean());
        assert_eq!(names(&extraction), vec!["origin"]);
        assert_eq!(extraction.declarations[0].return_type, "struct point");
    }

    #[test]
    fn test_unclosed_brace_keeps_earlier_declarations() {
        let source = "int before(void) { return 0; }\nvoid f() { if (x) { return; }";
        let extraction = run(source);

        assert_eq!(names(&extraction), vec!["before"]);
        assert_eq!(
            extraction.errors,
            vec![MalformedSourceError::UnclosedBrace {
                location: SourceLocation::new(2, 10)
            }]
        );
    }

    #[test]
    fn test_unmatched_close_brace_resyncs() {
        let source = "int a(void) { return 1; } }\nint b(void) { return 2; }";
        let extraction = run(source);

        assert_eq!(names(&extraction), vec!["a", "b"]);
        assert_eq!(
            extraction.errors,
            vec![MalformedSourceError::UnmatchedCloseBrace {
                location: SourceLocation::new(1, 27)
            }]
        );
    }

    #[test]
    fn test_paren_mismatch_is_recoverable() {
        let source = "int bad(int a { return a; }\nint good(int b) { return b; }";
        let extraction = run(source);

        assert_eq!(names(&extraction), vec!["good"]);
        assert_eq!(
            extraction.errors,
            vec![MalformedSourceError::UnclosedParen {
                location: SourceLocation::new(1, 8)
            }]
        );
    }

    #[test]
    fn test_stray_close_paren_discards_run() {
        let extraction = run("int x = 1);\nint ok(void) { return 0; }");

        assert_eq!(names(&extraction), vec!["ok"]);
        assert!(matches!(
            extraction.errors[0],
            MalformedSourceError::UnmatchedCloseParen { .. }
        ));
    }

    #[test]
    fn test_empty_and_comment_only_input() {
        assert_eq!(run(""), Extraction::default());
        assert_eq!(run("/* nothing */\n// here\n"), Extraction::default());
    }
}
