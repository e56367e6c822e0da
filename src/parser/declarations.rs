//! Function signature recognition
//!
//! This module decides whether the run of tokens in front of a top-level `{`
//! is a function definition, and if so turns it into a [`Declaration`]:
//!
//! ```text
//! definition ::= [storage_class] type_tokens identifier "(" params ")" "{"
//! params     ::= param ("," param)*
//! ```
//!
//! Parameter text is kept verbatim (function pointers, arrays, `...`), only
//! the spacing between tokens is normalized by [`join_tokens`].
//!
//! All methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::lexer::Token;
use crate::parser::parse::Parser;

/// Keywords dropped from the return type because a prototype cannot use them
const FUNCTION_SPECIFIERS: &[&str] = &["inline", "__inline", "__inline__", "_Noreturn"];

/// Qualifiers that may sit between `*` and the name of a function pointer
const POINTER_QUALIFIERS: &[&str] = &["const", "volatile", "restrict"];

impl Parser<'_> {
    /// Recognize `[storage] type name(params)` in `tokens[start..end]`, the
    /// run that precedes a top-level `{`.
    pub(crate) fn function_signature(&self, start: usize, end: usize) -> Option<Declaration> {
        let run = &self.tokens[start..end];
        let (last, _) = run.split_last()?;
        if !last.is_punct(")") {
            return None;
        }

        let open = matching_open_paren(run)?;
        if open == 0 {
            return None;
        }
        let name = run[open - 1];
        if !name.is_identifier() {
            return None;
        }

        let prefix = &run[..open - 1];
        if prefix
            .iter()
            .any(|t| t.is_punct("=") || t.is_punct(",") || t.is_punct("{") || t.is_punct("}"))
        {
            return None;
        }

        let mut storage_class = StorageClass::Global;
        let mut type_tokens = Vec::with_capacity(prefix.len());
        for token in prefix {
            if token.is_keyword("static") {
                storage_class = StorageClass::Static;
            } else if token.is_keyword("extern") {
                storage_class = StorageClass::Extern;
            } else if token.is_keyword("typedef") {
                return None;
            } else if FUNCTION_SPECIFIERS.contains(&token.text.as_str()) {
                continue;
            } else {
                type_tokens.push(*token);
            }
        }
        if type_tokens.is_empty() {
            return None;
        }

        Some(Declaration {
            name: name.text.clone(),
            return_type: join_tokens(&type_tokens),
            parameters: split_parameters(&run[open + 1..run.len() - 1]),
            storage_class,
            source_line: name.location.line,
        })
    }
}

/// Index of the `(` matching the final `)` of `run`.
fn matching_open_paren(run: &[&Token]) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in run.iter().enumerate().rev() {
        if token.is_punct(")") {
            depth += 1;
        } else if token.is_punct("(") {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Split the tokens between the parameter parens at top-level commas.
pub(crate) fn split_parameters(tokens: &[&Token]) -> Vec<Parameter> {
    let mut params = Vec::new();
    if tokens.is_empty() {
        return params;
    }

    let mut depth = 0usize;
    let mut start = 0;
    for (i, token) in tokens.iter().enumerate() {
        if token.is_punct("(") || token.is_punct("[") {
            depth += 1;
        } else if token.is_punct(")") || token.is_punct("]") {
            depth = depth.saturating_sub(1);
        } else if token.is_punct(",") && depth == 0 {
            params.push(parameter(&tokens[start..i]));
            start = i + 1;
        }
    }
    params.push(parameter(&tokens[start..]));
    params
}

fn parameter(tokens: &[&Token]) -> Parameter {
    let text = join_tokens(tokens);
    match parameter_name_index(tokens) {
        Some(index) => {
            let ty: Vec<&Token> = tokens
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, t)| *t)
                .collect();
            Parameter {
                text,
                ty: join_tokens(&ty),
                name: Some(tokens[index].text.clone()),
            }
        }
        None => Parameter {
            ty: text.clone(),
            text,
            name: None,
        },
    }
}

/// Position of the declared name inside one parameter, if it has one.
///
/// `int (*cb)(int)` names `cb`; `char buf[16]` names `buf`; `void`,
/// `...`, `size_t` and `struct point` are unnamed.
fn parameter_name_index(tokens: &[&Token]) -> Option<usize> {
    if tokens.len() < 2 {
        return None;
    }

    // Function pointer: `( * [qualifiers] name )`
    for (j, token) in tokens.iter().enumerate() {
        if token.is_punct("(") && tokens.get(j + 1).is_some_and(|t| t.is_punct("*")) {
            let mut k = j + 1;
            while k < tokens.len()
                && (tokens[k].is_punct("*") || POINTER_QUALIFIERS.contains(&tokens[k].text.as_str()))
            {
                k += 1;
            }
            return tokens.get(k).filter(|t| t.is_identifier()).map(|_| k);
        }
    }

    // Strip array suffixes: `name[4][8]`
    let mut end = tokens.len();
    while end > 0 && tokens[end - 1].is_punct("]") {
        let open = tokens[..end].iter().rposition(|t| t.is_punct("["))?;
        end = open;
    }
    if end < 2 {
        return None;
    }

    let candidate = end - 1;
    let before = tokens[candidate - 1];
    let names_a_tag = ["struct", "union", "enum"]
        .iter()
        .any(|kw| before.is_keyword(kw));
    if tokens[candidate].is_identifier() && !names_a_tag {
        Some(candidate)
    } else {
        None
    }
}

/// Re-join token text with conventional C spacing: `char *s`,
/// `int (*cb)(int, int)`, `int m[2][3]`.
pub(crate) fn join_tokens(tokens: &[&Token]) -> String {
    let mut out = String::new();
    let mut prev: Option<&Token> = None;
    for token in tokens {
        if let Some(prev) = prev {
            if needs_space(prev, token) {
                out.push(' ');
            }
        }
        out.push_str(&token.text);
        prev = Some(*token);
    }
    out
}

fn needs_space(prev: &Token, next: &Token) -> bool {
    if prev.is_punct("(") || prev.is_punct("[") || prev.is_punct("*") {
        return false;
    }
    if next.is_punct(")") || next.is_punct("]") || next.is_punct(",") || next.is_punct("[") {
        return false;
    }
    !(next.is_punct("(") && prev.is_punct(")"))
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::{Parameter, StorageClass};
    use crate::parser::lexer::tokenize;
    use crate::parser::parse::extract;

    fn single(source: &str) -> crate::parser::ast::Declaration {
        let extraction = extract(&tokenize(source).unwrap());
        assert!(extraction.is_clean(), "errors: {:?}", extraction.errors);
        assert_eq!(extraction.declarations.len(), 1);
        extraction.declarations.into_iter().next().unwrap()
    }

    fn texts(params: &[Parameter]) -> Vec<&str> {
        params.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_storage_classes() {
        assert_eq!(single("static int f(void) {}").storage_class, StorageClass::Static);
        assert_eq!(single("extern int f(void) {}").storage_class, StorageClass::Extern);
        assert_eq!(single("int f(void) {}").storage_class, StorageClass::Global);
    }

    #[test]
    fn test_storage_class_removed_from_return_type() {
        let decl = single("static inline unsigned long hash(const char *key) { return 0; }");
        assert_eq!(decl.return_type, "unsigned long");
        assert_eq!(decl.storage_class, StorageClass::Static);
    }

    #[test]
    fn test_pointer_return_type() {
        let decl = single("char **split(char *s, int *count) { return 0; }");
        assert_eq!(decl.return_type, "char **");
        assert_eq!(texts(&decl.parameters), vec!["char *s", "int *count"]);
    }

    #[test]
    fn test_parameter_names_and_types() {
        let decl = single("void copy(const char *src, char dst[16], struct point p) {}");

        let names: Vec<_> = decl.parameters.iter().map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec![Some("src"), Some("dst"), Some("p")]);
        assert_eq!(decl.parameters[0].ty, "const char *");
        assert_eq!(decl.parameters[1].ty, "char[16]");
        assert_eq!(decl.parameters[2].ty, "struct point");
    }

    #[test]
    fn test_function_pointer_parameter_is_verbatim() {
        let decl = single("void each(int (*cb)(int, int), void *ctx) {}");

        assert_eq!(texts(&decl.parameters), vec!["int (*cb)(int, int)", "void *ctx"]);
        assert_eq!(decl.parameters[0].name.as_deref(), Some("cb"));
        assert_eq!(decl.parameters[0].ty, "int (*)(int, int)");
    }

    #[test]
    fn test_variadic_parameter() {
        let decl = single("int log_msg(const char *fmt, ...) { return 0; }");

        assert_eq!(texts(&decl.parameters), vec!["const char *fmt", "..."]);
        assert!(decl.parameters[1].is_variadic());
        assert_eq!(decl.parameters[1].name, None);
    }

    #[test]
    fn test_unnamed_parameters() {
        let decl = single("int f(void) {}");
        assert_eq!(decl.parameters[0].name, None);

        let decl = single("int g(struct point, size_t) {}");
        assert_eq!(decl.parameters[0].name, None);
        assert_eq!(decl.parameters[1].name, None);
    }

    #[test]
    fn test_comments_inside_signature_are_ignored() {
        let decl = single("int /* count */ total(int a /* first */, int b) { return a + b; }");
        assert_eq!(decl.return_type, "int");
        assert_eq!(texts(&decl.parameters), vec!["int a", "int b"]);
    }

    #[test]
    fn test_multiline_signature_reports_name_line() {
        let decl = single("static void\nprint_usage(\n    const char *prog)\n{\n}\n");
        assert_eq!(decl.source_line, 2);
        assert_eq!(texts(&decl.parameters), vec!["const char *prog"]);
    }

    #[test]
    fn test_implicit_int_is_not_a_definition() {
        let extraction = extract(&tokenize("main() { return 0; }").unwrap());
        assert!(extraction.declarations.is_empty());
        assert!(extraction.is_clean());
    }
}
