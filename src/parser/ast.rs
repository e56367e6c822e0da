// Declaration model shared by the extractor and the header synthesizer

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Linkage qualifier written in front of a function definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StorageClass {
    /// No qualifier: external linkage by default
    #[default]
    Global,
    /// `static`: file-local
    Static,
    /// `extern`: explicit external linkage
    Extern,
}

impl StorageClass {
    /// The keyword to print in front of a prototype, if any.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            StorageClass::Global => None,
            StorageClass::Static => Some("static"),
            StorageClass::Extern => Some("extern"),
        }
    }
}

impl fmt::Display for StorageClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword().unwrap_or("global"))
    }
}

/// One entry of a function's parameter list.
///
/// `text` is the parameter exactly as written (with normalized spacing);
/// `ty` is the same text with the parameter name removed. `void` and `...`
/// are parameters without a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub text: String,
    pub ty: String,
    pub name: Option<String>,
}

impl Parameter {
    pub fn is_variadic(&self) -> bool {
        self.text == "..."
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// A function definition found at the top level of a source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub name: String,
    pub return_type: String,
    pub parameters: Vec<Parameter>,
    pub storage_class: StorageClass,
    /// Line of the function name
    pub source_line: usize,
}

impl Declaration {
    /// The parameter list joined the way it is printed in a prototype.
    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Render the prototype line, storage class included.
    pub fn prototype(&self) -> String {
        let mut line = String::new();
        if let Some(keyword) = self.storage_class.keyword() {
            line.push_str(keyword);
            line.push(' ');
        }
        line.push_str(&self.return_type);
        // `char *dup(...)` reads better than `char * dup(...)`
        if !self.return_type.ends_with('*') {
            line.push(' ');
        }
        line.push_str(&self.name);
        line.push('(');
        line.push_str(&self.parameter_list());
        line.push_str(");");
        line
    }
}
