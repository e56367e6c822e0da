//! Project item lookup
//!
//! A project is the flat list of files that sit next to a source file. The
//! host uses it to find a header that already exists under a different
//! spelling (`Parser.H` for `parser.h`) so it is overwritten in place rather
//! than duplicated.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// A file that belongs to a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItem {
    pub name: String,
    pub path: PathBuf,
}

impl ProjectItem {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self { name, path }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Project {
    items: Vec<ProjectItem>,
}

impl Project {
    pub fn new(items: Vec<ProjectItem>) -> Self {
        Self { items }
    }

    /// List the regular files directly inside `root`, sorted by name.
    pub fn load(root: &Path) -> io::Result<Self> {
        let mut items = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                items.push(ProjectItem::new(entry.path()));
            }
        }
        items.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self { items })
    }

    pub fn items(&self) -> &[ProjectItem] {
        &self.items
    }

    /// Find the item whose file name matches the file name of `item`,
    /// ignoring case. Directories in `item` are not compared.
    pub fn locate_existing_item(&self, item: &Path) -> Option<&ProjectItem> {
        let wanted = item.file_name()?.to_string_lossy().to_lowercase();
        self.items
            .iter()
            .find(|candidate| candidate.name.to_lowercase() == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn project() -> Project {
        Project::new(vec![
            ProjectItem::new("src/main.c"),
            ProjectItem::new("src/Parser.H"),
            ProjectItem::new("src/README"),
        ])
    }

    #[test]
    fn test_locate_ignores_case() {
        let project = project();
        let found = project.locate_existing_item(Path::new("parser.h")).unwrap();
        assert_eq!(found.path, PathBuf::from("src/Parser.H"));
    }

    #[test]
    fn test_locate_compares_file_name_only() {
        let project = project();
        let found = project
            .locate_existing_item(Path::new("/elsewhere/MAIN.C"))
            .unwrap();
        assert_eq!(found.name, "main.c");
    }

    #[test]
    fn test_locate_absent() {
        assert!(project().locate_existing_item(Path::new("lexer.h")).is_none());
        assert!(project().locate_existing_item(Path::new("/")).is_none());
    }

    #[test]
    fn test_load_lists_files_only() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("b.c"), "").unwrap();
        fs::write(dir.path().join("a.h"), "").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();

        let project = Project::load(dir.path()).unwrap();
        let names: Vec<_> = project.items().iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["a.h", "b.c"]);
    }
}
