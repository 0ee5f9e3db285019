/*!
 * Content extraction: raw text, or line-pattern structural summaries
 *
 * Structural extraction is a line-anchored heuristic. It does not see nested
 * scopes, multi-line signatures, or keywords inside strings and comments.
 */

use std::fs;
use std::path::Path;

use log::trace;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::FileError;
use crate::rules::{extension_of, ExtensionTable, StructuralKind};

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[[:space:]]*class[[:space:]]+([A-Za-z_][A-Za-z0-9_]*)")
        .expect("class pattern is valid")
});

static DEF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[[:space:]]*def[[:space:]]+([_a-zA-Z0-9]+)").expect("def pattern is valid")
});

static ROUTE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?m)^[[:space:]]*@(?:app|router)\.(get|post|put|patch|delete)\(\s*["']([^"']+)"#,
    )
    .expect("route pattern is valid")
});

/// Summary lines for a declaration-bearing source file.
///
/// Order is all classes, then all functions, then all routes, each group in
/// file order.
pub fn extract_declarations(content: &str) -> Vec<String> {
    let classes = CLASS_RE
        .captures_iter(content)
        .map(|c| format!("class {}", &c[1]));
    let funcs = DEF_RE
        .captures_iter(content)
        .map(|c| format!("def {}", &c[1]));
    let routes = ROUTE_RE
        .captures_iter(content)
        .map(|c| format!("route {} {}", &c[1], &c[2]));

    classes.chain(funcs).chain(routes).collect()
}

/// Non-empty lines of a manifest, verbatim, in file order
pub fn extract_manifest(content: &str) -> Vec<String> {
    content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads files and produces raw text or structural summaries
#[derive(Debug, Clone, Copy)]
pub struct ContentExtractor<'a> {
    extensions: &'a ExtensionTable,
}

impl<'a> ContentExtractor<'a> {
    pub fn new(extensions: &'a ExtensionTable) -> Self {
        Self { extensions }
    }

    /// Full text of a supported file.
    ///
    /// Unsupported extensions are rejected before the file is opened.
    pub fn read_raw(&self, path: &Path) -> Result<String, FileError> {
        if !self.extensions.classify_path(path).is_text() {
            return Err(FileError::UnsupportedType {
                path: path.to_path_buf(),
                extension: extension_of(path),
            });
        }
        read_text(path)
    }

    /// Structural scan kind for a path, if it has one
    pub fn structural_kind(&self, path: &Path) -> Option<StructuralKind> {
        self.extensions.structural_kind(path)
    }

    /// Summary lines for a structural file
    pub fn structural(&self, path: &Path, kind: StructuralKind) -> Result<Vec<String>, FileError> {
        let content = read_text(path)?;
        let lines = match kind {
            StructuralKind::Declarations => extract_declarations(&content),
            StructuralKind::Manifest => extract_manifest(&content),
        };
        trace!("{}: {} {} line(s)", path.display(), lines.len(), kind);
        Ok(lines)
    }
}

fn read_text(path: &Path) -> Result<String, FileError> {
    fs::read_to_string(path).map_err(|source| FileError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const SOURCE: &str = r#"
from fastapi import APIRouter

router = APIRouter()

@router.get("/items")
def list_items():
    pass

class Item(BaseModel):
    name: str

    def describe(self):
        return self.name

@app.post('/items/{id}')
async def create_item():
    pass

  class   Nested_2:
    pass
# class Commented is skipped: the keyword does not lead the line
"#;

    #[test]
    fn test_declarations_grouped_in_order() {
        let lines = extract_declarations(SOURCE);
        assert_eq!(
            lines,
            vec![
                "class Item",
                "class Nested_2",
                "def list_items",
                "def describe",
                "route get /items",
                "route post /items/{id}",
            ]
        );
    }

    #[test]
    fn test_line_anchored_limits() {
        // async def is not a `def` at line start
        assert!(!extract_declarations("async def run():\n").contains(&"def run".to_string()));
        // a docstring line that starts with the keyword is picked up
        assert_eq!(
            extract_declarations("\"\"\"\ndef inside_docstring\n\"\"\"\n"),
            vec!["def inside_docstring"]
        );
        assert!(extract_declarations("x = 'class Foo'\n").is_empty());
        assert!(extract_declarations("@blueprint.get('/x')\n").is_empty());
    }

    #[test]
    fn test_manifest_lines() {
        let lines = extract_manifest("flask\r\n\n  \npytest==8.0\n");
        assert_eq!(lines, vec!["flask", "pytest==8.0"]);
    }

    #[test]
    fn test_read_raw_rejects_unsupported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("image.png");
        fs::write(&path, [0u8, 1, 2]).unwrap();

        let table = ExtensionTable::default();
        let err = ContentExtractor::new(&table).read_raw(&path).unwrap_err();
        assert!(matches!(err, FileError::UnsupportedType { ref extension, .. } if extension == "png"));
    }

    #[test]
    fn test_read_raw_missing_file() {
        let dir = tempdir().unwrap();
        let table = ExtensionTable::default();
        let err = ContentExtractor::new(&table)
            .read_raw(&dir.path().join("gone.md"))
            .unwrap_err();
        assert!(matches!(err, FileError::ReadFailure { .. }));
    }

    #[test]
    fn test_structural_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.py");
        fs::write(&path, "class Foo:\n    pass\n\ndef bar():\n    pass\n").unwrap();

        let table = ExtensionTable::default();
        let extractor = ContentExtractor::new(&table);
        let kind = extractor.structural_kind(&path).unwrap();
        assert_eq!(
            extractor.structural(&path, kind).unwrap(),
            vec!["class Foo", "def bar"]
        );
    }
}
