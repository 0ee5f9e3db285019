/*!
 * End-to-end tests for repoclip runs
 */

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::{tempdir, TempDir};

use crate::aggregate::Aggregator;
use crate::error::FileError;
use crate::rules::Rules;
use crate::types::Mode;

// a.py, requirements.txt and an ignored venv/ with a python file inside
fn setup_python_project() -> io::Result<TempDir> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();

    fs::write(
        root.join("a.py"),
        "def bar():\n    return 1\n\nclass Foo:\n    pass\n",
    )?;
    fs::write(root.join("requirements.txt"), "flask\npytest\n")?;
    fs::create_dir(root.join("venv"))?;
    fs::write(root.join("venv").join("x.py"), "class Hidden:\n    pass\n")?;

    Ok(temp_dir)
}

fn tree(root: &Path, rules: &Rules) -> String {
    Aggregator::new(rules)
        .run(Mode::Tree, &[root.to_path_buf()])
        .unwrap()
        .text
}

#[test]
fn test_tree_python_project() -> io::Result<()> {
    let temp_dir = setup_python_project()?;
    let rules = Rules::default();

    let output = tree(temp_dir.path(), &rules);
    assert_eq!(
        output,
        [
            ".",
            "├── a.py",
            "│   ├── class Foo",
            "│   └── def bar",
            "└── requirements.txt",
            "    ├── flask",
            "    └── pytest",
        ]
        .join("\n")
    );
    assert!(!output.contains("venv"));
    assert!(!output.contains("Hidden"));

    Ok(())
}

#[test]
fn test_default_ignores_match_whole_names() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let root = temp_dir.path();
    for name in ["downloads_service.py", "alembic.ini", "venv_check.md", "main.py"] {
        fs::write(root.join(name), "")?;
    }
    for dir in ["venv", "alembic", "downloads", "__pycache__"] {
        fs::create_dir(root.join(dir))?;
        fs::write(root.join(dir).join("inner.md"), "")?;
    }

    let rules = Rules::default();
    assert_eq!(
        tree(root, &rules),
        [
            ".",
            "├── alembic.ini",
            "├── downloads_service.py",
            "├── main.py",
            "└── venv_check.md",
        ]
        .join("\n")
    );

    Ok(())
}

#[test]
fn test_tree_routes_nested_after_declarations() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::write(
        temp_dir.path().join("api.py"),
        "@router.get(\"/items\")\ndef list_items():\n    pass\n\n@app.post('/items')\ndef create():\n    pass\n",
    )?;

    let rules = Rules::default();
    assert_eq!(
        tree(temp_dir.path(), &rules),
        [
            ".",
            "└── api.py",
            "    ├── def list_items",
            "    ├── def create",
            "    ├── route get /items",
            "    └── route post /items",
        ]
        .join("\n")
    );

    Ok(())
}

#[test]
fn test_runs_are_deterministic() -> io::Result<()> {
    let temp_dir = setup_python_project()?;
    fs::create_dir(temp_dir.path().join("docs"))?;
    fs::write(temp_dir.path().join("docs").join("guide.md"), "# Guide\n")?;
    let rules = Rules::default();
    let roots = [temp_dir.path().to_path_buf()];

    for mode in [Mode::Tree, Mode::Flat] {
        let first = Aggregator::new(&rules).run(mode, &roots).unwrap().text;
        let second = Aggregator::new(&rules).run(mode, &roots).unwrap().text;
        assert_eq!(first, second, "{} mode differs between runs", mode);
    }

    Ok(())
}

#[test]
fn test_empty_root_is_marker_only() -> io::Result<()> {
    let temp_dir = tempdir()?;
    fs::create_dir(temp_dir.path().join("__pycache__"))?;
    fs::create_dir(temp_dir.path().join("venv"))?;
    fs::write(temp_dir.path().join("venv").join("x.py"), "")?;

    let rules = Rules::default();
    let outcome = Aggregator::new(&rules)
        .run(Mode::Tree, &[temp_dir.path().to_path_buf()])
        .unwrap();
    assert_eq!(outcome.text, ".");
    assert!(outcome.errors.is_empty());

    Ok(())
}

#[test]
fn test_flat_two_files_in_input_order() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let note = temp_dir.path().join("note.md");
    let script = temp_dir.path().join("script.py");
    fs::write(&note, "hi")?;
    fs::write(&script, "print(1)")?;

    let rules = Rules::default();
    let outcome = Aggregator::new(&rules)
        .run(Mode::Flat, &[note, script])
        .unwrap();

    let blocks = rules.comments.split_blocks(&outcome.text);
    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].filename, "note.md");
    assert_eq!(blocks[0].content, "hi");
    assert_eq!(blocks[1].filename, "script.py");
    assert_eq!(blocks[1].content, "print(1)");

    let note_at = outcome.text.find("<!-- ").unwrap();
    let script_at = outcome.text.find("# ").unwrap();
    assert!(note_at < script_at);
    assert!(outcome.text.contains("<!-- End of file: note.md -->"));
    assert!(outcome.text.contains("# End of file: script.py"));

    Ok(())
}

#[test]
fn test_flat_structural_files_dump_raw() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let file = temp_dir.path().join("a.py");
    fs::write(&file, "class Foo:\n    pass\n")?;

    let rules = Rules::default();
    let outcome = Aggregator::new(&rules).run(Mode::Flat, &[file]).unwrap();
    let blocks = rules.comments.split_blocks(&outcome.text);
    assert_eq!(blocks[0].content, "class Foo:\n    pass\n");

    Ok(())
}

#[test]
fn test_fail_soft_batch() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let mut files: Vec<PathBuf> = Vec::new();
    for name in ["one.md", "two.txt", "three.js"] {
        let path = temp_dir.path().join(name);
        fs::write(&path, format!("content of {}", name))?;
        files.push(path);
    }
    // disappeared before the read
    files.insert(1, temp_dir.path().join("vanished.md"));

    let rules = Rules::default();
    let outcome = Aggregator::new(&rules).run(Mode::Flat, &files).unwrap();

    assert_eq!(outcome.files_written, 3);
    assert_eq!(outcome.errors.len(), 1);
    assert!(matches!(outcome.errors[0], FileError::ReadFailure { .. }));
    assert!(outcome.errors[0].to_string().contains("vanished.md"));

    let names: Vec<_> = rules
        .comments
        .split_blocks(&outcome.text)
        .into_iter()
        .map(|b| b.filename)
        .collect();
    assert_eq!(names, vec!["one.md", "two.txt", "three.js"]);

    Ok(())
}

#[test]
fn test_header_label_is_truncated() -> io::Result<()> {
    let temp_dir = tempdir()?;
    let nested = temp_dir.path().join("deep").join("pkg").join("mod");
    fs::create_dir_all(&nested)?;
    let file = nested.join("util.js");
    fs::write(&file, "export {}")?;

    let rules = Rules::default();
    let outcome = Aggregator::new(&rules).run(Mode::Flat, &[file]).unwrap();
    let blocks = rules.comments.split_blocks(&outcome.text);
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0].label,
        Path::new("pkg").join("mod").display().to_string()
    );
    assert!(!outcome
        .text
        .contains(&temp_dir.path().display().to_string()));

    Ok(())
}

#[test]
fn test_round_trip_across_comment_styles() {
    let rules = Rules::default();
    let cases = [
        ("py", "x = 1\n# trailing\n"),
        ("js", "const a = `//`;"),
        ("html", "<p>hello</p>"),
        ("css", "a { color: red; }"),
        ("sql", "SELECT 1;"),
        ("tex", "\\section{Intro}"),
        ("bat", "@echo off"),
        ("", "no extension"),
        ("txt", "\n\nleading and trailing blank lines\n\n"),
    ];

    for (ext, content) in cases {
        let filename = if ext.is_empty() {
            "Makefile".to_string()
        } else {
            format!("file.{}", ext)
        };
        let block = rules.comments.wrap(ext, "a/b", &filename, content);
        let back = rules.comments.unwrap(&block).unwrap();
        assert_eq!(back.filename, filename);
        assert_eq!(back.content, content);
        assert_eq!(back.label, "a/b");
    }
}
