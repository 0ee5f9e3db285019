/*!
 * Utility functions and built-in tables for repoclip
 */

use once_cell::sync::Lazy;

/// Format a human-readable file size
pub fn format_file_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

/// Default segment patterns to ignore.
///
/// Plain text matches any segment containing it; `^...$` anchors an exact
/// segment match; `*`/`?` make it a glob over a single segment.
pub static DEFAULT_IGNORE: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "^__pycache__$",
        "^venv$",
        "^.git$",
        "^alembic$",
        "^downloads$",
        "^node_modules$",
        "^.pytest_cache$",
        "^.mypy_cache$",
        "^.DS_Store$",
    ]
});

/// Extensions dumped as text in flat mode
pub static DEFAULT_TEXT_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "txt", "js", "py", "html", "htm", "css", "md", "java", "c", "cpp", "cs", "rb", "swift",
        "kt", "php", "pl", "ts", "sh", "xml", "yaml", "yml", "json", "ini", "toml",
        "properties", "csv", "tsv", "sql", "rtf", "tex", "less", "sass", "scss", "ps1", "bat",
        "cmd", "gradle",
    ]
});

/// Extensions whose files get declaration summaries in tree mode
pub static DEFAULT_STRUCTURAL_EXTENSIONS: Lazy<Vec<&'static str>> = Lazy::new(|| vec!["py"]);

/// File names whose lines are listed verbatim in tree mode
pub static DEFAULT_MANIFEST_NAMES: Lazy<Vec<&'static str>> =
    Lazy::new(|| vec!["requirements.txt"]);

/// Comment rules in priority order: (extensions, prefix, suffix).
///
/// The trailing plain-text group is shadowed for `txt` by the hash group.
pub static DEFAULT_COMMENT_RULES: Lazy<Vec<(Vec<&'static str>, &'static str, &'static str)>> =
    Lazy::new(|| {
        vec![
            (
                vec![
                    "py", "rb", "pl", "sh", "yaml", "yml", "toml", "ini", "properties", "ps1",
                    "txt", "csv", "tsv",
                ],
                "# ",
                "",
            ),
            (
                vec![
                    "js", "ts", "java", "c", "cpp", "cs", "swift", "kt", "php", "gradle", "json",
                    "less", "sass", "scss", "rs", "go",
                ],
                "// ",
                "",
            ),
            (vec!["html", "htm", "xml", "md"], "<!-- ", " -->"),
            (vec!["css"], "/* ", " */"),
            (vec!["sql"], "-- ", ""),
            (vec!["tex"], "% ", ""),
            (vec!["bat", "cmd"], "REM ", ""),
            (vec!["txt", "rtf"], "=== ", " ==="),
        ]
    });

/// Delimiters used when no comment rule matches
pub const DEFAULT_COMMENT: (&str, &str) = ("# ", "");
