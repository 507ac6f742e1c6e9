//! Extension-based language tables for the editor widget and status bar.

use std::collections::HashMap;

use once_cell::sync::Lazy;

static LANGUAGE_HINTS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "javascript"),
        ("jsx", "javascript"),
        ("ts", "typescript"),
        ("tsx", "typescript"),
        ("html", "html"),
        ("css", "css"),
        ("scss", "scss"),
        ("json", "json"),
        ("md", "markdown"),
        ("py", "python"),
        ("java", "java"),
        ("cpp", "cpp"),
        ("c", "c"),
        ("php", "php"),
        ("rb", "ruby"),
        ("go", "go"),
        ("rs", "rust"),
        ("xml", "xml"),
        ("yaml", "yaml"),
        ("yml", "yaml"),
    ])
});

static DISPLAY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("js", "JavaScript"),
        ("jsx", "JavaScript React"),
        ("ts", "TypeScript"),
        ("tsx", "TypeScript React"),
        ("html", "HTML"),
        ("css", "CSS"),
        ("scss", "SCSS"),
        ("json", "JSON"),
        ("md", "Markdown"),
        ("py", "Python"),
        ("java", "Java"),
        ("cpp", "C++"),
        ("c", "C"),
        ("php", "PHP"),
        ("rb", "Ruby"),
        ("go", "Go"),
        ("rs", "Rust"),
        ("xml", "XML"),
        ("yaml", "YAML"),
        ("yml", "YAML"),
    ])
});

/// The text after the last `.`, or the whole name when it has none.
pub fn file_extension(name: &str) -> &str {
    match name.rsplit_once('.') {
        Some((_, extension)) => extension,
        None => name,
    }
}

/// Editor language identifier for a file name; `"plaintext"` when unknown.
pub fn language_hint(name: &str) -> &'static str {
    LANGUAGE_HINTS
        .get(file_extension(name).to_lowercase().as_str())
        .copied()
        .unwrap_or("plaintext")
}

/// Human-readable language name for the status bar; `"Plain Text"` when
/// unknown.
pub fn display_name(name: &str) -> &'static str {
    DISPLAY_NAMES
        .get(file_extension(name).to_lowercase().as_str())
        .copied()
        .unwrap_or("Plain Text")
}
