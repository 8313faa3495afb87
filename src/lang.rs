//! Maps file paths to the languages used for labeling diffs, and decides
//! which files are eligible for a fix pass.
//!
//! Eligibility is driven by the configured allow-list; the display mapping
//! deliberately covers a few more languages than the fix pass accepts.

/// Returns the display language for a path, used to label diffs
///
/// Falls back to `plaintext` for anything unknown.
#[must_use]
pub fn language_for_path(path: &str) -> &'static str {
    match extension(path).as_deref() {
        Some("html") => "html",
        Some("css") => "css",
        Some("js" | "jsx") => "javascript",
        Some("ts" | "tsx") => "typescript",
        Some("json") => "json",
        Some("md") => "markdown",
        Some("py") => "python",
        Some("java") => "java",
        Some("c") => "c",
        Some("cpp") => "cpp",
        Some("cs") => "csharp",
        Some("php") => "php",
        Some("rb") => "ruby",
        Some("go") => "go",
        Some("rs") => "rust",
        Some("sh") => "shell",
        Some("yaml" | "yml") => "yaml",
        _ => "plaintext",
    }
}

/// Whether a path is eligible for the fix pass, given the configured
/// extension allow-list (extensions with leading dot, i.e. `.py`).
#[must_use]
pub fn is_fixable(path: &str, allowed_extensions: &[String]) -> bool {
    let Some(ext) = extension(path) else {
        return false;
    };

    allowed_extensions
        .iter()
        .any(|allowed| allowed.trim_start_matches('.').eq_ignore_ascii_case(&ext))
}

fn extension(path: &str) -> Option<String> {
    std::path::Path::new(path)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
}
