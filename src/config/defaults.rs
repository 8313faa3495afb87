use std::path::PathBuf;

pub(super) fn default_log_dir() -> PathBuf {
    let mut path = dirs::cache_dir().expect("Failed to get cache directory");
    path.push("repofix");
    path.push("logs");

    path
}

/// Extensions eligible for a fix pass; display labeling covers a superset
#[must_use]
pub fn default_allowed_extensions() -> Vec<String> {
    [
        ".html", ".css", ".js", ".jsx", ".ts", ".tsx", ".json", ".md", ".py", ".java", ".cpp",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}
