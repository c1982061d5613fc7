//! Path utilities for content files and output pages.
//!
//! Content paths become flattened paths (slug source), and page URLs become
//! output file paths.

use std::path::{Component, Path, PathBuf};

// ============================================================================
// Content Path Utilities
// ============================================================================

/// Join path components with `/`, regardless of platform.
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Flattened path of a content file relative to the content root.
///
/// Drops the extension and a trailing `index` segment.
///
/// | relative                | flattened     |
/// |-------------------------|---------------|
/// | `posts/hello.mdx`       | `posts/hello` |
/// | `posts/guide/index.mdx` | `posts/guide` |
/// | `index.mdx`             | ``            |
pub fn flattened_path(relative: &Path) -> String {
    let flat = to_slash(&relative.with_extension(""));
    if flat == "index" {
        return String::new();
    }
    match flat.strip_suffix("/index") {
        Some(parent) => parent.to_owned(),
        None => flat,
    }
}

// ============================================================================
// Output Path Utilities
// ============================================================================

/// Map a page URL to its HTML file under `output`.
///
/// | url              | html                            |
/// |------------------|---------------------------------|
/// | `/`              | `public/index.html`             |
/// | `/posts/hello`   | `public/posts/hello/index.html` |
/// | `/404.html`      | `public/404.html`               |
pub fn url_to_output_path(url: &str, output: &Path) -> PathBuf {
    let trimmed = url.trim_matches('/');
    if trimmed.is_empty() {
        return output.join("index.html");
    }

    let relative: PathBuf = trimmed.split('/').filter(|s| !s.is_empty() && *s != "..").collect();
    if relative.extension().is_some_and(|ext| ext == "html" || ext == "xml") {
        output.join(relative)
    } else {
        output.join(relative).join("index.html")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_slash() {
        let path: PathBuf = ["posts", "2024", "intro.mdx"].iter().collect();
        assert_eq!(to_slash(&path), "posts/2024/intro.mdx");
    }

    #[test]
    fn test_flattened_path() {
        assert_eq!(flattened_path(Path::new("authors/jane-doe.json")), "authors/jane-doe");
        assert_eq!(flattened_path(Path::new("posts/2024/intro.mdx")), "posts/2024/intro");
    }

    #[test]
    fn test_flattened_path_index() {
        assert_eq!(flattened_path(Path::new("posts/guide/index.mdx")), "posts/guide");
        assert_eq!(flattened_path(Path::new("index.mdx")), "");
        assert_eq!(flattened_path(Path::new("posts/reindex.mdx")), "posts/reindex");
    }

    #[test]
    fn test_flattened_path_keeps_inner_dots() {
        assert_eq!(flattened_path(Path::new("posts/v1.2-notes.mdx")), "posts/v1.2-notes");
    }

    #[test]
    fn test_url_to_output_path() {
        let out = Path::new("public");
        assert_eq!(url_to_output_path("/", out), PathBuf::from("public/index.html"));
        assert_eq!(
            url_to_output_path("/posts/hello", out),
            PathBuf::from("public/posts/hello/index.html")
        );
        assert_eq!(
            url_to_output_path("/posts/2024/intro/", out),
            PathBuf::from("public/posts/2024/intro/index.html")
        );
        assert_eq!(url_to_output_path("/404.html", out), PathBuf::from("public/404.html"));
        assert_eq!(
            url_to_output_path("/posts/v1.2-notes", out),
            PathBuf::from("public/posts/v1.2-notes/index.html")
        );
    }

    #[test]
    fn test_url_to_output_path_stays_inside_output() {
        let out = Path::new("public");
        assert_eq!(
            url_to_output_path("/../etc/passwd", out),
            PathBuf::from("public/etc/passwd/index.html")
        );
    }
}
