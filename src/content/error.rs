//! Content layer error types.
//!
//! Every variant here is fatal to a build. A missing record is not an error:
//! lookups return `Option` and routing turns `None` into a not-found page.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while registering kinds or loading content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("`{path}`: field `{field}` expected {expected}, found {actual}")]
    SchemaViolation {
        path: PathBuf,
        field: String,
        expected: String,
        actual: String,
    },

    #[error("`{path}`: slug `{slug}` of kind {kind} still contains folder `{folder}`")]
    DerivationInvariantViolation {
        kind: String,
        path: PathBuf,
        slug: String,
        folder: String,
    },

    #[error("duplicate {kind} slug `{slug}` (`{first}` and `{second}`)")]
    DuplicateSlug {
        kind: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("`{path}`: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid content kind: {0}")]
    Registration(String),
}

impl ContentError {
    pub fn schema(
        path: impl Into<PathBuf>,
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::SchemaViolation {
            path: path.into(),
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_violation_display() {
        let err = ContentError::schema("posts/hello.mdx", "publishedAt", "date", "missing");
        let display = format!("{err}");
        assert!(display.contains("posts/hello.mdx"));
        assert!(display.contains("publishedAt"));
        assert!(display.contains("expected date"));
        assert!(display.contains("found missing"));
    }

    #[test]
    fn test_derivation_violation_display() {
        let err = ContentError::DerivationInvariantViolation {
            kind: "Post".into(),
            path: PathBuf::from("blog/hello.mdx"),
            slug: "blog/hello".into(),
            folder: "posts".into(),
        };
        assert!(format!("{err}").contains("folder `posts`"));
    }
}
