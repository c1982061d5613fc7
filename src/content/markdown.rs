//! MDX body rendering.
//!
//! Bodies are rendered as CommonMark. Top-level ESM lines (`import`/`export`)
//! are dropped first; inline JSX passes through as raw HTML. Lines inside
//! fenced code blocks are never touched.

use pulldown_cmark::{Event, Options, Parser, html};
use regex::Regex;
use std::sync::LazyLock;

static RE_ESM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:import|export)\s").unwrap());

fn options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Remove top-level `import`/`export` lines.
pub fn strip_esm(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut fence = None;

    for line in source.split_inclusive('\n') {
        match fence {
            Some(open) => {
                if closes_fence(line, open) {
                    fence = None;
                }
            }
            None if RE_ESM_LINE.is_match(line) => continue,
            None => fence = opens_fence(line),
        }
        out.push_str(line);
    }
    out
}

// =============================================================================
// Code Fences
// =============================================================================

/// Fence character, run length and the rest of the line.
fn fence_marker(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start_matches(' ');
    if line.len() - trimmed.len() > 3 {
        return None;
    }
    let ch = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
    let len = trimmed.chars().take_while(|&c| c == ch).count();
    (len >= 3).then(|| (ch, len, &trimmed[len..]))
}

fn opens_fence(line: &str) -> Option<(char, usize)> {
    let (ch, len, info) = fence_marker(line)?;
    // A backtick fence's info string cannot contain backticks
    (ch == '~' || !info.contains('`')).then_some((ch, len))
}

fn closes_fence(line: &str, (ch, len): (char, usize)) -> bool {
    fence_marker(line).is_some_and(|(c, n, rest)| c == ch && n >= len && rest.trim().is_empty())
}

/// Render an MDX body to HTML.
pub fn to_html(source: &str) -> String {
    let source = strip_esm(source);
    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, Parser::new_ext(&source, options()));
    out
}

/// Count words of prose and code, ignoring markup.
pub fn word_count(source: &str) -> usize {
    let source = strip_esm(source);
    Parser::new_ext(&source, options())
        .map(|event| match event {
            Event::Text(text) | Event::Code(text) => text.split_whitespace().count(),
            _ => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_esm() {
        let source = "import Chart from './chart'\nexport const meta = {}\n# Title\n";
        assert_eq!(strip_esm(source), "# Title\n");
    }

    #[test]
    fn test_strip_esm_keeps_prose() {
        let source = "Important imports are discussed here.\n";
        assert_eq!(strip_esm(source), source);
    }

    #[test]
    fn test_strip_esm_keeps_fenced_code() {
        let source = "import A from 'a'\n\n```tsx\nimport React from 'react';\n\
                      export default function App() {}\n```\n\n\
                      ~~~~\nimport B from 'b'\n```\nexport {}\n~~~~\n\
                      export const after = 1\n";
        assert_eq!(
            strip_esm(source),
            "\n```tsx\nimport React from 'react';\nexport default function App() {}\n```\n\n\
             ~~~~\nimport B from 'b'\n```\nexport {}\n~~~~\n"
        );
    }

    #[test]
    fn test_fenced_imports_render() {
        let html = to_html(
            "Install it:\n\n```tsx\nimport React from 'react';\nexport default function App() {}\n```\n",
        );
        assert!(html.contains("<p>Install it:</p>"));
        assert!(html.contains("import React from"));
        assert!(html.contains("export default function App()"));
    }

    #[test]
    fn test_to_html() {
        let html = to_html("import X from 'x'\n\n# Hello\n\nSome *text*.\n");
        assert!(html.contains("<h1>Hello</h1>"));
        assert!(html.contains("<em>text</em>"));
        assert!(!html.contains("import"));
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("# Hello world\n\nOne **two** three.\n"), 5);
        assert_eq!(word_count("```\nlet x = 1;\n```\n"), 4);
        assert_eq!(word_count("```js\nimport a from 'a';\n```\n"), 4);
        assert_eq!(word_count(""), 0);
    }
}
