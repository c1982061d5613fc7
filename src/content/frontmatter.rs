//! Front matter splitting for MDX sources.
//!
//! ```text
//! ---
//! title: Hello
//! ---
//! body...
//! ```

use serde_json::{Map, Value};

/// Split `content` into `(front_matter, body)`.
///
/// Returns `None` when the file does not open with a `---` fence or the
/// fence is never closed.
pub fn split(content: &str) -> Option<(&str, &str)> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Parse YAML front matter into a JSON object.
///
/// An empty block yields an empty object.
pub fn parse(front_matter: &str) -> Result<Map<String, Value>, String> {
    if front_matter.trim().is_empty() {
        return Ok(Map::new());
    }
    match serde_yaml_ng::from_str::<Value>(front_matter) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(Value::Null) => Ok(Map::new()),
        Ok(_) => Err("front matter is not a mapping".into()),
        Err(e) => Err(format!("bad front matter: {e}")),
    }
}
