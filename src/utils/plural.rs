//! Pluralization for counts shown in pages and log lines.

/// `"s"` unless `n == 1`.
#[inline]
pub const fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// `plural_count(3, "post")` -> `"3 posts"`, `plural_count(1, "post")` -> `"1 post"`.
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{count} {noun}{}", plural_s(count))
}
