//! Bounded excerpts of response bodies for diagnostics.

/// Characters kept from each end of a long body.
pub const EXCERPT_EDGE_CHARS: usize = 200;

/// Builds a bounded excerpt of `body`.
///
/// Bodies longer than twice [`EXCERPT_EDGE_CHARS`] keep their first and last
/// edge, joined by `<...> ` and followed by the original length in brackets.
/// Shorter bodies are returned whole. Lengths count `char`s.
#[must_use]
pub fn body_excerpt(body: &str) -> String {
    let total = body.chars().count();
    let mut excerpt: String = body.chars().take(EXCERPT_EDGE_CHARS).collect();

    if total > EXCERPT_EDGE_CHARS * 2 {
        let tail: String = body.chars().skip(total - EXCERPT_EDGE_CHARS).collect();
        excerpt.push_str("<...> ");
        excerpt.push_str(&tail);
        excerpt.push_str(&format!(" [{total}]"));
    } else if total > EXCERPT_EDGE_CHARS {
        excerpt.extend(body.chars().skip(EXCERPT_EDGE_CHARS));
    }

    excerpt
}
