//! Body transformation seam: HTML to text and CSS inlining.

/// Pure text transforms applied during body assembly.
///
/// Both transforms are consumed as black boxes by the translator.
/// Implementations must be deterministic; a transform that fails
/// internally should return its input (or a best-effort rendering)
/// rather than error, since translation has no failure mode for it.
pub trait BodyFilters {
    /// Derives a plain-text rendering of an HTML body.
    fn html_to_text(&self, html: &str) -> String;

    /// Rewrites an HTML body with CSS inlined into style attributes.
    fn inline_styles(&self, html: &str) -> String;
}

/// Default filters: `htmd` for the plain-text derivation, and a
/// passthrough for CSS inlining (plug a real inliner in via the trait
/// when one is wanted).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFilters;

impl BodyFilters for DefaultFilters {
    fn html_to_text(&self, html: &str) -> String {
        htmd::convert(html).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "HTML to text conversion failed, stripping tags");
            strip_tags(html)
        })
    }

    fn inline_styles(&self, html: &str) -> String {
        html.to_string()
    }
}

/// Minimal fallback when the converter rejects the input: drop tags,
/// keep text content.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_is_non_empty() {
        let text = DefaultFilters.html_to_text("<p>Hello <b>world</b></p>");
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_inline_styles_default_is_identity() {
        let html = "<style>p{color:red}</style><p>Hi</p>";
        assert_eq!(DefaultFilters.inline_styles(html), html);
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>a<br/>b</p>"), "ab");
    }
}
