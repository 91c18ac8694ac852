//! Markdown-subset to HTML formatter for blog content.
//!
//! The dialect is deliberately small: `**bold**`, `__underline__`, `# ` and
//! `## ` headings, `* ` list items, `---` dividers, and auto-linked URLs.
//! Anything else is a paragraph. Malformed markup degrades to literal text.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub(crate) static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern"));

pub(crate) static UNDERLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__(.*?)__").expect("underline pattern"));

pub(crate) static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:(?:https?|ftp|file)://[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|])|\bwww\.[-A-Z0-9+&@#/%?=~_|!:,.;]*[-A-Z0-9+&@#/%=~_|]",
    )
    .expect("url pattern")
});

/// Prepend a scheme to bare `www.` links so they resolve as absolute URLs.
pub(crate) fn link_target(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Convert the restricted markup dialect into an HTML fragment.
///
/// Pure and deterministic. The only sanitization is escaping angle brackets,
/// which happens before any markup of our own is introduced; the output is
/// display-only and must not be fed back through.
pub fn format_html(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let escaped = input.replace('<', "&lt;").replace('>', "&gt;");
    let bolded = BOLD_RE.replace_all(&escaped, "<strong>$1</strong>");
    let underlined = UNDERLINE_RE.replace_all(&bolded, "<u>$1</u>");
    let linked = URL_RE.replace_all(&underlined, |caps: &Captures| {
        let url = &caps[0];
        let href = link_target(url);
        format!(r#"<a href="{href}" target="_blank" rel="noopener noreferrer">{url}</a>"#)
    });

    let mut out = String::new();
    let mut in_list = false;
    for line in linked.split('\n') {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("# ") {
            close_list(&mut out, &mut in_list);
            out.push_str("<h1>");
            out.push_str(rest);
            out.push_str("</h1>");
        } else if let Some(rest) = trimmed.strip_prefix("## ") {
            close_list(&mut out, &mut in_list);
            out.push_str("<h2>");
            out.push_str(rest);
            out.push_str("</h2>");
        } else if let Some(rest) = trimmed.strip_prefix("* ") {
            if !in_list {
                out.push_str("<ul>");
                in_list = true;
            }
            out.push_str("<li>");
            out.push_str(rest);
            out.push_str("</li>");
        } else if trimmed.starts_with("---") {
            close_list(&mut out, &mut in_list);
            out.push_str("<hr />");
        } else {
            close_list(&mut out, &mut in_list);
            if !trimmed.is_empty() {
                // Paragraphs keep the original, untrimmed line.
                out.push_str("<p>");
                out.push_str(line);
                out.push_str("</p>");
            }
        }
    }
    if in_list {
        out.push_str("</ul>");
    }
    out
}

fn close_list(out: &mut String, in_list: &mut bool) {
    if *in_list {
        out.push_str("</ul>");
        *in_list = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(format_html(""), "");
    }

    #[test]
    fn bold_span_wraps_exact_content() {
        let html = format_html("some **important** words");
        assert!(html.contains("<strong>important</strong>"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn bold_matching_is_non_greedy() {
        let html = format_html("**a** and **b**");
        assert!(html.contains("<strong>a</strong>"));
        assert!(html.contains("<strong>b</strong>"));
    }

    #[test]
    fn unbalanced_delimiters_stay_literal() {
        let html = format_html("just **one side");
        assert!(html.contains("**one side"));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn underline_span_wraps_exact_content() {
        let html = format_html("a __key phrase__ here");
        assert!(html.contains("<u>key phrase</u>"));
    }

    #[test]
    fn headings_render_by_prefix() {
        let html = format_html("# Title\n## Sub");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<h2>Sub</h2>"));
    }

    #[test]
    fn heading_prefix_is_recognized_after_leading_whitespace() {
        let html = format_html("   # Indented");
        assert!(html.contains("<h1>Indented</h1>"));
    }

    #[test]
    fn consecutive_list_items_share_one_list() {
        let html = format_html("* one\n* two\n* three");
        assert_eq!(html.matches("<ul>").count(), 1);
        assert_eq!(html.matches("</ul>").count(), 1);
        assert_eq!(html.matches("<li>").count(), 3);
    }

    #[test]
    fn trailing_list_is_closed_at_end_of_input() {
        let html = format_html("intro\n* a\n* b");
        assert!(html.ends_with("<li>b</li></ul>"));
    }

    #[test]
    fn non_list_line_closes_an_open_list() {
        let html = format_html("* a\nafter");
        assert!(html.contains("</ul><p>after</p>"));
    }

    #[test]
    fn blank_line_closes_list_without_paragraph() {
        let html = format_html("* a\n\n* b");
        assert_eq!(html, "<ul><li>a</li></ul><ul><li>b</li></ul>");
    }

    #[test]
    fn divider_closes_list_and_emits_rule() {
        let html = format_html("* a\n---\nend");
        assert!(html.contains("</ul><hr /><p>end</p>"));
    }

    #[test]
    fn paragraph_keeps_untrimmed_line() {
        let html = format_html("  padded line");
        assert!(html.contains("<p>  padded line</p>"));
    }

    #[test]
    fn angle_brackets_are_escaped() {
        let html = format_html("a <script> tag");
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn absolute_urls_become_links() {
        let html = format_html("see https://example.com/page for more");
        assert!(html.contains(
            r#"<a href="https://example.com/page" target="_blank" rel="noopener noreferrer">https://example.com/page</a>"#
        ));
    }

    #[test]
    fn bare_www_links_gain_scheme_in_href_only() {
        let html = format_html("visit www.example.com today");
        assert!(html.contains(r#"href="https://www.example.com""#));
        assert!(html.contains(">www.example.com</a>"));
    }
}
