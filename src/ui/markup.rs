//! Native display of the markdown subset.
//!
//! Shares the delimiter and URL patterns with [`crate::format`] so what the
//! user sees on screen matches what `format_html` exports. Line handling
//! follows the same priority: heading, sub-heading, list item, divider,
//! blank, paragraph.

use crate::format::{link_target, BOLD_RE, UNDERLINE_RE, URL_RE};
use eframe::egui::{RichText, Ui};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(String),
    Underline(String),
    Link { href: String, label: String },
}

#[derive(Clone, Copy)]
enum InlineKind {
    Bold,
    Underline,
    Url,
}

/// Split a single line into styled spans. Unbalanced delimiters fall through
/// as literal text.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut spans = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        let candidates = [
            BOLD_RE.find(rest).map(|m| (m, InlineKind::Bold)),
            UNDERLINE_RE.find(rest).map(|m| (m, InlineKind::Underline)),
            URL_RE.find(rest).map(|m| (m, InlineKind::Url)),
        ];
        let Some((found, kind)) = candidates
            .into_iter()
            .flatten()
            .min_by_key(|(found, _)| found.start())
        else {
            spans.push(Inline::Text(rest.to_string()));
            break;
        };

        if found.start() > 0 {
            spans.push(Inline::Text(rest[..found.start()].to_string()));
        }
        let matched = found.as_str();
        spans.push(match kind {
            InlineKind::Bold => Inline::Bold(matched[2..matched.len() - 2].to_string()),
            InlineKind::Underline => Inline::Underline(matched[2..matched.len() - 2].to_string()),
            InlineKind::Url => Inline::Link {
                href: link_target(matched),
                label: matched.to_string(),
            },
        });
        rest = &rest[found.end()..];
    }
    spans
}

fn show_spans(ui: &mut Ui, spans: &[Inline], size: f32, strong: bool) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for span in spans {
            match span {
                Inline::Text(text) => {
                    let mut rich = RichText::new(text).size(size);
                    if strong {
                        rich = rich.strong();
                    }
                    ui.label(rich);
                }
                Inline::Bold(text) => {
                    ui.label(RichText::new(text).size(size).strong());
                }
                Inline::Underline(text) => {
                    let mut rich = RichText::new(text).size(size).underline();
                    if strong {
                        rich = rich.strong();
                    }
                    ui.label(rich);
                }
                Inline::Link { href, label } => {
                    ui.hyperlink_to(RichText::new(label).size(size), href);
                }
            }
        }
    });
}

/// Render a full blog or chat message body.
pub fn show_text(ui: &mut Ui, text: &str) {
    for line in text.split('\n') {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("# ") {
            show_spans(ui, &parse_inlines(rest), 22.0, true);
        } else if let Some(rest) = trimmed.strip_prefix("## ") {
            show_spans(ui, &parse_inlines(rest), 18.0, true);
        } else if let Some(rest) = trimmed.strip_prefix("* ") {
            let mut spans = vec![Inline::Text("•  ".to_string())];
            spans.extend(parse_inlines(rest));
            show_spans(ui, &spans, 14.0, false);
        } else if trimmed.starts_with("---") {
            ui.separator();
        } else if !trimmed.is_empty() {
            show_spans(ui, &parse_inlines(line), 14.0, false);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_span() {
        assert_eq!(
            parse_inlines("hello world"),
            vec![Inline::Text("hello world".to_string())]
        );
    }

    #[test]
    fn bold_and_text_interleave_in_order() {
        let spans = parse_inlines("a **b** c");
        assert_eq!(
            spans,
            vec![
                Inline::Text("a ".to_string()),
                Inline::Bold("b".to_string()),
                Inline::Text(" c".to_string()),
            ]
        );
    }

    #[test]
    fn underline_delimiters_are_stripped() {
        let spans = parse_inlines("__key phrase__");
        assert_eq!(spans, vec![Inline::Underline("key phrase".to_string())]);
    }

    #[test]
    fn bare_www_link_gets_scheme_in_href() {
        let spans = parse_inlines("go to www.example.com now");
        assert!(spans.contains(&Inline::Link {
            href: "https://www.example.com".to_string(),
            label: "www.example.com".to_string(),
        }));
    }

    #[test]
    fn unbalanced_delimiters_stay_literal() {
        let spans = parse_inlines("half **open");
        assert_eq!(spans, vec![Inline::Text("half **open".to_string())]);
    }
}
