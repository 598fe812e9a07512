//! Help text rendering
//!
//! Option descriptions and section headers are markdown. Two passes adapt
//! docstring conventions before and after CommonMark rendering:
//! - lines starting with `>>> ` become fenced code blocks
//! - sentences ending a line inside a paragraph become separate paragraphs
//!
//! Links open in a new window.

mod descriptions;

pub use descriptions::{default_description, PROCESS_ENVS_DESC, PROCESS_PLUGIN_OPTS_DESC};

use pulldown_cmark::{html, CowStr, Event, LinkType, Options, Parser, Tag, TagEnd};
use regex_lite::{Captures, Regex};
use std::sync::OnceLock;

const CODE_MARKER: &str = ">>> ";

/// Wrap consecutive `>>> ` lines in a fenced code block, stripping the marker.
pub fn format_code_blocks(input: &str) -> String {
    let mut out = String::with_capacity(input.len() + 16);
    let mut in_code = false;

    for line in input.split('\n') {
        match line.strip_prefix(CODE_MARKER) {
            Some(code) => {
                if !in_code {
                    out.push_str("```\n");
                    in_code = true;
                }
                out.push_str(code);
            }
            None => {
                if in_code {
                    out.push_str("```\n");
                    in_code = false;
                }
                out.push_str(line);
            }
        }
        out.push('\n');
    }

    if in_code {
        out.push_str("```\n");
    }
    out
}

fn paragraph_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<p>(.*?)</p>").expect("paragraph pattern is valid"))
}

/// Split `<p>` contents at every `.` followed by a line break.
pub fn split_sentence_paragraphs(html: &str) -> String {
    paragraph_re()
        .replace_all(html, |caps: &Captures<'_>| {
            format!("<p>{}</p>", caps[1].replace(".\n", ".</p>\n<p>"))
        })
        .into_owned()
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Render help markdown to HTML. `None` renders to an empty string.
pub fn render_markdown(text: Option<&str>) -> String {
    let Some(text) = text else {
        return String::new();
    };

    let source = format_code_blocks(text);
    let events = Parser::new_ext(&source, Options::empty()).map(|event| match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            ..
        }) => {
            // The markdown title gives way to the new-window hint.
            let scheme = if link_type == LinkType::Email { "mailto:" } else { "" };
            Event::InlineHtml(CowStr::from(format!(
                "<a href=\"{}{}\" target=\"_blank\" title=\"Open in New Window\" rel=\"noopener\">",
                scheme,
                escape_attr(&dest_url)
            )))
        }
        Event::End(TagEnd::Link) => Event::InlineHtml(CowStr::Borrowed("</a>")),
        other => other,
    });

    let mut out = String::new();
    html::push_html(&mut out, events);
    split_sentence_paragraphs(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_blocks() {
        let input = "Example:\n>>> a = 1\n>>> b = 2\nDone";
        assert_eq!(
            format_code_blocks(input),
            "Example:\n```\na = 1\nb = 2\n```\nDone\n"
        );
    }

    #[test]
    fn test_code_block_closed_at_end() {
        assert_eq!(format_code_blocks(">>> x"), "```\nx\n```\n");
        // The marker needs its trailing space.
        assert_eq!(format_code_blocks(">>>x"), ">>>x\n");
    }

    #[test]
    fn test_split_sentences() {
        let html = "<p>First sentence.\nSecond sentence.</p>\n<pre>a.\nb</pre>";
        assert_eq!(
            split_sentence_paragraphs(html),
            "<p>First sentence.</p>\n<p>Second sentence.</p>\n<pre>a.\nb</pre>"
        );
        // Mid-sentence line breaks are kept.
        assert_eq!(split_sentence_paragraphs("<p>a\nb</p>"), "<p>a\nb</p>");
    }

    #[test]
    fn test_render_none() {
        assert_eq!(render_markdown(None), "");
    }

    #[test]
    fn test_render_paragraph_sentences() {
        let html = render_markdown(Some("Number of forks.\nUsed by all processes."));
        assert!(html.contains("<p>Number of forks.</p>"));
        assert!(html.contains("<p>Used by all processes.</p>"));
    }

    #[test]
    fn test_render_links_open_new_window() {
        let html = render_markdown(Some("See [docs](https://example.com/a?b=1&c=2)."));
        assert!(html.contains(
            "<a href=\"https://example.com/a?b=1&amp;c=2\" target=\"_blank\" \
             title=\"Open in New Window\" rel=\"noopener\">docs</a>"
        ));
    }

    #[test]
    fn test_render_email_autolink() {
        let html = render_markdown(Some("Contact <dev@example.com>"));
        assert!(html.contains("<a href=\"mailto:dev@example.com\" target=\"_blank\""));
        assert!(html.contains(">dev@example.com</a>"));

        let html = render_markdown(Some("Visit <https://example.com>"));
        assert!(html.contains("<a href=\"https://example.com\" target=\"_blank\""));
    }

    #[test]
    fn test_render_link_title_replaced() {
        let html = render_markdown(Some("[docs](https://example.com \"Docs\")"));
        assert!(html.contains("title=\"Open in New Window\""));
        assert!(!html.contains("title=\"Docs\""));
    }

    #[test]
    fn test_render_code_marker() {
        let html = render_markdown(Some("Usage:\n\n>>> pipen run\n"));
        assert!(html.contains("<pre><code>pipen run\n</code></pre>"));
    }
}
