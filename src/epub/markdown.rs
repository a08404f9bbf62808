//! Markdown to XHTML body rendering.
//!
//! The article body is rendered with pulldown-cmark. EPUB content documents are XML, so raw HTML
//! blocks embedded in the Markdown are emitted as escaped text rather than passed through: a
//! stray `<br>` or unclosed `<div>` would otherwise make the chapter ill-formed.
//!
//! Only the cover is packaged, so images in the body cannot be shown inline. Remote images
//! become links to the image and relative ones fall back to their alt text.

use super::error::RenderError;
use super::rendering::{is_xml_char, xml_chars};
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};

/// Turns an article body into an HTML fragment suitable for an XHTML `<body>`.
pub trait Render {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// The default renderer, CommonMark plus tables, strikethrough, and footnotes.
#[derive(Debug, Clone, Copy)]
pub struct Markdown {
    options: Options,
}

impl Default for Markdown {
    fn default() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_FOOTNOTES,
        }
    }
}

impl Markdown {
    pub fn with_options(options: Options) -> Self {
        Self { options }
    }
}

impl Render for Markdown {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        // one entry per open image: whether it was turned into a link
        let mut images: Vec<bool> = Vec::new();
        let parser = Parser::new_ext(markdown, self.options).filter_map(|event| match event {
            Event::Html(raw) | Event::InlineHtml(raw) | Event::Text(raw) => {
                Some(Event::Text(xml_safe(raw)))
            }
            Event::Code(code) => Some(Event::Code(xml_safe(code))),
            Event::Start(Tag::Image {
                link_type,
                dest_url,
                title,
                id,
            }) => {
                let remote = is_remote(&dest_url);
                images.push(remote);
                remote.then_some(Event::Start(Tag::Link {
                    link_type,
                    dest_url,
                    title,
                    id,
                }))
            }
            Event::End(TagEnd::Image) => images
                .pop()
                .unwrap_or_default()
                .then_some(Event::End(TagEnd::Link)),
            event => Some(event),
        });

        let mut body = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut body, parser);
        Ok(body)
    }
}

fn xml_safe(value: CowStr<'_>) -> CowStr<'_> {
    if value.chars().all(is_xml_char) {
        value
    } else {
        CowStr::from(xml_chars(&value).into_owned())
    }
}

fn is_remote(url: &str) -> bool {
    let url = url.trim_start().to_ascii_lowercase();
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
mod test {
    use super::*;

    fn render(markdown: &str) -> String {
        Markdown::default().render(markdown).expect("can render")
    }

    #[test]
    fn renders_headings_and_emphasis() {
        let html = render("# Heading\n\nSome *emphasis* and **strong** text.");
        assert!(html.contains("<h1>Heading</h1>"));
        assert!(html.contains("<em>emphasis</em>"));
        assert!(html.contains("<strong>strong</strong>"));
    }

    #[test]
    fn renders_lists_and_links() {
        let html = render("- one\n- [two](https://example.com)");
        assert!(html.contains("<ul>"));
        assert!(html.contains(r#"<a href="https://example.com">two</a>"#));
    }

    #[test]
    fn body_images_are_not_embedded() {
        let html = render("![pic](https://cdn.example.com/p.jpg)\n\n![rel](pic.png)");
        assert!(!html.contains("<img"));
        assert!(html.contains(r#"<a href="https://cdn.example.com/p.jpg">pic</a>"#));
        assert!(html.contains("<p>rel</p>"));
    }

    #[test]
    fn strips_characters_xml_cannot_hold() {
        let html = render("para with \u{0B} vtab and \u{01} soh\n\n`co\u{02}de` foo\u{FFFE}bar");
        assert!(html.contains("para with   vtab and  soh"));
        assert!(html.contains("<code>code</code>"));
        assert!(html.contains("foobar"));
        assert!(!html.chars().any(|c| c < ' ' && c != '\n'));
    }

    #[test]
    fn escapes_raw_html() {
        let html = render("line<br>break\n\n<div>unclosed\n");
        assert!(!html.contains("<br>"));
        assert!(!html.contains("<div>"));
        assert!(html.contains("&lt;br&gt;"));
        assert!(html.contains("&lt;div&gt;"));
    }

    #[test]
    fn empty_body_renders_empty() {
        assert_eq!(render(""), "");
    }

    #[test]
    fn escapes_text_entities() {
        let html = render("Fish & chips < 5");
        assert!(html.contains("Fish &amp; chips &lt; 5"));
    }
}
