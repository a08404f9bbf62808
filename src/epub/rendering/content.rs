//! The article chapter (`content.xhtml`).
//!
//! Wraps the rendered Markdown with a title block (title, author, and description if any) and
//! the inline reading stylesheet. An empty body still yields a complete, valid chapter.

use super::{attr, text, Layout};
use crate::epub::styles;

/// Render the article as XHTML around an already rendered HTML body.
pub fn render(layout: &Layout, body_html: &str) -> String {
    let request = layout.request;

    let description = request
        .description_opt()
        .map(|description| {
            format!(
                "\n<p class=\"description\">{}</p>",
                text(description)
            )
        })
        .unwrap_or_default();

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>{title}</title>
    <style type="text/css">{css}</style>
</head>
<body epub:type="bodymatter">
<header class="title-block">
<h1 class="title">{title}</h1>
<p class="author">{author}</p>{description}
</header>
<section class="article">
{body}
</section>
</body>
</html>
"#,
        lang = attr(&request.language),
        title = text(layout.title()),
        css = styles::content_stylesheet(),
        author = text(&request.author),
        description = description,
        body = body_html,
    )
}

#[cfg(test)]
mod test {
    use super::super::test::{assert_well_formed, request, stamp};
    use super::*;

    #[test]
    fn wraps_body_with_title_block() {
        let request = request();
        let stamp = stamp();
        let layout = Layout {
            request: &request,
            stamp: &stamp,
            cover: None,
            remote_resources: false,
        };

        let html = render(&layout, "<p>Hello</p>");
        assert!(html.contains(r#"<h1 class="title">Fish &amp; Chips &lt;Deluxe&gt;</h1>"#));
        assert!(html.contains(r#"<p class="author">Ana "Duarte"</p>"#));
        assert!(html.contains(
            r#"<p class="description">A study of &gt; and &lt; in cooking</p>"#
        ));
        assert!(html.contains("<p>Hello</p>"));
        assert!(html.contains("font-family: Georgia"));
        assert_well_formed(&html);
    }

    #[test]
    fn empty_body_is_still_a_chapter() {
        let mut request = request();
        request.description = String::new();
        let stamp = stamp();
        let layout = Layout {
            request: &request,
            stamp: &stamp,
            cover: None,
            remote_resources: false,
        };

        let html = render(&layout, "");
        assert!(html.contains(r#"<section class="article">"#));
        assert!(!html.contains("description\""));
        assert_well_formed(&html);
    }
}
