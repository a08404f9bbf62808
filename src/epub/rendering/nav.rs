//! Navigation documents.
//!
//! Both the EPUB 3 nav document and the EPUB 2 NCX are written so that older readers still get a
//! table of contents. They list the same entries as the spine, minus the nav page itself.

use super::{attr, text, Layout};
use crate::epub::styles;

/// Render `nav.xhtml`.
pub fn render_nav(layout: &Layout) -> String {
    let items = layout
        .toc()
        .iter()
        .map(|entry| {
            format!(
                r#"<li><a href="{}">{}</a></li>"#,
                attr(entry.href),
                text(&entry.label)
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let landmarks = if layout.cover.is_some() {
        r#"<li><a epub:type="cover" href="cover.xhtml">Cover</a></li>
<li><a epub:type="bodymatter" href="content.xhtml">Start of content</a></li>"#
    } else {
        r#"<li><a epub:type="bodymatter" href="content.xhtml">Start of content</a></li>"#
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <title>Contents - {title}</title>
    <style type="text/css">{css}</style>
</head>
<body>
<nav epub:type="toc" id="toc">
<h2>Contents</h2>
<ol>
{items}
</ol>
</nav>
<nav epub:type="landmarks" id="landmarks" hidden="hidden">
<ol>
{landmarks}
</ol>
</nav>
</body>
</html>
"#,
        lang = attr(&layout.request.language),
        title = text(layout.title()),
        css = styles::nav_stylesheet(),
        items = items,
        landmarks = landmarks,
    )
}

/// Render `toc.ncx`.
pub fn render_ncx(layout: &Layout) -> String {
    let nav_points = layout
        .toc()
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            format!(
                r#"<navPoint id="nav-{id}" playOrder="{order}">
      <navLabel><text>{label}</text></navLabel>
      <content src="{src}"/>
    </navPoint>"#,
                id = entry.id,
                order = i + 1,
                label = text(&entry.label),
                src = attr(entry.href),
            )
        })
        .collect::<Vec<_>>()
        .join("\n    ");

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1" xml:lang="{lang}">
  <head>
    <meta name="dtb:uid" content="{uid}"/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle><text>{title}</text></docTitle>
  <docAuthor><text>{author}</text></docAuthor>
  <navMap>
    {nav_points}
  </navMap>
</ncx>
"#,
        lang = attr(&layout.request.language),
        uid = attr(&layout.stamp.identifier),
        title = text(layout.title()),
        author = text(&layout.request.author),
        nav_points = nav_points,
    )
}

#[cfg(test)]
mod test {
    use super::super::test::{assert_well_formed, png_cover, request, stamp};
    use super::*;

    #[test]
    fn nav_lists_content_chapter() {
        let request = request();
        let stamp = stamp();
        let layout = Layout {
            request: &request,
            stamp: &stamp,
            cover: None,
            remote_resources: false,
        };

        let nav = render_nav(&layout);
        assert!(nav.contains(r#"epub:type="toc""#));
        assert!(nav.contains(r#"<li><a href="content.xhtml">Fish &amp; Chips &lt;Deluxe&gt;</a></li>"#));
        assert!(!nav.contains("cover.xhtml"));
        assert_well_formed(&nav);
    }

    #[test]
    fn nav_lists_cover_first() {
        let request = request();
        let stamp = stamp();
        let cover = png_cover();
        let layout = Layout {
            request: &request,
            stamp: &stamp,
            cover: Some(&cover),
            remote_resources: false,
        };

        let nav = render_nav(&layout);
        let cover_at = nav.find(r#"<a href="cover.xhtml">"#).expect("cover listed");
        let content_at = nav.find(r#"<a href="content.xhtml">"#).expect("content listed");
        assert!(cover_at < content_at);
        assert_well_formed(&nav);
    }

    #[test]
    fn ncx_play_order_follows_reading_order() {
        let request = request();
        let stamp = stamp();
        let cover = png_cover();
        let layout = Layout {
            request: &request,
            stamp: &stamp,
            cover: Some(&cover),
            remote_resources: false,
        };

        let ncx = render_ncx(&layout);
        assert!(ncx.contains(r#"<navPoint id="nav-cover" playOrder="1">"#));
        assert!(ncx.contains(r#"<navPoint id="nav-content" playOrder="2">"#));
        assert!(ncx.contains(
            r#"<meta name="dtb:uid" content="urn:uuid:3f1c2b8e-0000-4000-8000-000000000001"/>"#
        ));
        assert!(ncx.contains("<docAuthor><text>Ana \"Duarte\"</text></docAuthor>"));
        assert_well_formed(&ncx);
    }
}
