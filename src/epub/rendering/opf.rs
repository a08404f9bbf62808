//! The OPF package document (`OEBPS/content.opf`).
//!
//! Carries the Dublin Core metadata, the manifest of every resource in the package, and the
//! spine. A `<guide>` is included alongside the EPUB 3 properties because EPUB 2 readers still
//! rely on it to find the cover and the start of the text.

use super::{attr, text, Layout};

pub fn render(layout: &Layout) -> String {
    let request = layout.request;

    let mut metadata = vec![
        format!(
            r#"<dc:identifier id="pub-id">{}</dc:identifier>"#,
            text(&layout.stamp.identifier)
        ),
        format!("<dc:title>{}</dc:title>", text(layout.title())),
        format!(
            r#"<dc:creator id="creator">{}</dc:creator>"#,
            text(&request.author)
        ),
    ];
    if let Some(description) = request.description_opt() {
        metadata.push(format!(
            "<dc:description>{}</dc:description>",
            text(description)
        ));
    }
    metadata.push(format!("<dc:language>{}</dc:language>", text(&request.language)));
    metadata.push(format!(
        "<dc:date>{}</dc:date>",
        request.publication_date.format("%Y-%m-%d")
    ));
    metadata.push(format!(
        "<dc:publisher>{}</dc:publisher>",
        text(&request.publisher)
    ));
    metadata.push(format!(
        r#"<meta property="dcterms:modified">{}</meta>"#,
        layout.stamp.modified_string()
    ));
    if layout.cover.is_some() {
        metadata.push(r#"<meta name="cover" content="cover-image"/>"#.to_string());
    }

    let manifest = layout
        .manifest()
        .iter()
        .map(|item| match item.properties {
            Some(properties) => format!(
                r#"<item id="{}" href="{}" media-type="{}" properties="{}"/>"#,
                item.id,
                attr(&item.href),
                item.media_type,
                properties
            ),
            None => format!(
                r#"<item id="{}" href="{}" media-type="{}"/>"#,
                item.id,
                attr(&item.href),
                item.media_type
            ),
        })
        .collect::<Vec<_>>();

    let spine = layout
        .spine()
        .iter()
        .map(|idref| format!(r#"<itemref idref="{idref}"/>"#))
        .collect::<Vec<_>>();

    let mut guide = Vec::with_capacity(3);
    if layout.cover.is_some() {
        guide.push(r#"<reference type="cover" title="Cover" href="cover.xhtml"/>"#.to_string());
    }
    guide.push(r#"<reference type="toc" title="Contents" href="nav.xhtml"/>"#.to_string());
    guide.push(format!(
        r#"<reference type="text" title="{}" href="content.xhtml"/>"#,
        attr(layout.title())
    ));

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0" unique-identifier="pub-id" xml:lang="{lang}">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
    {metadata}
  </metadata>
  <manifest>
    {manifest}
  </manifest>
  <spine toc="ncx">
    {spine}
  </spine>
  <guide>
    {guide}
  </guide>
</package>
"#,
        lang = attr(&request.language),
        metadata = metadata.join("\n    "),
        manifest = manifest.join("\n    "),
        spine = spine.join("\n    "),
        guide = guide.join("\n    "),
    )
}
