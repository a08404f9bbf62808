//! Package assembly.
//!
//! Lays out every document of the publication and writes them into the OCF archive in a fixed
//! order: container, package document, navigation (NCX and nav), the optional cover page and
//! image, then the article itself. Each document is produced by its own module; this one only
//! decides what goes in the manifest, spine, and table of contents so that all of them agree.

mod container;
mod content;
mod cover;
mod nav;
mod opf;

use super::archive::OcfWriter;
use super::error::Result;
use super::PublicationPackage;
use crate::publication::{BuildStamp, CoverImage, PublicationRequest};
use std::borrow::Cow;

/// Directory holding the package document and all publication resources.
pub const CONTENT_DIR: &str = "OEBPS";

pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// A file listed in the OPF manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: &'static str,
    /// Path relative to the package document
    pub href: String,
    pub media_type: &'static str,
    pub properties: Option<&'static str>,
}

/// An entry in the navigation documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub id: &'static str,
    pub label: String,
    pub href: &'static str,
}

/// Everything the individual documents need to know about the package being built.
pub struct Layout<'a> {
    pub request: &'a PublicationRequest,
    pub stamp: &'a BuildStamp,
    pub cover: Option<&'a CoverImage>,
    /// The article body loads resources from outside the package
    pub remote_resources: bool,
}

impl Layout<'_> {
    /// The title, falling back to "Untitled" when blank.
    pub fn title(&self) -> &str {
        let title = self.request.title.trim();
        if title.is_empty() {
            "Untitled"
        } else {
            title
        }
    }

    pub fn manifest(&self) -> Vec<ManifestItem> {
        let mut items = vec![
            ManifestItem {
                id: "ncx",
                href: "toc.ncx".to_string(),
                media_type: "application/x-dtbncx+xml",
                properties: None,
            },
            ManifestItem {
                id: "nav",
                href: "nav.xhtml".to_string(),
                media_type: XHTML_MEDIA_TYPE,
                properties: Some("nav"),
            },
        ];

        if let Some(cover) = self.cover {
            items.push(ManifestItem {
                id: "cover",
                href: "cover.xhtml".to_string(),
                media_type: XHTML_MEDIA_TYPE,
                properties: None,
            });
            items.push(ManifestItem {
                id: "cover-image",
                href: cover.href(),
                media_type: cover.kind.media_type(),
                properties: Some("cover-image"),
            });
        }

        items.push(ManifestItem {
            id: "content",
            href: "content.xhtml".to_string(),
            media_type: XHTML_MEDIA_TYPE,
            properties: self.remote_resources.then_some("remote-resources"),
        });

        items
    }

    /// Manifest ids in reading order: cover, table of contents, article.
    pub fn spine(&self) -> Vec<&'static str> {
        let mut spine = Vec::with_capacity(3);
        if self.cover.is_some() {
            spine.push("cover");
        }
        spine.push("nav");
        spine.push("content");
        spine
    }

    pub fn toc(&self) -> Vec<TocEntry> {
        let mut entries = Vec::with_capacity(2);
        if self.cover.is_some() {
            entries.push(TocEntry {
                id: "cover",
                label: "Cover".to_string(),
                href: "cover.xhtml",
            });
        }
        entries.push(TocEntry {
            id: "content",
            label: self.title().to_string(),
            href: "content.xhtml",
        });
        entries
    }
}

/// Write all documents of the publication into a fresh archive.
pub fn assemble(
    request: &PublicationRequest,
    body_html: &str,
    cover: Option<&CoverImage>,
    stamp: &BuildStamp,
) -> Result<PublicationPackage> {
    let body_html = xml_chars(body_html);
    let layout = Layout {
        request,
        stamp,
        cover,
        remote_resources: references_remote_resources(&body_html),
    };

    let mut writer = OcfWriter::new()?;
    writer.add("META-INF/container.xml", container::render().as_bytes())?;
    writer.add(
        format!("{CONTENT_DIR}/content.opf"),
        opf::render(&layout).as_bytes(),
    )?;
    writer.add(
        format!("{CONTENT_DIR}/toc.ncx"),
        nav::render_ncx(&layout).as_bytes(),
    )?;
    writer.add(
        format!("{CONTENT_DIR}/nav.xhtml"),
        nav::render_nav(&layout).as_bytes(),
    )?;

    if let Some(image) = cover {
        writer.add(
            format!("{CONTENT_DIR}/cover.xhtml"),
            cover::render(&layout, image).as_bytes(),
        )?;
        writer.add(format!("{CONTENT_DIR}/{}", image.href()), &image.data)?;
    }

    writer.add(
        format!("{CONTENT_DIR}/content.xhtml"),
        content::render(&layout, &body_html).as_bytes(),
    )?;

    log::debug!("wrote {} archive entries", writer.entries().len());
    let bytes = writer.finish()?;

    Ok(PublicationPackage {
        bytes,
        cover: cover.map(|image| image.kind),
    })
}

/// Whether `c` may appear in an XML 1.0 document.
pub(crate) fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Drop characters XML cannot represent, even as references. Vertical tabs and form feeds (line
/// and page breaks pasted from word processors) become spaces.
pub(crate) fn xml_chars(value: &str) -> Cow<'_, str> {
    if value.chars().all(is_xml_char) {
        return Cow::Borrowed(value);
    }
    Cow::Owned(
        value
            .chars()
            .filter_map(|c| match c {
                '\u{0B}' | '\u{0C}' => Some(' '),
                c if is_xml_char(c) => Some(c),
                _ => None,
            })
            .collect(),
    )
}

/// Escape free text for an XML text node.
pub(crate) fn text(value: &str) -> Cow<'_, str> {
    match xml_chars(value) {
        Cow::Borrowed(value) => html_escape::encode_text(value),
        Cow::Owned(value) => Cow::Owned(html_escape::encode_text(&value).into_owned()),
    }
}

/// Escape free text for a double-quoted XML attribute.
pub(crate) fn attr(value: &str) -> Cow<'_, str> {
    match xml_chars(value) {
        Cow::Borrowed(value) => html_escape::encode_double_quoted_attribute(value),
        Cow::Owned(value) => {
            Cow::Owned(html_escape::encode_double_quoted_attribute(&value).into_owned())
        }
    }
}

/// Whether rendered XHTML loads anything (`src="..."`) over http(s).
fn references_remote_resources(html: &str) -> bool {
    let html = html.to_ascii_lowercase();
    html.match_indices("src=").any(|(at, _)| {
        let value = html[at + 4..].trim_start_matches(['"', '\'']);
        value.starts_with("http://") || value.starts_with("https://")
    })
}
