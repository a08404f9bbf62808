//! Bundled placeholder package.
//!
//! A minimal, pre-built EPUB saying the content is unavailable. It is compiled into the binary
//! so substituting it never depends on the network.

use super::PublicationPackage;

static PLACEHOLDER_EPUB: &[u8] = include_bytes!("../../assets/placeholder.epub");

/// The bundled placeholder package.
pub fn placeholder() -> PublicationPackage {
    PublicationPackage {
        bytes: PLACEHOLDER_EPUB.to_vec(),
        cover: None,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::epub::archive::validate;
    use std::io::{Cursor, Read};

    #[test]
    fn placeholder_is_a_valid_package() {
        let package = placeholder();
        validate(package.as_bytes()).expect("placeholder validates");

        let mut archive =
            zip::ZipArchive::new(Cursor::new(package.into_bytes())).expect("is a zip");
        let mut opf = String::new();
        archive
            .by_name("OEBPS/content.opf")
            .expect("has package document")
            .read_to_string(&mut opf)
            .expect("can read");
        assert!(opf.contains("<dc:title>Content unavailable</dc:title>"));
        assert!(archive.by_name("OEBPS/content.xhtml").is_ok());
    }
}
