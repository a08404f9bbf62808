//! `META-INF/container.xml`, the OCF pointer to the package document.

use super::CONTENT_DIR;

pub fn render() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{CONTENT_DIR}/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#
    )
}

#[cfg(test)]
mod test {
    use super::super::test::assert_well_formed;

    #[test]
    fn points_at_package_document() {
        let xml = super::render();
        assert!(xml.contains(r#"full-path="OEBPS/content.opf""#));
        assert_well_formed(&xml);
    }
}
