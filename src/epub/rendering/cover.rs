//! Cover page rendering.
//!
//! A single full-page image, centered and scaled down to fit. Marked as the cover in the nav
//! landmarks and the OPF guide so e-readers show it in library views.

use super::{attr, text, Layout};
use crate::epub::styles;
use crate::publication::CoverImage;

/// Render the cover page as XHTML.
pub fn render(layout: &Layout, image: &CoverImage) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
    <meta charset="UTF-8"/>
    <meta name="viewport" content="width=device-width, initial-scale=1"/>
    <title>Cover - {title}</title>
    <style type="text/css">{css}</style>
</head>
<body epub:type="cover">
<div class="cover">
<img src="{src}" alt="{alt}" style="max-width:100%"/>
</div>
</body>
</html>
"#,
        lang = attr(&layout.request.language),
        title = text(layout.title()),
        css = styles::cover_stylesheet(),
        src = attr(&image.href()),
        alt = attr(layout.title()),
    )
}
