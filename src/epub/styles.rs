//! CSS for the publication's XHTML documents.
//!
//! The stylesheet is inlined into each document's `<head>` instead of shipped as a separate
//! manifest item, so the package layout stays fixed. It aims for plain, readable defaults that
//! e-readers are free to override: a serif body font, generous line height, modest margins, and
//! images that never overflow the page.

/// Body text font stack.
const BODY_FONT: &str = r#"Georgia, "Times New Roman", serif"#;

/// Monospace stack for inline code and code blocks.
const CODE_FONT: &str = r#""Source Code Pro", "Fira Mono", monospace"#;

/// Generate the stylesheet for the article content document.
pub fn content_stylesheet() -> String {
    format!(
        r#"
body {{
    font-family: {BODY_FONT};
    line-height: 1.6;
    margin: 1em 5%;
}}

h1, h2, h3, h4, h5, h6 {{
    line-height: 1.25;
    margin: 1.2em 0 0.5em;
}}

p {{
    margin: 0 0 1em;
}}

img {{
    max-width: 100%;
    height: auto;
}}

blockquote {{
    margin: 1em 0;
    padding-left: 1em;
    border-left: 3px solid #ccc;
    font-style: italic;
}}

pre, code {{
    font-family: {CODE_FONT};
    font-size: 0.9em;
}}

pre {{
    white-space: pre-wrap;
    padding: 0.5em;
    border: 1px solid #ddd;
}}

table {{
    border-collapse: collapse;
    margin: 1em 0;
}}

th, td {{
    border: 1px solid #ccc;
    padding: 0.25em 0.5em;
}}

/* Title block */
.title-block {{
    text-align: center;
    margin: 2em 0 2.5em;
}}

.title-block h1 {{
    font-size: 2em;
    margin: 0 0 0.5em;
}}

.title-block .author {{
    font-size: 1.2em;
    margin: 0 0 1em;
}}

.title-block .description {{
    font-style: italic;
    color: #555;
}}
"#
    )
}

/// Generate the stylesheet for the cover document.
pub fn cover_stylesheet() -> String {
    r#"
body {
    margin: 0;
    padding: 0;
    text-align: center;
}

.cover {
    height: 100%;
    text-align: center;
}

.cover img {
    max-width: 100%;
    max-height: 100%;
    height: auto;
}
"#
    .to_string()
}

/// Generate the stylesheet for the navigation document.
pub fn nav_stylesheet() -> String {
    format!(
        r#"
body {{
    font-family: {BODY_FONT};
    margin: 1em 5%;
}}

nav ol {{
    list-style-type: none;
    padding-left: 0;
}}

nav li {{
    margin: 0.3em 0;
}}

nav a {{
    text-decoration: none;
    color: inherit;
}}
"#
    )
}
