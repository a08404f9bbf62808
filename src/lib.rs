//! Packages publica.now articles as EPUB publications.
//!
//! A [`PublicationRequest`] (title, author, Markdown body, and an optional cover) goes in, and a
//! [`PublicationPackage`] holding a complete OCF container comes out. The resulting bytes are
//! what the platform uploads and hands to the publishing service.
//!
//! ```no_run
//! # async fn example() -> publica_epub::Result<()> {
//! use publica_epub::{CoverSource, PackageBuilder, PublicationRequest};
//!
//! let request = PublicationRequest::builder()
//!     .title("Letters from the Coast")
//!     .author("Ana Duarte")
//!     .body_markdown("# Chapter one\n\nIt was *windy*.")
//!     .cover(CoverSource::Url("https://cdn.example.com/covers/42.jpg".to_string()))
//!     .build()
//!     .expect("title and author are set");
//!
//! let package = PackageBuilder::new()?.build(&request).await?;
//! std::fs::write("letters.epub", package.as_bytes()).expect("can write");
//! # Ok(())
//! # }
//! ```

pub mod epub;
pub mod fetch;
pub mod publication;

pub use epub::{
    placeholder, validate, BuildError, CoverError, Markdown, PackageBuilder, PublicationPackage,
    Render, RenderError, Result, EPUB_MIMETYPE,
};
pub use fetch::{CoverFetcher, DEFAULT_COVER_TIMEOUT, MAX_COVER_BYTES};
pub use publication::{
    BuildStamp, CoverImage, CoverSource, ImageKind, PublicationRequest, PublicationRequestBuilder,
};
