//! EPUB packaging for publica.now articles.
//!
//! This module turns a `PublicationRequest` into an EPUB package with:
//! - Dublin Core metadata (title, creator, description, language, date, publisher)
//! - An optional cover page and cover image
//! - EPUB 3 navigation plus an EPUB 2 NCX for older readers
//! - The article body rendered from Markdown
//!
//! Failure handling is deliberately narrow. A cover that cannot be resolved is dropped and the
//! package is built without it. Anything else that goes wrong (the body fails to render, the
//! archive fails to serialize or fails validation) is returned as a `BuildError`. Callers that
//! must always publish *something* can use `build_or_placeholder`, which substitutes a bundled
//! placeholder package.

mod archive;
mod error;
mod markdown;
mod placeholder;
mod rendering;
mod styles;

pub use archive::{validate, EPUB_MIMETYPE, MIN_PACKAGE_LEN};
pub use error::{BuildError, CoverError, RenderError, Result};
pub use markdown::{Markdown, Render};
pub use placeholder::placeholder;

use crate::fetch::{CoverFetcher, DEFAULT_COVER_TIMEOUT};
use crate::publication::{BuildStamp, CoverImage, ImageKind, PublicationRequest};
use std::time::Duration;

/// A finished EPUB package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicationPackage {
    pub(crate) bytes: Vec<u8>,
    pub(crate) cover: Option<ImageKind>,
}

impl PublicationPackage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// The format of the embedded cover image, if the package has one.
    pub fn cover(&self) -> Option<ImageKind> {
        self.cover
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Builds EPUB packages. Holds no per-build state, so one builder can serve any number of
/// concurrent builds.
#[derive(Debug, Clone)]
pub struct PackageBuilder<R: Render = Markdown> {
    renderer: R,
    fetcher: CoverFetcher,
}

impl PackageBuilder<Markdown> {
    /// A builder using the Markdown renderer and the default cover timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_COVER_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        Ok(Self {
            renderer: Markdown::default(),
            fetcher: CoverFetcher::new(timeout)?,
        })
    }
}

impl<R: Render> PackageBuilder<R> {
    pub fn with_fetcher(self, fetcher: CoverFetcher) -> Self {
        Self { fetcher, ..self }
    }

    pub fn with_renderer<R2: Render>(self, renderer: R2) -> PackageBuilder<R2> {
        PackageBuilder {
            renderer,
            fetcher: self.fetcher,
        }
    }

    /// Build a package with a fresh identifier and modification time.
    pub async fn build(&self, request: &PublicationRequest) -> Result<PublicationPackage> {
        self.build_with_stamp(request, &BuildStamp::now()).await
    }

    /// Build a package using the given identifier and modification time. The same request and
    /// stamp always produce byte-identical packages, provided the cover resolves the same way.
    pub async fn build_with_stamp(
        &self,
        request: &PublicationRequest,
        stamp: &BuildStamp,
    ) -> Result<PublicationPackage> {
        log::debug!("building package for \"{}\"", request.title);
        let body_html = self.renderer.render(&request.body_markdown)?;

        let cover = match &request.cover {
            Some(source) => self.fetcher.resolve(source).await,
            None => None,
        };

        rendering::assemble(request, &body_html, cover.as_ref(), stamp)
    }

    /// Assemble a package from an already resolved cover. Performs no IO.
    pub fn package(
        &self,
        request: &PublicationRequest,
        cover: Option<&CoverImage>,
        stamp: &BuildStamp,
    ) -> Result<PublicationPackage> {
        let body_html = self.renderer.render(&request.body_markdown)?;
        rendering::assemble(request, &body_html, cover, stamp)
    }

    /// Build a package, substituting the bundled placeholder if no valid package can be built.
    pub async fn build_or_placeholder(&self, request: &PublicationRequest) -> PublicationPackage {
        match self.build(request).await {
            Ok(package) => package,
            Err(e) => {
                log::error!(
                    "Failed to build package for \"{}\", using placeholder: {e}",
                    request.title
                );
                placeholder()
            }
        }
    }
}
