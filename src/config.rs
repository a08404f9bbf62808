//! Command line configuration.
//!
//! A `publication.toml` describes one article: its metadata, where the Markdown body and cover
//! live, and where the EPUB should be written. Relative paths are resolved against the directory
//! holding the configuration file, so a config can be rendered from anywhere.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use publica_epub::{CoverSource, PublicationRequest};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "publication.toml";

/// Article metadata and content locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicationConfig {
    pub title: String,
    pub author: String,
    /// Short summary. Empty string for none.
    #[serde(default)]
    pub description: String,
    /// Language code (BCP 47 format, e.g., "en", "en-GB", "es").
    #[serde(default = "publica_epub::publication::default_language")]
    pub language: String,
    /// Publication date as YYYY-MM-DD. Empty string for today.
    #[serde(default)]
    pub date: String,
    #[serde(default = "publica_epub::publication::default_publisher")]
    pub publisher: String,
    /// Markdown file holding the article body
    pub body: PathBuf,
    /// Cover image path or http(s) URL. Empty string for none.
    #[serde(default)]
    pub cover: String,
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            title: "Untitled".to_string(),
            author: String::new(),
            description: String::new(),
            language: publica_epub::publication::default_language(),
            date: String::new(),
            publisher: publica_epub::publication::default_publisher(),
            body: PathBuf::from("article.md"),
            cover: String::new(),
        }
    }
}

/// Where and how the package is written.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output EPUB file path
    pub outfile: PathBuf,
    /// How long to wait for a remote cover before leaving it out
    #[serde(default = "default_cover_timeout_secs")]
    pub cover_timeout_secs: u64,
    /// Write the bundled placeholder package if the article cannot be packaged
    #[serde(default)]
    pub placeholder_on_failure: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            outfile: PathBuf::from("article.epub"),
            cover_timeout_secs: default_cover_timeout_secs(),
            placeholder_on_failure: false,
        }
    }
}

fn default_cover_timeout_secs() -> u64 {
    publica_epub::DEFAULT_COVER_TIMEOUT.as_secs()
}

/// Complete configuration for a publica-epub project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Configuration {
    pub publication: PublicationConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl Configuration {
    pub fn load(path: &Path) -> Result<Configuration> {
        let contents = std::fs::read_to_string(path).with_context(|| {
            format!(
                "Failed to load {} - run 'publica-epub init' first",
                path.display()
            )
        })?;
        toml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Returns the parsed publication date, if configured.
    pub fn date_opt(&self) -> Result<Option<NaiveDate>> {
        let date = self.publication.date.trim();
        if date.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .with_context(|| format!("Invalid publication date '{date}', expected YYYY-MM-DD"))
    }

    /// Returns the cover source, if configured. Relative paths are resolved against `base_dir`.
    pub fn cover_opt(&self, base_dir: &Path) -> Option<CoverSource> {
        match CoverSource::parse(&self.publication.cover)? {
            CoverSource::Path(path) if path.is_relative() => {
                Some(CoverSource::Path(base_dir.join(path)))
            }
            source => Some(source),
        }
    }

    /// Output path, resolved against `base_dir` when relative.
    pub fn outfile(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.output.outfile)
    }

    /// Read the article body and assemble the request to package.
    pub fn to_request(&self, base_dir: &Path) -> Result<PublicationRequest> {
        let publication = &self.publication;
        let body_path = base_dir.join(&publication.body);
        let body_markdown = std::fs::read_to_string(&body_path)
            .with_context(|| format!("Failed to read article body {}", body_path.display()))?;

        let mut builder = PublicationRequest::builder();
        builder
            .title(publication.title.as_str())
            .author(publication.author.as_str())
            .description(publication.description.as_str())
            .body_markdown(body_markdown)
            .language(publication.language.as_str())
            .publisher(publication.publisher.as_str());
        if let Some(date) = self.date_opt()? {
            builder.publication_date(date);
        }
        if let Some(cover) = self.cover_opt(base_dir) {
            builder.cover(cover);
        }

        builder
            .build()
            .with_context(|| "Failed to assemble publication request")
    }
}
