mod cover;
pub use cover::*;

mod stamp;
pub use stamp::*;

use chrono::NaiveDate;
use derive_builder::Builder;

/// Everything we need to know to package an article as a publication
#[derive(Builder, Debug, Clone, PartialEq, Eq)]
#[builder(setter(into))]
pub struct PublicationRequest {
    /// The title of the article / publication
    pub title: String,

    /// The creator credited as `dc:creator`
    pub author: String,

    /// A short summary shown under the title and stored as `dc:description`. Empty for none.
    #[builder(default)]
    pub description: String,

    /// The article body, as Markdown
    #[builder(default)]
    pub body_markdown: String,

    /// BCP 47 language code, e.g. "en", "es-AR"
    #[builder(default = "default_language()")]
    pub language: String,

    #[builder(default = "chrono::Utc::now().date_naive()")]
    pub publication_date: NaiveDate,

    #[builder(default = "default_publisher()")]
    pub publisher: String,

    /// Where to find the cover image, if the article has one. Cover resolution never fails the
    /// build; an unresolvable cover is simply left out of the package.
    #[builder(setter(into, strip_option), default)]
    pub cover: Option<CoverSource>,
}

impl PublicationRequest {
    pub fn builder() -> PublicationRequestBuilder {
        PublicationRequestBuilder::default()
    }

    /// Returns the description, if one was provided.
    pub fn description_opt(&self) -> Option<&str> {
        let description = self.description.trim();
        if description.is_empty() {
            None
        } else {
            Some(description)
        }
    }
}

pub fn default_language() -> String {
    "en".to_string()
}

pub fn default_publisher() -> String {
    "publica.now".to_string()
}
