//! Interactive configuration wizard for creating `publication.toml`.
//!
//! The wizard collects the article metadata, the location of the Markdown body and cover, and
//! the output settings through a series of prompts, then writes the configuration next to the
//! article.

use crate::config::{Configuration, OutputConfig, PublicationConfig, CONFIG_FILE};
use anyhow::{Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input};
use publica_epub::CoverSource;
use std::path::PathBuf;

/// Languages offered in the picker; anything else can be typed in.
const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("pt", "Portuguese"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
];

/// Run the interactive configuration wizard.
///
/// Prompts the user for article metadata and output options, then writes `publication.toml` to
/// the current directory.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme::default();

    let title: String = Input::with_theme(&theme)
        .with_prompt("Article title")
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;

    let author: String = Input::with_theme(&theme)
        .with_prompt("Author")
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain author")?;

    let description: String = Input::with_theme(&theme)
        .with_prompt("Short description (leave empty for none)")
        .allow_empty(true)
        .interact()?;

    let mut language_options: Vec<String> = LANGUAGES
        .iter()
        .map(|(code, name)| format!("{name} ({code})"))
        .collect();
    language_options.push("Other".to_string());
    let language_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Language")
        .items(&language_options)
        .default(0)
        .interact()?;
    let language = match LANGUAGES.get(language_idx) {
        Some((code, _)) => code.to_string(),
        None => Input::with_theme(&theme)
            .with_prompt("Language code (BCP 47, e.g. en-GB)")
            .allow_empty(false)
            .interact()?,
    };

    let date: String = Input::with_theme(&theme)
        .with_prompt("Publication date (YYYY-MM-DD, leave empty to use the build date)")
        .allow_empty(true)
        .validate_with(|input: &String| {
            if input.trim().is_empty()
                || chrono::NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").is_ok()
            {
                Ok(())
            } else {
                Err("Dates must look like 2024-05-01")
            }
        })
        .interact()?;

    let publisher: String = Input::with_theme(&theme)
        .with_prompt("Publisher")
        .default(publica_epub::publication::default_publisher())
        .interact()?;

    let body: String = Input::with_theme(&theme)
        .with_prompt("Markdown file with the article body")
        .default("article.md".to_string())
        .interact()?;
    let body = PathBuf::from(body);
    if !body.exists() {
        println!(
            "{}: {} doesn't exist yet, create it before building",
            console::style("Note").yellow(),
            body.display()
        );
    }

    let cover: String = Input::with_theme(&theme)
        .with_prompt("Cover image path or URL (leave empty for none)")
        .allow_empty(true)
        .interact()?;
    if let Some(CoverSource::Path(path)) = CoverSource::parse(&cover) {
        if !path.exists() {
            println!(
                "{}: {} doesn't exist, the EPUB will be built without a cover until it does",
                console::style("Note").yellow(),
                path.display()
            );
        }
    }

    let outfile: String = Input::with_theme(&theme)
        .with_prompt("Output epub file")
        .default(body.with_extension("epub").to_string_lossy().to_string())
        .interact()?;
    let mut outfile = PathBuf::from(outfile);
    let ext = outfile
        .extension()
        .map(std::ffi::OsStr::to_ascii_lowercase)
        .unwrap_or_default();
    if ext != *"epub" {
        outfile.set_extension("epub");
    }

    let mut output = OutputConfig {
        outfile,
        ..OutputConfig::default()
    };
    if !cover.trim().is_empty() {
        output.cover_timeout_secs = Input::with_theme(&theme)
            .with_prompt("Seconds to wait for the cover before leaving it out")
            .default(output.cover_timeout_secs)
            .interact()?;
    }
    output.placeholder_on_failure = Confirm::with_theme(&theme)
        .with_prompt("Write a placeholder EPUB if the article can't be packaged?")
        .default(false)
        .interact()?;

    let config = Configuration {
        publication: PublicationConfig {
            title,
            author,
            description: description.trim().to_string(),
            language,
            date: date.trim().to_string(),
            publisher,
            body,
            cover: cover.trim().to_string(),
        },
        output,
    };

    let config =
        toml::to_string_pretty(&config).with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from(CONFIG_FILE);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!("{CONFIG_FILE} already exists, do you want to override it?"))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(&config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{CONFIG_FILE} written!");
    }

    Ok(())
}
