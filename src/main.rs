use anyhow::{Context, Result};
use cli::{BuildArgs, Cli};
use config::Configuration;
use indicatif::{ProgressBar, ProgressStyle};
use publica_epub::PackageBuilder;
use serde::Serialize;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod cli;
mod config;
mod config_wizard;

#[tokio::main]
async fn main() -> ExitCode {
    use clap::Parser;
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = try_main(cli).await {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Route both `tracing` and `log` records to stderr. `RUST_LOG` overrides the `-v` level.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn try_main(cli: Cli) -> Result<()> {
    match cli.command {
        cli::Commands::Init => config_wizard::run(),
        cli::Commands::Build(args) => build(&args).await,
    }
}

/// Summary of a build, printed as JSON with `--json`.
#[derive(Debug, Serialize)]
struct BuildReport {
    outfile: String,
    bytes: usize,
    cover: Option<&'static str>,
    placeholder: bool,
}

async fn build(args: &BuildArgs) -> Result<()> {
    let config = Configuration::load(&args.config)?;
    let base_dir = args
        .config
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    let request = config.to_request(&base_dir)?;
    let outfile = args
        .out
        .clone()
        .unwrap_or_else(|| config.outfile(&base_dir));

    let builder =
        PackageBuilder::with_timeout(Duration::from_secs(config.output.cover_timeout_secs))
            .with_context(|| "Failed to create package builder")?;

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("can parse progress style"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));
    progress.set_message(format!("Packaging \"{}\"...", request.title));

    let result = builder.build(&request).await;
    progress.finish_and_clear();

    let (package, placeholder) = match result {
        Ok(package) => (package, false),
        Err(e) if config.output.placeholder_on_failure => {
            log::error!("Failed to package article, writing placeholder instead: {e}");
            (publica_epub::placeholder(), true)
        }
        Err(e) => return Err(e).with_context(|| "Failed to package article"),
    };

    if request.cover.is_some() && package.cover().is_none() && !placeholder {
        log::warn!("The cover could not be resolved; the EPUB was written without one");
    }

    std::fs::write(&outfile, package.as_bytes())
        .with_context(|| format!("Failed to write EPUB file: {}", outfile.display()))?;

    let report = BuildReport {
        outfile: outfile.display().to_string(),
        bytes: package.len(),
        cover: package.cover().map(|kind| kind.media_type()),
        placeholder,
    };

    if args.json {
        let json =
            serde_json::to_string_pretty(&report).with_context(|| "Failed to serialize report")?;
        println!("{json}");
    } else {
        println!("  EPUB:  {}", report.outfile);
        println!("  Size:  {} bytes", report.bytes);
        println!("  Cover: {}", report.cover.unwrap_or("none"));
        if placeholder {
            println!(
                "{}: the article could not be packaged; a placeholder was written instead",
                console::style("Warning").yellow()
            );
        }
    }

    Ok(())
}
