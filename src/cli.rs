use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Path to the configuration file
    #[clap(short, long, default_value = crate::config::CONFIG_FILE)]
    pub config: PathBuf,

    /// Write the EPUB here instead of the configured output file
    #[clap(short, long)]
    pub out: Option<PathBuf>,

    /// Print a machine-readable JSON report instead of a summary
    #[clap(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a publication.toml config file
    Init,
    /// Packages the article described by the config file as an EPUB
    Build(BuildArgs),
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[clap(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_build_arguments() {
        let cli = Cli::parse_from(["publica-epub", "-vv", "build", "--out", "a.epub", "--json"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Build(args) => {
                assert_eq!(args.config, PathBuf::from("publication.toml"));
                assert_eq!(args.out, Some(PathBuf::from("a.epub")));
                assert!(args.json);
            }
            Commands::Init => panic!("expected build command"),
        }
    }
}
