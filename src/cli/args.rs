//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::importer::OnExisting;
use crate::render::CitationScope;

/// Medical knowledge-base content tool: import topics, render articles
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: medkb.toml)
    #[arg(short = 'C', long, global = true, default_value = crate::config::CONFIG_FILE, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default medkb.toml in the current directory
    Init {
        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Import topic JSON files into a category
    #[command(visible_alias = "i")]
    Import {
        /// Category the articles are filed under (created if missing)
        #[arg(short, long)]
        category: String,

        /// Topic files or directories containing `.json` topic files
        #[arg(required = true, value_name = "PATH", value_hint = clap::ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        /// What to do with an existing article of the same title
        #[arg(short, long, value_enum)]
        on_existing: Option<OnExisting>,

        /// Convert and report warnings without writing to the store
        #[arg(short = 'n', long)]
        dry_run: bool,
    },

    /// Fill in empty keywords of an existing article from a topic file
    #[command(visible_alias = "k")]
    Keywords {
        #[arg(short, long)]
        category: String,

        /// Topic JSON file carrying `title` and `keywords`
        #[arg(value_name = "PATH", value_hint = clap::ValueHint::FilePath)]
        path: PathBuf,
    },

    /// Render one article to stdout
    #[command(visible_alias = "r")]
    Render {
        #[arg(short, long)]
        category: String,

        /// Article title
        #[arg(short, long)]
        title: String,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = RenderFormat::Json)]
        format: RenderFormat,

        /// Where citation markers are linked
        #[arg(long, value_enum)]
        citation_scope: Option<CitationScope>,
    },

    /// Write every published article as a static HTML page
    #[command(visible_alias = "b")]
    Build {
        /// Output directory (relative to project root)
        #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
        output: Option<PathBuf>,

        /// Clean output directory completely before building
        #[arg(long)]
        clean: bool,

        /// Where citation markers are linked
        #[arg(long, value_enum)]
        citation_scope: Option<CitationScope>,
    },

    /// Export title, admin URL and live URL of every published article as CSV
    #[command(visible_alias = "l")]
    Links {
        /// CSV file to write
        #[arg(short, long, default_value = "article_links.csv", value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,
    },

    /// Check stored article bodies for structural problems
    #[command(visible_alias = "v")]
    Validate {
        /// Only check articles in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Treat errors as warnings (exit successfully)
        #[arg(long, short = 'w')]
        warn_only: bool,
    },

    /// Delete categories that contain no articles
    Prune {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every article, then every empty category
    Purge {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// `render` output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RenderFormat {
    /// `{"html": ..., "toc": [...]}`
    Json,
    /// The article HTML only
    Html,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_version_and_verbose_flags() {
        let err = Cli::try_parse_from(["medkb", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);

        let cli = Cli::parse_from(["medkb", "-v", "prune"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_import_args() {
        let cli = Cli::parse_from([
            "medkb",
            "import",
            "-c",
            "Allergies",
            "hay-fever.json",
            "topics/",
            "--on-existing",
            "replace",
        ]);
        let Commands::Import {
            category,
            paths,
            on_existing,
            dry_run,
        } = cli.command
        else {
            panic!("expected import");
        };
        assert_eq!(category, "Allergies");
        assert_eq!(paths.len(), 2);
        assert_eq!(on_existing, Some(OnExisting::Replace));
        assert!(!dry_run);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["medkb", "links", "-v", "-C", "kb/medkb.toml"]);
        assert!(cli.verbose);
        assert_eq!(cli.config, PathBuf::from("kb/medkb.toml"));
        assert!(!cli.is_init());
    }

    #[test]
    fn test_aliases() {
        let cli = Cli::parse_from(["medkb", "r", "-c", "Allergies", "-t", "Hay Fever"]);
        assert!(matches!(
            cli.command,
            Commands::Render {
                format: RenderFormat::Json,
                citation_scope: None,
                ..
            }
        ));
    }

    #[test]
    fn test_import_requires_paths() {
        assert!(Cli::try_parse_from(["medkb", "import", "-c", "Allergies"]).is_err());
    }
}
