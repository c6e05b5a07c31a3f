//! medkb - import medical topics and render knowledge-base articles.

use anyhow::Result;
use clap::{ColorChoice, Parser};
use medkb::cli::{self, Cli, Commands};
use medkb::config::KbConfig;
use medkb::{log, logger};

fn main() {
    if let Err(e) = run() {
        log!("error"; "{:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = KbConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { force } => cli::init::init_config(&config, *force),
        Commands::Import {
            category,
            paths,
            dry_run,
            ..
        } => cli::import::import_topics(&config, category, paths, *dry_run),
        Commands::Keywords { category, path } => cli::import::backfill(&config, category, path),
        Commands::Render {
            category,
            title,
            format,
            ..
        } => cli::render::render_article(&config, category, title, *format),
        Commands::Build { .. } => cli::build::build_site(&config),
        Commands::Links { output } => cli::links::export_links(&config, output),
        Commands::Validate {
            category,
            warn_only,
        } => cli::validate::validate_articles(&config, category.as_deref(), *warn_only),
        Commands::Prune { yes } => cli::prune::prune(&config, *yes),
        Commands::Purge { yes } => cli::prune::purge(&config, *yes),
    }
}
