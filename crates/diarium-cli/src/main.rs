#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use cmd::Context;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "dia: static statistics generator for the work-environment diarium",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    /// Directory containing the snapshot database (overrides env and diarium.toml).
    #[arg(long, global = true, value_name = "DIR")]
    source_dir: Option<PathBuf>,

    /// Site year (overrides env and diarium.toml).
    #[arg(long, global = true)]
    year: Option<i32>,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags, `FORMAT`, and the TTY default.
    fn output_mode(&self) -> OutputMode {
        output::resolve_output_mode(self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Pages",
        about = "Render the front-page statistics",
        long_about = "Render the year's front page: total documents, per-day series, keyword shares, county ranking.",
        after_help = "EXAMPLES:\n    # Human-readable overview\n    dia overview\n\n    # The published artifact payload\n    dia overview --json"
    )]
    Overview(cmd::overview::OverviewArgs),

    #[command(
        next_help_heading = "Pages",
        about = "Render one county's page",
        after_help = "EXAMPLES:\n    # Stockholm county\n    dia county stockholm\n\n    # Slugs come from the geography listing\n    dia geography"
    )]
    County(cmd::county::CountyArgs),

    #[command(
        next_help_heading = "Pages",
        about = "Render one municipality's page",
        after_help = "EXAMPLES:\n    dia municipality vastra-gotaland goteborg"
    )]
    Municipality(cmd::municipality::MunicipalityArgs),

    #[command(
        next_help_heading = "Pages",
        about = "Render the page for one tracked keyword",
        after_help = "EXAMPLES:\n    # Asbestos cases, rankings, and seasons\n    dia keyword asbest --json"
    )]
    Keyword(cmd::keyword::KeywordArgs),

    #[command(
        next_help_heading = "Pages",
        about = "Render the inspections page",
        after_help = "EXAMPLES:\n    dia inspections --json"
    )]
    Inspections(cmd::inspections::InspectionsArgs),

    #[command(
        next_help_heading = "Pages",
        about = "List counties and municipalities with their slugs",
        after_help = "EXAMPLES:\n    dia geography"
    )]
    Geography(cmd::geography::GeographyArgs),

    #[command(
        next_help_heading = "Pages",
        about = "Render the latest-documents feed",
        after_help = "EXAMPLES:\n    dia latest --limit 50 --json"
    )]
    Latest(cmd::latest::LatestArgs),

    #[command(
        next_help_heading = "Site",
        about = "Write the full artifact tree for the configured year",
        after_help = "EXAMPLES:\n    # Build into the configured output_dir\n    dia build\n\n    # Build somewhere else\n    dia build --output public/data"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        next_help_heading = "Site",
        about = "Generate shell completion scripts",
        after_help = "EXAMPLES:\n    dia completions bash\n    dia completions zsh"
    )]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("DIARIUM_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "diarium=debug,info"
        } else {
            "diarium=info,warn"
        })
    });

    let format = env::var("DIARIUM_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry.with(fmt::layer().json().with_ansi(false)).init();
        }
        _ => {
            registry.with(fmt::layer().compact()).init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let ctx = Context {
        project_root: std::env::current_dir()?,
        source_dir: cli.source_dir.clone(),
        year: cli.year,
    };
    let output = cli.output_mode();

    match cli.command {
        Commands::Overview(ref args) => cmd::overview::run_overview(args, output, &ctx),
        Commands::County(ref args) => cmd::county::run_county(args, output, &ctx),
        Commands::Municipality(ref args) => {
            cmd::municipality::run_municipality(args, output, &ctx)
        }
        Commands::Keyword(ref args) => cmd::keyword::run_keyword(args, output, &ctx),
        Commands::Inspections(ref args) => cmd::inspections::run_inspections(args, output, &ctx),
        Commands::Geography(ref args) => cmd::geography::run_geography(args, output, &ctx),
        Commands::Latest(ref args) => cmd::latest::run_latest(args, output, &ctx),
        Commands::Build(ref args) => cmd::build::run_build(args, output, &ctx),
        Commands::Completions(args) => {
            cmd::completions::run_completions(args.shell, &mut Cli::command())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_subcommand_parses() {
        let cli = Cli::parse_from(["dia", "overview"]);
        assert!(matches!(cli.command, Commands::Overview(_)));
    }

    #[test]
    fn county_subcommand_takes_a_slug() {
        let cli = Cli::parse_from(["dia", "county", "stockholm"]);
        match cli.command {
            Commands::County(args) => assert_eq!(args.slug, "stockholm"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn municipality_subcommand_takes_both_slugs() {
        let cli = Cli::parse_from(["dia", "municipality", "vastra-gotaland", "goteborg"]);
        match cli.command {
            Commands::Municipality(args) => {
                assert_eq!(args.county_slug, "vastra-gotaland");
                assert_eq!(args.municipality_slug, "goteborg");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn keyword_subcommand_parses() {
        let cli = Cli::parse_from(["dia", "keyword", "asbest"]);
        assert!(matches!(cli.command, Commands::Keyword(_)));
    }

    #[test]
    fn latest_limit_defaults_to_feed_length() {
        let cli = Cli::parse_from(["dia", "latest"]);
        match cli.command {
            Commands::Latest(args) => assert_eq!(args.limit, cmd::latest::DEFAULT_LIMIT),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_flags_parse_before_and_after_the_subcommand() {
        let cli = Cli::parse_from(["dia", "--source-dir", "/srv", "--year", "2024", "overview"]);
        assert_eq!(cli.source_dir.as_deref(), Some(std::path::Path::new("/srv")));
        assert_eq!(cli.year, Some(2024));

        let cli = Cli::parse_from(["dia", "overview", "--json"]);
        assert!(cli.json);
    }

    #[test]
    fn completions_subcommand_parses() {
        let cli = Cli::parse_from(["dia", "completions", "bash"]);
        assert!(matches!(
            cli.command,
            Commands::Completions(cmd::completions::CompletionsArgs {
                shell: clap_complete::Shell::Bash,
            })
        ));
    }

    #[test]
    fn all_subcommands_listed() {
        let subcommands = [
            vec!["dia", "overview"],
            vec!["dia", "county", "stockholm"],
            vec!["dia", "municipality", "stockholm", "nynashamn"],
            vec!["dia", "keyword", "asbest"],
            vec!["dia", "inspections"],
            vec!["dia", "geography"],
            vec!["dia", "latest"],
            vec!["dia", "build"],
            vec!["dia", "completions", "bash"],
        ];
        for args in &subcommands {
            let result = Cli::try_parse_from(args.iter());
            assert!(
                result.is_ok(),
                "Failed to parse: {:?} — error: {:?}",
                args,
                result.err()
            );
        }
    }
}
