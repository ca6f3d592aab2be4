use std::{
    io::{self, Write},
    path::PathBuf,
};

mod render;
mod shell;
mod terminal;

use clap::{ArgAction, ValueEnum};
use shelfmark::{Config, Library, SearchQuery};
use shell::{Shell, TerminalPrompt};
use terminal::Colorize;
use tracing::instrument;

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Start with an empty catalog instead of the demo data
    #[arg(long, global = true)]
    no_demo: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        let config = self.load_config()?;
        let demo = config.demo_data && !self.no_demo;
        let library = open_library(&config, demo)?;

        self.command
            .unwrap_or(Command::Shell)
            .run(library, demo, &mut io::stdout().lock())
    }

    fn load_config(&self) -> anyhow::Result<Config> {
        let Some(path) = &self.config else {
            tracing::debug!("no config file given, using defaults");
            return Ok(Config::default());
        };
        let config = Config::load(path).map_err(|e| anyhow::anyhow!("{e}"))?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// Builds the session's library, seeded with the demo catalog if requested.
fn open_library(config: &Config, demo: bool) -> anyhow::Result<Library> {
    let mut library = Library::with_config(config);
    if demo {
        shelfmark::demo::populate(&mut library)?;
    }
    Ok(library)
}

/// Subcommands.
///
/// The catalog is held in memory for a single run, so the report commands
/// show the starting catalog: the demo data, or nothing with `--no-demo`.
/// Loans only exist inside an interactive session.
#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Run the interactive menu (default)
    Shell,

    /// List the books in the starting catalog
    Books(Report),

    /// List the borrowers in the starting catalog
    Borrowers(Report),

    /// Search the starting catalog by title, author and/or genre
    Search(Search),
}

impl Command {
    fn run(self, library: Library, demo: bool, out: &mut dyn Write) -> anyhow::Result<()> {
        match self {
            Self::Shell => {
                writeln!(out, "\nWelcome to the Library Management System!")?;
                if demo {
                    writeln!(out, "{}", "Demo data has been pre-populated.".dim())?;
                }
                Shell::new(library, TerminalPrompt::default(), out).run()?;
            }
            Self::Books(report) => report.books(&library, out)?,
            Self::Borrowers(report) => report.borrowers(&library, out)?,
            Self::Search(search) => search.run(&library, out)?,
        }
        Ok(())
    }
}

/// Output formats for the report commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, clap::Parser)]
pub struct Report {
    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Report {
    #[instrument(level = "debug", skip(library, out))]
    fn books(&self, library: &Library, out: &mut dyn Write) -> anyhow::Result<()> {
        let books = library.list_all_books();
        match self.output {
            OutputFormat::Table => render::books(out, books)?,
            OutputFormat::Json => render::json(out, books)?,
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(library, out))]
    fn borrowers(&self, library: &Library, out: &mut dyn Write) -> anyhow::Result<()> {
        let borrowers = library.list_all_borrowers();
        match self.output {
            OutputFormat::Table => render::borrowers(out, borrowers)?,
            OutputFormat::Json => render::json(out, borrowers)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Search {
    /// Case-insensitive substring of the title
    #[arg(long, short)]
    title: Option<String>,

    /// Case-insensitive substring of the author
    #[arg(long, short)]
    author: Option<String>,

    /// Case-insensitive substring of the genre
    #[arg(long, short)]
    genre: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    output: OutputFormat,
}

impl Search {
    #[instrument(level = "debug", skip(library, out))]
    fn run(self, library: &Library, out: &mut dyn Write) -> anyhow::Result<()> {
        let query = SearchQuery {
            title: self.title,
            author: self.author,
            genre: self.genre,
        };
        let results = library.search_book(&query);
        match self.output {
            OutputFormat::Table => render::search_results(out, &results)?,
            OutputFormat::Json => render::json(out, &results)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    fn demo_library() -> Library {
        open_library(&Config::default(), true).unwrap()
    }

    fn run(args: &[&str], library: Library) -> String {
        let cli = Cli::try_parse_from(args).unwrap();
        let mut out = Vec::new();
        cli.command
            .unwrap_or(Command::Shell)
            .run(library, true, &mut out)
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_demo_flag_parses_globally() {
        let cli = Cli::try_parse_from(["shelf", "books", "--no-demo"]).unwrap();
        assert!(cli.no_demo);
        assert!(matches!(cli.command, Some(Command::Books(_))));
    }

    #[test]
    fn books_table_lists_demo_catalog() {
        let output = run(&["shelf", "books"], demo_library());
        assert!(output.contains("--- All Books in Library ---"));
        assert!(output.contains("Title: The Great Gatsby"));
        assert!(output.contains("Quantity: 0 (Out of Stock)"));
    }

    #[test]
    fn empty_catalog_reports_none() {
        let output = run(&["shelf", "books"], Library::new());
        assert!(output.contains("No books in the library."));
        let output = run(&["shelf", "borrowers"], Library::new());
        assert!(output.contains("No borrowers in the system."));
    }

    #[test]
    fn borrowers_json_lists_seed_borrowers() {
        let output = run(&["shelf", "borrowers", "--output", "json"], demo_library());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        assert_eq!(value[0]["membership_id"], "M001");
        assert_eq!(value[1]["contact"], "555-1234");
        assert_eq!(value[0]["loans"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn search_json_filters_case_insensitively() {
        let output = run(
            &["shelf", "search", "--genre", "DYSTOP", "--output", "json"],
            demo_library(),
        );
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let books = value.as_array().unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0]["title"], "1984");
        assert_eq!(books[0]["quantity"], 3);
    }

    #[test]
    fn overdue_is_only_available_in_the_shell() {
        assert!(Cli::try_parse_from(["shelf", "overdue"]).is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("shelf.toml");
        let cli = Cli::try_parse_from(["shelf", "--config", missing.to_str().unwrap()]).unwrap();
        let error = cli.load_config().unwrap_err();
        assert!(error.to_string().starts_with("Failed to read config file:"));
    }
}
