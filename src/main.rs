use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use quote_finder::config::{self, find_config_file, load_config, user_config_path, ConfigFile};
use quote_finder::ui::{self, status_message, Spinner, Status};
use quote_finder::utils::{is_terminal, terminal_width};
use quote_finder::{
    OutputFormat, PromptBuilder, QuoteFinder, QuoteSource, RenderOptions, ResultsView,
    SearchSession, SortKey,
};
use std::io::IsTerminal;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Quote Finder - Find book quotes containing a word
#[derive(Parser, Debug)]
#[command(name = "quote-finder")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find book quotes containing a word using a generative text service")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, short, value_enum, global = true, default_value_t = Format::Auto)]
    output: Format,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Show all environment variables
    #[arg(long, global = true)]
    env: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Output format for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    /// Automatic based on terminal (table if TTY, JSON otherwise)
    Auto,
    /// Table format (human-readable)
    Table,
    /// JSON format (machine-readable)
    Json,
    /// Plain text format
    Plain,
}

/// Sort field for results
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum SortField {
    /// Sort by author
    Author,
    /// Sort by book title
    Book,
}

impl From<SortField> for SortKey {
    fn from(field: SortField) -> Self {
        match field {
            SortField::Author => SortKey::Author,
            SortField::Book => SortKey::Book,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Search for quotes containing a word
    #[command(alias = "s")]
    Search {
        /// Word the quotes must contain
        term: String,

        /// Sort results by this field (default from config: author)
        #[arg(long, value_enum)]
        sort: Option<SortField>,

        /// Page of results to show
        #[arg(long, short, default_value_t = 1)]
        page: usize,
    },

    /// Print the request payload for a word without sending it
    Prompt {
        /// Word the quotes must contain
        term: String,
    },

    /// Interactive session with paging and sorting (default)
    #[command(alias = "i")]
    Interactive,

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Write a default configuration file
    Init {
        /// Where to write the file (default: user config directory)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration (API key redacted)
    Show,

    /// Check that a configuration file parses
    Check {
        /// File to check (default: the file that would be loaded)
        path: Option<PathBuf>,
    },
}

fn print_env_vars() {
    println!("Quote Finder - Environment Variables");
    println!();
    println!("API Key:");
    println!("  GEMINI_API_KEY               API key for the Gemini generateContent endpoint");
    println!("  QUOTE_FINDER_API_KEY         Alternative name, checked first");
    println!();
    println!("Settings (override the config file):");
    println!(
        "  QUOTE_FINDER_API__MODEL              Model name (default: {})",
        quote_finder::sources::DEFAULT_MODEL
    );
    println!("  QUOTE_FINDER_API__ENDPOINT           API base URL");
    println!("  QUOTE_FINDER_API__TIMEOUT_SECS       Request timeout in seconds (default: 60)");
    println!("  QUOTE_FINDER_RETRY__MAX_ATTEMPTS     Attempts before giving up (default: 5)");
    println!("  QUOTE_FINDER_RETRY__INITIAL_DELAY_MS First retry delay in ms (default: 1000)");
    println!("  QUOTE_FINDER_DISPLAY__DEFAULT_SORT   author or book (default: author)");
    println!();
    println!("Other Settings:");
    println!("  RUST_LOG                     Rust logging level (e.g., debug, info, warn, error)");
    println!();
    println!("Example:");
    println!("  export GEMINI_API_KEY=\"your-key-here\"");
    println!("  quote-finder search love");
    std::process::exit(0);
}

/// A line typed in interactive mode
#[derive(Debug, Clone, PartialEq, Eq)]
enum ReplCommand {
    Search(String),
    Next,
    Prev,
    Page(usize),
    Sort(SortKey),
    Help,
    Quit,
    Nothing,
}

impl ReplCommand {
    fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((command, arg)) => (command, arg.trim()),
            None => (line, ""),
        };

        match command.to_lowercase().as_str() {
            "" => Ok(ReplCommand::Nothing),
            "search" | "s" => Ok(ReplCommand::Search(arg.to_string())),
            "next" | "n" => Ok(ReplCommand::Next),
            "prev" | "p" => Ok(ReplCommand::Prev),
            "page" => arg
                .parse()
                .map(ReplCommand::Page)
                .map_err(|_| format!("'{}' is not a page number", arg)),
            "sort" => arg.parse().map(ReplCommand::Sort),
            "help" | "h" | "?" => Ok(ReplCommand::Help),
            "quit" | "q" | "exit" => Ok(ReplCommand::Quit),
            other => Err(format!("unknown command '{}' (type help)", other)),
        }
    }
}

struct App {
    finder: QuoteFinder,
    view: ResultsView,
    color: bool,
    quiet: bool,
}

impl App {
    /// Run one search, showing a spinner on stderr while loading
    async fn search(&self, session: &mut SearchSession, term: &str) {
        let source = self.finder.client().source().name();
        let spinner = (!self.quiet && std::io::stderr().is_terminal()).then(|| {
            Spinner::new(&format!(
                "Asking {} for quotes containing \"{}\"...",
                source, term
            ))
        });

        self.finder.search(session, term).await;

        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
    }

    fn show(&self, session: &SearchSession) {
        println!("{}", self.view.render(session));
    }

    fn warn(&self, msg: &str) {
        if !self.quiet {
            eprintln!("{}", status_message(Status::Warning, msg, self.color));
        }
    }

    async fn interactive(&self, mut session: SearchSession) -> Result<()> {
        if !self.quiet {
            ui::print_banner();
        }
        self.show(&session);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        loop {
            stdout.write_all(b"> ").await?;
            stdout.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match ReplCommand::parse(&line) {
                Ok(ReplCommand::Search(term)) => {
                    self.search(&mut session, &term).await;
                    self.show(&session);
                }
                Ok(ReplCommand::Next) => {
                    if session.next_page() {
                        self.show(&session);
                    } else {
                        self.warn("Already on the last page");
                    }
                }
                Ok(ReplCommand::Prev) => {
                    if session.prev_page() {
                        self.show(&session);
                    } else {
                        self.warn("Already on the first page");
                    }
                }
                Ok(ReplCommand::Page(page)) => {
                    if session.set_page(page) {
                        self.show(&session);
                    } else {
                        self.warn(&format!("Page {} does not exist", page));
                    }
                }
                Ok(ReplCommand::Sort(key)) => {
                    session.set_sort(key);
                    self.show(&session);
                }
                Ok(ReplCommand::Help) => ui::print_help(),
                Ok(ReplCommand::Quit) => break,
                Ok(ReplCommand::Nothing) => {}
                Err(e) => self.warn(&e),
            }
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Show environment variables and exit if requested
    if cli.env {
        print_env_vars();
    }

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("quote_finder={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config_path = cli.config.clone().or_else(find_config_file);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }
    let mut config = load_config(config_path.as_deref()).context("failed to load configuration")?;
    if let Some(timeout) = cli.timeout {
        config.api.timeout_secs = timeout;
    }

    let format = match cli.output {
        Format::Auto if is_terminal() => OutputFormat::Table,
        Format::Auto | Format::Json => OutputFormat::Json,
        Format::Table => OutputFormat::Table,
        Format::Plain => OutputFormat::Plain,
    };
    let color = config.display.color && is_terminal();
    let quiet = cli.quiet;

    let app = |config: &config::Config| -> Result<App> {
        Ok(App {
            finder: QuoteFinder::from_config(config)
                .context("failed to set up the generation client")?,
            view: ResultsView::new(RenderOptions {
                format,
                color,
                width: terminal_width(),
            }),
            color,
            quiet,
        })
    };

    match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Search { term, sort, page } => {
            let app = app(&config)?;
            let sort = sort.map(SortKey::from).unwrap_or(config.display.default_sort);
            let mut session = SearchSession::with_sort(sort);

            app.search(&mut session, &term).await;

            if page != 1 && !session.set_page(page) {
                app.warn(&format!(
                    "Page {} does not exist (last page is {}), showing page 1",
                    page,
                    session.total_pages()
                ));
            }

            app.show(&session);
        }
        Commands::Interactive => {
            let app = app(&config)?;
            let session = SearchSession::with_sort(config.display.default_sort);
            app.interactive(session).await?;
        }
        Commands::Prompt { term } => {
            let payload = PromptBuilder::new().build(&term);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Commands::Config { action } => run_config_action(action, &config)?,
    }

    Ok(())
}

fn run_config_action(action: ConfigAction, config: &config::Config) -> Result<()> {
    match action {
        ConfigAction::Init { path, force } => {
            let path = path
                .or_else(user_config_path)
                .context("no config directory found; pass --path")?;

            if path.exists() && !force {
                anyhow::bail!("{} already exists (use --force to overwrite)", path.display());
            }

            ConfigFile::create_default().save(&path)?;
            eprintln!("Wrote default configuration to {}", path.display());
        }
        ConfigAction::Show => {
            let mut shown = ConfigFile {
                config: config.clone(),
            };
            if shown.config.api.key.is_some() {
                shown.config.api.key = Some("<redacted>".to_string());
            }
            print!("{}", shown.to_toml()?);
        }
        ConfigAction::Check { path } => {
            let path = path
                .or_else(find_config_file)
                .context("no config file found; pass a path")?;

            let file = ConfigFile::load(&path)
                .with_context(|| format!("invalid configuration in {}", path.display()))?;
            println!(
                "{}",
                status_message(
                    Status::Success,
                    &format!(
                        "{} is valid (model {}, {} attempts)",
                        path.display(),
                        file.config.api.model,
                        file.config.retry.max_attempts
                    ),
                    is_terminal()
                )
            );
        }
    }

    Ok(())
}
