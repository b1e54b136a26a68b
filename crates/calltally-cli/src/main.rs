use anyhow::Result;
use calltally_cli::{commands, Context, OutputFormat, Overrides};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "calltally")]
#[command(author, version, about, long_about = None)]
#[command(
    about = "Look up the master on a dispatcher page and tally call outcomes",
    long_about = "Calltally reads the dispatcher page open in Chrome (or a saved copy), \
                  shows the master's full name and counts call outcomes from the first \
                  matching order onward."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "pretty")]
    format: OutputFormat,

    /// Chrome remote debugging port
    #[arg(long, global = true, env = "CALLTALLY_PORT")]
    port: Option<u16>,

    /// Settings file (default: ~/.calltally/config.json)
    #[arg(long, global = true, env = "CALLTALLY_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// JSON file mapping surnames to full names (default: bundled table)
    #[arg(long, global = true, value_name = "FILE")]
    names: Option<PathBuf>,

    /// File the last order numbers are kept in (default: ~/.calltally/session.json)
    #[arg(long, global = true, value_name = "FILE")]
    session_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive popup: master name plus call tallies on demand
    Popup {
        /// Read a saved HTML page instead of the active Chrome tab
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Open the popup window in Chrome as well
        #[arg(long, conflicts_with = "html")]
        window: bool,

        /// Launch Chrome with remote debugging first
        #[arg(long, conflicts_with = "html")]
        launch: bool,

        /// Page to open when launching Chrome
        #[arg(long, requires = "launch")]
        url: Option<String>,
    },

    /// Show the master's full name
    Name {
        /// Read a saved HTML page instead of the active Chrome tab
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },

    /// Tally call outcomes from the first matching order onward
    Tally {
        /// Order numbers separated by commas, e.g. 1001,1002
        #[arg(value_name = "ORDERS")]
        orders: String,

        /// Read a saved HTML page instead of the active Chrome tab
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// Do not remember these order numbers
        #[arg(long)]
        no_save: bool,
    },

    /// Inspect or change the remembered order numbers
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage the settings file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Launch Chrome with remote debugging enabled
    Chrome {
        /// Path to the Chrome binary
        #[arg(long, value_name = "PATH")]
        chrome_path: Option<PathBuf>,

        /// Page to open
        #[arg(long)]
        url: Option<String>,

        /// Named profile under ~/.calltally/profiles
        #[arg(long, conflicts_with = "temp")]
        profile: Option<String>,

        /// Use a throwaway profile and wait until Chrome closes
        #[arg(long)]
        temp: bool,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(long, value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
enum SessionCommands {
    /// Print the remembered order numbers
    Get,
    /// Remember order numbers for the next popup
    Set {
        #[arg(value_name = "ORDERS")]
        orders: String,
    },
    /// Forget the remembered order numbers
    Clear,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the effective settings
    Show,
    /// Write a settings file with the defaults
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print where the settings file lives
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    if let Commands::Completion { shell } = cli.command {
        return commands::completion::execute(shell, &mut Cli::command());
    }

    let overrides = Overrides {
        config: cli.config,
        port: cli.port,
        names: cli.names,
        session_file: cli.session_file,
    };
    let ctx = Context::load(overrides, cli.format)?;

    match cli.command {
        Commands::Popup {
            html,
            window,
            launch,
            url,
        } => {
            let _chrome = if launch {
                Some(commands::chrome::launch(&ctx, None, url, None, false)?)
            } else {
                None
            };
            commands::popup::execute(&ctx, html.as_deref(), window)
        }
        Commands::Name { html } => commands::name::execute(&ctx, html.as_deref()),
        Commands::Tally {
            orders,
            html,
            no_save,
        } => commands::tally::execute(&ctx, &orders, html.as_deref(), !no_save),
        Commands::Session { command } => match command {
            SessionCommands::Get => commands::session::get(&ctx),
            SessionCommands::Set { orders } => commands::session::set(&ctx, &orders),
            SessionCommands::Clear => commands::session::clear(&ctx),
        },
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config::show(&ctx),
            ConfigCommands::Init { force } => commands::config::init(&ctx, force),
            ConfigCommands::Path => commands::config::path(&ctx),
        },
        Commands::Chrome {
            chrome_path,
            url,
            profile,
            temp,
        } => commands::chrome::execute(&ctx, chrome_path, url, profile, temp),
        Commands::Completion { .. } => unreachable!("handled before loading settings"),
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("calltally=debug,calltally_cli=debug,calltally_core=debug,calltally_browser=debug")
    } else {
        EnvFilter::new("calltally=info,calltally_cli=info,calltally_core=warn,calltally_browser=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();
}
