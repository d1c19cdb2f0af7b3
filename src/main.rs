use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use revq::api::models::ProgrammingLanguage;

mod cmd;

#[derive(Parser)]
#[command(name = "revq")]
#[command(version, about = "AI-powered code review client")]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Service base URL. Overrides REVQ_API_URL and revq.toml.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Submit code for review
    Submit {
        /// File to review. Reads stdin when omitted.
        file: Option<PathBuf>,
        /// Language of the code. Inferred from the file extension when omitted.
        #[arg(short, long)]
        language: Option<ProgrammingLanguage>,
        /// Short description of what the code does
        #[arg(short, long)]
        description: Option<String>,
        /// Poll until the review finishes and print the feedback
        #[arg(short, long)]
        watch: bool,
    },
    /// Show a review by id
    Show { id: String },
    /// Poll an existing review until it finishes
    Watch { id: String },
    /// List review history
    List {
        #[arg(short, long, default_value = "1")]
        page: u32,
        #[arg(long, default_value = "10")]
        per_page: u32,
        /// Filter by language
        #[arg(short, long)]
        language: Option<ProgrammingLanguage>,
        /// Filter by status (pending, in_progress, completed, failed)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Delete a review
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
    /// Show aggregate statistics
    Stats {
        #[command(subcommand)]
        command: Option<StatsCommands>,
    },
    /// Export review history as CSV
    Export {
        /// Output file. Defaults to reviews_<range>.csv.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Start date, YYYY-MM-DD
        #[arg(long)]
        start: Option<String>,
        /// End date, YYYY-MM-DD
        #[arg(long)]
        end: Option<String>,
        /// Restrict to these languages (repeatable)
        #[arg(short, long)]
        language: Vec<ProgrammingLanguage>,
    },
    /// Check service health
    Health,
    /// Log in and store the session token
    Login {
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account
    Register,
    /// Discard the stored session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// View or validate configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand)]
pub enum StatsCommands {
    /// Condensed one-screen summary
    Summary,
    /// Per-language breakdown
    Languages,
    /// Daily activity and score distribution
    Trends,
    /// Most frequently reported issues
    Issues,
    /// Export statistics as CSV
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Write a default revq.toml
    Init,
    /// Validate configuration values
    Validate,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "revq=debug" } else { "revq=warn" };
    let filter = EnvFilter::try_from_env("REVQ_LOG").unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = cmd::Ctx::load(cli.api_url.clone())?;

    let result = match cli.command {
        Commands::Submit {
            file,
            language,
            description,
            watch,
        } => cmd::cmd_submit(&ctx, file.as_deref(), language, description, watch).await,
        Commands::Show { id } => cmd::cmd_show(&ctx, &id).await,
        Commands::Watch { id } => cmd::cmd_watch(&ctx, &id).await,
        Commands::List {
            page,
            per_page,
            language,
            status,
        } => cmd::cmd_list(&ctx, page, per_page, language, status.as_deref()).await,
        Commands::Delete { id, force } => cmd::cmd_delete(&ctx, &id, force).await,
        Commands::Stats { command } => cmd::cmd_stats(&ctx, command).await,
        Commands::Export {
            output,
            start,
            end,
            language,
        } => cmd::cmd_export(&ctx, output.as_deref(), start, end, language).await,
        Commands::Health => cmd::cmd_health(&ctx).await,
        Commands::Login { email } => cmd::cmd_login(&ctx, email).await,
        Commands::Register => cmd::cmd_register(&ctx).await,
        Commands::Logout => cmd::cmd_logout(&ctx).await,
        Commands::Whoami => cmd::cmd_whoami(&ctx).await,
        Commands::Config { command } => cmd::cmd_config(&ctx, command),
    };

    if let Err(err) = result {
        eprintln!("{} {}", console::style("Error:").red().bold(), err);
        std::process::exit(1);
    }
    Ok(())
}
