//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use hbt_core::config;

mod commands;

#[derive(Parser)]
#[command(name = "hbt")]
#[command(version)]
#[command(about = "Habit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Log in and store the session token
    Login {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        /// Account username
        #[arg(short, long)]
        username: String,

        /// Account email
        #[arg(short, long)]
        email: String,

        /// Account password (prompted if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Log out (clear the stored session token)
    Logout,

    /// Show session status
    Whoami,

    /// Manage habits
    Habits {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Show aggregate stats and the global streak
    Stats,

    /// Show an AI-generated insight about your habits
    Insights,

    /// Chat with the AI assistant
    Chat {
        /// Message to send (omit with --history to list past messages)
        #[arg(value_name = "MESSAGE", required_unless_present = "history")]
        message: Option<String>,

        /// Show the chat history instead of sending a message
        #[arg(long, conflicts_with = "message")]
        history: bool,
    },

    /// Generate habit suggestions from a goal
    Suggest {
        /// What you want to work on
        #[arg(value_name = "QUERY")]
        query: String,

        /// Create the Nth suggestion (1-based) as a habit
        #[arg(long, value_name = "N")]
        add: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum HabitCommands {
    /// List habits
    List,
    /// Create a habit
    Add {
        /// Habit title
        #[arg(value_name = "TITLE")]
        title: String,

        /// Optional description (truncated to 160 characters)
        #[arg(short, long)]
        description: Option<String>,

        /// Frequency: daily, weekly, or monthly
        #[arg(short, long, default_value = "daily")]
        frequency: String,

        /// Completions per period
        #[arg(short, long, default_value_t = 1)]
        target: u32,
    },
    /// Edit a habit
    Edit {
        /// The ID of the habit to edit
        #[arg(value_name = "HABIT_ID")]
        id: String,

        /// New title
        #[arg(long)]
        title: Option<String>,

        /// New description
        #[arg(short, long)]
        description: Option<String>,

        /// New frequency: daily, weekly, or monthly
        #[arg(short, long)]
        frequency: Option<String>,

        /// New completions per period
        #[arg(short, long)]
        target: Option<u32>,
    },
    /// Delete a habit (asks for confirmation)
    Rm {
        /// The ID of the habit to delete
        #[arg(value_name = "HABIT_ID")]
        id: String,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Complete a habit for today
    Done {
        /// The ID of the habit to complete
        #[arg(value_name = "HABIT_ID")]
        id: String,

        /// Optional note attached to the completion
        #[arg(long)]
        notes: Option<String>,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Set the API base URL
    SetUrl {
        /// The base URL, e.g. https://habits.example.com
        #[arg(value_name = "URL")]
        url: String,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("HBT_LOG").unwrap_or_else(|_| "hbt=warn".into()),
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // one tokio runtime for everything
    let rt = tokio::runtime::Runtime::new().context("create tokio runtime")?;

    rt.block_on(async move { dispatch(cli).await })
}

async fn dispatch(cli: Cli) -> Result<()> {
    let config = config::Config::load().context("load config")?;

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&config, &username, password.as_deref()).await
        }
        Commands::Register {
            username,
            email,
            password,
        } => commands::auth::register(&config, &username, &email, password.as_deref()).await,
        Commands::Logout => commands::auth::logout(),
        Commands::Whoami => commands::auth::whoami(&config).await,

        Commands::Habits { command } => match command {
            HabitCommands::List => commands::habits::list(&config).await,
            HabitCommands::Add {
                title,
                description,
                frequency,
                target,
            } => {
                commands::habits::add(&config, &title, description.as_deref(), &frequency, target)
                    .await
            }
            HabitCommands::Edit {
                id,
                title,
                description,
                frequency,
                target,
            } => {
                commands::habits::edit(
                    &config,
                    &id,
                    commands::habits::EditArgs {
                        title,
                        description,
                        frequency,
                        target,
                    },
                )
                .await
            }
            HabitCommands::Rm { id, yes } => commands::habits::rm(&config, &id, yes).await,
            HabitCommands::Done { id, notes } => {
                commands::habits::done(&config, &id, notes.as_deref()).await
            }
        },

        Commands::Stats => commands::stats::show(&config).await,
        Commands::Insights => commands::ai::insights(&config).await,
        Commands::Chat { message, history } => {
            if history {
                commands::ai::chat_history(&config).await
            } else {
                // clap guarantees a message when --history is absent
                let message = message.context("message required")?;
                commands::ai::chat(&config, &message).await
            }
        }
        Commands::Suggest { query, add } => commands::ai::suggest(&config, &query, add).await,

        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
            ConfigCommands::SetUrl { url } => commands::config::set_url(&url),
        },
    }
}
