//! CLI host for the Rolltrack roll statistics tracker.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "rt",
    about = "Rolltrack: per-user d20 roll statistics",
    version,
    propagate_version = true
)]
struct Cli {
    /// Directory holding per-user flag files
    #[arg(short, long, global = true, default_value = ".")]
    dir: PathBuf,

    /// JSON tracker configuration (defaults apply when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Who is running the command.
#[derive(Args, Clone, Debug)]
pub struct Identity {
    /// Act as this user (default: the target user)
    #[arg(long = "as", value_name = "USER")]
    pub acting: Option<String>,

    /// The acting user is the GM
    #[arg(long)]
    pub gm: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a roll made by a user
    Record {
        /// User who made the roll
        user: String,

        /// Dice results, e.g. `d20:5,17` or `d6:3`; bare numbers are d20s
        #[arg(required = true)]
        dice: Vec<String>,

        /// The roll was blind
        #[arg(short, long)]
        blind: bool,

        /// The roll content is hidden from the recording user
        #[arg(long)]
        hidden: bool,

        /// System-specific context tag, e.g. `dnd5e.roll.type=attack`
        #[arg(short, long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,

        /// Chat message id
        #[arg(short, long, default_value = "cli")]
        message: String,

        /// The rolling user is a GM (with --as; otherwise --gm applies)
        #[arg(long)]
        roller_gm: bool,

        #[command(flatten)]
        identity: Identity,
    },

    /// Roll d20s for a user and record the results
    Roll {
        /// User making the roll
        user: String,

        /// Number of d20s to roll
        #[arg(short = 'n', long, default_value = "1")]
        count: u32,

        /// RNG seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,

        /// The roll was blind
        #[arg(short, long)]
        blind: bool,

        /// The rolling user is a GM (with --as; otherwise --gm applies)
        #[arg(long)]
        roller_gm: bool,

        /// System-specific context tag, e.g. `dnd5e.roll.type=attack`
        #[arg(short, long = "tag", value_name = "KEY=VALUE")]
        tags: Vec<String>,

        #[command(flatten)]
        identity: Identity,
    },

    /// Show a user's histogram and statistics
    Show {
        /// User whose statistics to show
        user: String,

        /// Print the raw persisted snapshot as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        identity: Identity,
    },

    /// Remove all of a user's statistics
    Clear {
        /// User whose statistics to clear
        user: String,

        #[command(flatten)]
        identity: Identity,
    },

    /// Print a shareable summary of a user's statistics
    Summary {
        /// User to summarise
        user: String,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,

        #[command(flatten)]
        identity: Identity,
    },

    /// Compare statistics across users (acts as the GM unless --as is given)
    Compare {
        /// Users to compare (default: everyone with statistics)
        users: Vec<String>,

        #[command(flatten)]
        identity: Identity,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match commands::Context::load(&cli.dir, cli.config.as_deref()) {
        Ok(ctx) => match cli.command {
            Commands::Record {
                user,
                dice,
                blind,
                hidden,
                tags,
                message,
                roller_gm,
                identity,
            } => {
                let opts = commands::record::RecordOptions {
                    blind,
                    content_visible: !hidden,
                    tags: &tags,
                    message: &message,
                    roller_gm,
                };
                commands::record::run(&ctx, &identity, &user, &dice, opts).await
            }
            Commands::Roll {
                user,
                count,
                seed,
                blind,
                roller_gm,
                tags,
                identity,
            } => {
                let opts = commands::roll::RollOptions {
                    count,
                    seed,
                    blind,
                    roller_gm,
                    tags: &tags,
                };
                commands::roll::run(&ctx, &identity, &user, opts).await
            }
            Commands::Show {
                user,
                json,
                identity,
            } => commands::show::run(&ctx, &identity, &user, json).await,
            Commands::Clear { user, identity } => {
                commands::clear::run(&ctx, &identity, &user).await
            }
            Commands::Summary {
                user,
                json,
                identity,
            } => commands::summary::run(&ctx, &identity, &user, json).await,
            Commands::Compare { users, identity } => {
                commands::compare::run(&ctx, &identity, &users).await
            }
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
