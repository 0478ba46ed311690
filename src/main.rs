use std::path::PathBuf;

use clap::{Parser, Subcommand};

use duet::cli;

#[derive(Parser)]
#[command(name = "duet")]
#[command(about = "Daily bonding activity companion for two partners")]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up both partner profiles
    Setup {
        /// Data directory (default: ~/.config/duet/)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Check in a partner's mood (slot a or b; happy, tired, neutral, stress, calm)
    Mood {
        /// Partner slot: a or b
        slot: String,
        /// Mood label
        mood: String,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Generate today's bonding activity and record how it went
    Today {
        /// Override the generation model
        #[arg(short, long)]
        model: Option<String>,
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show past moments, most recent first
    History {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Show profiles, current moods, and history size
    Status {
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let result = match args.command {
        Commands::Setup { data_dir } => cli::handle_setup(data_dir).await,
        Commands::Mood {
            slot,
            mood,
            data_dir,
        } => cli::handle_mood(slot, mood, data_dir).await,
        Commands::Today { model, data_dir } => cli::handle_today(model, data_dir).await,
        Commands::History { data_dir } => cli::handle_history(data_dir).await,
        Commands::Status { data_dir } => cli::handle_status(data_dir).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}
