use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand, ValueHint};

use hyperchat::auth;
use hyperchat::commands::run::{self, RunConfig};
use hyperchat::utils::get_data_dir;

#[derive(Parser, Debug)]
#[command(
    name = "hyperchat",
    version,
    about = "Send a file of questions to the Hyperbolic chat API, one at a time.",
    long_about = None,
    propagate_version = true,
    disable_help_subcommand = true
)]
struct Cli {
    /// Path to the newline-delimited questions file
    #[arg(
        value_name = "PATH",
        default_value = "questions.txt",
        value_hint = ValueHint::FilePath
    )]
    questions: PathBuf,
    /// Seed the question shuffle and delay sampling for reproducible runs
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the stored API key
    Key {
        /// Store a new API key in the local config file
        #[arg(long, value_name = "KEY", conflicts_with = "clear")]
        set: Option<String>,
        /// Remove the stored API key from the local config file
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("{:?}", err);
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config_path = get_data_dir()?.join(auth::CONFIG_FILE_NAME);

    match cli.command {
        Some(Command::Key { set, clear }) => handle_key_command(&config_path, set, clear)?,
        None => {
            let mut config = RunConfig::new(cli.questions, config_path);
            config.seed = cli.seed;
            run::run(&config).await?;
        }
    }

    Ok(())
}

fn handle_key_command(config_path: &Path, set: Option<String>, clear: bool) -> Result<()> {
    let mut action_taken = false;

    if let Some(key) = set {
        auth::store_api_key(config_path, &key)?;
        println!("Stored the API key in the local config file.");
        action_taken = true;
    }

    if clear {
        let removed = auth::clear_api_key(config_path)?;
        if removed {
            println!("Removed the stored API key.");
        } else {
            println!("No API key found in the config file.");
        }
        action_taken = true;
    }

    if !action_taken {
        bail!("No action provided. Use --set or --clear.");
    }
    Ok(())
}
