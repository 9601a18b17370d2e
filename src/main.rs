mod config;
mod error;
mod launcher;
mod menu;
mod settings;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Generator, Shell};
use config::{LauncherConfig, Overrides};
use launcher::ExternalLauncher;
use menu::Controller;
use settings::SettingsFile;
use std::{io, path::PathBuf};

#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Path to a JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory holding input/, the environment and the LSVM script
    #[arg(short, long)]
    base_dir: Option<PathBuf>,
    /// Settings file, relative to the base directory
    #[arg(long)]
    settings_file: Option<PathBuf>,
    /// Python environment directory, relative to the base directory
    #[arg(long)]
    env_dir: Option<PathBuf>,
    /// Program to launch after saving the settings
    #[arg(long)]
    program: Option<String>,
    /// Exit right after the program finishes instead of waiting for Enter
    #[arg(long)]
    no_pause: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completion script
    Completion {
        /// The shell to generate the script for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completion { shell }) => {
            generate_completion_script(shell);
            Ok(())
        }
        None => run_menu(cli),
    }
}

fn run_menu(cli: Cli) -> Result<()> {
    let config = LauncherConfig::resolve(
        cli.config.as_deref(),
        Overrides {
            base_dir: cli.base_dir,
            settings_file: cli.settings_file,
            env_dir: cli.env_dir,
            program: cli.program,
            no_pause: cli.no_pause,
        },
    )?;
    log::debug!("configuration: {:?}", config);

    let settings = SettingsFile::new(config.settings_path());
    let pause = config.pause;
    let stdin = io::stdin();
    let stdout = io::stdout();

    let mut controller = Controller::new(
        stdin.lock(),
        stdout.lock(),
        ExternalLauncher::new(config),
        settings,
        pause,
    );
    controller.run().context("menu aborted")?;
    Ok(())
}

fn generate_completion_script<G: Generator>(gen: G) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(gen, &mut cmd, name, &mut io::stdout());
}
