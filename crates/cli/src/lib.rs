pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use commands::assistant::AssistantOptions;
use commands::recommend::RecommendArgs;

#[derive(Debug, Parser)]
#[command(
    name = "soundrush",
    about = "SoundRush equipment advisor CLI",
    long_about = "Size sound-system rentals from event answers, classify delivery zones, and operate the quote draft store.",
    after_help = "Examples:\n  soundrush recommend --event-type wedding --guests 80-150 --venue outdoor\n  soundrush zone 93200\n  soundrush assistant --save\n  soundrush doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Recommend an equipment bundle and an indicative estimate from answers")]
    Recommend(RecommendArgs),
    #[command(about = "Classify a postal code into a delivery zone")]
    Zone {
        #[arg(help = "Postal code to classify")]
        postal_code: String,
    },
    #[command(about = "Walk through the questionnaire interactively")]
    Assistant {
        #[arg(long, help = "Save the result as a quote draft")]
        save: bool,
    },
    #[command(about = "Apply pending database migrations and return structured status output")]
    Migrate,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config, the recommendation engine, and DB connectivity")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Recommend(args) => commands::recommend::run(args),
        Command::Zone { postal_code } => commands::zone::run(&postal_code),
        Command::Assistant { save } => commands::assistant::run(AssistantOptions { save }),
        Command::Migrate => commands::migrate::run(),
        Command::Config => commands::config::run(),
        Command::Doctor { json } => {
            let report = commands::doctor::run(json);
            commands::CommandResult {
                exit_code: if report.passed { 0 } else { 1 },
                output: report.output,
            }
        }
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
