mod codegen;
mod commands;
mod config;
mod output;
mod provider;
mod stack;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::ConvertCommand;

#[derive(Parser)]
#[command(name = "stack2tf")]
#[command(about = "Convert a deployed CloudFormation stack into Terraform source and an import script", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate Terraform files and an import script from a stack snapshot
    Convert(ConvertCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(command) => command.execute(),
    }
}
