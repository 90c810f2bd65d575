// playbook/src/main.rs

mod cli;
mod commands;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug playbook analyze ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: DATA QUALITY ANALYSIS ---
        Commands::Analyze {
            project_dir,
            input,
            rules,
            save_rules,
        } => commands::analyze::execute(&project_dir, &input, &rules, save_rules)?,

        // --- USE CASE: PROFILING ---
        Commands::Profile { project_dir, input } => {
            commands::profile::execute(&project_dir, &input)?
        }

        // --- USE CASE: SYNTHETIC DATASET ---
        Commands::Sample { out, seed } => commands::sample::execute(&out, seed)?,

        // --- USE CASE: SESSION STATE ---
        Commands::State {
            project_dir,
            action,
        } => commands::state::execute(&project_dir, action)?,

        // --- USE CASE: ARTIFACT EXPORT ---
        Commands::Export {
            project_dir,
            artifact,
            out,
            input,
        } => commands::export::execute(&project_dir, artifact, out, &input)?,
    }

    Ok(())
}
