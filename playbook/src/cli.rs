// playbook/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use playbook_core::application::ArtifactKind;
use playbook_core::infrastructure::adapters::sample::DEFAULT_SEED;

#[derive(Parser)]
#[command(name = "playbook")]
#[command(about = "Data Strategy Playbook: data quality scoring and session state", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🔍 Scores a dataset on the five quality dimensions
    Analyze {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[command(flatten)]
        input: DataArgs,

        #[command(flatten)]
        rules: RuleOverrides,

        /// Persist the session (rules included) after the analysis
        #[arg(long, default_value = "false")]
        save_rules: bool,
    },

    /// 📊 Prints a quick profile of a dataset
    Profile {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[command(flatten)]
        input: DataArgs,
    },

    /// 🧪 Writes the synthetic sales dataset to a CSV file
    Sample {
        /// Destination file
        #[arg(long)]
        out: PathBuf,

        #[arg(long, default_value_t = DEFAULT_SEED)]
        seed: u64,
    },

    /// 💾 Inspects or modifies the saved session
    State {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        #[command(subcommand)]
        action: StateAction,
    },

    /// 📦 Builds a downloadable artifact from the session
    Export {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,

        /// roadmap | raci | maturity-history | quality-report | summary
        #[arg(long)]
        artifact: ArtifactKind,

        /// Destination file (defaults to the artifact's own name)
        #[arg(long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        input: DataArgs,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateAction {
    /// Shows a summary of the saved session
    Show,
    /// Overwrites the saved session with defaults
    Reset,
    /// Records the current maturity scores in the assessment history
    RecordMaturity,
}

/// Where the dataset comes from.
#[derive(Args, Debug, Clone)]
pub struct DataArgs {
    /// CSV, TSV, Parquet or XLSX file
    #[arg(long, conflicts_with = "sample")]
    pub data: Option<PathBuf>,

    /// Use the built-in synthetic sales dataset
    #[arg(long, default_value = "false")]
    pub sample: bool,

    /// Seed of the synthetic dataset
    #[arg(long, default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// Per-run changes to the session's rule configuration.
#[derive(Args, Debug, Clone, Default)]
pub struct RuleOverrides {
    /// Columns checked for completeness (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub completeness_cols: Option<Vec<String>>,

    #[arg(long)]
    pub uniqueness_col: Option<String>,

    #[arg(long)]
    pub timeliness_col: Option<String>,

    /// Maximum age in days of a timely record
    #[arg(long)]
    pub timeliness_days: Option<i64>,

    #[arg(long)]
    pub validity_col: Option<String>,

    /// Condition on the validity column (ex: ">= 0")
    #[arg(long, allow_hyphen_values = true)]
    pub validity_condition: Option<String>,

    #[arg(long)]
    pub consistency_col: Option<String>,

    #[arg(long, requires = "consistency_max", allow_negative_numbers = true)]
    pub consistency_min: Option<f64>,

    #[arg(long, requires = "consistency_min", allow_negative_numbers = true)]
    pub consistency_max: Option<f64>,
}
