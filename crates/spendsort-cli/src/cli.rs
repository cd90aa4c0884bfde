//! CLI argument definitions using clap
//!
//! The command implementations live in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spendsort - Learn transaction categories from your own history
#[derive(Parser)]
#[command(name = "spendsort")]
#[command(about = "Transaction auto-categorization from labeled history", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Categorizer config file (TOML)
    ///
    /// Defaults to <data dir>/spendsort/config/categorizer.toml when present,
    /// otherwise the built-in settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train on labeled transactions and print model statistics
    Train {
        /// Labeled transactions CSV (id,date,description,amount,category_id,user_id)
        #[arg(short, long)]
        transactions: PathBuf,

        /// Category catalog CSV (id,name,color)
        #[arg(short, long)]
        categories: PathBuf,

        /// Write the trained model to this JSON file
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },

    /// Predict the category of a description
    Predict {
        /// Transaction description to categorize
        description: String,

        /// Labeled transactions CSV to train on
        #[arg(short, long, required_unless_present = "snapshot", requires = "categories")]
        transactions: Option<PathBuf>,

        /// Category catalog CSV
        #[arg(short, long, required_unless_present = "snapshot", requires = "transactions")]
        categories: Option<PathBuf>,

        /// Load a previously saved model instead of training
        #[arg(short, long, conflicts_with_all = ["transactions", "categories"])]
        snapshot: Option<PathBuf>,

        /// Transaction date (YYYY-MM-DD) for the seasonal signal
        #[arg(short, long)]
        date: Option<String>,

        /// Print the prediction as JSON
        #[arg(long)]
        json: bool,
    },

    /// Train on a holdout split and report accuracy on the rest
    Evaluate {
        /// Labeled transactions CSV
        #[arg(short, long)]
        transactions: PathBuf,

        /// Category catalog CSV
        #[arg(short, long)]
        categories: PathBuf,

        /// Share of transactions used for training
        #[arg(long, default_value = "0.8")]
        train_ratio: f64,

        /// Seed for the deterministic shuffle
        #[arg(long, default_value = "spendsort")]
        seed: String,
    },

    /// Apply corrections, retrain, and compare accuracy before and after
    Feedback {
        /// Labeled transactions CSV
        #[arg(short, long)]
        transactions: PathBuf,

        /// Category catalog CSV
        #[arg(short, long)]
        categories: PathBuf,

        /// Corrections CSV (description,category_id,date)
        #[arg(long)]
        corrections: PathBuf,

        /// Write the retrained model to this JSON file
        #[arg(short, long)]
        snapshot: Option<PathBuf>,
    },
}
