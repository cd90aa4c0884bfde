//! Spendsort CLI - Transaction auto-categorization
//!
//! Usage:
//!   spendsort train -t tx.csv -c categories.csv          Train and show model stats
//!   spendsort predict -t tx.csv -c categories.csv "..."  Categorize a description
//!   spendsort evaluate -t tx.csv -c categories.csv       Holdout accuracy report
//!   spendsort feedback -t tx.csv -c categories.csv --corrections fixes.csv

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Train {
            transactions,
            categories,
            snapshot,
        } => commands::cmd_train(config, &transactions, &categories, snapshot.as_deref()),
        Commands::Predict {
            description,
            transactions,
            categories,
            snapshot,
            date,
            json,
        } => {
            let source = match (snapshot, transactions, categories) {
                (Some(path), _, _) => commands::ModelSource::Snapshot(path),
                (None, Some(transactions), Some(categories)) => commands::ModelSource::Training {
                    transactions,
                    categories,
                },
                _ => anyhow::bail!("Provide --snapshot or both --transactions and --categories"),
            };
            commands::cmd_predict(config, &source, &description, date.as_deref(), json)
        }
        Commands::Evaluate {
            transactions,
            categories,
            train_ratio,
            seed,
        } => commands::cmd_evaluate(config, &transactions, &categories, train_ratio, &seed),
        Commands::Feedback {
            transactions,
            categories,
            corrections,
            snapshot,
        } => commands::cmd_feedback(
            config,
            &transactions,
            &categories,
            &corrections,
            snapshot.as_deref(),
        ),
    }
}
