use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use crm_jobs::{
    config::{CrmConfig, DatabaseConfig},
    db::DbPool,
    jobs, observability,
    project::resolve_project_root,
    seed,
};

/// CLI arguments for the CRM jobs
#[derive(Parser, Debug)]
#[command(version, about = "Scheduled maintenance jobs for the CRM database", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (defaults to ./crm.toml, then ~/.config/crm-jobs/crm.toml,
    /// otherwise built-in defaults)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Delete customers with no orders in the inactivity window (default)
    Cleanup {
        /// Count inactive customers without deleting or logging
        #[arg(long)]
        dry_run: bool,
        /// Days without an order after which a customer is inactive
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,
    },
    /// Log orders placed in the lookback window
    Reminders {
        /// Lookback window in days
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        days: Option<u32>,
    },
    /// Log total customers, orders and revenue
    Report,
    /// Increase the stock of products below the threshold
    Restock {
        /// Products with stock strictly below this are restocked
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        threshold: Option<i64>,
        /// Amount added to each low-stock product
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
        increment_by: Option<i64>,
        /// Report what would change without updating or logging
        #[arg(long)]
        dry_run: bool,
    },
    /// Populate the database with demo customers, products and orders
    Seed {
        /// Delete existing customers, orders and products first
        #[arg(long)]
        reset: bool,
    },
    /// Run database migrations and exit
    Migrate,
}

fn exit_with_error(message: impl std::fmt::Display) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = Args::parse();

    let (mut config, config_path) = match CrmConfig::load(args.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => exit_with_error(e),
    };

    if let Err(e) = observability::init_tracing(&config.observability) {
        exit_with_error(e);
    }

    match &config_path {
        Some(path) => tracing::debug!(config_file = %path.display(), "Loaded configuration"),
        None => tracing::debug!("No config file found, using defaults"),
    }

    let command = args.command.unwrap_or(Command::Cleanup {
        dry_run: false,
        days: None,
    });
    apply_overrides(&mut config, &command);

    // Nothing may touch the database or the logs outside the project root
    let root = match resolve_project_root(&config.project.root) {
        Ok(root) => root,
        Err(e) => {
            tracing::error!(error = %e, "Project directory unavailable");
            exit_with_error(e);
        }
    };
    config.resolve_paths(&root);

    let db = connect(&config.database).await;

    if matches!(command, Command::Migrate) {
        if let Err(e) = db.run_migrations().await {
            tracing::error!(error = %e, "Database migrations failed");
            exit_with_error(format!("Database migrations failed: {}", e));
        }
        db.close().await;
        return;
    }

    if config.database.run_migrations()
        && let Err(e) = db.run_migrations().await
    {
        tracing::error!(error = %e, "Database migrations failed");
        exit_with_error(format!("Database migrations failed: {}", e));
    }

    let outcome = run_command(&db, &config, command).await;
    db.close().await;

    if let Err(message) = outcome {
        exit_with_error(message);
    }
}

/// Fold command-line flags into the loaded configuration.
fn apply_overrides(config: &mut CrmConfig, command: &Command) {
    match *command {
        Command::Cleanup { dry_run, days } => {
            config.cleanup.dry_run |= dry_run;
            if let Some(days) = days {
                config.cleanup.inactive_days = days;
            }
        }
        Command::Reminders { days } => {
            if let Some(days) = days {
                config.reminders.lookback_days = days;
            }
        }
        Command::Restock {
            threshold,
            increment_by,
            dry_run,
        } => {
            config.restock.dry_run |= dry_run;
            if let Some(threshold) = threshold {
                config.restock.threshold = threshold;
            }
            if let Some(increment_by) = increment_by {
                config.restock.increment_by = increment_by;
            }
        }
        Command::Report | Command::Seed { .. } | Command::Migrate => {}
    }
}

async fn connect(database: &DatabaseConfig) -> DbPool {
    if database.is_none() {
        exit_with_error("Database is not configured");
    }

    match DbPool::from_config(database).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            exit_with_error(format!("Failed to connect to database: {}", e));
        }
    }
}

async fn run_command(db: &DbPool, config: &CrmConfig, command: Command) -> Result<(), String> {
    let now = Utc::now();

    match command {
        Command::Cleanup { .. } => {
            let result = jobs::run_cleanup(db.customers().as_ref(), &config.cleanup, now)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Inactive customer cleanup failed");
                    e.to_string()
                })?;
            if result.dry_run {
                println!(
                    "Dry run: Would delete {} inactive customers",
                    result.customers_deleted
                );
            }
        }
        Command::Reminders { .. } => {
            jobs::run_reminders(db.orders().as_ref(), &config.reminders, now)
                .await
                .map_err(|e| e.to_string())?;
            println!("Order reminders processed!");
        }
        Command::Report => {
            jobs::run_report(db.customers().as_ref(), db.orders().as_ref(), &config.report)
                .await
                .map_err(|e| e.to_string())?;
        }
        Command::Restock { .. } => {
            let result = jobs::run_restock(db.products().as_ref(), &config.restock, now)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Low-stock restock failed");
                    format!("Error updating low-stock products: {}", e)
                })?;
            println!("{}", result.summary());
        }
        Command::Seed { reset } => {
            println!("Seeding database...");
            let summary = seed::seed_database(db, reset)
                .await
                .map_err(|e| e.to_string())?;
            println!("Created {} customers", summary.customers);
            println!("Created {} products", summary.products);
            println!("Created {} orders", summary.orders);
            println!("Database seeded successfully!");
        }
        Command::Migrate => {}
    }

    Ok(())
}
