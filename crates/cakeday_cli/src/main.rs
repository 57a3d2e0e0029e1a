//! Command-line host for the cake day scheduler.
//!
//! # Responsibility
//! - Resolve configuration from flags and `CAKEDAY_*` environment variables.
//! - Open the database and hand work to `CakeDayService`.
//! - Render results for humans or as JSON.

use anyhow::{Context, Result};
use cakeday_core::db::open_db;
use cakeday_core::{
    default_log_level, init_logging, CakeDayService, Celebration, SqliteCelebrationRepository,
    SqlitePersonRepository,
};
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

const DEFAULT_DB_FILE_NAME: &str = "cakeday.sqlite3";

#[derive(Parser)]
#[command(name = "cakeday")]
#[command(version = cakeday_core::core_version())]
#[command(about = "Schedule office cake days from a list of birthdays")]
struct Cli {
    /// SQLite database holding the people directory and cake calendar
    #[arg(long, global = true, env = "CAKEDAY_DB", default_value = DEFAULT_DB_FILE_NAME)]
    db: PathBuf,

    /// Target year (defaults to the current year)
    #[arg(long, global = true, env = "CAKEDAY_YEAR")]
    year: Option<i32>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long, global = true, env = "CAKEDAY_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "CAKEDAY_LOG_DIR")]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import people from a csv/txt/xlsx file and recompute the year's cake days
    Upload {
        /// Headerless `name,date_of_birth` rows; dates as YYYY-MM-DD, YYYY/MM/DD,
        /// DD.MM.YYYY, DD/MM/YYYY, "July 15, 1992" or "15 July 1992"
        file: PathBuf,
    },
    /// Show the stored cake days for the year
    Show {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Recompute the year's cake days from the stored directory
    Refresh,
    /// List everyone in the directory
    People,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, &log_dir.to_string_lossy()).map_err(anyhow::Error::msg)?;
    }

    let year = cli.year.unwrap_or_else(|| Local::now().year());
    let conn = open_db(&cli.db)
        .with_context(|| format!("failed to open database `{}`", cli.db.display()))?;
    let service = CakeDayService::new(
        SqlitePersonRepository::try_new(&conn)?,
        SqliteCelebrationRepository::try_new(&conn)?,
    );

    match cli.command {
        Commands::Upload { file } => {
            let summary = service
                .process_upload(&file, year)
                .with_context(|| format!("failed to process `{}`", file.display()))?;
            info!(
                "event=cli_upload module=cli status=ok year={} celebrations={}",
                year,
                summary.celebrations.len()
            );
            println!(
                "Read {} row(s), added {} new person(s).",
                summary.rows_read, summary.people_added
            );
            print_table(year, &summary.celebrations);
        }
        Commands::Show { json } => {
            let celebrations = service.celebrations_for_year(year)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&celebrations)?);
            } else {
                print_table(year, &celebrations);
            }
        }
        Commands::Refresh => {
            let celebrations = service.refresh_year(year)?;
            print_table(year, &celebrations);
        }
        Commands::People => {
            for person in service.list_people()? {
                println!("{}  {}", person.date_of_birth, person.name);
            }
        }
    }

    Ok(())
}

fn print_table(year: i32, celebrations: &[Celebration]) {
    if celebrations.is_empty() {
        println!("No cake days stored for {year}.");
        return;
    }

    println!("Cake days for {year}:");
    for celebration in celebrations {
        println!(
            "  {} {:<5}  {}",
            celebration.date.format("%a %Y-%m-%d"),
            celebration.size,
            celebration.attendees.join(", ")
        );
    }
}
