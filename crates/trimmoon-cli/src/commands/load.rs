use chrono::NaiveDate;
use clap::Subcommand;
use trimmoon_core::{parse_date, Config, LoadSummary};

use super::open_loader;

#[derive(Subcommand)]
pub enum LoadAction {
    /// Fill every day of a year
    Year {
        year: i32,
        /// Stop after this many new records (overrides loader.batch_limit)
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Fill every day of a month
    Month { year: i32, month: u32 },
    /// Fill a single day
    Date {
        /// Date as YYYY-MM-DD
        date: String,
    },
}

pub fn run(action: LoadAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let loader = open_loader(&config)?;

    let summary = match action {
        LoadAction::Year { year, limit } => {
            loader.load_year(year, limit.or(config.loader.batch_limit))?
        }
        LoadAction::Month { year, month } => loader.load_month(year, month)?,
        LoadAction::Date { date } => {
            let date: NaiveDate = parse_date(&date)?;
            let (_, created) = loader.load_date(date)?;
            LoadSummary {
                created: u32::from(created),
                skipped: u32::from(!created),
                truncated: false,
            }
        }
    };

    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
