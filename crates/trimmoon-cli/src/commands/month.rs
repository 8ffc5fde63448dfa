use chrono::{Datelike, Local};
use clap::Args;
use trimmoon_core::{Config, MonthView};

use super::open_loader;

#[derive(Args)]
pub struct MonthArgs {
    /// Year (defaults to the current year)
    #[arg(long)]
    year: Option<i32>,
    /// Month 1-12 (defaults to the current month)
    #[arg(long)]
    month: Option<u32>,
    /// Print the month view as JSON
    #[arg(long)]
    json: bool,
}

pub fn run(args: MonthArgs) -> Result<(), Box<dyn std::error::Error>> {
    let today = Local::now().date_naive();
    let year = args.year.unwrap_or(today.year());
    let month = args.month.unwrap_or(today.month());

    let config = Config::load()?;
    let loader = open_loader(&config)?;
    let summary = loader.load_month(year, month)?;
    tracing::debug!(created = summary.created, "month records ready");

    let view = MonthView::build(loader.store(), year, month, &config.ui)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        print!("{}", view.render());
        println!("\n+ favorable   - unfavorable   . neutral");
    }
    Ok(())
}
