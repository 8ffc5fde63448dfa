use chrono::Local;
use clap::Args;
use trimmoon_core::{calendar, parse_date, Config};

use super::open_loader;

#[derive(Args)]
pub struct DayArgs {
    /// Date as YYYY-MM-DD (defaults to today)
    date: Option<String>,
    /// Print the record and score breakdown as JSON
    #[arg(long)]
    json: bool,
    /// Show each rule's contribution to the score
    #[arg(long)]
    explain: bool,
}

pub fn run(args: DayArgs) -> Result<(), Box<dyn std::error::Error>> {
    let date = match args.date.as_deref() {
        Some(value) => parse_date(value)?,
        None => Local::now().date_naive(),
    };

    let config = Config::load()?;
    let loader = open_loader(&config)?;
    let (record, _) = loader.load_date(date)?;
    let breakdown = record.breakdown();

    if args.json {
        let json = serde_json::json!({
            "record": record,
            "breakdown": breakdown,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("{}", calendar::day_info(&record));
    if args.explain {
        println!();
        println!("Sign:      {:+}", breakdown.sign);
        println!("Phase:     {:+}", breakdown.phase);
        println!("Lunar day: {:+}", breakdown.lunar_day);
        println!("Weekday:   {:+}", breakdown.weekday);
        println!("Total:     {:+}", breakdown.total);
    }
    Ok(())
}
