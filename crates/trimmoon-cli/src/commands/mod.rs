pub mod config;
pub mod day;
pub mod load;
pub mod month;
pub mod remind;

use trimmoon_core::{Config, DataLoader, MoonDb};

/// Open the database and a loader bounded by the configured year range.
pub fn open_loader(config: &Config) -> Result<DataLoader<MoonDb>, Box<dyn std::error::Error>> {
    let db = MoonDb::open()?;
    Ok(DataLoader::new(db, config.calendar.clone()))
}
