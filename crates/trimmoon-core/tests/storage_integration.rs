//! End-to-end tests over an on-disk database.

use chrono::NaiveDate;
use tempfile::TempDir;
use trimmoon_core::storage::CalendarConfig;
use trimmoon_core::{
    check_today, DataLoader, DayAstroRecord, DayStatus, MonthView, MoonDb, RecordStore,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("trimmoon.db");

    {
        let db = MoonDb::open_at(&path).unwrap();
        let loader = DataLoader::new(&db, CalendarConfig::default());
        let summary = loader.load_month(2025, 1).unwrap();
        assert_eq!(summary.created, 31);
    }

    let db = MoonDb::open_at(&path).unwrap();
    assert_eq!(db.count().unwrap(), 31);
    let stored = db.get(ymd(2025, 1, 8)).unwrap().unwrap();
    assert_eq!(stored, DayAstroRecord::compute(ymd(2025, 1, 8)));
}

#[test]
fn year_load_then_month_view() {
    let db = MoonDb::open_memory().unwrap();
    let loader = DataLoader::new(&db, CalendarConfig::default());
    loader.load_year(2025, None).unwrap();

    let view = MonthView::build(&db, 2025, 1, &Default::default()).unwrap();
    assert_eq!(view.records.len(), 31);
    for record in &view.records {
        assert_eq!(record.status(), DayAstroRecord::compute(record.date()).status());
    }
    let favorable = view
        .records
        .iter()
        .filter(|r| r.status() == DayStatus::Favorable)
        .count();
    assert_eq!(favorable, view.favorable_days.len());
}

#[test]
fn reminder_reads_stored_status() {
    let db = MoonDb::open_memory().unwrap();
    let loader = DataLoader::new(&db, CalendarConfig::default());
    let (record, _) = loader.load_date(ymd(2025, 1, 9)).unwrap();
    assert_eq!(record.status(), DayStatus::Favorable);

    let reminder = check_today(&db, ymd(2025, 1, 9)).unwrap();
    assert!(reminder.is_some());
    assert!(check_today(&db, ymd(2025, 1, 10)).unwrap().is_none());
}
