use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::Subcommand;
use trimmoon_core::reminder::{self, Reminder, LAST_REMINDER_KEY};
use trimmoon_core::{parse_date, Config, CoreError, DataLoader, MoonDb};

use super::open_loader;

#[derive(Subcommand)]
pub enum RemindAction {
    /// Check once whether today (or DATE) warrants a reminder
    Check {
        /// Date as YYYY-MM-DD (defaults to today)
        date: Option<String>,
    },
    /// Stay running and remind every day at the configured time
    Run,
    /// Print when the next reminder fires
    Next,
    /// Turn daily reminders on
    Enable,
    /// Turn daily reminders off
    Disable,
}

fn notify(reminder: &Reminder) {
    println!("{}: {}", reminder.title, reminder.body);
}

/// Load the day, decide, and return the reminder if one is due.
fn check_date(
    loader: &DataLoader<MoonDb>,
    date: NaiveDate,
) -> Result<Option<Reminder>, Box<dyn std::error::Error>> {
    loader.load_date(date)?;
    Ok(reminder::check_today(loader.store(), date)?)
}

/// Pause between retries after a failed check.
const RETRY_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, PartialEq)]
enum DayOutcome {
    /// Today's reminder was already handled.
    AlreadyHandled,
    /// Today was checked; the reminder, if the day is favorable.
    Checked(Option<Reminder>),
}

fn last_sent(db: &MoonDb) -> Result<Option<NaiveDate>, CoreError> {
    let Some(value) = db.kv_get(LAST_REMINDER_KEY)? else {
        return Ok(None);
    };
    match parse_date(&value) {
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            tracing::warn!("ignoring stored {LAST_REMINDER_KEY}: {e}");
            Ok(None)
        }
    }
}

/// Check `today` once. The day is only marked as handled after the check
/// succeeds, so a failed check is retried.
fn handle_day(
    loader: &DataLoader<MoonDb>,
    today: NaiveDate,
) -> Result<DayOutcome, Box<dyn std::error::Error>> {
    if !reminder::is_due(last_sent(loader.store())?, today) {
        return Ok(DayOutcome::AlreadyHandled);
    }

    let reminder = check_date(loader, today)?;
    loader
        .store()
        .kv_set(LAST_REMINDER_KEY, &trimmoon_core::date_key(today))?;
    Ok(DayOutcome::Checked(reminder))
}

/// Sleep for `delay`. Returns false if interrupted by Ctrl-C.
async fn sleep_or_stop(delay: Duration) -> bool {
    tokio::select! {
        _ = tokio::time::sleep(delay) => true,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("reminder loop stopped");
            false
        }
    }
}

async fn run_daily(
    config: Config,
    loader: DataLoader<MoonDb>,
) -> Result<(), Box<dyn std::error::Error>> {
    let at = config.reminder_time()?;

    loop {
        let now = Local::now().naive_local();
        tracing::info!(
            next = %reminder::next_reminder_at(now, at),
            "waiting for next reminder"
        );
        if !sleep_or_stop(reminder::delay_until_next(now, at)).await {
            return Ok(());
        }

        let today = Local::now().date_naive();
        loop {
            match handle_day(&loader, today) {
                Ok(DayOutcome::Checked(Some(reminder))) => {
                    notify(&reminder);
                    break;
                }
                Ok(DayOutcome::Checked(None)) => break,
                Ok(DayOutcome::AlreadyHandled) => {
                    // Woke up again on a day that was already handled.
                    if !sleep_or_stop(RETRY_DELAY).await {
                        return Ok(());
                    }
                    break;
                }
                Err(e) => {
                    tracing::warn!("reminder check failed for {today}, retrying: {e}");
                    if !sleep_or_stop(RETRY_DELAY).await {
                        return Ok(());
                    }
                }
            }
        }
    }
}

pub fn run(action: RemindAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        RemindAction::Check { date } => {
            let date = match date.as_deref() {
                Some(value) => parse_date(value)?,
                None => Local::now().date_naive(),
            };
            let config = Config::load()?;
            let loader = open_loader(&config)?;
            match check_date(&loader, date)? {
                Some(reminder) => notify(&reminder),
                None => println!("no reminder for {}", trimmoon_core::date_key(date)),
            }
        }
        RemindAction::Run => {
            let config = Config::load()?;
            if !config.reminders.enabled {
                return Err("reminders are disabled; run `trimmoon remind enable` first".into());
            }
            let loader = open_loader(&config)?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_daily(config, loader))?;
        }
        RemindAction::Next => {
            let config = Config::load()?;
            if !config.reminders.enabled {
                println!("reminders are disabled");
                return Ok(());
            }
            let next = reminder::next_reminder_at(Local::now().naive_local(), config.reminder_time()?);
            println!("{}", next.format("%Y-%m-%d %H:%M"));
        }
        RemindAction::Enable => {
            let mut config = Config::load()?;
            config.set("reminders.enabled", "true")?;
            println!("reminders enabled at {}", config.reminders.time);
        }
        RemindAction::Disable => {
            let mut config = Config::load()?;
            config.set("reminders.enabled", "false")?;
            println!("reminders disabled");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trimmoon_core::storage::CalendarConfig;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loader() -> DataLoader<MoonDb> {
        DataLoader::new(MoonDb::open_memory().unwrap(), CalendarConfig::default())
    }

    #[test]
    fn favorable_day_is_sent_once() {
        let loader = loader();
        let today = ymd(2025, 1, 8);

        match handle_day(&loader, today).unwrap() {
            DayOutcome::Checked(Some(reminder)) => assert_eq!(reminder.date, today),
            other => panic!("expected a reminder, got {other:?}"),
        }
        assert_eq!(last_sent(loader.store()).unwrap(), Some(today));
        assert_eq!(handle_day(&loader, today).unwrap(), DayOutcome::AlreadyHandled);
    }

    #[test]
    fn unfavorable_day_is_marked_handled() {
        let loader = loader();
        let today = ymd(2025, 1, 13);

        assert_eq!(handle_day(&loader, today).unwrap(), DayOutcome::Checked(None));
        assert_eq!(last_sent(loader.store()).unwrap(), Some(today));
    }

    #[test]
    fn failed_check_leaves_day_due() {
        let loader = loader();
        loader
            .store()
            .kv_set(LAST_REMINDER_KEY, "2060-01-01")
            .unwrap();
        // 2060 is outside the configured year range, so the load fails.
        let today = ymd(2060, 1, 2);

        assert!(handle_day(&loader, today).is_err());
        assert_eq!(last_sent(loader.store()).unwrap(), Some(ymd(2060, 1, 1)));
        assert!(reminder::is_due(last_sent(loader.store()).unwrap(), today));
    }

    #[test]
    fn unreadable_last_sent_counts_as_never() {
        let loader = loader();
        loader.store().kv_set(LAST_REMINDER_KEY, "yesterday").unwrap();

        assert_eq!(last_sent(loader.store()).unwrap(), None);
        assert_eq!(
            handle_day(&loader, ymd(2025, 1, 13)).unwrap(),
            DayOutcome::Checked(None)
        );
    }
}
