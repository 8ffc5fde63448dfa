//! # Trimmoon Core Library
//!
//! Lunar calendar logic for picking favorable days: a moon-data estimator,
//! a rule-based day scorer, and a write-once, date-keyed record store. The
//! `trimmoon` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Lunar**: mean-element moon estimate (phase, illumination, lunar day,
//!   zodiac sign) from Julian-day arithmetic
//! - **Scoring**: additive rules over sign, phase, lunar day and weekday
//! - **Storage**: SQLite record store and TOML configuration
//! - **Loader**: fills the store for dates, months and years on demand
//! - **Reminder**: daily favorable-day notification decision
//!
//! ## Key Components
//!
//! - [`estimate`]: moon data for a date
//! - [`score`]: favorability of a day
//! - [`DayAstroRecord`]: the persisted per-date record
//! - [`RecordStore`]: storage seam, implemented by [`MoonDb`] and [`MemoryStore`]
//! - [`DataLoader`]: get-or-compute over a store

pub mod calendar;
pub mod error;
pub mod loader;
pub mod lunar;
pub mod record;
pub mod reminder;
pub mod scoring;
pub mod storage;

pub use calendar::{day_info, MonthView};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use loader::{DataLoader, LoadSummary};
pub use lunar::{estimate, MoonEstimate, MoonPhase, ZodiacSign};
pub use record::{date_key, parse_date, DayAstroRecord};
pub use reminder::{check_today, next_reminder_at, Reminder};
pub use scoring::{explain, score, DayStatus, ScoreBreakdown, ScoreInput};
pub use storage::{Config, MemoryStore, MoonDb, RecordStore};
