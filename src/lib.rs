//! # hometask
//!
//! A terminal task manager for a shared household. Members split chores,
//! chores repeat every few days, weeks, months or years, and the list always
//! shows which ones are due for the current period.
//!
//! ## Due dates of recurring tasks
//!
//! A recurring task has a first due date and a step (`every 2 weeks`). Its
//! occurrences are the first due date, then each previous occurrence plus one
//! step. Relative to today:
//!
//! *   **Last due date**: the latest occurrence on or before today.
//! *   **Next due date**: the earliest occurrence strictly after today.
//! *   **Done**: the last completion falls strictly after the last due date.
//!     Completing on the due date itself does not close the period.
//!
//! One-off tasks are done once completed after their due date.
//!
//! ## Usage
//!
//! ```bash
//! hometask init "Flat 4" --admin Sam --email sam@example.org
//! hometask member add Ana
//! hometask category add Kitchen
//! hometask add "Take out bins" --due 2025-11-03 --every 1 --unit weeks --assign Ana
//! hometask list --filter pending
//! hometask done 1
//! hometask upcoming 1 --count 5
//! hometask expense add "Groceries" --amount 42.80 --paid-by Ana
//! ```
//!
//! ## Data Storage
//!
//! Records are saved as JSON in your local data directory:
//! *   Linux: `~/.local/share/hometask/`
//! *   macOS: `~/Library/Application Support/hometask/`
//! *   Windows: `%APPDATA%\hometask\`
//!
//! Override it with `data_dir` in `config.toml` or the `HOMETASK_DB`
//! environment variable. `HOMETASK_USER` selects the member used by
//! `--filter mine`, `HOMETASK_TODAY` pins the current date.

pub mod clock;
pub mod commands;
pub mod config;
pub mod error;
pub mod expense;
pub mod filter;
pub mod household;
pub mod models;
pub mod recurrence;
pub mod storage;

pub use error::{HomeError, Result};
