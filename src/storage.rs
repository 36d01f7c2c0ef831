use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{HomeError, Result};
use crate::models::{Category, Expense, Household, Member, Task};

const TASKS_FILE: &str = "tasks.json";
const MEMBERS_FILE: &str = "members.json";
const CATEGORIES_FILE: &str = "categories.json";
const HOUSEHOLD_FILE: &str = "household.json";
const EXPENSES_FILE: &str = "expenses.json";

/// JSON files for one household, all kept in a single directory.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    pub fn new(dir: impl Into<PathBuf>) -> Store {
        Store { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Reads a JSON file; a missing file yields `None`.
    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>> {
        let path = self.path(file);
        let raw = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(HomeError::Io { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| HomeError::Json { path, source })
    }

    /// Overwrites a JSON file, creating the directory on first use.
    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|source| HomeError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.path(file);
        let s = serde_json::to_string_pretty(value).map_err(|source| HomeError::Json {
            path: path.clone(),
            source,
        })?;
        let mut f = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| HomeError::Io { path: path.clone(), source })?;
        f.write_all(s.as_bytes())
            .map_err(|source| HomeError::Io { path: path.clone(), source })?;
        debug!(path = %path.display(), "saved");
        Ok(())
    }

    /// Loads all tasks. Returns an empty vector if the file does not exist.
    pub fn load_tasks(&self) -> Result<Vec<Task>> {
        Ok(self.read(TASKS_FILE)?.unwrap_or_default())
    }

    pub fn save_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.write(TASKS_FILE, tasks)
    }

    /// Loads a single task by its ID.
    pub fn load_task(&self, id: u64) -> Result<Option<Task>> {
        Ok(self.load_tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Saves or updates a single task.
    ///
    /// If a task with the same ID exists it is replaced; otherwise the task is appended.
    pub fn save_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.load_tasks()?;
        match tasks.iter_mut().find(|t| t.id == task.id) {
            Some(t) => *t = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.save_tasks(&tasks)
    }

    pub fn load_members(&self) -> Result<Vec<Member>> {
        Ok(self.read(MEMBERS_FILE)?.unwrap_or_default())
    }

    pub fn save_members(&self, members: &[Member]) -> Result<()> {
        self.write(MEMBERS_FILE, members)
    }

    pub fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(self.read(CATEGORIES_FILE)?.unwrap_or_default())
    }

    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.write(CATEGORIES_FILE, categories)
    }

    pub fn load_expenses(&self) -> Result<Vec<Expense>> {
        Ok(self.read(EXPENSES_FILE)?.unwrap_or_default())
    }

    pub fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.write(EXPENSES_FILE, expenses)
    }

    pub fn load_household(&self) -> Result<Option<Household>> {
        self.read(HOUSEHOLD_FILE)
    }

    pub fn save_household(&self, household: &Household) -> Result<()> {
        self.write(HOUSEHOLD_FILE, household)
    }

    /// Deletes every data file of the household.
    pub fn delete_all(&self) -> Result<()> {
        for file in [TASKS_FILE, MEMBERS_FILE, CATEGORIES_FILE, EXPENSES_FILE, HOUSEHOLD_FILE] {
            let path = self.path(file);
            match fs::remove_file(&path) {
                Ok(()) => info!(path = %path.display(), "removed"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(source) => return Err(HomeError::Io { path, source }),
            }
        }
        Ok(())
    }
}
