use std::io::{self, Write};

use chrono::{NaiveDate, Utc};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{HomeError, Result};
use crate::expense::{is_expense_mutable, total};
use crate::filter::{filter_tasks, TaskFilter};
use crate::household::{
    household_initials, invite_url, is_valid_email, is_valid_household_name, is_valid_member_name,
};
use crate::models::{parse_date, Category, Expense, Household, Member, RecurrenceUnit, Task};
use crate::recurrence::{
    current_due_date, get_last_due_date, get_next_due_date_after_today, task_status, RecurrenceRule,
    Schedule, TaskStatus,
};
use crate::storage::Store;

/// Optional task fields shared by `add` and `edit`.
#[derive(Debug, Clone, Default)]
pub struct TaskFields {
    pub title: Option<String>,
    /// Due date in `YYYY-MM-DD`.
    pub due: Option<String>,
    /// Repeat every N units.
    pub every: Option<i32>,
    pub unit: Option<String>,
    /// Turn a recurring task back into a one-off.
    pub once: bool,
    /// Member id or name.
    pub assign: Option<String>,
    pub category: Option<String>,
}

fn parse_due(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| HomeError::InvalidDate(raw.to_string()))
}

/// Finds a member by id, or by case-insensitive name.
pub fn resolve_member<'a>(members: &'a [Member], key: &str) -> Option<&'a Member> {
    members
        .iter()
        .find(|m| m.id == key)
        .or_else(|| members.iter().find(|m| m.name.eq_ignore_ascii_case(key.trim())))
}

fn member_id(store: &Store, key: &str) -> Result<String> {
    let members = store.load_members()?;
    resolve_member(&members, key)
        .map(|m| m.id.clone())
        .ok_or_else(|| HomeError::NotFound(format!("Member '{}'", key)))
}

fn check_category(store: &Store, name: &str) -> Result<()> {
    if store.load_categories()?.iter().any(|c| c.name == name) {
        Ok(())
    } else {
        Err(HomeError::NotFound(format!("Category '{}'", name)))
    }
}

fn new_member(name: String, email: Option<String>) -> Result<Member> {
    if !is_valid_member_name(&name) {
        return Err(HomeError::Validation(format!(
            "member name '{}' must be at least 3 characters",
            name
        )));
    }
    if let Some(e) = &email {
        if !is_valid_email(e) {
            return Err(HomeError::Validation(format!("'{}' is not a valid email address", e)));
        }
    }
    Ok(Member {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        email: email.map(|e| e.trim().to_string()),
    })
}

/// Creates the household and its admin member.
pub fn cmd_init(store: &Store, name: String, admin: String, email: Option<String>, silent: bool) -> Result<Household> {
    if let Some(existing) = store.load_household()? {
        return Err(HomeError::HouseholdExists(existing.name));
    }
    if !is_valid_household_name(&name) {
        return Err(HomeError::Validation(format!(
            "household name '{}' must be at least 3 characters",
            name
        )));
    }
    let admin = new_member(admin, email)?;
    let household = Household {
        id: Uuid::new_v4().to_string(),
        name: name.trim().to_string(),
        admin: admin.id.clone(),
        image: None,
    };

    let mut members = store.load_members()?;
    members.push(admin.clone());
    store.save_members(&members)?;
    store.save_household(&household)?;
    info!(household = %household.id, "household created");

    if !silent {
        println!(
            "Household '{}' [{}] created with admin {}.",
            household.name,
            household_initials(&household.name),
            admin.name
        );
        println!("Run `hometask household` to get the invite link.");
    }
    Ok(household)
}

/// Prints the household with its invite link.
pub fn cmd_household(store: &Store, base_url: &str) -> Result<()> {
    let household = store.load_household()?.ok_or(HomeError::NoHousehold)?;
    let members = store.load_members()?;
    let admin = resolve_member(&members, &household.admin)
        .map(|m| m.name.as_str())
        .unwrap_or("-");
    println!("{} [{}]", household.name, household_initials(&household.name));
    println!("Admin:   {}", admin);
    println!("Members: {}", members.len());
    println!("Invite:  {}", invite_url(base_url, &household.id));
    Ok(())
}

pub fn cmd_member_add(store: &Store, name: String, email: Option<String>, silent: bool) -> Result<Member> {
    let member = new_member(name, email)?;
    let mut members = store.load_members()?;
    if members.iter().any(|m| m.name.eq_ignore_ascii_case(&member.name)) {
        return Err(HomeError::Validation(format!("member '{}' already exists", member.name)));
    }
    members.push(member.clone());
    store.save_members(&members)?;
    if !silent {
        println!("Member '{}' added (id = {}).", member.name, member.id);
    }
    Ok(member)
}

pub fn cmd_member_list(store: &Store) -> Result<()> {
    let members = store.load_members()?;
    if members.is_empty() {
        println!("No members found.");
        return Ok(());
    }
    let admin = store.load_household()?.map(|h| h.admin);
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Name", "Email", "Role", "ID"]);
    for m in members {
        let role = if admin.as_deref() == Some(m.id.as_str()) { "admin" } else { "member" };
        table.add_row(vec![m.name, m.email.unwrap_or_else(|| "-".into()), role.to_string(), m.id]);
    }
    println!("{table}");
    Ok(())
}

/// Removes a member and unassigns their tasks.
pub fn cmd_member_remove(store: &Store, key: String, silent: bool) -> Result<()> {
    let mut members = store.load_members()?;
    let id = resolve_member(&members, &key)
        .map(|m| m.id.clone())
        .ok_or_else(|| HomeError::NotFound(format!("Member '{}'", key)))?;
    if store.load_household()?.is_some_and(|h| h.admin == id) {
        return Err(HomeError::Validation("the household admin cannot be removed".into()));
    }
    if store.load_expenses()?.iter().any(|e| e.paid_by == id) {
        return Err(HomeError::Validation(format!(
            "member '{}' still has expenses; remove them first",
            key
        )));
    }

    // unassign first so no task is left pointing at a missing member
    let mut tasks = store.load_tasks()?;
    let mut updated = false;
    for t in tasks.iter_mut() {
        if t.assigned_to.as_deref() == Some(id.as_str()) {
            t.assigned_to = None;
            updated = true;
        }
    }
    if updated {
        store.save_tasks(&tasks)?;
    }
    members.retain(|m| m.id != id);
    store.save_members(&members)?;
    if !silent {
        println!("Member '{}' removed.", key);
    }
    Ok(())
}

pub fn cmd_category_add(store: &Store, name: String, color: Option<String>, silent: bool) -> Result<()> {
    let name = name.trim().to_string();
    if name.is_empty() {
        return Err(HomeError::Validation("category name must not be empty".into()));
    }
    let mut categories = store.load_categories()?;
    if categories.iter().any(|c| c.name == name) {
        return Err(HomeError::Validation(format!("category '{}' already exists", name)));
    }
    categories.push(Category { name: name.clone(), color });
    store.save_categories(&categories)?;
    if !silent {
        println!("Category '{}' added.", name);
    }
    Ok(())
}

pub fn cmd_category_list(store: &Store) -> Result<()> {
    let categories = store.load_categories()?;
    if categories.is_empty() {
        println!("No categories found.");
        return Ok(());
    }
    let tasks = store.load_tasks()?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Name", "Color", "Tasks"]);
    for c in categories {
        let count = tasks.iter().filter(|t| t.category.as_deref() == Some(c.name.as_str())).count();
        table.add_row(vec![c.name, c.color.unwrap_or_else(|| "-".into()), count.to_string()]);
    }
    println!("{table}");
    Ok(())
}

/// Removes a category and clears it from the tasks filed under it.
pub fn cmd_category_remove(store: &Store, name: String, silent: bool) -> Result<()> {
    let mut categories = store.load_categories()?;
    let len_before = categories.len();
    categories.retain(|c| c.name != name);
    if categories.len() == len_before {
        return Err(HomeError::NotFound(format!("Category '{}'", name)));
    }
    store.save_categories(&categories)?;

    let mut tasks = store.load_tasks()?;
    let mut updated = false;
    for t in tasks.iter_mut() {
        if t.category.as_ref() == Some(&name) {
            t.category = None;
            updated = true;
        }
    }
    if updated {
        store.save_tasks(&tasks)?;
    }
    if !silent {
        println!("Category '{}' removed.", name);
    }
    Ok(())
}

/// Adds a new task and returns its id.
///
/// `every` without `unit` repeats in days.
pub fn cmd_add(store: &Store, title: String, due: String, fields: TaskFields, silent: bool) -> Result<u64> {
    let due_date = parse_due(&due)?;
    let mut tasks = store.load_tasks()?;
    let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
    let mut task = Task {
        id: next_id,
        title,
        due_date: Some(due_date),
        recurring: false,
        recurrence_unit: None,
        recurrence_interval: None,
        done: None,
        assigned_to: None,
        category: None,
        created_at: Utc::now().to_rfc3339(),
    };
    apply_recurrence(&mut task, fields.every, fields.unit.as_deref())?;
    if let Some(key) = &fields.assign {
        task.assigned_to = Some(member_id(store, key)?);
    }
    if let Some(name) = fields.category {
        check_category(store, &name)?;
        task.category = Some(name);
    }
    tasks.push(task);
    store.save_tasks(&tasks)?;
    debug!(id = next_id, "task added");
    if !silent {
        println!("Task added (id = {})", next_id);
    }
    Ok(next_id)
}

fn apply_recurrence(task: &mut Task, every: Option<i32>, unit: Option<&str>) -> Result<()> {
    if every.is_none() && unit.is_none() {
        return Ok(());
    }
    let interval = every.unwrap_or(1);
    if interval <= 0 {
        return Err(HomeError::Validation("--every must be a positive number".into()));
    }
    let unit = unit.map(RecurrenceUnit::parse_lenient).unwrap_or(RecurrenceUnit::Days);
    if let RecurrenceUnit::Unknown(u) = &unit {
        return Err(HomeError::Validation(format!(
            "unknown unit '{}'. Supported: days, weeks, months, years.",
            u
        )));
    }
    task.recurring = true;
    task.recurrence_interval = Some(interval);
    task.recurrence_unit = Some(unit);
    Ok(())
}

/// Edits an existing task's details.
pub fn cmd_edit(store: &Store, id: u64, fields: TaskFields, silent: bool) -> Result<()> {
    let mut tasks = store.load_tasks()?;
    let Some(t) = tasks.iter_mut().find(|t| t.id == id) else {
        return Err(HomeError::NotFound(format!("Task {}", id)));
    };
    if let Some(title) = fields.title {
        t.title = title;
    }
    if let Some(d) = &fields.due {
        t.due_date = Some(parse_due(d)?);
    }
    if fields.once {
        t.recurring = false;
        t.recurrence_unit = None;
        t.recurrence_interval = None;
    } else {
        // keep the current unit when only the interval changes, and vice versa
        let unit = fields.unit.clone().or_else(|| {
            fields.every.and(t.recurrence_unit.as_ref().map(|u| u.as_str().to_string()))
        });
        let every = fields.every.or(fields.unit.as_ref().and(t.recurrence_interval));
        apply_recurrence(t, every, unit.as_deref())?;
    }
    if let Some(key) = &fields.assign {
        t.assigned_to = if key.is_empty() { None } else { Some(member_id(store, key)?) };
    }
    if let Some(name) = fields.category {
        if name.is_empty() {
            t.category = None;
        } else {
            check_category(store, &name)?;
            t.category = Some(name);
        }
    }
    store.save_tasks(&tasks)?;
    if !silent {
        println!("Task {} updated.", id);
    }
    Ok(())
}

/// Removes a task from the database by ID.
pub fn cmd_remove(store: &Store, id: u64, silent: bool) -> Result<()> {
    let mut tasks = store.load_tasks()?;
    let len_before = tasks.len();
    tasks.retain(|t| t.id != id);
    if tasks.len() == len_before {
        return Err(HomeError::NotFound(format!("Task {}", id)));
    }
    store.save_tasks(&tasks)?;
    if !silent {
        println!("Task {} removed.", id);
    }
    Ok(())
}

/// Records a completion on `on` (today by default).
pub fn cmd_done(store: &Store, id: u64, on: Option<String>, today: NaiveDate, silent: bool) -> Result<TaskStatus> {
    let done = match on {
        Some(raw) => parse_due(&raw)?,
        None => today,
    };
    let mut task = store
        .load_task(id)?
        .ok_or_else(|| HomeError::NotFound(format!("Task {}", id)))?;
    task.done = Some(done);
    store.save_task(&task)?;
    let status = task_status(&task, today);
    if status != TaskStatus::Done {
        // a completion only counts once it falls after the open occurrence
        warn!(id, %done, "completion does not close the current period yet");
    }
    if !silent {
        println!("Task {} marked done on {} ({}).", id, done, status.label());
    }
    Ok(status)
}

/// Clears the completion date of a task.
pub fn cmd_undone(store: &Store, id: u64, silent: bool) -> Result<()> {
    let mut task = store
        .load_task(id)?
        .ok_or_else(|| HomeError::NotFound(format!("Task {}", id)))?;
    task.done = None;
    store.save_task(&task)?;
    if !silent {
        println!("Task {} marked not done.", id);
    }
    Ok(())
}

/// Next `count` occurrences of a recurring task after today.
pub fn upcoming(task: &Task, count: usize, today: NaiveDate) -> Vec<NaiveDate> {
    match task.schedule() {
        // restarting at the next occurrence continues the same stepwise sequence
        Schedule::Recurring(rule) => rule
            .first_after(today)
            .and_then(|next| RecurrenceRule::new(next, rule.unit().clone(), rule.interval()))
            .map(|from_next| from_next.occurrences().take(count).collect())
            .unwrap_or_default(),
        Schedule::Once(due) if due > today => std::iter::once(due).take(count).collect(),
        _ => Vec::new(),
    }
}

pub fn cmd_upcoming(store: &Store, id: u64, count: usize, today: NaiveDate) -> Result<()> {
    let task = store
        .load_task(id)?
        .ok_or_else(|| HomeError::NotFound(format!("Task {}", id)))?;
    let dates = upcoming(&task, count, today);
    if dates.is_empty() {
        println!("Task {} has no upcoming due dates.", id);
        return Ok(());
    }
    println!("{} ({}):", task.title, task.recurrence_label());
    for d in dates {
        println!("  {}  (in {}d)", d, (d - today).num_days());
    }
    Ok(())
}

/// Tasks matching `filter`, ordered by the date they are listed under.
pub fn list_tasks(tasks: &[Task], filter: TaskFilter, user: Option<&str>, today: NaiveDate) -> Vec<Task> {
    let mut selected: Vec<Task> = filter_tasks(tasks, filter, user, today).into_iter().cloned().collect();
    selected.sort_by_key(|t| (current_due_date(t, today).unwrap_or(NaiveDate::MAX), t.id));
    selected
}

/// Lists tasks in a formatted table.
pub fn cmd_list(store: &Store, filter: TaskFilter, user: Option<&str>, today: NaiveDate) -> Result<()> {
    let members = store.load_members()?;
    let user_id = user.map(|u| resolve_member(&members, u).map_or(u, |m| m.id.as_str()));
    if filter == TaskFilter::AssignedToMe && user_id.is_none() {
        warn!("no current user configured; set HOMETASK_USER or `user` in config.toml");
    }
    let tasks = list_tasks(&store.load_tasks()?, filter, user_id, today);
    if tasks.is_empty() {
        println!("No tasks found.");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Assignee").add_attribute(Attribute::Bold),
            Cell::new("Repeats").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Last due").add_attribute(Attribute::Bold),
            Cell::new("Next due").add_attribute(Attribute::Bold),
            Cell::new("Done").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let fmt_date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
    for t in tasks {
        let status = task_status(&t, today);
        let status_color = match status {
            TaskStatus::Done => Color::Green,
            TaskStatus::Overdue => Color::Red,
            TaskStatus::Pending => Color::Yellow,
            TaskStatus::Upcoming => Color::Grey,
        };
        let assignee = t
            .assigned_to
            .as_deref()
            .map(|id| resolve_member(&members, id).map_or(id, |m| m.name.as_str()))
            .unwrap_or("-");

        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(t.category.as_deref().unwrap_or("-")),
            Cell::new(assignee),
            Cell::new(t.recurrence_label()),
            Cell::new(fmt_date(current_due_date(&t, today))),
            Cell::new(fmt_date(get_last_due_date(&t, today))),
            Cell::new(fmt_date(get_next_due_date_after_today(&t, today))),
            Cell::new(fmt_date(t.done)),
            Cell::new(status.label()).fg(status_color),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Optional expense fields for `expense edit`.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFields {
    pub title: Option<String>,
    pub amount: Option<f64>,
    /// Member id or name.
    pub paid_by: Option<String>,
    /// Date in `YYYY-MM-DD`.
    pub date: Option<String>,
}

fn check_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(HomeError::Validation("expense title must not be empty".into()));
    }
    Ok(title.to_string())
}

fn check_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(HomeError::Validation(format!("amount {} must be a positive number", amount)));
    }
    Ok(amount)
}

/// Records money paid by a member and returns the expense id.
pub fn cmd_expense_add(
    store: &Store,
    title: String,
    amount: f64,
    paid_by: &str,
    date: Option<String>,
    today: NaiveDate,
    silent: bool,
) -> Result<u64> {
    let title = check_title(&title)?;
    let amount = check_amount(amount)?;
    let paid_by = member_id(store, paid_by)?;
    let date = match date {
        Some(raw) => parse_due(&raw)?,
        None => today,
    };
    let mut expenses = store.load_expenses()?;
    let next_id = expenses.iter().map(|e| e.id).max().unwrap_or(0) + 1;
    expenses.push(Expense { id: next_id, title, amount, paid_by, date });
    store.save_expenses(&expenses)?;
    debug!(id = next_id, amount, "expense added");
    if !silent {
        println!("Expense added (id = {})", next_id);
    }
    Ok(next_id)
}

pub fn cmd_expense_list(store: &Store) -> Result<()> {
    let mut expenses = store.load_expenses()?;
    if expenses.is_empty() {
        println!("No expenses found.");
        return Ok(());
    }
    expenses.sort_by_key(|e| (e.date, e.id));
    let members = store.load_members()?;
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["ID", "Date", "Title", "Paid by", "Amount"]);
    for e in &expenses {
        let payer = resolve_member(&members, &e.paid_by).map_or(e.paid_by.as_str(), |m| m.name.as_str());
        table.add_row(vec![
            Cell::new(e.id),
            Cell::new(e.date),
            Cell::new(&e.title),
            Cell::new(payer),
            Cell::new(format!("{:.2}", e.amount)),
        ]);
    }
    println!("{table}");
    println!("Total: {:.2}", total(&expenses));
    Ok(())
}

/// Edits an expense that is still open.
pub fn cmd_expense_edit(store: &Store, id: u64, fields: ExpenseFields, silent: bool) -> Result<()> {
    let mut expenses = store.load_expenses()?;
    let Some(e) = expenses.iter_mut().find(|e| e.id == id) else {
        return Err(HomeError::NotFound(format!("Expense {}", id)));
    };
    if !is_expense_mutable(e) {
        return Err(HomeError::Locked(format!("Expense {}", id)));
    }
    if let Some(title) = &fields.title {
        e.title = check_title(title)?;
    }
    if let Some(amount) = fields.amount {
        e.amount = check_amount(amount)?;
    }
    if let Some(key) = &fields.paid_by {
        e.paid_by = member_id(store, key)?;
    }
    if let Some(raw) = &fields.date {
        e.date = parse_due(raw)?;
    }
    store.save_expenses(&expenses)?;
    if !silent {
        println!("Expense {} updated.", id);
    }
    Ok(())
}

pub fn cmd_expense_remove(store: &Store, id: u64, silent: bool) -> Result<()> {
    let mut expenses = store.load_expenses()?;
    let Some(pos) = expenses.iter().position(|e| e.id == id) else {
        return Err(HomeError::NotFound(format!("Expense {}", id)));
    };
    if !is_expense_mutable(&expenses[pos]) {
        return Err(HomeError::Locked(format!("Expense {}", id)));
    }
    expenses.remove(pos);
    store.save_expenses(&expenses)?;
    if !silent {
        println!("Expense {} removed.", id);
    }
    Ok(())
}

/// Resets the database by deleting every household file.
pub fn cmd_reset(store: &Store, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete the household, members, categories, tasks and expenses? This cannot be undone. [y/N] ");
        io::stdout()
            .flush()
            .map_err(|source| HomeError::Io { path: "<stdout>".into(), source })?;
        let mut input = String::new();
        io::stdin()
            .read_line(&mut input)
            .map_err(|source| HomeError::Io { path: "<stdin>".into(), source })?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    store.delete_all()?;
    println!("Database reset successfully.");
    Ok(())
}
