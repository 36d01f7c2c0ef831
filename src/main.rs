use std::io;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use hometask::commands::*;
use hometask::config::Settings;
use hometask::filter::TaskFilter;
use hometask::storage::Store;

#[derive(Parser)]
#[command(name = "hometask")]
#[command(about = "Shared household chores with recurring due dates", long_about = None)]
struct Cli {
    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up the household and its admin
    Init {
        /// Household name (at least 3 characters)
        name: String,
        /// Admin's name
        #[arg(short, long)]
        admin: String,
        /// Admin's email address
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Show the household and its invite link
    Household {
        /// Base URL of the web app (overrides config)
        #[arg(short, long)]
        base_url: Option<String>,
    },
    /// Manage members
    Member {
        #[command(subcommand)]
        command: MemberCommands,
    },
    /// Manage categories
    Category {
        #[command(subcommand)]
        command: CategoryCommands,
    },
    /// Track money spent for the household
    Expense {
        #[command(subcommand)]
        command: ExpenseCommands,
    },
    /// Add a new task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// First due date in YYYY-MM-DD
        #[arg(short, long)]
        due: String,
        /// Repeat every N units
        #[arg(short = 'n', long)]
        every: Option<i32>,
        /// Recurrence unit (days, weeks, months, years)
        #[arg(short, long)]
        unit: Option<String>,
        /// Assignee (member name or id)
        #[arg(short, long)]
        assign: Option<String>,
        /// Category name
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List tasks
    List {
        /// all, mine, pending or completed
        #[arg(short, long, default_value = "all")]
        filter: String,
    },
    /// Mark a task as done
    Done {
        id: u64,
        /// Completion date in YYYY-MM-DD (defaults to today)
        #[arg(long)]
        on: Option<String>,
    },
    /// Clear a task's completion
    Undone {
        id: u64,
    },
    /// Edit a task
    Edit {
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        due: Option<String>,
        #[arg(short = 'n', long)]
        every: Option<i32>,
        #[arg(short, long)]
        unit: Option<String>,
        /// Stop repeating
        #[arg(long, conflicts_with_all = ["every", "unit"])]
        once: bool,
        /// Assignee (empty string to unassign)
        #[arg(short, long)]
        assign: Option<String>,
        /// Category (empty string to clear)
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Show the next due dates of a task
    Upcoming {
        id: u64,
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
    /// Reset the database (delete the household and all its records)
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
}

#[derive(Subcommand)]
enum MemberCommands {
    /// Add a member
    Add {
        name: String,
        #[arg(short, long)]
        email: Option<String>,
    },
    /// List members
    List,
    /// Remove a member (name or id)
    Remove {
        member: String,
    },
}

#[derive(Subcommand)]
enum CategoryCommands {
    /// Add a category
    Add {
        name: String,
        #[arg(short, long)]
        color: Option<String>,
    },
    /// List categories
    List,
    /// Remove a category
    Remove {
        name: String,
    },
}

#[derive(Subcommand)]
enum ExpenseCommands {
    /// Record an expense
    Add {
        title: String,
        #[arg(short, long)]
        amount: f64,
        /// Payer (member name or id, defaults to the current user)
        #[arg(short, long)]
        paid_by: Option<String>,
        /// Date in YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,
    },
    /// List expenses with their total
    List,
    /// Edit an expense
    Edit {
        id: u64,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        amount: Option<f64>,
        #[arg(short, long)]
        paid_by: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
    },
    /// Remove an expense
    Remove {
        id: u64,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "hometask=debug" } else { "hometask=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let settings = Settings::load().context("failed to load settings")?;
    let store = Store::new(settings.data_dir());
    let today = settings.clock().today();
    tracing::debug!(dir = %store.dir().display(), %today, "starting");

    match cli.command {
        Commands::Init { name, admin, email } => {
            cmd_init(&store, name, admin, email, false)?;
        }
        Commands::Household { base_url } => {
            cmd_household(&store, base_url.as_deref().unwrap_or(settings.base_url()))?
        }
        Commands::Member { command } => match command {
            MemberCommands::Add { name, email } => {
                cmd_member_add(&store, name, email, false)?;
            }
            MemberCommands::List => cmd_member_list(&store)?,
            MemberCommands::Remove { member } => cmd_member_remove(&store, member, false)?,
        },
        Commands::Category { command } => match command {
            CategoryCommands::Add { name, color } => cmd_category_add(&store, name, color, false)?,
            CategoryCommands::List => cmd_category_list(&store)?,
            CategoryCommands::Remove { name } => cmd_category_remove(&store, name, false)?,
        },
        Commands::Expense { command } => match command {
            ExpenseCommands::Add { title, amount, paid_by, date } => {
                let payer = paid_by
                    .or_else(|| settings.user.clone())
                    .context("no payer given; pass --paid-by or set HOMETASK_USER")?;
                cmd_expense_add(&store, title, amount, &payer, date, today, false)?;
            }
            ExpenseCommands::List => cmd_expense_list(&store)?,
            ExpenseCommands::Edit { id, title, amount, paid_by, date } => {
                let fields = ExpenseFields { title, amount, paid_by, date };
                cmd_expense_edit(&store, id, fields, false)?
            }
            ExpenseCommands::Remove { id } => cmd_expense_remove(&store, id, false)?,
        },
        Commands::Add { title, due, every, unit, assign, category } => {
            let fields = TaskFields { every, unit, assign, category, ..TaskFields::default() };
            cmd_add(&store, title, due, fields, false)?;
        }
        Commands::List { filter } => {
            cmd_list(&store, TaskFilter::parse(&filter), settings.user.as_deref(), today)?
        }
        Commands::Done { id, on } => {
            cmd_done(&store, id, on, today, false)?;
        }
        Commands::Undone { id } => cmd_undone(&store, id, false)?,
        Commands::Edit { id, title, due, every, unit, once, assign, category } => {
            let fields = TaskFields { title, due, every, unit, once, assign, category };
            cmd_edit(&store, id, fields, false)?
        }
        Commands::Remove { id } => cmd_remove(&store, id, false)?,
        Commands::Upcoming { id, count } => cmd_upcoming(&store, id, count, today)?,
        Commands::Reset { force } => cmd_reset(&store, force)?,
        Commands::Completions { shell } => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => anyhow::bail!("Unsupported shell: {}", shell),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "hometask", &mut io::stdout());
        }
    }
    Ok(())
}
