//! Command-line front end over [`BudgetManager`].

use std::{
    env,
    error::Error,
    io::{self, IsTerminal},
    path::PathBuf,
    sync::Arc,
};

use chrono::Weekday;
use colored::Colorize;
use dialoguer::Confirm;
use thiserror::Error;
use uuid::Uuid;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{AlertDelivery, AlertResponse, BudgetStatus},
        BudgetManager, DashboardSnapshot,
    },
    currency::AmountFormatter,
    domain::{Displayable, Identifiable, Label, NamedEntity},
    notify::OutboxNotifier,
    storage::JsonFileStore,
    time::SystemClock,
    utils::build_info,
};

/// Overrides the interactive alert prompt with `send` or `cancel`.
pub const ALERT_RESPONSE_ENV: &str = "BUDGET_BUDDY_ALERT_RESPONSE";

const USAGE: &str = "Usage: budget_buddy_cli <command>\n\
Commands:\n  \
dashboard                          show today, remaining budget, and totals\n  \
list                               list entries grouped by recency\n  \
add <amount> <label> [comment...]  record an entry (label: a, b, c, income)\n  \
remove <id|name>                   delete an entry\n  \
settings [<label> <limit> [email...]]  show or replace budget settings\n  \
config [currency <symbol> | week-start <day> | outbox <dir>]\n  \
version                            print build information\n  \
help                               print this message";

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0} (run `help` for usage)")]
    Usage(String),
}

type CliResult = Result<(), Box<dyn Error>>;

/// Runs one command. `args` excludes the program name.
pub fn run_cli<I>(args: I) -> CliResult
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let command = args.next().unwrap_or_else(|| "dashboard".to_string());
    let rest: Vec<String> = args.collect();

    match command.as_str() {
        "help" | "--help" | "-h" => {
            println!("{USAGE}");
            Ok(())
        }
        "version" | "--version" | "-V" => {
            println!("{}", build_info::current().summary());
            Ok(())
        }
        "config" => run_config(&rest),
        "dashboard" => {
            let session = Session::open()?;
            print_dashboard(&session.manager.snapshot(), session.manager.formatter());
            Ok(())
        }
        "list" => {
            let session = Session::open()?;
            print_list(&session.manager.snapshot(), session.manager.formatter());
            Ok(())
        }
        "add" => run_add(&rest),
        "remove" | "rm" => run_remove(&rest),
        "settings" => run_settings(&rest),
        other => Err(CliError::Usage(format!("unknown command `{other}`")).into()),
    }
}

struct Session {
    manager: BudgetManager,
}

impl Session {
    fn open() -> Result<Self, Box<dyn Error>> {
        let config_manager = ConfigManager::new()?;
        let config = config_manager.load()?;
        let storage = JsonFileStore::new(config_manager.store_dir())?;
        let notifier = OutboxNotifier::new(config_manager.outbox_dir(&config));
        let manager = BudgetManager::open(
            Arc::new(storage),
            Box::new(SystemClock),
            Box::new(notifier),
        )
        .with_config(&config);
        Ok(Self { manager })
    }
}

fn run_add(args: &[String]) -> CliResult {
    let (amount, label) = match args {
        [amount, label, ..] => (amount, label),
        _ => return Err(CliError::Usage("add needs <amount> <label>".into()).into()),
    };
    let label: Label = label.parse()?;
    let comment = args[2..].join(" ");

    let mut session = Session::open()?;
    let Some(snapshot) = session.manager.submit_entry(amount, label, &comment)? else {
        return Ok(());
    };
    if let Some(entry) = session.manager.ledger().entries().last() {
        println!("Added {} ({})", entry.display_label(), entry.id);
    }
    print_budget_line(&snapshot.budget, session.manager.formatter());
    resolve_alert(&mut session.manager)
}

fn run_remove(args: &[String]) -> CliResult {
    let Some(target) = args.first() else {
        return Err(CliError::Usage("remove needs an entry id or name".into()).into());
    };
    let mut session = Session::open()?;
    let id = match target.parse::<Uuid>() {
        Ok(id) => id,
        Err(_) => {
            let wanted = args.join(" ");
            session
                .manager
                .ledger()
                .entries()
                .iter()
                .find(|entry| entry.name() == wanted)
                .map(Identifiable::id)
                .ok_or_else(|| CliError::Usage(format!("no entry named `{wanted}`")))?
        }
    };
    let snapshot = session.manager.remove_entry(id)?;
    println!("Removed {id}");
    print_budget_line(&snapshot.budget, session.manager.formatter());
    resolve_alert(&mut session.manager)
}

fn run_settings(args: &[String]) -> CliResult {
    let mut session = Session::open()?;
    if args.is_empty() {
        let settings = session.manager.settings();
        println!("Category:       {}", settings.selected_category.display_name());
        println!(
            "Weekly limit:   {}",
            session.manager.formatter().fixed(settings.weekly_limit)
        );
        let recipients = settings.recipients();
        if recipients.is_empty() {
            println!("Notify:         (none)");
        } else {
            println!("Notify:         {}", recipients.join(", "));
        }
        return Ok(());
    }
    let (label, limit) = match args {
        [label, limit, ..] => (label, limit),
        _ => {
            return Err(CliError::Usage("settings needs <label> <limit> [email...]".into()).into())
        }
    };
    let label: Label = label.parse()?;
    if label.is_income() {
        let choices: Vec<&str> = Label::TRACKABLE.iter().map(Label::as_str).collect();
        return Err(CliError::Usage(format!(
            "income cannot carry a weekly limit; choose one of {}",
            choices.join(", ")
        ))
        .into());
    }
    let emails = args[2..].to_vec();
    let Some(snapshot) = session.manager.submit_settings(label, limit, emails)? else {
        return Ok(());
    };
    println!("Settings saved.");
    print_budget_line(&snapshot.budget, session.manager.formatter());
    resolve_alert(&mut session.manager)
}

fn run_config(args: &[String]) -> CliResult {
    let manager = ConfigManager::new()?;
    let mut config = manager.load()?;
    match args {
        [] => {
            print_config(&manager, &config);
            return Ok(());
        }
        [key, value] if key == "currency" => config.currency_symbol = value.clone(),
        [key, value] if key == "week-start" => {
            config.first_weekday = value
                .parse::<Weekday>()
                .map_err(|_| CliError::Usage(format!("unknown weekday `{value}`")))?;
        }
        [key, value] if key == "outbox" => config.outbox_dir = Some(PathBuf::from(value)),
        _ => return Err(CliError::Usage("unrecognized config arguments".into()).into()),
    }
    manager.save(&config)?;
    print_config(&manager, &config);
    Ok(())
}

fn print_config(manager: &ConfigManager, config: &Config) {
    println!("Config file:    {}", manager.path().display());
    println!("Currency:       {}", config.currency_symbol);
    println!("Week starts:    {}", config.first_weekday);
    println!("Outbox:         {}", manager.outbox_dir(config).display());
}

fn print_dashboard(snapshot: &DashboardSnapshot, formatter: &AmountFormatter) {
    println!("{:<10} {:>12}", "Today", formatter.fixed(snapshot.today_total));
    let remaining = format!("{:>12}", formatter.fixed(snapshot.budget.remaining));
    println!(
        "{:<10} {}",
        "Remaining",
        colorize_remaining(&snapshot.budget, remaining)
    );
    println!("{:<10} {:>12}", "All", formatter.fixed(snapshot.totals.net));
    println!("{:<10} {:>12}", "Income", formatter.fixed(snapshot.totals.income));
    println!("{:<10} {:>12}", "Spending", formatter.fixed(snapshot.totals.spending));
    print_budget_line(&snapshot.budget, formatter);
}

fn print_list(snapshot: &DashboardSnapshot, formatter: &AmountFormatter) {
    if snapshot.groups.is_empty() {
        println!("No entries yet.");
        return;
    }
    for group in &snapshot.groups {
        println!("{}", group.bucket.title().bold());
        for entry in &group.entries {
            println!(
                "  {:<10} {:<7} {:>10}  {}  {}",
                entry.name,
                entry.category.as_str(),
                formatter.compact(entry.amount),
                entry.time_added.format("%Y-%m-%d %H:%M"),
                entry.id
            );
            if !entry.comment.trim().is_empty() {
                println!("             {}", entry.comment.trim().dimmed());
            }
        }
    }
}

fn print_budget_line(status: &BudgetStatus, formatter: &AmountFormatter) {
    let remaining = colorize_remaining(status, formatter.compact(status.remaining));
    println!(
        "Weekly budget for {}: {} of {} left",
        status.category.display_name(),
        remaining,
        formatter.compact(status.weekly_limit)
    );
}

fn colorize_remaining(status: &BudgetStatus, text: String) -> String {
    if status.over_budget {
        text.red().bold().to_string()
    } else {
        text.green().to_string()
    }
}

fn resolve_alert(manager: &mut BudgetManager) -> CliResult {
    let Some(message) = manager.pending_alert() else {
        return Ok(());
    };
    println!("{}", message.subject.red().bold());
    let response = alert_response(&message.recipients)?;
    match manager.respond_to_alert(response).delivery {
        AlertDelivery::Sent(recipients) => println!("Alert sent to {}.", recipients.join(", ")),
        AlertDelivery::NoRecipients => {
            println!("No notification emails configured; nothing sent.")
        }
        AlertDelivery::Failed(reason) => {
            println!("{} {reason}", "Alert could not be sent:".yellow())
        }
        AlertDelivery::Cancelled | AlertDelivery::NotPending => println!("Alert dismissed."),
    }
    Ok(())
}

fn alert_response(recipients: &[String]) -> Result<AlertResponse, Box<dyn Error>> {
    if let Ok(value) = env::var(ALERT_RESPONSE_ENV) {
        return match value.trim().to_ascii_lowercase().as_str() {
            "send" => Ok(AlertResponse::Send),
            "cancel" => Ok(AlertResponse::Cancel),
            other => Err(CliError::Usage(format!(
                "{ALERT_RESPONSE_ENV} must be send or cancel, got `{other}`"
            ))
            .into()),
        };
    }
    if !io::stdin().is_terminal() {
        return Ok(AlertResponse::Cancel);
    }
    let prompt = if recipients.is_empty() {
        "Send a notification? (no emails configured)".to_string()
    } else {
        format!("Send a notification to {}?", recipients.join(", "))
    };
    let send = Confirm::new().with_prompt(prompt).default(true).interact()?;
    Ok(if send {
        AlertResponse::Send
    } else {
        AlertResponse::Cancel
    })
}
