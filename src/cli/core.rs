use std::{io, path::PathBuf};

use chrono::{DateTime, Utc};
use strsim::levenshtein;
use thiserror::Error;

use crate::{
    budget::{Budget, BudgetUnit, Ledger, Transaction},
    cli::output,
    config::{Config, ConfigError, ConfigManager},
    currency::{format_amount_with, NumberFormat},
    errors::{BudgetError, DecodeError, PersistenceError},
    utils::persistence::{
        load_budget_from_file, load_ledger_from_file, save_budget_to_file, save_ledger_to_file,
    },
};

const SUGGESTION_DISTANCE: usize = 3;

/// Commands understood by the shell, with their usage line.
pub(crate) const COMMANDS: &[(&str, &str)] = &[
    ("new-budget", "new-budget <name> [money|time|numeric] [value]"),
    ("open", "open <name-or-path>"),
    ("save", "save [name-or-path]"),
    ("allocate", "allocate <category> <amount>"),
    (
        "record",
        "record <category> <amount> [note] [--from <rfc3339> --to <rfc3339>]",
    ),
    ("remaining", "remaining <category>"),
    ("transactions", "transactions [category]"),
    ("report", "report"),
    ("ledger-record", "ledger-record <category> <amount> [note]"),
    ("ledger-list", "ledger-list <category>"),
    ("ledger-total", "ledger-total <category>"),
    ("ledger-save", "ledger-save [name-or-path]"),
    ("ledger-open", "ledger-open <name-or-path>"),
    ("version", "version"),
    ("help", "help"),
    ("exit", "exit"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<LoopControl, CommandError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("No budget loaded. Use `new-budget` or `open` first.")]
    BudgetNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{0}`. Type `help` for the command list.")]
    UnknownCommand(String),
    #[error(transparent)]
    Budget(#[from] BudgetError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Mutable state shared by every command of one shell session.
pub struct ShellContext {
    pub(crate) mode: CliMode,
    pub(crate) running: bool,
    config: Config,
    budget: Option<Budget>,
    budget_path: Option<PathBuf>,
    ledger: Ledger,
    ledger_path: Option<PathBuf>,
    number_format: NumberFormat,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config = ConfigManager::from_env()?.load()?;
        Ok(Self::with_config(mode, config))
    }

    pub fn with_config(mode: CliMode, config: Config) -> Self {
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);
        let number_format = NumberFormat::from_locale(&config.locale);
        Self {
            mode,
            running: true,
            config,
            budget: None,
            budget_path: None,
            ledger: Ledger::new(),
            ledger_path: None,
            number_format,
        }
    }

    pub fn prompt(&self) -> String {
        match &self.budget {
            Some(budget) => format!("budget ({})> ", budget.name),
            None => "budget> ".to_string(),
        }
    }

    pub fn budget(&self) -> Option<&Budget> {
        self.budget.as_ref()
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        COMMANDS.iter().map(|(name, _)| *name).collect()
    }

    pub(crate) fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match command {
            "new-budget" => self.cmd_new_budget(args),
            "open" => self.cmd_open(args),
            "save" => self.cmd_save(args),
            "allocate" => self.cmd_allocate(args),
            "record" => self.cmd_record(args),
            "remaining" => self.cmd_remaining(args),
            "transactions" => self.cmd_transactions(args),
            "report" => self.cmd_report(),
            "ledger-record" => self.cmd_ledger_record(args),
            "ledger-list" => self.cmd_ledger_list(args),
            "ledger-total" => self.cmd_ledger_total(args),
            "ledger-save" => self.cmd_ledger_save(args),
            "ledger-open" => self.cmd_ledger_open(args),
            "version" => cmd_version(),
            "help" => cmd_help(),
            "exit" | "quit" => Ok(LoopControl::Exit),
            other => Err(CommandError::UnknownCommand(other.to_string())),
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        output::error(&err);
        match &err {
            CommandError::UnknownCommand(input) => {
                if let Some(best) = closest(input, self.command_names()) {
                    output::info(format!("Suggestion: `{}`?", best));
                }
            }
            CommandError::Budget(BudgetError::CategoryNotFound(name)) => {
                let known = self
                    .budget
                    .iter()
                    .flat_map(|budget| budget.category_names());
                match closest(name, known) {
                    Some(best) => output::info(format!("Did you mean `{}`?", best)),
                    None => output::info(format!(
                        "Allocate it first with `allocate {} <amount>`.",
                        shell_quote(name)
                    )),
                }
            }
            _ => {}
        }
    }

    fn cmd_new_budget(&mut self, args: &[&str]) -> CommandResult {
        let unit = match args {
            [_] => self.config.default_unit(),
            [_, tag, value] => BudgetUnit::from_parts(tag, *value)?,
            _ => return Err(usage("new-budget")),
        };
        let budget = Budget::new(args[0], unit);
        output::success(format!(
            "New budget `{}` created ({}).",
            budget.name, budget.unit
        ));
        self.budget = Some(budget);
        self.budget_path = None;
        Ok(LoopControl::Continue)
    }

    fn cmd_open(&mut self, args: &[&str]) -> CommandResult {
        let [target] = args else {
            return Err(usage("open"));
        };
        let path = self.config.resolve_budget_path(target);
        let budget = load_budget_from_file(&path)?;
        output::success(format!(
            "Opened budget `{}` from {}.",
            budget.name,
            path.display()
        ));
        self.budget = Some(budget);
        self.budget_path = Some(path);
        Ok(LoopControl::Continue)
    }

    fn cmd_save(&mut self, args: &[&str]) -> CommandResult {
        let budget = self.budget_ref()?;
        let path = match args {
            [] => self.budget_path.clone().ok_or_else(|| {
                CommandError::InvalidArguments(
                    "No save location yet. Usage: save <name-or-path>".into(),
                )
            })?,
            [target] => self.config.resolve_budget_path(target),
            _ => return Err(usage("save")),
        };
        save_budget_to_file(budget, &path)?;
        output::success(format!("Budget saved to {}.", path.display()));
        self.budget_path = Some(path);
        Ok(LoopControl::Continue)
    }

    fn cmd_allocate(&mut self, args: &[&str]) -> CommandResult {
        let [category, amount] = args else {
            return Err(usage("allocate"));
        };
        let amount = parse_amount(amount)?;
        let number_format = self.number_format;
        let budget = self.budget_mut()?;
        budget.allocate(category, amount);
        output::success(format!(
            "Allocated {} to `{}`.",
            format_amount_with(&budget.unit, amount, &number_format),
            category
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_record(&mut self, args: &[&str]) -> CommandResult {
        let parsed = RecordArgs::parse(args)?;
        let number_format = self.number_format;
        let budget = self.budget_mut()?;
        budget.record(
            parsed.amount,
            parsed.category,
            parsed.note.as_deref(),
            parsed.time_range,
        )?;
        output::success(format!(
            "Recorded {} against `{}`.",
            format_amount_with(&budget.unit, parsed.amount, &number_format),
            parsed.category
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_remaining(&mut self, args: &[&str]) -> CommandResult {
        let [category] = args else {
            return Err(usage("remaining"));
        };
        let budget = self.budget_ref()?;
        let remaining = budget.remaining(category)?;
        let message = format!(
            "Remaining in `{}`: {}",
            category,
            self.amount(&budget.unit, remaining)
        );
        if remaining < 0.0 {
            output::warning(message);
        } else {
            output::info(message);
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_transactions(&mut self, args: &[&str]) -> CommandResult {
        let budget = self.budget_ref()?;
        let rows: Vec<&Transaction> = match args {
            [] => budget.all_transactions(),
            [category] => budget.transactions(category)?.iter().collect(),
            _ => return Err(usage("transactions")),
        };
        if rows.is_empty() {
            output::info("No transactions recorded.");
        }
        for txn in rows {
            output::info(describe_transaction(&budget.unit, txn, &self.number_format));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_report(&mut self) -> CommandResult {
        let budget = self.budget_ref()?;
        output::section(format!("{} ({})", budget.name, budget.unit));
        let rows = budget.report();
        if rows.is_empty() {
            output::info("No categories allocated.");
        }
        for row in &rows {
            let line = format!(
                "{:<16} allocated {:>12}  spent {:>12}  remaining {:>12}",
                row.name,
                self.amount(&budget.unit, row.allocated),
                self.amount(&budget.unit, row.spent),
                self.amount(&budget.unit, row.remaining),
            );
            if row.remaining < 0.0 {
                output::warning(line);
            } else {
                output::info(line);
            }
        }
        let totals = budget.totals();
        output::info(format!(
            "{:<16} allocated {:>12}  spent {:>12}  remaining {:>12}",
            "Total",
            self.amount(&budget.unit, totals.allocated),
            self.amount(&budget.unit, totals.spent),
            self.amount(&budget.unit, totals.remaining),
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_ledger_record(&mut self, args: &[&str]) -> CommandResult {
        let (category, amount, note) = match args {
            [category, amount] => (*category, *amount, None),
            [category, amount, note] => (*category, *amount, Some(*note)),
            _ => return Err(usage("ledger-record")),
        };
        let mut transaction = Transaction::new(category, parse_amount(amount)?);
        if let Some(note) = note {
            transaction = transaction.with_details(note);
        }
        self.ledger.record(transaction);
        output::success(format!("Ledger entry added for `{}`.", category));
        Ok(LoopControl::Continue)
    }

    fn cmd_ledger_list(&mut self, args: &[&str]) -> CommandResult {
        let [category] = args else {
            return Err(usage("ledger-list"));
        };
        let unit = self.display_unit();
        let entries = self.ledger.transactions_for(category);
        if entries.is_empty() {
            output::info(format!("No ledger entries for `{}`.", category));
        }
        for txn in entries {
            output::info(describe_transaction(&unit, txn, &self.number_format));
        }
        Ok(LoopControl::Continue)
    }

    fn cmd_ledger_total(&mut self, args: &[&str]) -> CommandResult {
        let [category] = args else {
            return Err(usage("ledger-total"));
        };
        let unit = self.display_unit();
        output::info(format!(
            "Ledger total for `{}`: {}",
            category,
            self.amount(&unit, self.ledger.total_spent(category))
        ));
        Ok(LoopControl::Continue)
    }

    fn cmd_ledger_save(&mut self, args: &[&str]) -> CommandResult {
        let path = match args {
            [] => self.ledger_path.clone().ok_or_else(|| {
                CommandError::InvalidArguments(
                    "No ledger location yet. Usage: ledger-save <name-or-path>".into(),
                )
            })?,
            [target] => self.config.resolve_budget_path(target),
            _ => return Err(usage("ledger-save")),
        };
        save_ledger_to_file(&self.ledger, &path)?;
        output::success(format!(
            "Ledger with {} entries saved to {}.",
            self.ledger.len(),
            path.display()
        ));
        self.ledger_path = Some(path);
        Ok(LoopControl::Continue)
    }

    fn cmd_ledger_open(&mut self, args: &[&str]) -> CommandResult {
        let [target] = args else {
            return Err(usage("ledger-open"));
        };
        let path = self.config.resolve_budget_path(target);
        let ledger = load_ledger_from_file(&path)?;
        output::success(format!(
            "Opened ledger with {} entries from {}.",
            ledger.len(),
            path.display()
        ));
        self.ledger = ledger;
        self.ledger_path = Some(path);
        Ok(LoopControl::Continue)
    }

    fn amount(&self, unit: &BudgetUnit, value: f64) -> String {
        format_amount_with(unit, value, &self.number_format)
    }

    fn budget_ref(&self) -> Result<&Budget, CommandError> {
        self.budget.as_ref().ok_or(CommandError::BudgetNotLoaded)
    }

    fn budget_mut(&mut self) -> Result<&mut Budget, CommandError> {
        self.budget.as_mut().ok_or(CommandError::BudgetNotLoaded)
    }

    /// The ledger is independent of any budget, so it borrows the open budget's unit
    /// for display only and falls back to the configured currency.
    fn display_unit(&self) -> BudgetUnit {
        self.budget
            .as_ref()
            .map(|budget| budget.unit.clone())
            .unwrap_or_else(|| self.config.default_unit())
    }
}

struct RecordArgs<'a> {
    category: &'a str,
    amount: f64,
    note: Option<String>,
    time_range: Option<std::ops::RangeInclusive<DateTime<Utc>>>,
}

impl<'a> RecordArgs<'a> {
    fn parse(args: &[&'a str]) -> Result<Self, CommandError> {
        let mut positional = Vec::new();
        let mut from = None;
        let mut to = None;
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            match *arg {
                "--from" => from = Some(parse_timestamp(next_value(&mut iter, "--from")?)?),
                "--to" => to = Some(parse_timestamp(next_value(&mut iter, "--to")?)?),
                other => positional.push(other),
            }
        }
        let (category, amount, note) = match positional.as_slice() {
            [category, amount] => (*category, *amount, None),
            [category, amount, note] => (*category, *amount, Some(note.to_string())),
            _ => return Err(usage("record")),
        };
        let time_range = match (from, to) {
            (Some(start), Some(end)) => Some(start..=end),
            (None, None) => None,
            _ => {
                return Err(CommandError::InvalidArguments(
                    "`--from` and `--to` must be given together.".into(),
                ))
            }
        };
        Ok(Self {
            category,
            amount: parse_amount(amount)?,
            note,
            time_range,
        })
    }
}

fn next_value<'a>(
    iter: &mut std::slice::Iter<'_, &'a str>,
    flag: &str,
) -> Result<&'a str, CommandError> {
    iter.next()
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("`{}` expects a timestamp.", flag)))
}

fn parse_amount(raw: &str) -> Result<f64, CommandError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| CommandError::InvalidArguments(format!("`{}` is not a valid amount.", raw)))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, CommandError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|err| {
            CommandError::InvalidArguments(format!("`{}` is not an RFC 3339 timestamp: {}", raw, err))
        })
}

fn describe_transaction(unit: &BudgetUnit, txn: &Transaction, format: &NumberFormat) -> String {
    let mut line = format!(
        "{}  {:<16} {:>12}",
        txn.date.format("%Y-%m-%d %H:%M"),
        txn.category,
        format_amount_with(unit, txn.amount, format)
    );
    if let Some(details) = &txn.details {
        line.push_str(&format!("  {}", details));
    }
    if let Some(range) = txn.time_range() {
        line.push_str(&format!(
            "  [{} .. {}]",
            range.start().format("%H:%M"),
            range.end().format("%H:%M")
        ));
    }
    line
}

fn cmd_version() -> CommandResult {
    output::info(version_line());
    Ok(LoopControl::Continue)
}

fn version_line() -> String {
    format!(
        "budget_model {} ({} {}, {} {} build, {}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("BUDGET_MODEL_BUILD_HASH"),
        env!("BUDGET_MODEL_BUILD_STATUS"),
        env!("BUDGET_MODEL_BUILD_TARGET"),
        env!("BUDGET_MODEL_BUILD_PROFILE"),
        env!("BUDGET_MODEL_BUILD_RUSTC"),
        env!("BUDGET_MODEL_BUILD_TIMESTAMP"),
    )
}

fn cmd_help() -> CommandResult {
    output::section("Commands");
    for (_, usage) in COMMANDS {
        output::info(format!("  {}", usage));
    }
    Ok(LoopControl::Continue)
}

fn usage(command: &str) -> CommandError {
    let line = COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, usage)| *usage)
        .unwrap_or(command);
    CommandError::InvalidArguments(format!("Usage: {}", line))
}

fn closest<'a>(input: &str, candidates: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(candidate, input), candidate))
        .filter(|(distance, _)| *distance <= SUGGESTION_DISTANCE)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

fn shell_quote(value: &str) -> String {
    if value.contains(char::is_whitespace) {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_context() -> ShellContext {
        ShellContext::with_config(CliMode::Script, Config::default())
    }

    #[test]
    fn commands_require_a_budget() {
        let mut context = script_context();
        let err = context.dispatch("allocate", &["Food", "10"]).unwrap_err();
        assert!(matches!(err, CommandError::BudgetNotLoaded));
    }

    #[test]
    fn record_flow_updates_open_budget() {
        let mut context = script_context();
        context.dispatch("new-budget", &["Test"]).unwrap();
        context.dispatch("allocate", &["Food", "500"]).unwrap();
        context
            .dispatch(
                "record",
                &[
                    "Food",
                    "150",
                    "weekly shop",
                    "--from",
                    "2024-03-01T10:00:00Z",
                    "--to",
                    "2024-03-01T11:00:00Z",
                ],
            )
            .unwrap();
        let budget = context.budget().unwrap();
        assert_eq!(budget.unit, BudgetUnit::money("USD"));
        assert_eq!(budget.remaining("Food").unwrap(), 350.0);
        let txn = &budget.transactions("Food").unwrap()[0];
        assert_eq!(txn.details.as_deref(), Some("weekly shop"));
        assert!(txn.time_range().is_some());
    }

    #[test]
    fn half_open_time_flags_are_rejected() {
        let mut context = script_context();
        context.dispatch("new-budget", &["Test"]).unwrap();
        context.dispatch("allocate", &["Focus", "40"]).unwrap();
        let err = context
            .dispatch("record", &["Focus", "2", "--from", "2024-03-01T10:00:00Z"])
            .unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));
        assert!(context.budget().unwrap().all_transactions().is_empty());
    }

    #[test]
    fn unknown_unit_tag_is_a_decode_error() {
        let mut context = script_context();
        let err = context
            .dispatch("new-budget", &["Energy", "power", "kWh"])
            .unwrap_err();
        assert!(matches!(err, CommandError::Decode(DecodeError::UnknownTag(_))));
    }

    #[test]
    fn ledger_commands_do_not_need_a_budget() {
        let mut context = script_context();
        context.dispatch("ledger-record", &["Books", "12.5"]).unwrap();
        context.dispatch("ledger-record", &["Books", "7.5", "paperback"]).unwrap();
        assert_eq!(context.ledger().total_spent("Books"), 20.0);
        assert!(context.budget().is_none());
    }

    #[test]
    fn save_without_budget_reports_missing_budget_first() {
        let mut context = script_context();
        let err = context.dispatch("save", &[]).unwrap_err();
        assert!(matches!(err, CommandError::BudgetNotLoaded));
    }

    #[test]
    fn ledger_save_needs_a_location_until_one_is_given() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("ledger.json");
        let path_arg = path.to_str().unwrap();

        let mut context = script_context();
        context.dispatch("ledger-record", &["Books", "12.5"]).unwrap();
        let err = context.dispatch("ledger-save", &[]).unwrap_err();
        assert!(matches!(err, CommandError::InvalidArguments(_)));

        context.dispatch("ledger-save", &[path_arg]).unwrap();
        context.dispatch("ledger-record", &["Books", "2.5"]).unwrap();
        context.dispatch("ledger-save", &[]).unwrap();

        let mut reopened = script_context();
        reopened.dispatch("ledger-open", &[path_arg]).unwrap();
        assert_eq!(reopened.ledger().total_spent("Books"), 15.0);
        assert!(reopened.budget().is_none());
    }

    #[test]
    fn amounts_follow_configured_locale() {
        let config = Config {
            locale: "de-DE".into(),
            currency: "EUR".into(),
            ..Config::default()
        };
        let context = ShellContext::with_config(CliMode::Script, config);
        assert_eq!(
            context.amount(&BudgetUnit::money("EUR"), 1234.5),
            "€1.234,50"
        );
        assert_eq!(
            script_context().amount(&BudgetUnit::money("USD"), 1234.5),
            "$1,234.50"
        );
    }

    #[test]
    fn version_line_includes_tree_status_and_compiler() {
        let line = version_line();
        assert!(line.contains(env!("BUDGET_MODEL_BUILD_STATUS")));
        assert!(line.contains(env!("BUDGET_MODEL_BUILD_RUSTC")));
        assert!(["clean", "dirty", "unknown"].contains(&env!("BUDGET_MODEL_BUILD_STATUS")));
        assert!(matches!(cmd_version(), Ok(LoopControl::Continue)));
    }

    #[test]
    fn closest_respects_distance_limit() {
        assert_eq!(closest("reprot", ["report", "record"]), Some("report"));
        assert_eq!(closest("zzzzzzzz", ["report"]), None);
    }
}
