use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use monthly_budget::audit::EntityType;
use monthly_budget::cli::{
    handle_account_command, handle_budget_command, handle_envelope_command, handle_expense_command,
    handle_export_command, handle_recurring_command, handle_report_command,
    handle_transaction_command,
};
use monthly_budget::config::{BudgetPaths, Settings};
use monthly_budget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "budget",
    author = "Kaylee Beyene",
    version,
    about = "Monthly budget with shared-expense splitting and envelope accounts",
    long_about = "Plans each month's income against recurring and one-off expenses, \
                  counting only your share of costs split with others. Manual accounts \
                  can be divided into envelopes of your own and borrowed money, and \
                  bank transactions are matched against planned expenses."
)]
struct Cli {
    /// Base directory for settings and data
    #[arg(long, global = true, env = "MONTHLY_BUDGET_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly budget commands
    #[command(subcommand)]
    Budget(monthly_budget::cli::BudgetCommands),

    /// Expense lines of a month
    #[command(subcommand, alias = "exp")]
    Expense(monthly_budget::cli::ExpenseCommands),

    /// Recurring expense templates
    #[command(subcommand)]
    Recurring(monthly_budget::cli::RecurringCommands),

    /// Manual account commands
    #[command(subcommand)]
    Account(monthly_budget::cli::AccountCommands),

    /// Envelopes of a manual account
    #[command(subcommand)]
    Envelope(monthly_budget::cli::EnvelopeCommands),

    /// Bank transaction feed
    #[command(subcommand, alias = "txn")]
    Transaction(monthly_budget::cli::TransactionCommands),

    /// Reports
    #[command(subcommand)]
    Report(monthly_budget::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(monthly_budget::cli::ExportCommands),

    /// Show recent changes from the audit log
    Audit {
        /// Number of entries to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
        /// Only one entity type (budget, expense, recurring, account, envelope)
        #[arg(short, long)]
        entity: Option<String>,
    },

    /// Initialize settings and the data directory
    Init,

    /// Show current configuration and paths
    Config,
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_filter.as_str()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = match cli.data_dir {
        Some(dir) => BudgetPaths::with_base_dir(dir),
        None => BudgetPaths::new()?,
    };
    let settings = Settings::load_or_create(&paths)?;
    settings.validate()?;

    init_tracing(&settings);
    tracing::debug!(base_dir = %paths.base_dir().display(), "starting");

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all().context("failed to load the budget store")?;

    match cli.command {
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Expense(cmd)) => handle_expense_command(&storage, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&storage, cmd)?,
        Some(Commands::Account(cmd)) => handle_account_command(&storage, &settings, cmd)?,
        Some(Commands::Envelope(cmd)) => handle_envelope_command(&storage, cmd)?,
        Some(Commands::Transaction(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, cmd)?,
        Some(Commands::Audit { limit, entity }) => {
            let entity = entity
                .map(|e| {
                    EntityType::parse(&e).with_context(|| {
                        format!(
                            "unknown entity type '{}' (budget, expense, recurring, account, envelope)",
                            e
                        )
                    })
                })
                .transpose()?;

            let entries = storage.audit().read_recent(limit, entity)?;
            if entries.is_empty() {
                println!("No audit entries.");
            }
            for entry in entries {
                println!("{}", entry.format_human_readable());
            }
        }
        Some(Commands::Init) => {
            println!("Initializing monthly-budget at: {}", paths.base_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            storage.save_all()?;
            println!("Initialization complete!");
            println!();
            println!("Next steps:");
            println!("  budget recurring add Rent 18000 --auto-paid");
            println!("  budget budget set --salary 65000");
            println!("  budget budget show");
        }
        Some(Commands::Config) => {
            println!("monthly-budget Configuration");
            println!("============================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Transaction feed: {}", paths.transactions_file().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Currency:            {}", settings.currency);
            println!("  Amount tolerance:    {}%", settings.matching.amount_tolerance_pct);
            println!("  Category tolerance:  {}%", settings.matching.category_tolerance_pct);
            println!("  Salary category:     {}", settings.income.salary_category);
            println!("  Salary grace days:   {}", settings.income.salary_grace_days);
            println!("  Own accounts:        {}", settings.transfers.own_account_numbers.len());
            println!("  Family names:        {}", settings.transfers.family_names.len());
            println!("  Log filter:          {}", settings.log_filter);
        }
        None => {
            println!("monthly-budget - shared-expense monthly budgeting");
            println!();
            println!("Run 'budget --help' for usage information.");
            println!("Run 'budget init' to create the data directory.");
        }
    }

    Ok(())
}
