use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use weekly_budget::cli::{
    handle_compare_command, handle_export_command, handle_forecast_command, handle_plan_command,
    handle_state_command, handle_week_command, handle_weekly_command, CliContext, ExportArgs,
    PlanCommands, StateCommands, WeekCommands,
};
use weekly_budget::config::{paths::BudgetPaths, settings::Settings};
use weekly_budget::logging::init_tracing;
use weekly_budget::models::WeekId;

#[derive(Parser)]
#[command(
    name = "weekly-budget",
    version,
    about = "Weekly budgeting on ISO weeks",
    long_about = "weekly-budget groups your transactions into ISO-8601 weeks, \
                  compares each week against per-category targets with optional \
                  rollover, and forecasts your weekly cash flow."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// ISO week lookups and navigation
    #[command(subcommand)]
    Week(WeekCommands),

    /// Show spending per week and category
    Weekly {
        /// Transaction file (JSON or CSV)
        #[arg(short, long)]
        transactions: Option<PathBuf>,
    },

    /// Compare a week against the budget plan
    Compare {
        /// Transaction file (JSON or CSV)
        #[arg(short, long)]
        transactions: Option<PathBuf>,
        /// Week to compare (defaults to the viewed or current week)
        #[arg(short, long)]
        week: Option<WeekId>,
    },

    /// Forecast weekly cash flow
    Forecast {
        /// Transaction file (JSON or CSV)
        #[arg(short, long)]
        transactions: Option<PathBuf>,
        /// Weeks of history to average
        #[arg(long)]
        weeks: Option<usize>,
    },

    /// Budget plan management
    #[command(subcommand)]
    Plan(PlanCommands),

    /// Saved view state
    #[command(subcommand)]
    State(StateCommands),

    /// Export a report
    Export(ExportArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let paths = BudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let Some(command) = cli.command else {
        println!("weekly-budget - Weekly budgeting on ISO weeks");
        println!();
        println!("Run 'weekly-budget --help' for usage information.");
        return Ok(());
    };

    let ctx = CliContext::new(paths, settings);

    match command {
        Commands::Week(cmd) => handle_week_command(cmd)?,
        Commands::Weekly { transactions } => handle_weekly_command(&ctx, transactions)?,
        Commands::Compare { transactions, week } => {
            handle_compare_command(&ctx, transactions, week)?
        }
        Commands::Forecast {
            transactions,
            weeks,
        } => handle_forecast_command(&ctx, transactions, weeks)?,
        Commands::Plan(cmd) => handle_plan_command(&ctx, cmd)?,
        Commands::State(cmd) => handle_state_command(&ctx, cmd)?,
        Commands::Export(args) => handle_export_command(&ctx, args)?,
        Commands::Config => {
            println!("weekly-budget Configuration");
            println!("===========================");
            println!("Base directory:    {}", ctx.paths.base_dir().display());
            println!("Settings file:     {}", ctx.paths.settings_file().display());
            println!("State directory:   {}", ctx.paths.state_dir().display());
            println!(
                "Transactions:      {}",
                ctx.settings.transactions_path(&ctx.paths, None).display()
            );
            println!();
            println!("Settings:");
            println!("  State key:       {}", ctx.settings.state_key);
            println!("  Forecast weeks:  {}", ctx.settings.forecast_weeks);
        }
    }

    Ok(())
}
