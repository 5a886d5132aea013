//! Week CLI commands
//!
//! ISO-week lookups and navigation.

use clap::Subcommand;

use crate::error::BudgetResult;
use crate::services::calendar;

/// Week subcommands
#[derive(Subcommand, Debug)]
pub enum WeekCommands {
    /// Show the current ISO week
    Current,

    /// Show the ISO week containing a date
    Of {
        /// Date (YYYY-MM-DD)
        date: String,
    },

    /// Show the week after a week
    Next {
        /// Week (YYYY-Wnn, e.g. 2025-W03)
        week: String,
    },

    /// Show the week before a week
    Prev {
        /// Week (YYYY-Wnn, e.g. 2025-W03)
        week: String,
    },

    /// Show the first and last day of a week
    Bounds {
        /// Week (YYYY-Wnn, e.g. 2025-W03)
        week: String,
    },
}

/// Handle a week command
pub fn handle_week_command(cmd: WeekCommands) -> BudgetResult<()> {
    match cmd {
        WeekCommands::Current => println!("{}", calendar::current_week()?),
        WeekCommands::Of { date } => println!("{}", calendar::to_week_id(&date)?),
        WeekCommands::Next { week } => println!("{}", calendar::next_week_of(&week)?),
        WeekCommands::Prev { week } => println!("{}", calendar::previous_week_of(&week)?),
        WeekCommands::Bounds { week } => {
            let bounds = calendar::boundaries_of(&week)?;
            println!("{} {}", bounds.start, bounds.end);
        }
    }
    Ok(())
}
