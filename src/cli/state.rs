//! View state CLI commands

use clap::{Subcommand, ValueEnum};

use super::CliContext;
use crate::error::BudgetResult;
use crate::models::{BudgetState, Category, StatePatch, ViewGranularity, ViewSelection, WeekId};

/// On/off switch argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl From<Toggle> for bool {
    fn from(toggle: Toggle) -> Self {
        toggle == Toggle::On
    }
}

/// State subcommands
#[derive(Subcommand, Debug)]
pub enum StateCommands {
    /// Show the saved view state, or un-hide a category
    Show {
        /// Category to show again
        category: Option<Category>,
    },

    /// Switch between month and week view
    #[command(subcommand)]
    View(ViewCommands),

    /// Hide a category from every report
    Hide {
        /// Category name
        category: Category,
    },

    /// Include or exclude vacation transactions
    Vacation {
        #[arg(value_enum)]
        toggle: Toggle,
    },

    /// Turn planning mode on or off
    Planning {
        #[arg(value_enum)]
        toggle: Toggle,
    },
}

/// View subcommands
#[derive(Subcommand, Debug)]
pub enum ViewCommands {
    /// Month view
    Month,

    /// Week view, pinned to WEEK or following the current week
    Week {
        /// Week (YYYY-Wnn); omit to follow today
        week: Option<WeekId>,
    },
}

/// Handle a state command
pub fn handle_state_command(ctx: &CliContext, cmd: StateCommands) -> BudgetResult<()> {
    let store = ctx.store();

    let saved = match cmd {
        StateCommands::Show { category: None } => {
            print_state(&store.load());
            return Ok(());
        }
        StateCommands::Show {
            category: Some(category),
        } => {
            let mut hidden = store.load().hidden_categories;
            hidden.retain(|c| *c != category);
            store.save(StatePatch::new().hidden_categories(hidden))?
        }
        StateCommands::Hide { category } => {
            let mut hidden = store.load().hidden_categories;
            if !hidden.contains(&category) {
                hidden.push(category);
            }
            store.save(StatePatch::new().hidden_categories(hidden))?
        }
        StateCommands::View(ViewCommands::Month) => {
            store.save(StatePatch::new().view_granularity(ViewGranularity::Month))?
        }
        StateCommands::View(ViewCommands::Week { week }) => store.save(
            StatePatch::new()
                .view_granularity(ViewGranularity::Week)
                .selected_week(week),
        )?,
        StateCommands::Vacation { toggle } => {
            store.save(StatePatch::new().show_vacation(toggle.into()))?
        }
        StateCommands::Planning { toggle } => {
            store.save(StatePatch::new().planning_mode(toggle.into()))?
        }
    };

    print_state(&saved);
    Ok(())
}

fn print_state(state: &BudgetState) {
    let view = match state.view {
        ViewSelection::Month => "month".to_string(),
        ViewSelection::Week {
            selected_week: Some(week),
        } => format!("week {}", week),
        ViewSelection::Week {
            selected_week: None,
        } => match state.effective_week() {
            Some(week) => format!("week (current: {})", week),
            None => "week (current)".to_string(),
        },
    };

    let hidden = if state.hidden_categories.is_empty() {
        "none".to_string()
    } else {
        state
            .hidden_categories
            .iter()
            .map(Category::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let plan = match &state.budget_plan {
        Some(plan) => format!("{} target(s)", plan.category_budgets.len()),
        None => "none".to_string(),
    };

    println!("View:              {}", view);
    println!("Hidden categories: {}", hidden);
    println!("Show vacation:     {}", if state.show_vacation { "on" } else { "off" });
    println!("Planning mode:     {}", if state.planning_mode { "on" } else { "off" });
    println!("Budget plan:       {}", plan);
}
