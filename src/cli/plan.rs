//! Budget plan CLI commands

use clap::Subcommand;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{money, CliContext};
use crate::error::{BudgetError, BudgetResult};
use crate::models::{BudgetPlan, Category, CategoryBudget, StatePatch};

/// Plan subcommands
#[derive(Subcommand, Debug)]
pub enum PlanCommands {
    /// Show the weekly targets
    Show,

    /// Set a category's weekly target
    Set {
        /// Category name
        category: Category,
        /// Weekly target (negative for expenses, e.g. -500)
        #[arg(allow_negative_numbers = true)]
        target: f64,
        /// Carry unspent budget forward
        #[arg(long)]
        rollover: bool,
    },

    /// Remove a category's target
    Remove {
        /// Category name
        category: Category,
    },

    /// Delete the whole plan
    Clear,
}

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Weekly Target")]
    target: String,
    #[tabled(rename = "Rollover")]
    rollover: &'static str,
}

/// Handle a plan command
pub fn handle_plan_command(ctx: &CliContext, cmd: PlanCommands) -> BudgetResult<()> {
    let store = ctx.store();

    match cmd {
        PlanCommands::Show => {
            let state = store.load();
            match state.budget_plan {
                Some(plan) if !plan.category_budgets.is_empty() => print_plan(&plan),
                _ => println!("No budget plan. Use 'weekly-budget plan set' to add targets."),
            }
        }
        PlanCommands::Set {
            category,
            target,
            rollover,
        } => {
            let budget = CategoryBudget::new(target, rollover);
            budget
                .validate()
                .map_err(|e| BudgetError::Validation(e.to_string()))?;

            let mut plan = store.load().budget_plan.unwrap_or_default();
            plan.set(category, budget);
            store.save(StatePatch::new().budget_plan(Some(plan)))?;

            println!(
                "Set {} to {} per week{}",
                category,
                money(target),
                if rollover { " (rollover)" } else { "" }
            );
        }
        PlanCommands::Remove { category } => {
            let Some(mut plan) = store.load().budget_plan else {
                println!("No budget plan.");
                return Ok(());
            };

            if plan.remove(category).is_none() {
                println!("No target set for {}", category);
                return Ok(());
            }
            store.save(StatePatch::new().budget_plan(Some(plan)))?;
            println!("Removed target for {}", category);
        }
        PlanCommands::Clear => {
            store.save(StatePatch::new().budget_plan(None))?;
            println!("Budget plan cleared.");
        }
    }

    Ok(())
}

fn print_plan(plan: &BudgetPlan) {
    let rows: Vec<PlanRow> = plan
        .category_budgets
        .iter()
        .map(|(category, budget)| PlanRow {
            category: category.to_string(),
            target: money(budget.weekly_target),
            rollover: if budget.rollover_enabled { "yes" } else { "no" },
        })
        .collect();

    println!("{}", Table::new(rows).with(Style::rounded()));
    println!("Last modified: {}", plan.last_modified.format("%Y-%m-%d %H:%M UTC"));
}

