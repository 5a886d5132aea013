//! Report CLI commands
//!
//! Weekly aggregates, budget comparison and cash-flow forecast, printed
//! as tables.

use std::path::PathBuf;

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{money, CliContext};
use crate::error::BudgetResult;
use crate::models::{
    BudgetPlan, BudgetState, CashFlowPrediction, WeekId, WeeklyBudgetComparison, WeeklyData,
};
use crate::services::{calendar, ComparisonEngine, ForecastEngine};

#[derive(Tabled)]
struct WeeklyRow {
    #[tabled(rename = "Week")]
    week: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Redeemable")]
    redeemable: String,
    #[tabled(rename = "Vacation")]
    vacation: String,
    #[tabled(rename = "Txns")]
    count: u32,
}

impl From<&WeeklyData> for WeeklyRow {
    fn from(data: &WeeklyData) -> Self {
        Self {
            week: data.week.to_string(),
            category: data.category.to_string(),
            amount: money(data.amount),
            redeemable: money(data.qualifiers.redeemable),
            vacation: money(data.qualifiers.vacation),
            count: data.qualifiers.transaction_count,
        }
    }
}

#[derive(Tabled)]
struct ComparisonRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Actual")]
    actual: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Rollover")]
    rollover: String,
    #[tabled(rename = "Effective")]
    effective: String,
    #[tabled(rename = "Variance")]
    variance: String,
}

impl From<&WeeklyBudgetComparison> for ComparisonRow {
    fn from(c: &WeeklyBudgetComparison) -> Self {
        Self {
            category: c.category.to_string(),
            actual: money(c.actual),
            target: money(c.target),
            rollover: money(c.rollover_accumulated),
            effective: money(c.effective_target),
            variance: money(c.variance),
        }
    }
}

/// Aggregated weekly data under the persisted filters
pub fn weekly_report(ctx: &CliContext, transactions: Option<PathBuf>) -> BudgetResult<Vec<WeeklyData>> {
    let state = ctx.store().load();
    let txns = ctx.transactions(transactions)?;
    Ok(ctx.weekly_data(&txns, &state))
}

/// Week a comparison runs for: explicit, then the view's week, then today's
pub fn resolve_week(state: &BudgetState, explicit: Option<WeekId>) -> BudgetResult<WeekId> {
    match explicit.or_else(|| state.effective_week()) {
        Some(week) => Ok(week),
        None => calendar::current_week(),
    }
}

/// Budget comparison for one week
pub fn comparison_report(
    ctx: &CliContext,
    transactions: Option<PathBuf>,
    week: Option<WeekId>,
) -> BudgetResult<(WeekId, Vec<WeeklyBudgetComparison>)> {
    let state = ctx.store().load();
    let week = resolve_week(&state, week)?;
    let txns = ctx.transactions(transactions)?;
    let data = ctx.weekly_data(&txns, &state);
    let plan = state.budget_plan.unwrap_or_default();

    let comparisons = ComparisonEngine::new(ctx.notifier()).compare(&data, &plan, &week)?;
    Ok((week, comparisons))
}

/// Cash-flow forecast over `weeks` of history (settings default otherwise)
pub fn forecast_report(
    ctx: &CliContext,
    transactions: Option<PathBuf>,
    weeks: Option<usize>,
) -> BudgetResult<CashFlowPrediction> {
    let state = ctx.store().load();
    let txns = ctx.transactions(transactions)?;
    let data = ctx.weekly_data(&txns, &state);
    let plan = state.budget_plan.unwrap_or_else(BudgetPlan::new);
    let weeks = weeks.unwrap_or(ctx.settings.forecast_weeks);

    ForecastEngine::new(ctx.notifier()).predict(&plan, &data, weeks)
}

/// Handle `weekly`
pub fn handle_weekly_command(ctx: &CliContext, transactions: Option<PathBuf>) -> BudgetResult<()> {
    let data = weekly_report(ctx, transactions)?;

    if data.is_empty() {
        println!("No transactions to show.");
        return Ok(());
    }

    let rows: Vec<WeeklyRow> = data.iter().map(WeeklyRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

/// Handle `compare`
pub fn handle_compare_command(
    ctx: &CliContext,
    transactions: Option<PathBuf>,
    week: Option<WeekId>,
) -> BudgetResult<()> {
    let (week, comparisons) = comparison_report(ctx, transactions, week)?;

    println!("Budget vs actual: {}", week);
    if comparisons.is_empty() {
        println!("Nothing budgeted or spent this week.");
        return Ok(());
    }

    let rows: Vec<ComparisonRow> = comparisons.iter().map(ComparisonRow::from).collect();
    println!("{}", Table::new(rows).with(Style::rounded()));
    Ok(())
}

/// Handle `forecast`
pub fn handle_forecast_command(
    ctx: &CliContext,
    transactions: Option<PathBuf>,
    weeks: Option<usize>,
) -> BudgetResult<()> {
    let p = forecast_report(ctx, transactions, weeks)?;

    println!("Weekly Cash Flow Forecast");
    println!("{}", "=".repeat(40));
    println!("{:28} {:>11}", "Income target:", money(p.total_income_target));
    println!("{:28} {:>11}", "Expense target:", money(p.total_expense_target));
    println!("{:28} {:>11}", "Predicted net income:", money(p.predicted_net_income));
    println!("{}", "-".repeat(40));
    println!("{:28} {:>11}", "Historic avg income:", money(p.historic_avg_income));
    println!("{:28} {:>11}", "Historic avg expense:", money(p.historic_avg_expense));
    println!("{:28} {:>11}", "Variance:", money(p.variance));
    Ok(())
}
