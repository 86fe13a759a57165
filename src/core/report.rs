//! Report generation business logic.
//!
//! This module assembles a dashboard snapshot from a list of subscriptions and
//! formats it as text. All functions are framework-agnostic and return
//! structured data or plain strings that any front end can display.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    config::engine::EngineConfig,
    core::{
        billing::{
            BillingStatus, billing_date_of, billing_status, calendar_days_until,
            monthly_equivalent,
        },
        bills::{PaymentDay, overdue_bills, upcoming_bills, upcoming_payments},
        spend::{
            SavingsReport, rank_by_monthly_cost, savings_potential, total_monthly_spend,
            total_yearly_spend,
        },
    },
    models::Subscription,
};

/// Number of entries shown in the cost ranking.
const RANKING_LIMIT: usize = 5;

/// One bill line on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLine {
    /// Subscription name
    pub name: String,
    /// Amount charged
    pub amount: Decimal,
    /// Currency of the amount
    pub currency: String,
    /// Calendar days until the charge, negative when overdue
    pub days_until: i64,
    /// Urgency classification
    pub status: BillingStatus,
}

/// Snapshot of everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Reporting currency
    pub currency: String,
    /// Number of active subscriptions
    pub active_count: usize,
    /// Monthly-equivalent total
    pub total_monthly: Decimal,
    /// Yearly-equivalent total
    pub total_yearly: Decimal,
    /// Overdue bills, most overdue first
    pub overdue: Vec<BillLine>,
    /// Upcoming bills, soonest first
    pub upcoming: Vec<BillLine>,
    /// Charges per day over the payment horizon
    pub payments: Vec<PaymentDay>,
    /// Most expensive subscriptions per month as `(name, monthly cost)`
    pub ranking: Vec<(String, Decimal)>,
    /// Savings analysis
    pub savings: SavingsReport,
}

fn bill_line(subscription: &Subscription, today: NaiveDate) -> Option<BillLine> {
    let day = billing_date_of(subscription)?.date_naive();
    let days = calendar_days_until(day, today);
    Some(BillLine {
        name: subscription.name.clone(),
        amount: subscription.amount,
        currency: subscription.currency.clone(),
        days_until: days,
        status: billing_status(days),
    })
}

fn bill_lines(subscriptions: Vec<&Subscription>, today: NaiveDate) -> Vec<BillLine> {
    let mut lines: Vec<BillLine> = subscriptions
        .into_iter()
        .filter_map(|sub| bill_line(sub, today))
        .collect();
    lines.sort_by_key(|line| line.days_until);
    lines
}

/// Builds the dashboard for `subscriptions` as of `now`.
///
/// Bill lines count calendar days in UTC, so a line in the overdue list is
/// always classified [`BillingStatus::Overdue`].
#[must_use]
pub fn build_dashboard(
    subscriptions: &[Subscription],
    now: DateTime<Utc>,
    config: &EngineConfig,
) -> Dashboard {
    let today = now.date_naive();

    let overdue = bill_lines(overdue_bills(subscriptions, today), today);
    let upcoming = bill_lines(
        upcoming_bills(subscriptions, today, config.upcoming_horizon_days),
        today,
    );

    let ranking = rank_by_monthly_cost(subscriptions)
        .into_iter()
        .take(RANKING_LIMIT)
        .map(|sub| (sub.name.clone(), monthly_equivalent(sub)))
        .collect();

    Dashboard {
        currency: config.reporting_currency.clone(),
        active_count: subscriptions.iter().filter(|sub| sub.is_active).count(),
        total_monthly: total_monthly_spend(subscriptions),
        total_yearly: total_yearly_spend(subscriptions),
        overdue,
        upcoming,
        payments: upcoming_payments(subscriptions, today, config.payments_horizon_days),
        ranking,
        savings: savings_potential(subscriptions, config),
    }
}

/// Formats an amount with two decimals and its currency code.
///
/// # Returns
/// Formatted string like "599.00 RUB"
#[must_use]
pub fn format_amount(amount: Decimal, currency: &str) -> String {
    format!("{:.2} {currency}", amount.round_dp(2))
}

/// Describes how far away a charge is.
///
/// # Returns
/// "today", "tomorrow", "in N days", "yesterday" or "N days ago"
#[must_use]
pub fn format_days_until(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "tomorrow".to_string(),
        -1 => "yesterday".to_string(),
        d if d > 1 => format!("in {d} days"),
        d => format!("{} days ago", d.unsigned_abs()),
    }
}

fn format_bill_lines(title: &str, lines: &[BillLine]) -> String {
    if lines.is_empty() {
        return String::new();
    }

    let mut out = format!("\n{title}:\n");
    for line in lines {
        out.push_str(&format!(
            "  [{}] {} | {} | {}\n",
            line.status.as_str(),
            line.name,
            format_amount(line.amount, &line.currency),
            format_days_until(line.days_until)
        ));
    }
    out
}

fn format_payments(payments: &[PaymentDay], currency: &str) -> String {
    if payments.is_empty() {
        return String::new();
    }

    let mut out = "\nPayment schedule:\n".to_string();
    for day in payments {
        let names: Vec<&str> = day.subscriptions.iter().map(|p| p.name.as_str()).collect();
        out.push_str(&format!(
            "  {} | {} | {}\n",
            day.date.format("%Y-%m-%d"),
            format_amount(day.total_amount, currency),
            names.join(", ")
        ));
    }
    out
}

/// Renders a dashboard as a multi-line text summary.
#[must_use]
pub fn format_dashboard(dashboard: &Dashboard) -> String {
    let mut out = format!(
        "Subscriptions - {} active\n  Monthly: {} | Yearly: {}\n",
        dashboard.active_count,
        format_amount(dashboard.total_monthly, &dashboard.currency),
        format_amount(dashboard.total_yearly, &dashboard.currency)
    );

    out.push_str(&format_bill_lines("Overdue", &dashboard.overdue));
    out.push_str(&format_bill_lines("Upcoming", &dashboard.upcoming));
    out.push_str(&format_payments(&dashboard.payments, &dashboard.currency));

    if !dashboard.ranking.is_empty() {
        out.push_str("\nTop monthly costs:\n");
        for (rank, (name, cost)) in dashboard.ranking.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {name} - {}\n",
                rank + 1,
                format_amount(*cost, &dashboard.currency)
            ));
        }
    }

    if !dashboard.savings.suggestions.is_empty() {
        out.push_str(&format!(
            "\nPotential savings: {}\n",
            format_amount(dashboard.savings.potential_savings, &dashboard.currency)
        ));
        for suggestion in &dashboard.savings.suggestions {
            out.push_str(&format!("  - {suggestion}\n"));
        }
    }

    out
}
