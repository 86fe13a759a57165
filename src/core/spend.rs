//! Aggregate spend - totals, cost ranking, and savings analysis.
//!
//! Only active subscriptions count. Amounts are summed as-is: subscriptions
//! are assumed to share one reporting currency and are never converted.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
    config::engine::EngineConfig,
    core::billing::{monthly_equivalent, yearly_equivalent},
    models::{Frequency, Subscription},
};

/// Sum of monthly-equivalent cost over active subscriptions, saturating at [`Decimal::MAX`].
#[must_use]
pub fn total_monthly_spend(subscriptions: &[Subscription]) -> Decimal {
    active(subscriptions)
        .map(monthly_equivalent)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Sum of yearly-equivalent cost over active subscriptions, saturating at [`Decimal::MAX`].
#[must_use]
pub fn total_yearly_spend(subscriptions: &[Subscription]) -> Decimal {
    active(subscriptions)
        .map(yearly_equivalent)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Active subscriptions, most expensive per month first.
///
/// The sort is stable, so equal costs keep their input order.
#[must_use]
pub fn rank_by_monthly_cost(subscriptions: &[Subscription]) -> Vec<&Subscription> {
    let mut ranked: Vec<&Subscription> = active(subscriptions).collect();
    ranked.sort_by(|a, b| monthly_equivalent(b).cmp(&monthly_equivalent(a)));
    ranked
}

fn active(subscriptions: &[Subscription]) -> impl Iterator<Item = &Subscription> {
    subscriptions.iter().filter(|sub| sub.is_active)
}

/// Result of looking for cheaper ways to pay for the same subscriptions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SavingsReport {
    /// Raw sum of monthly plan prices
    pub total_monthly_spending: Decimal,
    /// Raw sum of yearly plan prices
    pub total_yearly_spending: Decimal,
    /// Yearly saving if every monthly plan moved to a discounted yearly plan
    pub potential_savings: Decimal,
    /// Number of active subscriptions
    pub subscription_count: usize,
    /// Number of distinct categories among them
    pub category_count: usize,
    /// Human-readable advice
    pub suggestions: Vec<String>,
}

/// Estimates how much could be saved by switching monthly plans to yearly ones.
///
/// Assumes yearly plans are discounted by `yearly_plan_discount_percent`.
#[must_use]
pub fn savings_potential(subscriptions: &[Subscription], config: &EngineConfig) -> SavingsReport {
    let discount = Decimal::from(config.yearly_plan_discount_percent) / Decimal::ONE_HUNDRED;

    let mut total_monthly_spending = Decimal::ZERO;
    let mut total_yearly_spending = Decimal::ZERO;
    let mut potential_savings = Decimal::ZERO;
    let mut categories = BTreeSet::new();
    let mut subscription_count = 0;

    for sub in active(subscriptions) {
        subscription_count += 1;
        categories.insert(sub.category_or_default());
        match sub.frequency {
            Frequency::Monthly => {
                total_monthly_spending = total_monthly_spending.saturating_add(sub.amount);
                potential_savings =
                    potential_savings.saturating_add(yearly_equivalent(sub).saturating_mul(discount));
            }
            Frequency::Yearly => {
                total_yearly_spending = total_yearly_spending.saturating_add(sub.amount);
            }
            Frequency::Daily | Frequency::Weekly | Frequency::OneTime => {}
        }
    }

    let mut suggestions = Vec::new();
    if subscription_count > config.consolidation_threshold {
        suggestions.push("Consider consolidating similar services".to_string());
    }
    if potential_savings > config.savings_suggestion_threshold {
        suggestions.push("Switch to yearly plans to save money".to_string());
    }

    debug!(
        subscription_count,
        %potential_savings,
        "Computed savings potential"
    );

    SavingsReport {
        total_monthly_spending,
        total_yearly_spending,
        potential_savings,
        subscription_count,
        category_count: categories.len(),
        suggestions,
    }
}
