//! Period analytics - what was charged in a calendar month or year.
//!
//! A recurring subscription counts toward a period when its billing date
//! falls inside it. A subscription flagged `has_trial` whose trial overlaps
//! the period also counts, but is charged nothing for that period. One-time purchases are
//! not part of period analytics.

use std::collections::BTreeMap;

use chrono::{Datelike, Months, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use crate::{
    core::schedule::recurrence_of,
    models::{Recurrence, Subscription},
};

/// Longest trend window accepted by [`monthly_trends`].
pub const MAX_TREND_MONTHS: u32 = 24;

/// An inclusive calendar range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
}

impl Period {
    /// The calendar month `month` of `year`; `None` for an invalid month.
    #[must_use]
    pub fn month(year: i32, month: u32) -> Option<Self> {
        let start = NaiveDate::from_ymd_opt(year, month, 1)?;
        let end = start.checked_add_months(Months::new(1))?.pred_opt()?;
        Some(Self { start, end })
    }

    /// The calendar year `year`.
    #[must_use]
    pub fn year(year: i32) -> Option<Self> {
        Some(Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1)?,
            end: NaiveDate::from_ymd_opt(year, 12, 31)?,
        })
    }

    /// Whether `date` falls inside the period.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Spend summary of one period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodAnalytics {
    /// First day of the period
    pub period_start: NaiveDate,
    /// Last day of the period
    pub period_end: NaiveDate,
    /// Amount charged during the period
    pub total_spent: Decimal,
    /// Reporting currency
    pub currency: String,
    /// Subscriptions that counted toward the period
    pub subscription_count: usize,
    /// Amount charged per category
    pub category_breakdown: BTreeMap<String, Decimal>,
}

impl PeriodAnalytics {
    fn empty(period: Period, currency: &str) -> Self {
        Self {
            period_start: period.start,
            period_end: period.end,
            total_spent: Decimal::ZERO,
            currency: currency.to_string(),
            subscription_count: 0,
            category_breakdown: BTreeMap::new(),
        }
    }

    fn record(&mut self, subscription: &Subscription, cost: Decimal) {
        self.total_spent = self.total_spent.saturating_add(cost);
        self.subscription_count += 1;
        let category = self
            .category_breakdown
            .entry(subscription.category_or_default().to_string())
            .or_insert(Decimal::ZERO);
        *category = category.saturating_add(cost);
    }
}

/// Charges in a calendar month, with trial periods charged at zero.
#[must_use]
pub fn monthly_analytics(
    subscriptions: &[Subscription],
    period: Period,
    currency: &str,
) -> PeriodAnalytics {
    let mut analytics = PeriodAnalytics::empty(period, currency);

    for sub in subscriptions.iter().filter(|sub| sub.is_active) {
        let Ok(Recurrence::Recurring { anchor, trial, .. }) = recurrence_of(sub) else {
            continue;
        };

        let trial_overlaps =
            sub.has_trial && trial.is_some_and(|t| t.overlaps(period.start, period.end));
        if trial_overlaps {
            analytics.record(sub, Decimal::ZERO);
        } else if anchor.is_some_and(|date| period.contains(date)) {
            analytics.record(sub, sub.amount);
        }
    }

    debug!(
        period_start = %period.start,
        subscription_count = analytics.subscription_count,
        total_spent = %analytics.total_spent,
        "Computed monthly analytics"
    );
    analytics
}

/// Charges in a calendar year: every active recurring subscription billed within it.
#[must_use]
pub fn yearly_analytics(
    subscriptions: &[Subscription],
    period: Period,
    currency: &str,
) -> PeriodAnalytics {
    let mut analytics = PeriodAnalytics::empty(period, currency);

    for sub in subscriptions.iter().filter(|sub| sub.is_active) {
        if let Ok(Recurrence::Recurring {
            anchor: Some(date), ..
        }) = recurrence_of(sub)
        {
            if period.contains(date) {
                analytics.record(sub, sub.amount);
            }
        }
    }

    analytics
}

/// Monthly analytics for the last `months` calendar months ending with the
/// month of `today`, oldest first. `months` is clamped to `1..=24`.
#[must_use]
pub fn monthly_trends(
    subscriptions: &[Subscription],
    today: NaiveDate,
    months: u32,
    currency: &str,
) -> Vec<PeriodAnalytics> {
    let months = months.clamp(1, MAX_TREND_MONTHS);
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };

    let mut trends: Vec<PeriodAnalytics> = (0..months)
        .filter_map(|back| current.checked_sub_months(Months::new(back)))
        .filter_map(|first| Period::month(first.year(), first.month()))
        .map(|period| monthly_analytics(subscriptions, period, currency))
        .collect();
    trends.reverse();
    trends
}
