//! Bill lists - which active subscriptions charge soon or are overdue.
//!
//! Dates are compared at calendar-day granularity in UTC. A subscription
//! without a usable `next_billing_date` appears in no list.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::{core::billing::billing_date_of, models::Subscription};

/// Default look-ahead for [`upcoming_bills`].
pub const DEFAULT_HORIZON_DAYS: u32 = 7;

fn billing_day(subscription: &Subscription) -> Option<NaiveDate> {
    billing_date_of(subscription).map(|ts| ts.date_naive())
}

/// Active subscriptions billed within `[today, today + horizon_days]`.
///
/// Returned in input order; callers sort as they see fit.
#[must_use]
pub fn upcoming_bills(
    subscriptions: &[Subscription],
    today: NaiveDate,
    horizon_days: u32,
) -> Vec<&Subscription> {
    let horizon = today
        .checked_add_days(Days::new(u64::from(horizon_days)))
        .unwrap_or(NaiveDate::MAX);

    subscriptions
        .iter()
        .filter(|sub| sub.is_active)
        .filter(|sub| billing_day(sub).is_some_and(|day| today <= day && day <= horizon))
        .collect()
}

/// Active subscriptions whose billing date is strictly before `today`.
#[must_use]
pub fn overdue_bills(subscriptions: &[Subscription], today: NaiveDate) -> Vec<&Subscription> {
    subscriptions
        .iter()
        .filter(|sub| sub.is_active)
        .filter(|sub| billing_day(sub).is_some_and(|day| day < today))
        .collect()
}

/// One line of a payment schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledPayment {
    /// Subscription identifier
    pub id: i64,
    /// Subscription name
    pub name: String,
    /// Amount charged
    pub amount: Decimal,
    /// Currency of the amount
    pub currency: String,
    /// Category, if any
    pub category: Option<String>,
}

/// All payments falling on one day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentDay {
    /// Charge date
    pub date: NaiveDate,
    /// Sum of amounts charged that day
    pub total_amount: Decimal,
    /// Number of charges that day
    pub count: usize,
    /// The charges themselves, in input order
    pub subscriptions: Vec<ScheduledPayment>,
}

/// Upcoming charges within `days` days, grouped by date in ascending order.
#[must_use]
pub fn upcoming_payments(
    subscriptions: &[Subscription],
    today: NaiveDate,
    days: u32,
) -> Vec<PaymentDay> {
    let mut by_date: BTreeMap<NaiveDate, Vec<ScheduledPayment>> = BTreeMap::new();

    for sub in upcoming_bills(subscriptions, today, days) {
        let Some(date) = billing_day(sub) else {
            continue;
        };
        by_date.entry(date).or_default().push(ScheduledPayment {
            id: sub.id,
            name: sub.name.clone(),
            amount: sub.amount,
            currency: sub.currency.clone(),
            category: sub.category.clone(),
        });
    }

    by_date
        .into_iter()
        .map(|(date, payments)| PaymentDay {
            date,
            total_amount: payments
                .iter()
                .map(|p| p.amount)
                .fold(Decimal::ZERO, Decimal::saturating_add),
            count: payments.len(),
            subscriptions: payments,
        })
        .collect()
}

/// Calendar colouring bucket for a day with charges on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUrgency {
    /// The day has passed
    Past,
    /// Within three days
    Urgent,
    /// Four to seven days away
    Soon,
    /// Further out
    Later,
}

/// Buckets a day-count for calendar display.
#[must_use]
pub const fn calendar_urgency(days_until: i64) -> CalendarUrgency {
    match days_until {
        i64::MIN..=-1 => CalendarUrgency::Past,
        0..=3 => CalendarUrgency::Urgent,
        4..=7 => CalendarUrgency::Soon,
        _ => CalendarUrgency::Later,
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    fn names<'a>(subs: &[&'a Subscription]) -> Vec<&'a str> {
        subs.iter().map(|sub| sub.name.as_str()).collect()
    }

    #[test]
    fn test_upcoming_within_horizon() {
        let subs = vec![billed_in(monthly("soon", dec!(10)), 5)];
        let today = fixed_today();
        assert_eq!(names(&upcoming_bills(&subs, today, 7)), vec!["soon"]);
        assert!(overdue_bills(&subs, today).is_empty());
    }

    #[test]
    fn test_upcoming_horizon_is_inclusive() {
        let subs = vec![
            billed_in(monthly("today", dec!(1)), 0),
            billed_in(monthly("edge", dec!(1)), 7),
            billed_in(monthly("beyond", dec!(1)), 8),
        ];
        let today = fixed_today();
        assert_eq!(
            names(&upcoming_bills(&subs, today, DEFAULT_HORIZON_DAYS)),
            vec!["today", "edge"]
        );
    }

    #[test]
    fn test_overdue_yesterday() {
        let subs = vec![billed_in(monthly("late", dec!(10)), -1)];
        let today = fixed_today();
        assert_eq!(names(&overdue_bills(&subs, today)), vec!["late"]);
        assert!(upcoming_bills(&subs, today, 7).is_empty());
    }

    #[test]
    fn test_inactive_in_no_list() {
        let subs = vec![
            inactive(billed_in(monthly("late", dec!(10)), -1)),
            inactive(billed_in(monthly("soon", dec!(10)), 2)),
        ];
        let today = fixed_today();
        assert!(overdue_bills(&subs, today).is_empty());
        assert!(upcoming_bills(&subs, today, 7).is_empty());
    }

    #[test]
    fn test_missing_or_malformed_date_in_no_list() {
        let mut malformed = monthly("malformed", dec!(10));
        malformed.next_billing_date = Some("tomorrow-ish".into());
        let subs = vec![monthly("missing", dec!(10)), malformed];
        let today = fixed_today();
        assert!(overdue_bills(&subs, today).is_empty());
        assert!(upcoming_bills(&subs, today, 365).is_empty());
    }

    #[test]
    fn test_upcoming_payments_grouped_by_date() {
        let mut music = billed_in(monthly("Spotify", dec!(169)), 3);
        music.category = Some("music".into());
        let subs = vec![
            billed_in(monthly("Netflix", dec!(599)), 10),
            music,
            billed_in(yearly("Cloud", dec!(1200)), 3),
            billed_in(monthly("Far", dec!(1)), 40),
        ];

        let days = upcoming_payments(&subs, fixed_today(), 30);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, date(2024, 6, 18));
        assert_eq!(days[0].count, 2);
        assert_eq!(days[0].total_amount, dec!(1369));
        assert_eq!(days[0].subscriptions[0].name, "Spotify");
        assert_eq!(days[0].subscriptions[0].category.as_deref(), Some("music"));
        assert_eq!(days[1].date, date(2024, 6, 25));
        assert_eq!(days[1].total_amount, dec!(599));
    }

    #[test]
    fn test_calendar_urgency_buckets() {
        assert_eq!(calendar_urgency(-1), CalendarUrgency::Past);
        assert_eq!(calendar_urgency(0), CalendarUrgency::Urgent);
        assert_eq!(calendar_urgency(3), CalendarUrgency::Urgent);
        assert_eq!(calendar_urgency(4), CalendarUrgency::Soon);
        assert_eq!(calendar_urgency(7), CalendarUrgency::Soon);
        assert_eq!(calendar_urgency(8), CalendarUrgency::Later);
    }
}
