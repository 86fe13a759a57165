//! Shared test utilities for `subtrack`.
//!
//! Helpers for building subscriptions with sensible defaults and a fixed
//! clock, so date-dependent tests do not depend on when they run.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::models::{Frequency, Subscription};

/// Owner of every test subscription.
pub const TEST_USER_ID: i64 = 1;

/// Builds a calendar date, panicking on an invalid one.
#[allow(clippy::unwrap_used)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// The instant all tests treat as "now": 2024-06-15T10:00:00Z.
#[allow(clippy::unwrap_used)]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap()
}

/// The UTC calendar day of [`fixed_now`].
pub fn fixed_today() -> NaiveDate {
    date(2024, 6, 15)
}

/// Creates a test subscription with custom parameters.
///
/// # Defaults
/// * `user_id`: [`TEST_USER_ID`]
/// * `currency`: "RUB"
/// * `is_active`: true
/// * `next_billing_date`: None
pub fn test_subscription(id: i64, name: &str, amount: Decimal, frequency: Frequency) -> Subscription {
    Subscription::new(id, TEST_USER_ID, name.to_string(), amount, frequency)
}

/// Active monthly subscription with no billing date.
pub fn monthly(name: &str, amount: Decimal) -> Subscription {
    test_subscription(1, name, amount, Frequency::Monthly)
}

/// Active yearly subscription with no billing date.
pub fn yearly(name: &str, amount: Decimal) -> Subscription {
    test_subscription(1, name, amount, Frequency::Yearly)
}

/// One-time purchase starting on `start_date`.
pub fn one_time(name: &str, amount: Decimal, start_date: NaiveDate) -> Subscription {
    let mut sub = test_subscription(1, name, amount, Frequency::OneTime);
    sub.start_date = Some(start_date);
    sub
}

/// Sets the next billing date `offset_days` from [`fixed_today`].
pub fn billed_in(sub: Subscription, offset_days: i64) -> Subscription {
    billed_on(sub, fixed_today() + chrono::Duration::days(offset_days))
}

/// Sets the next billing date to `day`, formatted as `YYYY-MM-DD`.
pub fn billed_on(mut sub: Subscription, day: NaiveDate) -> Subscription {
    sub.next_billing_date = Some(day.format("%Y-%m-%d").to_string());
    sub
}

/// Marks the subscription cancelled.
pub fn inactive(mut sub: Subscription) -> Subscription {
    sub.is_active = false;
    sub
}
