//! Billing date arithmetic and cost normalization.
//!
//! These functions are total: they never fail and never panic, so callers can
//! render their results directly. A billing date that does not parse is
//! treated as "no date" and logged, never surfaced as an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{Frequency, Subscription};

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Last day-count (inclusive) that still classifies as [`BillingStatus::Due`].
pub const DUE_WINDOW_DAYS: i64 = 3;

/// Months in a year, used to convert between monthly and yearly cost.
const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Urgency of the next charge, derived from days until billing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingStatus {
    /// The charge date has passed
    Overdue,
    /// Charge within the next [`DUE_WINDOW_DAYS`] days, today included
    Due,
    /// Charge further out
    Upcoming,
}

impl BillingStatus {
    /// Returns the wire name of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Overdue => "overdue",
            Self::Due => "due",
            Self::Upcoming => "upcoming",
        }
    }
}

/// Parses a billing date as the backend sends it.
///
/// Accepts RFC 3339 timestamps, naive `YYYY-MM-DDTHH:MM:SS[.f]` or
/// `YYYY-MM-DD HH:MM:SS[.f]` timestamps (read as UTC), and plain
/// `YYYY-MM-DD` dates (midnight UTC).
#[must_use]
pub fn parse_billing_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parsed next billing date of a subscription, `None` when missing or malformed.
#[must_use]
pub fn billing_date_of(subscription: &Subscription) -> Option<DateTime<Utc>> {
    let raw = subscription.next_billing_date.as_deref()?;
    let parsed = parse_billing_date(raw);
    if parsed.is_none() {
        warn!(
            subscription_id = subscription.id,
            "Invalid next_billing_date: {:?}", raw
        );
    }
    parsed
}

/// Whole days from `now` until `billing_date`, rounded up.
///
/// A charge later today is 0 days away; one that fell at midnight yesterday is -1.
#[must_use]
pub fn days_until(billing_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (billing_date - now).num_milliseconds();
    let whole = millis.div_euclid(MILLIS_PER_DAY);
    if millis.rem_euclid(MILLIS_PER_DAY) == 0 {
        whole
    } else {
        whole + 1
    }
}

/// Calendar days from `today` to `day`: 0 for today, -1 for yesterday.
///
/// Bill lists and their lines use this so that a charge is overdue exactly
/// when its UTC calendar day has passed.
#[must_use]
pub fn calendar_days_until(day: NaiveDate, today: NaiveDate) -> i64 {
    (day - today).num_days()
}

/// Days until the raw `next_billing_date`, or 0 if it does not parse.
#[must_use]
pub fn days_until_billing(next_billing_date: &str, now: DateTime<Utc>) -> i64 {
    parse_billing_date(next_billing_date).map_or_else(
        || {
            warn!("Invalid date: {:?}", next_billing_date);
            0
        },
        |date| days_until(date, now),
    )
}

/// Classifies a day-count: negative is overdue, 0..=3 is due, anything later upcoming.
#[must_use]
pub const fn billing_status(days_until_billing: i64) -> BillingStatus {
    if days_until_billing < 0 {
        BillingStatus::Overdue
    } else if days_until_billing <= DUE_WINDOW_DAYS {
        BillingStatus::Due
    } else {
        BillingStatus::Upcoming
    }
}

/// Status of a subscription's next charge; `None` when it has no usable date.
#[must_use]
pub fn status_of(subscription: &Subscription, now: DateTime<Utc>) -> Option<BillingStatus> {
    billing_date_of(subscription).map(|date| billing_status(days_until(date, now)))
}

/// Cost per month. Only monthly and yearly cadences contribute.
#[must_use]
pub fn monthly_equivalent(subscription: &Subscription) -> Decimal {
    match subscription.frequency {
        Frequency::Monthly => subscription.amount,
        Frequency::Yearly => subscription.amount / MONTHS_PER_YEAR,
        Frequency::Daily | Frequency::Weekly | Frequency::OneTime => Decimal::ZERO,
    }
}

/// Cost per year. Only monthly and yearly cadences contribute.
///
/// Saturates at [`Decimal::MAX`] instead of overflowing.
#[must_use]
pub fn yearly_equivalent(subscription: &Subscription) -> Decimal {
    match subscription.frequency {
        Frequency::Yearly => subscription.amount,
        Frequency::Monthly => subscription.amount.saturating_mul(MONTHS_PER_YEAR),
        Frequency::Daily | Frequency::Weekly | Frequency::OneTime => Decimal::ZERO,
    }
}
