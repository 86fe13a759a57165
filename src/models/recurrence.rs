//! Recurrence model - how and when a subscription charges.
//!
//! The flat `frequency`/`subscription_type` fields of a [`Subscription`] are
//! folded into a [`Recurrence`] value: either a recurring interval with an
//! optional trial window, or a one-time purchase valid for a duration.
//!
//! [`Subscription`]: super::subscription::Subscription

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Calendar unit a recurring interval is measured in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntervalUnit {
    /// Calendar days
    Day,
    /// Seven-day weeks
    Week,
    /// Calendar months, clamped to the last day of shorter months
    Month,
    /// Calendar years
    Year,
}

impl IntervalUnit {
    /// Adds `n` units to `date`, returning `None` on calendar overflow.
    #[must_use]
    pub fn add(self, date: NaiveDate, n: u32) -> Option<NaiveDate> {
        match self {
            Self::Day => date.checked_add_days(Days::new(u64::from(n))),
            Self::Week => date.checked_add_days(Days::new(u64::from(n) * 7)),
            Self::Month => date.checked_add_months(Months::new(n)),
            Self::Year => date.checked_add_months(Months::new(n.checked_mul(12)?)),
        }
    }
}

/// Every `count` `unit`s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval {
    /// Calendar unit
    pub unit: IntervalUnit,
    /// Number of units between charges, at least one
    pub count: u32,
}

impl Interval {
    /// Creates an interval, rejecting a zero count.
    pub fn new(unit: IntervalUnit, count: u32) -> Result<Self> {
        if count == 0 {
            return Err(Error::InvalidPayload {
                message: "interval_count must be at least 1".to_string(),
            });
        }
        Ok(Self { unit, count })
    }

    /// Date of the `k`-th charge after `anchor` (the anchor itself is `k = 0`).
    ///
    /// Always computed from the anchor so month-end clamping does not drift.
    #[must_use]
    pub fn nth_after(self, anchor: NaiveDate, k: u32) -> Option<NaiveDate> {
        self.unit.add(anchor, self.count.checked_mul(k)?)
    }
}

/// Free period before the first real charge. Both ends are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl TrialWindow {
    /// Creates a trial window; `end` must be strictly after `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end <= start {
            return Err(Error::InvalidTrialWindow {
                message: format!("trial end {end} must be after trial start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// First day of the trial
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the trial
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls within the trial.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether the trial shares at least one day with `[from, to]`.
    #[must_use]
    pub fn overlaps(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.start <= to && self.end >= from
    }
}

/// Wire name of a one-time duration unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationType {
    /// Counted in days
    Days,
    /// Counted in weeks
    Weeks,
    /// Counted in calendar months
    Months,
    /// Counted in calendar years
    Years,
    /// Never expires
    Indefinite,
}

/// How long a one-time purchase stays valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "duration_type", content = "duration_value", rename_all = "snake_case")]
pub enum Duration {
    /// Valid for this many days
    Days(u32),
    /// Valid for this many weeks
    Weeks(u32),
    /// Valid for this many calendar months
    Months(u32),
    /// Valid for this many calendar years
    Years(u32),
    /// Never expires
    Indefinite,
}

impl Duration {
    /// Builds a duration from its wire parts. Finite durations need a value of at least one.
    pub fn from_parts(kind: DurationType, value: Option<u32>) -> Result<Self> {
        if kind == DurationType::Indefinite {
            return Ok(Self::Indefinite);
        }

        let value = match value {
            Some(v) if v >= 1 => v,
            other => {
                return Err(Error::InvalidDuration {
                    message: format!("duration_value must be at least 1, got {other:?}"),
                });
            }
        };

        Ok(match kind {
            DurationType::Days => Self::Days(value),
            DurationType::Weeks => Self::Weeks(value),
            DurationType::Months => Self::Months(value),
            DurationType::Years => Self::Years(value),
            DurationType::Indefinite => Self::Indefinite,
        })
    }

    /// Date the purchase expires when started on `start`; `None` if it never does.
    #[must_use]
    pub fn end_from(self, start: NaiveDate) -> Option<NaiveDate> {
        match self {
            Self::Days(n) => IntervalUnit::Day.add(start, n),
            Self::Weeks(n) => IntervalUnit::Week.add(start, n),
            Self::Months(n) => IntervalUnit::Month.add(start, n),
            Self::Years(n) => IntervalUnit::Year.add(start, n),
            Self::Indefinite => None,
        }
    }
}

/// Charging pattern of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "subscription_type", rename_all = "snake_case")]
pub enum Recurrence {
    /// Charges every interval starting at `anchor`
    Recurring {
        /// Charge cadence
        interval: Interval,
        /// Next known charge date; `None` when the record has no usable date
        anchor: Option<NaiveDate>,
        /// Free period before `anchor`
        trial: Option<TrialWindow>,
    },
    /// Paid once on `start_date`
    OneTime {
        /// Purchase date
        start_date: NaiveDate,
        /// Validity period
        duration: Duration,
    },
}

impl Recurrence {
    /// Trial window, if this is a recurring subscription with one.
    #[must_use]
    pub const fn trial(&self) -> Option<TrialWindow> {
        match self {
            Self::Recurring { trial, .. } => *trial,
            Self::OneTime { .. } => None,
        }
    }

    /// Expiry date of a one-time purchase. Recurring subscriptions never expire.
    #[must_use]
    pub fn end_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Recurring { .. } => None,
            Self::OneTime {
                start_date,
                duration,
            } => duration.end_from(*start_date),
        }
    }

    /// Whether a one-time purchase has run out before `today`.
    #[must_use]
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.end_date().is_some_and(|end| end < today)
    }

    /// Whether `today` is inside the trial window.
    #[must_use]
    pub fn in_trial(&self, today: NaiveDate) -> bool {
        self.trial().is_some_and(|trial| trial.contains(today))
    }
}
