//! Subscription record - the shape the backend hands to the engine.
//!
//! A subscription carries its price and billing terms. Optional descriptive
//! fields are treated as absent when missing. Timestamps the engine never
//! interprets (`created_at` and friends) are kept as opaque strings.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::recurrence::{DurationType, IntervalUnit};

/// Currency used when a record does not name one
pub const DEFAULT_CURRENCY: &str = "RUB";

/// Billing cadence of a subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Charged every day
    Daily,
    /// Charged every week
    Weekly,
    /// Charged every month
    #[default]
    Monthly,
    /// Charged every year
    Yearly,
    /// Paid once
    OneTime,
}

impl Frequency {
    /// Returns the wire name of this frequency.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::OneTime => "one_time",
        }
    }

    /// Interval unit a recurring frequency stands for, `None` for one-time.
    #[must_use]
    pub const fn interval_unit(self) -> Option<IntervalUnit> {
        match self {
            Self::Daily => Some(IntervalUnit::Day),
            Self::Weekly => Some(IntervalUnit::Week),
            Self::Monthly => Some(IntervalUnit::Month),
            Self::Yearly => Some(IntervalUnit::Year),
            Self::OneTime => None,
        }
    }

    /// Frequency corresponding to an interval unit.
    #[must_use]
    pub const fn from_interval_unit(unit: IntervalUnit) -> Self {
        match unit {
            IntervalUnit::Day => Self::Daily,
            IntervalUnit::Week => Self::Weekly,
            IntervalUnit::Month => Self::Monthly,
            IntervalUnit::Year => Self::Yearly,
        }
    }
}

/// Whether a subscription keeps charging or is paid once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionType {
    /// Charges on a cadence
    #[default]
    Recurring,
    /// Single payment covering a duration
    OneTime,
}

/// A tracked subscription.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    /// Unique identifier
    pub id: i64,
    /// Owning user
    pub user_id: i64,
    /// Display name (e.g. "Netflix")
    pub name: String,
    /// Free-form notes
    #[serde(default)]
    pub description: Option<String>,
    /// Company that bills the subscription
    #[serde(default)]
    pub provider: Option<String>,
    /// Logo shown next to the name
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Provider website
    #[serde(default)]
    pub website_url: Option<String>,
    /// Spending category, `None` is reported as "uncategorized"
    #[serde(default)]
    pub category: Option<String>,
    /// Price per charge
    pub amount: Decimal,
    /// ISO 4217 code, never converted
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Billing cadence; legacy records carry only this
    #[serde(default)]
    pub frequency: Frequency,
    /// Recurring or one-time
    #[serde(default)]
    pub subscription_type: SubscriptionType,
    /// Next charge as sent by the backend; may be missing, past or malformed
    #[serde(default)]
    pub next_billing_date: Option<String>,
    /// Custom interval unit, overrides the one implied by `frequency`
    #[serde(default)]
    pub interval_unit: Option<IntervalUnit>,
    /// Units between charges, at least one
    #[serde(default = "default_interval_count")]
    pub interval_count: u32,
    /// Inactive subscriptions are excluded from totals and bill lists
    #[serde(default = "default_active")]
    pub is_active: bool,
    /// Whether the trial dates apply
    #[serde(default)]
    pub has_trial: bool,
    /// First day of the free trial
    #[serde(default)]
    pub trial_start_date: Option<NaiveDate>,
    /// Last day of the free trial
    #[serde(default)]
    pub trial_end_date: Option<NaiveDate>,
    /// Start of a one-time purchase
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Validity unit of a one-time purchase
    #[serde(default)]
    pub duration_type: Option<DurationType>,
    /// Validity length in `duration_type` units
    #[serde(default)]
    pub duration_value: Option<u32>,
    /// Expiry of a one-time purchase
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    /// Backend creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
    /// Backend last-update timestamp
    #[serde(default)]
    pub updated_at: Option<String>,
    /// When the subscription was cancelled, if it was
    #[serde(default)]
    pub cancelled_at: Option<String>,
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

const fn default_interval_count() -> u32 {
    1
}

const fn default_active() -> bool {
    true
}

impl Subscription {
    /// Creates an active recurring subscription with every optional field absent.
    #[must_use]
    pub fn new(id: i64, user_id: i64, name: String, amount: Decimal, frequency: Frequency) -> Self {
        let subscription_type = if frequency == Frequency::OneTime {
            SubscriptionType::OneTime
        } else {
            SubscriptionType::Recurring
        };

        Self {
            id,
            user_id,
            name,
            description: None,
            provider: None,
            logo_url: None,
            website_url: None,
            category: None,
            amount,
            currency: default_currency(),
            frequency,
            subscription_type,
            next_billing_date: None,
            interval_unit: None,
            interval_count: default_interval_count(),
            is_active: true,
            has_trial: false,
            trial_start_date: None,
            trial_end_date: None,
            start_date: None,
            duration_type: None,
            duration_value: None,
            end_date: None,
            created_at: None,
            updated_at: None,
            cancelled_at: None,
        }
    }

    /// True for one-time purchases, whichever of the two fields says so.
    #[must_use]
    pub fn is_one_time(&self) -> bool {
        self.subscription_type == SubscriptionType::OneTime || self.frequency == Frequency::OneTime
    }

    /// Category name used for breakdowns.
    #[must_use]
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or("uncategorized")
    }
}
