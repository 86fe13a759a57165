//! Intake validation - checks subscription data at the system boundary.
//!
//! New subscriptions arrive as a loosely-typed [`SubscriptionPayload`] from
//! the creation form; stored subscriptions arrive as JSON exports from the
//! backend. Both are validated here so malformed records are rejected before
//! any billing calculation sees them.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{
    config::engine::EngineConfig,
    core::{
        billing::parse_billing_date,
        schedule::{recurrence_of, trial_window_of},
    },
    errors::{Error, Result},
    models::{
        DurationType, Frequency, IntervalUnit, Recurrence, Subscription, SubscriptionType,
        subscription::DEFAULT_CURRENCY,
    },
};

/// Subscription as submitted by a user. Only `name` and `amount` are required.
#[derive(Debug, Clone, Deserialize)]
pub struct SubscriptionPayload {
    /// Display name, trimmed; must not be blank
    pub name: String,
    /// Price per charge; must be positive
    pub amount: Decimal,
    /// Free-form notes
    #[serde(default)]
    pub description: Option<String>,
    /// ISO 4217 code, defaults to RUB
    #[serde(default)]
    pub currency: Option<String>,
    /// `recurring` (default) or `one_time`
    #[serde(default)]
    pub subscription_type: Option<String>,
    /// First charge; required for recurring subscriptions
    #[serde(default)]
    pub next_billing_date: Option<String>,
    /// Legacy cadence; derived from `interval_unit` when absent
    #[serde(default)]
    pub frequency: Option<Frequency>,
    /// `day`, `week`, `month` or `year`
    #[serde(default)]
    pub interval_unit: Option<String>,
    /// Units between charges, defaults to 1
    #[serde(default)]
    pub interval_count: Option<u32>,
    /// Enables the trial dates
    #[serde(default)]
    pub has_trial: Option<bool>,
    /// First day of the free trial
    #[serde(default)]
    pub trial_start_date: Option<NaiveDate>,
    /// Last day of the free trial, before the first charge
    #[serde(default)]
    pub trial_end_date: Option<NaiveDate>,
    /// Purchase date; required for one-time purchases
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// `days`, `weeks`, `months`, `years` or `indefinite`
    #[serde(default)]
    pub duration_type: Option<String>,
    /// Validity length, required unless indefinite
    #[serde(default)]
    pub duration_value: Option<u32>,
    /// Spending category
    #[serde(default)]
    pub category: Option<String>,
    /// Company that bills the subscription
    #[serde(default)]
    pub provider: Option<String>,
    /// Logo shown next to the name
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Provider website
    #[serde(default)]
    pub website_url: Option<String>,
}

fn parse_subscription_type(raw: Option<&str>) -> Result<SubscriptionType> {
    match raw.map(str::trim) {
        None | Some("recurring") => Ok(SubscriptionType::Recurring),
        Some("one_time") => Ok(SubscriptionType::OneTime),
        Some(other) => Err(Error::InvalidPayload {
            message: format!("subscription_type must be one of: recurring, one_time (got {other:?})"),
        }),
    }
}

fn parse_interval_unit(raw: &str) -> Result<IntervalUnit> {
    match raw.trim() {
        "day" => Ok(IntervalUnit::Day),
        "week" => Ok(IntervalUnit::Week),
        "month" => Ok(IntervalUnit::Month),
        "year" => Ok(IntervalUnit::Year),
        other => Err(Error::InvalidPayload {
            message: format!("interval_unit must be one of: day, week, month, year (got {other:?})"),
        }),
    }
}

fn parse_duration_type(raw: &str) -> Result<DurationType> {
    match raw.trim() {
        "days" => Ok(DurationType::Days),
        "weeks" => Ok(DurationType::Weeks),
        "months" => Ok(DurationType::Months),
        "years" => Ok(DurationType::Years),
        "indefinite" => Ok(DurationType::Indefinite),
        other => Err(Error::InvalidDuration {
            message: format!(
                "duration_type must be one of: days, weeks, months, years, indefinite (got {other:?})"
            ),
        }),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SubscriptionPayload {
    /// Validates the payload and builds the subscription it describes.
    ///
    /// # Errors
    /// Returns an error if:
    /// - the name is blank or the amount is not positive
    /// - the currency is not in `config.allowed_currencies`
    /// - `subscription_type`, `interval_unit` or `duration_type` is unknown
    /// - a recurring payload has no parseable `next_billing_date`
    /// - trial dates are missing or not `start < end < next_billing_date`
    /// - a one-time payload has no start date or a finite duration below one
    pub fn into_subscription(
        self,
        id: i64,
        user_id: i64,
        config: &EngineConfig,
    ) -> Result<Subscription> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(Error::InvalidPayload {
                message: "Subscription name cannot be empty".to_string(),
            });
        }

        if self.amount <= Decimal::ZERO {
            return Err(Error::InvalidAmount {
                amount: self.amount,
            });
        }

        let currency = self
            .currency
            .map_or_else(|| DEFAULT_CURRENCY.to_string(), |c| c.trim().to_uppercase());
        if !config.allowed_currencies.iter().any(|c| *c == currency) {
            return Err(Error::UnsupportedCurrency { currency });
        }

        let subscription_type = parse_subscription_type(self.subscription_type.as_deref())?;

        let mut sub = Subscription::new(id, user_id, name, self.amount, Frequency::Monthly);
        sub.currency = currency;
        sub.subscription_type = subscription_type;
        sub.description = non_blank(self.description);
        sub.category = non_blank(self.category);
        sub.provider = non_blank(self.provider);
        sub.logo_url = non_blank(self.logo_url);
        sub.website_url = non_blank(self.website_url);

        match subscription_type {
            SubscriptionType::Recurring => {
                let raw_date = self.next_billing_date.ok_or_else(|| Error::InvalidPayload {
                    message: "next_billing_date is required for recurring subscriptions"
                        .to_string(),
                })?;
                if parse_billing_date(&raw_date).is_none() {
                    return Err(Error::InvalidDate {
                        field: "next_billing_date",
                        value: raw_date,
                    });
                }

                let unit = self
                    .interval_unit
                    .as_deref()
                    .map(parse_interval_unit)
                    .transpose()?;
                sub.frequency = match (self.frequency, unit) {
                    (_, Some(unit)) => Frequency::from_interval_unit(unit),
                    (Some(Frequency::OneTime), None) => {
                        return Err(Error::InvalidPayload {
                            message: "recurring subscription cannot have frequency one_time"
                                .to_string(),
                        });
                    }
                    (Some(frequency), None) => frequency,
                    (None, None) => Frequency::Monthly,
                };
                sub.interval_unit = unit;
                sub.interval_count = self.interval_count.unwrap_or(1);
                sub.next_billing_date = Some(raw_date);
                sub.has_trial = self.has_trial.unwrap_or(false);
                if sub.has_trial {
                    sub.trial_start_date = self.trial_start_date;
                    sub.trial_end_date = self.trial_end_date;
                }
            }
            SubscriptionType::OneTime => {
                sub.frequency = Frequency::OneTime;
                sub.start_date = Some(self.start_date.ok_or_else(|| Error::InvalidPayload {
                    message: "start_date is required for one-time subscriptions".to_string(),
                })?);
                let duration_type = self
                    .duration_type
                    .as_deref()
                    .map(parse_duration_type)
                    .transpose()?
                    .unwrap_or(DurationType::Indefinite);
                sub.duration_type = Some(duration_type);
                sub.duration_value = if duration_type == DurationType::Indefinite {
                    None
                } else {
                    self.duration_value
                };
            }
        }

        validate_subscription(&sub)?;
        if let Ok(recurrence) = recurrence_of(&sub) {
            sub.end_date = recurrence.end_date();
        }

        debug!(
            subscription_id = sub.id,
            frequency = sub.frequency.as_str(),
            "Accepted subscription payload"
        );
        Ok(sub)
    }
}

/// Checks the structural invariants of a subscription record.
///
/// Recurrence fields must describe a valid variant, and a trial window must
/// end strictly before the first charge.
///
/// # Errors
/// Returns the first invariant the record violates.
pub fn validate_subscription(subscription: &Subscription) -> Result<()> {
    if let Some(raw) = subscription.next_billing_date.as_deref() {
        if parse_billing_date(raw).is_none() {
            return Err(Error::InvalidDate {
                field: "next_billing_date",
                value: raw.to_string(),
            });
        }
    }

    let recurrence = recurrence_of(subscription)?;

    if let (Some(trial), Recurrence::Recurring { anchor, .. }) =
        (trial_window_of(subscription)?, recurrence)
    {
        let anchor = anchor.ok_or_else(|| Error::InvalidTrialWindow {
            message: "trial requires a next_billing_date".to_string(),
        })?;
        if trial.end() >= anchor {
            return Err(Error::InvalidTrialWindow {
                message: format!(
                    "trial end {} must be before the first charge on {anchor}",
                    trial.end()
                ),
            });
        }
    }

    Ok(())
}

/// Parses a backend JSON export and rejects it if any record is malformed.
///
/// # Errors
/// Returns an error if the JSON does not match the subscription shape or any
/// record fails [`validate_subscription`].
pub fn parse_subscriptions(json: &str) -> Result<Vec<Subscription>> {
    let subscriptions: Vec<Subscription> = serde_json::from_str(json)?;

    for sub in &subscriptions {
        validate_subscription(sub)
            .inspect_err(|e| warn!(subscription_id = sub.id, "Rejected subscription: {}", e))?;
    }

    debug!("Parsed {} subscriptions", subscriptions.len());
    Ok(subscriptions)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;
    use rust_decimal_macros::dec;

    fn payload(json: &str) -> SubscriptionPayload {
        serde_json::from_str(json).unwrap()
    }

    fn accept(json: &str) -> Result<Subscription> {
        payload(json).into_subscription(1, 42, &EngineConfig::default())
    }

    #[test]
    fn test_minimal_recurring_payload() {
        let sub = accept(r#"{"name": " Netflix ", "amount": 599, "next_billing_date": "2024-07-01"}"#)
            .unwrap();
        assert_eq!(sub.name, "Netflix");
        assert_eq!(sub.user_id, 42);
        assert_eq!(sub.currency, "RUB");
        assert_eq!(sub.frequency, Frequency::Monthly);
        assert_eq!(sub.interval_count, 1);
        assert!(sub.is_active);
        assert!(sub.end_date.is_none());
    }

    #[test]
    fn test_rejects_blank_name_and_bad_amount() {
        assert!(matches!(
            accept(r#"{"name": "  ", "amount": 1, "next_billing_date": "2024-07-01"}"#),
            Err(Error::InvalidPayload { .. })
        ));
        assert!(matches!(
            accept(r#"{"name": "X", "amount": 0, "next_billing_date": "2024-07-01"}"#),
            Err(Error::InvalidAmount { .. })
        ));
        assert!(matches!(
            accept(r#"{"name": "X", "amount": -5, "next_billing_date": "2024-07-01"}"#),
            Err(Error::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_rejects_unknown_currency_and_type() {
        assert!(matches!(
            accept(r#"{"name": "X", "amount": 1, "currency": "JPY", "next_billing_date": "2024-07-01"}"#),
            Err(Error::UnsupportedCurrency { .. })
        ));
        assert!(matches!(
            accept(r#"{"name": "X", "amount": 1, "subscription_type": "lifetime"}"#),
            Err(Error::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_recurring_requires_valid_date() {
        assert!(matches!(
            accept(r#"{"name": "X", "amount": 1}"#),
            Err(Error::InvalidPayload { .. })
        ));
        assert!(matches!(
            accept(r#"{"name": "X", "amount": 1, "next_billing_date": "soon"}"#),
            Err(Error::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_custom_interval_sets_frequency() {
        let sub = accept(
            r#"{"name": "Gym", "amount": 3000, "next_billing_date": "2024-07-01",
                "interval_unit": "week", "interval_count": 2}"#,
        )
        .unwrap();
        assert_eq!(sub.frequency, Frequency::Weekly);
        assert_eq!(sub.interval_unit, Some(IntervalUnit::Week));
        assert_eq!(sub.interval_count, 2);

        assert!(matches!(
            accept(r#"{"name": "Gym", "amount": 1, "next_billing_date": "2024-07-01", "interval_unit": "fortnight"}"#),
            Err(Error::InvalidPayload { .. })
        ));
        assert!(matches!(
            accept(r#"{"name": "Gym", "amount": 1, "next_billing_date": "2024-07-01", "interval_count": 0}"#),
            Err(Error::InvalidPayload { .. })
        ));
    }

    #[test]
    fn test_trial_window_validation() {
        let ok = accept(
            r#"{"name": "Trial", "amount": 299, "next_billing_date": "2024-07-01",
                "has_trial": true, "trial_start_date": "2024-06-10", "trial_end_date": "2024-06-17"}"#,
        )
        .unwrap();
        assert!(ok.has_trial);

        let reversed = accept(
            r#"{"name": "Trial", "amount": 299, "next_billing_date": "2024-07-01",
                "has_trial": true, "trial_start_date": "2024-06-17", "trial_end_date": "2024-06-10"}"#,
        );
        assert!(matches!(reversed, Err(Error::InvalidTrialWindow { .. })));

        let past_first_charge = accept(
            r#"{"name": "Trial", "amount": 299, "next_billing_date": "2024-07-01",
                "has_trial": true, "trial_start_date": "2024-06-17", "trial_end_date": "2024-07-01"}"#,
        );
        assert!(matches!(past_first_charge, Err(Error::InvalidTrialWindow { .. })));

        let missing = accept(
            r#"{"name": "Trial", "amount": 299, "next_billing_date": "2024-07-01", "has_trial": true}"#,
        );
        assert!(matches!(missing, Err(Error::InvalidTrialWindow { .. })));
    }

    #[test]
    fn test_trial_dates_ignored_without_flag() {
        let sub = accept(
            r#"{"name": "X", "amount": 1, "next_billing_date": "2024-07-01",
                "trial_start_date": "2024-06-17", "trial_end_date": "2024-06-10"}"#,
        )
        .unwrap();
        assert!(sub.trial_start_date.is_none());
    }

    #[test]
    fn test_one_time_payload() {
        let sub = accept(
            r#"{"name": "Office", "amount": 5000, "subscription_type": "one_time",
                "start_date": "2024-06-01", "duration_type": "months", "duration_value": 3}"#,
        )
        .unwrap();
        assert_eq!(sub.frequency, Frequency::OneTime);
        assert!(sub.next_billing_date.is_none());
        assert_eq!(sub.end_date, Some(date(2024, 9, 1)));

        let forever = accept(
            r#"{"name": "Office", "amount": 5000, "subscription_type": "one_time",
                "start_date": "2024-06-01", "duration_type": "indefinite", "duration_value": 7}"#,
        )
        .unwrap();
        assert_eq!(forever.duration_value, None);
        assert_eq!(forever.end_date, None);
    }

    #[test]
    fn test_one_time_payload_errors() {
        assert!(matches!(
            accept(r#"{"name": "Office", "amount": 5000, "subscription_type": "one_time"}"#),
            Err(Error::InvalidPayload { .. })
        ));
        assert!(matches!(
            accept(
                r#"{"name": "Office", "amount": 5000, "subscription_type": "one_time",
                    "start_date": "2024-06-01", "duration_type": "months"}"#
            ),
            Err(Error::InvalidDuration { .. })
        ));
        assert!(matches!(
            accept(
                r#"{"name": "Office", "amount": 5000, "subscription_type": "one_time",
                    "start_date": "2024-06-01", "duration_type": "decades", "duration_value": 1}"#
            ),
            Err(Error::InvalidDuration { .. })
        ));
    }

    #[test]
    fn test_parse_subscriptions_export() {
        let json = r#"[
            {"id": 1, "user_id": 1, "name": "Netflix", "amount": 599, "frequency": "monthly",
             "next_billing_date": "2024-06-20", "is_active": true},
            {"id": 2, "user_id": 1, "name": "Cloud", "amount": "1200.00", "frequency": "yearly",
             "next_billing_date": "2024-06-20T00:00:00"},
            {"id": 3, "user_id": 1, "name": "Office", "amount": 5000, "frequency": "one_time",
             "subscription_type": "one_time", "start_date": "2024-01-01"}
        ]"#;
        let subs = parse_subscriptions(json).unwrap();
        assert_eq!(subs.len(), 3);
        assert_eq!(subs[1].amount, dec!(1200));
    }

    #[test]
    fn test_parse_subscriptions_rejects_malformed_record() {
        let bad_date = r#"[{"id": 1, "user_id": 1, "name": "X", "amount": 1, "next_billing_date": "nope"}]"#;
        assert!(matches!(
            parse_subscriptions(bad_date),
            Err(Error::InvalidDate { .. })
        ));

        let bad_shape = r#"[{"id": 1, "name": "X"}]"#;
        assert!(matches!(parse_subscriptions(bad_shape), Err(Error::Json(_))));
    }

    #[test]
    fn test_validate_subscription_trial_before_charge() {
        let mut sub = billed_on(monthly("Trial", dec!(299)), date(2024, 7, 1));
        sub.has_trial = true;
        sub.trial_start_date = Some(date(2024, 6, 20));
        sub.trial_end_date = Some(date(2024, 7, 5));
        assert!(matches!(
            validate_subscription(&sub),
            Err(Error::InvalidTrialWindow { .. })
        ));

        sub.trial_end_date = Some(date(2024, 6, 30));
        assert!(validate_subscription(&sub).is_ok());
    }
}
