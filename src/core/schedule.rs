//! Recurrence scheduling - next charge dates per recurrence variant.
//!
//! Converts the flat subscription fields into a [`Recurrence`] and answers
//! "when is the next charge?" for each variant. Recurring subscriptions roll
//! missed periods forward; one-time purchases charge once on their start date.

use chrono::{Datelike, NaiveDate};

use crate::{
    core::billing::billing_date_of,
    errors::{Error, Result},
    models::{Duration, DurationType, Interval, IntervalUnit, Recurrence, Subscription, TrialWindow},
};

/// Derives the recurrence variant of a subscription.
///
/// A missing or unparsable `next_billing_date` leaves the anchor empty rather
/// than failing; structural problems (zero interval, trial out of order,
/// one-time purchase without a start date) are errors.
pub fn recurrence_of(subscription: &Subscription) -> Result<Recurrence> {
    if subscription.is_one_time() {
        let start_date = subscription.start_date.ok_or_else(|| Error::InvalidPayload {
            message: format!(
                "one-time subscription {} has no start_date",
                subscription.id
            ),
        })?;
        let duration = Duration::from_parts(
            subscription.duration_type.unwrap_or(DurationType::Indefinite),
            subscription.duration_value,
        )?;
        return Ok(Recurrence::OneTime {
            start_date,
            duration,
        });
    }

    let unit = subscription
        .interval_unit
        .or_else(|| subscription.frequency.interval_unit())
        .unwrap_or(IntervalUnit::Month);
    let interval = Interval::new(unit, subscription.interval_count)?;
    let anchor = billing_date_of(subscription).map(|ts| ts.date_naive());
    let trial = trial_window_of(subscription)?;

    Ok(Recurrence::Recurring {
        interval,
        anchor,
        trial,
    })
}

/// Trial window of a subscription, if it has both trial dates.
///
/// When `has_trial` is set the dates become mandatory.
pub fn trial_window_of(subscription: &Subscription) -> Result<Option<TrialWindow>> {
    match (subscription.trial_start_date, subscription.trial_end_date) {
        (Some(start), Some(end)) => TrialWindow::new(start, end).map(Some),
        (None, None) if !subscription.has_trial => Ok(None),
        _ => Err(Error::InvalidTrialWindow {
            message: "trial requires both trial_start_date and trial_end_date".to_string(),
        }),
    }
}

/// Next charge date on or after `today`.
///
/// Recurring: the first `anchor + k * interval` (k >= 0) not before `today`;
/// `None` without an anchor. One-time: the start date if it has not passed.
#[must_use]
pub fn next_occurrence(recurrence: &Recurrence, today: NaiveDate) -> Option<NaiveDate> {
    match recurrence {
        Recurrence::Recurring {
            interval, anchor, ..
        } => next_recurring(*interval, (*anchor)?, today),
        Recurrence::OneTime { start_date, .. } => (*start_date >= today).then_some(*start_date),
    }
}

fn next_recurring(interval: Interval, anchor: NaiveDate, today: NaiveDate) -> Option<NaiveDate> {
    if anchor >= today {
        return Some(anchor);
    }

    // Jump close to `today` first, then step forward over clamped month ends
    let mut k = match interval.unit {
        IntervalUnit::Day | IntervalUnit::Week => {
            let unit_days = if interval.unit == IntervalUnit::Week { 7 } else { 1 };
            let step = i64::from(interval.count) * unit_days;
            let elapsed = (today - anchor).num_days();
            u32::try_from(elapsed / step).ok()?
        }
        IntervalUnit::Month | IntervalUnit::Year => {
            let unit_months = if interval.unit == IntervalUnit::Year { 12 } else { 1 };
            let step = i64::from(interval.count) * unit_months;
            let elapsed = i64::from(today.year() - anchor.year()) * 12
                + i64::from(today.month())
                - i64::from(anchor.month());
            u32::try_from((elapsed / step).saturating_sub(1).max(0)).ok()?
        }
    };

    loop {
        let candidate = interval.nth_after(anchor, k)?;
        if candidate >= today {
            return Some(candidate);
        }
        k = k.checked_add(1)?;
    }
}

/// Next charge date of a subscription, `None` if it has none or is malformed.
#[must_use]
pub fn next_charge_of(subscription: &Subscription, today: NaiveDate) -> Option<NaiveDate> {
    recurrence_of(subscription)
        .ok()
        .and_then(|recurrence| next_occurrence(&recurrence, today))
}

/// Whether a subscription is inside its free trial on `today`.
#[must_use]
pub fn in_trial(subscription: &Subscription, today: NaiveDate) -> bool {
    trial_window_of(subscription)
        .ok()
        .flatten()
        .is_some_and(|trial| trial.contains(today))
}
