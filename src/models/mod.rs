//! Data model - subscription records, recurrence variants, and the caller session.
//! These types carry no behaviour beyond construction and simple queries; the
//! billing logic lives in [`crate::core`].

pub mod recurrence;
pub mod session;
pub mod subscription;

pub use recurrence::{Duration, DurationType, Interval, IntervalUnit, Recurrence, TrialWindow};
pub use session::Session;
pub use subscription::{Frequency, Subscription, SubscriptionType};
