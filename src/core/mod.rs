//! Core business logic - framework-agnostic billing calculations.
//!
//! Everything here is synchronous and free of shared state: each function
//! takes a snapshot of subscriptions plus a reference date and returns a new
//! value, so it is safe to call from any number of threads at once.

/// Period analytics (monthly, yearly, trends)
pub mod analytics;
/// Billing dates, days until billing, status, cost normalization
pub mod billing;
/// Upcoming and overdue bill lists, payment schedule
pub mod bills;
/// Boundary validation of payloads and exports
pub mod intake;
/// Dashboard assembly and text formatting
pub mod report;
/// Next-occurrence computation per recurrence variant
pub mod schedule;
/// Spend totals, cost ranking, savings analysis
pub mod spend;
