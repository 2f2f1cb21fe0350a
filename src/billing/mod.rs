//! Rental arithmetic
//!
//! Everything that ends up as an amount on a printed document: rental
//! duration, quote totals with TVA, payments, the activation and
//! termination of a rental, return penalties and expense totals.

mod expenses;
mod lifecycle;
mod penalties;
mod quote;

pub use expenses::{expenses_between, expiring_maintenance, maintenance_total, matching_maintenance};
pub use lifecycle::{activate, apply_payment, cancel, terminate, Termination, TerminationSummary};
pub use penalties::{
    assess, FuelPolicy, MileagePolicy, PenaltyBreakdown, PenaltyMode, PenaltyPolicy,
    ReturnPolicy, ReturnReading,
};
pub use quote::{InvoiceLine, Quote, QuoteInput};

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::records::ReservationStatus;

/// Errors raised by billing operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BillingError {
    #[error("payment amount must be positive, got {0}")]
    InvalidAmount(f64),
    #[error("payment of {amount} exceeds the remaining balance of {remaining}")]
    Overpayment { amount: f64, remaining: f64 },
    #[error("cannot {action} a reservation with status '{}'", from.as_str())]
    InvalidTransition {
        from: ReservationStatus,
        action: &'static str,
    },
    #[error("return mileage {returned} km is below departure mileage {departure} km")]
    MileageRollback { departure: u32, returned: u32 },
}

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Number of billed days between two instants
///
/// Any started day counts in full; a rental is never shorter than one day.
pub fn rental_days(start: &NaiveDateTime, end: &NaiveDateTime) -> u32 {
    let secs = (*end - *start).num_seconds();
    if secs <= 0 {
        return 1;
    }
    let days = (secs + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
    u32::try_from(days).unwrap_or(u32::MAX).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_exact_days() {
        assert_eq!(rental_days(&at(1, 10, 0), &at(4, 10, 0)), 3);
    }

    #[test]
    fn test_started_day_counts() {
        assert_eq!(rental_days(&at(1, 10, 0), &at(4, 10, 1)), 4);
    }

    #[test]
    fn test_minimum_one_day() {
        assert_eq!(rental_days(&at(1, 10, 0), &at(1, 10, 0)), 1);
        assert_eq!(rental_days(&at(3, 10, 0), &at(1, 10, 0)), 1);
        assert_eq!(rental_days(&at(1, 10, 0), &at(1, 12, 0)), 1);
    }

    #[test]
    fn test_transition_message_uses_datastore_status() {
        let err = BillingError::InvalidTransition {
            from: ReservationStatus::Completed,
            action: "cancel",
        };
        assert_eq!(
            err.to_string(),
            "cannot cancel a reservation with status 'terminer'"
        );
    }
}
