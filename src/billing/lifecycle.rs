//! Reservation state changes that move money or vehicles

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::info;

use super::BillingError;
use crate::records::{LocationLog, Reservation, ReservationStatus, Vehicle, VehicleStatus};

/// Record a customer payment and return the new remaining balance
pub fn apply_payment(reservation: &mut Reservation, amount: f64) -> Result<f64, BillingError> {
    if amount.is_nan() || amount <= 0.0 {
        return Err(BillingError::InvalidAmount(amount));
    }
    let remaining = reservation.remaining();
    // tolerate cent-level float noise on the final payment
    if amount > remaining + 0.005 {
        return Err(BillingError::Overpayment { amount, remaining });
    }
    reservation.paid_amount += amount;
    info!(
        reservation = %reservation.reservation_number,
        amount,
        remaining = reservation.remaining(),
        "payment recorded"
    );
    Ok(reservation.remaining())
}

/// Hand the vehicle over to the customer
///
/// The departure log is stamped with `now` when it carries no date.
pub fn activate(
    reservation: &mut Reservation,
    vehicle: &mut Vehicle,
    mut log: LocationLog,
    now: NaiveDateTime,
) -> Result<(), BillingError> {
    match reservation.status {
        ReservationStatus::Pending | ReservationStatus::Confirmed => {}
        from => {
            return Err(BillingError::InvalidTransition {
                from,
                action: "activate",
            })
        }
    }
    if log.date.is_none() {
        log.date = Some(now);
    }
    vehicle.status = VehicleStatus::Rented;
    vehicle.mileage = log.mileage;
    reservation.status = ReservationStatus::InProgress;
    reservation.activation_log = Some(log);
    info!(reservation = %reservation.reservation_number, vehicle = %vehicle.id, "rental activated");
    Ok(())
}

/// Return data entered when a rental is closed
#[derive(Debug, Clone, Default)]
pub struct Termination {
    pub log: LocationLog,
    pub extra_km_cost: f64,
    pub extra_fuel_cost: f64,
    /// Apply TVA on top of the extra charges
    pub with_tva: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TerminationSummary {
    pub distance_km: u32,
    pub extra_total: f64,
    pub new_total: f64,
}

/// Take the vehicle back and bill the extras
pub fn terminate(
    reservation: &mut Reservation,
    vehicle: &mut Vehicle,
    termination: Termination,
    tva_rate: f64,
) -> Result<TerminationSummary, BillingError> {
    if reservation.status != ReservationStatus::InProgress {
        return Err(BillingError::InvalidTransition {
            from: reservation.status,
            action: "terminate",
        });
    }
    let departure = reservation
        .activation_log
        .as_ref()
        .map_or(vehicle.mileage, |log| log.mileage);
    let returned = termination.log.mileage;
    if returned < departure {
        return Err(BillingError::MileageRollback {
            departure,
            returned,
        });
    }

    let factor = if termination.with_tva {
        1.0 + tva_rate
    } else {
        1.0
    };
    let extra_total = (termination.extra_km_cost + termination.extra_fuel_cost) * factor;

    reservation.total_amount += extra_total;
    reservation.status = ReservationStatus::Completed;
    reservation.termination_log = Some(termination.log);
    vehicle.status = VehicleStatus::Available;
    vehicle.mileage = returned;

    let summary = TerminationSummary {
        distance_km: returned - departure,
        extra_total,
        new_total: reservation.total_amount,
    };
    info!(
        reservation = %reservation.reservation_number,
        distance_km = summary.distance_km,
        extra_total,
        "rental terminated"
    );
    Ok(summary)
}

/// Cancel a reservation, releasing the vehicle if it was out
pub fn cancel(reservation: &mut Reservation, vehicle: &mut Vehicle) -> Result<(), BillingError> {
    match reservation.status {
        ReservationStatus::Completed | ReservationStatus::Cancelled => {
            Err(BillingError::InvalidTransition {
                from: reservation.status,
                action: "cancel",
            })
        }
        ReservationStatus::InProgress => {
            vehicle.status = VehicleStatus::Available;
            reservation.status = ReservationStatus::Cancelled;
            Ok(())
        }
        _ => {
            reservation.status = ReservationStatus::Cancelled;
            Ok(())
        }
    }
}
