//! Return penalties: late return, mileage overage and missing fuel

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::rental_days;
use crate::records::{FuelLevel, RentalOption, OptionCategory, Reservation, Vehicle};

/// How a late return is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PenaltyMode {
    /// Each started late day costs the vehicle's daily rate
    #[default]
    Daily,
    /// Each started late hour costs a flat amount
    Hourly,
    /// Each started late day costs a flat amount
    DailyFlat,
    /// Each started late day costs a percentage of the daily rate
    Percentage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyPolicy {
    pub mode: PenaltyMode,
    /// Flat amount, or percentage in `percentage` mode
    pub amount: f64,
    /// Grace period before any late fee applies
    pub tolerance_minutes: i64,
}

impl Default for PenaltyPolicy {
    fn default() -> Self {
        Self {
            mode: PenaltyMode::Daily,
            amount: 1500.0,
            tolerance_minutes: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MileagePolicy {
    pub daily_limit_km: u32,
    pub tolerance_km: u32,
    pub excess_price: f64,
    /// Daily supplement of the unlimited-mileage option
    pub unlimited_price: f64,
}

impl Default for MileagePolicy {
    fn default() -> Self {
        Self {
            daily_limit_km: 250,
            tolerance_km: 20,
            excess_price: 15.0,
            unlimited_price: 2000.0,
        }
    }
}

/// Option names that waive the mileage allowance
const UNLIMITED_KEYWORDS: &[&str] = &["illimit", "unlimited", "غير محدود"];

impl MileagePolicy {
    /// Kilometres included for a rental of `days`
    pub fn allowance(&self, days: u32) -> u32 {
        days.saturating_mul(self.daily_limit_km)
            .saturating_add(self.tolerance_km)
    }

    /// Unlimited-mileage option priced for a rental of `days`
    pub fn unlimited_option(&self, days: u32) -> RentalOption {
        RentalOption {
            id: "unlimited-km".to_string(),
            name: "KM illimité".to_string(),
            price: self.unlimited_price * f64::from(days),
            category: OptionCategory::Service,
        }
    }

    pub fn is_waived(reservation: &Reservation) -> bool {
        UNLIMITED_KEYWORDS.iter().any(|k| reservation.has_option(k))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelPolicy {
    /// Price of each missing eighth of a tank
    pub missing_price: f64,
}

impl Default for FuelPolicy {
    fn default() -> Self {
        Self {
            missing_price: 500.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReturnPolicy {
    pub late: PenaltyPolicy,
    pub mileage: MileagePolicy,
    pub fuel: FuelPolicy,
}

/// What was observed when the vehicle came back
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnReading {
    pub returned_at: NaiveDateTime,
    pub mileage: Option<u32>,
    pub fuel: Option<FuelLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PenaltyBreakdown {
    pub late_minutes: i64,
    pub late_fee: f64,
    pub distance_km: u32,
    pub allowance_km: Option<u32>,
    pub excess_km: u32,
    pub mileage_fee: f64,
    pub missing_eighths: u32,
    pub fuel_fee: f64,
    pub total: f64,
}

fn ceil_div(value: i64, unit: i64) -> i64 {
    (value + unit - 1) / unit
}

fn late_fee(policy: &PenaltyPolicy, daily_rate: f64, late_minutes: i64) -> f64 {
    if late_minutes <= policy.tolerance_minutes {
        return 0.0;
    }
    let late_hours = ceil_div(late_minutes, 60) as f64;
    let late_days = ceil_div(late_minutes, 24 * 60) as f64;
    match policy.mode {
        PenaltyMode::Daily => late_days * daily_rate,
        PenaltyMode::Hourly => late_hours * policy.amount,
        PenaltyMode::DailyFlat => late_days * policy.amount,
        PenaltyMode::Percentage => late_days * daily_rate * policy.amount / 100.0,
    }
}

/// Compute the penalties owed for a return
///
/// Departure mileage and fuel come from the activation log, falling back
/// to the vehicle's recorded mileage and a full tank.
pub fn assess(
    reservation: &Reservation,
    vehicle: &Vehicle,
    policy: &ReturnPolicy,
    reading: &ReturnReading,
) -> PenaltyBreakdown {
    let mut out = PenaltyBreakdown::default();

    let late_minutes = (reading.returned_at - reservation.end_date).num_minutes();
    out.late_minutes = late_minutes.max(0);
    out.late_fee = late_fee(&policy.late, vehicle.daily_rate, late_minutes);

    let departure = reservation.activation_log.as_ref();
    if let Some(returned) = reading.mileage {
        let start = departure.map_or(vehicle.mileage, |log| log.mileage);
        out.distance_km = returned.saturating_sub(start);
        if !MileagePolicy::is_waived(reservation) {
            let days = rental_days(&reservation.start_date, &reservation.end_date);
            let allowance = policy.mileage.allowance(days);
            out.allowance_km = Some(allowance);
            out.excess_km = out.distance_km.saturating_sub(allowance);
            out.mileage_fee = f64::from(out.excess_km) * policy.mileage.excess_price;
        }
    }

    if let Some(fuel) = reading.fuel {
        let start = departure.map_or(FuelLevel::Full, |log| log.fuel);
        out.missing_eighths = start.eighths().saturating_sub(fuel.eighths());
        out.fuel_fee = f64::from(out.missing_eighths) * policy.fuel.missing_price;
    }

    out.total = out.late_fee + out.mileage_fee + out.fuel_fee;
    out
}
