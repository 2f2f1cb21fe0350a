//! Expense and maintenance totals

use chrono::{Duration, NaiveDate};

use crate::records::{Expense, Maintenance, Vehicle};

fn vehicle_matches(vehicle: &Vehicle, query: &str) -> bool {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return true;
    }
    [
        vehicle.display_name(),
        vehicle.immatriculation.clone(),
        vehicle.chassis_number.clone(),
    ]
    .iter()
    .any(|field| field.to_lowercase().contains(&q))
}

/// Maintenance entries of vehicles whose name, plate or chassis number
/// contains `query`
pub fn matching_maintenance<'a>(
    vehicles: &[Vehicle],
    maintenance: &'a [Maintenance],
    query: &str,
) -> Vec<&'a Maintenance> {
    maintenance
        .iter()
        .filter(|m| {
            vehicles
                .iter()
                .find(|v| v.id == m.vehicle_id)
                .is_some_and(|v| vehicle_matches(v, query))
        })
        .collect()
}

pub fn maintenance_total(vehicles: &[Vehicle], maintenance: &[Maintenance], query: &str) -> f64 {
    matching_maintenance(vehicles, maintenance, query)
        .iter()
        .map(|m| m.cost)
        .sum()
}

/// Maintenance whose expiry date falls within `within_days` of `today`,
/// soonest first. Already expired entries are included.
pub fn expiring_maintenance(
    maintenance: &[Maintenance],
    today: NaiveDate,
    within_days: i64,
) -> Vec<&Maintenance> {
    let horizon = today + Duration::days(within_days);
    let mut found: Vec<&Maintenance> = maintenance
        .iter()
        .filter(|m| m.expiry_date.is_some_and(|d| d.date() <= horizon))
        .collect();
    found.sort_by_key(|m| m.expiry_date);
    found
}

/// Store expenses dated within `[from, to]`
pub fn expenses_between(expenses: &[Expense], from: NaiveDate, to: NaiveDate) -> f64 {
    expenses
        .iter()
        .filter(|e| e.date.is_some_and(|d| d.date() >= from && d.date() <= to))
        .map(|e| e.cost)
        .sum()
}
