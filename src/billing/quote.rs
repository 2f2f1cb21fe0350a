//! Quote totals and invoice lines

use serde::Serialize;

use super::rental_days;
use crate::records::{RentalOption, Reservation, Vehicle};

/// Inputs of a price computation
#[derive(Debug, Clone, Default)]
pub struct QuoteInput {
    pub daily_rate: f64,
    pub days: u32,
    pub options: Vec<RentalOption>,
    pub discount: f64,
    pub with_tva: bool,
    pub tva_rate: f64,
    /// Manually entered total that replaces the computed one
    pub total_override: Option<f64>,
    pub paid: f64,
}

impl QuoteInput {
    /// Inputs taken from a stored reservation and its vehicle
    pub fn from_reservation(reservation: &Reservation, vehicle: &Vehicle, tva_rate: f64) -> Self {
        Self {
            daily_rate: vehicle.daily_rate,
            days: rental_days(&reservation.start_date, &reservation.end_date),
            options: reservation.options.clone(),
            discount: reservation.discount,
            with_tva: reservation.with_tva,
            tva_rate,
            total_override: None,
            paid: reservation.paid_amount,
        }
    }
}

/// Computed price breakdown
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub days: u32,
    pub daily_rate: f64,
    pub base_total: f64,
    pub options_total: f64,
    pub discount: f64,
    pub subtotal: f64,
    pub tva_rate: f64,
    pub tva_amount: f64,
    pub final_total: f64,
    pub paid: f64,
    pub rest: f64,
}

impl Quote {
    pub fn compute(input: &QuoteInput) -> Self {
        let base_total = input.daily_rate * f64::from(input.days);
        let options_total: f64 = input.options.iter().map(|o| o.price).sum();
        let subtotal = base_total + options_total - input.discount;
        let tva_amount = if input.with_tva {
            subtotal * input.tva_rate
        } else {
            0.0
        };
        let final_total = input.total_override.unwrap_or(subtotal + tva_amount);

        Self {
            days: input.days,
            daily_rate: input.daily_rate,
            base_total,
            options_total,
            discount: input.discount,
            subtotal,
            tva_rate: if input.with_tva { input.tva_rate } else { 0.0 },
            tva_amount,
            final_total,
            paid: input.paid,
            rest: final_total - input.paid,
        }
    }

    /// Breakdown of a stored reservation
    ///
    /// The stored total wins over the recomputed one, since it may carry a
    /// manual override or termination extras.
    pub fn for_reservation(reservation: &Reservation, vehicle: &Vehicle, tva_rate: f64) -> Self {
        let mut input = QuoteInput::from_reservation(reservation, vehicle, tva_rate);
        if reservation.total_amount > 0.0 {
            input.total_override = Some(reservation.total_amount);
        }
        Self::compute(&input)
    }

    /// Difference between the final total and the itemized amounts
    pub fn adjustment(&self) -> f64 {
        let itemized = self.subtotal + self.tva_amount;
        let diff = self.final_total - itemized;
        if diff.abs() < 0.005 {
            0.0
        } else {
            diff
        }
    }

    /// Lines printed in an invoice table
    pub fn lines(&self, vehicle_name: &str, options: &[RentalOption]) -> Vec<InvoiceLine> {
        let mut lines = vec![InvoiceLine {
            label: format!("Location {}", vehicle_name).trim().to_string(),
            quantity: Some(self.days),
            unit_price: Some(self.daily_rate),
            amount: self.base_total,
        }];
        for opt in options {
            lines.push(InvoiceLine {
                label: opt.name.clone(),
                quantity: Some(1),
                unit_price: Some(opt.price),
                amount: opt.price,
            });
        }
        if self.discount > 0.0 {
            lines.push(InvoiceLine::single("Remise", -self.discount));
        }
        if self.tva_amount > 0.0 {
            lines.push(InvoiceLine::single(
                format!("TVA ({}%)", (self.tva_rate * 100.0).round()),
                self.tva_amount,
            ));
        }
        let adjustment = self.adjustment();
        if adjustment != 0.0 {
            lines.push(InvoiceLine::single("Frais supplémentaires", adjustment));
        }
        lines
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceLine {
    pub label: String,
    pub quantity: Option<u32>,
    pub unit_price: Option<f64>,
    pub amount: f64,
}

impl InvoiceLine {
    fn single(label: impl Into<String>, amount: f64) -> Self {
        Self {
            label: label.into(),
            quantity: None,
            unit_price: None,
            amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn gps() -> RentalOption {
        RentalOption {
            id: "o1".into(),
            name: "GPS".into(),
            price: 1000.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_without_tva() {
        let q = Quote::compute(&QuoteInput {
            daily_rate: 5000.0,
            days: 3,
            options: vec![gps()],
            discount: 500.0,
            paid: 4000.0,
            ..Default::default()
        });
        assert_eq!(q.base_total, 15000.0);
        assert_eq!(q.subtotal, 15500.0);
        assert_eq!(q.final_total, 15500.0);
        assert_eq!(q.rest, 11500.0);
    }

    #[test]
    fn test_with_tva() {
        let q = Quote::compute(&QuoteInput {
            daily_rate: 1000.0,
            days: 10,
            with_tva: true,
            tva_rate: 0.19,
            ..Default::default()
        });
        assert!((q.tva_amount - 1900.0).abs() < 1e-9);
        assert!((q.final_total - 11900.0).abs() < 1e-9);
    }

    #[test]
    fn test_override_wins() {
        let q = Quote::compute(&QuoteInput {
            daily_rate: 1000.0,
            days: 2,
            total_override: Some(1500.0),
            paid: 500.0,
            ..Default::default()
        });
        assert_eq!(q.final_total, 1500.0);
        assert_eq!(q.rest, 1000.0);
        assert_eq!(q.adjustment(), -500.0);
    }

    #[test]
    fn test_lines() {
        let q = Quote::compute(&QuoteInput {
            daily_rate: 5000.0,
            days: 2,
            options: vec![gps()],
            discount: 1000.0,
            with_tva: true,
            tva_rate: 0.19,
            ..Default::default()
        });
        let labels: Vec<String> = q
            .lines("Renault Clio", &[gps()])
            .into_iter()
            .map(|l| l.label)
            .collect();
        assert_eq!(
            labels,
            vec!["Location Renault Clio", "GPS", "Remise", "TVA (19%)"]
        );
    }
}
