//! Placeholder resolution: binds reservation data into template text

use chrono::NaiveDate;
use tracing::warn;

use crate::billing::rental_days;
use crate::config::DocumentSettings;
use crate::error::ParseError;
use crate::locale::Locale;
use crate::parser::{parse_text, parse_text_lenient, Segment};
use crate::records::{Customer, Damage, Inspection, Reservation, StoreInfo, Vehicle};

macro_rules! placeholders {
    ($($variant:ident => $name:literal, $doc:literal;)*) => {
        /// Every value a template can reference
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Placeholder {
            $(#[doc = $doc] $variant,)*
        }

        impl Placeholder {
            pub const ALL: &'static [Placeholder] = &[$(Placeholder::$variant,)*];

            /// Name written between the braces
            pub fn name(&self) -> &'static str {
                match self {
                    $(Placeholder::$variant => $name,)*
                }
            }

            pub fn description(&self) -> &'static str {
                match self {
                    $(Placeholder::$variant => $doc,)*
                }
            }
        }

        impl std::str::FromStr for Placeholder {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Placeholder::$variant),)*
                    other => Err(format!("unknown placeholder '{}'", other)),
                }
            }
        }
    };
}

placeholders! {
    ClientName => "client_name", "Customer first and last name";
    ClientPhone => "client_phone", "Customer phone";
    ClientEmail => "client_email", "Customer email";
    ClientDob => "client_dob", "Customer date of birth";
    ClientPob => "client_pob", "Customer place of birth";
    ClientLicense => "client_license", "Driving license number";
    LicenseIssued => "license_issued", "License issue date";
    LicenseExpiry => "license_expiry", "License expiry date";
    LicensePlace => "license_place", "License issue place";
    VehicleName => "vehicle_name", "Vehicle brand and model";
    VehicleBrand => "vehicle_brand", "Vehicle brand";
    VehicleModel => "vehicle_model", "Vehicle model";
    VehicleColor => "vehicle_color", "Vehicle color";
    VehiclePlate => "vehicle_plate", "Registration plate";
    VehicleVin => "vehicle_vin", "Chassis number";
    VehicleFuel => "vehicle_fuel", "Fuel type";
    VehicleMileage => "vehicle_mileage", "Odometer reading in km";
    ResNumber => "res_number", "Reservation number";
    ResDate => "res_date", "Reservation date (start of the rental)";
    StartDate => "start_date", "Rental start date";
    EndDate => "end_date", "Rental end date";
    Duration => "duration", "Billed days, two digits";
    CurrentDate => "current_date", "Date the document is printed";
    TotalAmount => "total_amount", "Reservation total";
    TotalHt => "total_ht", "Total before tax";
    UnitPrice => "unit_price", "Total divided by billed days";
    PaidAmount => "paid_amount", "Amount already paid";
    RemainingAmount => "remaining_amount", "Amount still owed";
    CautionAmount => "caution_amount", "Security deposit";
    StoreName => "store_name", "Agency name";
    StorePhone => "store_phone", "Agency phone";
    StoreEmail => "store_email", "Agency email";
    StoreAddress => "store_address", "Agency address";
    InspectionDate => "inspection_date", "Date and time of the inspection";
    InspectionMileage => "inspection_mileage", "Odometer reading at the inspection";
    InspectionFuel => "inspection_fuel", "Fuel level at the inspection";
    InspectionNotes => "inspection_notes", "Agent notes from the inspection";
    VehicleDamages => "vehicle_damages", "Damages recorded on the vehicle, one per line";
}

/// Data a document is printed from
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub reservation: &'a Reservation,
    pub customer: &'a Customer,
    pub vehicle: &'a Vehicle,
    pub store: &'a StoreInfo,
    pub settings: &'a DocumentSettings,
    pub today: NaiveDate,
    /// Inspection whose signature is embedded in signature boxes
    pub inspection: Option<&'a Inspection>,
    /// Damages listed by `{{vehicle_damages}}`
    pub damages: Vec<&'a Damage>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        reservation: &'a Reservation,
        customer: &'a Customer,
        vehicle: &'a Vehicle,
        store: &'a StoreInfo,
        settings: &'a DocumentSettings,
        today: NaiveDate,
    ) -> Self {
        Self {
            reservation,
            customer,
            vehicle,
            store,
            settings,
            today,
            inspection: None,
            damages: Vec::new(),
        }
    }

    pub fn with_inspection(mut self, inspection: Option<&'a Inspection>) -> Self {
        self.inspection = inspection;
        self
    }

    pub fn with_damages(mut self, damages: Vec<&'a Damage>) -> Self {
        self.damages = damages;
        self
    }

    pub fn locale(&self) -> Locale {
        self.settings.locale
    }

    pub fn days(&self) -> u32 {
        rental_days(&self.reservation.start_date, &self.reservation.end_date)
    }

    fn amount(&self, value: f64) -> String {
        self.locale().format_amount(value)
    }

    fn date<D: chrono::Datelike>(&self, value: Option<&D>) -> String {
        value
            .map(|d| self.locale().format_date(d))
            .unwrap_or_default()
    }

    /// Printed value of a placeholder
    pub fn value(&self, placeholder: Placeholder) -> String {
        let c = self.customer;
        let v = self.vehicle;
        let r = self.reservation;
        let s = self.store;
        match placeholder {
            Placeholder::ClientName => c.full_name(),
            Placeholder::ClientPhone => c.phone.clone(),
            Placeholder::ClientEmail => c.email.clone().unwrap_or_default(),
            Placeholder::ClientDob => self.date(c.date_of_birth.as_ref()),
            Placeholder::ClientPob => c.place_of_birth.clone().unwrap_or_default(),
            Placeholder::ClientLicense => c.license_number.clone(),
            Placeholder::LicenseIssued => self.date(c.license_issue_date.as_ref()),
            Placeholder::LicenseExpiry => self.date(c.license_expiry.as_ref()),
            Placeholder::LicensePlace => c.license_issue_place.clone().unwrap_or_default(),
            Placeholder::VehicleName => v.display_name(),
            Placeholder::VehicleBrand => v.brand.clone(),
            Placeholder::VehicleModel => v.model.clone(),
            Placeholder::VehicleColor => v.color.clone(),
            Placeholder::VehiclePlate => v.immatriculation.clone(),
            Placeholder::VehicleVin => v.chassis_number.clone(),
            Placeholder::VehicleFuel => v.fuel_type.label().to_string(),
            Placeholder::VehicleMileage => v.mileage.to_string(),
            Placeholder::ResNumber => r.reservation_number.clone(),
            Placeholder::ResDate | Placeholder::StartDate => self.date(Some(&r.start_date)),
            Placeholder::EndDate => self.date(Some(&r.end_date)),
            Placeholder::Duration => format!("{:02}", self.days()),
            Placeholder::CurrentDate => self.date(Some(&self.today)),
            Placeholder::TotalAmount => self.amount(r.total_amount),
            Placeholder::TotalHt => self.amount(r.total_amount * self.settings.ht_factor),
            Placeholder::UnitPrice => self.amount(r.total_amount / f64::from(self.days())),
            Placeholder::PaidAmount => self.amount(r.paid_amount),
            Placeholder::RemainingAmount => self.amount(r.remaining()),
            Placeholder::CautionAmount => self.amount(r.caution_amount),
            Placeholder::StoreName => s.display_name().to_string(),
            Placeholder::StorePhone => s.phone.clone(),
            Placeholder::StoreEmail => s.email.clone(),
            Placeholder::StoreAddress => s.address.clone(),
            Placeholder::InspectionDate => self
                .inspection
                .map(|i| format!("{} {}", self.locale().format_date(&i.date), i.date.format("%H:%M")))
                .unwrap_or_default(),
            Placeholder::InspectionMileage => {
                self.inspection.map(|i| i.mileage.to_string()).unwrap_or_default()
            }
            Placeholder::InspectionFuel => self.inspection.map(|i| i.fuel.clone()).unwrap_or_default(),
            Placeholder::InspectionNotes => self
                .inspection
                .and_then(|i| i.notes.clone())
                .unwrap_or_default(),
            Placeholder::VehicleDamages => self
                .damages
                .iter()
                .map(|d| {
                    let place = if d.position.trim().is_empty() {
                        String::new()
                    } else {
                        format!(" - {}", d.position.trim())
                    };
                    format!("{}{} ({}, {})", d.name, place, d.severity.label(), d.status.label())
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Replace every known placeholder in `text`
    ///
    /// Unknown names are kept as written so they remain visible on the
    /// printed page. Values are inserted as-is and never parsed again. A
    /// malformed placeholder is printed as written too; `lint::check`
    /// reports it.
    pub fn substitute(&self, text: &str) -> String {
        let parsed = parse_text(text).unwrap_or_else(|errors| {
            for err in &errors {
                warn!(error = %err, "malformed placeholder printed as written");
            }
            parse_text_lenient(text)
        });
        parsed.expand(|name| match name.parse::<Placeholder>() {
            Ok(p) => Some(self.value(p)),
            Err(_) => {
                warn!(placeholder = name, "unknown placeholder left in document");
                None
            }
        })
    }
}

/// Placeholder names in `text` that are not part of the supported set
pub fn unknown_placeholders(
    text: &str,
) -> Result<Vec<(String, std::ops::Range<usize>)>, Vec<ParseError>> {
    let parsed = parse_text(text)?;
    Ok(parsed
        .placeholders()
        .filter_map(|seg| match &seg.node {
            Segment::Placeholder(id) if id.as_str().parse::<Placeholder>().is_err() => {
                Some((id.as_str().to_string(), seg.span.clone()))
            }
            _ => None,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use pretty_assertions::assert_eq;

    fn dt(s: &str) -> NaiveDateTime {
        crate::records::dates::parse_datetime(s).unwrap()
    }

    struct Fixture {
        reservation: Reservation,
        customer: Customer,
        vehicle: Vehicle,
        store: StoreInfo,
        settings: DocumentSettings,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                reservation: Reservation {
                    id: "r1".into(),
                    reservation_number: "RES-042".into(),
                    start_date: dt("2024-05-01T10:00"),
                    end_date: dt("2024-05-04T10:00"),
                    total_amount: 15000.0,
                    paid_amount: 5000.0,
                    caution_amount: 30000.0,
                    ..Default::default()
                },
                customer: Customer {
                    first_name: "Amine".into(),
                    last_name: "Benali".into(),
                    phone: "0550 12 34 56".into(),
                    date_of_birth: Some(dt("1990-03-07")),
                    ..Default::default()
                },
                vehicle: Vehicle {
                    brand: "Renault".into(),
                    model: "Clio".into(),
                    immatriculation: "12345-116-16".into(),
                    ..Default::default()
                },
                store: StoreInfo::default(),
                settings: DocumentSettings::default(),
            }
        }

        fn ctx(&self) -> RenderContext<'_> {
            RenderContext::new(
                &self.reservation,
                &self.customer,
                &self.vehicle,
                &self.store,
                &self.settings,
                NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            )
        }
    }

    #[test]
    fn test_every_placeholder_round_trips_its_name() {
        for p in Placeholder::ALL {
            assert_eq!(p.name().parse::<Placeholder>().unwrap(), *p);
        }
        assert_eq!(Placeholder::ALL.len(), 38);
    }

    #[test]
    fn test_substitute_contract_block() {
        let fx = Fixture::new();
        let out = fx
            .ctx()
            .substitute("Nom: {{client_name}}\nDurée: {{duration}} jours\nNé le {{client_dob}}");
        assert_eq!(out, "Nom: Amine Benali\nDurée: 03 jours\nNé le 07/03/1990");
    }

    #[test]
    fn test_amounts() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        assert_eq!(ctx.value(Placeholder::TotalAmount), "15\u{202f}000");
        assert_eq!(ctx.value(Placeholder::TotalHt), "12\u{202f}150");
        assert_eq!(ctx.value(Placeholder::UnitPrice), "5\u{202f}000");
        assert_eq!(ctx.value(Placeholder::RemainingAmount), "10\u{202f}000");
    }

    #[test]
    fn test_missing_values() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        assert_eq!(ctx.value(Placeholder::ClientEmail), "");
        assert_eq!(ctx.value(Placeholder::LicenseExpiry), "");
        assert_eq!(ctx.value(Placeholder::VehicleMileage), "0");
        assert_eq!(ctx.value(Placeholder::StoreName), "DriveFlow");
    }

    #[test]
    fn test_repeated_and_unknown() {
        let fx = Fixture::new();
        let out = fx
            .ctx()
            .substitute("{{res_number}} / {{res_number}} / {{ loyalty_points }}");
        assert_eq!(out, "RES-042 / RES-042 / {{loyalty_points}}");
    }

    #[test]
    fn test_arabic_dates_and_amounts() {
        let mut fx = Fixture::new();
        fx.settings.locale = Locale::Ar;
        let ctx = fx.ctx();
        assert_eq!(ctx.value(Placeholder::StartDate), "1/5/2024");
        assert_eq!(ctx.value(Placeholder::CurrentDate), "1/6/2024");
        assert_eq!(ctx.value(Placeholder::TotalAmount), "15.000");
    }

    #[test]
    fn test_malformed_placeholder_printed_as_written() {
        let fx = Fixture::new();
        let ctx = fx.ctx();
        assert_eq!(ctx.substitute("Total {{total_amount"), "Total {{total_amount");
        assert_eq!(
            ctx.substitute("{{res_number}}: voir {{ conditions générales }}"),
            "RES-042: voir {{ conditions générales }}"
        );
    }

    #[test]
    fn test_values_are_not_parsed_again() {
        let mut fx = Fixture::new();
        fx.customer.first_name = "{{total_amount}}".into();
        let out = fx.ctx().substitute("Client: {{client_name}}");
        assert_eq!(out, "Client: {{total_amount}} Benali");
    }

    #[test]
    fn test_inspection_values() {
        use crate::records::{DamageStatus, Severity};

        let fx = Fixture::new();
        let inspection = Inspection {
            date: dt("2024-05-01T09:45"),
            mileage: 42000,
            fuel: "3/4".into(),
            notes: Some("Rayure {{ porte avant".into()),
            ..Default::default()
        };
        let damages = [
            Damage {
                name: "Rayure".into(),
                position: "Portière avant gauche".into(),
                severity: Severity::Leger,
                ..Default::default()
            },
            Damage {
                name: "Pare-brise fissuré".into(),
                severity: Severity::Grave,
                status: DamageStatus::Repaired,
                ..Default::default()
            },
        ];

        let bare = fx.ctx();
        assert_eq!(bare.value(Placeholder::InspectionNotes), "");
        assert_eq!(bare.value(Placeholder::VehicleDamages), "");

        let ctx = fx
            .ctx()
            .with_inspection(Some(&inspection))
            .with_damages(damages.iter().collect());
        assert_eq!(ctx.value(Placeholder::InspectionDate), "01/05/2024 09:45");
        assert_eq!(ctx.value(Placeholder::InspectionMileage), "42000");
        assert_eq!(ctx.value(Placeholder::InspectionFuel), "3/4");
        assert_eq!(
            ctx.substitute("Observations:\n{{inspection_notes}}"),
            "Observations:\nRayure {{ porte avant"
        );
        assert_eq!(
            ctx.value(Placeholder::VehicleDamages),
            "Rayure - Portière avant gauche (léger, en attente)\nPare-brise fissuré (grave, réparé)"
        );
    }

    #[test]
    fn test_unknown_placeholders_with_spans() {
        let found = unknown_placeholders("Hi {{client_name}} {{nickname}}").unwrap();
        assert_eq!(found, vec![("nickname".to_string(), 19..31)]);
    }
}
