//! Back-office records as exported from the agency datastore
//!
//! These are plain data shapes. Field names follow the camelCase of the
//! application with the datastore's snake_case column names accepted as
//! aliases, so both a UI export and a raw table dump deserialize.

pub mod dataset;
pub mod dates;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub use dataset::{Dataset, RecordError};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreInfo {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    /// Logo as a URL, data URI or local file path
    pub logo: Option<String>,
}

impl StoreInfo {
    /// Store name with the application default when unset
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "DriveFlow"
        } else {
            &self.name
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agency {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    CarteIdentite,
    Passeport,
    Autre,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub id: String,
    #[serde(alias = "first_name")]
    pub first_name: String,
    #[serde(alias = "last_name")]
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    #[serde(alias = "id_card_number")]
    pub id_card_number: String,
    pub wilaya: String,
    pub address: String,
    #[serde(with = "dates::option", alias = "date_of_birth")]
    pub date_of_birth: Option<NaiveDateTime>,
    #[serde(alias = "place_of_birth")]
    pub place_of_birth: Option<String>,
    #[serde(alias = "license_number")]
    pub license_number: String,
    #[serde(with = "dates::option", alias = "license_issue_date")]
    pub license_issue_date: Option<NaiveDateTime>,
    #[serde(
        with = "dates::option",
        alias = "license_expiry",
        alias = "licenseExpiryDate",
        alias = "license_expiry_date"
    )]
    pub license_expiry: Option<NaiveDateTime>,
    #[serde(alias = "license_issue_place", alias = "licensePlace")]
    pub license_issue_place: Option<String>,
    #[serde(alias = "document_type")]
    pub document_type: Option<DocumentType>,
    #[serde(alias = "document_number")]
    pub document_number: Option<String>,
    #[serde(alias = "document_images")]
    pub document_images: Vec<String>,
    #[serde(alias = "document_left_at_store")]
    pub document_left_at_store: Option<String>,
    #[serde(alias = "total_reservations")]
    pub total_reservations: u32,
    #[serde(alias = "total_spent")]
    pub total_spent: f64,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FuelType {
    #[default]
    Essence,
    Diesel,
    Gpl,
}

impl FuelType {
    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Essence => "essence",
            FuelType::Diesel => "diesel",
            FuelType::Gpl => "gpl",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transmission {
    #[default]
    Manuelle,
    Automatique,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleStatus {
    #[default]
    #[serde(rename = "disponible")]
    Available,
    #[serde(rename = "loué", alias = "loue")]
    Rented,
    #[serde(rename = "maintenance")]
    Maintenance,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vehicle {
    pub id: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub immatriculation: String,
    pub color: String,
    #[serde(alias = "chassis_number", alias = "vin")]
    pub chassis_number: String,
    #[serde(alias = "fuel_type")]
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub seats: u8,
    pub doors: u8,
    #[serde(alias = "daily_rate")]
    pub daily_rate: f64,
    #[serde(alias = "weekly_rate")]
    pub weekly_rate: f64,
    #[serde(alias = "monthly_rate")]
    pub monthly_rate: f64,
    pub deposit: f64,
    pub status: VehicleStatus,
    #[serde(alias = "current_location")]
    pub current_location: String,
    pub mileage: u32,
    #[serde(with = "dates::option", alias = "insurance_expiry")]
    pub insurance_expiry: Option<NaiveDateTime>,
    #[serde(with = "dates::option", alias = "tech_control_date")]
    pub tech_control_date: Option<NaiveDateTime>,
}

impl Vehicle {
    /// "Brand Model"
    pub fn display_name(&self) -> String {
        format!("{} {}", self.brand, self.model).trim().to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReservationStatus {
    #[default]
    #[serde(rename = "en attente")]
    Pending,
    #[serde(rename = "confermer", alias = "confirmer")]
    Confirmed,
    #[serde(rename = "en cours")]
    InProgress,
    #[serde(rename = "terminer")]
    Completed,
    #[serde(rename = "annuler")]
    Cancelled,
}

impl ReservationStatus {
    /// Datastore spelling of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "en attente",
            ReservationStatus::Confirmed => "confermer",
            ReservationStatus::InProgress => "en cours",
            ReservationStatus::Completed => "terminer",
            ReservationStatus::Cancelled => "annuler",
        }
    }
}

impl std::str::FromStr for ReservationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en attente" | "pending" => Ok(Self::Pending),
            "confermer" | "confirmer" | "confirmed" => Ok(Self::Confirmed),
            "en cours" | "active" => Ok(Self::InProgress),
            "terminer" | "completed" => Ok(Self::Completed),
            "annuler" | "cancelled" => Ok(Self::Cancelled),
            other => Err(format!("unknown reservation status '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionCategory {
    Decoration,
    Equipment,
    Insurance,
    #[default]
    Service,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentalOption {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: OptionCategory,
}

/// Fuel gauge reading, stored in eighths of a tank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum FuelLevel {
    #[serde(rename = "vide")]
    Empty,
    #[serde(rename = "1/8")]
    Eighth,
    #[serde(rename = "1/4")]
    Quarter,
    #[serde(rename = "1/2")]
    Half,
    #[serde(rename = "3/4")]
    ThreeQuarters,
    #[default]
    #[serde(rename = "plein")]
    Full,
}

impl FuelLevel {
    pub fn eighths(&self) -> u32 {
        match self {
            FuelLevel::Empty => 0,
            FuelLevel::Eighth => 1,
            FuelLevel::Quarter => 2,
            FuelLevel::Half => 4,
            FuelLevel::ThreeQuarters => 6,
            FuelLevel::Full => 8,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FuelLevel::Empty => "vide",
            FuelLevel::Eighth => "1/8",
            FuelLevel::Quarter => "1/4",
            FuelLevel::Half => "1/2",
            FuelLevel::ThreeQuarters => "3/4",
            FuelLevel::Full => "plein",
        }
    }
}

impl std::str::FromStr for FuelLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vide" | "empty" | "0" => Ok(Self::Empty),
            "1/8" => Ok(Self::Eighth),
            "1/4" => Ok(Self::Quarter),
            "1/2" => Ok(Self::Half),
            "3/4" => Ok(Self::ThreeQuarters),
            "plein" | "full" | "8/8" => Ok(Self::Full),
            other => Err(format!("unknown fuel level '{}'", other)),
        }
    }
}

/// Odometer/fuel snapshot taken when a rental starts or ends
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationLog {
    pub mileage: u32,
    pub fuel: FuelLevel,
    pub location: String,
    #[serde(with = "dates::option")]
    pub date: Option<NaiveDateTime>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    #[serde(alias = "reservation_number", default)]
    pub reservation_number: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    #[serde(alias = "vehicle_id")]
    pub vehicle_id: String,
    #[serde(with = "dates", alias = "start_date")]
    pub start_date: NaiveDateTime,
    #[serde(with = "dates", alias = "end_date")]
    pub end_date: NaiveDateTime,
    #[serde(alias = "pickup_agency_id", default)]
    pub pickup_agency_id: String,
    #[serde(alias = "return_agency_id", default)]
    pub return_agency_id: String,
    #[serde(alias = "driver_id", default)]
    pub driver_id: Option<String>,
    #[serde(default)]
    pub status: ReservationStatus,
    #[serde(alias = "total_amount", default)]
    pub total_amount: f64,
    #[serde(alias = "paid_amount", default)]
    pub paid_amount: f64,
    #[serde(alias = "caution_amount", default)]
    pub caution_amount: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(rename = "withTVA", alias = "with_tva", alias = "withTva", default)]
    pub with_tva: bool,
    #[serde(default)]
    pub options: Vec<RentalOption>,
    #[serde(alias = "activation_log", default)]
    pub activation_log: Option<LocationLog>,
    #[serde(alias = "termination_log", default)]
    pub termination_log: Option<LocationLog>,
}

impl Reservation {
    /// Amount still owed
    pub fn remaining(&self) -> f64 {
        self.total_amount - self.paid_amount
    }

    /// Whether an option with this name (case-insensitive) was booked
    pub fn has_option(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.options
            .iter()
            .any(|o| o.name.to_lowercase().contains(&needle))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InspectionType {
    #[default]
    Depart,
    Retour,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityChecks {
    pub lights: bool,
    pub tires: bool,
    pub brakes: bool,
    pub wipers: bool,
    pub mirrors: bool,
    pub belts: bool,
    pub horn: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EquipmentChecks {
    pub spare_wheel: bool,
    pub jack: bool,
    pub triangles: bool,
    pub first_aid: bool,
    pub docs: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComfortChecks {
    pub ac: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanlinessChecks {
    pub interior: bool,
    pub exterior: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inspection {
    pub id: String,
    #[serde(alias = "reservation_id")]
    pub reservation_id: String,
    #[serde(rename = "type", default)]
    pub kind: InspectionType,
    #[serde(with = "dates")]
    pub date: NaiveDateTime,
    #[serde(default)]
    pub mileage: u32,
    #[serde(default)]
    pub fuel: String,
    #[serde(default)]
    pub security: SecurityChecks,
    #[serde(default)]
    pub equipment: EquipmentChecks,
    #[serde(default)]
    pub comfort: ComfortChecks,
    #[serde(default)]
    pub cleanliness: CleanlinessChecks,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(alias = "exterior_photos", default)]
    pub exterior_photos: Vec<String>,
    #[serde(alias = "interior_photos", default)]
    pub interior_photos: Vec<String>,
    /// Signature captured on the pad, as a data URL
    #[serde(default)]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Leger,
    Moyen,
    Grave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DamageStatus {
    #[default]
    #[serde(rename = "en attente")]
    Pending,
    #[serde(rename = "réparé", alias = "repare")]
    Repaired,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Leger => "léger",
            Severity::Moyen => "moyen",
            Severity::Grave => "grave",
        }
    }
}

impl DamageStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DamageStatus::Pending => "en attente",
            DamageStatus::Repaired => "réparé",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Damage {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(alias = "vehicle_id")]
    pub vehicle_id: String,
    #[serde(alias = "reservation_id")]
    pub reservation_id: String,
    #[serde(alias = "customer_id")]
    pub customer_id: String,
    #[serde(with = "dates::option")]
    pub date: Option<NaiveDateTime>,
    pub severity: Severity,
    pub position: String,
    pub costs: f64,
    pub status: DamageStatus,
    #[serde(with = "dates::option", alias = "repair_date")]
    pub repair_date: Option<NaiveDateTime>,
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expense {
    pub id: String,
    pub name: String,
    pub cost: f64,
    #[serde(with = "dates::option")]
    pub date: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaintenanceType {
    Vidange,
    Assurance,
    Ct,
    #[default]
    Other,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Maintenance {
    pub id: String,
    #[serde(alias = "vehicle_id")]
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub kind: MaintenanceType,
    pub name: String,
    pub cost: f64,
    #[serde(with = "dates::option")]
    pub date: Option<NaiveDateTime>,
    #[serde(with = "dates::option", alias = "expiry_date")]
    pub expiry_date: Option<NaiveDateTime>,
    pub note: Option<String>,
}
