//! Datastore export loading and record lookups

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use super::{
    Agency, Customer, Damage, Expense, Inspection, InspectionType, Maintenance, Reservation,
    ReservationStatus, StoreInfo, Vehicle,
};
use crate::template::DocumentTemplate;

/// Errors that can occur when loading or querying records
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Failed to read data file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse data JSON: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },
}

impl RecordError {
    pub fn not_found(kind: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            key: key.into(),
        }
    }
}

/// Every table the documents draw from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub store: Option<StoreInfo>,
    pub agencies: Vec<Agency>,
    pub customers: Vec<Customer>,
    pub vehicles: Vec<Vehicle>,
    pub reservations: Vec<Reservation>,
    pub inspections: Vec<Inspection>,
    pub damages: Vec<Damage>,
    pub expenses: Vec<Expense>,
    #[serde(alias = "maintenances")]
    pub maintenance: Vec<Maintenance>,
    pub templates: Vec<DocumentTemplate>,
}

impl Dataset {
    /// Load a dataset from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, RecordError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Load a dataset from JSON text
    ///
    /// Accepts either the collections at top level or the backup envelope
    /// `{ "exportDate": .., "version": .., "data": { .. } }`.
    pub fn from_json(content: &str) -> Result<Self, RecordError> {
        let mut value: serde_json::Value = serde_json::from_str(content)?;
        if let Some(data) = value
            .get_mut("data")
            .filter(|d| d.is_object())
            .map(serde_json::Value::take)
        {
            debug!("reading backup envelope");
            value = data;
        }
        let dataset: Dataset = serde_json::from_value(value)?;
        debug!(
            customers = dataset.customers.len(),
            vehicles = dataset.vehicles.len(),
            reservations = dataset.reservations.len(),
            templates = dataset.templates.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }

    /// Find a reservation by id or by reservation number
    pub fn reservation(&self, key: &str) -> Result<&Reservation, RecordError> {
        self.reservations
            .iter()
            .find(|r| r.id == key)
            .or_else(|| {
                self.reservations
                    .iter()
                    .find(|r| r.reservation_number.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| RecordError::not_found("reservation", key))
    }

    pub fn customer(&self, id: &str) -> Result<&Customer, RecordError> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| RecordError::not_found("customer", id))
    }

    pub fn vehicle(&self, id: &str) -> Result<&Vehicle, RecordError> {
        self.vehicles
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| RecordError::not_found("vehicle", id))
    }

    pub fn inspection(&self, id: &str) -> Result<&Inspection, RecordError> {
        self.inspections
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| RecordError::not_found("inspection", id))
    }

    /// Most recent inspection of a given type for a reservation
    pub fn latest_inspection(
        &self,
        reservation_id: &str,
        kind: InspectionType,
    ) -> Option<&Inspection> {
        self.inspections
            .iter()
            .filter(|i| i.reservation_id == reservation_id && i.kind == kind)
            .max_by_key(|i| i.date)
    }

    /// Damages recorded against a vehicle, newest first
    pub fn damages_for_vehicle(&self, vehicle_id: &str) -> Vec<&Damage> {
        let mut found: Vec<&Damage> = self
            .damages
            .iter()
            .filter(|d| d.vehicle_id == vehicle_id)
            .collect();
        found.sort_by(|a, b| b.date.cmp(&a.date));
        found
    }

    /// Reservations whose number or customer name contains `query`
    /// (case-insensitive), optionally restricted to one status
    pub fn search_reservations(
        &self,
        query: &str,
        status: Option<ReservationStatus>,
    ) -> Vec<&Reservation> {
        let q = query.trim().to_lowercase();
        self.reservations
            .iter()
            .filter(|res| status.map_or(true, |s| res.status == s))
            .filter(|res| {
                if q.is_empty() {
                    return true;
                }
                let name = self
                    .customer(&res.customer_id)
                    .map(|c| c.full_name().to_lowercase())
                    .unwrap_or_default();
                res.reservation_number.to_lowercase().contains(&q) || name.contains(&q)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "customers": [{"id": "c1", "firstName": "Amine", "lastName": "Benali", "phone": "0550"}],
        "vehicles": [{"id": "v1", "brand": "Renault", "model": "Clio", "dailyRate": 5000}],
        "reservations": [
            {"id": "r1", "reservationNumber": "RES-001", "customerId": "c1", "vehicleId": "v1",
             "startDate": "2024-05-01", "endDate": "2024-05-03", "status": "confermer"},
            {"id": "r2", "reservationNumber": "RES-002", "customerId": "c1", "vehicleId": "v1",
             "startDate": "2024-06-01", "endDate": "2024-06-03", "status": "terminer"}
        ]
    }"#;

    #[test]
    fn test_flat_layout() {
        let ds = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(ds.reservations.len(), 2);
        assert!(ds.store.is_none());
    }

    #[test]
    fn test_backup_envelope() {
        let wrapped = format!(
            r#"{{"exportDate": "2024-07-01T00:00:00Z", "version": "1.0", "data": {}}}"#,
            SAMPLE
        );
        let ds = Dataset::from_json(&wrapped).unwrap();
        assert_eq!(ds.customers.len(), 1);
    }

    #[test]
    fn test_reservation_by_number_or_id() {
        let ds = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(ds.reservation("r2").unwrap().reservation_number, "RES-002");
        assert_eq!(ds.reservation("res-001").unwrap().id, "r1");
        assert!(matches!(
            ds.reservation("nope"),
            Err(RecordError::NotFound { kind: "reservation", .. })
        ));
    }

    #[test]
    fn test_search_by_customer_name_and_status() {
        let ds = Dataset::from_json(SAMPLE).unwrap();
        assert_eq!(ds.search_reservations("benali", None).len(), 2);
        assert_eq!(
            ds.search_reservations("AMINE", Some(ReservationStatus::Completed))
                .len(),
            1
        );
        assert_eq!(ds.search_reservations("002", None).len(), 1);
        assert_eq!(ds.search_reservations("", None).len(), 2);
    }

    const INSPECTIONS: &str = r#"{
        "inspections": [
            {"id": "d-old", "reservationId": "r1", "type": "depart", "date": "2024-05-01T09:00"},
            {"id": "ret", "reservationId": "r1", "type": "retour", "date": "2024-05-03T18:00"},
            {"id": "d-new", "reservationId": "r1", "type": "depart", "date": "2024-05-01T11:30"},
            {"id": "other", "reservationId": "r2", "type": "depart", "date": "2024-06-01T08:00"}
        ],
        "damages": [
            {"id": "dm1", "vehicleId": "v1", "name": "Rayure", "date": "2024-02-10"},
            {"id": "dm2", "vehicleId": "v2", "name": "Bosse", "date": "2024-03-01"},
            {"id": "dm3", "vehicleId": "v1", "name": "Rétroviseur", "date": "2024-04-22"}
        ]
    }"#;

    #[test]
    fn test_latest_inspection_of_each_type() {
        let ds = Dataset::from_json(INSPECTIONS).unwrap();
        let id = |kind| ds.latest_inspection("r1", kind).map(|i| i.id.as_str());
        assert_eq!(id(InspectionType::Depart), Some("d-new"));
        assert_eq!(id(InspectionType::Retour), Some("ret"));
        assert!(ds.latest_inspection("r3", InspectionType::Depart).is_none());
    }

    #[test]
    fn test_damages_for_vehicle_newest_first() {
        let ds = Dataset::from_json(INSPECTIONS).unwrap();
        let names: Vec<_> = ds
            .damages_for_vehicle("v1")
            .into_iter()
            .map(|d| d.name.as_str())
            .collect();
        assert_eq!(names, vec!["Rétroviseur", "Rayure"]);
        assert!(ds.damages_for_vehicle("v9").is_empty());
    }
}
