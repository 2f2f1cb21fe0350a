//! DriveFlow - printable documents for a car rental agency
//!
//! This library binds reservation data to positioned document templates
//! (quotes, contracts, payment receipts, invoices and inspection reports)
//! and renders them as standalone, print-ready HTML. It also carries the
//! billing arithmetic those documents print: quotes, payments, rental
//! lifecycle transitions and return penalties.
//!
//! # Example
//!
//! ```rust
//! use driveflow::{render_document, Category, Dataset, DocumentRequest, RenderConfig};
//!
//! let dataset = Dataset::from_json(r#"{
//!     "customers": [{"id": "c1", "firstName": "Amine", "lastName": "Benali"}],
//!     "vehicles": [{"id": "v1", "brand": "Renault", "model": "Clio", "dailyRate": 4500}],
//!     "reservations": [{
//!         "id": "r1", "reservationNumber": "RES-1",
//!         "customerId": "c1", "vehicleId": "v1",
//!         "startDate": "2024-05-01T10:00:00", "endDate": "2024-05-04T10:00:00",
//!         "totalAmount": 13500
//!     }]
//! }"#).unwrap();
//!
//! let request = DocumentRequest::new("RES-1", Category::Facture);
//! let html = render_document(&dataset, &request, &RenderConfig::default()).unwrap();
//! assert!(html.contains("<!DOCTYPE html>"));
//! assert!(html.contains("Amine Benali"));
//! ```

pub mod billing;
pub mod config;
pub mod error;
pub mod lint;
pub mod locale;
pub mod parser;
pub mod records;
pub mod renderer;
pub mod stylesheet;
pub mod template;

pub use billing::{BillingError, PenaltyBreakdown, Quote};
pub use config::{AgencyConfig, ConfigError, DocumentSettings};
pub use error::ParseError;
pub use lint::{LintCategory, LintWarning};
pub use locale::Locale;
pub use parser::parse_text;
pub use records::{Dataset, RecordError};
pub use renderer::{render_html, PrintConfig};
pub use template::{Category, DocumentTemplate, RenderContext, TemplateError, TemplateRegistry};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

// Re-export Stylesheet for public API
pub use stylesheet::{Stylesheet, StylesheetError};

use records::InspectionType;
use template::InspectionSource;

/// Errors that can occur during the render pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Billing(#[from] BillingError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Stylesheet(#[from] StylesheetError),

    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Agency settings: store identity, locale, TVA and penalty policies
    pub agency: AgencyConfig,
    /// HTML output configuration
    pub print: PrintConfig,
    /// Stylesheet for color resolution
    pub stylesheet: Stylesheet,
    /// Date printed as `current_date`; the local date when unset
    pub today: Option<NaiveDate>,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_agency(mut self, agency: AgencyConfig) -> Self {
        self.agency = agency;
        self
    }

    /// Set the HTML output configuration
    pub fn with_print(mut self, config: PrintConfig) -> Self {
        self.print = config;
        self
    }

    /// Set the stylesheet for color resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Pin the date used for `current_date`
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

/// What to print: a document category for one reservation
#[derive(Debug, Clone)]
pub struct DocumentRequest {
    /// Reservation id or reservation number
    pub reservation: String,
    pub category: Category,
    /// Inspection to report on; the latest matching one when unset
    pub inspection: Option<String>,
    /// Template used instead of the saved or built-in one
    pub template: Option<DocumentTemplate>,
}

impl DocumentRequest {
    pub fn new(reservation: impl Into<String>, category: Category) -> Self {
        Self {
            reservation: reservation.into(),
            category,
            inspection: None,
            template: None,
        }
    }

    pub fn with_inspection(mut self, id: impl Into<String>) -> Self {
        self.inspection = Some(id.into());
        self
    }

    pub fn with_template(mut self, template: DocumentTemplate) -> Self {
        self.template = Some(template);
        self
    }
}

/// Render a document for a reservation
pub fn render_document(
    dataset: &Dataset,
    request: &DocumentRequest,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    render_with_lint(dataset, request, config).map(|(html, _)| html)
}

/// Render a document and return the lint warnings of its template
///
/// Warnings never stop rendering; they are also logged.
pub fn render_with_lint(
    dataset: &Dataset,
    request: &DocumentRequest,
    config: &RenderConfig,
) -> Result<(String, Vec<LintWarning>), RenderError> {
    let reservation = dataset.reservation(&request.reservation)?;
    let customer = dataset.customer(&reservation.customer_id)?;
    let vehicle = dataset.vehicle(&reservation.vehicle_id)?;
    let store = config.agency.store_for(dataset.store.as_ref());
    let settings = &config.agency.document;
    let category = request.category;

    let inspection = match &request.inspection {
        Some(id) => Some(dataset.inspection(id)?),
        None if category.is_inspection() => {
            let kind = if category == Category::Checkin {
                InspectionType::Depart
            } else {
                InspectionType::Retour
            };
            dataset.latest_inspection(&reservation.id, kind)
        }
        None => None,
    };

    let damages = if category.is_inspection() {
        dataset.damages_for_vehicle(&vehicle.id)
    } else {
        Vec::new()
    };

    let template = match &request.template {
        Some(template) => {
            debug!(template = %template.id, "using template given with the request");
            template.clone()
        }
        None => {
            let registry = TemplateRegistry::from_templates(dataset.templates.iter().cloned());
            let source = inspection.map(|inspection| InspectionSource {
                inspection,
                reservation_number: &reservation.reservation_number,
                damages: &damages,
            });
            registry.resolve_for_print(category, settings.locale, source)
        }
    };

    let warnings = lint::check(&template);
    for warning in &warnings {
        warn!(template = %template.id, "{}", warning);
    }

    let print = config
        .print
        .clone()
        .with_auto_print(config.print.auto_print && settings.auto_print);
    let ctx = RenderContext::new(reservation, customer, vehicle, &store, settings, config.today())
        .with_inspection(inspection)
        .with_damages(damages.clone());

    let html = render_html(&template, &ctx, &print, &config.stylesheet);
    info!(
        reservation = %reservation.reservation_number,
        category = %category,
        template = %template.id,
        "rendered document"
    );
    Ok((html, warnings))
}
