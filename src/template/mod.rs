//! Document templates
//!
//! A template is a canvas of absolutely positioned elements. Text content
//! may carry `{{placeholder}}` tokens that are bound to reservation data at
//! print time by the [`resolver`].
//!
//! Templates come from three places: the built-in layouts in [`defaults`],
//! personalized templates saved in the datastore (JSON), and hand-authored
//! TOML files:
//!
//! ```toml
//! name = "Facture simple"
//! category = "facture"
//!
//! [[elements]]
//! id = "title"
//! type = "text"
//! content = "FACTURE {{res_number}}"
//! x = 50
//! y = 40
//! width = 300
//! height = 40
//! font_size = 24
//! ```

mod checklist;
pub mod defaults;
mod inspection;
mod registry;
pub mod resolver;

pub use checklist::{Checklist, ChecklistItem};
pub use defaults::default_template;
pub use inspection::inspection_template;
pub use registry::{InspectionSource, TemplateRegistry};
pub use resolver::{unknown_placeholders, Placeholder, RenderContext};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("unknown document category: {0}")]
    UnknownCategory(String),

    #[error("element not found: {id}")]
    ElementNotFound { id: String },

    #[error("invalid checklist: {message}")]
    InvalidChecklist { message: String },

    #[error("error reading template file {path}: {message}")]
    FileReadError { path: PathBuf, message: String },

    #[error("unsupported template format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid template JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid template TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("cannot write template as TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
}

/// Kind of printed document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Category {
    /// Quote
    Devis,
    /// Rental contract
    Contrat,
    /// Payment receipt
    Versement,
    /// Invoice
    Facture,
    /// Departure inspection report
    Checkin,
    /// Return inspection report
    Checkout,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Devis,
        Category::Contrat,
        Category::Versement,
        Category::Facture,
        Category::Checkin,
        Category::Checkout,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Devis => "devis",
            Category::Contrat => "contrat",
            Category::Versement => "versement",
            Category::Facture => "facture",
            Category::Checkin => "checkin",
            Category::Checkout => "checkout",
        }
    }

    /// Other names the category has been saved under
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Category::Devis => &["quote"],
            Category::Contrat => &["contract"],
            Category::Versement => &["payment", "receipt"],
            Category::Facture => &["invoice"],
            Category::Checkin => &["pv_depart", "pv-depart"],
            Category::Checkout => &["pv_retour", "pv-retour"],
        }
    }

    /// Title used when a template has no name
    pub fn title(&self) -> &'static str {
        match self {
            Category::Devis => "Devis",
            Category::Contrat => "Contrat de location",
            Category::Versement => "Reçu de versement",
            Category::Facture => "Facture",
            Category::Checkin => "P.V de départ",
            Category::Checkout => "P.V de retour",
        }
    }

    pub fn is_inspection(&self) -> bool {
        matches!(self, Category::Checkin | Category::Checkout)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == key || c.aliases().contains(&key.as_str()))
            .ok_or_else(|| TemplateError::UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for Category {
    type Error = TemplateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// What an element draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    #[default]
    #[serde(alias = "static")]
    Text,
    Logo,
    #[serde(alias = "signature_area")]
    Signature,
    Image,
    Table,
    Divider,
    Checklist,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_css(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

/// A positioned, styled element of a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TemplateElement {
    pub id: String,
    #[serde(rename = "type", alias = "kind")]
    pub kind: ElementKind,
    pub content: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(alias = "font_size")]
    pub font_size: f64,
    /// CSS color or palette token
    pub color: String,
    #[serde(alias = "font_family")]
    pub font_family: String,
    #[serde(alias = "font_weight")]
    pub font_weight: String,
    #[serde(alias = "text_align")]
    pub text_align: TextAlign,
    #[serde(alias = "background_color")]
    pub background_color: String,
    #[serde(alias = "border_color")]
    pub border_color: String,
    #[serde(alias = "border_width")]
    pub border_width: f64,
    pub opacity: f64,
}

impl Default for TemplateElement {
    fn default() -> Self {
        Self {
            id: String::new(),
            kind: ElementKind::Text,
            content: String::new(),
            x: 0.0,
            y: 0.0,
            width: 200.0,
            height: 40.0,
            font_size: 12.0,
            color: "#111827".to_string(),
            font_family: "Inter".to_string(),
            font_weight: "400".to_string(),
            text_align: TextAlign::Left,
            background_color: "transparent".to_string(),
            border_color: "#e5e7eb".to_string(),
            border_width: 0.0,
            opacity: 1.0,
        }
    }
}

impl TemplateElement {
    pub fn new(id: impl Into<String>, kind: ElementKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn font(mut self, size: f64, weight: &str) -> Self {
        self.font_size = size;
        self.font_weight = weight.to_string();
        self
    }

    pub fn color(mut self, color: &str) -> Self {
        self.color = color.to_string();
        self
    }

    pub fn align(mut self, align: TextAlign) -> Self {
        self.text_align = align;
        self
    }

    pub fn background(mut self, color: &str) -> Self {
        self.background_color = color.to_string();
        self
    }

    pub fn border(mut self, color: &str, width: f64) -> Self {
        self.border_color = color.to_string();
        self.border_width = width;
        self
    }

    /// Apply the fields set in `patch`
    pub fn update(&mut self, patch: &ElementPatch) {
        if let Some(content) = &patch.content {
            self.content = content.clone();
        }
        if let Some(x) = patch.x {
            self.x = x.max(0.0);
        }
        if let Some(y) = patch.y {
            self.y = y.max(0.0);
        }
        if let Some(w) = patch.width {
            self.width = w.max(0.0);
        }
        if let Some(h) = patch.height {
            self.height = h.max(0.0);
        }
        if let Some(size) = patch.font_size {
            self.font_size = size;
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
        if let Some(family) = &patch.font_family {
            self.font_family = family.clone();
        }
        if let Some(weight) = &patch.font_weight {
            self.font_weight = weight.clone();
        }
        if let Some(align) = patch.text_align {
            self.text_align = align;
        }
        if let Some(bg) = &patch.background_color {
            self.background_color = bg.clone();
        }
        if let Some(bc) = &patch.border_color {
            self.border_color = bc.clone();
        }
        if let Some(bw) = patch.border_width {
            self.border_width = bw.max(0.0);
        }
        if let Some(opacity) = patch.opacity {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
    }

    /// Bottom edge on the canvas
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Whether the element's box intersects another's
    pub fn overlaps(&self, other: &TemplateElement) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the content goes through placeholder substitution
    pub fn has_text(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Text | ElementKind::Signature | ElementKind::Table
        ) && !self.content.is_empty()
    }
}

/// A partial update to an element's content or style
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ElementPatch {
    pub content: Option<String>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub font_size: Option<f64>,
    pub color: Option<String>,
    pub font_family: Option<String>,
    pub font_weight: Option<String>,
    pub text_align: Option<TextAlign>,
    pub background_color: Option<String>,
    pub border_color: Option<String>,
    pub border_width: Option<f64>,
    pub opacity: Option<f64>,
}

pub const DEFAULT_CANVAS_WIDTH: f64 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f64 = 1100.0;

/// Pages a single document may print; elements placed lower are dropped
pub const MAX_PAGES: usize = 20;

fn default_canvas_width() -> f64 {
    DEFAULT_CANVAS_WIDTH
}

fn default_canvas_height() -> f64 {
    DEFAULT_CANVAS_HEIGHT
}

/// A printable document layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentTemplate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub category: Category,
    #[serde(alias = "canvas_width", default = "default_canvas_width")]
    pub canvas_width: f64,
    /// Height of one printed page; content below it flows onto further pages
    #[serde(alias = "canvas_height", default = "default_canvas_height")]
    pub canvas_height: f64,
    #[serde(default)]
    pub elements: Vec<TemplateElement>,
}

impl DocumentTemplate {
    pub fn new(category: Category, elements: Vec<TemplateElement>) -> Self {
        Self {
            id: format!("tpl-{}", category),
            name: format!("Modèle {}", category),
            category,
            elements,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
        }
    }

    pub fn with_canvas(mut self, width: f64, height: f64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name printed in the document title
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            self.category.title()
        } else {
            &self.name
        }
    }

    pub fn from_json(content: &str) -> Result<Self, TemplateError> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn from_toml(content: &str) -> Result<Self, TemplateError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a template file, choosing the format from its extension
    pub fn from_file(path: &Path) -> Result<Self, TemplateError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| TemplateError::FileReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            Some("toml") => Self::from_toml(&content),
            _ => Err(TemplateError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }

    pub fn to_json(&self) -> Result<String, TemplateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn to_toml(&self) -> Result<String, TemplateError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn element(&self, id: &str) -> Option<&TemplateElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    fn element_mut(&mut self, id: &str) -> Result<&mut TemplateElement, TemplateError> {
        self.elements
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| TemplateError::ElementNotFound { id: id.to_string() })
    }

    /// Shift an element, keeping it inside the top-left corner of the canvas
    pub fn move_element(&mut self, id: &str, dx: f64, dy: f64) -> Result<(), TemplateError> {
        let element = self.element_mut(id)?;
        element.x = (element.x + dx).max(0.0);
        element.y = (element.y + dy).max(0.0);
        Ok(())
    }

    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) -> Result<(), TemplateError> {
        self.element_mut(id)?.update(patch);
        Ok(())
    }

    /// Zero-based page holding the canvas coordinate `y`, or `None` past
    /// the last printable page
    pub fn page_at(&self, y: f64) -> Option<usize> {
        if self.canvas_height.is_nan() || self.canvas_height <= 0.0 {
            return Some(0);
        }
        let page = (y.max(0.0) / self.canvas_height).floor();
        (page.is_finite() && page < MAX_PAGES as f64).then_some(page as usize)
    }

    /// Zero-based page an element starts on
    pub fn page_of(&self, element: &TemplateElement) -> Option<usize> {
        self.page_at(element.y)
    }

    /// Printable elements grouped by the page they start on, in template
    /// order; pages without elements are absent
    pub fn pages(&self) -> BTreeMap<usize, Vec<&TemplateElement>> {
        let mut pages: BTreeMap<usize, Vec<&TemplateElement>> = BTreeMap::new();
        for element in &self.elements {
            if let Some(page) = self.page_of(element) {
                pages.entry(page).or_default().push(element);
            }
        }
        pages
    }

    /// Number of printed pages
    pub fn page_count(&self) -> usize {
        self.pages().len().max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_category_aliases() {
        assert_eq!("quote".parse::<Category>().unwrap(), Category::Devis);
        assert_eq!("Invoice".parse::<Category>().unwrap(), Category::Facture);
        assert_eq!("PV-DEPART".parse::<Category>().unwrap(), Category::Checkin);
        assert_eq!("pv_retour".parse::<Category>().unwrap(), Category::Checkout);
        assert_eq!("receipt".parse::<Category>().unwrap(), Category::Versement);
        assert!(matches!(
            "brochure".parse::<Category>(),
            Err(TemplateError::UnknownCategory(_))
        ));
    }

    #[test]
    fn test_datastore_json_with_legacy_kinds() {
        let json = r#"{
            "id": "insp-tpl-1",
            "name": "DÉPART - P.V d'Inspection #RES-1",
            "category": "pv_depart",
            "canvasWidth": 595,
            "canvasHeight": 842,
            "elements": [
                {"id": "title", "type": "static", "content": "Rapport", "x": 40, "y": 40, "fontSize": 20, "fontWeight": "900"},
                {"id": "sig", "type": "signature_area", "content": "Signature", "x": 40, "y": 700}
            ]
        }"#;
        let tpl = DocumentTemplate::from_json(json).unwrap();
        assert_eq!(tpl.category, Category::Checkin);
        assert_eq!(tpl.elements[0].kind, ElementKind::Text);
        assert_eq!(tpl.elements[0].font_size, 20.0);
        assert_eq!(tpl.elements[0].color, "#111827");
        assert_eq!(tpl.elements[1].kind, ElementKind::Signature);
        assert_eq!(tpl.canvas_width, 595.0);
    }

    #[test]
    fn test_toml_with_snake_case_fields() {
        let toml = r##"
name = "Facture simple"
category = "invoice"

[[elements]]
id = "title"
type = "text"
content = "FACTURE {{res_number}}"
x = 50
y = 40
font_size = 24
text_align = "center"
background_color = "#dbeafe"
"##;
        let tpl = DocumentTemplate::from_toml(toml).unwrap();
        assert_eq!(tpl.category, Category::Facture);
        assert_eq!(tpl.canvas_height, DEFAULT_CANVAS_HEIGHT);
        let title = tpl.element("title").unwrap();
        assert_eq!(title.font_size, 24.0);
        assert_eq!(title.text_align, TextAlign::Center);
        assert_eq!(title.background_color, "#dbeafe");
    }

    #[test]
    fn test_json_roundtrip_keeps_canonical_category() {
        let tpl = DocumentTemplate::new(Category::Versement, vec![]);
        let json = tpl.to_json().unwrap();
        assert!(json.contains("\"category\": \"versement\""));
        assert_eq!(DocumentTemplate::from_json(&json).unwrap(), tpl);
    }

    #[test]
    fn test_move_element_clamps() {
        let mut tpl = DocumentTemplate::new(
            Category::Devis,
            vec![TemplateElement::new("a", ElementKind::Text, "x").at(30.0, 10.0)],
        );
        tpl.move_element("a", -50.0, 25.0).unwrap();
        let a = tpl.element("a").unwrap();
        assert_eq!((a.x, a.y), (0.0, 35.0));
        assert!(matches!(
            tpl.move_element("missing", 1.0, 1.0),
            Err(TemplateError::ElementNotFound { .. })
        ));
    }

    #[test]
    fn test_update_applies_only_set_fields() {
        let mut el = TemplateElement::new("a", ElementKind::Text, "Bonjour");
        el.update(&ElementPatch {
            font_size: Some(18.0),
            color: Some("accent-1".to_string()),
            opacity: Some(3.0),
            ..Default::default()
        });
        assert_eq!(el.content, "Bonjour");
        assert_eq!(el.font_size, 18.0);
        assert_eq!(el.color, "accent-1");
        assert_eq!(el.opacity, 1.0);
    }

    #[test]
    fn test_pages() {
        let tpl = DocumentTemplate::new(
            Category::Contrat,
            vec![
                TemplateElement::new("a", ElementKind::Text, "").at(0.0, 20.0),
                TemplateElement::new("b", ElementKind::Text, "").at(0.0, 1100.0),
            ],
        );
        assert_eq!(tpl.page_of(&tpl.elements[1]), Some(1));
        assert_eq!(tpl.page_count(), 2);
        assert_eq!(DocumentTemplate::new(Category::Devis, vec![]).page_count(), 1);
    }

    #[test]
    fn test_pages_are_bounded() {
        let tpl = DocumentTemplate::new(
            Category::Contrat,
            vec![
                TemplateElement::new("a", ElementKind::Text, "").at(0.0, 20.0),
                TemplateElement::new("gap", ElementKind::Text, "").at(0.0, 5600.0),
                TemplateElement::new("far", ElementKind::Text, "").at(0.0, 110_000.0),
                TemplateElement::new("huge", ElementKind::Text, "").at(0.0, 1e20),
                TemplateElement::new("inf", ElementKind::Text, "").at(0.0, f64::INFINITY),
            ],
        );
        assert_eq!(tpl.page_of(&tpl.elements[1]), Some(5));
        assert_eq!(tpl.page_of(&tpl.elements[2]), None);
        assert_eq!(tpl.page_of(&tpl.elements[3]), None);
        assert_eq!(tpl.page_of(&tpl.elements[4]), None);
        assert_eq!(tpl.pages().keys().copied().collect::<Vec<_>>(), vec![0, 5]);
        assert_eq!(tpl.page_count(), 2);
        assert_eq!(tpl.page_at(f64::NAN), Some(0));
        assert_eq!(tpl.page_at((MAX_PAGES as f64) * 1100.0 - 1.0), Some(MAX_PAGES - 1));
    }

    #[test]
    fn test_overlap() {
        let a = TemplateElement::new("a", ElementKind::Text, "").at(0.0, 0.0).size(100.0, 50.0);
        let b = TemplateElement::new("b", ElementKind::Text, "").at(99.0, 49.0).size(10.0, 10.0);
        let c = TemplateElement::new("c", ElementKind::Text, "").at(100.0, 0.0).size(10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
    }
}
