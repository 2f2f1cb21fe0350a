//! Template registry for saved, personalized templates

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::{default_template, inspection_template, Category, DocumentTemplate};
use crate::locale::Locale;
use crate::records::{Damage, Inspection};

/// Inspection data used to build a report when no template was saved
#[derive(Debug, Clone, Copy)]
pub struct InspectionSource<'a> {
    pub inspection: &'a Inspection,
    pub reservation_number: &'a str,
    /// Damages recorded on the inspected vehicle
    pub damages: &'a [&'a Damage],
}

/// Registry holding at most one template per category
#[derive(Debug, Default, Clone)]
pub struct TemplateRegistry {
    templates: BTreeMap<Category, DocumentTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from saved templates; later entries win
    pub fn from_templates(templates: impl IntoIterator<Item = DocumentTemplate>) -> Self {
        let mut registry = Self::new();
        for template in templates {
            registry.register(template);
        }
        registry
    }

    /// Save a template, replacing the one of the same category
    ///
    /// Returns the template that was replaced, if any.
    pub fn register(&mut self, template: DocumentTemplate) -> Option<DocumentTemplate> {
        let category = template.category;
        let previous = self.templates.insert(category, template);
        if previous.is_some() {
            info!(category = %category, "replaced saved template");
        }
        previous
    }

    pub fn get(&self, category: Category) -> Option<&DocumentTemplate> {
        self.templates.get(&category)
    }

    /// Look up a saved template by category name or one of its aliases
    pub fn find(&self, name: &str) -> Option<&DocumentTemplate> {
        let key = name.trim().to_lowercase();
        if let Some(exact) = self.templates.values().find(|t| t.category.as_str() == key) {
            return Some(exact);
        }
        let category: Category = key.parse().ok()?;
        self.get(category)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Template to print for a category
    ///
    /// A saved template wins. Inspection reports without a saved template
    /// are built from the inspection when one is supplied. Everything else
    /// falls back to the built-in layout.
    pub fn resolve_for_print(
        &self,
        category: Category,
        locale: Locale,
        inspection: Option<InspectionSource<'_>>,
    ) -> DocumentTemplate {
        if let Some(saved) = self.get(category) {
            debug!(category = %category, template = %saved.id, "using saved template");
            return saved.clone();
        }
        if category.is_inspection() {
            if let Some(src) = inspection {
                debug!(category = %category, inspection = %src.inspection.id, "building inspection report");
                return inspection_template(src.inspection, src.reservation_number, src.damages);
            }
        }
        debug!(category = %category, "using built-in template");
        default_template(category, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::InspectionType;
    use crate::template::{ElementKind, TemplateElement};

    fn saved(category: Category, id: &str) -> DocumentTemplate {
        let mut tpl = DocumentTemplate::new(
            category,
            vec![TemplateElement::new("t", ElementKind::Text, "custom")],
        );
        tpl.id = id.to_string();
        tpl
    }

    #[test]
    fn test_register_replaces_same_category() {
        let mut registry = TemplateRegistry::new();
        assert!(registry.register(saved(Category::Facture, "a")).is_none());
        let previous = registry.register(saved(Category::Facture, "b")).unwrap();
        assert_eq!(previous.id, "a");
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(Category::Facture).unwrap().id, "b");
    }

    #[test]
    fn test_find_by_alias() {
        let registry = TemplateRegistry::from_templates([
            saved(Category::Facture, "inv"),
            saved(Category::Checkin, "pv"),
        ]);
        assert_eq!(registry.find("invoice").unwrap().id, "inv");
        assert_eq!(registry.find("FACTURE").unwrap().id, "inv");
        assert_eq!(registry.find("pv-depart").unwrap().id, "pv");
        assert!(registry.find("devis").is_none());
        assert!(registry.find("nonsense").is_none());
    }

    #[test]
    fn test_resolve_saved_over_default() {
        let registry = TemplateRegistry::from_templates([saved(Category::Devis, "mine")]);
        assert_eq!(
            registry.resolve_for_print(Category::Devis, Locale::Fr, None).id,
            "mine"
        );
        let fallback = registry.resolve_for_print(Category::Facture, Locale::Fr, None);
        assert_eq!(fallback.category, Category::Facture);
        assert_eq!(fallback.id, "tpl-facture");
    }

    #[test]
    fn test_resolve_builds_inspection_report() {
        let registry = TemplateRegistry::new();
        let inspection = Inspection {
            id: "insp-1".into(),
            kind: InspectionType::Retour,
            ..Default::default()
        };
        let tpl = registry.resolve_for_print(
            Category::Checkout,
            Locale::Fr,
            Some(InspectionSource {
                inspection: &inspection,
                reservation_number: "RES-9",
                damages: &[],
            }),
        );
        assert_eq!(tpl.id, "insp-tpl-insp-1");

        let plain = registry.resolve_for_print(Category::Checkout, Locale::Fr, None);
        assert_eq!(plain.id, "tpl-checkout");
    }
}
