//! Report template built from a recorded inspection

use super::{
    Category, Checklist, DocumentTemplate, ElementKind, TemplateElement, TextAlign,
};
use crate::records::{Damage, Inspection, InspectionType};

const A4_WIDTH: f64 = 595.0;
const A4_HEIGHT: f64 = 842.0;

fn sections(inspection: &Inspection) -> [(&'static str, Checklist); 4] {
    let sec = &inspection.security;
    let eq = &inspection.equipment;
    [
        (
            "Contrôle Sécurité",
            Checklist::from_items([
                ("Feux & Phares", sec.lights),
                ("Pneus (Usure/Pression)", sec.tires),
                ("Freins", sec.brakes),
                ("Essuie-glaces", sec.wipers),
                ("Rétroviseurs", sec.mirrors),
                ("Ceintures", sec.belts),
                ("Klaxon", sec.horn),
            ]),
        ),
        (
            "Équipements Obligatoires",
            Checklist::from_items([
                ("Roue de secours", eq.spare_wheel),
                ("Cric", eq.jack),
                ("Triangles", eq.triangles),
                ("Trousse secours", eq.first_aid),
                ("Docs véhicule", eq.docs),
            ]),
        ),
        (
            "Confort",
            Checklist::from_items([("Climatisation (A/C)", inspection.comfort.ac)]),
        ),
        (
            "État & Propreté",
            Checklist::from_items([
                ("Intérieur Propre", inspection.cleanliness.interior),
                ("Extérieur Propre", inspection.cleanliness.exterior),
            ]),
        ),
    ]
}

/// Build a one-page A4 report showing the state captured by an inspection
///
/// Recorded values are bound through placeholders, so the report must be
/// rendered with the same inspection and damages in its `RenderContext`.
/// The damages block is only laid out when `damages` is not empty.
pub fn inspection_template(
    inspection: &Inspection,
    reservation_number: &str,
    damages: &[&Damage],
) -> DocumentTemplate {
    let (label, category) = match inspection.kind {
        InspectionType::Depart => ("DÉPART", Category::Checkin),
        InspectionType::Retour => ("RETOUR", Category::Checkout),
    };

    let mut elements = vec![
        TemplateElement::new("title", ElementKind::Text, format!("{} - Rapport d'Inspection", label))
            .at(40.0, 40.0)
            .size(515.0, 30.0)
            .font(20.0, "900"),
        TemplateElement::new(
            "meta",
            ElementKind::Text,
            "Dossier: {{res_number}}\nClient: {{client_name}}\nDate: {{inspection_date}}\n\
Kilométrage: {{inspection_mileage}} km | Carburant: {{inspection_fuel}}",
        )
        .at(40.0, 80.0)
        .size(515.0, 64.0)
        .font(10.0, "700"),
    ];

    let mut y = 156.0;
    for (i, (title, list)) in sections(inspection).into_iter().enumerate() {
        let rows = list.items.len().div_ceil(2) as f64;
        elements.push(
            TemplateElement::new(format!("section-{}", i + 1), ElementKind::Text, title)
                .at(40.0, y)
                .size(515.0, 20.0)
                .font(11.0, "900")
                .color("#fff")
                .background("#2563eb"),
        );
        y += 24.0;
        let height = rows * 18.0;
        elements.push(
            TemplateElement::new(format!("checklist-{}", i + 1), ElementKind::Checklist, list.to_json())
                .at(40.0, y)
                .size(515.0, height)
                .font(11.0, "700"),
        );
        y += height + 12.0;
    }

    if inspection.notes.as_deref().is_some_and(|n| !n.trim().is_empty()) {
        elements.push(
            TemplateElement::new("notes", ElementKind::Text, "Observations:\n{{inspection_notes}}")
                .at(40.0, y)
                .size(515.0, 60.0)
                .font(10.0, "400")
                .background("#f3f4f6")
                .border("#e5e7eb", 1.0),
        );
        y += 72.0;
    }

    if !damages.is_empty() {
        elements.push(
            TemplateElement::new("damages", ElementKind::Text, "Dommages connus:\n{{vehicle_damages}}")
                .at(40.0, y)
                .size(515.0, 80.0)
                .font(10.0, "400")
                .color("#dc2626")
                .border("#fecaca", 1.0),
        );
    }

    elements.push(
        TemplateElement::new("signature", ElementKind::Signature, "Signature client")
            .at(40.0, 700.0)
            .size(240.0, 100.0)
            .font(10.0, "400")
            .color("#6b7280")
            .align(TextAlign::Center)
            .border("#d1d5db", 1.0),
    );
    elements.push(
        TemplateElement::new("agent", ElementKind::Signature, "Signature agent / Cachet")
            .at(315.0, 700.0)
            .size(240.0, 100.0)
            .font(10.0, "400")
            .color("#6b7280")
            .align(TextAlign::Center)
            .border("#d1d5db", 1.0),
    );

    DocumentTemplate {
        id: format!("insp-tpl-{}", inspection.id),
        name: format!("{} - P.V d'Inspection #{}", label, reservation_number),
        category,
        canvas_width: A4_WIDTH,
        canvas_height: A4_HEIGHT,
        elements,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{EquipmentChecks, SecurityChecks};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn inspection(kind: InspectionType) -> Inspection {
        Inspection {
            id: "i1".into(),
            reservation_id: "r1".into(),
            kind,
            date: NaiveDate::from_ymd_opt(2024, 5, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            mileage: 42000,
            fuel: "1/2".into(),
            security: SecurityChecks {
                lights: true,
                brakes: true,
                ..Default::default()
            },
            equipment: EquipmentChecks {
                jack: true,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_departure_report() {
        let tpl = inspection_template(&inspection(InspectionType::Depart), "RES-7", &[]);
        assert_eq!(tpl.category, Category::Checkin);
        assert_eq!(tpl.name, "DÉPART - P.V d'Inspection #RES-7");
        assert_eq!((tpl.canvas_width, tpl.canvas_height), (595.0, 842.0));
        assert_eq!(tpl.page_count(), 1);

        let meta = &tpl.element("meta").unwrap().content;
        assert!(meta.contains("Client: {{client_name}}"));
        assert!(meta.contains("Date: {{inspection_date}}"));

        let security = Checklist::parse(&tpl.element("checklist-1").unwrap().content).unwrap();
        assert_eq!(security.items.len(), 7);
        assert_eq!(security.checked_count(), 2);
        let equipment = Checklist::parse(&tpl.element("checklist-2").unwrap().content).unwrap();
        assert_eq!(equipment.checked_count(), 1);
    }

    #[test]
    fn test_return_report_category() {
        let tpl = inspection_template(&inspection(InspectionType::Retour), "RES-7", &[]);
        assert_eq!(tpl.category, Category::Checkout);
        assert!(tpl.element("notes").is_none());
        assert!(tpl.element("damages").is_none());
    }

    #[test]
    fn test_notes_and_damages_fit_above_signatures() {
        let mut insp = inspection(InspectionType::Retour);
        insp.notes = Some("Rayure {{ porte avant".into());
        let damage = Damage {
            name: "Rayure".into(),
            ..Default::default()
        };
        let tpl = inspection_template(&insp, "RES-7", &[&damage]);

        let notes = tpl.element("notes").unwrap();
        let damages = tpl.element("damages").unwrap();
        let signature_top = tpl.element("signature").unwrap().y;
        assert!(!notes.content.contains("porte avant"));
        assert!(notes.bottom() <= damages.y);
        assert!(damages.bottom() <= signature_top);
    }

    #[test]
    fn test_report_text_uses_known_placeholders() {
        let damage = Damage::default();
        let mut insp = inspection(InspectionType::Retour);
        insp.notes = Some("x".into());
        let tpl = inspection_template(&insp, "RES-7", &[&damage]);
        let unknown: Vec<_> = tpl
            .elements
            .iter()
            .filter(|e| e.kind == ElementKind::Text)
            .flat_map(|e| crate::template::unknown_placeholders(&e.content).unwrap())
            .collect();
        assert!(unknown.is_empty(), "{:?}", unknown);
    }
}
