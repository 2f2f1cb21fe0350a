//! Built-in layouts for every document category

use super::{
    Category, ChecklistItem, DocumentTemplate, ElementKind, TemplateElement, TextAlign,
};
use crate::locale::Locale;

/// Items of the vehicle inspection checklist, in print order
pub const INSPECTION_ITEMS: [&str; 15] = [
    "Feux & Phares",
    "Pneus (Usure/Pression)",
    "Freins",
    "Essuie-glaces",
    "Rétroviseurs",
    "Ceintures",
    "Klaxon",
    "Roue de secours",
    "Cric",
    "Triangles",
    "Trousse secours",
    "Docs véhicule",
    "Climatisation (A/C)",
    "Intérieur Propre",
    "Extérieur Propre",
];

/// Page height of the two-page contract
const CONTRACT_PAGE_HEIGHT: f64 = 900.0;

const BODY: &str = "#374151";
const MUTED: &str = "#6b7280";
const HEADING: &str = "#1f2937";
const PANEL: &str = "#f3f4f6";
const RULE: &str = "#d1d5db";

fn text(id: &str, content: &str) -> TemplateElement {
    TemplateElement::new(id, ElementKind::Text, content)
}

fn logo(y: f64, height: f64) -> TemplateElement {
    TemplateElement::new("1", ElementKind::Logo, "LOGO")
        .at(50.0, y)
        .size(100.0, height)
        .font(12.0, "700")
        .align(TextAlign::Center)
}

/// White-on-color section banner
fn banner(id: &str, content: &str, x: f64, y: f64, width: f64, color: &str) -> TemplateElement {
    text(id, content)
        .at(x, y)
        .size(width, 25.0)
        .font(12.0, "900")
        .color("#fff")
        .background(color)
        .border(color, 0.0)
}

/// Grey framed block of field lines
fn panel(id: &str, content: &str, x: f64, y: f64, width: f64, height: f64) -> TemplateElement {
    text(id, content)
        .at(x, y)
        .size(width, height)
        .font(10.0, "400")
        .color(BODY)
        .background(PANEL)
        .border("#e5e7eb", 1.0)
}

fn signature(id: &str, caption: &str, x: f64, y: f64, width: f64, height: f64) -> TemplateElement {
    TemplateElement::new(id, ElementKind::Signature, caption)
        .at(x, y)
        .size(width, height)
        .font(10.0, "400")
        .color(MUTED)
        .align(TextAlign::Center)
        .border(RULE, 1.0)
}

fn arabic_terms(id: &str, content: &str, y: f64, height: f64) -> TemplateElement {
    text(id, content)
        .at(50.0, y)
        .size(700.0, height)
        .font(8.0, "400")
        .color(HEADING)
        .align(TextAlign::Right)
}

fn devis() -> Vec<TemplateElement> {
    vec![
        logo(30.0, 60.0),
        text("2", "DEVIS")
            .at(350.0, 50.0)
            .size(200.0, 40.0)
            .font(32.0, "900")
            .color(HEADING)
            .align(TextAlign::Center),
        text("3", "Adressé à:\n{{client_name}}\n{{client_phone}}")
            .at(50.0, 150.0)
            .size(300.0, 80.0)
            .font(11.0, "400")
            .color(BODY),
        text("4", "Véhicule:\n{{vehicle_brand}} {{vehicle_model}}\n{{vehicle_plate}}")
            .at(450.0, 150.0)
            .size(300.0, 80.0)
            .font(11.0, "400")
            .color(BODY),
        TemplateElement::new("5", ElementKind::Divider, "")
            .at(50.0, 260.0)
            .size(700.0, 2.0)
            .color(RULE)
            .background(RULE),
        TemplateElement::new("6", ElementKind::Table, "")
            .at(50.0, 290.0)
            .size(700.0, 150.0)
            .font(10.0, "600"),
        text("7", "Montant Total: {{total_amount}} DZ")
            .at(450.0, 500.0)
            .size(300.0, 40.0)
            .font(16.0, "900")
            .color("#dc2626")
            .align(TextAlign::Right),
        signature("8", "Cachet et signature du vendeur", 50.0, 600.0, 250.0, 150.0),
    ]
}

const TERMS_1_5: &str = "يمكنك قراءة شروط العقد في الأسفل ومصادقة عليها\n\n\
1- السن: يجب أن يكون السائق يبلغ من العمر 20 عاماً على الأقل، وأن يكون حاصلاً على رخصة قيادة منذ سنتين على الأقل.\n\n\
2- جواز السفر: إيداع جواز السفر البيومتري الإلزامي، بالإضافة إلى دفع تأمين ابتدائي يبدأ من 30,000.00 دج حسب فئة المركبة، ويعد هذا بمثابة ضمان لطلبه.\n\n\
3- الوقود: الوقود يكون على نفقة الزبون.\n\n\
4- قانون ونظام: يتم الدفع نقداً عند تسليم السيارة.\n\n\
5- النظافة: تسلم السيارة نظيفة ويجب إرجاعها في نفس الحالة، وفي حال عدم ذلك، سيتم احتساب تكلفة الغسيل بمبلغ 1000 دج.";

const TERMS_6_9: &str = "6- مكان التسليم: يتم تسليم السيارات في موقف السيارات التابع لوكالاتنا.\n\n\
7- جدول المواعيد: يجب على الزبون احترام المواعيد المحددة عند الحجز، يجب الإبلاغ مسبقاً عن أي تغيير. لا يمكن للزبون تمديد مدة الإيجار إلا بعد الحصول على إذن من وكالتنا للإيجار، وذلك بإشعار مسبق لا يقل عن 48 ساعة.\n\n\
8- الأضرار والخسائر: التأمين الأساسي: يلتزم الزبون بدفع جميع الأضرار التي تلحق بالمركبة سواء كان مخطئاً أو غير مخطئ. أي ضرر يلحق بالمركبة سيؤدي إلى خصم من مبلغ الضمان.\n\n\
9- عند السرقة: في حالة السرقة أو تضرر المركبة، يجب تقديم تصريح لدى مصالح الشرطة أو الدرك الوطني قبل أي تصريح، يجب على الزبون إبلاغ وكالة الكراء بشكل إلزامي.";

const TERMS_10_12: &str = "10- تأمين: يستفيد من التأمين فقط السائقون المذكورون في عقد الكراء، يُمنع منعاً باتاً إعارة أو تأجير المركبة من الباطن، وتكون جميع الأضرار الناتجة عن مثل هذه الحالات على عاتق الزبون بالكامل.\n\n\
11- عطل ميكانيكي: خلال فترة الإيجار، وبناءً على عدد الكيلومترات المقطوعة، يجب على الزبون إجراء الفحوصات اللازمة مثل مستوى الزيت، حالة المحرك، ضغط الإطارات. في حال حدوث عطل ميكانيكي بسبب إهمال الزبون، فإن تكاليف الإصلاح والصيانة تكون على عاتق الزبون بالكامل.\n\n\
12- خسائر إضافية: الأضرار التي تلحق بالعجلات والإطارات، القيادة بالإطارات المفرغة من الهواء، التدهور، السرقة، نهب الملحقات، أعمال التخريب، كلها سيتم تحميل تكلفتها على الزبون.";

const TERMS_13_15: &str = "13- ضريبة التأخير: مدة الإيجار تُحتسب على فترات كاملة مدتها 24 ساعة غير قابلة للتقسيم. يجب على الزبون إعادة المركبة في نفس الوقت، وإلا سيتم احتساب تكلفة تأخير مقدارها 800 دينار لكل ساعة تأخير.\n\n\
14- عدد الأميال: عدد الكيلومترات محدود بـ 300 كم يومياً، ويفرض غرامة قدرها 30 دج عن كل كيلومتر زائد.\n\n\
15- شروط: يقر الزبون بأنه اطلع على شروط الإيجار هذه وقبلها دون أي تحفظ، ويتعهد بتوقيع هذا العقد.";

fn contrat() -> Vec<TemplateElement> {
    let page2 = CONTRACT_PAGE_HEIGHT;
    vec![
        logo(20.0, 50.0),
        text("2", "CONTRAT DE LOCATION DE VÉHICULE")
            .at(200.0, 30.0)
            .size(550.0, 40.0)
            .font(22.0, "900")
            .color(HEADING)
            .align(TextAlign::Center),
        banner("3", "DÉTAILS DU CONTRAT", 50.0, 80.0, 350.0, "#2563eb"),
        panel(
            "4",
            "Date du contrat: {{res_date}}\nNuméro du contrat: {{res_number}}",
            50.0,
            110.0,
            350.0,
            60.0,
        ),
        banner("5", "PÉRIODE DE LOCATION", 420.0, 80.0, 330.0, "#2563eb"),
        panel(
            "6",
            "Date de départ: {{start_date}}\nDate de retour: {{end_date}}\nDurée: {{duration}} jours",
            420.0,
            110.0,
            330.0,
            60.0,
        ),
        banner(
            "7",
            "INFORMATIONS DU CONDUCTEUR (Conducteur 01)",
            50.0,
            185.0,
            700.0,
            "#7c3aed",
        ),
        panel(
            "8",
            "Nom: {{client_name}}\nDate de naissance: {{client_dob}}\nLieu de naissance: {{client_pob}}\n\
Type de document: Permis de conduire biométrique\nNuméro du document: {{client_license}}\n\
Date d'émission: {{license_issued}}\nDate d'expiration: {{license_expiry}}\nLieu d'émission: {{license_place}}",
            50.0,
            215.0,
            700.0,
            130.0,
        )
        .font(9.0, "400"),
        banner("9", "INFORMATIONS DU VÉHICULE", 50.0, 360.0, 700.0, "#059669"),
        panel(
            "10",
            "Modèle: {{vehicle_model}}\nCouleur: {{vehicle_color}}\nImmatriculation: {{vehicle_plate}}\n\
Numéro de série: {{vehicle_vin}}\nType de carburant: {{vehicle_fuel}}\nKilométrage au départ: {{vehicle_mileage}} km",
            50.0,
            390.0,
            700.0,
            100.0,
        )
        .font(9.0, "400"),
        banner("11", "INFORMATIONS FINANCIÈRES", 50.0, 505.0, 700.0, "#dc2626"),
        panel(
            "12",
            "Prix unitaire: {{unit_price}} DZ\nPrix total (HT): {{total_ht}} DZ\nMontant total du contrat: {{total_amount}} DZ",
            50.0,
            535.0,
            700.0,
            75.0,
        )
        .font(10.0, "600")
        .background("#fee2e2")
        .border("#fca5a5", 1.0),
        banner(
            "13",
            "LISTE DE VÉRIFICATION DE L'ÉQUIPEMENT ET DE L'INSPECTION",
            50.0,
            625.0,
            700.0,
            "#ea580c",
        )
        .font(11.0, "900"),
        TemplateElement::new(
            "14",
            ElementKind::Checklist,
            "☐ Pneus | ☐ Batterie | ☐ Freins | ☐ Phares | ☐ Essuie-glaces | ☐ Moteur\n\
☐ Ceintures | ☐ Intérieur propre | ☐ Réservoir plein | ☐ Fenêtres | ☐ Miroirs | ☐ Autres",
        )
        .at(50.0, 655.0)
        .size(700.0, 80.0)
        .font(9.0, "400")
        .color(BODY),
        banner("15", "SIGNATURES", 50.0, 750.0, 700.0, "#6366f1")
            .size(700.0, 20.0)
            .font(11.0, "900"),
        signature("16", "Signature du locataire\net empreinte", 50.0, 780.0, 320.0, 100.0)
            .font(9.0, "400"),
        signature("17", "Signature de l'agent\net cachet", 430.0, 780.0, 320.0, 100.0)
            .font(9.0, "400"),
        text("18", "PAGE 2 - CONDITIONS ET TERMES DU CONTRAT")
            .at(50.0, page2)
            .size(700.0, 30.0)
            .font(16.0, "900")
            .color(HEADING)
            .align(TextAlign::Center)
            .background("#dbeafe")
            .border("#0ea5e9", 2.0),
        arabic_terms("19", TERMS_1_5, page2 + 40.0, 190.0),
        arabic_terms("20", TERMS_6_9, page2 + 240.0, 190.0),
        arabic_terms("21", TERMS_10_12, page2 + 440.0, 190.0),
        arabic_terms("22", TERMS_13_15, page2 + 640.0, 130.0),
        banner("23", "الموافقة والتوقيع", 50.0, page2 + 780.0, 700.0, "#6366f1")
            .align(TextAlign::Center),
        signature(
            "24",
            "امضاء وبصمة الزبون\nSignature et Empreinte du Client",
            50.0,
            page2 + 812.0,
            650.0,
            80.0,
        )
        .border(RULE, 2.0),
    ]
}

fn inspection(prefix: char, label: &str) -> Vec<TemplateElement> {
    let id = |n: u8| format!("{}{}", prefix, n);
    let items: Vec<ChecklistItem> = INSPECTION_ITEMS
        .iter()
        .map(|l| ChecklistItem::new(*l, false))
        .collect();
    let checklist = super::Checklist { items }.to_json();
    vec![
        text(&id(1), &format!("RAPPORT D'INSPECTION - {}", label.to_uppercase()))
            .at(50.0, 20.0)
            .size(700.0, 40.0)
            .font(20.0, "900")
            .align(TextAlign::Center),
        panel(
            &id(2),
            &format!(
                "Dossier: {{{{res_number}}}}\nDate inspection: {{{{res_date}}}}\nType: {}",
                label
            ),
            50.0,
            80.0,
            700.0,
            60.0,
        )
        .font(11.0, "600"),
        text(&id(3), "Client:\n{{client_name}}\n{{client_phone}}\n{{client_email}}")
            .at(50.0, 150.0)
            .size(340.0, 80.0)
            .font(11.0, "600")
            .color(BODY),
        text(
            &id(4),
            "INFORMATIONS DU VÉHICULE\nModèle: {{vehicle_brand}} {{vehicle_model}}\n\
Couleur: {{vehicle_color}}\nImmatriculation: {{vehicle_plate}}\nKilométrage: {{vehicle_mileage}} km",
        )
        .at(410.0, 150.0)
        .size(340.0, 120.0)
        .font(11.0, "600")
        .color(BODY),
        TemplateElement::new(id(5), ElementKind::Checklist, checklist)
            .at(50.0, 290.0)
            .size(700.0, 260.0),
        signature(&id(6), "Signature client", 50.0, 930.0, 320.0, 100.0).font(11.0, "400"),
        signature(&id(7), "Signature agent / Cachet", 380.0, 930.0, 320.0, 100.0)
            .font(11.0, "400"),
    ]
}

fn versement() -> Vec<TemplateElement> {
    vec![
        logo(30.0, 60.0),
        text("2", "REÇU DE VERSEMENT")
            .at(250.0, 50.0)
            .size(300.0, 50.0)
            .font(28.0, "900")
            .color(HEADING)
            .align(TextAlign::Center),
        panel(
            "3",
            "Client: {{client_name}}\nDossier: {{res_number}}\nDate: {{res_date}}",
            50.0,
            140.0,
            700.0,
            60.0,
        )
        .font(11.0, "400"),
        text(
            "4",
            "Montant Total: {{total_amount}} DZ\nMontant Payé: {{paid_amount}} DZ\nReste à Payer: {{remaining_amount}} DZ",
        )
        .at(50.0, 230.0)
        .size(700.0, 100.0)
        .font(13.0, "600")
        .color(HEADING)
        .background("#dbeafe")
        .border("#0ea5e9", 2.0),
        text(
            "5",
            "Détails de la réservation:\nVéhicule: {{vehicle_brand}} {{vehicle_model}}\nImmatriculation: {{vehicle_plate}}",
        )
        .at(50.0, 360.0)
        .size(700.0, 80.0)
        .font(10.0, "400")
        .color(BODY),
        signature("6", "Cachet de la succursale", 50.0, 480.0, 300.0, 100.0),
        signature("7", "Signature du client", 450.0, 480.0, 300.0, 100.0),
    ]
}

fn facture() -> Vec<TemplateElement> {
    vec![
        logo(30.0, 60.0),
        text("2", "FACTURE")
            .at(400.0, 50.0)
            .size(250.0, 50.0)
            .font(32.0, "900")
            .color(HEADING)
            .align(TextAlign::Center),
        text("3", "{{store_name}}\n{{store_address}}\n{{store_phone}} | {{store_email}}")
            .at(50.0, 120.0)
            .size(350.0, 80.0)
            .font(9.0, "400")
            .color(MUTED),
        panel("4", "Facturé à:\n{{client_name}}\n{{client_phone}}", 450.0, 120.0, 300.0, 80.0),
        TemplateElement::new("5", ElementKind::Table, "")
            .at(50.0, 230.0)
            .size(700.0, 150.0)
            .font(10.0, "600"),
        text("6", "TOTAL À PAYER: {{total_amount}} DZ")
            .at(450.0, 420.0)
            .size(300.0, 40.0)
            .font(18.0, "900")
            .color("#dc2626")
            .align(TextAlign::Right),
        text("7", "Merci pour votre confiance")
            .at(50.0, 500.0)
            .size(700.0, 40.0)
            .font(11.0, "400")
            .color(MUTED)
            .align(TextAlign::Center),
    ]
}

/// Built-in template for a category
///
/// Arabic documents read right to left, so left-aligned text blocks are
/// flipped to the right edge of their box.
pub fn default_template(category: Category, locale: Locale) -> DocumentTemplate {
    let elements = match category {
        Category::Devis => devis(),
        Category::Contrat => contrat(),
        Category::Versement => versement(),
        Category::Facture => facture(),
        Category::Checkin => inspection('i', "Check-in"),
        Category::Checkout => inspection('o', "Check-out"),
    };
    let mut template = DocumentTemplate::new(category, elements);
    if category == Category::Contrat {
        template.canvas_height = CONTRACT_PAGE_HEIGHT;
    }
    if locale == Locale::Ar {
        for el in &mut template.elements {
            if el.kind == ElementKind::Text && el.text_align == TextAlign::Left {
                el.text_align = TextAlign::Right;
            }
        }
    }
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Checklist;

    #[test]
    fn test_every_category_has_elements() {
        for category in Category::ALL {
            let tpl = default_template(category, Locale::Fr);
            assert!(!tpl.elements.is_empty(), "{} is empty", category);
            assert_eq!(tpl.category, category);
        }
    }

    #[test]
    fn test_element_ids_are_unique() {
        for category in Category::ALL {
            let tpl = default_template(category, Locale::Fr);
            let mut ids: Vec<&str> = tpl.elements.iter().map(|e| e.id.as_str()).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), tpl.elements.len(), "{}", category);
        }
    }

    #[test]
    fn test_contract_has_two_pages() {
        let tpl = default_template(Category::Contrat, Locale::Fr);
        assert_eq!(tpl.elements.len(), 24);
        assert_eq!(tpl.page_count(), 2);
        let terms = tpl.element("18").unwrap();
        assert_eq!(tpl.page_of(terms), Some(1));
        for el in &tpl.elements {
            let last_row = tpl.page_at(el.bottom() - 1.0);
            assert_eq!(tpl.page_of(el), last_row, "element {} straddles a page", el.id);
        }
    }

    #[test]
    fn test_inspection_checklist() {
        let tpl = default_template(Category::Checkout, Locale::Fr);
        let list = Checklist::parse(&tpl.element("o5").unwrap().content).unwrap();
        assert_eq!(list.items.len(), 15);
        assert_eq!(list.items[0].label, "Feux & Phares");
        assert!(tpl.element("o2").unwrap().content.contains("{{res_number}}"));
    }

    #[test]
    fn test_arabic_flips_text_alignment() {
        let tpl = default_template(Category::Devis, Locale::Ar);
        assert_eq!(tpl.element("3").unwrap().text_align, TextAlign::Right);
        assert_eq!(tpl.element("2").unwrap().text_align, TextAlign::Center);
    }
}
