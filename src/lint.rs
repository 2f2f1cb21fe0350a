//! Lint engine for detecting defects in document templates.
//!
//! Runs over a template before printing to catch mechanical issues:
//! unknown or malformed placeholders, elements outside the canvas or cut
//! by a page break, overlapping text and unreadable checklists.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

use crate::template::{
    unknown_placeholders, Checklist, DocumentTemplate, ElementKind, TemplateElement, MAX_PAGES,
};

/// A lint warning about a template defect
#[derive(Debug)]
pub struct LintWarning {
    pub category: LintCategory,
    /// Id of the element the warning is about
    pub element: String,
    pub message: String,
    /// Byte range in the element content, for text defects
    pub span: Option<Range<usize>>,
}

/// Category of lint defect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintCategory {
    Placeholder,
    Syntax,
    Bounds,
    PageBreak,
    Overlap,
    Checklist,
}

impl fmt::Display for LintCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LintCategory::Placeholder => write!(f, "placeholder"),
            LintCategory::Syntax => write!(f, "syntax"),
            LintCategory::Bounds => write!(f, "bounds"),
            LintCategory::PageBreak => write!(f, "page-break"),
            LintCategory::Overlap => write!(f, "overlap"),
            LintCategory::Checklist => write!(f, "checklist"),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] \"{}\": {}", self.category, self.element, self.message)
    }
}

impl LintWarning {
    fn new(category: LintCategory, element: &TemplateElement, message: impl Into<String>) -> Self {
        Self {
            category,
            element: element.id.clone(),
            message: message.into(),
            span: None,
        }
    }

    fn with_span(mut self, span: Option<Range<usize>>) -> Self {
        self.span = span;
        self
    }
}

/// Run all lint checks on a template.
pub fn check(template: &DocumentTemplate) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    check_text(template, &mut warnings);
    check_bounds(template, &mut warnings);
    check_pages(template, &mut warnings);
    check_page_breaks(template, &mut warnings);
    check_overlaps(template, &mut warnings);
    check_checklists(template, &mut warnings);
    warnings
}

fn check_text(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    for elem in template.elements.iter().filter(|e| e.has_text()) {
        check_placeholders(elem, &elem.content, Some(0), warnings);
    }
}

/// Report unknown and malformed placeholders in `text`; `offset` is where
/// `text` starts in the element content, when known
fn check_placeholders(
    elem: &TemplateElement,
    text: &str,
    offset: Option<usize>,
    warnings: &mut Vec<LintWarning>,
) {
    let locate = |span: Range<usize>| offset.map(|o| span.start + o..span.end + o);
    match unknown_placeholders(text) {
        Ok(unknown) => {
            for (name, span) in unknown {
                warnings.push(
                    LintWarning::new(
                        LintCategory::Placeholder,
                        elem,
                        format!("unknown placeholder {{{{{}}}}} will print as written", name),
                    )
                    .with_span(locate(span)),
                );
            }
        }
        Err(errors) => {
            for err in errors {
                let span = locate(err.span().clone());
                warnings.push(
                    LintWarning::new(
                        LintCategory::Syntax,
                        elem,
                        format!("{}; the text will print as written", err),
                    )
                    .with_span(span),
                );
            }
        }
    }
}

// Sub-pixel slack for coordinates produced by drag and drop.
const EPSILON: f64 = 0.5;

fn check_bounds(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    for elem in &template.elements {
        if elem.right() > template.canvas_width + EPSILON {
            warnings.push(LintWarning::new(
                LintCategory::Bounds,
                elem,
                format!(
                    "extends {:.0}px past the right edge of the {:.0}px canvas",
                    elem.right() - template.canvas_width,
                    template.canvas_width
                ),
            ));
        }
        if elem.width <= 0.0 || elem.height <= 0.0 {
            warnings.push(LintWarning::new(
                LintCategory::Bounds,
                elem,
                format!("has an empty box ({}x{})", elem.width, elem.height),
            ));
        }
    }
}

/// Elements the printout drops, and blank pages it skips
fn check_pages(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    let used: BTreeSet<usize> = template
        .elements
        .iter()
        .filter_map(|e| template.page_of(e))
        .collect();
    let mut reported = BTreeSet::new();
    for elem in &template.elements {
        let Some(page) = template.page_of(elem) else {
            warnings.push(LintWarning::new(
                LintCategory::Bounds,
                elem,
                format!(
                    "starts below page {}, the last printable page; it is not printed",
                    MAX_PAGES
                ),
            ));
            continue;
        };
        let skipped = match used.range(..page).next_back() {
            Some(previous) => page - previous - 1,
            None => page,
        };
        if skipped > 0 && reported.insert(page) {
            warnings.push(LintWarning::new(
                LintCategory::Bounds,
                elem,
                format!(
                    "starts on page {} after {} empty page(s); empty pages are not printed",
                    page + 1,
                    skipped
                ),
            ));
        }
    }
}

fn check_page_breaks(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    for elem in &template.elements {
        let Some(first) = template.page_of(elem) else {
            continue;
        };
        let last = template
            .page_at(elem.bottom() - EPSILON)
            .unwrap_or(MAX_PAGES - 1);
        if last > first {
            warnings.push(LintWarning::new(
                LintCategory::PageBreak,
                elem,
                format!(
                    "starts on page {} but ends on page {}; the overflow is cut when printed",
                    first + 1,
                    last + 1
                ),
            ));
        }
    }
}

/// A framed block (background or border) holding another element is a
/// layout choice, not a collision.
fn is_frame_around(outer: &TemplateElement, inner: &TemplateElement) -> bool {
    let framed = outer.border_width > 0.0
        || !(outer.background_color.is_empty() || outer.background_color == "transparent");
    framed
        && outer.x <= inner.x
        && outer.y <= inner.y
        && outer.right() >= inner.right()
        && outer.bottom() >= inner.bottom()
}

fn check_overlaps(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    let printed: Vec<&TemplateElement> = template
        .elements
        .iter()
        .filter(|e| e.has_text() && e.opacity >= 1.0)
        .collect();

    for (i, a) in printed.iter().enumerate() {
        for b in &printed[i + 1..] {
            if !a.overlaps(b) || is_frame_around(a, b) || is_frame_around(b, a) {
                continue;
            }
            warnings.push(LintWarning::new(
                LintCategory::Overlap,
                a,
                format!("text overlaps element \"{}\"", b.id),
            ));
        }
    }
}

fn check_checklists(template: &DocumentTemplate, warnings: &mut Vec<LintWarning>) {
    for elem in template
        .elements
        .iter()
        .filter(|e| e.kind == ElementKind::Checklist)
    {
        match Checklist::parse(&elem.content) {
            Ok(list) if list.is_empty() => {
                warnings.push(LintWarning::new(LintCategory::Checklist, elem, "checklist has no items"));
            }
            Ok(list) => {
                for item in &list.items {
                    let offset = elem.content.find(item.label.as_str());
                    check_placeholders(elem, &item.label, offset, warnings);
                }
            }
            Err(e) => {
                warnings.push(LintWarning::new(
                    LintCategory::Checklist,
                    elem,
                    format!("{}; the content will print as plain text", e),
                ));
                check_placeholders(elem, &elem.content, Some(0), warnings);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use crate::template::{default_template, Category};

    fn text(id: &str, content: &str, x: f64, y: f64, w: f64, h: f64) -> TemplateElement {
        TemplateElement::new(id, ElementKind::Text, content).at(x, y).size(w, h)
    }

    fn categories(warnings: &[LintWarning]) -> Vec<LintCategory> {
        warnings.iter().map(|w| w.category).collect()
    }

    #[test]
    fn test_unknown_placeholder_reported_with_span() {
        let tpl = DocumentTemplate::new(
            Category::Devis,
            vec![text("a", "Client: {{ client_nam }}", 0.0, 0.0, 100.0, 20.0)],
        );
        let warnings = check(&tpl);
        assert_eq!(categories(&warnings), vec![LintCategory::Placeholder]);
        assert_eq!(warnings[0].span, Some(8..24));
        assert!(warnings[0].message.contains("{{client_nam}}"));
    }

    #[test]
    fn test_unterminated_placeholder_is_syntax() {
        let tpl = DocumentTemplate::new(
            Category::Devis,
            vec![text("a", "Total {{total_amount", 0.0, 0.0, 100.0, 20.0)],
        );
        let warnings = check(&tpl);
        assert_eq!(categories(&warnings), vec![LintCategory::Syntax]);
        assert!(warnings[0].span.is_some());
    }

    #[test]
    fn test_checklist_labels_are_checked() {
        let content = "☑ Plein {{fuel_levl}} | ☐ Voir {{ notes";
        let tpl = DocumentTemplate::new(
            Category::Checkin,
            vec![TemplateElement::new("c", ElementKind::Checklist, content).size(300.0, 60.0)],
        );
        let warnings = check(&tpl);
        assert_eq!(
            categories(&warnings),
            vec![LintCategory::Placeholder, LintCategory::Syntax]
        );
        let span = warnings[0].span.clone().unwrap();
        assert_eq!(&content[span], "{{fuel_levl}}");
        assert!(warnings[1].message.ends_with("the text will print as written"));
    }

    #[test]
    fn test_elements_below_printable_pages() {
        let tpl = DocumentTemplate::new(
            Category::Contrat,
            vec![
                text("head", "a", 0.0, 0.0, 100.0, 20.0),
                text("lost", "b", 0.0, 1e20, 100.0, 20.0),
                text("after-gap", "c", 0.0, 3400.0, 100.0, 20.0),
                text("same-page", "d", 200.0, 3400.0, 100.0, 20.0),
            ],
        );
        let report: Vec<String> = check(&tpl).iter().map(|w| w.to_string()).collect();
        assert_eq!(
            report,
            vec![
                format!(
                    "[bounds] \"lost\": starts below page {}, the last printable page; it is not printed",
                    MAX_PAGES
                ),
                "[bounds] \"after-gap\": starts on page 4 after 2 empty page(s); empty pages are not printed"
                    .to_string(),
            ]
        );
    }

    #[test]
    fn test_element_past_right_edge() {
        let tpl = DocumentTemplate::new(
            Category::Facture,
            vec![text("wide", "x", 700.0, 0.0, 200.0, 20.0)],
        );
        let warnings = check(&tpl);
        assert_eq!(categories(&warnings), vec![LintCategory::Bounds]);
        assert!(warnings[0].message.contains("100px"));
    }

    #[test]
    fn test_element_cut_by_page_break() {
        let tpl = DocumentTemplate::new(
            Category::Contrat,
            vec![
                text("cut", "x", 0.0, 880.0, 100.0, 40.0),
                text("fits", "y", 200.0, 860.0, 100.0, 40.0),
            ],
        )
        .with_canvas(800.0, 900.0);
        let warnings = check(&tpl);
        assert_eq!(categories(&warnings), vec![LintCategory::PageBreak]);
        assert_eq!(warnings[0].element, "cut");
    }

    #[test]
    fn test_overlap_detected() {
        let tpl = DocumentTemplate::new(
            Category::Devis,
            vec![
                text("a", "one", 0.0, 0.0, 100.0, 50.0),
                text("b", "two", 80.0, 0.0, 100.0, 50.0),
            ],
        );
        let warnings = check(&tpl);
        assert_eq!(categories(&warnings), vec![LintCategory::Overlap]);
        assert_eq!(warnings[0].to_string(), r#"[overlap] "a": text overlaps element "b""#);
    }

    #[test]
    fn test_overlap_skipped_for_framed_block() {
        let tpl = DocumentTemplate::new(
            Category::Devis,
            vec![
                text("panel", "Details", 0.0, 0.0, 300.0, 200.0).background("#f3f4f6"),
                text("inner", "value", 10.0, 10.0, 100.0, 20.0),
            ],
        );
        assert!(check(&tpl).is_empty());
    }

    #[test]
    fn test_overlap_skipped_for_faded_element() {
        let mut watermark = text("wm", "COPIE", 0.0, 0.0, 300.0, 200.0);
        watermark.opacity = 0.2;
        let tpl = DocumentTemplate::new(
            Category::Devis,
            vec![watermark, text("a", "one", 10.0, 10.0, 100.0, 20.0)],
        );
        assert!(check(&tpl).is_empty());
    }

    #[test]
    fn test_checklist_problems() {
        let tpl = DocumentTemplate::new(
            Category::Checkin,
            vec![
                TemplateElement::new("empty", ElementKind::Checklist, "  ").at(0.0, 0.0),
                TemplateElement::new("broken", ElementKind::Checklist, "[{\"label\": 3}]").at(0.0, 100.0),
                TemplateElement::new("ok", ElementKind::Checklist, "☑ Freins").at(0.0, 200.0),
            ],
        );
        let warnings = check(&tpl);
        assert_eq!(
            categories(&warnings),
            vec![LintCategory::Checklist, LintCategory::Checklist]
        );
        assert_eq!(warnings[0].element, "empty");
        assert_eq!(warnings[1].element, "broken");
    }

    #[test]
    fn test_default_templates_fit_their_pages() {
        for category in Category::ALL {
            for locale in [Locale::Fr, Locale::Ar] {
                let tpl = default_template(category, locale);
                let warnings = check(&tpl);
                let blocking: Vec<_> = warnings
                    .iter()
                    .filter(|w| {
                        matches!(
                            w.category,
                            LintCategory::Placeholder
                                | LintCategory::Syntax
                                | LintCategory::Bounds
                                | LintCategory::PageBreak
                        )
                    })
                    .collect();
                assert!(blocking.is_empty(), "{}: {:?}", category, blocking);
            }
        }
    }
}
