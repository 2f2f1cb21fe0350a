//! Integration tests for template files, the registry and linting

use std::path::Path;

use pretty_assertions::assert_eq;

use driveflow::lint;
use driveflow::template::{default_template, ElementPatch};
use driveflow::{Category, Dataset, DocumentTemplate, Locale, TemplateError, TemplateRegistry};

fn fixture(name: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_toml_template_with_category_alias() {
    let tpl = DocumentTemplate::from_file(&fixture("facture.toml")).expect("Should parse");

    assert_eq!(tpl.category, Category::Facture);
    assert_eq!(tpl.display_name(), "Facture simple");
    assert_eq!(tpl.canvas_width, 800.0);
    assert_eq!(tpl.elements.len(), 4);
    assert_eq!(tpl.page_count(), 1);

    let title = tpl.element("title").unwrap();
    assert_eq!(title.font_size, 24.0);
    assert_eq!(title.font_weight, "900");
}

#[test]
fn test_template_file_errors() {
    let err = DocumentTemplate::from_file(&fixture("missing.json")).unwrap_err();
    assert!(matches!(err, TemplateError::FileReadError { .. }));

    let path = std::env::temp_dir().join("driveflow-template.txt");
    std::fs::write(&path, "name = \"x\"").unwrap();
    let err = DocumentTemplate::from_file(&path).unwrap_err();
    assert!(matches!(err, TemplateError::UnsupportedFormat { .. }));
    std::fs::remove_file(&path).ok();
}

#[test]
fn test_lint_template_file() {
    let tpl = DocumentTemplate::from_file(&fixture("facture.toml")).unwrap();
    let warnings = lint::check(&tpl);
    let report = warnings
        .iter()
        .map(|w| w.to_string())
        .collect::<Vec<_>>()
        .join("\n");

    insta::assert_snapshot!(report, @r###"
    [placeholder] "client": unknown placeholder {{client_fone}} will print as written
    [bounds] "lines": extends 30px past the right edge of the 800px canvas
    [page-break] "footer": starts on page 1 but ends on page 2; the overflow is cut when printed
    "###);
    assert_eq!(warnings[0].span, Some(25..40));
}

#[test]
fn test_fixing_the_template_clears_warnings() {
    let mut tpl = DocumentTemplate::from_file(&fixture("facture.toml")).unwrap();

    tpl.update_element(
        "client",
        &ElementPatch {
            content: Some("Client: {{client_name}} ({{client_phone}})".to_string()),
            ..Default::default()
        },
    )
    .unwrap();
    tpl.update_element(
        "lines",
        &ElementPatch {
            width: Some(700.0),
            ..Default::default()
        },
    )
    .unwrap();
    tpl.move_element("footer", 0.0, -60.0).unwrap();

    assert!(lint::check(&tpl).is_empty());
    assert_eq!(tpl.page_count(), 1);
    assert!(matches!(
        tpl.move_element("missing", 1.0, 1.0),
        Err(TemplateError::ElementNotFound { .. })
    ));
}

#[test]
fn test_saved_templates_from_dataset() {
    let dataset = Dataset::from_file(&fixture("agency.json")).unwrap();
    let registry = TemplateRegistry::from_templates(dataset.templates.iter().cloned());

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.find("receipt").map(|t| t.id.as_str()), Some("tpl-custom-versement"));
    assert_eq!(registry.find("payment"), registry.get(Category::Versement));
    assert!(registry.find("invoice").is_none());

    let invoice = registry.resolve_for_print(Category::Facture, Locale::Fr, None);
    assert_eq!(invoice, default_template(Category::Facture, Locale::Fr));
}

#[test]
fn test_contract_exports_as_toml() {
    let tpl = default_template(Category::Contrat, Locale::Fr);
    let toml = tpl.to_toml().unwrap();
    let back = DocumentTemplate::from_toml(&toml).unwrap();
    assert_eq!(back, tpl);
    assert_eq!(back.page_count(), 2);
}
