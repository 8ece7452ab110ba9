use crate::common;

use fleetdocs::domain::artifacts::{ArtifactRef, RenderInput};
use fleetdocs::domain::contracts::{Contract, ServiceWindow};
use fleetdocs::domain::drivers::Role;
use fleetdocs::infrastructure::pdf::form::{collect_fields, decode_text_string, editable_fields};
use fleetdocs::infrastructure::pdf::{ContractPdfGenerator, FlattenStrategy, PdfError};
use lopdf::{Document, Object};
use time::macros::{date, datetime};

fn render_input(service: ServiceWindow) -> RenderInput {
    let today = date!(2025 - 06 - 15);
    let mut driver = common::account(
        "K7M2QX",
        Role::Driver,
        common::compliant_profile("Jane Doe", today),
    );
    driver.id = 7;

    RenderInput {
        contract: Contract {
            id: 1,
            contract_number: "001".to_string(),
            driver_id: driver.id,
            service,
            city: "Medellín".to_string(),
            landlord_name: Some("Acme S.A.S.".to_string()),
            landlord_id: None,
            signature: common::png_signature(),
            artifact: ArtifactRef::default(),
            created_at: datetime!(2025-06-15 12:00 -5),
        },
        driver,
        today,
        lessee: "Fleet Co".to_string(),
    }
}

fn by_day() -> ServiceWindow {
    ServiceWindow::ByDay {
        date: date!(2025 - 06 - 20),
    }
}

fn field_value(doc: &Document, name: &str) -> Option<String> {
    let field = collect_fields(doc)
        .unwrap()
        .into_iter()
        .find(|f| f.name == name)?;
    match doc.get_dictionary(field.id).ok()?.get(b"V").ok()? {
        Object::String(bytes, _) => Some(decode_text_string(bytes)),
        _ => None,
    }
}

fn first_page_content(doc: &Document) -> String {
    let page_id = *doc.get_pages().values().next().unwrap();
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

#[test]
fn test_read_only_output_keeps_values_and_locks_fields() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(common::FULL_TEMPLATE_FIELDS),
        FlattenStrategy::ReadOnly,
    )
    .unwrap();

    let bytes = generator.generate(&render_input(by_day())).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    assert!(editable_fields(&doc).unwrap().is_empty());
    assert_eq!(field_value(&doc, "numero").as_deref(), Some("001"));
    assert_eq!(field_value(&doc, "placa").as_deref(), Some("ABC123"));
    assert_eq!(field_value(&doc, "conductor").as_deref(), Some("Jane Doe"));
    assert_eq!(field_value(&doc, "servicio_dia").as_deref(), Some("20/06/2025"));
    assert_eq!(
        field_value(&doc, "ciudad_fecha").as_deref(),
        Some("Medellín, 15/06/2025")
    );
    assert_eq!(field_value(&doc, "arrendatario").as_deref(), Some("Fleet Co"));
    assert_eq!(field_value(&doc, "hora_inicio"), None);
    assert_eq!(field_value(&doc, "documento_arrendador"), None);

    // the signature is drawn as an image on the page
    assert!(first_page_content(&doc).contains(" Do Q"));
}

#[test]
fn test_burn_in_output_has_no_form() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(common::FULL_TEMPLATE_FIELDS),
        FlattenStrategy::BurnIn,
    )
    .unwrap();

    let bytes = generator
        .generate(&render_input(ServiceWindow::ByHour {
            start: "08:00".to_string(),
            end: "12:00".to_string(),
        }))
        .unwrap();
    let doc = Document::load_mem(&bytes).unwrap();

    assert!(collect_fields(&doc).unwrap().is_empty());
    assert!(editable_fields(&doc).unwrap().is_empty());

    let content = first_page_content(&doc);
    assert!(content.contains("(001) Tj"));
    assert!(content.contains("(08:00) Tj"));
    assert!(content.contains("(12:00) Tj"));
    assert!(content.contains("(X) Tj"));
    // Latin-1 characters are written as octal escapes
    assert!(content.contains("(Medell\\355n, 15/06/2025) Tj"));
    assert!(content.contains(" Do Q"));

    let page_id = *doc.get_pages().values().next().unwrap();
    let page = doc.get_dictionary(page_id).unwrap();
    assert!(page.get(b"Annots").is_err());
}

#[test]
fn test_template_without_required_field_is_rejected() {
    let fields: Vec<&str> = common::FULL_TEMPLATE_FIELDS
        .iter()
        .copied()
        .filter(|f| *f != "placa")
        .collect();

    let result =
        ContractPdfGenerator::from_bytes(common::contract_template(&fields), FlattenStrategy::ReadOnly);
    assert!(matches!(result, Err(PdfError::TemplateInvalid(msg)) if msg.contains("placa")));
}

#[test]
fn test_optional_fields_may_be_missing() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(&["numero", "placa", "conductor"]),
        FlattenStrategy::ReadOnly,
    )
    .unwrap();

    let mut input = render_input(by_day());
    input.contract.contract_number = "007".to_string();

    let bytes = generator.generate(&input).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    assert_eq!(field_value(&doc, "numero").as_deref(), Some("007"));
    assert_eq!(field_value(&doc, "placa").as_deref(), Some("ABC123"));
    assert_eq!(field_value(&doc, "conductor").as_deref(), Some("Jane Doe"));
    assert!(editable_fields(&doc).unwrap().is_empty());
}

#[test]
fn test_unreadable_signature_is_skipped() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(common::FULL_TEMPLATE_FIELDS),
        FlattenStrategy::BurnIn,
    )
    .unwrap();

    let mut input = render_input(by_day());
    input.contract.signature = "data:image/png;base64,bm90IGFuIGltYWdl".to_string();

    let bytes = generator.generate(&input).unwrap();
    let doc = Document::load_mem(&bytes).unwrap();
    let content = first_page_content(&doc);
    assert!(content.contains("(001) Tj"));
    assert!(!content.contains(" Do Q"));
}

fn signature_line(doc: &Document) -> String {
    first_page_content(doc)
        .lines()
        .find(|line| line.ends_with("/FDSig Do Q"))
        .unwrap()
        .to_string()
}

#[test]
fn test_signature_is_fitted_into_its_region() {
    // `firma` is the last field, so its widget sits at [60 290 320 310]
    let with_box = common::contract_template(common::FULL_TEMPLATE_FIELDS);
    let without_box = common::contract_template(&["numero", "placa", "conductor"]);

    for strategy in [FlattenStrategy::ReadOnly, FlattenStrategy::BurnIn] {
        let generator = ContractPdfGenerator::from_bytes(with_box.clone(), strategy).unwrap();
        let doc = Document::load_mem(&generator.generate(&render_input(by_day())).unwrap()).unwrap();
        // 40x20 image at natural size, centered horizontally in the widget
        assert_eq!(
            signature_line(&doc),
            "q 40.00 0 0 20.00 170.00 290.00 cm /FDSig Do Q",
            "{strategy}"
        );

        let generator = ContractPdfGenerator::from_bytes(without_box.clone(), strategy).unwrap();
        let doc = Document::load_mem(&generator.generate(&render_input(by_day())).unwrap()).unwrap();
        // fallback box [85 78 310 148], scaled 3.5x to its height
        assert_eq!(
            signature_line(&doc),
            "q 140.00 0 0 70.00 127.50 78.00 cm /FDSig Do Q",
            "{strategy}"
        );
    }
}

#[test]
fn test_signature_encode_failure_aborts_render() {
    let generator = ContractPdfGenerator::from_bytes(
        common::contract_template(common::FULL_TEMPLATE_FIELDS),
        FlattenStrategy::ReadOnly,
    )
    .unwrap();

    // decodes fine, but is too wide for JPEG
    let mut input = render_input(by_day());
    input.contract.signature = common::png_signature_sized(70_000, 1);

    assert!(matches!(generator.generate(&input), Err(PdfError::Image(_))));
}

#[test]
fn test_missing_template_file() {
    let result = ContractPdfGenerator::load("/nonexistent/contract.pdf", FlattenStrategy::ReadOnly);
    assert!(matches!(result, Err(PdfError::TemplateMissing(_))));
}
