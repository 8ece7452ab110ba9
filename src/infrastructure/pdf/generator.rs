use super::fields::{ContractField, SIGNATURE_FIELD, field_values};
use super::flatten::flatten;
use super::form::{FormField, collect_fields, editable_fields};
use super::page;
use super::signature::{DEFAULT_SIGNATURE_RECT, SignatureImage};
use super::{FlattenStrategy, PdfError};
use crate::domain::artifacts::{ContractRenderer, RenderInput};
use lopdf::Document;
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Fills the contract template for one contract at a time.
///
/// The template is read and checked once; each render works on a fresh parse of
/// the same bytes, so renders never share document state.
pub struct ContractPdfGenerator {
    template: Vec<u8>,
    strategy: FlattenStrategy,
    /// Template fields we know how to fill.
    available: HashSet<&'static str>,
}

impl ContractPdfGenerator {
    /// Reads the template from disk. A missing or unusable template is fatal.
    pub fn load(path: impl AsRef<Path>, strategy: FlattenStrategy) -> Result<Self, PdfError> {
        let path = path.as_ref();
        let template = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => PdfError::TemplateMissing(path.display().to_string()),
            _ => PdfError::Io(e),
        })?;
        Self::from_bytes(template, strategy)
    }

    pub fn from_bytes(template: Vec<u8>, strategy: FlattenStrategy) -> Result<Self, PdfError> {
        let doc = Document::load_mem(&template)?;
        page::first_page(&doc)?;

        let declared: HashSet<String> = collect_fields(&doc)?.into_iter().map(|f| f.name).collect();

        let mut available = HashSet::new();
        let mut missing_required = Vec::new();
        for field in ContractField::ALL {
            if declared.contains(field.key()) {
                available.insert(field.key());
            } else if field.is_required() {
                missing_required.push(field.key());
            } else {
                tracing::warn!(field = field.key(), "template has no field; value will be skipped");
            }
        }

        if !missing_required.is_empty() {
            return Err(PdfError::TemplateInvalid(format!(
                "missing required fields: {}",
                missing_required.join(", ")
            )));
        }

        tracing::info!(
            fields = available.len(),
            strategy = %strategy,
            "contract template loaded"
        );

        Ok(Self {
            template,
            strategy,
            available,
        })
    }

    pub fn strategy(&self) -> FlattenStrategy {
        self.strategy
    }

    fn place_signature(
        &self,
        doc: &mut Document,
        fields: &[FormField],
        signature: &str,
    ) -> Result<(), PdfError> {
        let image = match SignatureImage::from_data_uri(signature) {
            Ok(image) => image,
            Err(e @ PdfError::Signature(_)) => {
                tracing::warn!(error = %e, "signature skipped");
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let widget = fields
            .iter()
            .find(|f| f.name == SIGNATURE_FIELD)
            .and_then(|f| f.widgets.iter().find(|w| w.rect.is_some()));
        let (page_id, rect) = match widget {
            Some(widget) => (
                match widget.page {
                    Some(page_id) => page_id,
                    None => page::first_page(doc)?,
                },
                widget.rect.unwrap_or(DEFAULT_SIGNATURE_RECT),
            ),
            None => (page::first_page(doc)?, DEFAULT_SIGNATURE_RECT),
        };

        image.place(doc, page_id, rect)
    }

    pub fn generate(&self, input: &RenderInput) -> Result<Vec<u8>, PdfError> {
        let mut doc = Document::load_mem(&self.template)?;
        let fields = collect_fields(&doc)?;

        let values: HashMap<String, String> = field_values(input)
            .into_iter()
            .filter(|(field, _)| self.available.contains(field.key()))
            .map(|(field, value)| (field.key().to_string(), value))
            .collect();

        self.place_signature(&mut doc, &fields, &input.contract.signature)?;
        flatten(&mut doc, &fields, &values, self.strategy)?;

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes)?;

        let reparsed = Document::load_mem(&bytes)?;
        let editable = editable_fields(&reparsed)?;
        if !editable.is_empty() {
            return Err(PdfError::NotFlattened(editable.join(", ")));
        }

        tracing::debug!(
            contract_number = %input.contract.contract_number,
            size = bytes.len(),
            "contract rendered"
        );
        Ok(bytes)
    }
}

impl ContractRenderer for ContractPdfGenerator {
    fn render(&self, input: &RenderInput) -> Result<Vec<u8>, anyhow::Error> {
        Ok(self.generate(input)?)
    }
}
