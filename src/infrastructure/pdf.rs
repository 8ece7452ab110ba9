//! Contract rendering on top of a fillable PDF form template.
//!
//! The pipeline is: populate typed fields, place the signature image, flatten,
//! then re-parse the output to make sure nothing is left editable.

pub mod fields;
pub mod flatten;
pub mod form;
pub mod generator;
pub mod page;
pub mod signature;

pub use generator::ContractPdfGenerator;

use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("Contract template not found at {0}")]
    TemplateMissing(String),

    #[error("Contract template is not usable: {0}")]
    TemplateInvalid(String),

    #[error("Signature could not be used: {0}")]
    Signature(String),

    #[error("Flattened document still has editable fields: {0}")]
    NotFlattened(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// How filled fields are made non-editable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlattenStrategy {
    /// Generated appearance streams plus the ReadOnly flag on every field.
    #[default]
    ReadOnly,
    /// Values drawn into the page content; widgets and the form dictionary removed.
    BurnIn,
}

impl FlattenStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlattenStrategy::ReadOnly => "readonly-flatten",
            FlattenStrategy::BurnIn => "burn-in",
        }
    }
}

impl fmt::Display for FlattenStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlattenStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "readonly-flatten" | "readonly" => Ok(FlattenStrategy::ReadOnly),
            "burn-in" | "burnin" => Ok(FlattenStrategy::BurnIn),
            "rasterize" => anyhow::bail!("rasterize is not supported, use burn-in"),
            other => anyhow::bail!("Unknown flatten strategy: {}", other),
        }
    }
}
