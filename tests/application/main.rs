#[path = "../common/mod.rs"]
#[macro_use]
pub mod common;

pub mod contract_pdf_test;
pub mod document_lifecycle_test;
