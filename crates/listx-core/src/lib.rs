//! # listx-core
//!
//! Core types, validation, and abstractions for the listx document register.
//!
//! This crate provides the foundational data structures that the listx
//! engine crates operate on: the field catalog, templates with their two
//! independently ordered field zones, documents and their collection, and
//! the non-throwing validation layer.

pub mod defaults;
pub mod error;
pub mod fields;
pub mod logging;
pub mod models;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use fields::{
    FieldCatalog, FieldDef, FieldId, FieldKind, BUILTIN_FIELDS, CATEGORY_FIELD,
    DESCRIPTION_FIELD, FILENAME_FIELD, MANDATORY_DOCUMENT_FIELDS, MANDATORY_FORM_FIELDS,
    SYSTEM_FIELDS, SYSTEM_FIELD_IDS,
};
pub use models::{
    Document, DocumentCollection, DocumentValues, NumberingMode, Project, Template,
};
pub use validation::{
    field_names_similar, normalize_text, validate_document, validate_field,
    validate_select_options, validate_template, validate_text, ValidationReport,
};
