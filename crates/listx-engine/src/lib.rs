//! # listx-engine
//!
//! The field-ordering and document-numbering engine for the listx document
//! register.
//!
//! Four pieces with real invariants, all pure over the snapshots defined in
//! `listx-core`:
//!
//! - [`merge`] — reconcile the display and filename zone orderings into one
//!   data-entry form order;
//! - [`numbering`] — assign and recompute every document's structured code,
//!   grouped by category in first-seen order, under the two numbering modes;
//! - [`filename`] — derive file names from the filename zone;
//! - [`zones`] / [`collection`] / [`store`] — the mutation operations, every
//!   one of which hands back a snapshot that is already renumbered and
//!   renamed.
//!
//! The engine is single-threaded and synchronous: no I/O, nothing to cancel.
//! Persistence and rendering are external collaborators fed with
//! already-consistent snapshots.

pub mod collection;
pub mod export;
pub mod filename;
pub mod merge;
pub mod numbering;
pub mod store;
pub mod zones;

// Re-export commonly used operations at crate root
pub use collection::{
    add_document, clear, delete_document, edit_document, reorder_categories,
    reorder_document_within_category, set_numbering_mode, DocumentInput, Mutation, Reorder,
};
pub use export::{document_values, export_headers, ExportHeader};
pub use filename::{generate_doc_number, generate_filename, sanitize_filename};
pub use merge::merge_form_fields_order;
pub use numbering::{format_code, next_number, renumber_documents};
pub use store::TemplateStore;
pub use zones::{
    add_custom_field, add_field_to_zones, copy_description_to_filename,
    copy_display_to_filename, copy_filename_to_display, remove_custom_field,
    remove_from_display, remove_from_filename, reorder_within_zone, set_field_label, Zone,
};
