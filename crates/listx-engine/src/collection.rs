//! Document collection operations.
//!
//! Add, edit, delete and the two reorder operations. Every path that
//! changes the sequence ends by running the numbering engine, so the
//! returned snapshot always carries consistent codes and file names.
//!
//! Rejections are values: a cross-category drop returns
//! [`Reorder::Rejected`] with the collection untouched, and a document that
//! fails validation returns [`Mutation::Invalid`] — neither is an error.

use std::collections::BTreeMap;

use tracing::{debug, warn};
use uuid::Uuid;

use listx_core::error::{Error, Result};
use listx_core::fields::FieldId;
use listx_core::models::{Document, DocumentCollection, NumberingMode, Template};
use listx_core::validation::{normalize_text, validate_document, ValidationReport};

use crate::numbering::{next_number, renumber_documents};

// =============================================================================
// OUTCOMES
// =============================================================================

/// Outcome of a validated mutation: the new snapshot, or the report that
/// kept the old one.
#[derive(Debug, Clone)]
pub enum Mutation {
    Applied {
        collection: DocumentCollection,
        document_id: Uuid,
    },
    Invalid(ValidationReport),
}

/// Outcome of a drag-reorder: the new snapshot, or a warning for the user
/// with the collection left unchanged.
#[derive(Debug, Clone)]
pub enum Reorder {
    Applied(DocumentCollection),
    Rejected { warning: String },
}

/// Field values for a document about to be added or edited.
#[derive(Debug, Clone, Default)]
pub struct DocumentInput {
    pub values: BTreeMap<FieldId, String>,
    pub description: String,
}

impl DocumentInput {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            values: BTreeMap::new(),
            description: description.into(),
        }
    }

    pub fn with_value(mut self, id: impl Into<FieldId>, value: impl Into<String>) -> Self {
        self.values.insert(id.into(), value.into());
        self
    }
}

fn apply_input(document: &mut Document, input: &DocumentInput) {
    for (id, value) in &input.values {
        document.values.set(id.clone(), normalize_text(value));
    }
    document.nom = normalize_text(&input.description);
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Append a new document and renumber.
///
/// Validation runs before anything is touched; an invalid input returns the
/// report and leaves the collection as it was.
pub fn add_document(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
    input: &DocumentInput,
) -> Mutation {
    let mut document = Document::new();
    apply_input(&mut document, input);

    let report = validate_document(&document, template);
    if !report.valid {
        return Mutation::Invalid(report);
    }

    let category = document.category(&template.category_field());
    document.numero = next_number(collection, template, &category, mode);

    let document_id = document.id;
    let mut documents = collection.documents().to_vec();
    documents.push(document);

    let collection = renumber_documents(
        &DocumentCollection::from_documents(documents),
        template,
        mode,
    );
    debug!(op = "add_document", document_id = %document_id, category = %category, "document added");

    Mutation::Applied {
        collection,
        document_id,
    }
}

/// Replace a document's values and renumber. The id must exist.
pub fn edit_document(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
    id: Uuid,
    input: &DocumentInput,
) -> Result<Mutation> {
    let position = collection
        .position(id)
        .ok_or(Error::DocumentNotFound(id))?;

    let mut document = collection.documents()[position].clone();
    document.values = Default::default();
    apply_input(&mut document, input);

    let report = validate_document(&document, template);
    if !report.valid {
        return Ok(Mutation::Invalid(report));
    }

    let mut documents = collection.documents().to_vec();
    documents[position] = document;

    let collection = renumber_documents(
        &DocumentCollection::from_documents(documents),
        template,
        mode,
    );
    debug!(op = "edit_document", document_id = %id, "document edited");

    Ok(Mutation::Applied {
        collection,
        document_id: id,
    })
}

/// Remove a document by id and renumber.
pub fn delete_document(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
    id: Uuid,
) -> Result<DocumentCollection> {
    if collection.get(id).is_none() {
        return Err(Error::DocumentNotFound(id));
    }

    let documents: Vec<Document> = collection
        .iter()
        .filter(|d| d.id != id)
        .cloned()
        .collect();

    debug!(op = "delete_document", document_id = %id, "document deleted");
    Ok(renumber_documents(
        &DocumentCollection::from_documents(documents),
        template,
        mode,
    ))
}

/// Drag one document onto another of the same category.
///
/// Documents of different categories may not interleave: a cross-category
/// target rejects the drop, leaving the collection unchanged and handing
/// the warning back as a value.
pub fn reorder_document_within_category(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
    moved: Uuid,
    target: Uuid,
) -> Result<Reorder> {
    let from = collection
        .position(moved)
        .ok_or(Error::DocumentNotFound(moved))?;
    let to = collection
        .position(target)
        .ok_or(Error::DocumentNotFound(target))?;

    if moved == target {
        return Ok(Reorder::Applied(collection.clone()));
    }

    let category_field = template.category_field();
    let moved_category = collection.documents()[from].category(&category_field);
    let target_category = collection.documents()[to].category(&category_field);

    if moved_category != target_category {
        warn!(
            op = "reorder_document",
            document_id = %moved,
            category = %moved_category,
            "cross-category drop rejected"
        );
        return Ok(Reorder::Rejected {
            warning: format!(
                "seuls les documents de m\u{ea}me nature peuvent \u{ea}tre r\u{e9}organis\u{e9}s ({} vs {})",
                moved_category, target_category
            ),
        });
    }

    let mut documents = collection.documents().to_vec();
    let doc = documents.remove(from);
    documents.insert(to, doc);

    Ok(Reorder::Applied(renumber_documents(
        &DocumentCollection::from_documents(documents),
        template,
        mode,
    )))
}

/// Drag a whole category block to another category's position.
///
/// Rewrites the sequence by re-concatenating per-category runs in the new
/// first-seen order, then renumbers.
pub fn reorder_categories(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
    moved: &str,
    target: &str,
) -> Result<DocumentCollection> {
    let category_field = template.category_field();
    let moved = moved.trim().to_uppercase();
    let target = target.trim().to_uppercase();

    let mut categories = collection.category_order(&category_field);
    let from = categories
        .iter()
        .position(|c| *c == moved)
        .ok_or_else(|| Error::CategoryNotFound(moved.clone()))?;
    let to = categories
        .iter()
        .position(|c| *c == target)
        .ok_or_else(|| Error::CategoryNotFound(target.clone()))?;

    if from != to {
        let category = categories.remove(from);
        categories.insert(to, category);
    }

    let mut documents: Vec<Document> = Vec::with_capacity(collection.len());
    for category in &categories {
        documents.extend(
            collection
                .documents_in_category(&category_field, category)
                .into_iter()
                .cloned(),
        );
    }

    debug!(op = "reorder_categories", category = %moved, "category block moved");
    Ok(renumber_documents(
        &DocumentCollection::from_documents(documents),
        template,
        mode,
    ))
}

/// Switch the numbering mode: nothing but a full renumber under the new
/// mode.
pub fn set_numbering_mode(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
) -> DocumentCollection {
    debug!(op = "set_numbering_mode", mode = %mode, "mode switched");
    renumber_documents(collection, template, mode)
}

/// Empty the collection.
pub fn clear(collection: &DocumentCollection) -> DocumentCollection {
    debug!(op = "clear", doc_count = collection.len(), "collection cleared");
    DocumentCollection::new()
}
