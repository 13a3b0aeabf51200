//! Document numbering engine.
//!
//! Assigns the structured numeric code of every document in a collection,
//! grouped by category in first-seen order, under the two numbering modes.
//! Renumbering is a total, idempotent function of (collection, mode): it
//! cannot fail, and running it twice without an intervening structural
//! change is a no-op.

use tracing::debug;

use listx_core::defaults::{CATEGORY_BLOCK_SIZE, CODE_PAD_WIDTH};
use listx_core::models::{Document, DocumentCollection, NumberingMode, Template};

use crate::filename::generate_filename;

/// Zero-pad a code to [`CODE_PAD_WIDTH`] digits. Wider codes pass through
/// untouched, so an 11th-category block keeps its four digits instead of
/// colliding with an earlier block.
pub fn format_code(code: u32) -> String {
    format!("{:0width$}", code, width = CODE_PAD_WIDTH)
}

/// Recompute every document's code and file name.
///
/// The output sequence is re-concatenated per-category (first-seen category
/// order, sequence order within each category), which is also what makes the
/// function idempotent. Recomputes from scratch on every call: O(n) per
/// structural change, fine at tens-to-hundreds of documents, worth
/// revisiting before reusing on much larger collections.
pub fn renumber_documents(
    collection: &DocumentCollection,
    template: &Template,
    mode: NumberingMode,
) -> DocumentCollection {
    let category_field = template.category_field();
    let categories = collection.category_order(&category_field);

    let mut renumbered: Vec<Document> = Vec::with_capacity(collection.len());
    let mut counter: u32 = 0;

    for (category_index, category) in categories.iter().enumerate() {
        for (doc_index, doc) in collection
            .documents_in_category(&category_field, category)
            .into_iter()
            .enumerate()
        {
            let code = match mode {
                NumberingMode::ByCategory => {
                    (category_index as u32 + 1) * CATEGORY_BLOCK_SIZE + doc_index as u32 + 1
                }
                NumberingMode::Global => {
                    counter += 1;
                    counter
                }
            };

            let mut doc = doc.clone();
            doc.numero = format_code(code);
            doc.nom_complet = generate_filename(&doc, template);
            renumbered.push(doc);
        }
    }

    debug!(
        op = "renumber",
        mode = %mode,
        doc_count = renumbered.len(),
        category_count = categories.len(),
        "collection renumbered"
    );

    DocumentCollection::from_documents(renumbered)
}

/// Predict the code the next document of `category` would receive.
///
/// Advisory only: every mutation path runs a full renumber right after, but
/// the predicted code matches what that renumber will assign to a document
/// appended at the end of its category's run.
pub fn next_number(
    collection: &DocumentCollection,
    template: &Template,
    category: &str,
    mode: NumberingMode,
) -> String {
    let category_field = template.category_field();
    let category = category.trim().to_uppercase();

    let mut categories = collection.category_order(&category_field);
    if !categories.contains(&category) {
        categories.push(category.clone());
    }

    let in_category = collection
        .documents_in_category(&category_field, &category)
        .len() as u32;

    let code = match mode {
        NumberingMode::ByCategory => {
            let position = categories.iter().position(|c| *c == category).unwrap_or(0) as u32 + 1;
            position * CATEGORY_BLOCK_SIZE + in_category + 1
        }
        NumberingMode::Global => {
            // Documents of every category up to and including this one come
            // first in the grouped walk.
            let mut preceding: u32 = 0;
            for c in &categories {
                if *c == category {
                    break;
                }
                preceding += collection.documents_in_category(&category_field, c).len() as u32;
            }
            preceding + in_category + 1
        }
    };

    format_code(code)
}
