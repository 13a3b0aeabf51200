//! Structured logging field name constants for listx.
//!
//! Engine modules use these constants for consistent structured logging
//! fields, so one grep finds every emission site for a given field.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | WARN  | Rejected operation, caller shown a warning |
//! | INFO  | Store lifecycle (template added/applied/deleted) |
//! | DEBUG | Engine decision points (renumber counts, merge results) |

/// Logical operation name.
/// Examples: "renumber", "reorder_categories", "add_document"
pub const OPERATION: &str = "op";

/// Template name being operated on.
pub const TEMPLATE_NAME: &str = "template";

/// Document UUID being operated on.
pub const DOCUMENT_ID: &str = "document_id";

/// Field identifier involved in a zone mutation.
pub const FIELD_ID: &str = "field_id";

/// Zone a mutation targets ("display" / "filename").
pub const ZONE: &str = "zone";

/// Category value involved in a numbering or reorder operation.
pub const CATEGORY: &str = "category";

/// Active numbering mode.
pub const MODE: &str = "mode";

/// Number of documents touched by an operation.
pub const DOC_COUNT: &str = "doc_count";

/// Number of distinct categories in the collection.
pub const CATEGORY_COUNT: &str = "category_count";
