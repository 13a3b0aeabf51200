//! Centralized default constants for the listx engine.
//!
//! **This module is the single source of truth** for all shared default
//! values. Engine crates reference these constants instead of defining their
//! own magic numbers.

// =============================================================================
// NUMBERING
// =============================================================================

/// Width every document code is zero-padded to.
///
/// Codes longer than the pad width are emitted as-is: category 10 in
/// by-category mode starts at 1001, never truncated back to three digits.
pub const CODE_PAD_WIDTH: usize = 3;

/// Size of the numeric block each category owns in by-category mode.
///
/// Category at 1-indexed position `i` owns `i*100 ..= i*100+99`.
pub const CATEGORY_BLOCK_SIZE: u32 = 100;

// =============================================================================
// FILE NAMES
// =============================================================================

/// Separator between field tokens in a generated file name.
pub const FILENAME_SEPARATOR: &str = " - ";

/// Separator between field tokens in a compact document number.
pub const DOC_NUMBER_SEPARATOR: &str = "_";

// =============================================================================
// TEMPLATE LIMITS
// =============================================================================

/// Maximum number of user fields a template may carry.
pub const MAX_TEMPLATE_FIELDS: usize = 12;

/// Minimum options for a select field.
pub const SELECT_OPTIONS_MIN: usize = 2;

/// Maximum options for a select field.
pub const SELECT_OPTIONS_MAX: usize = 20;

/// Maximum length of a template name.
pub const TEMPLATE_NAME_MAX_LEN: usize = 50;

/// Maximum length of a field label.
pub const FIELD_NAME_MAX_LEN: usize = 30;

/// Levenshtein distance at or below which two field names count as similar.
pub const FIELD_NAME_SIMILARITY_DISTANCE: usize = 2;

// =============================================================================
// TEMPLATE STORE
// =============================================================================

/// Suffix appended to a cloned template's name when none is supplied.
pub const CLONE_NAME_SUFFIX: &str = " (COPIE)";
