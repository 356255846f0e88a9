//! Markup conventions shared with page authors. Changing any of these breaks existing pages.

/// Table attribute selecting the attribute-style header; its value is the fixture class.
pub const ATTR_FIXTURE: &str = "fixture";
/// Table attribute prefix for fixture arguments (`arg-count="3"` yields `count → 3`).
pub const ATTR_ARGUMENT_PREFIX: &str = "arg-";

pub const CSS_RIGHT: &str = "right";
pub const CSS_WRONG: &str = "wrong";
pub const CSS_EXCEPTION: &str = "exception";
pub const CSS_IGNORE: &str = "ignore";
pub const CSS_FEEDBACK_COLUMN: &str = "feedback";
/// Rows carrying this class are skipped during row ingestion.
pub const CSS_IGNORED_ROW: &str = "fit-ignore";

pub const CSS_STACKTRACE: &str = "fit_stacktrace";
pub const CSS_LABEL: &str = "fit_label";
pub const CSS_GREY: &str = "fit_grey";

/// Message written into the first cell of a table that has no rows or no cells.
pub const MSG_INCOMPLETE_TABLE: &str = "Incomplete table definition";
