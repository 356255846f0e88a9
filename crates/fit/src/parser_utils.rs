use crate::constants::{CSS_IGNORED_ROW, CSS_STACKTRACE};
use html::{Node, escape_text};
use std::error::Error;

/// Rows marked with the ignore class are not turned into `Row`s.
pub fn is_ignored(tr: &Node) -> bool {
    tr.has_class(CSS_IGNORED_ROW)
}

/// Renders an error and its `source()` chain as escaped, preformatted HTML.
pub fn html_stack_trace(err: &dyn Error) -> String {
    let mut out = format!(r#"<pre class="{CSS_STACKTRACE}">"#);
    out.push_str(&escape_text(&err.to_string()));
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\ncaused by: ");
        out.push_str(&escape_text(&cause.to_string()));
        source = cause.source();
    }
    out.push_str("</pre>");
    out
}
