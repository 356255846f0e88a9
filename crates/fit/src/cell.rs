use crate::constants::{CSS_EXCEPTION, CSS_GREY, CSS_IGNORE, CSS_LABEL, CSS_RIGHT, CSS_WRONG};
use crate::counts::Counts;
use crate::parser_utils::html_stack_trace;
use html::{Id, Node, escape_text};
use std::error::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Unset,
    Right,
    Wrong,
    Ignored,
    Exception,
}

impl CellState {
    pub fn css_class(self) -> Option<&'static str> {
        match self {
            CellState::Unset => None,
            CellState::Right => Some(CSS_RIGHT),
            CellState::Wrong => Some(CSS_WRONG),
            CellState::Ignored => Some(CSS_IGNORE),
            CellState::Exception => Some(CSS_EXCEPTION),
        }
    }
}

/// One `<td>` of a content row.
///
/// A cell only records its outcome. The markup is rewritten once, when the owning table
/// is finished, so a fixture can mark a cell several times and the last call wins.
#[derive(Clone, Debug)]
pub struct Cell {
    node: Id,
    parsed: String,
    display: String,
    state: CellState,
    actual: Option<String>,
    message: Option<String>,
    info: Option<String>,
}

impl Cell {
    pub(crate) fn new(node: Id, text: String) -> Self {
        Cell {
            node,
            display: text.clone(),
            parsed: text,
            state: CellState::Unset,
            actual: None,
            message: None,
            info: None,
        }
    }

    /// Id of the `<td>` this cell renders into.
    pub fn node(&self) -> Id {
        self.node
    }

    pub fn state(&self) -> CellState {
        self.state
    }

    /// Text shown in the cell. Starts out as the parsed cell text.
    pub fn display_value(&self) -> &str {
        &self.display
    }

    pub fn set_display_value(&mut self, value: impl Into<String>) {
        self.display = value.into();
    }

    /// The trimmed display value, which fixtures compare against.
    pub fn fit_value(&self) -> &str {
        self.display.trim()
    }

    pub fn actual(&self) -> Option<&str> {
        self.actual.as_deref()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn right(&mut self) {
        self.mark(CellState::Right);
    }

    pub fn right_with(&mut self, info: impl Into<String>) {
        self.mark(CellState::Right);
        self.info = Some(info.into());
    }

    pub fn wrong(&mut self) {
        self.mark(CellState::Wrong);
    }

    /// Wrong, showing the expected value next to `actual`.
    pub fn wrong_with(&mut self, actual: impl Into<String>) {
        self.mark(CellState::Wrong);
        self.actual = Some(actual.into());
    }

    pub fn ignore(&mut self) {
        self.mark(CellState::Ignored);
    }

    /// Marks the cell as failed with an HTML message shown below the cell text.
    pub fn exception(&mut self, html: impl Into<String>) {
        self.mark(CellState::Exception);
        self.message = Some(html.into());
    }

    pub fn exception_error(&mut self, err: &dyn Error) {
        log::debug!(target: "fit.cell", "cell {:?} failed: {err}", self.node);
        self.exception(html_stack_trace(err));
    }

    /// Greyed-out annotation appended to the cell without changing its outcome.
    pub fn info(&mut self, text: impl Into<String>) {
        self.info = Some(text.into());
    }

    fn mark(&mut self, state: CellState) {
        self.state = state;
        self.actual = None;
        self.message = None;
    }

    /// Renders the recorded outcome into `td` and tallies it.
    pub(crate) fn finish(&self, td: &mut Node, counts: &mut Counts) {
        match self.state {
            CellState::Unset => {}
            CellState::Right => counts.right += 1,
            CellState::Wrong => counts.wrong += 1,
            CellState::Ignored => counts.ignores += 1,
            CellState::Exception => counts.exceptions += 1,
        }
        if let Some(class) = self.state.css_class() {
            td.add_class(class);
        }

        let mut body = String::new();
        match (&self.actual, &self.message) {
            (Some(actual), _) => {
                body.push_str(&escape_text(&self.display));
                body.push_str(&format!(
                    r#" <span class="{CSS_LABEL}">expected</span><hr/>"#
                ));
                body.push_str(&escape_text(actual));
                body.push_str(&format!(r#" <span class="{CSS_LABEL}">actual</span>"#));
            }
            (None, Some(message)) => {
                body.push_str(&escape_text(&self.display));
                body.push_str("<hr/>");
                body.push_str(message);
            }
            (None, None) if self.display != self.parsed || self.info.is_some() => {
                body.push_str(&escape_text(&self.display));
            }
            (None, None) => return,
        }
        if let Some(info) = &self.info {
            body.push_str(&format!(
                r#" <span class="{CSS_GREY}">{}</span>"#,
                escape_text(info)
            ));
        }
        td.set_html(&body);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FixtureError;
    use html::{inner_html, parse_fragment};

    fn td(markup: &str) -> Node {
        parse_fragment(markup)
            .into_iter()
            .next()
            .expect("markup has one element")
    }

    fn cell_for(td: &Node) -> Cell {
        Cell::new(td.id(), td.text())
    }

    #[test]
    fn unset_cell_leaves_markup_untouched() {
        let mut node = td("<td><b>keep</b> me</td>");
        let cell = cell_for(&node);
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(counts, Counts::default());
        assert_eq!(node.attr("class"), None);
        assert_eq!(inner_html(&node), "<b>keep</b> me");
    }

    #[test]
    fn right_cell_gets_class_and_keeps_content() {
        let mut node = td("<td><i>5</i></td>");
        let mut cell = cell_for(&node);
        cell.right();
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(counts.right, 1);
        assert!(node.has_class("right"));
        assert_eq!(inner_html(&node), "<i>5</i>");
    }

    #[test]
    fn wrong_with_actual_shows_expected_and_actual() {
        let mut node = td("<td>5</td>");
        let mut cell = cell_for(&node);
        cell.wrong_with("<6>");
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(counts.wrong, 1);
        assert!(node.has_class("wrong"));
        assert_eq!(
            inner_html(&node),
            r#"5 <span class="fit_label">expected</span><hr>&lt;6&gt; <span class="fit_label">actual</span>"#
        );
    }

    #[test]
    fn exception_appends_message_below_text() {
        let mut node = td("<td>x</td>");
        let mut cell = cell_for(&node);
        cell.exception_error(&FixtureError::failed("boom"));
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(counts.exceptions, 1);
        assert!(node.has_class("exception"));
        assert_eq!(
            inner_html(&node),
            r#"x<hr><pre class="fit_stacktrace">boom</pre>"#
        );
    }

    #[test]
    fn last_mark_wins() {
        let mut node = td("<td>x</td>");
        let mut cell = cell_for(&node);
        cell.exception("bad");
        cell.wrong_with("y");
        cell.ignore();
        assert_eq!(cell.state(), CellState::Ignored);
        assert_eq!(cell.message(), None);
        assert_eq!(cell.actual(), None);
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(
            counts,
            Counts {
                ignores: 1,
                ..Counts::default()
            }
        );
        assert_eq!(node.attr("class"), Some("ignore"));
    }

    #[test]
    fn changed_display_value_and_info_are_rendered() {
        let mut node = td("<td> name [param] </td>");
        let mut cell = cell_for(&node);
        assert_eq!(cell.fit_value(), "name [param]");
        cell.set_display_value("name");
        cell.info("hint");
        let mut counts = Counts::default();
        cell.finish(&mut node, &mut counts);
        assert_eq!(
            inner_html(&node),
            r#"name <span class="fit_grey">hint</span>"#
        );
    }
}
