use crate::args::FixtureArgs;
use crate::cell::{Cell, CellState};
use crate::constants::{
    ATTR_ARGUMENT_PREFIX, ATTR_FIXTURE, CSS_EXCEPTION, CSS_FEEDBACK_COLUMN, MSG_INCOMPLETE_TABLE,
};
use crate::counts::Counts;
use crate::error::{FitError, FitResult};
use crate::parser_utils::{html_stack_trace, is_ignored};
use crate::row::{Row, RowMut};
use html::dom_utils::{
    assign_node_ids, assign_node_ids_from, collect_element_ids, collect_elements,
    find_node_by_id_mut, find_parent_mut, walk_mut,
};
use html::{Id, Node};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::error::Error;
use std::sync::LazyLock;

/// `key = value` cells of a legacy header row.
static ARGUMENT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([^=]+?)\s*=\s*(.*?)\s*$").expect("argument pattern compiles")
});

#[derive(Clone, Debug, PartialEq, Eq)]
struct RowError {
    state: CellState,
    message: String,
}

/// A fixture table parsed out of a `<table>` element.
///
/// The table borrows the element exclusively until [`FitTable::finish`] consumes it.
/// Rows and cells refer to their markup by node id; every node of the element gets
/// an id when the table is built.
pub struct FitTable<'a> {
    element: &'a mut Node,
    next_id: u32,
    fixture_class: String,
    arguments: FixtureArgs,
    attribute_style: bool,
    content_start: usize,
    rows: Vec<Row>,
    counts: Counts,
    has_feedback_column: bool,
    row_errors: BTreeMap<usize, RowError>,
}

impl<'a> FitTable<'a> {
    /// Parses the header and content rows of `element`.
    ///
    /// A table without any `<tr>` or without any `<td>` is annotated with a whole-table
    /// exception before `FitError::InvalidTable` is returned.
    pub fn new(element: &'a mut Node) -> FitResult<Self> {
        let next_id = assign_node_ids(element);
        let attribute_style = element.has_attr(ATTR_FIXTURE);
        let mut table = FitTable {
            element,
            next_id,
            fixture_class: String::new(),
            arguments: FixtureArgs::new(),
            attribute_style,
            content_start: 0,
            rows: Vec::new(),
            counts: Counts::default(),
            has_feedback_column: false,
            row_errors: BTreeMap::new(),
        };

        if let Err(reason) = table.check_table() {
            log::warn!(target: "fit.table", "invalid table: {reason}");
            table.exception(MSG_INCOMPLETE_TABLE);
            table.finish_markup();
            return Err(FitError::InvalidTable { reason });
        }

        table.parse_table();
        Ok(table)
    }

    fn check_table(&self) -> Result<(), String> {
        let trs = self.trs();
        if trs.is_empty() {
            return Err("table has no rows".to_string());
        }
        let cells: usize = trs.iter().map(|tr| tds(tr).len()).sum();
        if cells == 0 {
            return Err("table has no cells".to_string());
        }
        Ok(())
    }

    fn parse_table(&mut self) {
        if self.attribute_style {
            self.parse_attribute_header();
            self.content_start = 0;
        } else {
            self.parse_legacy_header();
            self.content_start = 1;
        }
        log::trace!(
            target: "fit.table",
            "header: class={:?} attribute_style={} args={}",
            self.fixture_class,
            self.attribute_style,
            self.arguments.len()
        );

        let mut rows = Vec::new();
        for tr in self.trs().into_iter().skip(self.content_start) {
            if is_ignored(tr) {
                log::trace!(target: "fit.table", "skipping ignored row {:?}", tr.id());
                continue;
            }
            rows.push(Row::new(tr.id(), cells_of(tr)));
        }
        self.rows = rows;
        self.update_indices();
    }

    fn parse_attribute_header(&mut self) {
        self.fixture_class = self.element.attr(ATTR_FIXTURE).unwrap_or("").to_string();
        let mut arguments = FixtureArgs::new();
        for (name, value) in self.element.attributes() {
            let lower = name.to_ascii_lowercase();
            if let Some(key) = lower.strip_prefix(ATTR_ARGUMENT_PREFIX) {
                arguments.insert(key, value.as_deref().unwrap_or(""));
            }
        }
        self.arguments = arguments;
    }

    fn parse_legacy_header(&mut self) {
        let texts: Vec<String> = match self.trs().first() {
            Some(tr) => tds(tr).into_iter().map(Node::text).collect(),
            None => Vec::new(),
        };
        let mut texts = texts.into_iter();
        self.fixture_class = texts.next().unwrap_or_default();

        let mut arguments = FixtureArgs::new();
        for (position, text) in texts.enumerate() {
            let position = position.to_string();
            match ARGUMENT_PATTERN.captures(&text) {
                Some(caps) => {
                    let value = &caps[2];
                    arguments.insert(&caps[1], value);
                    arguments.insert(&position, value);
                }
                None => arguments.insert(&position, text.as_str()),
            }
        }
        self.arguments = arguments;
    }

    fn update_indices(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.update_index(index);
        }
    }

    /// All `<tr>` elements of this table in document order, nested tables excluded.
    fn trs(&self) -> Vec<&Node> {
        collect_elements(self.element, "tr", Some("table"))
    }

    fn row_ids(&self) -> Vec<Id> {
        collect_element_ids(self.element, "tr", Some("table"))
    }

    /// A new `<tr>`, already holding a feedback cell when the table has that column.
    fn new_tr(&mut self) -> Node {
        let mut tr = Node::element("tr");
        if self.has_feedback_column {
            tr.push_child(feedback_td());
        }
        self.fresh(tr)
    }

    fn fresh(&mut self, mut node: Node) -> Node {
        assign_node_ids_from(&mut node, &mut self.next_id);
        node
    }

    pub fn fixture_class(&self) -> &str {
        &self.fixture_class
    }

    pub fn arguments(&self) -> &FixtureArgs {
        &self.arguments
    }

    pub fn argument(&self, key: &str) -> Option<&str> {
        self.arguments.get(key)
    }

    pub fn is_attribute_style(&self) -> bool {
        self.attribute_style
    }

    /// Number of leading `<tr>` elements that belong to the header.
    pub fn content_start(&self) -> usize {
        self.content_start
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn cell_mut(&mut self, row: usize, column: usize) -> FitResult<&mut Cell> {
        let len = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(FitError::RowOutOfRange { index: row, len })?
            .cell_mut(column)
            .ok_or(FitError::MissingCell { row, column })
    }

    pub fn counts(&self) -> &Counts {
        &self.counts
    }

    pub fn element(&self) -> &Node {
        &*self.element
    }

    pub fn has_feedback_column(&self) -> bool {
        self.has_feedback_column
    }

    /// Inserts an empty row before content row `index`; `index == rows().len()` appends.
    pub fn insert(&mut self, index: usize) -> FitResult<RowMut<'_, 'a>> {
        if index > self.rows.len() {
            return Err(FitError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let tr = self.new_tr();
        let tr_id = tr.id();
        self.insert_tr(index, tr);
        self.rows.insert(index, Row::new(tr_id, Vec::new()));
        self.row_errors = std::mem::take(&mut self.row_errors)
            .into_iter()
            .map(|(i, e)| if i >= index { (i + 1, e) } else { (i, e) })
            .collect();
        self.update_indices();
        log::trace!(target: "fit.table", "inserted row {index} as {tr_id:?}");
        Ok(RowMut::new(self, index))
    }

    pub fn append(&mut self) -> RowMut<'_, 'a> {
        let index = self.rows.len();
        let tr = self.new_tr();
        let tr_id = tr.id();
        self.insert_tr(index, tr);
        self.rows.push(Row::new(tr_id, Vec::new()));
        self.update_indices();
        log::trace!(target: "fit.table", "appended row {index} as {tr_id:?}");
        RowMut::new(self, index)
    }

    /// Removes content row `index` and its `<tr>`.
    pub fn remove(&mut self, index: usize) -> FitResult<Row> {
        if index >= self.rows.len() {
            return Err(FitError::RowOutOfRange {
                index,
                len: self.rows.len(),
            });
        }
        let row = self.rows.remove(index);
        if let Some((parent, pos)) = find_parent_mut(self.element, row.node()) {
            parent.remove_child(pos);
        }
        self.row_errors = std::mem::take(&mut self.row_errors)
            .into_iter()
            .filter(|(i, _)| *i != index)
            .map(|(i, e)| if i > index { (i - 1, e) } else { (i, e) })
            .collect();
        self.update_indices();
        log::trace!(target: "fit.table", "removed row {index}");
        Ok(row)
    }

    /// Places `tr` in front of content row `index`, or after the last `<tr>` when there
    /// is no such row.
    fn insert_tr(&mut self, index: usize, tr: Node) {
        let anchor = match self.rows.get(index) {
            Some(row) => Some((row.node(), 0)),
            None => self.row_ids().last().map(|&id| (id, 1)),
        };
        if let Some((anchor, offset)) = anchor {
            if let Some((parent, pos)) = find_parent_mut(self.element, anchor) {
                parent.insert_child(pos + offset, tr);
                return;
            }
        }
        let container = self.container_id();
        if let Some(node) = find_node_by_id_mut(self.element, container) {
            node.push_child(tr);
        }
    }

    /// The first `<tbody>` of the table, or the table element itself.
    fn container_id(&self) -> Id {
        collect_element_ids(self.element, "tbody", Some("table"))
            .first()
            .copied()
            .unwrap_or_else(|| self.element.id())
    }

    pub(crate) fn push_cell(&mut self, row_index: usize, text: &str) -> &mut Cell {
        let mut td = Node::element("td");
        td.set_text(text);
        let td = self.fresh(td);
        let td_id = td.id();
        let tr_id = self.rows[row_index].node();
        if let Some(tr) = find_node_by_id_mut(self.element, tr_id) {
            tr.push_child(td);
        }
        self.rows[row_index].push_cell(Cell::new(td_id, text.trim().to_string()))
    }

    /// Marks a whole row as failed. An exception is never downgraded by a later `wrong_row`.
    pub fn exception_row(&mut self, index: usize, message: impl Into<String>) {
        let message = message.into();
        log::debug!(target: "fit.table", "row {index} exception: {message}");
        self.row_errors.insert(
            index,
            RowError {
                state: CellState::Exception,
                message,
            },
        );
    }

    pub fn wrong_row(&mut self, index: usize, message: impl Into<String>) {
        if self
            .row_errors
            .get(&index)
            .is_some_and(|e| e.state == CellState::Exception)
        {
            return;
        }
        let message = message.into();
        log::debug!(target: "fit.table", "row {index} wrong: {message}");
        self.row_errors.insert(
            index,
            RowError {
                state: CellState::Wrong,
                message,
            },
        );
    }

    /// Whole-table failure: the message goes into the first cell of the first row.
    pub fn exception(&mut self, html: &str) {
        self.add_feedback_column(true);
        self.counts.exceptions += 1;
        let Some(&first) = self.row_ids().first() else {
            return;
        };
        if let Some(td) = self.first_cell_mut(first) {
            td.set_html(html);
            td.add_class(CSS_EXCEPTION);
        }
    }

    pub fn exception_error(&mut self, err: &dyn Error) {
        log::debug!(target: "fit.table", "table exception: {err}");
        self.exception(&html_stack_trace(err));
    }

    /// Prepends a feedback `<td>` to every row. Runs at most once per table.
    ///
    /// A leading row is created first when the table has no rows, or when `new_row` is set
    /// on an attribute-style table (which has no header row to hold table messages).
    pub fn add_feedback_column(&mut self, new_row: bool) {
        if self.has_feedback_column {
            return;
        }
        self.has_feedback_column = true;

        let trs = self.row_ids();
        if trs.is_empty() || (self.attribute_style && new_row) {
            let tr = self.fresh(Node::element("tr"));
            let placed = match trs.first() {
                Some(&first) => match find_parent_mut(self.element, first) {
                    Some((parent, pos)) => {
                        parent.insert_child(pos, tr);
                        None
                    }
                    None => Some(tr),
                },
                None => Some(tr),
            };
            if let Some(tr) = placed {
                let container = self.container_id();
                if let Some(node) = find_node_by_id_mut(self.element, container) {
                    node.prepend_child(tr);
                }
            }
        }

        let root = self.element.id();
        let next_id = &mut self.next_id;
        let mut added = 0usize;
        walk_mut(self.element, &mut |node: &mut Node| {
            if node.is_element_named("tr") {
                let mut td = feedback_td();
                assign_node_ids_from(&mut td, next_id);
                node.prepend_child(td);
                added += 1;
                return false;
            }
            node.id() == root || !node.is_element_named("table")
        });
        log::trace!(target: "fit.table", "feedback column added to {added} rows");
    }

    fn first_cell_mut(&mut self, tr: Id) -> Option<&mut Node> {
        first_td_mut(find_node_by_id_mut(self.element, tr)?)
    }

    fn process_row_errors(&mut self) {
        if self.row_errors.is_empty() {
            return;
        }
        self.add_feedback_column(false);
        let mut pending: HashMap<Id, RowError> = HashMap::new();
        for (index, error) in std::mem::take(&mut self.row_errors) {
            match error.state {
                CellState::Exception => self.counts.exceptions += 1,
                _ => self.counts.wrong += 1,
            }
            match self.rows.get(index) {
                Some(row) => {
                    pending.insert(row.node(), error);
                }
                None => log::warn!(target: "fit.table", "row error for missing row {index}"),
            }
        }
        walk_mut(self.element, &mut |node: &mut Node| {
            let Some(error) = pending.remove(&node.id()) else {
                return !pending.is_empty();
            };
            if let Some(td) = first_td_mut(node) {
                td.set_text(&error.message);
                if let Some(class) = error.state.css_class() {
                    td.add_class(class);
                }
            }
            false
        });
    }

    /// One pass over the markup; every `<td>` that backs a cell gets rendered.
    fn finish_markup(&mut self) {
        self.process_row_errors();
        let cells: HashMap<Id, &Cell> = self
            .rows
            .iter()
            .flat_map(Row::cells)
            .map(|cell| (cell.node(), cell))
            .collect();
        let counts = &mut self.counts;
        walk_mut(self.element, &mut |node: &mut Node| match cells.get(&node.id()) {
            Some(cell) => {
                cell.finish(node, counts);
                false
            }
            None => true,
        });
        self.element.add_class(self.counts.css_class());
        log::debug!(target: "fit.table", "finished {:?}: {}", self.fixture_class, self.counts);
    }

    /// Renders row errors and cell outcomes into the markup, paints the summary class
    /// and returns the final counts.
    pub fn finish(mut self) -> Counts {
        self.finish_markup();
        self.counts
    }

    /// Cell texts, `" | "`-terminated, one line per `<tr>`.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        for tr in self.trs() {
            for td in tds(tr) {
                out.push_str(&td.text());
                out.push_str(" | ");
            }
            out.push('\n');
        }
        out
    }

    pub fn outline(&self, cap: usize) -> Vec<String> {
        html::debug::outline_from_dom(&*self.element, cap)
    }
}

/// The `<td>` elements of a row, cells of nested tables excluded.
fn tds(tr: &Node) -> Vec<&Node> {
    collect_elements(tr, "td", Some("table"))
}

fn cells_of(tr: &Node) -> Vec<Cell> {
    tds(tr)
        .into_iter()
        .map(|td| Cell::new(td.id(), td.text()))
        .collect()
}

fn first_td_mut(tr: &mut Node) -> Option<&mut Node> {
    tr.children_mut()?
        .iter_mut()
        .find(|c| c.is_element_named("td"))
}

fn feedback_td() -> Node {
    let mut td = Node::element("td");
    td.add_class(CSS_FEEDBACK_COLUMN);
    td
}
