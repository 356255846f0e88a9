use crate::context::Context;
use crate::counts::Counts;
use crate::registry::FixtureRegistry;
use crate::table::FitTable;
use html::dom_utils::for_each_element_mut;
use html::{Node, outer_html, parse_document};

#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    /// Leave every table after the first failing one untouched.
    pub fail_fast: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableOutcome {
    Ran,
    /// The table had no rows or no cells.
    Invalid,
    /// Not run because an earlier table failed under `fail_fast`.
    Skipped,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableReport {
    pub fixture: Option<String>,
    pub outcome: TableOutcome,
    pub counts: Counts,
}

#[derive(Clone, Debug)]
pub struct RunReport {
    /// The annotated document.
    pub html: String,
    pub counts: Counts,
    pub tables: Vec<TableReport>,
}

impl RunReport {
    pub fn is_failure(&self) -> bool {
        self.counts.is_failure()
    }
}

/// Runs every top-level `<table>` of `input` in document order and returns the
/// annotated document. Tables nested inside another table belong to that table's cells.
pub fn run_document(
    input: &str,
    registry: &FixtureRegistry,
    context: &mut Context,
    config: &RunConfig,
) -> RunReport {
    let mut dom = parse_document(input);
    let mut total = Counts::default();
    let mut tables = Vec::new();
    let mut failed = false;

    for_each_element_mut(&mut dom, "table", &mut |element: &mut Node| {
        let report = if failed && config.fail_fast {
            TableReport {
                fixture: None,
                outcome: TableOutcome::Skipped,
                counts: Counts::default(),
            }
        } else {
            run_table_element(element, registry, context)
        };
        log::info!(
            target: "fit.runner",
            "table {}: {:?} {:?} {}",
            tables.len(),
            report.fixture,
            report.outcome,
            report.counts
        );
        failed |= report.counts.is_failure();
        total.tally(&report.counts);
        tables.push(report);
    });

    RunReport {
        html: outer_html(&dom),
        counts: total,
        tables,
    }
}

fn run_table_element(
    element: &mut Node,
    registry: &FixtureRegistry,
    context: &mut Context,
) -> TableReport {
    let mut table = match FitTable::new(element) {
        Ok(table) => table,
        Err(err) => {
            log::warn!(target: "fit.runner", "{err}");
            return TableReport {
                fixture: None,
                outcome: TableOutcome::Invalid,
                counts: Counts {
                    exceptions: 1,
                    ..Counts::default()
                },
            };
        }
    };
    let fixture_class = table.fixture_class().to_string();
    match registry.create(&fixture_class, context) {
        Ok(mut fixture) => fixture.do_table(&mut table),
        Err(err) => table.exception_error(&err),
    }
    TableReport {
        fixture: Some(fixture_class),
        outcome: TableOutcome::Ran,
        counts: table.finish(),
    }
}
