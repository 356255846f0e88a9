use crate::args::FixtureArgs;
use crate::cell::Cell;
use crate::convert::{TypedValue, ValueConverter, ValueType};
use crate::error::FixtureError;
use crate::row::Row;
use crate::table::FitTable;
use regex::Regex;
use std::sync::LazyLock;

/// `name[parameter]` column headers.
static COLUMN_PARAMETER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?)\s*\[\s*(.*?)\s*\]\s*$").expect("column parameter pattern compiles")
});

/// Code behind a fixture table.
///
/// Every method has a default. The defaults walk the table row by row and cell by cell
/// and ignore each cell, so an implementation overrides the level it cares about.
pub trait Fixture {
    /// Receives every table argument before `set_up`. Errors are logged and skipped.
    fn apply_argument(&mut self, _name: &str, _value: &str) -> Result<(), FixtureError> {
        Ok(())
    }

    /// Runs before the rows. A failure aborts the table: no rows, no `tear_down`.
    fn set_up(&mut self, _args: &FixtureArgs) -> Result<(), FixtureError> {
        Ok(())
    }

    /// Runs after the rows, even when processing the rows failed.
    fn tear_down(&mut self) -> Result<(), FixtureError> {
        Ok(())
    }

    fn do_table(&mut self, table: &mut FitTable<'_>) {
        run_table(self, table);
    }

    fn do_rows(&mut self, table: &mut FitTable<'_>) -> Result<(), FixtureError> {
        for index in 0..table.rows().len() {
            self.do_row(table, index)?;
        }
        Ok(())
    }

    /// Calls `do_cell` for every cell of row `index`; a failing cell becomes a cell exception.
    fn do_row(&mut self, table: &mut FitTable<'_>, index: usize) -> Result<(), FixtureError> {
        let Some(row) = table.row_mut(index) else {
            return Ok(());
        };
        for (column, cell) in row.cells_mut().iter_mut().enumerate() {
            if let Err(err) = self.do_cell(cell, column) {
                cell.exception_error(&err);
            }
        }
        Ok(())
    }

    fn do_cell(&mut self, cell: &mut Cell, _column: usize) -> Result<(), FixtureError> {
        cell.ignore();
        Ok(())
    }
}

/// The standard table lifecycle: arguments, `set_up`, `do_rows`, `tear_down`.
/// Failures of the three phases become whole-table exceptions.
pub fn run_table<F: Fixture + ?Sized>(fixture: &mut F, table: &mut FitTable<'_>) {
    let args = table.arguments().clone();
    for (name, value) in args.iter() {
        if let Err(err) = fixture.apply_argument(name, value) {
            log::warn!(target: "fit.fixture", "skipping argument {name}: {err}");
        }
    }

    if let Err(err) = fixture.set_up(&args) {
        log::debug!(target: "fit.fixture", "set_up failed: {err}");
        table.exception_error(&err);
        return;
    }
    if let Err(err) = fixture.do_rows(table) {
        log::debug!(target: "fit.fixture", "do_rows failed: {err}");
        table.exception_error(&err);
    }
    if let Err(err) = fixture.tear_down() {
        log::debug!(target: "fit.fixture", "tear_down failed: {err}");
        table.exception_error(&err);
    }
}

/// Splits `name[parameter]` cells into the display text `name` and the parameter.
/// Cells without brackets yield `None`.
pub fn extract_column_parameters(row: &mut Row) -> Vec<Option<String>> {
    row.cells_mut()
        .iter_mut()
        .map(|cell| {
            let (name, parameter) = {
                let caps = COLUMN_PARAMETER.captures(cell.fit_value())?;
                (caps[1].trim().to_string(), caps[2].to_string())
            };
            cell.set_display_value(name);
            Some(parameter)
        })
        .collect()
}

/// Compares the cell's expected value with `actual`: equal marks the cell right,
/// different marks it wrong showing `actual`, an unconvertible cell becomes an exception.
pub fn check(
    cell: &mut Cell,
    converter: &dyn ValueConverter,
    target: ValueType,
    parameter: Option<&str>,
    actual: &TypedValue,
) {
    match converter.convert(cell.fit_value(), target, parameter) {
        Ok(expected) if expected == *actual => cell.right(),
        Ok(_) => cell.wrong_with(actual.to_string()),
        Err(err) => cell.exception_error(&err),
    }
}

/// Fixture that only runs the default lifecycle, ignoring every cell.
#[derive(Debug, Default)]
pub struct IgnoringFixture;

impl Fixture for IgnoringFixture {}
