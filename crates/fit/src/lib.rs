//! Fixture tables: HTML tables whose cells are checked by fixture code and annotated
//! in place with the outcome (`right`, `wrong`, `ignore`, `exception`).
//!
//! [`FitTable`] parses a `<table>` element into rows and cells, a [`Fixture`] marks the
//! cells, and [`FitTable::finish`] writes the marks back into the markup and tallies
//! them into [`Counts`]. [`run_document`] does this for every table of a page.
pub mod constants;
pub mod parser_utils;

mod args;
mod cell;
mod context;
mod convert;
mod counts;
mod error;
mod fixture;
mod registry;
mod row;
mod runner;
mod table;

pub use crate::args::FixtureArgs;
pub use crate::cell::{Cell, CellState};
pub use crate::context::Context;
pub use crate::convert::{StandardConverter, TypedValue, ValueConverter, ValueType};
pub use crate::counts::Counts;
pub use crate::error::{FitError, FitResult, FixtureError};
pub use crate::fixture::{Fixture, IgnoringFixture, check, extract_column_parameters, run_table};
pub use crate::registry::{FixtureFactory, FixtureRegistry};
pub use crate::row::{Row, RowMut};
pub use crate::runner::{RunConfig, RunReport, TableOutcome, TableReport, run_document};
pub use crate::table::FitTable;
