use fit::{
    Cell, Context, Counts, Fixture, FixtureArgs, FixtureError, FixtureRegistry, RunConfig,
    TableOutcome, run_document,
};

#[derive(Default)]
struct Seen {
    tables: u32,
}

/// Counts the tables it ran in the shared context and checks `arg-expect` against it.
struct Sequence {
    expect: Option<u32>,
}

impl Fixture for Sequence {
    fn set_up(&mut self, args: &FixtureArgs) -> Result<(), FixtureError> {
        self.expect = match args.get("expect") {
            Some(raw) => Some(raw.parse().map_err(|_| FixtureError::Argument {
                name: "expect".to_string(),
                reason: format!("not a number: {raw}"),
            })?),
            None => None,
        };
        Ok(())
    }

    fn do_cell(&mut self, cell: &mut Cell, _column: usize) -> Result<(), FixtureError> {
        match self.expect {
            Some(n) if cell.fit_value() == n.to_string() => cell.right(),
            Some(_) => cell.wrong(),
            None => cell.ignore(),
        }
        Ok(())
    }
}

fn registry() -> FixtureRegistry {
    let mut registry = FixtureRegistry::with_defaults();
    registry.register("Sequence", |context: &mut Context| {
        let seen = context.get_or_create::<Seen>();
        seen.tables += 1;
        Sequence { expect: None }
    });
    registry
}

const PAGE: &str = r#"<html><body>
<table fixture="Sequence" arg-expect="1"><tr><td>1</td></tr></table>
<table fixture="Sequence" arg-expect="x"><tr><td>1</td></tr></table>
<table><tr></tr></table>
<table fixture="Sequence"><tr><td>1</td></tr></table>
</body></html>"#;

#[test]
fn every_table_is_reported_in_document_order() {
    let mut context = Context::new();
    let report = run_document(PAGE, &registry(), &mut context, &RunConfig::default());

    let outcomes: Vec<TableOutcome> = report.tables.iter().map(|t| t.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            TableOutcome::Ran,
            TableOutcome::Ran,
            TableOutcome::Invalid,
            TableOutcome::Ran
        ]
    );
    assert_eq!(report.tables[0].fixture.as_deref(), Some("Sequence"));
    assert_eq!(report.tables[0].counts.right, 1);
    assert_eq!(report.tables[1].counts.exceptions, 1);
    assert_eq!(report.tables[3].counts.ignores, 1);
    assert_eq!(
        report.counts,
        Counts {
            right: 1,
            wrong: 0,
            ignores: 1,
            exceptions: 2
        }
    );
    assert!(report.is_failure());
    assert_eq!(context.get::<Seen>().map(|s| s.tables), Some(3));
    assert!(report.html.starts_with("<html><body>"));
    assert!(report.html.contains("cannot apply argument expect: not a number: x"));
}

#[test]
fn fail_fast_skips_after_first_failure() {
    let mut context = Context::new();
    let config = RunConfig { fail_fast: true };
    let report = run_document(PAGE, &registry(), &mut context, &config);
    let outcomes: Vec<TableOutcome> = report.tables.iter().map(|t| t.outcome).collect();
    assert_eq!(
        outcomes,
        vec![
            TableOutcome::Ran,
            TableOutcome::Ran,
            TableOutcome::Skipped,
            TableOutcome::Skipped
        ]
    );
    assert_eq!(context.get::<Seen>().map(|s| s.tables), Some(2));
}

#[test]
fn page_without_tables_passes() {
    let report = run_document(
        "<p>nothing to run</p>",
        &FixtureRegistry::new(),
        &mut Context::new(),
        &RunConfig::default(),
    );
    assert!(report.tables.is_empty());
    assert!(!report.is_failure());
    assert_eq!(report.html, "<p>nothing to run</p>");
}
