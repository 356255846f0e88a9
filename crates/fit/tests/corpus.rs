use fit::{Cell, Context, Counts, Fixture, FixtureError, FixtureRegistry, RunConfig, run_document};
use html::dom_utils::collect_element_ids;
use html::dom_utils::find_node_by_id;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CorpusFile {
    #[serde(rename = "case")]
    cases: Vec<Case>,
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    input: String,
    #[serde(default)]
    fail_fast: bool,
    expected: Expected,
}

#[derive(Debug, Default, Deserialize)]
struct Expected {
    #[serde(default)]
    right: u32,
    #[serde(default)]
    wrong: u32,
    #[serde(default)]
    ignores: u32,
    #[serde(default)]
    exceptions: u32,
    /// Summary class of every top-level table, `""` for untouched ones.
    #[serde(default)]
    classes: Vec<String>,
    #[serde(default)]
    contains: Vec<String>,
}

/// Marks `ok` right, `bad` wrong (actual `good`), fails on `boom`, ignores the rest.
struct Verdict;

impl Fixture for Verdict {
    fn do_cell(&mut self, cell: &mut Cell, _column: usize) -> Result<(), FixtureError> {
        match cell.fit_value() {
            "ok" => cell.right(),
            "bad" => cell.wrong_with("good"),
            "boom" => return Err(FixtureError::failed("boom")),
            _ => cell.ignore(),
        }
        Ok(())
    }
}

fn corpus_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("corpus")
}

fn load_cases() -> Vec<(PathBuf, Case)> {
    let dir = corpus_dir();
    let mut paths: Vec<PathBuf> = fs::read_dir(&dir)
        .unwrap_or_else(|err| panic!("failed to read corpus dir {dir:?}: {err}"))
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
        .collect();
    paths.sort();

    let mut cases = Vec::new();
    for path in paths {
        let content = fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("failed to read corpus file {path:?}: {err}"));
        let file: CorpusFile = toml::from_str(&content)
            .unwrap_or_else(|err| panic!("failed to parse corpus file {path:?}: {err}"));
        cases.extend(file.cases.into_iter().map(|c| (path.clone(), c)));
    }
    cases
}

fn table_classes(output: &str) -> Vec<String> {
    let mut dom = html::parse_document(output);
    html::dom_utils::assign_node_ids(&mut dom);
    let mut classes = Vec::new();
    let mut nested = Vec::new();
    for id in collect_element_ids(&dom, "table", None) {
        let Some(table) = find_node_by_id(&dom, id) else {
            continue;
        };
        if nested.contains(&id) {
            continue;
        }
        nested.extend(collect_element_ids(table, "table", None));
        classes.push(table.attr("class").unwrap_or("").to_string());
    }
    classes
}

#[test]
fn corpus_cases_produce_expected_annotations() {
    let cases = load_cases();
    assert!(!cases.is_empty(), "corpus is empty");

    let mut registry = FixtureRegistry::with_defaults();
    registry.register("fixtures.Verdict", |_| Verdict);

    for (path, case) in cases {
        let mut context = Context::new();
        let config = RunConfig {
            fail_fast: case.fail_fast,
        };
        let report = run_document(&case.input, &registry, &mut context, &config);
        let expected = Counts {
            right: case.expected.right,
            wrong: case.expected.wrong,
            ignores: case.expected.ignores,
            exceptions: case.expected.exceptions,
        };
        assert_eq!(
            report.counts, expected,
            "{path:?} '{}': counts differ\noutput: {}",
            case.name, report.html
        );
        if !case.expected.classes.is_empty() {
            assert_eq!(
                table_classes(&report.html),
                case.expected.classes,
                "{path:?} '{}': table classes differ\noutput: {}",
                case.name,
                report.html
            );
        }
        for needle in &case.expected.contains {
            assert!(
                report.html.contains(needle.as_str()),
                "{path:?} '{}': output lacks {needle:?}\noutput: {}",
                case.name,
                report.html
            );
        }
    }
}
