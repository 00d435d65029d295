//! Runs the literate Markdown suite under `testdata/`.

use std::io::Write;
use std::path::Path;

use zong_mdtest::runner::{init_tracing, run_dir, run_file};
use zong_mdtest::{TestStatus, extract_tests, run_test};

fn testdata() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

#[test]
fn the_whole_markdown_suite_passes() {
    init_tracing();
    let report = run_dir(&testdata()).expect("suite runs");
    assert!(report.total >= 15, "suite lost tests: {}", report.total);
    assert!(
        report.all_passed(),
        "failures:\n{}",
        report.failure_summary()
    );
}

#[test]
fn reports_serialize_to_json() {
    let report = run_dir(&testdata()).expect("suite runs");
    let json = report.to_json().expect("report serializes");
    assert!(json.contains("\"total\""));
    assert!(json.contains("\"passed\""));
}

#[test]
fn a_failing_assertion_reports_path_and_actual_value() {
    let source = "\
# Test: wrong operand

```zong-expr
1 + 2
```

```ast
(binary \"+\" 1 3)
```
";
    let cases = extract_tests(source).expect("extracts");
    let outcome = run_test(&cases[0]);
    let TestStatus::Failed { message } = &outcome.status else {
        panic!("expected a failure");
    };
    assert!(message.contains("item[3]"), "message: {message}");
    assert!(message.contains("actual:"), "message: {message}");
}

#[test]
fn run_file_attaches_the_file_name() {
    let mut file = tempfile::NamedTempFile::with_suffix(".md").expect("temp file");
    write!(
        file,
        "# Test: temp\n\n```zong-expr\n7\n```\n\n```ast\n7\n```\n"
    )
    .expect("write");
    let outcomes = run_file(file.path()).expect("runs");
    assert_eq!(outcomes.len(), 1);
    assert!(outcomes[0].passed());
    assert!(!outcomes[0].file.is_empty());
}

#[test]
fn malformed_files_are_rejected_with_context() {
    let mut file = tempfile::NamedTempFile::with_suffix(".md").expect("temp file");
    write!(file, "```zong-expr\n1\n```\n").expect("write");
    let err = run_file(file.path()).unwrap_err();
    assert!(
        format!("{err:#}").contains("outside any test"),
        "error: {err:#}"
    );
}
