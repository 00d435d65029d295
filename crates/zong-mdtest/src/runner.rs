//! Test execution.
//!
//! Each test owns its own parser arena, binder, and type table; nothing is
//! shared between cases, so callers are free to run independent files in
//! parallel.

use std::path::Path;
use std::sync::Once;

use anyhow::Context;
use tracing::{debug, info};
use walkdir::WalkDir;
use zong_binder::BinderState;
use zong_checker::CheckerState;
use zong_common::DiagnosticBag;
use zong_parser::ParserState;

use crate::extract::{AssertionKind, InputKind, TestCase, extract_tests};
use crate::render::{ast_to_value, resolved_ast_to_value, type_table_to_value};
use crate::report::{Report, TestOutcome, TestStatus};

static INIT_TRACING: Once = Once::new();

/// Install the env-filtered tracing subscriber once per process.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Run one extracted test case.
#[must_use]
pub fn run_test(case: &TestCase) -> TestOutcome {
    debug!(name = %case.name, "running test");
    let status = match run_assertions(case) {
        Ok(()) => TestStatus::Passed,
        Err(message) => TestStatus::Failed { message },
    };
    TestOutcome {
        file: String::new(),
        name: case.name.clone(),
        status,
    }
}

fn run_assertions(case: &TestCase) -> Result<(), String> {
    let mut parser = ParserState::new(case.input.as_str());
    let root = match case.input_kind {
        InputKind::Expression => parser.parse_expression_entry(),
        InputKind::Program => parser.parse_program(),
    };
    let parse_errors = parser.take_diagnostics();
    let arena = parser.into_arena();

    // The resolver and checker run lazily, at most once per test.
    let mut bound: Option<(BinderState, DiagnosticBag)> = None;
    let mut checked: Option<DiagnosticBag> = None;

    for (number, assertion) in case.assertions.iter().enumerate() {
        let number = number + 1;

        if matches!(assertion.kind, AssertionKind::AstSym | AssertionKind::Types)
            && bound.is_none()
        {
            let mut binder = BinderState::new();
            binder.bind(&arena, root);
            let errors = binder.take_diagnostics();
            bound = Some((binder, errors));
        }
        if assertion.kind == AssertionKind::Types && checked.is_none() {
            if let Some((binder, _)) = bound.as_mut() {
                let mut checker = CheckerState::new(&arena, binder);
                checker.check(root);
                checked = Some(checker.take_diagnostics());
            }
        }

        // Stage diagnostics aggregate everything up to the asserted stage.
        let mut stage_errors = parse_errors.clone();
        if assertion.kind != AssertionKind::Ast {
            if let Some((_, binder_errors)) = &bound {
                stage_errors.absorb(binder_errors.clone());
            }
        }
        if assertion.kind == AssertionKind::Types {
            if let Some(checker_errors) = &checked {
                stage_errors.absorb(checker_errors.clone());
            }
        }

        if stage_errors.has_errors() {
            check_error_text(number, assertion.kind, &assertion.text, &stage_errors)?;
            continue;
        }

        let actual = match (assertion.kind, &bound) {
            (AssertionKind::Ast, _) => ast_to_value(&arena, root),
            (AssertionKind::AstSym, Some((binder, _))) => {
                resolved_ast_to_value(&arena, binder, root)
            }
            (AssertionKind::Types, Some((binder, _))) => type_table_to_value(binder),
            // The binder runs above for every non-ast assertion.
            (_, None) => return Err(format!("assertion {number}: resolver did not run")),
        };

        let pattern = zong_sexy::parse(&assertion.text).map_err(|err| {
            format!(
                "assertion {number} ({}): bad pattern: {}",
                assertion.kind.text(),
                err.message
            )
        })?;
        zong_sexy::match_value(&pattern, &actual).map_err(|err| {
            format!(
                "assertion {number} ({}): {err}\n  actual: {}",
                assertion.kind.text(),
                zong_sexy::format(&actual)
            )
        })?;
    }
    Ok(())
}

/// When the asserted stage produced diagnostics, the fence carries the
/// expected error text instead of a pattern.
fn check_error_text(
    number: usize,
    kind: AssertionKind,
    expected: &str,
    errors: &DiagnosticBag,
) -> Result<(), String> {
    let actual = errors.render();
    if expected.trim() == actual {
        return Ok(());
    }
    Err(format!(
        "assertion {number} ({}): error text mismatch\n  expected: {}\n  actual:   {actual}",
        kind.text(),
        expected.trim()
    ))
}

/// Run every test in one Markdown file.
pub fn run_file(path: &Path) -> anyhow::Result<Vec<TestOutcome>> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let cases =
        extract_tests(&source).with_context(|| format!("malformed test file {}", path.display()))?;
    let file = path.display().to_string();
    Ok(cases
        .iter()
        .map(|case| {
            let mut outcome = run_test(case);
            outcome.file = file.clone();
            outcome
        })
        .collect())
}

/// Run every `.md` file under a directory and aggregate a report.
pub fn run_dir(dir: &Path) -> anyhow::Result<Report> {
    let mut outcomes = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }
        outcomes.extend(run_file(entry.path())?);
    }
    let report = Report::from_outcomes(outcomes);
    info!(
        total = report.total,
        passed = report.passed,
        failed = report.failed,
        "markdown test run finished"
    );
    Ok(report)
}
