//! Markdown test extraction.
//!
//! Parses fenced code blocks out of a Markdown file using line-oriented
//! regexes. Tests are delimited by headings whose text starts with
//! `Test: `; prose between fences is ignored.

use anyhow::{Context, bail};
use once_cell::sync::Lazy;
use regex::Regex;

/// Matches a heading of any level and captures its text.
static HEADING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^#{1,6}\s+(.*?)\s*$").unwrap());

/// Matches a fence line and captures its info string.
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^```\s*([A-Za-z0-9-]*)\s*$").unwrap());

/// How the input fence is compiled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// `zong-expr`: parsed as a single expression; trailing tokens are a
    /// syntax error.
    Expression,
    /// `zong-program`: parsed as a program.
    Program,
}

/// Which stage's output an assertion fence matches against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssertionKind {
    /// `ast`: the parser output, resolver skipped.
    Ast,
    /// `ast-sym`: the resolver output, with symbol metadata.
    AstSym,
    /// `types`: the type-table snapshot after resolution and checking.
    Types,
}

impl AssertionKind {
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            AssertionKind::Ast => "ast",
            AssertionKind::AstSym => "ast-sym",
            AssertionKind::Types => "types",
        }
    }
}

/// One assertion fence.
#[derive(Clone, Debug)]
pub struct Assertion {
    pub kind: AssertionKind,
    /// Fence body: a Sexy pattern, or expected error text.
    pub text: String,
}

/// One extracted test.
#[derive(Clone, Debug)]
pub struct TestCase {
    pub name: String,
    pub input_kind: InputKind,
    pub input: String,
    pub assertions: Vec<Assertion>,
}

/// Extract every test from a Markdown file.
///
/// Malformed layouts are errors: a fence outside a test, an unknown fence
/// info string, a test without exactly one input fence, or a test without
/// assertions.
pub fn extract_tests(source: &str) -> anyhow::Result<Vec<TestCase>> {
    let mut tests: Vec<TestCase> = Vec::new();
    let mut current: Option<PartialTest> = None;

    let mut lines = source.lines().enumerate();
    while let Some((line_no, line)) = lines.next() {
        if let Some(heading) = HEADING_RE.captures(line) {
            let text = heading.get(1).map_or("", |m| m.as_str());
            if let Some(name) = text.strip_prefix("Test: ") {
                if let Some(partial) = current.take() {
                    tests.push(partial.finish()?);
                }
                current = Some(PartialTest::new(name.trim().to_string()));
            }
            continue;
        }

        let Some(fence) = FENCE_RE.captures(line) else {
            continue;
        };
        let info = fence.get(1).map_or("", |m| m.as_str()).to_string();

        // Collect the fence body up to the closing line.
        let mut body = String::new();
        let mut closed = false;
        for (_, body_line) in lines.by_ref() {
            if body_line.trim_end() == "```" {
                closed = true;
                break;
            }
            body.push_str(body_line);
            body.push('\n');
        }
        if !closed {
            bail!("unterminated fence at line {}", line_no + 1);
        }

        let Some(partial) = current.as_mut() else {
            bail!(
                "fence '{info}' at line {} is outside any test",
                line_no + 1
            );
        };
        partial
            .add_fence(&info, body)
            .with_context(|| format!("in test '{}'", partial.name))?;
    }

    if let Some(partial) = current.take() {
        tests.push(partial.finish()?);
    }
    Ok(tests)
}

struct PartialTest {
    name: String,
    input: Option<(InputKind, String)>,
    assertions: Vec<Assertion>,
}

impl PartialTest {
    fn new(name: String) -> Self {
        Self {
            name,
            input: None,
            assertions: Vec::new(),
        }
    }

    fn add_fence(&mut self, info: &str, body: String) -> anyhow::Result<()> {
        let input_kind = match info {
            "zong-expr" => Some(InputKind::Expression),
            "zong-program" => Some(InputKind::Program),
            _ => None,
        };
        if let Some(kind) = input_kind {
            if self.input.is_some() {
                bail!("more than one input fence");
            }
            if !self.assertions.is_empty() {
                bail!("input fence must come before assertions");
            }
            self.input = Some((kind, body));
            return Ok(());
        }

        let kind = match info {
            "ast" => AssertionKind::Ast,
            "ast-sym" => AssertionKind::AstSym,
            "types" => AssertionKind::Types,
            other => bail!("unknown fence info string '{other}'"),
        };
        if self.input.is_none() {
            bail!("assertion fence '{info}' before the input fence");
        }
        self.assertions.push(Assertion { kind, text: body });
        Ok(())
    }

    fn finish(self) -> anyhow::Result<TestCase> {
        let Some((input_kind, input)) = self.input else {
            bail!("test '{}' has no input fence", self.name);
        };
        if self.assertions.is_empty() {
            bail!("test '{}' has no assertion fences", self.name);
        }
        Ok(TestCase {
            name: self.name,
            input_kind,
            input,
            assertions: self.assertions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_name_input_and_assertions() {
        let source = "\
# Test: addition precedence

Some prose.

```zong-expr
1 + 2 * 3
```

```ast
(binary \"+\" 1 (binary \"*\" 2 3))
```
";
        let tests = extract_tests(source).unwrap();
        assert_eq!(tests.len(), 1);
        assert_eq!(tests[0].name, "addition precedence");
        assert_eq!(tests[0].input_kind, InputKind::Expression);
        assert_eq!(tests[0].input.trim(), "1 + 2 * 3");
        assert_eq!(tests[0].assertions.len(), 1);
        assert_eq!(tests[0].assertions[0].kind, AssertionKind::Ast);
    }

    #[test]
    fn multiple_tests_split_on_headings() {
        let source = "\
## Test: one
```zong-expr
1
```
```ast
1
```
### Test: two
```zong-program
var x: I64;
```
```ast-sym
...
```
";
        let tests = extract_tests(source).unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[1].name, "two");
        assert_eq!(tests[1].input_kind, InputKind::Program);
    }

    #[test]
    fn fence_outside_a_test_is_an_error() {
        let source = "```zong-expr\n1\n```\n";
        let err = extract_tests(source).unwrap_err();
        assert!(err.to_string().contains("outside any test"));
    }

    #[test]
    fn unknown_info_string_is_an_error() {
        let source = "# Test: t\n```zong-expr\n1\n```\n```python\nprint()\n```\n";
        let err = extract_tests(source).unwrap_err();
        assert!(format!("{err:#}").contains("unknown fence info string 'python'"));
    }

    #[test]
    fn missing_input_fence_is_an_error() {
        let source = "# Test: t\n```ast\n1\n```\n";
        let err = extract_tests(source).unwrap_err();
        assert!(format!("{err:#}").contains("before the input fence"));
    }

    #[test]
    fn test_without_assertions_is_an_error() {
        let source = "# Test: t\n```zong-expr\n1\n```\n";
        let err = extract_tests(source).unwrap_err();
        assert!(err.to_string().contains("no assertion fences"));
    }
}
