//! Diagnostics for the compile pipeline.
//!
//! Every stage collects diagnostics into its own [`DiagnosticBag`] rather
//! than aborting on the first error. A stage whose bag is non-empty still
//! returns a best-effort result so downstream stages can surface additional
//! errors; drivers check `has_errors()` before going any further.

use serde::Serialize;

/// A single diagnostic message anchored at a byte offset.
///
/// Zong diagnostics carry no line/column information; the offset of the
/// offending token is the only location data the pipeline tracks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Byte offset of the token the diagnostic points at.
    pub start: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(start: u32, message: impl Into<String>) -> Self {
        Self {
            start,
            message: message.into(),
        }
    }
}

/// Append-only collection of diagnostics owned by one pipeline stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&mut self, start: u32, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::new(start, message));
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Aggregate another stage's bag into this one.
    pub fn absorb(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Drop diagnostics recorded after a speculative scan began.
    pub fn truncate(&mut self, len: usize) {
        self.diagnostics.truncate(len);
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Render the bag in wire format: `error: <message>`, one per line,
    /// joined by `\n`.
    #[must_use]
    pub fn render(&self) -> String {
        self.diagnostics
            .iter()
            .map(|d| format!("error: {}", d.message))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl<'a> IntoIterator for &'a DiagnosticBag {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}
