//! Non-fatal layout diagnostics.
//!
//! Warnings are recovered locally (clip, overflow, forced placement) and
//! never abort generation; they are recorded here so callers can inspect
//! them, and logged through the `log` facade as they occur.

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// An element could not fit a fresh area and was force-placed.
    DoesNotFitArea {
        kind: &'static str,
        required: f32,
        available: f32,
    },
    /// Content wider or taller than its box was clipped.
    ClippedContent { kind: &'static str },
    /// A rotated box still did not fit after the bounded number of
    /// constrained re-layout passes and was clipped.
    RotationRetriesExhausted { passes: usize },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::DoesNotFitArea {
                kind,
                required,
                available,
            } => write!(
                f,
                "{} with height {:.2} does not fit area height {:.2}; placed anyway",
                kind, required, available
            ),
            Diagnostic::ClippedContent { kind } => {
                write!(f, "{} content was clipped to its box", kind)
            }
            Diagnostic::RotationRetriesExhausted { passes } => write!(
                f,
                "rotated box still does not fit after {} constrained passes; clipped",
                passes
            ),
        }
    }
}

/// Collects diagnostics for one layout run.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    entries: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
        self.entries.push(diagnostic);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn count_does_not_fit(&self) -> usize {
        self.entries
            .iter()
            .filter(|d| matches!(d, Diagnostic::DoesNotFitArea { .. }))
            .count()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}
