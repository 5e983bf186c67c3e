//! Tri-state outcome of a check and the rule that produces it.

use crate::logging::log_safe;
use crate::vocabulary::ApprovedTermSet;
use serde::Serialize;
use std::fmt;

/// Result of validating one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// At least one declared term is approved.
    Pass,
    /// No term declared, or none of the declared terms is approved.
    Fail,
    /// The record could not be retrieved or read.
    Indeterminate,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Pass => "pass",
            Verdict::Fail => "fail",
            Verdict::Indeterminate => "indeterminate",
        }
    }

    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compare extracted field values with the approved terms.
///
/// Matching is exact and case-sensitive; values arrive already trimmed.
pub fn decide(values: &[String], approved: &ApprovedTermSet) -> Verdict {
    if values.is_empty() {
        tracing::info!("no Access Rights element present");
        return Verdict::Fail;
    }

    match values.iter().find(|v| approved.contains(v)) {
        Some(hit) => {
            tracing::info!("match found: {}", log_safe(hit));
            Verdict::Pass
        }
        None => {
            tracing::info!("none of {} Access Rights value(s) is approved", values.len());
            Verdict::Fail
        }
    }
}
