use flightsearch_core::{FlightSearch, ItineraryQuery, ValidatedItinerary, Violation};
use serde::Serialize;
use std::io::{BufRead, Write};

use crate::error::CliError;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ViolationReport {
    pub code: &'static str,
    pub invariant: u8,
    pub message: String,
}

impl From<&Violation> for ViolationReport {
    fn from(violation: &Violation) -> Self {
        Self {
            code: violation.code(),
            invariant: violation.invariant(),
            message: violation.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Verdict {
    pub accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub itinerary: Option<ValidatedItinerary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ViolationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub accepted: usize,
    pub rejected: usize,
    pub malformed: usize,
}

/// Validate a single JSON-encoded itinerary.
pub fn evaluate_line(search: &mut FlightSearch, line: &str) -> Verdict {
    let query: ItineraryQuery = match serde_json::from_str(line) {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Skipping unreadable query: {}", e);
            return Verdict {
                accepted: false,
                itinerary: None,
                violations: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    match search.explain(&query) {
        Ok(()) => Verdict {
            accepted: true,
            itinerary: search.accepted().cloned(),
            violations: Vec::new(),
            error: None,
        },
        Err(violations) => Verdict {
            accepted: false,
            itinerary: None,
            violations: violations.iter().map(ViolationReport::from).collect(),
            error: None,
        },
    }
}

/// Read JSON itineraries line by line until EOF, writing one JSON verdict per non-blank line.
pub fn run<R: BufRead, W: Write>(
    search: &mut FlightSearch,
    input: R,
    mut output: W,
) -> Result<RunSummary, CliError> {
    let mut summary = RunSummary::default();

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let verdict = evaluate_line(search, &line);
        if verdict.accepted {
            summary.accepted += 1;
        } else if verdict.error.is_some() {
            summary.malformed += 1;
        } else {
            summary.rejected += 1;
        }

        serde_json::to_writer(&mut output, &verdict)?;
        writeln!(output)?;
    }

    output.flush()?;
    Ok(summary)
}
