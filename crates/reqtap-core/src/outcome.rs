//! Completion classification.
//!
//! Turns whatever is known at finish time (a live response status, a
//! handler error, neither) into the final status code, status class, and
//! duration reported by logs and metrics.

use std::time::Duration;

use crate::error::HandlerError;

/// Sentinel status used when the host response never started.
pub const UNSENT_STATUS: i32 = -1;

/// Final status and duration facts for one finished request.
///
/// `status_class` is always derived from `status_code`; the only
/// constructors are [`CompletionOutcome::classify`] and
/// [`CompletionOutcome::unsent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionOutcome {
    status_code: i32,
    status_class: i32,
    duration_millis: u64,
}

impl CompletionOutcome {
    /// Classify a finished request.
    ///
    /// In order: an error with an explicit status wins, any other error
    /// maps to 500, an established response status is used unchanged,
    /// and absent all of those the response counts as a 200.
    pub fn classify(
        existing: Option<u16>,
        error: Option<&HandlerError>,
        duration: Duration,
    ) -> Self {
        let status_code = match (existing, error) {
            (_, Some(err)) => i32::from(err.status_code().unwrap_or(500)),
            (Some(code), None) => i32::from(code),
            (None, None) => 200,
        };
        Self {
            status_code,
            status_class: status_code / 100,
            duration_millis: millis(duration),
        }
    }

    /// The host response never started: no status was ever established.
    pub fn unsent(duration: Duration) -> Self {
        Self {
            status_code: UNSENT_STATUS,
            status_class: UNSENT_STATUS,
            duration_millis: millis(duration),
        }
    }

    pub fn status_code(&self) -> i32 {
        self.status_code
    }

    pub fn status_class(&self) -> i32 {
        self.status_class
    }

    pub fn duration_millis(&self) -> u64 {
        self.duration_millis
    }

    /// Coarse bucket used in tags and metric names, e.g. `2xx`.
    pub fn status_group(&self) -> String {
        format!("{}xx", self.status_class)
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    const D: Duration = Duration::from_millis(5);

    #[test]
    fn existing_status_used_unchanged() {
        let out = CompletionOutcome::classify(Some(404), None, D);
        assert_eq!(out.status_code(), 404);
        assert_eq!(out.status_class(), 4);
        assert_eq!(out.status_group(), "4xx");
    }

    #[test]
    fn error_status_wins_over_existing() {
        let err = HandlerError::with_status(400, "bad input");
        let out = CompletionOutcome::classify(Some(200), Some(&err), D);
        assert_eq!(out.status_code(), 400);
        assert_eq!(out.status_class(), 4);
    }

    #[test]
    fn error_without_status_maps_to_500() {
        let err = HandlerError::unexpected("boom");
        let out = CompletionOutcome::classify(None, Some(&err), D);
        assert_eq!(out.status_code(), 500);
        assert_eq!(out.status_class(), 5);
    }

    #[test]
    fn no_status_no_error_defaults_to_200() {
        let out = CompletionOutcome::classify(None, None, D);
        assert_eq!(out.status_code(), 200);
        assert_eq!(out.status_class(), 2);
    }

    #[test]
    fn unsent_response_uses_sentinel() {
        let out = CompletionOutcome::unsent(D);
        assert_eq!(out.status_code(), UNSENT_STATUS);
        assert_eq!(out.status_class(), UNSENT_STATUS);
        assert_eq!(out.duration_millis(), 5);
    }
}
