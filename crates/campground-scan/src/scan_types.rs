use std::fmt;

/// Result of a single probe-and-classify pass against the target page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The "no sites" marker never showed up, so a site may be bookable
    Found,
    /// The "no sites" marker was shown
    NotFound,
    /// The probe could not reach a trustworthy reading of the page
    Failed,
}

impl CycleOutcome {
    /// Whether this outcome counts towards the consecutive-failure ceiling
    pub fn is_failure(self) -> bool {
        matches!(self, CycleOutcome::Failed)
    }
}

impl fmt::Display for CycleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CycleOutcome::Found => "SUCCESS_FOUND",
            CycleOutcome::NotFound => "SUCCESS_NOT_FOUND",
            CycleOutcome::Failed => "FAILURE",
        };
        f.write_str(label)
    }
}

/// In-memory state carried from one cycle to the next
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MonitorState {
    /// Length of the current run of back-to-back failed cycles
    pub consecutive_failures: u32,
}

impl MonitorState {
    /// Fold one cycle outcome into the failure counter and return the new count
    pub fn record(&mut self, outcome: CycleOutcome) -> u32 {
        if outcome.is_failure() {
            self.consecutive_failures += 1;
        } else {
            self.consecutive_failures = 0;
        }
        self.consecutive_failures
    }

    /// Whether the counter has reached the given ceiling
    pub fn ceiling_reached(&self, max_consecutive_failures: u32) -> bool {
        self.consecutive_failures >= max_consecutive_failures
    }
}

/// What happened in one iteration of the monitor loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleStep {
    /// The loop keeps running
    Continue {
        /// Outcome of the cycle
        outcome: CycleOutcome,
        /// Failure counter after the cycle
        consecutive_failures: u32,
    },
    /// The failure ceiling was reached during this cycle
    FatalStop {
        /// Failure counter that triggered the stop
        failures: u32,
    },
}

/// Why the monitor loop returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Sustained failure reached the consecutive-failure ceiling
    FatalStop {
        /// Number of back-to-back failed cycles
        failures: u32,
    },
    /// An external stop signal was observed between cycles
    Cancelled,
}

/// Custom error type for setting up scan components
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),
}
