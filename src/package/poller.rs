//! Polling loop for the latest package version creation request
//!
//! Runs the status query once per attempt, classifies the most recent record
//! and either stops on a terminal state or sleeps and tries again. Attempts
//! are strictly sequential; the only state carried between them is the
//! attempt counter and the previously observed status label.

use std::time::Duration;
use tracing::{debug, error, info, warn};

use super::query::StatusQuery;
use super::schema::{CommandResponse, CreationStatus, StatusErr};
use crate::progress::Progress;

/// Default delay between attempts (seconds)
pub const SECONDS_BETWEEN_RUNS: u64 = 30;

/// Label shown before the first response arrives
const INITIALISING: &str = "Initialising";

/// Label used when the record carries no `Status`
const UNKNOWN_STATUS: &str = "Unknown";

/// Number of attempts allowed for a timeout: `floor(timeout / interval)`
///
/// An interval below one second counts as one second.
pub fn max_attempts(timeout_secs: u64, interval_secs: u64) -> u64 {
    timeout_secs / interval_secs.max(1)
}

/// How a poll run ended
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// Job finished with `Status == "Success"`
    Success(CreationStatus),
    /// Job finished with `Status == "Error"`
    JobError(CreationStatus),
    /// Attempts exhausted while the job was still in progress
    TimedOut,
    /// The CLI answered with a non-zero status code
    CommandFailed { code: i64 },
    /// No stdout (stderr text), or the process could not be run
    ProcessIo(String),
    /// stdout was not a usable response
    ParseError(String),
}

impl PollOutcome {
    /// State name for logs
    pub fn as_str(&self) -> &'static str {
        match self {
            PollOutcome::Success(_) => "success",
            PollOutcome::JobError(_) => "error",
            PollOutcome::TimedOut => "timed_out",
            PollOutcome::CommandFailed { .. } => "command_failed",
            PollOutcome::ProcessIo(_) => "process_io",
            PollOutcome::ParseError(_) => "parse_error",
        }
    }

    /// Convert into the record returned to the caller
    pub fn into_status(self) -> CreationStatus {
        match self {
            PollOutcome::Success(status) | PollOutcome::JobError(status) => status,
            PollOutcome::TimedOut => CreationStatus::default(),
            PollOutcome::CommandFailed { code } => CreationStatus::from_err(StatusErr::Code(code)),
            PollOutcome::ProcessIo(text) | PollOutcome::ParseError(text) => {
                CreationStatus::from_err(StatusErr::Text(text))
            }
        }
    }
}

/// Result of a poll run
#[derive(Debug, Clone, PartialEq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    /// Number of status queries executed
    pub attempts: u64,
    /// Distinct in-progress labels, in the order they were logged
    pub transitions: Vec<String>,
}

/// Classification of a single attempt
enum Step {
    Done(PollOutcome),
    Pending(CreationStatus),
}

/// Polls a [`StatusQuery`] until the latest creation request is terminal
pub struct StatusPoller<'a> {
    query: &'a dyn StatusQuery,
    progress: &'a mut dyn Progress,
    interval: Duration,
}

impl<'a> StatusPoller<'a> {
    pub fn new(query: &'a dyn StatusQuery, progress: &'a mut dyn Progress) -> Self {
        Self {
            query,
            progress,
            interval: Duration::from_secs(SECONDS_BETWEEN_RUNS),
        }
    }

    /// Override the delay between attempts
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Poll until a terminal state or until `attempt > max_attempts`
    ///
    /// Never fails: every failure path is reported as a [`PollOutcome`].
    pub async fn poll(&mut self, max_attempts: u64) -> PollReport {
        let mut attempt: u64 = 1;
        let mut previous: Option<String> = None;
        let mut transitions = Vec::new();

        self.progress.start(INITIALISING);

        loop {
            let latest = match self.attempt().await {
                Step::Done(outcome) => {
                    return PollReport {
                        outcome,
                        attempts: attempt,
                        transitions,
                    };
                }
                Step::Pending(latest) => latest,
            };

            let label = latest
                .status
                .clone()
                .unwrap_or_else(|| UNKNOWN_STATUS.to_string());

            // the spinner is stopped here, so log lines get their own row
            if previous.as_deref() != Some(label.as_str()) {
                info!("{} - Id: {}", label, latest.display_id());
                transitions.push(label.clone());
            }

            if attempt > max_attempts {
                self.progress.stop(Some(&label));
                match latest.job_age() {
                    Some(age) => warn!(
                        "Gave up after {} attempts, {} still {} (created {})",
                        attempt,
                        latest.display_id(),
                        label,
                        age
                    ),
                    None => warn!(
                        "Gave up after {} attempts, {} still {}",
                        attempt,
                        latest.display_id(),
                        label
                    ),
                }
                return PollReport {
                    outcome: PollOutcome::TimedOut,
                    attempts: attempt,
                    transitions,
                };
            }

            debug!(
                "Attempt {}/{} pending, next check in {}s",
                attempt,
                max_attempts,
                self.interval.as_secs()
            );
            self.progress.start(&label);
            tokio::time::sleep(self.interval).await;
            attempt += 1;
            previous = Some(label);
        }
    }

    /// Run the query once and classify the response
    ///
    /// Clears the spinner before anything is logged.
    async fn attempt(&mut self) -> Step {
        let result = self.query.run().await;
        self.progress.stop(None);

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                warn!("{}: {:#}", self.query.describe(), e);
                return Step::Done(PollOutcome::ProcessIo(format!("{:#}", e)));
            }
        };

        if !output.has_stdout() {
            if output.exit_ok {
                warn!("{}", output.stderr.trim_end());
            } else {
                warn!(
                    "{} failed: {}",
                    self.query.describe(),
                    output.stderr.trim_end()
                );
            }
            return Step::Done(PollOutcome::ProcessIo(output.stderr));
        }

        let response: CommandResponse = match serde_json::from_str(&output.stdout) {
            Ok(response) => response,
            Err(e) => {
                error!("Unreadable response from {}: {}", self.query.describe(), e);
                return Step::Done(PollOutcome::ParseError(format!(
                    "Failed to parse status response: {}",
                    e
                )));
            }
        };

        if response.status != 0 {
            match (&response.name, &response.message) {
                (Some(name), Some(message)) => {
                    error!("{} ({}: {})", response.status, name, message)
                }
                (None, Some(message)) => error!("{} ({})", response.status, message),
                _ => error!("{}", response.status),
            }
            return Step::Done(PollOutcome::CommandFailed {
                code: response.status,
            });
        }

        let Some(latest) = response.latest() else {
            error!("No package version creation requests found");
            return Step::Done(PollOutcome::ParseError(
                "Status response contained no creation records".to_string(),
            ));
        };

        match latest.status.as_deref() {
            Some("Success") => {
                info!(
                    "Success - SubscriberPackageVersionId: {}",
                    latest
                        .subscriber_package_version_id
                        .as_deref()
                        .unwrap_or("unknown")
                );
                Step::Done(PollOutcome::Success(latest))
            }
            Some("Error") => {
                warn!("Error - Id: {}", latest.display_id());
                Step::Done(PollOutcome::JobError(latest))
            }
            _ => Step::Pending(latest),
        }
    }
}
