//! Package version creation monitoring
//!
//! Queries the packaging CLI for the latest creation request and waits
//! until it succeeds, fails or the timeout runs out.

pub mod poller;
pub mod query;
pub mod schema;

pub use poller::{max_attempts, PollOutcome, PollReport, StatusPoller, SECONDS_BETWEEN_RUNS};
pub use query::{CliStatusQuery, QueryOutput, StatusQuery};
pub use schema::{CommandResponse, CreationStatus, JobErrorPayload, StatusErr};
