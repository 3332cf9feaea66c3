//! Evaluation dashboard support
//!
//! Submits background evaluation jobs to the backend and polls them to a
//! terminal state within a bounded attempt budget.

pub mod poller;

pub use poller::{JobOutcome, JobPoller, PollUpdate};
