//! # stela-worker
//!
//! Out-of-band reconciliation for the model lifecycle: a cron-driven
//! sweep that retries deletion of leaked objects recorded in the orphan
//! queue. Both halves of the retry are idempotent, so a sweep run can
//! safely re-attempt anything a previous run left behind.

pub mod jobs;
pub mod scheduler;

pub use scheduler::SweepScheduler;
