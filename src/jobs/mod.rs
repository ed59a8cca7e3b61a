//! Job listings and their moderation workflow.
//!
//! A job is created pending, becomes public only after an admin approves it,
//! and can be deleted by an admin at any time. Deletion is final.

mod handlers;
mod service;

pub use handlers::{approve_job, create_job, delete_job, list_jobs, list_pending_jobs};
pub use service::JobBoard;
