//! Data models for accounts and job listings.

pub mod job;
pub mod user;

pub use job::*;
pub use user::*;
