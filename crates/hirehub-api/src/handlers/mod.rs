//! HTTP handlers for hirehub-api.

pub mod applicants;
pub mod matches;
pub mod positions;
