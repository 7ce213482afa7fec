//! oslab-report — Report rendering for finished lab sessions.

pub mod text;
