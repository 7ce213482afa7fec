//! oslab-core — Session engine for the OS architecture lab.
//!
//! This crate defines the lab data model, the placement state machine,
//! the countdown timers, the scoring rubrics and the session
//! coordinator that presentation layers drive.

pub mod console;
pub mod error;
pub mod inputs;
pub mod model;
pub mod parser;
pub mod placement;
pub mod results;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod timer;
