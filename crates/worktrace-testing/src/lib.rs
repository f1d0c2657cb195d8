//! Testing infrastructure for worktrace integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TrackerWorld`: in-memory store + scripted clock + memory catalog
//!   wired into a `Tracker`
//! - `TestWorld`: isolated data dir + helpers to drive the built binary
//! - `assertions`: JSON-level assertions over CLI output
//! - `fixtures`: scripted session logs for seeding stores
//! - `ManualClock` / `MemoryCatalog`: standalone doubles for the runtime's
//!   clock and catalog seams

pub mod assertions;
pub mod catalog;
pub mod clock;
pub mod fixtures;
pub mod world;

pub use catalog::MemoryCatalog;
pub use clock::ManualClock;
pub use fixtures::EventScript;
pub use world::{CliResult, TestWorld, TrackerWorld};
