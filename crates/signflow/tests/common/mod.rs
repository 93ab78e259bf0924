//! Shared test utilities for signflow integration tests.
//!
//! `TestHarness` wires every service over one in-memory database, a moka
//! cache, a manual clock and a recording process runner.

#![allow(dead_code)]

pub mod harness;
pub mod runner;

pub use harness::TestHarness;
pub use runner::RecordingRunner;
