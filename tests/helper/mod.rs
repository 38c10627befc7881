//! Shared test utilities

#![allow(dead_code)]

mod collaborators;

pub use collaborators::{FailingVulnLookup, RecordingVulnLookup, TestUrlBuilder, record};
