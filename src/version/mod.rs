//! Versions tab construction
//!
//! This module turns the raw version records known for a unit path into the
//! grouped, sorted and formatted lists rendered on a package's Versions tab.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │ Repository  │────▶│   Grouper   │────▶│ ListBuilder │──▶ VersionsDetails
//! │ (records)   │     │  (series)   │     │ (sort, link)│
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                            ▼                   ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │   Semver    │◀────│  Formatter  │
//!                     │ (classify)  │     │  (display)  │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`semver`]: Version classification and ordering
//! - [`format`]: Display and canonical renderings
//! - [`stdlib`]: Go tag names of standard-library versions
//! - [`group`]: Bucketing by module lineage and major series
//! - [`list`]: Sorting, linking and vulnerability annotation
//! - [`details`]: Entry points tying the pieces together
//! - [`repository`], [`links`], [`vulns`]: External collaborator seams
//! - [`error`]: Error types
//! - [`types`]: Input and output records

pub mod details;
pub mod error;
pub mod format;
pub mod group;
pub mod links;
pub mod list;
pub mod repository;
pub mod semver;
pub mod stdlib;
pub mod types;
pub mod vulns;
