//! diarium-core library.
//!
//! Read-only aggregation queries over a snapshot of the work-environment
//! authority's document register, plus the pure helpers the site builder
//! needs: URL slugs, calendar-day enumeration, season bucketing, and deep
//! links into the external record-request form.
//!
//! # Conventions
//!
//! - **Errors**: typed errors (`thiserror`) at the snapshot boundary,
//!   `anyhow::Result` with context for query plumbing.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`).
//! - **Storage**: the snapshot is immutable; every connection is opened
//!   read-only and never holds locks beyond SQLite's own reader handling.

pub mod calendar;
pub mod config;
pub mod deeplink;
pub mod error;
pub mod query;
pub mod season;
pub mod slug;
pub mod snapshot;
