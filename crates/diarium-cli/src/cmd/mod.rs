//! Command handlers: one module per statistics page, plus the artifact
//! tree builder and shell completions.

pub mod build;
pub mod completions;
pub mod county;
pub mod geography;
pub mod inspections;
pub mod keyword;
pub mod latest;
pub mod municipality;
pub mod overview;

use crate::output::{CliError, OutputMode, render_error};
use anyhow::Result;
use diarium_core::config::{self, SiteConfig};
use diarium_core::snapshot;
use rusqlite::Connection;
use std::path::PathBuf;

/// Shared invocation context: where the CLI runs and which configuration
/// overrides the user passed.
pub struct Context {
    pub project_root: PathBuf,
    pub source_dir: Option<PathBuf>,
    pub year: Option<i32>,
}

impl Context {
    /// Resolve the effective site configuration (flag > env > file).
    pub fn config(&self) -> Result<SiteConfig> {
        config::resolve_config(&self.project_root, self.source_dir.clone(), self.year)
    }

    /// Open the configured snapshot, rendering a structured error before
    /// failing when it is missing, corrupt, or mis-shaped.
    pub fn open_snapshot(&self, config: &SiteConfig, output: OutputMode) -> Result<Connection> {
        match snapshot::open_snapshot(&config.snapshot_path()) {
            Ok(conn) => Ok(conn),
            Err(err) => {
                render_error(output, &CliError::from(&err))?;
                Err(err.into())
            }
        }
    }
}
