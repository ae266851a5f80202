//! `dia latest` — the most recently ingested documents, exported as the
//! site's "latest" feed.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::query::{self, DocumentRow};
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{OutputMode, render};

/// Feed length `dia build` uses.
pub const DEFAULT_LIMIT: u32 = 20;

/// Arguments for `dia latest`.
#[derive(Args, Debug)]
pub struct LatestArgs {
    /// Maximum number of documents in the feed.
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    pub limit: u32,
}

/// Latest-documents feed payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestPage {
    pub documents: Vec<DocumentRow>,
}

pub fn latest_page(conn: &Connection, limit: u32) -> Result<LatestPage> {
    let documents = query::latest_documents(conn, limit)?;
    Ok(LatestPage { documents })
}

/// Execute `dia latest`.
pub fn run_latest(args: &LatestArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let page = latest_page(&conn, args.limit)?;
    render(output, &page, |page, w| render_latest_human(page, w))
}

fn render_latest_human(page: &LatestPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Latest documents ({})", page.documents.len())?;
    for document in &page.documents {
        writeln!(
            w,
            "  {}  {}  {}",
            document.document_date, document.document_id, document.case_name
        )?;
    }
    Ok(())
}
