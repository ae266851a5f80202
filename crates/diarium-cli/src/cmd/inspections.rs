//! `dia inspections` — inspection activity: category ranking plus new
//! inspection cases per day.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::query::{self, CategoryCount, DayCount, DocumentFilter};
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{OutputMode, render};

/// The keyword inspection cases are identified by.
pub const INSPECTION_KEYWORD: &str = "inspektion";

/// Arguments for `dia inspections`.
#[derive(Args, Debug, Default)]
pub struct InspectionsArgs {}

/// Inspections page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionsPage {
    pub year: i32,
    /// New inspection cases opened during the year.
    pub total_cases: u64,
    pub cases_per_day: Vec<DayCount>,
    pub categories: Vec<CategoryCount>,
}

pub fn inspections_page(conn: &Connection, config: &SiteConfig) -> Result<InspectionsPage> {
    let sparse = query::cases_per_day(conn, INSPECTION_KEYWORD, &DocumentFilter::default())?;
    let total_cases = sparse.iter().map(|day| day.value).sum();
    let cases_per_day = query::zero_fill_year(config.year, &sparse);
    let categories = query::documents_by_inspection_category(conn)?;

    Ok(InspectionsPage {
        year: config.year,
        total_cases,
        cases_per_day,
        categories,
    })
}

/// Execute `dia inspections`.
pub fn run_inspections(_args: &InspectionsArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let page = inspections_page(&conn, &config)?;
    render(output, &page, |page, w| render_inspections_human(page, w))
}

fn render_inspections_human(page: &InspectionsPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Arbetsmiljöinspektioner {}", page.year)?;
    writeln!(w, "\nNew inspection cases: {}", page.total_cases)?;

    writeln!(w, "\nDocuments per inspection category:")?;
    for category in &page.categories {
        writeln!(w, "  {}: {}", category.category, category.document_count)?;
    }
    Ok(())
}
