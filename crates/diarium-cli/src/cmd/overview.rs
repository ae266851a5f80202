//! `dia overview` — the year's front page: totals, per-day series,
//! keyword shares, county ranking.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::query::{self, DayCount, DocumentFilter};
use diarium_core::slug::slugify;
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{OutputMode, render};

/// Arguments for `dia overview`.
#[derive(Args, Debug, Default)]
pub struct OverviewArgs {}

/// Front-page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewPage {
    pub year: i32,
    pub total_documents: u64,
    pub documents_per_day: Vec<DayCount>,
    pub keywords: Vec<KeywordShare>,
    pub counties: Vec<CountyRanking>,
}

/// One tracked keyword's share of all documents; `total_documents` is the
/// denominator the frontend pie charts use.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordShare {
    pub keyword: String,
    pub document_count: u64,
    pub total_documents: u64,
}

/// County ranking row with the slug its page is published under.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyRanking {
    pub county_name: String,
    pub slug: String,
    pub document_count: u64,
}

pub fn overview_page(conn: &Connection, config: &SiteConfig) -> Result<OverviewPage> {
    let total_documents = query::count_total_documents(conn)?;
    let documents_per_day =
        query::documents_per_day_dense(conn, config.year, &DocumentFilter::default())?;

    let keywords = query::keyword_match_counts(conn, &config.keywords)?
        .into_iter()
        .map(|matched| KeywordShare {
            keyword: matched.keyword,
            document_count: matched.document_count,
            total_documents,
        })
        .collect();

    let counties = query::documents_by_county(conn)?
        .into_iter()
        .map(|row| CountyRanking {
            slug: slugify(&row.county_name),
            county_name: row.county_name,
            document_count: row.document_count,
        })
        .collect();

    Ok(OverviewPage {
        year: config.year,
        total_documents,
        documents_per_day,
        keywords,
        counties,
    })
}

/// Execute `dia overview`.
pub fn run_overview(_args: &OverviewArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let page = overview_page(&conn, &config)?;
    render(output, &page, |page, w| render_overview_human(page, w))
}

fn render_overview_human(page: &OverviewPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Arbetsmiljö {}", page.year)?;
    writeln!(w, "\nTotal documents: {}", page.total_documents)?;

    writeln!(w, "\nKeyword shares:")?;
    for share in &page.keywords {
        writeln!(
            w,
            "  {}: {} of {}",
            share.keyword, share.document_count, share.total_documents
        )?;
    }

    writeln!(w, "\nDocuments per county:")?;
    for county in &page.counties {
        writeln!(w, "  {}: {}", county.county_name, county.document_count)?;
    }

    let dated: u64 = page.documents_per_day.iter().map(|d| d.value).sum();
    writeln!(
        w,
        "\nDay series: {} days, {} documents dated in {}",
        page.documents_per_day.len(),
        dated,
        page.year
    )?;
    Ok(())
}
