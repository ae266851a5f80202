//! `dia keyword <kw>` — the page for one tracked keyword: new cases per
//! day, company and municipality rankings, season distribution, and a
//! deep link into the external record-request form.
//!
//! This one parameterized page replaces what the site grew as separate
//! asbestos/accident/inspection page variants.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::deeplink::{self, RecordSearch};
use diarium_core::query::{
    self, CompanyDocumentCount, DayCount, DocumentFilter, MunicipalityKeywordCount, SeasonCount,
};
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{OutputMode, render};

/// Arguments for `dia keyword`.
#[derive(Args, Debug)]
pub struct KeywordArgs {
    /// Keyword matched against case names (e.g. `asbest`).
    pub keyword: String,
}

/// Keyword page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordPage {
    pub year: i32,
    pub keyword: String,
    /// New cases opened during the year (case-opening documents only).
    pub total_cases: u64,
    pub cases_per_day: Vec<DayCount>,
    pub companies: Vec<CompanyDocumentCount>,
    pub municipalities: Vec<MunicipalityKeywordCount>,
    pub seasons: Vec<SeasonCount>,
    /// Where readers can order the underlying documents.
    pub record_request_url: String,
}

pub fn keyword_page(conn: &Connection, config: &SiteConfig, keyword: &str) -> Result<KeywordPage> {
    let sparse = query::cases_per_day(conn, keyword, &DocumentFilter::default())?;
    let total_cases = sparse.iter().map(|day| day.value).sum();
    let cases_per_day = query::zero_fill_year(config.year, &sparse);

    let companies = query::documents_by_company_keyword(conn, keyword)?;
    let municipalities = query::documents_by_municipality_keyword(conn, keyword)?;
    let seasons = query::cases_per_season(conn, keyword)?;
    let record_request_url =
        deeplink::record_request_url(&RecordSearch::keyword_in_year(keyword, config.year));

    Ok(KeywordPage {
        year: config.year,
        keyword: keyword.to_string(),
        total_cases,
        cases_per_day,
        companies,
        municipalities,
        seasons,
        record_request_url,
    })
}

/// Execute `dia keyword`.
pub fn run_keyword(args: &KeywordArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let page = keyword_page(&conn, &config, &args.keyword)?;
    render(output, &page, |page, w| render_keyword_human(page, w))
}

fn render_keyword_human(page: &KeywordPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "{} {}", page.keyword, page.year)?;
    writeln!(w, "\nNew cases: {}", page.total_cases)?;

    writeln!(w, "\nCases per season:")?;
    for season in &page.seasons {
        writeln!(w, "  {}: {}", season.season, season.count)?;
    }

    writeln!(w, "\nDocuments per company:")?;
    for company in &page.companies {
        writeln!(w, "  {}: {}", company.company_name, company.document_count)?;
    }

    writeln!(w, "\nDocuments per municipality:")?;
    for municipality in &page.municipalities {
        writeln!(
            w,
            "  {} ({}): {}",
            municipality.municipality_name, municipality.county_name, municipality.document_count
        )?;
    }

    writeln!(w, "\nOrder documents: {}", page.record_request_url)?;
    Ok(())
}
