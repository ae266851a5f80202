//! `dia county <slug>` — one county's page: per-day series and the
//! municipality ranking inside it.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::query::{self, County, DayCount, DocumentFilter};
use diarium_core::slug::slugify;
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `dia county`.
#[derive(Args, Debug)]
pub struct CountyArgs {
    /// County slug from the geography listing (e.g. `vastra-gotaland`).
    pub slug: String,
}

/// County page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyPage {
    pub year: i32,
    pub county_id: String,
    pub county_name: String,
    pub slug: String,
    pub documents_per_day: Vec<DayCount>,
    pub municipalities: Vec<MunicipalityRanking>,
}

/// Municipality ranking row with the slug its page is published under.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityRanking {
    pub municipality_name: String,
    pub slug: String,
    pub document_count: u64,
}

/// Build the page for an already-resolved county.
pub fn county_page_for(
    conn: &Connection,
    config: &SiteConfig,
    county: &County,
) -> Result<CountyPage> {
    let documents_per_day = query::documents_per_day_dense(
        conn,
        config.year,
        &DocumentFilter::county(county.county_id.clone()),
    )?;

    let municipalities = query::documents_by_municipality(conn, &county.county_name)?
        .into_iter()
        .map(|row| MunicipalityRanking {
            slug: slugify(&row.municipality_name),
            municipality_name: row.municipality_name,
            document_count: row.document_count,
        })
        .collect();

    Ok(CountyPage {
        year: config.year,
        county_id: county.county_id.clone(),
        county_name: county.county_name.clone(),
        slug: slugify(&county.county_name),
        documents_per_day,
        municipalities,
    })
}

/// Resolve a county by slug and build its page. `None` when no county in
/// the snapshot matches the slug.
pub fn county_page(
    conn: &Connection,
    config: &SiteConfig,
    slug: &str,
) -> Result<Option<CountyPage>> {
    let counties = query::distinct_counties(conn)?;
    match query::find_county_by_slug(&counties, slug) {
        Some(county) => Ok(Some(county_page_for(conn, config, county)?)),
        None => Ok(None),
    }
}

/// Execute `dia county`.
pub fn run_county(args: &CountyArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;

    let Some(page) = county_page(&conn, &config, &args.slug)? else {
        render_error(
            output,
            &CliError::with_details(
                format!("no county matches slug '{}'", args.slug),
                "run `dia geography` to list valid slugs",
                "county_not_found",
            ),
        )?;
        anyhow::bail!("county not found");
    };

    render(output, &page, |page, w| render_county_human(page, w))
}

fn render_county_human(page: &CountyPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Arbetsmiljö {} {}", page.county_name, page.year)?;

    let dated: u64 = page.documents_per_day.iter().map(|d| d.value).sum();
    writeln!(w, "\nDocuments dated in {}: {}", page.year, dated)?;

    writeln!(w, "\nDocuments per municipality:")?;
    for municipality in &page.municipalities {
        writeln!(
            w,
            "  {}: {}",
            municipality.municipality_name, municipality.document_count
        )?;
    }
    Ok(())
}
