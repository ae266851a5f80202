//! `dia municipality <county-slug> <municipality-slug>` — one
//! municipality's page.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::query::{self, County, DayCount, DocumentFilter, GeoFilter, Municipality};
use diarium_core::slug::slugify;
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{CliError, OutputMode, render, render_error};

/// Arguments for `dia municipality`.
#[derive(Args, Debug)]
pub struct MunicipalityArgs {
    /// County slug from the geography listing.
    pub county_slug: String,
    /// Municipality slug from the geography listing.
    pub municipality_slug: String,
}

/// Municipality page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityPage {
    pub year: i32,
    pub county_id: String,
    pub county_name: String,
    pub county_slug: String,
    pub municipality_id: String,
    pub municipality_name: String,
    pub municipality_slug: String,
    pub documents_per_day: Vec<DayCount>,
}

/// Build the page for an already-resolved county+municipality pair.
pub fn municipality_page_for(
    conn: &Connection,
    config: &SiteConfig,
    pair: &(County, Municipality),
) -> Result<MunicipalityPage> {
    let (county, municipality) = pair;
    let documents_per_day = query::documents_per_day_dense(
        conn,
        config.year,
        &DocumentFilter::municipality(municipality.municipality_id.clone()),
    )?;

    Ok(MunicipalityPage {
        year: config.year,
        county_id: county.county_id.clone(),
        county_name: county.county_name.clone(),
        county_slug: slugify(&county.county_name),
        municipality_id: municipality.municipality_id.clone(),
        municipality_name: municipality.municipality_name.clone(),
        municipality_slug: slugify(&municipality.municipality_name),
        documents_per_day,
    })
}

/// Resolve a pair by slugs and build its page. `None` when the snapshot
/// holds no matching county+municipality combination.
pub fn municipality_page(
    conn: &Connection,
    config: &SiteConfig,
    county_slug: &str,
    municipality_slug: &str,
) -> Result<Option<MunicipalityPage>> {
    let pairs = query::distinct_counties_and_municipalities(conn, &GeoFilter::default())?;
    match query::find_geography_by_slugs(&pairs, county_slug, municipality_slug) {
        Some(pair) => Ok(Some(municipality_page_for(conn, config, pair)?)),
        None => Ok(None),
    }
}

/// Execute `dia municipality`.
pub fn run_municipality(args: &MunicipalityArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;

    let Some(page) =
        municipality_page(&conn, &config, &args.county_slug, &args.municipality_slug)?
    else {
        render_error(
            output,
            &CliError::with_details(
                format!(
                    "no municipality matches '{}/{}'",
                    args.county_slug, args.municipality_slug
                ),
                "run `dia geography` to list valid slugs",
                "municipality_not_found",
            ),
        )?;
        anyhow::bail!("municipality not found");
    };

    render(output, &page, |page, w| render_municipality_human(page, w))
}

fn render_municipality_human(page: &MunicipalityPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(
        w,
        "Arbetsmiljö {} ({}) {}",
        page.municipality_name, page.county_name, page.year
    )?;

    let dated: u64 = page.documents_per_day.iter().map(|d| d.value).sum();
    writeln!(w, "\nDocuments dated in {}: {}", page.year, dated)?;
    Ok(())
}
