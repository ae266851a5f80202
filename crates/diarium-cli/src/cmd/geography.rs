//! `dia geography` — the geography index: every county with its
//! municipalities and the slugs their pages are published under.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use diarium_core::config::SiteConfig;
use diarium_core::query::{self, GeoFilter};
use diarium_core::slug::slugify;
use rusqlite::Connection;
use serde::Serialize;

use crate::cmd::Context;
use crate::output::{OutputMode, render};

/// Arguments for `dia geography`.
#[derive(Args, Debug, Default)]
pub struct GeographyArgs {}

/// Geography index payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographyPage {
    pub year: i32,
    pub counties: Vec<CountyGeography>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyGeography {
    pub county_id: String,
    pub county_name: String,
    pub slug: String,
    pub municipalities: Vec<MunicipalityEntry>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityEntry {
    pub municipality_id: String,
    pub municipality_name: String,
    pub slug: String,
}

pub fn geography_page(conn: &Connection, config: &SiteConfig) -> Result<GeographyPage> {
    let mut counties: Vec<CountyGeography> = query::distinct_counties(conn)?
        .into_iter()
        .map(|county| CountyGeography {
            slug: slugify(&county.county_name),
            county_id: county.county_id,
            county_name: county.county_name,
            municipalities: Vec::new(),
        })
        .collect();

    let pairs = query::distinct_counties_and_municipalities(conn, &GeoFilter::default())?;
    for (county, municipality) in pairs {
        // Every pair's county is also in the distinct-counties listing;
        // both come from the same table.
        if let Some(entry) = counties
            .iter_mut()
            .find(|entry| entry.county_id == county.county_id)
        {
            entry.municipalities.push(MunicipalityEntry {
                slug: slugify(&municipality.municipality_name),
                municipality_id: municipality.municipality_id,
                municipality_name: municipality.municipality_name,
            });
        }
    }

    Ok(GeographyPage {
        year: config.year,
        counties,
    })
}

/// Execute `dia geography`.
pub fn run_geography(_args: &GeographyArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let page = geography_page(&conn, &config)?;
    render(output, &page, |page, w| render_geography_human(page, w))
}

fn render_geography_human(page: &GeographyPage, w: &mut dyn Write) -> std::io::Result<()> {
    writeln!(w, "Geografi {}", page.year)?;
    for county in &page.counties {
        writeln!(w, "\n{} ({})", county.county_name, county.slug)?;
        for municipality in &county.municipalities {
            writeln!(
                w,
                "  {} ({})",
                municipality.municipality_name, municipality.slug
            )?;
        }
    }
    Ok(())
}
