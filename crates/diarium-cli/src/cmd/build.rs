//! `dia build` — write the complete artifact tree for the configured
//! year. Any query failure aborts the build; the snapshot is static and
//! local, so an error is a data defect, not something to retry.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use clap::Args;
use diarium_core::query::{self, GeoFilter};
use diarium_core::slug::slugify;
use serde::Serialize;

use crate::cmd::{Context, county, geography, inspections, keyword, latest, municipality, overview};
use crate::output::{OutputMode, render};

/// Arguments for `dia build`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Output directory for the artifact tree (defaults to the configured
    /// output_dir).
    #[arg(long, value_name = "DIR")]
    pub output: Option<PathBuf>,
}

/// Build result summary.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildSummary {
    pub output_dir: PathBuf,
    pub pages: usize,
}

/// Execute `dia build`.
pub fn run_build(args: &BuildArgs, output: OutputMode, ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let conn = ctx.open_snapshot(&config, output)?;
    let out_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.output_dir.clone());

    let mut pages = 0_usize;

    write_page(
        &out_dir.join("overview.json"),
        &overview::overview_page(&conn, &config)?,
        &mut pages,
    )?;
    write_page(
        &out_dir.join("geography.json"),
        &geography::geography_page(&conn, &config)?,
        &mut pages,
    )?;
    write_page(
        &out_dir.join("inspections.json"),
        &inspections::inspections_page(&conn, &config)?,
        &mut pages,
    )?;
    write_page(
        &out_dir.join("latest.json"),
        &latest::latest_page(&conn, latest::DEFAULT_LIMIT)?,
        &mut pages,
    )?;

    for tracked in &config.keywords {
        let page = keyword::keyword_page(&conn, &config, tracked)?;
        let path = out_dir
            .join("keywords")
            .join(format!("{}.json", slugify(tracked)));
        write_page(&path, &page, &mut pages)?;
    }

    for county in &query::distinct_counties(&conn)? {
        let page = county::county_page_for(&conn, &config, county)?;
        let path = out_dir.join("counties").join(format!("{}.json", page.slug));
        write_page(&path, &page, &mut pages)?;
    }

    let pairs = query::distinct_counties_and_municipalities(&conn, &GeoFilter::default())?;
    for pair in &pairs {
        let page = municipality::municipality_page_for(&conn, &config, pair)?;
        let path = out_dir
            .join("counties")
            .join(&page.county_slug)
            .join(format!("{}.json", page.municipality_slug));
        write_page(&path, &page, &mut pages)?;
    }

    tracing::info!(pages, output_dir = %out_dir.display(), "build complete");

    let summary = BuildSummary {
        output_dir: out_dir,
        pages,
    };
    render(output, &summary, |summary, w| {
        writeln!(
            w,
            "Wrote {} pages to {}",
            summary.pages,
            summary.output_dir.display()
        )
    })
}

fn write_page<T: Serialize>(path: &Path, page: &T, pages: &mut usize) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create artifact directory {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("create artifact {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, page)
        .with_context(|| format!("serialize artifact {}", path.display()))?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), "wrote artifact");
    *pages += 1;
    Ok(())
}
