//! Aggregation queries over the documents snapshot.
//!
//! A fixed catalogue of read-only aggregates: total counts, per-day
//! series, keyword match counts, geography rankings, inspection
//! categories, and season buckets. All functions take a shared
//! `&Connection`, return `anyhow::Result<T>` with typed structs (never
//! raw rows), and bind every caller-supplied value as a SQL parameter.
//!
//! Filtering uses explicit parameter objects ([`DocumentFilter`],
//! [`GeoFilter`]) with AND semantics rather than caller-composed SQL.

use crate::calendar;
use crate::season::Season;
use crate::slug::slugify;
use anyhow::{Context, Result};
use rusqlite::{Connection, params, params_from_iter};
use serde::Serialize;
use std::collections::HashMap;

/// Case names of inspection cases start with this exact prefix; the
/// category label is the trimmed remainder.
pub const INSPECTION_CATEGORY_PREFIX: &str = "Inspektion inom";

/// Document id suffix marking the first document of a case.
pub const CASE_OPENING_SUFFIX: &str = "-1";

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

/// One point of a per-day series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCount {
    pub date: String,
    pub value: u64,
}

/// Match count for one keyword against `caseName`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordCount {
    pub keyword: String,
    pub document_count: u64,
}

/// A county present in the snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct County {
    pub county_id: String,
    pub county_name: String,
}

/// A municipality present in the snapshot. Always belongs to a county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Municipality {
    pub municipality_id: String,
    pub municipality_name: String,
}

/// Ranking row: documents filed per county.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyDocumentCount {
    pub county_name: String,
    pub document_count: u64,
}

/// Ranking row: documents filed per municipality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityDocumentCount {
    pub municipality_name: String,
    pub document_count: u64,
}

/// Ranking row: keyword-matching documents per company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDocumentCount {
    pub company_name: String,
    pub document_count: u64,
}

/// Ranking row: keyword-matching documents per municipality, with the
/// owning county for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MunicipalityKeywordCount {
    pub municipality_name: String,
    pub county_name: String,
    pub document_count: u64,
}

/// Ranking row: documents per inspection category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: String,
    pub document_count: u64,
}

/// Count of keyword-matching documents in one season bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeasonCount {
    pub season: Season,
    pub count: u64,
}

/// A full document row, for the latest-documents feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRow {
    pub document_id: String,
    pub document_date: String,
    pub document_origin: String,
    pub document_type: String,
    pub case_id: String,
    pub case_name: String,
    pub case_subject: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub workplace_id: Option<String>,
    pub workplace_name: Option<String>,
    pub county_id: Option<String>,
    pub county_name: Option<String>,
    pub municipality_id: Option<String>,
    pub municipality_name: Option<String>,
    pub created: String,
}

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Geography restriction for document aggregates.
///
/// Both fields are optional; when both are set they are combined with AND
/// semantics (which, given the geography hierarchy, means the municipality
/// must lie in the county).
#[derive(Debug, Clone, Default)]
pub struct DocumentFilter {
    /// Restrict to documents filed in this county.
    pub county_id: Option<String>,
    /// Restrict to documents filed in this municipality.
    pub municipality_id: Option<String>,
}

impl DocumentFilter {
    /// Filter restricted to one county.
    #[must_use]
    pub fn county(county_id: impl Into<String>) -> Self {
        Self {
            county_id: Some(county_id.into()),
            municipality_id: None,
        }
    }

    /// Filter restricted to one municipality.
    #[must_use]
    pub fn municipality(municipality_id: impl Into<String>) -> Self {
        Self {
            county_id: None,
            municipality_id: Some(municipality_id.into()),
        }
    }

    fn push_conditions(
        &self,
        conditions: &mut Vec<String>,
        param_values: &mut Vec<Box<dyn rusqlite::types::ToSql>>,
    ) {
        if let Some(ref county_id) = self.county_id {
            param_values.push(Box::new(county_id.clone()));
            conditions.push(format!("countyId = ?{}", param_values.len()));
        }
        if let Some(ref municipality_id) = self.municipality_id {
            param_values.push(Box::new(municipality_id.clone()));
            conditions.push(format!("municipalityId = ?{}", param_values.len()));
        }
    }
}

/// Restriction for the distinct county+municipality listing.
#[derive(Debug, Clone, Default)]
pub struct GeoFilter {
    /// Restrict to the pair containing this municipality.
    pub municipality_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Scalar and per-day aggregates
// ---------------------------------------------------------------------------

/// Count all documents in the snapshot.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_total_documents(conn: &Connection) -> Result<u64> {
    let count: i64 = conn
        .query_row("SELECT COUNT(documentId) FROM documents", [], |row| {
            row.get(0)
        })
        .context("count total documents")?;
    Ok(u64::try_from(count).unwrap_or(0))
}

/// Documents per day, sparse: one entry per distinct `documentDate` with
/// at least one document, ascending by date.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_per_day(conn: &Connection, filter: &DocumentFilter) -> Result<Vec<DayCount>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    filter.push_conditions(&mut conditions, &mut param_values);

    grouped_day_counts(conn, &conditions, &param_values).context("documents per day")
}

/// Documents per day, dense: one entry for every calendar day of `year`,
/// missing days filled with 0. This is the charting contract; the date
/// axis never has holes.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_per_day_dense(
    conn: &Connection,
    year: i32,
    filter: &DocumentFilter,
) -> Result<Vec<DayCount>> {
    Ok(zero_fill_year(year, &documents_per_day(conn, filter)?))
}

/// New cases per day for a keyword, sparse: counts only case-opening
/// documents (`documentId` ending in `-1`) whose `caseName` contains the
/// keyword.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn cases_per_day(
    conn: &Connection,
    keyword: &str,
    filter: &DocumentFilter,
) -> Result<Vec<DayCount>> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    param_values.push(Box::new(contains_pattern(keyword)));
    conditions.push(format!("caseName LIKE ?{}", param_values.len()));
    param_values.push(Box::new(format!("%{CASE_OPENING_SUFFIX}")));
    conditions.push(format!("documentId LIKE ?{}", param_values.len()));
    filter.push_conditions(&mut conditions, &mut param_values);

    grouped_day_counts(conn, &conditions, &param_values)
        .with_context(|| format!("cases per day for '{keyword}'"))
}

/// Dense variant of [`cases_per_day`], zero-filled over `year`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn cases_per_day_dense(
    conn: &Connection,
    year: i32,
    keyword: &str,
    filter: &DocumentFilter,
) -> Result<Vec<DayCount>> {
    Ok(zero_fill_year(year, &cases_per_day(conn, keyword, filter)?))
}

/// Zero-fill a sparse per-day series over every calendar day of `year`.
/// Entries outside the year are dropped.
#[must_use]
pub fn zero_fill_year(year: i32, sparse: &[DayCount]) -> Vec<DayCount> {
    let by_date: HashMap<&str, u64> = sparse
        .iter()
        .map(|day| (day.date.as_str(), day.value))
        .collect();

    calendar::days_in_year(year)
        .into_iter()
        .map(|date| {
            let value = by_date.get(date.as_str()).copied().unwrap_or(0);
            DayCount { date, value }
        })
        .collect()
}

fn grouped_day_counts(
    conn: &Connection,
    conditions: &[String],
    param_values: &[Box<dyn rusqlite::types::ToSql>],
) -> Result<Vec<DayCount>> {
    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let sql = format!(
        "SELECT documentDate, COUNT(documentId) \
         FROM documents{where_clause} \
         GROUP BY documentDate ORDER BY documentDate"
    );

    let mut stmt = conn
        .prepare(&sql)
        .with_context(|| format!("prepare per-day query: {sql}"))?;

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(AsRef::as_ref).collect();

    let rows = stmt
        .query_map(params_from_iter(params_ref), |row| {
            let count: i64 = row.get(1)?;
            Ok(DayCount {
                date: row.get(0)?,
                value: u64::try_from(count).unwrap_or(0),
            })
        })
        .context("execute per-day query")?;

    let mut days = Vec::new();
    for row in rows {
        days.push(row.context("read per-day row")?);
    }
    Ok(days)
}

// ---------------------------------------------------------------------------
// Keyword aggregates
// ---------------------------------------------------------------------------

/// Count, for each keyword, the documents whose `caseName` contains it
/// (SQL `LIKE` semantics, ASCII-case-insensitive). One statement for the
/// whole set; keywords are independent, so a document may count toward
/// several. Result order matches input order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn keyword_match_counts(conn: &Connection, keywords: &[String]) -> Result<Vec<KeywordCount>> {
    if keywords.is_empty() {
        return Ok(Vec::new());
    }

    let columns: Vec<String> = (1..=keywords.len())
        .map(|n| format!("SUM(CASE WHEN caseName LIKE ?{n} THEN 1 ELSE 0 END)"))
        .collect();
    let sql = format!("SELECT {} FROM documents", columns.join(", "));

    let patterns: Vec<String> = keywords
        .iter()
        .map(|keyword| contains_pattern(keyword))
        .collect();

    let mut stmt = conn
        .prepare(&sql)
        .context("prepare keyword match query")?;

    let counts: Vec<u64> = stmt
        .query_row(params_from_iter(patterns.iter()), |row| {
            let mut counts = Vec::with_capacity(keywords.len());
            for index in 0..keywords.len() {
                // SUM over an empty table is NULL.
                let count: Option<i64> = row.get(index)?;
                counts.push(u64::try_from(count.unwrap_or(0)).unwrap_or(0));
            }
            Ok(counts)
        })
        .context("execute keyword match query")?;

    Ok(keywords
        .iter()
        .zip(counts)
        .map(|(keyword, document_count)| KeywordCount {
            keyword: keyword.clone(),
            document_count,
        })
        .collect())
}

/// Keyword-matching documents per season bucket. Every matching document
/// lands in exactly one bucket via its `documentDate` month; all four
/// buckets are present, zero-filled, in canonical order.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn cases_per_season(conn: &Connection, keyword: &str) -> Result<Vec<SeasonCount>> {
    let sql = "SELECT CAST(STRFTIME('%m', documentDate) AS INTEGER), COUNT(documentId) \
               FROM documents WHERE caseName LIKE ?1 \
               GROUP BY 1";

    let mut stmt = conn.prepare(sql).context("prepare season query")?;
    let rows = stmt
        .query_map(params![contains_pattern(keyword)], |row| {
            let month: Option<i64> = row.get(0)?;
            let count: i64 = row.get(1)?;
            Ok((month, u64::try_from(count).unwrap_or(0)))
        })
        .with_context(|| format!("execute season query for '{keyword}'"))?;

    let mut by_season = [0_u64; 4];
    for row in rows {
        let (month, count) = row.context("read season row")?;
        let season = month
            .and_then(|m| u32::try_from(m).ok())
            .and_then(Season::from_month);
        if let Some(season) = season {
            by_season[season.index()] += count;
        }
    }

    Ok(Season::ALL
        .into_iter()
        .map(|season| SeasonCount {
            season,
            count: by_season[season.index()],
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Geography listings
// ---------------------------------------------------------------------------

/// Distinct counties present in the data (non-null), ordered by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn distinct_counties(conn: &Connection) -> Result<Vec<County>> {
    let sql = "SELECT DISTINCT countyId, countyName FROM documents \
               WHERE countyId IS NOT NULL AND countyName IS NOT NULL \
               ORDER BY countyName";

    let mut stmt = conn.prepare(sql).context("prepare distinct counties")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(County {
                county_id: row.get(0)?,
                county_name: row.get(1)?,
            })
        })
        .context("execute distinct counties")?;

    let mut counties = Vec::new();
    for row in rows {
        counties.push(row.context("read county row")?);
    }
    Ok(counties)
}

/// Distinct county+municipality pairs (both non-null), ordered by county
/// name then municipality name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn distinct_counties_and_municipalities(
    conn: &Connection,
    filter: &GeoFilter,
) -> Result<Vec<(County, Municipality)>> {
    let mut conditions = vec![
        "countyId IS NOT NULL".to_string(),
        "countyName IS NOT NULL".to_string(),
        "municipalityId IS NOT NULL".to_string(),
        "municipalityName IS NOT NULL".to_string(),
    ];
    let mut param_values: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();

    if let Some(ref municipality_id) = filter.municipality_id {
        param_values.push(Box::new(municipality_id.clone()));
        conditions.push(format!("municipalityId = ?{}", param_values.len()));
    }

    let sql = format!(
        "SELECT DISTINCT countyId, countyName, municipalityId, municipalityName \
         FROM documents WHERE {} \
         ORDER BY countyName, municipalityName",
        conditions.join(" AND ")
    );

    let mut stmt = conn
        .prepare(&sql)
        .context("prepare distinct county+municipality query")?;

    let params_ref: Vec<&dyn rusqlite::types::ToSql> =
        param_values.iter().map(AsRef::as_ref).collect();

    let rows = stmt
        .query_map(params_from_iter(params_ref), |row| {
            Ok((
                County {
                    county_id: row.get(0)?,
                    county_name: row.get(1)?,
                },
                Municipality {
                    municipality_id: row.get(2)?,
                    municipality_name: row.get(3)?,
                },
            ))
        })
        .context("execute distinct county+municipality query")?;

    let mut pairs = Vec::new();
    for row in rows {
        pairs.push(row.context("read county+municipality row")?);
    }
    Ok(pairs)
}

/// Find a county in a distinct-counties listing by its URL slug.
#[must_use]
pub fn find_county_by_slug<'a>(counties: &'a [County], slug: &str) -> Option<&'a County> {
    counties
        .iter()
        .find(|county| slugify(&county.county_name) == slug)
}

/// Find a county+municipality pair in a distinct-pairs listing by slugs.
#[must_use]
pub fn find_geography_by_slugs<'a>(
    pairs: &'a [(County, Municipality)],
    county_slug: &str,
    municipality_slug: &str,
) -> Option<&'a (County, Municipality)> {
    pairs.iter().find(|(county, municipality)| {
        slugify(&county.county_name) == county_slug
            && slugify(&municipality.municipality_name) == municipality_slug
    })
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// Documents per county, descending by count (name ascending as the
/// tie-break), null county excluded.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_by_county(conn: &Connection) -> Result<Vec<CountyDocumentCount>> {
    let sql = "SELECT countyName, COUNT(documentId) AS documentCount \
               FROM documents WHERE countyName IS NOT NULL \
               GROUP BY countyName \
               ORDER BY documentCount DESC, countyName ASC";

    let mut stmt = conn.prepare(sql).context("prepare county ranking")?;
    let rows = stmt
        .query_map([], |row| {
            let count: i64 = row.get(1)?;
            Ok(CountyDocumentCount {
                county_name: row.get(0)?,
                document_count: u64::try_from(count).unwrap_or(0),
            })
        })
        .context("execute county ranking")?;

    let mut ranking = Vec::new();
    for row in rows {
        ranking.push(row.context("read county ranking row")?);
    }
    Ok(ranking)
}

/// Documents per municipality within the named county, descending.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_by_municipality(
    conn: &Connection,
    county_name: &str,
) -> Result<Vec<MunicipalityDocumentCount>> {
    let sql = "SELECT municipalityName, COUNT(documentId) AS documentCount \
               FROM documents \
               WHERE countyName = ?1 AND municipalityName IS NOT NULL \
               GROUP BY municipalityName \
               ORDER BY documentCount DESC, municipalityName ASC";

    let mut stmt = conn.prepare(sql).context("prepare municipality ranking")?;
    let rows = stmt
        .query_map(params![county_name], |row| {
            let count: i64 = row.get(1)?;
            Ok(MunicipalityDocumentCount {
                municipality_name: row.get(0)?,
                document_count: u64::try_from(count).unwrap_or(0),
            })
        })
        .with_context(|| format!("execute municipality ranking for '{county_name}'"))?;

    let mut ranking = Vec::new();
    for row in rows {
        ranking.push(row.context("read municipality ranking row")?);
    }
    Ok(ranking)
}

/// Keyword-matching documents per company, descending, null company
/// excluded.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_by_company_keyword(
    conn: &Connection,
    keyword: &str,
) -> Result<Vec<CompanyDocumentCount>> {
    let sql = "SELECT companyName, COUNT(documentId) AS documentCount \
               FROM documents \
               WHERE companyName IS NOT NULL AND caseName LIKE ?1 \
               GROUP BY companyName \
               ORDER BY documentCount DESC, companyName ASC";

    let mut stmt = conn.prepare(sql).context("prepare company ranking")?;
    let rows = stmt
        .query_map(params![contains_pattern(keyword)], |row| {
            let count: i64 = row.get(1)?;
            Ok(CompanyDocumentCount {
                company_name: row.get(0)?,
                document_count: u64::try_from(count).unwrap_or(0),
            })
        })
        .with_context(|| format!("execute company ranking for '{keyword}'"))?;

    let mut ranking = Vec::new();
    for row in rows {
        ranking.push(row.context("read company ranking row")?);
    }
    Ok(ranking)
}

/// Keyword-matching documents per municipality (with the owning county),
/// descending, null municipality excluded.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_by_municipality_keyword(
    conn: &Connection,
    keyword: &str,
) -> Result<Vec<MunicipalityKeywordCount>> {
    let sql = "SELECT municipalityName, countyName, COUNT(documentId) AS documentCount \
               FROM documents \
               WHERE municipalityName IS NOT NULL AND caseName LIKE ?1 \
               GROUP BY municipalityName, countyName \
               ORDER BY documentCount DESC, municipalityName ASC";

    let mut stmt = conn
        .prepare(sql)
        .context("prepare municipality keyword ranking")?;
    let rows = stmt
        .query_map(params![contains_pattern(keyword)], |row| {
            let count: i64 = row.get(2)?;
            Ok(MunicipalityKeywordCount {
                municipality_name: row.get(0)?,
                county_name: row.get(1)?,
                document_count: u64::try_from(count).unwrap_or(0),
            })
        })
        .with_context(|| format!("execute municipality keyword ranking for '{keyword}'"))?;

    let mut ranking = Vec::new();
    for row in rows {
        ranking.push(row.context("read municipality keyword row")?);
    }
    Ok(ranking)
}

/// Documents per inspection category, descending.
///
/// Restricted to case names starting with the exact (case-sensitive)
/// prefix `"Inspektion inom"`; the category label is the remainder with
/// surrounding whitespace trimmed. The prefix match deliberately avoids
/// `LIKE`, which is ASCII-case-insensitive in SQLite.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn documents_by_inspection_category(conn: &Connection) -> Result<Vec<CategoryCount>> {
    let sql = "SELECT TRIM(SUBSTR(caseName, LENGTH(?1) + 1)) AS category, \
                      COUNT(documentId) AS documentCount \
               FROM documents \
               WHERE SUBSTR(caseName, 1, LENGTH(?1)) = ?1 \
               GROUP BY category \
               ORDER BY documentCount DESC, category ASC";

    let mut stmt = conn.prepare(sql).context("prepare category ranking")?;
    let rows = stmt
        .query_map(params![INSPECTION_CATEGORY_PREFIX], |row| {
            let count: i64 = row.get(1)?;
            Ok(CategoryCount {
                category: row.get(0)?,
                document_count: u64::try_from(count).unwrap_or(0),
            })
        })
        .context("execute category ranking")?;

    let mut ranking = Vec::new();
    for row in rows {
        ranking.push(row.context("read category row")?);
    }
    Ok(ranking)
}

// ---------------------------------------------------------------------------
// Latest documents feed
// ---------------------------------------------------------------------------

/// The most recently ingested documents, newest `created` first with the
/// document id as a stable tie-break.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn latest_documents(conn: &Connection, limit: u32) -> Result<Vec<DocumentRow>> {
    let sql = "SELECT documentId, documentDate, documentOrigin, documentType, \
                      caseId, caseName, caseSubject, companyId, companyName, \
                      workplaceId, workplaceName, countyId, countyName, \
                      municipalityId, municipalityName, created \
               FROM documents \
               ORDER BY created DESC, documentId ASC \
               LIMIT ?1";

    let mut stmt = conn.prepare(sql).context("prepare latest documents")?;
    let rows = stmt
        .query_map(params![limit], |row| {
            Ok(DocumentRow {
                document_id: row.get(0)?,
                document_date: row.get(1)?,
                document_origin: row.get(2)?,
                document_type: row.get(3)?,
                case_id: row.get(4)?,
                case_name: row.get(5)?,
                case_subject: row.get(6)?,
                company_id: row.get(7)?,
                company_name: row.get(8)?,
                workplace_id: row.get(9)?,
                workplace_name: row.get(10)?,
                county_id: row.get(11)?,
                county_name: row.get(12)?,
                municipality_id: row.get(13)?,
                municipality_name: row.get(14)?,
                created: row.get(15)?,
            })
        })
        .context("execute latest documents")?;

    let mut documents = Vec::new();
    for row in rows {
        documents.push(row.context("read latest document row")?);
    }
    Ok(documents)
}

fn contains_pattern(keyword: &str) -> String {
    format!("%{keyword}%")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
