//! E2E tests for the geography pages: `dia geography`, `dia county`,
//! `dia municipality`, including the structured not-found behavior.

use assert_cmd::Command;
use diarium_core::snapshot::create_documents_table;
use rusqlite::{Connection, params};
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test harness helpers
// ---------------------------------------------------------------------------

fn dia_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dia"));
    cmd.current_dir(dir);
    cmd.env("DIARIUM_LOG", "error");
    cmd.env_remove("DIARIUM_SOURCE_DIR");
    cmd.env_remove("DIARIUM_YEAR");
    cmd.env_remove("FORMAT");
    cmd.args(["--source-dir", ".", "--year", "2024"]);
    cmd
}

fn seed_snapshot(dir: &Path) {
    let conn = Connection::open(dir.join("db.sqlite")).expect("create snapshot db");
    create_documents_table(&conn).expect("create documents table");

    let rows: [(&str, &str, (&str, &str), Option<(&str, &str)>); 4] = [
        ("a-1", "2024-01-01", ("01", "Stockholm"), Some(("0180", "Stockholm"))),
        ("b-1", "2024-01-02", ("01", "Stockholm"), Some(("0192", "Nynäshamn"))),
        ("c-1", "2024-01-02", ("01", "Stockholm"), Some(("0192", "Nynäshamn"))),
        (
            "d-1",
            "2024-01-05",
            ("14", "Västra Götaland"),
            Some(("1480", "Göteborg")),
        ),
    ];
    for (id, date, county, municipality) in rows {
        conn.execute(
            "INSERT INTO documents (documentId, documentDate, documentOrigin, documentType, \
             caseId, caseName, caseSubject, countyId, countyName, \
             municipalityId, municipalityName, created) \
             VALUES (?1, ?2, 'Myndighet', 'Inkommande handling', 'case', 'Ärende', '', \
                     ?3, ?4, ?5, ?6, '2024-06-01 00:00:00')",
            params![
                id,
                date,
                county.0,
                county.1,
                municipality.map(|m| m.0),
                municipality.map(|m| m.1)
            ],
        )
        .expect("insert document");
    }
}

// ---------------------------------------------------------------------------
// dia geography
// ---------------------------------------------------------------------------

#[test]
fn geography_lists_counties_with_their_municipalities_and_slugs() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path());

    let output = dia_cmd(dir.path())
        .args(["geography", "--json"])
        .output()
        .expect("geography should not crash");

    assert!(output.status.success());
    let page: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");

    let counties = page["counties"].as_array().expect("counties array");
    assert_eq!(counties.len(), 2);

    assert_eq!(counties[0]["countyName"], "Stockholm");
    assert_eq!(counties[0]["slug"], "stockholm");
    let stockholm_municipalities = counties[0]["municipalities"]
        .as_array()
        .expect("municipalities array");
    assert_eq!(stockholm_municipalities.len(), 2);
    assert_eq!(stockholm_municipalities[0]["municipalityName"], "Nynäshamn");
    assert_eq!(stockholm_municipalities[0]["slug"], "nynashamn");

    assert_eq!(counties[1]["slug"], "vastra-gotaland");
}

// ---------------------------------------------------------------------------
// dia county
// ---------------------------------------------------------------------------

#[test]
fn county_page_is_scoped_to_the_resolved_county() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path());

    let output = dia_cmd(dir.path())
        .args(["county", "stockholm", "--json"])
        .output()
        .expect("county should not crash");

    assert!(
        output.status.success(),
        "dia county failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let page: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");

    assert_eq!(page["countyId"], "01");
    assert_eq!(page["countyName"], "Stockholm");
    assert_eq!(page["slug"], "stockholm");

    let days = page["documentsPerDay"].as_array().expect("day series");
    assert_eq!(days.len(), 366);
    let total: u64 = days.iter().map(|d| d["value"].as_u64().unwrap_or(0)).sum();
    assert_eq!(total, 3, "only Stockholm documents are counted");

    let municipalities = page["municipalities"].as_array().expect("ranking");
    assert_eq!(municipalities[0]["municipalityName"], "Nynäshamn");
    assert_eq!(municipalities[0]["documentCount"], 2);
    assert_eq!(municipalities[1]["municipalityName"], "Stockholm");
}

#[test]
fn unknown_county_slug_is_a_structured_not_found() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path());

    dia_cmd(dir.path())
        .args(["county", "gotlan", "--json"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("county_not_found"))
        .stderr(predicates::str::contains("dia geography"));
}

// ---------------------------------------------------------------------------
// dia municipality
// ---------------------------------------------------------------------------

#[test]
fn municipality_page_resolves_both_slugs() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path());

    let output = dia_cmd(dir.path())
        .args(["municipality", "stockholm", "nynashamn", "--json"])
        .output()
        .expect("municipality should not crash");

    assert!(
        output.status.success(),
        "dia municipality failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let page: Value = serde_json::from_slice(&output.stdout).expect("valid JSON");

    assert_eq!(page["municipalityId"], "0192");
    assert_eq!(page["municipalityName"], "Nynäshamn");
    assert_eq!(page["countySlug"], "stockholm");
    assert_eq!(page["municipalitySlug"], "nynashamn");

    let days = page["documentsPerDay"].as_array().expect("day series");
    let total: u64 = days.iter().map(|d| d["value"].as_u64().unwrap_or(0)).sum();
    assert_eq!(total, 2);
}

#[test]
fn pair_must_exist_in_the_snapshot() {
    let dir = TempDir::new().unwrap();
    seed_snapshot(dir.path());

    // Both slugs exist, but not as a pair.
    dia_cmd(dir.path())
        .args(["municipality", "vastra-gotaland", "nynashamn", "--json"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("municipality_not_found"));
}
