//! Deep links into the authority's public record-request form.
//!
//! Pages link readers to the external system where the underlying
//! documents can be ordered. The form accepts a fixed, whitelisted set of
//! query parameters; anything unset or empty is omitted from the URL.

use url::form_urlencoded;

/// The fixed record-request endpoint.
pub const RECORD_REQUEST_BASE: &str =
    "https://www.av.se/om-oss/diarium-och-allmanna-handlingar/bestall-handlingar/";

/// Whitelisted search parameters for the record-request form.
///
/// Field names are ours; the wire names are the form's own
/// (`SearchText`, `SelectedArendeProcess`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordSearch {
    pub search_text: Option<String>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub case_process: Option<String>,
    pub document_type: Option<String>,
    pub county: Option<String>,
    pub municipality: Option<String>,
    pub only_active: Option<String>,
    pub sort_order: Option<String>,
}

impl RecordSearch {
    /// A search for a keyword over one site year.
    #[must_use]
    pub fn keyword_in_year(keyword: &str, year: i32) -> Self {
        Self {
            search_text: Some(keyword.to_string()),
            from_date: Some(format!("{year}-01-01")),
            to_date: Some(format!("{year}-12-31")),
            ..Self::default()
        }
    }

    fn wire_pairs(&self) -> [(&'static str, Option<&str>); 9] {
        [
            ("SearchText", self.search_text.as_deref()),
            ("FromDate", self.from_date.as_deref()),
            ("ToDate", self.to_date.as_deref()),
            ("SelectedArendeProcess", self.case_process.as_deref()),
            ("SelectedHandlingType", self.document_type.as_deref()),
            ("SelectedCounty", self.county.as_deref()),
            ("SelectedMunicipality", self.municipality.as_deref()),
            ("OnlyActive", self.only_active.as_deref()),
            ("SelectedSortOrder", self.sort_order.as_deref()),
        ]
    }
}

/// Build the record-request URL for a search. Deterministic: parameters
/// appear in whitelist order, unset/empty values are dropped.
#[must_use]
pub fn record_request_url(search: &RecordSearch) -> String {
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    let mut has_parameters = false;

    for (name, value) in search.wire_pairs() {
        if let Some(value) = value
            && !value.is_empty()
        {
            serializer.append_pair(name, value);
            has_parameters = true;
        }
    }

    if has_parameters {
        format!("{RECORD_REQUEST_BASE}?{}", serializer.finish())
    } else {
        RECORD_REQUEST_BASE.to_string()
    }
}
