use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ExtractError;

/// One input row: the name we search for and the id we tag every output with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub party_id: String,
}

impl Party {
    pub fn new(name: impl Into<String>, party_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            party_id: party_id.into(),
        }
    }
}

/// A single hit from a search results page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateResult {
    pub display_text: String,
    pub target_link: String,
    /// Heading carried a superscript marker (the registry's data-quality flag).
    pub has_footnote: bool,
}

impl CandidateResult {
    pub fn new(display_text: impl Into<String>, target_link: impl Into<String>) -> Self {
        Self {
            display_text: display_text.into(),
            target_link: target_link.into(),
            has_footnote: false,
        }
    }

    pub fn with_footnote(mut self) -> Self {
        self.has_footnote = true;
        self
    }
}

/// Everything the resolver needs to know about a search response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// `false` when the registry jumped straight to a company page.
    pub is_result_list: bool,
    /// The searched name is a protected term.
    pub protected_marker: bool,
    pub candidates: Vec<CandidateResult>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The search URL itself is the company page.
    UniqueMatch(String),
    /// Picked from a result list by fuzzy comparison.
    ResolvedMatch(String),
    NotFound,
    Ambiguous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntity {
    pub input_name: String,
    pub resolution: Resolution,
}

impl ResolvedEntity {
    pub fn canonical_url(&self) -> Option<&str> {
        match &self.resolution {
            Resolution::UniqueMatch(url) | Resolution::ResolvedMatch(url) => Some(url),
            Resolution::NotFound | Resolution::Ambiguous => None,
        }
    }

    /// The skip reason for entities that did not resolve to a page.
    pub fn into_error(self) -> Option<ExtractError> {
        match self.resolution {
            Resolution::NotFound => Some(ExtractError::NotFound(self.input_name)),
            Resolution::Ambiguous => Some(ExtractError::AmbiguousMatch(self.input_name)),
            _ => None,
        }
    }
}

/// Statement section. Written to the tables under the registry's own labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    #[serde(rename = "Aktiva")]
    Assets,
    #[serde(rename = "Passiva")]
    Liabilities,
    #[serde(rename = "GuV")]
    IncomeExpense,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Assets, Section::Liabilities, Section::IncomeExpense];

    /// Map a statement tab header to its section.
    ///
    /// Headers other than `Aktiva` and `Ausgaben` land in `Liabilities`. The
    /// registry only ever renders three tabs, so this fall-through is what
    /// makes `Passiva` work, but it also swallows any new tab the site adds.
    pub fn from_header(header: &str) -> Self {
        match header.trim() {
            "Aktiva" => Section::Assets,
            "Ausgaben" => Section::IncomeExpense,
            _ => Section::Liabilities,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Section::Assets => "Aktiva",
            Section::Liabilities => "Passiva",
            Section::IncomeExpense => "GuV",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRow {
    #[serde(rename = "PartyId")]
    pub party_id: String,
    #[serde(rename = "AsOfDate")]
    pub as_of_date: String,
    /// Base-unit integer, digits only (with an optional leading minus).
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "Position")]
    pub position: String,
    #[serde(rename = "Section")]
    pub section: Section,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    pub node_id: String,
    pub display_name: String,
    pub external_link: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    #[serde(rename = "PartyId")]
    pub party_id: String,
    #[serde(skip)]
    pub source_id: String,
    #[serde(skip)]
    pub target_id: String,
    #[serde(rename = "SourceName")]
    pub source_name: String,
    #[serde(rename = "TargetName")]
    pub target_name: String,
    #[serde(rename = "Description")]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralInfo {
    #[serde(rename = "PartyId")]
    pub party_id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Street")]
    pub street: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Register")]
    pub register: String,
    #[serde(rename = "Description")]
    pub description: String,
}

/// Everything extracted for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    pub general_info: GeneralInfo,
    pub statement_rows: Vec<StatementRow>,
    pub edges: Vec<GraphEdge>,
}

/// The three output tables, accumulated across many entities.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordBatch {
    pub general: Vec<GeneralInfo>,
    pub statements: Vec<StatementRow>,
    pub network: Vec<GraphEdge>,
}

impl RecordBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: EntityRecord) {
        self.general.push(record.general_info);
        self.statements.extend(record.statement_rows);
        self.network.extend(record.edges);
    }

    pub fn merge(&mut self, other: RecordBatch) {
        self.general.extend(other.general);
        self.statements.extend(other.statements);
        self.network.extend(other.network);
    }

    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.statements.is_empty() && self.network.is_empty()
    }
}
