use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::document::{Heading, RegistryDocument};
use crate::error::ExtractError;
use crate::network::{GraphRepair, NetworkReconstructor};
use crate::schema::{EntityRecord, GeneralInfo, Party, StatementRow};
use crate::statements::{PairingRepair, StatementReconstructor};

/// `title` attribute of the address link on a company page.
pub const ADDRESS_TITLE: &str = "Suche an dieser Adresse";

/// Icon glyph rendered in front of register entries.
const REGISTER_GLYPH: &str = "Ut";

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Runs every extractor over one parsed company page.
#[derive(Debug, Clone, Default)]
pub struct RecordExtractor {
    statements: StatementReconstructor,
    network: NetworkReconstructor,
}

impl RecordExtractor {
    pub fn new(pairing: PairingRepair, graph: GraphRepair) -> Self {
        Self {
            statements: StatementReconstructor::new(pairing),
            network: NetworkReconstructor::new(graph),
        }
    }

    pub fn extract<D: RegistryDocument>(&self, doc: &D, party: &Party) -> EntityRecord {
        let general_info = self.general_info(doc, party);
        let statement_rows = self.statement_rows(doc, party);
        let edges = self.network.reconstruct(
            &doc.graph_nodes(),
            &doc.graph_links(),
            |source, target| doc.link_description(source, target),
            &party.party_id,
        );

        debug!(
            party_id = %party.party_id,
            statements = statement_rows.len(),
            edges = edges.len(),
            "extracted record"
        );

        EntityRecord {
            general_info,
            statement_rows,
            edges,
        }
    }

    pub fn general_info<D: RegistryDocument>(&self, doc: &D, party: &Party) -> GeneralInfo {
        let pid = party.party_id.as_str();

        let name = or_missing(doc.heading_value(Heading::Name), Heading::Name.label(), pid)
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| party.name.clone());

        let (street, city) = or_missing(doc.titled_text(ADDRESS_TITLE), "address", pid)
            .map(|address| split_address(&address))
            .unwrap_or_default();

        let register = or_missing(doc.heading_value(Heading::Register), Heading::Register.label(), pid)
            .map(|r| clean_register(&r))
            .unwrap_or_default();

        let description =
            or_missing(doc.heading_value(Heading::Purpose), Heading::Purpose.label(), pid)
                .unwrap_or_default();

        GeneralInfo {
            party_id: party.party_id.clone(),
            name,
            street,
            city,
            register,
            description,
        }
    }

    pub fn statement_rows<D: RegistryDocument>(&self, doc: &D, party: &Party) -> Vec<StatementRow> {
        match doc.annual_accounts() {
            Some(accounts) => self.statements.reconstruct(&accounts, &party.party_id),
            None => {
                debug!(party_id = %party.party_id, "no annual accounts on page");
                Vec::new()
            }
        }
    }
}

/// Missing page fragments fall back to defaults; note which ones did.
fn or_missing(value: Option<String>, fragment: &str, party_id: &str) -> Option<String> {
    if value.is_none() {
        let reason = ExtractError::MalformedFragment(fragment.to_string());
        debug!(party_id, %reason, "using default value");
    }
    value
}

/// `Hauptstr. 1, 10115 Berlin` into street and city.
fn split_address(address: &str) -> (String, String) {
    match address.split_once(',') {
        Some((street, city)) => (street.trim().to_string(), city.trim().to_string()),
        None => (address.trim().to_string(), String::new()),
    }
}

fn clean_register(raw: &str) -> String {
    let trimmed = raw.trim_start();
    let without_glyph = trimmed.strip_prefix(REGISTER_GLYPH).unwrap_or(trimmed);
    WHITESPACE.replace_all(without_glyph, " ").trim().to_string()
}
