use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

use crate::currency::{self, ends_with_currency};
use crate::document::AnnualAccounts;
use crate::error::{ExtractError, Result};
use crate::schema::{Section, StatementRow};

/// Amount slot inserted where the registry left one out.
pub const PLACEHOLDER_AMOUNT: &str = "Keine Angabe";

/// Legend tokens trailing a statement tab: `Stand: ...` or `as of ...`.
const CAPTION_MARKER: &str = "Stand";
const CAPTION_PREFIX: &str = "as of";

static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{1,2}\.\d{1,2}\.\d{4}").expect("static regex"));

/// How to restore (amount, label) alignment in a token stream of odd length.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum PairingRepair {
    /// Leave the stream as scraped.
    None,
    /// Insert one placeholder amount before the first amount slot that holds
    /// a label. The registry drops at most one amount per tab.
    SingleGap { placeholder: String },
}

impl Default for PairingRepair {
    fn default() -> Self {
        PairingRepair::SingleGap {
            placeholder: PLACEHOLDER_AMOUNT.to_string(),
        }
    }
}

impl PairingRepair {
    /// Repair `tokens` in place. Errors when the stream is still odd afterwards.
    pub fn apply(&self, tokens: &mut Vec<String>) -> Result<()> {
        if tokens.len() % 2 == 0 {
            return Ok(());
        }

        if let PairingRepair::SingleGap { placeholder } = self {
            let gap = tokens
                .iter()
                .enumerate()
                .step_by(2)
                .find(|(_, token)| !ends_with_currency(token))
                .map(|(idx, _)| idx);

            if let Some(idx) = gap {
                tokens.insert(idx, placeholder.clone());
                return Ok(());
            }
        }

        Err(ExtractError::StructuralRepairAmbiguity(format!(
            "{} tokens with no amount gap",
            tokens.len()
        )))
    }
}

/// Drop a trailing "Stand ..." legend token.
pub fn trim_caption(tokens: &mut Vec<String>) {
    let is_caption = tokens
        .last()
        .is_some_and(|last| last.contains(CAPTION_MARKER) || last.trim_start().starts_with(CAPTION_PREFIX));
    if is_caption {
        tokens.pop();
    }
}

/// Reporting date from the accounts legend, e.g. `Stand: 31.12.2022`.
pub fn as_of_date(caption: &str) -> String {
    if let Some(date) = DATE.find(caption) {
        return date.as_str().to_string();
    }
    caption
        .split_whitespace()
        .nth(1)
        .unwrap_or_default()
        .to_string()
}

impl StatementRow {
    /// Build a row from a scraped (amount, label) pair.
    pub fn from_pair(
        party_id: &str,
        as_of_date: &str,
        amount: &str,
        label: &str,
        section: Section,
    ) -> Result<Self> {
        let amount = currency::normalize(&currency::strip_amount(amount))?;
        Ok(Self {
            party_id: party_id.to_string(),
            as_of_date: as_of_date.to_string(),
            amount,
            position: label.trim().to_string(),
            section,
        })
    }
}

/// Rebuilds balance sheet and income statement rows from flat text tokens.
#[derive(Debug, Clone, Default)]
pub struct StatementReconstructor {
    repair: PairingRepair,
}

impl StatementReconstructor {
    pub fn new(repair: PairingRepair) -> Self {
        Self { repair }
    }

    pub fn reconstruct(&self, accounts: &AnnualAccounts, party_id: &str) -> Vec<StatementRow> {
        let as_of = accounts.caption.as_deref().map(as_of_date).unwrap_or_default();

        let mut by_section: HashMap<Section, Vec<String>> = HashMap::new();
        for fragment in &accounts.fragments {
            let mut tokens = fragment.tokens.clone();
            trim_caption(&mut tokens);
            by_section
                .entry(Section::from_header(&fragment.header))
                .or_default()
                .extend(tokens);
        }

        Section::ALL
            .iter()
            .filter_map(|section| by_section.remove(section).map(|tokens| (*section, tokens)))
            .flat_map(|(section, tokens)| self.reconstruct_section(section, tokens, &as_of, party_id))
            .collect()
    }

    pub fn reconstruct_section(
        &self,
        section: Section,
        mut tokens: Vec<String>,
        as_of_date: &str,
        party_id: &str,
    ) -> Vec<StatementRow> {
        trim_caption(&mut tokens);

        if let Err(e) = self.repair.apply(&mut tokens) {
            debug!(%section, party_id, error = %e, "dropping unpaired trailing token");
        }

        tokens
            .chunks_exact(2)
            .filter_map(|pair| {
                match StatementRow::from_pair(party_id, as_of_date, &pair[0], &pair[1], section) {
                    Ok(row) => Some(row),
                    Err(e) => {
                        debug!(%section, party_id, position = %pair[1], error = %e, "skipping row");
                        None
                    }
                }
            })
            .collect()
    }
}
