use tracing::debug;

use crate::schema::{CandidateResult, Resolution, ResolvedEntity, SearchPage};
use crate::similarity::token_set_ratio;

/// Minimum token-set ratio for a search hit to count as the input company.
pub const MATCH_THRESHOLD: u8 = 99;

/// Picks the registry page for a company name from a search response.
#[derive(Debug, Clone)]
pub struct Resolver {
    base_url: String,
}

impl Resolver {
    /// `base_url` is the registry root including its trailing slash.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// The URL that searches the registry for `name`.
    pub fn search_url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name)
    }

    pub fn resolve(&self, name: &str, page: &SearchPage) -> ResolvedEntity {
        ResolvedEntity {
            input_name: name.to_string(),
            resolution: self.resolve_page(name, page),
        }
    }

    fn resolve_page(&self, name: &str, page: &SearchPage) -> Resolution {
        if !page.is_result_list {
            debug!(name, "search jumped to a single record");
            return Resolution::UniqueMatch(self.search_url(name));
        }
        if page.protected_marker {
            debug!(name, "search hit a protected term");
            return Resolution::Ambiguous;
        }

        let hits: Vec<(Vec<&str>, &CandidateResult)> = page
            .candidates
            .iter()
            .filter(|c| !c.has_footnote)
            .map(|c| (split_heading(&c.display_text), c))
            .collect();

        let Some((first_parts, first)) = hits.first() else {
            return Resolution::NotFound;
        };

        match first_parts.len() {
            // name, register court, city: a person or branch entry, not a company name
            3 => Resolution::NotFound,
            2 => self.accept_if_similar(name, first_parts[0], first),
            _ => match hits.get(1) {
                Some((parts, second)) => match parts.first() {
                    Some(part) => self.accept_if_similar(name, part, second),
                    None => Resolution::NotFound,
                },
                None => Resolution::NotFound,
            },
        }
    }

    fn accept_if_similar(&self, name: &str, heading: &str, hit: &CandidateResult) -> Resolution {
        let score = token_set_ratio(name, heading);
        debug!(name, heading, score, "compared search hit");
        if score >= MATCH_THRESHOLD {
            Resolution::ResolvedMatch(self.join_link(&hit.target_link))
        } else {
            Resolution::NotFound
        }
    }

    fn join_link(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            return link.to_string();
        }
        let root = self.base_url.strip_suffix('/').unwrap_or(&self.base_url);
        if link.starts_with('/') {
            format!("{}{}", root, link)
        } else {
            format!("{}/{}", root, link)
        }
    }
}

/// Split a result heading into its comma-separated parts, ignoring layout whitespace.
fn split_heading(text: &str) -> Vec<&str> {
    text.split(',')
        .map(|part| part.trim())
        .collect()
}
