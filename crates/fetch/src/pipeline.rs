use extract::{EntityRecord, ExtractError, Party, Resolution};
use tracing::{debug, info};

use crate::context::FetchContext;
use crate::error::FetchError;
use crate::html;
use crate::source::PageSource;

/// What happened to one input company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityOutcome {
    Extracted(EntityRecord),
    /// The name did not resolve to a single registry page.
    Skipped(ExtractError),
}

/// Search, resolve, fetch and extract one company.
///
/// Only fetch failures are errors; everything the page does not contain
/// comes back as empty fields or tables.
pub async fn process_entity<S: PageSource>(
    ctx: &FetchContext<S>,
    party: &Party,
) -> Result<EntityOutcome, FetchError> {
    let search_url = ctx.resolver().search_url(&party.name);
    let search_body = ctx.fetch_page(&search_url).await?;

    let resolved = {
        let page = html::parse_search_page(&search_body);
        ctx.resolver().resolve(&party.name, &page)
    };

    let Some(url) = resolved.canonical_url().map(str::to_string) else {
        debug!(name = %party.name, resolution = ?resolved.resolution, "skipping entity");
        let reason = resolved
            .into_error()
            .unwrap_or_else(|| ExtractError::NotFound(party.name.clone()));
        return Ok(EntityOutcome::Skipped(reason));
    };

    let body = match resolved.resolution {
        // the search response already is the company page
        Resolution::UniqueMatch(_) => search_body,
        _ => ctx.fetch_page(&url).await?,
    };

    info!(
        name = %party.name,
        url = %url,
        "resolved registry page"
    );

    let record = html::extract_record(ctx.extractor(), &body, party);
    Ok(EntityOutcome::Extracted(record))
}
