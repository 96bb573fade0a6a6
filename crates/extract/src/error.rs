use thiserror::Error;

/// Why an entity, a field or a row could not be extracted.
///
/// None of these abort a batch. Resolution errors skip the entity; the rest
/// are absorbed where they happen and turn into empty values or dropped rows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no registry record matches '{0}'")]
    NotFound(String),

    #[error("'{0}' is a protected term, search result is ambiguous")]
    AmbiguousMatch(String),

    #[error("fragment '{0}' is missing or malformed")]
    MalformedFragment(String),

    #[error("amount '{0}' is not a recognizable figure")]
    MalformedAmount(String),

    #[error("repair could not restore alignment: {0}")]
    StructuralRepairAmbiguity(String),
}

pub type Result<T> = std::result::Result<T, ExtractError>;
