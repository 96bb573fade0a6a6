//! Extraction core for company registry pages.
//!
//! Everything in this crate is synchronous and free of I/O: it works on an
//! already parsed [`RegistryDocument`] or on plain search results.

pub mod currency;
pub mod document;
pub mod error;
pub mod network;
pub mod record;
pub mod resolver;
pub mod schema;
pub mod similarity;
pub mod statements;

pub use document::{
    AnnualAccounts, Heading, RawLink, RawNode, RegistryDocument, StatementFragment,
};
pub use error::{ExtractError, Result};
pub use network::{GraphRepair, NetworkReconstructor};
pub use record::RecordExtractor;
pub use resolver::{MATCH_THRESHOLD, Resolver};
pub use schema::{
    CandidateResult, EntityRecord, GeneralInfo, GraphEdge, GraphNode, Party, RecordBatch,
    Resolution, ResolvedEntity, SearchPage, Section, StatementRow,
};
pub use statements::{PairingRepair, StatementReconstructor};
