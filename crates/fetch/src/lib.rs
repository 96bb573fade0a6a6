pub mod cache;
pub mod context;
pub mod error;
pub mod html;
pub mod pipeline;
pub mod retry;
pub mod source;

pub use cache::PageCache;
pub use context::FetchContext;
pub use error::FetchError;
pub use html::{HtmlDocument, extract_record, parse_search_page};
pub use pipeline::{EntityOutcome, process_entity};
pub use retry::RetryPolicy;
pub use source::{HttpPageSource, PageSource};
