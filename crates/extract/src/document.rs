//! The view of a fetched registry page that extraction works against.
//!
//! Implementations live with whoever parses the markup; the extractors only
//! ever see headings, titled elements, statement fragments and graph elements.

/// Section headings on a company page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heading {
    Name,
    Register,
    /// Business purpose ("Gegenstand").
    Purpose,
    /// Relationship graph ("Netzwerk").
    Network,
    /// Annual accounts ("Jahresabschluss").
    AnnualAccounts,
}

impl Heading {
    /// Text the heading element contains on the page.
    pub fn label(&self) -> &'static str {
        match self {
            Heading::Name => "Name",
            Heading::Register => "Register",
            Heading::Purpose => "Gegenstand",
            Heading::Network => "Netzwerk",
            Heading::AnnualAccounts => "Jahresabschluss",
        }
    }
}

/// One statement tab: its header text and the text nodes below it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementFragment {
    pub header: String,
    pub tokens: Vec<String>,
}

impl StatementFragment {
    pub fn new<I, S>(header: impl Into<String>, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            header: header.into(),
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }
}

/// The annual accounts block of a company page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnnualAccounts {
    /// Legend text carrying the as-of date, e.g. `Stand: 31.12.2022`.
    pub caption: Option<String>,
    pub fragments: Vec<StatementFragment>,
}

/// Attributes of a graph node element as scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawNode {
    pub id: String,
    /// Display text, still carrying the renderer's leading glyph.
    pub raw_name: String,
    pub link: String,
}

/// Attributes of a graph link element as scraped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLink {
    pub source_id: String,
    pub target_id: String,
}

pub trait RegistryDocument {
    /// Value element that follows `heading`, as text.
    fn heading_value(&self, heading: Heading) -> Option<String>;

    fn has_heading(&self, heading: Heading) -> bool;

    /// Text of the first element whose `title` attribute equals `title`.
    fn titled_text(&self, title: &str) -> Option<String>;

    /// `None` when the page has no annual accounts heading.
    fn annual_accounts(&self) -> Option<AnnualAccounts>;

    fn graph_nodes(&self) -> Vec<RawNode>;

    fn graph_links(&self) -> Vec<RawLink>;

    /// Label drawn on the link between `source_id` and `target_id`.
    fn link_description(&self, source_id: &str, target_id: &str) -> Option<String>;
}
