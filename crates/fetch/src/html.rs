//! `scraper`-backed adapter from registry markup to the extraction core.
//!
//! `scraper::Html` is not `Send`, so everything here is synchronous and the
//! parsed tree never outlives the call that built it.

use extract::{
    AnnualAccounts, CandidateResult, EntityRecord, Heading, Party, RawLink, RawNode,
    RecordExtractor, RegistryDocument, SearchPage, StatementFragment,
};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

/// Title prefix of a search results page.
const SEARCH_TITLE: &str = "Suche nach";

static TITLE: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static H3: Lazy<Selector> = Lazy::new(|| Selector::parse("h3").unwrap());
static H4: Lazy<Selector> = Lazy::new(|| Selector::parse("h4").unwrap());
static SUP: Lazy<Selector> = Lazy::new(|| Selector::parse("sup").unwrap());
static PROTECTED_MARKER: Lazy<Selector> = Lazy::new(|| Selector::parse("sup.title").unwrap());
static RESULT_HEADING: Lazy<Selector> = Lazy::new(|| Selector::parse("a.title").unwrap());
static CONTENT: Lazy<Selector> = Lazy::new(|| Selector::parse(".content").unwrap());
static LEGEND: Lazy<Selector> = Lazy::new(|| Selector::parse("span.legend3").unwrap());
static STATEMENT_ROOT: Lazy<Selector> = Lazy::new(|| Selector::parse("div.root").unwrap());
static TITLED: Lazy<Selector> = Lazy::new(|| Selector::parse("[title]").unwrap());
static GRAPH_NODE: Lazy<Selector> = Lazy::new(|| Selector::parse("a.node").unwrap());
static GRAPH_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("g.link").unwrap());
static GROUP: Lazy<Selector> = Lazy::new(|| Selector::parse("g").unwrap());

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Next sibling element with the given tag name.
fn next_sibling<'a>(element: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    element
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|sibling| sibling.value().name() == tag)
}

/// Attribute lookup that also finds namespaced SVG attributes like `xlink:href`.
fn attr_local<'a>(element: ElementRef<'a>, name: &str) -> Option<&'a str> {
    element
        .value()
        .attr(name)
        .or_else(|| element.value().attrs().find(|(key, _)| *key == name).map(|(_, v)| v))
}

/// Read what the resolver needs from a search response.
pub fn parse_search_page(body: &str) -> SearchPage {
    let html = Html::parse_document(body);

    let is_result_list = html
        .select(&TITLE)
        .next()
        .is_some_and(|title| text_of(title).contains(SEARCH_TITLE));

    let protected_marker = html.select(&PROTECTED_MARKER).next().is_some();

    let candidates = html
        .select(&RESULT_HEADING)
        .map(|heading| CandidateResult {
            display_text: text_of(heading).split_whitespace().collect::<Vec<_>>().join(" "),
            target_link: heading.value().attr("href").unwrap_or_default().to_string(),
            has_footnote: heading.select(&SUP).next().is_some(),
        })
        .collect();

    SearchPage {
        is_result_list,
        protected_marker,
        candidates,
    }
}

/// Parse a company page and run the extractors over it.
pub fn extract_record(extractor: &RecordExtractor, body: &str, party: &Party) -> EntityRecord {
    let doc = HtmlDocument::parse(body);
    extractor.extract(&doc, party)
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    fn heading(&self, heading: Heading) -> Option<ElementRef<'_>> {
        self.html
            .select(&H3)
            .find(|h3| text_of(*h3).contains(heading.label()))
    }
}

impl RegistryDocument for HtmlDocument {
    fn heading_value(&self, heading: Heading) -> Option<String> {
        let h3 = self.heading(heading)?;
        match heading {
            Heading::Name => {
                let block = next_sibling(h3, "div")?;
                block.select(&CONTENT).next().map(text_of)
            }
            Heading::Purpose => next_sibling(h3, "p").map(text_of),
            Heading::Register | Heading::Network | Heading::AnnualAccounts => {
                next_sibling(h3, "div").map(text_of)
            }
        }
    }

    fn has_heading(&self, heading: Heading) -> bool {
        self.heading(heading).is_some()
    }

    fn titled_text(&self, title: &str) -> Option<String> {
        self.html
            .select(&TITLED)
            .find(|el| el.value().attr("title") == Some(title))
            .map(text_of)
    }

    fn annual_accounts(&self) -> Option<AnnualAccounts> {
        let h3 = self.heading(Heading::AnnualAccounts)?;

        let caption = self.html.select(&LEGEND).next().map(text_of);

        let tabs = h3
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "div" && el.value().classes().any(|c| c == "tab-content"));

        let fragments = tabs
            .map(|tabs| {
                tabs.children()
                    .filter_map(ElementRef::wrap)
                    .filter_map(|pane| {
                        let root = pane.select(&STATEMENT_ROOT).next()?;
                        let header = pane
                            .select(&H4)
                            .next()
                            .map(|h4| text_of(h4).trim().to_string())
                            .unwrap_or_default();
                        let tokens = root
                            .text()
                            .filter(|t| !t.trim().is_empty())
                            .map(str::to_string)
                            .collect::<Vec<_>>();
                        Some(StatementFragment { header, tokens })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(AnnualAccounts { caption, fragments })
    }

    fn graph_nodes(&self) -> Vec<RawNode> {
        self.html
            .select(&GRAPH_NODE)
            .filter_map(|node| {
                Some(RawNode {
                    id: node.value().attr("data-id")?.to_string(),
                    raw_name: text_of(node),
                    link: attr_local(node, "href").unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    fn graph_links(&self) -> Vec<RawLink> {
        self.html
            .select(&GRAPH_LINK)
            .filter_map(|link| {
                Some(RawLink {
                    source_id: link.value().attr("data-source-id")?.to_string(),
                    target_id: link.value().attr("data-target-id")?.to_string(),
                })
            })
            .collect()
    }

    fn link_description(&self, source_id: &str, target_id: &str) -> Option<String> {
        self.html
            .select(&GROUP)
            .find(|g| {
                g.value().attr("data-source-id") == Some(source_id)
                    && g.value().attr("data-target-id") == Some(target_id)
            })
            .map(text_of)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_page_direct_hit() {
        let page = parse_search_page("<html><head><title>Acme GmbH, Berlin</title></head><body></body></html>");
        assert!(!page.is_result_list);
        assert!(page.candidates.is_empty());
    }

    #[test]
    fn test_search_page_results() {
        let body = r#"
        <html><head><title>Suche nach Acme</title></head><body>
          <a class="title" href="/Acme-GmbH-Berlin">Acme GmbH,
             Berlin</a>
          <a class="title" href="/Acme-AG">Acme AG, Köln<sup>1</sup></a>
        </body></html>"#;

        let page = parse_search_page(body);
        assert!(page.is_result_list);
        assert!(!page.protected_marker);
        assert_eq!(page.candidates.len(), 2);
        assert_eq!(page.candidates[0].display_text, "Acme GmbH, Berlin");
        assert_eq!(page.candidates[0].target_link, "/Acme-GmbH-Berlin");
        assert!(!page.candidates[0].has_footnote);
        assert!(page.candidates[1].has_footnote);
    }

    #[test]
    fn test_graph_node_links() {
        let doc = HtmlDocument::parse(
            r#"<html><body><svg>
              <a class="node" data-id="n1" xlink:href="/Acme">xAcme</a>
              <a class="node" data-id="n2" href="/Beta">xBeta</a>
              <a class="node">xNo id</a>
            </svg></body></html>"#,
        );

        let links: Vec<_> = doc
            .graph_nodes()
            .into_iter()
            .map(|n| (n.id, n.link))
            .collect();
        assert_eq!(
            links,
            vec![
                ("n1".to_string(), "/Acme".to_string()),
                ("n2".to_string(), "/Beta".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_page_protected_marker() {
        let body = r#"<html><head><title>Suche nach Bosch</title></head>
            <body><h1>Bosch<sup class="title">®</sup></h1></body></html>"#;
        assert!(parse_search_page(body).protected_marker);
    }
}
