use batch::{read_parties, run_batch, write_tables};
use extract::{Party, Resolver};
use fetch::{FetchContext, FetchError, PageSource, RetryPolicy};
use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

const BASE: &str = "https://registry.example/";

fn company_page(name: &str, city: &str) -> String {
    format!(
        r#"<html><head><title>{name}, {city}</title></head><body>
  <h3>Name</h3><div><div class="content">{name}</div></div>
  <a title="Suche an dieser Adresse" href="/a">Marktplatz 2, {city}</a>
  <h3>Jahresabschluss</h3>
  <span class="legend3">Stand: 31.12.2023</span>
  <div class="tab-content">
    <div class="tab-pane"><h4>Aktiva</h4><div class="root"><span>2,5 Mio €</span><span>Kasse</span></div></div>
  </div>
</body></html>"#
    )
}

const NO_MATCH_PAGE: &str = r#"<html><head><title>Suche nach Omega</title></head>
<body><a class="title" href="/Omikron">Omikron Werke AG, Kiel</a></body></html>"#;

/// Pages shared by every worker; each worker still gets its own source.
#[derive(Clone)]
struct SharedPages {
    pages: Arc<HashMap<String, String>>,
    requests: Arc<AtomicUsize>,
}

impl PageSource for SharedPages {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::from_status(404, url))
    }
}

fn shared_pages() -> SharedPages {
    let mut pages = HashMap::new();
    for (name, city) in [
        ("Alpha GmbH", "Berlin"),
        ("Beta AG", "Hamburg"),
        ("Delta KG", "Bremen"),
        ("Epsilon SE", "Dresden"),
    ] {
        pages.insert(format!("{}{}", BASE, name), company_page(name, city));
    }
    pages.insert(format!("{}Omega", BASE), NO_MATCH_PAGE.to_string());
    SharedPages {
        pages: Arc::new(pages),
        requests: Arc::new(AtomicUsize::new(0)),
    }
}

fn parties() -> Vec<Party> {
    vec![
        Party::new("Alpha GmbH", "1"),
        Party::new("Beta AG", "2"),
        Party::new("Gamma GmbH", "3"),
        Party::new("Delta KG", "4"),
        Party::new("Omega", "5"),
        Party::new("Epsilon SE", "6"),
    ]
}

#[tokio::test]
async fn test_batch_merges_workers_in_input_order() {
    let source = shared_pages();
    let requests = source.requests.clone();

    let batch = run_batch(parties(), 3, || {
        Ok(FetchContext::new(source.clone(), Resolver::new(BASE))
            .with_retry(RetryPolicy::new(0, 1, 1)))
    })
    .await
    .unwrap();

    // "Gamma GmbH" has no page and "Omega" has no match; both are skipped
    let ids: Vec<_> = batch.general.iter().map(|g| g.party_id.as_str()).collect();
    assert_eq!(ids, vec!["1", "2", "4", "6"]);
    assert_eq!(batch.general[1].city, "Hamburg");

    let statements: Vec<_> = batch
        .statements
        .iter()
        .map(|r| (r.party_id.as_str(), r.amount.as_str(), r.as_of_date.as_str()))
        .collect();
    assert_eq!(
        statements,
        vec![
            ("1", "2500000", "31.12.2023"),
            ("2", "2500000", "31.12.2023"),
            ("4", "2500000", "31.12.2023"),
            ("6", "2500000", "31.12.2023"),
        ]
    );
    assert!(batch.network.is_empty());
    assert_eq!(requests.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn test_batch_with_single_worker_matches_parallel_run() {
    let source = shared_pages();
    let make = || -> anyhow::Result<FetchContext<SharedPages>> {
        Ok(FetchContext::new(source.clone(), Resolver::new(BASE))
            .with_retry(RetryPolicy::new(0, 1, 1)))
    };

    let sequential = run_batch(parties(), 1, make).await.unwrap();
    let parallel = run_batch(parties(), 4, make).await.unwrap();

    assert_eq!(sequential, parallel);
}

#[tokio::test]
async fn test_context_setup_failure_aborts_run() {
    let result = run_batch(parties(), 2, || -> anyhow::Result<FetchContext<SharedPages>> {
        anyhow::bail!("no session")
    })
    .await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_partial_setup_failure_starts_no_worker() {
    let source = shared_pages();
    let requests = source.requests.clone();
    let built = AtomicUsize::new(0);

    let result = run_batch(parties(), 3, || -> anyhow::Result<FetchContext<SharedPages>> {
        if built.fetch_add(1, Ordering::SeqCst) == 1 {
            anyhow::bail!("second session refused");
        }
        Ok(FetchContext::new(source.clone(), Resolver::new(BASE)))
    })
    .await;

    assert!(result.is_err());
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    assert_eq!(requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_input_to_tables() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("parties.csv");
    let mut file = std::fs::File::create(&input).unwrap();
    writeln!(file, "name,party_id").unwrap();
    writeln!(file, "Alpha GmbH,1").unwrap();
    writeln!(file, "Omega,5").unwrap();
    drop(file);

    let source = shared_pages();
    let batch = run_batch(read_parties(&input).unwrap(), 2, || {
        Ok(FetchContext::new(source.clone(), Resolver::new(BASE)))
    })
    .await
    .unwrap();

    let out = dir.path().join("out");
    write_tables(&batch, &out).unwrap();

    let general = std::fs::read_to_string(out.join("general_information.csv")).unwrap();
    assert_eq!(
        general.lines().collect::<Vec<_>>(),
        vec![
            "PartyId,Name,Street,City,Register,Description",
            "1,Alpha GmbH,Marktplatz 2,Berlin,,",
        ]
    );

    let statements = std::fs::read_to_string(out.join("statements.csv")).unwrap();
    assert_eq!(
        statements.lines().collect::<Vec<_>>(),
        vec![
            "PartyId,AsOfDate,Amount,Position,Section",
            "1,31.12.2023,2500000,Kasse,Aktiva",
        ]
    );

    let network = std::fs::read_to_string(out.join("networks.csv")).unwrap();
    assert_eq!(network.trim(), "PartyId,SourceName,TargetName,Description");
}
