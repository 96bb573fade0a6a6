use anyhow::{Context, Result};
use extract::{Party, RecordBatch};
use fetch::{EntityOutcome, FetchContext, PageSource, process_entity};
use tokio::sync::oneshot;
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

/// Split `parties` into at most `workers` contiguous chunks of `ceil(n / workers)`.
pub fn partition(parties: Vec<Party>, workers: usize) -> Vec<Vec<Party>> {
    if parties.is_empty() {
        return Vec::new();
    }
    let chunk_size = parties.len().div_ceil(workers.max(1));
    parties.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorkerStats {
    pub extracted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Work through one chunk. Entities that fail to fetch are logged and skipped.
pub async fn run_worker<S: PageSource>(
    ctx: &FetchContext<S>,
    parties: &[Party],
) -> (RecordBatch, WorkerStats) {
    let mut batch = RecordBatch::new();
    let mut stats = WorkerStats::default();

    for party in parties {
        match process_entity(ctx, party).await {
            Ok(EntityOutcome::Extracted(record)) => {
                stats.extracted += 1;
                batch.push(record);
            }
            Ok(EntityOutcome::Skipped(reason)) => {
                stats.skipped += 1;
                info!(name = %party.name, party_id = %party.party_id, %reason, "entity skipped");
            }
            Err(e) => {
                stats.failed += 1;
                warn!(name = %party.name, party_id = %party.party_id, error = %e, "fetch failed, continuing");
            }
        }
    }

    (batch, stats)
}

/// Run every party through the pipeline on `workers` independent tasks.
///
/// Each task gets its own context from `make_context`, so no session or cache
/// is shared. All contexts are built before the first task starts. Results
/// come back once per task over a one-shot channel and are merged in chunk order.
pub async fn run_batch<S, F>(parties: Vec<Party>, workers: usize, make_context: F) -> Result<RecordBatch>
where
    S: PageSource + 'static,
    F: Fn() -> Result<FetchContext<S>>,
{
    let run_id = Uuid::new_v4();
    let chunks = partition(parties, workers);
    info!(%run_id, workers = chunks.len(), "starting batch");

    let contexts = (0..chunks.len())
        .map(|idx| make_context().with_context(|| format!("Failed to set up worker {}", idx)))
        .collect::<Result<Vec<_>>>()?;

    let mut receivers = Vec::with_capacity(chunks.len());
    for (idx, (chunk, ctx)) in chunks.into_iter().zip(contexts).enumerate() {
        let (tx, rx) = oneshot::channel();
        let span = info_span!("worker", worker = idx, %run_id);

        tokio::spawn(
            async move {
                info!(entities = chunk.len(), "worker started");
                let (batch, stats) = run_worker(&ctx, &chunk).await;
                info!(
                    extracted = stats.extracted,
                    skipped = stats.skipped,
                    failed = stats.failed,
                    cached_pages = ctx.cache().map(|c| c.len()).unwrap_or(0),
                    "worker finished"
                );
                let _ = tx.send(batch);
            }
            .instrument(span),
        );
        receivers.push(rx);
    }

    let mut merged = RecordBatch::new();
    for (idx, rx) in receivers.into_iter().enumerate() {
        let batch = rx
            .await
            .with_context(|| format!("Worker {} stopped without reporting results", idx))?;
        merged.merge(batch);
    }

    info!(
        %run_id,
        companies = merged.general.len(),
        statement_rows = merged.statements.len(),
        edges = merged.network.len(),
        "batch finished"
    );
    Ok(merged)
}
