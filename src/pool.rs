use anyhow::Result;
use tracing::{error, info};

use crate::models::{Query, ResultRecord};

/// Split queries into `workers` contiguous near-equal chunks.
///
/// The first `len % workers` chunks carry one extra query; chunks that
/// would be empty are dropped so no worker launches a browser for nothing.
pub fn split_chunks(queries: Vec<Query>, workers: usize) -> Vec<Vec<Query>> {
    let workers = workers.max(1);
    let base = queries.len() / workers;
    let remainder = queries.len() % workers;

    let mut chunks = Vec::with_capacity(workers);
    let mut rest = queries.into_iter();
    for index in 0..workers {
        let size = base + usize::from(index < remainder);
        if size == 0 {
            continue;
        }
        chunks.push(rest.by_ref().take(size).collect());
    }
    chunks
}

/// Fan the chunks out to blocking worker tasks and flatten the results.
///
/// Each worker owns its own browser session; there is no shared state
/// between them. A worker that fails outright (browser would not start,
/// or the task panicked) contributes nothing, and the rest still run.
pub async fn run_pool<F>(queries: Vec<Query>, workers: usize, worker_fn: F) -> Vec<ResultRecord>
where
    F: Fn(Vec<Query>) -> Result<Vec<ResultRecord>> + Clone + Send + Sync + 'static,
{
    let chunks = split_chunks(queries, workers);
    info!("Dispatching {} chunk(s) to worker tasks", chunks.len());

    let mut handles = Vec::with_capacity(chunks.len());
    for chunk in chunks {
        let worker_fn = worker_fn.clone();
        handles.push(tokio::task::spawn_blocking(move || worker_fn(chunk)));
    }

    let mut records = Vec::new();
    for (index, handle) in handles.into_iter().enumerate() {
        match handle.await {
            Ok(Ok(mut worker_records)) => records.append(&mut worker_records),
            Ok(Err(err)) => error!("Worker {} failed: {:#}", index, err),
            Err(err) => error!("Worker {} panicked: {}", index, err),
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn queries(n: usize) -> Vec<Query> {
        (0..n)
            .map(|i| Query {
                suburb: format!("Suburb {i}"),
                region: "Auckland".to_string(),
            })
            .collect()
    }

    fn record_for(query: &Query) -> ResultRecord {
        ResultRecord::skipped(query)
    }

    #[test]
    fn chunks_are_near_equal_and_cover_everything() {
        let chunks = split_chunks(queries(10), 3);
        let sizes: Vec<usize> = chunks.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![4, 3, 3]);

        let flattened: Vec<Query> = chunks.into_iter().flatten().collect();
        assert_eq!(flattened, queries(10));
    }

    #[test]
    fn more_workers_than_queries_drops_empty_chunks() {
        let chunks = split_chunks(queries(2), 5);
        assert_eq!(chunks.len(), 2);
        assert!(chunks.iter().all(|c| c.len() == 1));
    }

    #[test]
    fn zero_workers_behaves_like_one() {
        let chunks = split_chunks(queries(3), 0);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 3);
    }

    #[tokio::test]
    async fn merged_results_preserve_the_record_multiset() {
        let input = queries(7);
        let records = run_pool(input.clone(), 3, |chunk| {
            Ok(chunk.iter().map(record_for).collect())
        })
        .await;

        assert_eq!(records.len(), 7);
        let mut got: Vec<String> = records.into_iter().map(|r| r.suburb).collect();
        let mut want: Vec<String> = input.into_iter().map(|q| q.suburb).collect();
        got.sort();
        want.sort();
        assert_eq!(got, want);
    }

    #[tokio::test]
    async fn failed_worker_contributes_nothing_but_others_survive() {
        let records = run_pool(queries(4), 2, |chunk| {
            if chunk[0].suburb == "Suburb 0" {
                Err(anyhow!("browser would not start"))
            } else {
                Ok(chunk.iter().map(record_for).collect())
            }
        })
        .await;

        let suburbs: Vec<&str> = records.iter().map(|r| r.suburb.as_str()).collect();
        assert_eq!(suburbs, vec!["Suburb 2", "Suburb 3"]);
    }
}
