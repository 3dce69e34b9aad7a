use std::time::Duration;

use tokio::time::{sleep, timeout, Instant};
use tracing::{info, warn};

use crate::models::RawCandidate;
use crate::search::{SearchError, SearchProvider, SearchRequest};

/// Issues queries one at a time, never closer together than `min_interval`,
/// whichever provider serves them. A failed or timed-out query contributes
/// nothing; it never aborts the run.
pub struct QueryFanOut {
    min_interval: Duration,
    call_timeout: Duration,
    last_call: Option<Instant>,
    failures: usize,
}

impl QueryFanOut {
    pub fn new(min_interval: Duration, call_timeout: Duration) -> Self {
        Self {
            min_interval,
            call_timeout,
            last_call: None,
            failures: 0,
        }
    }

    /// Queries that failed or timed out so far
    pub fn failures(&self) -> usize {
        self.failures
    }

    pub async fn fetch(
        &mut self,
        provider: &dyn SearchProvider,
        request: &SearchRequest,
    ) -> Vec<RawCandidate> {
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                sleep(self.min_interval - elapsed).await;
            }
        }
        self.last_call = Some(Instant::now());

        let outcome = match timeout(self.call_timeout, provider.search(request)).await {
            Ok(result) => result,
            Err(_) => Err(SearchError::Timeout),
        };

        match outcome {
            Ok(results) => {
                info!(query = %request.query, count = results.len(), "Search returned");
                results
            }
            Err(e) => {
                self.failures += 1;
                warn!(query = %request.query, error = %e, "Search failed, skipping query");
                Vec::new()
            }
        }
    }

    /// Run every request in order and merge the results into one pool
    pub async fn fetch_all(
        &mut self,
        provider: &dyn SearchProvider,
        requests: &[SearchRequest],
    ) -> Vec<RawCandidate> {
        let mut pool = Vec::new();
        for request in requests {
            pool.extend(self.fetch(provider, request).await);
        }
        pool
    }
}
