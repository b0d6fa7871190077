//! Bounded-concurrency verification of many statements.

use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use tracing::debug;

use super::Verifier;
use crate::cache::CacheKey;
use crate::types::verdict::Verdict;

impl Verifier {
    /// Verify `(statement, context)` pairs, at most `max_concurrent` at a time.
    ///
    /// Pairs that normalize to the same cache key are verified once. The
    /// returned verdicts line up with `items`.
    pub async fn verify_batch<S, C>(&self, items: &[(S, C)], max_concurrent: usize) -> Vec<Verdict>
    where
        S: AsRef<str> + Sync,
        C: AsRef<str> + Sync,
    {
        let mut slots: HashMap<CacheKey, usize> = HashMap::new();
        let mut unique: Vec<(&str, &str)> = Vec::new();
        let positions: Vec<usize> = items
            .iter()
            .map(|(statement, context)| {
                let (statement, context) = (statement.as_ref(), context.as_ref());
                *slots
                    .entry(CacheKey::new(statement, context))
                    .or_insert_with(|| {
                        unique.push((statement, context));
                        unique.len() - 1
                    })
            })
            .collect();

        debug!(
            items = items.len(),
            unique = unique.len(),
            max_concurrent,
            "verifying batch"
        );

        let verdicts: Vec<Verdict> = stream::iter(unique)
            .map(|(statement, context)| self.verify(statement, context))
            .buffered(max_concurrent.max(1))
            .collect()
            .await;

        positions.into_iter().map(|i| verdicts[i].clone()).collect()
    }
}
