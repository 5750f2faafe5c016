//! Diversified selector.
//!
//! Greedy single pass over the score-sorted candidates, penalizing repeats of
//! the same primary category or author and capping per-category counts. A
//! second relaxed pass fills the remainder when the caps would starve the
//! result, so the output length is always min(limit, survivors). Greedy and
//! non-backtracking on purpose: locally reasonable diversity at low latency
//! beats a globally optimal set here.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::config::RankingConfig;
use crate::models::RankedItem;
use crate::services::scoring::ScoredCandidate;

pub struct DiversifiedSelector {
    category_cap: usize,
    /// Penalty step per already-selected item sharing the primary category.
    category_penalty: f32,
    /// Penalty step per already-selected item sharing the author.
    author_penalty: f32,
    penalty_floor: f32,
    bootstrap_fraction: f32,
}

impl DiversifiedSelector {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            category_cap: config.category_cap,
            category_penalty: config.weights.diversity,
            author_penalty: config.author_penalty,
            penalty_floor: config.diversity_floor,
            bootstrap_fraction: config.bootstrap_fraction,
        }
    }

    /// Select up to `limit` items from the score-sorted batch.
    pub fn select(&self, scored: Vec<ScoredCandidate>, limit: usize) -> Vec<RankedItem> {
        if scored.is_empty() || limit == 0 {
            return Vec::new();
        }

        let bootstrap_threshold = (limit as f32 * self.bootstrap_fraction).ceil() as usize;

        let mut category_counts: HashMap<String, usize> = HashMap::new();
        let mut author_counts: HashMap<String, usize> = HashMap::new();
        let mut selected: Vec<RankedItem> = Vec::with_capacity(limit);
        let mut deferred: Vec<ScoredCandidate> = Vec::new();

        for entry in scored {
            if selected.len() >= limit {
                break;
            }

            let category_key = entry
                .candidate
                .primary_category()
                .map(|c| c.to_lowercase());
            let category_count = category_key
                .as_ref()
                .and_then(|k| category_counts.get(k))
                .copied()
                .unwrap_or(0);

            let under_cap = category_count < self.category_cap;
            let bootstrapping = selected.len() < bootstrap_threshold;
            if !under_cap && !bootstrapping {
                debug!(
                    candidate_id = %entry.candidate.id,
                    category = ?category_key,
                    "Deferred by category cap"
                );
                deferred.push(entry);
                continue;
            }

            self.admit(
                entry,
                &mut selected,
                &mut category_counts,
                &mut author_counts,
            );
        }

        // Relaxed pass: caps ignored so the result can still reach the limit
        // when the pool is highly homogeneous.
        if selected.len() < limit && !deferred.is_empty() {
            let missing = limit - selected.len();
            debug!(
                missing = missing,
                deferred = deferred.len(),
                "Relaxed fill pass engaged"
            );
            for entry in deferred {
                if selected.len() >= limit {
                    break;
                }
                self.admit(
                    entry,
                    &mut selected,
                    &mut category_counts,
                    &mut author_counts,
                );
            }
        }

        info!(
            final_count = selected.len(),
            limit = limit,
            "Diversified selection completed"
        );

        selected
    }

    fn admit(
        &self,
        mut entry: ScoredCandidate,
        selected: &mut Vec<RankedItem>,
        category_counts: &mut HashMap<String, usize>,
        author_counts: &mut HashMap<String, usize>,
    ) {
        let category_key = entry
            .candidate
            .primary_category()
            .map(|c| c.to_lowercase());
        let category_count = category_key
            .as_ref()
            .and_then(|k| category_counts.get(k))
            .copied()
            .unwrap_or(0);
        let author_count = entry
            .candidate
            .author_id
            .as_ref()
            .and_then(|a| author_counts.get(a))
            .copied()
            .unwrap_or(0);

        let penalty = (1.0
            - self.category_penalty * category_count as f32
            - self.author_penalty * author_count as f32)
            .max(self.penalty_floor);

        entry.breakdown.diversity_penalty = penalty;
        entry.breakdown.final_score = entry.breakdown.composed * penalty;

        if let Some(key) = category_key {
            *category_counts.entry(key).or_insert(0) += 1;
        }
        if let Some(author) = &entry.candidate.author_id {
            *author_counts.entry(author.clone()).or_insert(0) += 1;
        }

        selected.push(RankedItem {
            candidate: entry.candidate,
            breakdown: entry.breakdown,
            match_reasons: entry.match_reasons,
        });
    }
}
