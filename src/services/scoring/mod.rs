//! Scoring layer: factor scorers plus the weighted score composer.
//!
//! The composer runs every factor scorer over a candidate, combines the
//! sub-scores with the configured weights, and hands the score-sorted batch
//! to the diversified selector.

pub mod factors;

pub use factors::{
    behavioral_affinity, geo_relevance, interest_match, popularity, temporal_relevance,
    FactorScore, NEUTRAL_GEO, NEUTRAL_INTEREST,
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::RankingConfig;
use crate::models::{Candidate, ScoreBreakdown, UserProfile};

/// A candidate with its composed score, ready for diversified selection.
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub candidate: Candidate,
    pub breakdown: ScoreBreakdown,
    pub match_reasons: Vec<String>,
}

pub struct ScoreComposer {
    config: RankingConfig,
}

impl ScoreComposer {
    pub fn new(config: RankingConfig) -> Self {
        Self {
            config,
        }
    }

    /// Score one candidate against a profile with all five factors.
    pub fn score(
        &self,
        candidate: &Candidate,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> (ScoreBreakdown, Vec<String>) {
        let interest = interest_match(candidate, profile);
        let geo = geo_relevance(candidate, profile, &self.config);
        let temporal = temporal_relevance(candidate, now);
        let pop = popularity(candidate);
        let behavioral = behavioral_affinity(candidate, profile);

        let weights = self.config.weights;
        let composed = interest.score * weights.interest
            + geo.score * weights.geo
            + temporal.score * weights.temporal
            + pop.score * weights.popularity
            + behavioral.score * weights.behavioral;

        let mut reasons = interest.reasons;
        reasons.extend(geo.reasons);
        reasons.extend(temporal.reasons);
        reasons.extend(pop.reasons);
        reasons.extend(behavioral.reasons);

        let breakdown = ScoreBreakdown {
            interest: interest.score,
            geo: geo.score,
            temporal: temporal.score,
            popularity: pop.score,
            behavioral: behavioral.score,
            composed,
            diversity_penalty: 1.0,
            final_score: composed,
        };

        debug!(
            candidate_id = %candidate.id,
            composed = composed,
            "Composed score"
        );

        (breakdown, reasons)
    }

    /// Anonymous fallback: popularity and recency only, with the two weights
    /// renormalized. Interest and behavioral scorers are not run at all.
    pub fn score_fallback(
        &self,
        candidate: &Candidate,
        now: DateTime<Utc>,
    ) -> (ScoreBreakdown, Vec<String>) {
        let temporal = temporal_relevance(candidate, now);
        let pop = popularity(candidate);

        let weights = self.config.weights;
        let total = weights.popularity + weights.temporal;
        let composed = if total > 0.0 {
            (pop.score * weights.popularity + temporal.score * weights.temporal) / total
        } else {
            pop.score
        };

        let breakdown = ScoreBreakdown {
            interest: 0.0,
            geo: 0.0,
            temporal: temporal.score,
            popularity: pop.score,
            behavioral: 0.0,
            composed,
            diversity_penalty: 1.0,
            final_score: composed,
        };

        (breakdown, Vec::new())
    }

    /// Score a batch and sort it by composed score, descending.
    ///
    /// With no profile the fallback path is used for every candidate.
    pub fn score_all(
        &self,
        candidates: Vec<Candidate>,
        profile: Option<&UserProfile>,
        now: DateTime<Utc>,
    ) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> = candidates
            .into_iter()
            .map(|candidate| {
                let (breakdown, match_reasons) = match profile {
                    Some(profile) => self.score(&candidate, profile, now),
                    None => self.score_fallback(&candidate, now),
                };
                ScoredCandidate {
                    candidate,
                    breakdown,
                    match_reasons,
                }
            })
            .collect();

        // Note: NaN scores are treated as less than any valid score
        scored.sort_by(|a, b| {
            b.breakdown
                .composed
                .partial_cmp(&a.breakdown.composed)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            scored_count = scored.len(),
            top_score = scored.first().map(|c| c.breakdown.composed),
            personalized = profile.is_some(),
            "Scoring complete"
        );

        scored
    }
}
