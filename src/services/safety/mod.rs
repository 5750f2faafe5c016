//! Content safety filter.
//!
//! Runs once, before any scoring, so the factor scorers never see disallowed
//! content. Pure and order-preserving over the candidate sequence.

use crate::config::RankingConfig;
use crate::models::{AuthorStatus, Candidate};
use tracing::{debug, info};

/// Outcome of checking a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SafetyVerdict {
    Allow,
    /// Candidate is excluded; the variant names which rule fired.
    Reject(RejectionReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionReason {
    BlockedKeyword,
    OverReported,
    AuthorSuspended,
    AuthorBanned,
}

impl RejectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectionReason::BlockedKeyword => "blocked_keyword",
            RejectionReason::OverReported => "over_reported",
            RejectionReason::AuthorSuspended => "author_suspended",
            RejectionReason::AuthorBanned => "author_banned",
        }
    }
}

/// Counters from a batch filter run.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyStats {
    pub filtered: usize,
}

pub struct SafetyFilter {
    blocked_keywords: Vec<String>,
    report_threshold: u32,
}

impl SafetyFilter {
    pub fn new(config: &RankingConfig) -> Self {
        Self {
            blocked_keywords: config
                .blocked_keywords
                .iter()
                .map(|k| k.to_lowercase())
                .collect(),
            report_threshold: config.report_threshold,
        }
    }

    /// Check one candidate against every safety rule.
    pub fn check(&self, candidate: &Candidate) -> SafetyVerdict {
        match candidate.moderation.author_status {
            AuthorStatus::Suspended => {
                return SafetyVerdict::Reject(RejectionReason::AuthorSuspended)
            }
            AuthorStatus::Banned => return SafetyVerdict::Reject(RejectionReason::AuthorBanned),
            AuthorStatus::Active => {}
        }

        if candidate.moderation.report_count > self.report_threshold {
            return SafetyVerdict::Reject(RejectionReason::OverReported);
        }

        if let Some(text) = &candidate.text {
            let lowered = text.to_lowercase();
            if self
                .blocked_keywords
                .iter()
                .any(|keyword| lowered.contains(keyword))
            {
                return SafetyVerdict::Reject(RejectionReason::BlockedKeyword);
            }
        }

        SafetyVerdict::Allow
    }

    /// Filter a batch, preserving input order.
    pub fn filter(&self, candidates: Vec<Candidate>) -> (Vec<Candidate>, SafetyStats) {
        let input_count = candidates.len();
        let mut stats = SafetyStats::default();
        let mut allowed = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            match self.check(&candidate) {
                SafetyVerdict::Allow => allowed.push(candidate),
                SafetyVerdict::Reject(reason) => {
                    debug!(
                        candidate_id = %candidate.id,
                        kind = candidate.kind.as_str(),
                        author_status = candidate.moderation.author_status.as_str(),
                        reason = reason.as_str(),
                        "Candidate excluded by safety filter"
                    );
                    stats.filtered += 1;
                }
            }
        }

        info!(
            input_count = input_count,
            output_count = allowed.len(),
            filtered = stats.filtered,
            "Safety filter completed"
        );

        (allowed, stats)
    }
}
