//! Ingestion boundary for loosely-typed candidate records.
//!
//! Upstream supplies heterogeneous records (locations, posts, events) with
//! optional and overloaded fields. Everything is normalized into [`Candidate`]
//! here; the scoring core never sees a raw record.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use super::{
    AuthorStatus, Candidate, CandidateKind, Coordinates, Engagement, Moderation,
};

/// A candidate record as supplied by the read path, before normalization.
///
/// Every field except `id` and `kind` is optional; absent engagement counts
/// become zero and a missing or unparseable timestamp becomes an unknown age,
/// which scores a neutral recency multiplier (no boost, no penalty).
#[derive(Debug, Clone, Deserialize)]
pub struct RawCandidate {
    pub id: String,
    pub kind: CandidateKind,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: u32,
    #[serde(default)]
    pub saves: u32,
    #[serde(default)]
    pub report_count: u32,
    #[serde(default)]
    pub author_status: AuthorStatus,
    #[serde(default)]
    pub text: Option<String>,
}

impl RawCandidate {
    /// Normalize into a [`Candidate`]. Timestamps that are missing or fail
    /// to parse come through as `None` rather than a fabricated instant.
    pub fn into_candidate(self) -> Candidate {
        let coordinates = match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates {
                latitude,
                longitude,
            }),
            _ => None,
        };

        let created_at: Option<DateTime<Utc>> = self
            .created_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Candidate {
            id: self.id,
            kind: self.kind,
            categories: self.categories,
            coordinates,
            created_at,
            author_id: self.author_id,
            engagement: Engagement {
                likes: self.likes,
                comments: self.comments,
                saves: self.saves,
            },
            moderation: Moderation {
                report_count: self.report_count,
                author_status: self.author_status,
            },
            text: self.text,
        }
    }
}

/// Convert a batch of JSON records into candidates.
///
/// Records that fail to deserialize are skipped with a warning rather than
/// failing the batch; the feed should degrade, not error.
pub fn ingest_json(records: Vec<Value>) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(records.len());
    for record in records {
        match serde_json::from_value::<RawCandidate>(record) {
            Ok(raw) => candidates.push(raw.into_candidate()),
            Err(e) => {
                warn!(error = %e, "Skipping malformed candidate record");
            }
        }
    }
    candidates
}
