pub mod dedup;
pub mod diversity;
pub mod engine;
pub mod profile;
pub mod safety;
pub mod scoring;

pub use dedup::InteractionDedupCache;
pub use diversity::DiversifiedSelector;
pub use engine::{RankingEngine, RankingError};
pub use profile::{ProfileBuilder, ProfileSignals};
pub use safety::SafetyFilter;
pub use scoring::{ScoreComposer, ScoredCandidate};
