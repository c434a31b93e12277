//! Analytics Core - pure transformations over match records
//!
//! Nothing in this module performs I/O or holds state; every function can be
//! called repeatedly on the same inputs.
//!
//! # Architecture
//!
//! ```text
//! Vec<Match> ──► filter::apply (uses variations::parse_variations)
//!     ↓
//! filtered matches ──► overview (classify per match via outcome)
//!     │                 compute_overview / breakdown_by_key / time_series / histogram
//!     ↓
//! + detail records (enrichment::DetailCoordinator)
//!     ↓
//! timeline::segment_phases (viewpoint via outcome::resolve_viewpoint)
//!     ↓
//! PhaseBreakdown (seven phase series)
//! ```

pub mod filter;
pub mod format;
pub mod outcome;
pub mod overview;
pub mod timeline;
pub mod types;
pub mod variations;

pub use filter::{apply, bastion_key, facets, Facets, FilterSpec};
pub use outcome::{classify, resolve_viewpoint, Outcome, OutcomeKind};
pub use overview::{
    breakdown_by_key, compute_overview, histogram, time_series, BreakdownEntry, HistogramBucket, Overview,
    TimePoint,
};
pub use timeline::{segment_phases, Phase, PhaseBreakdown, PhaseSample, PhaseSeries, UnknownPhase};
pub use types::{load_matches_json, Match, MatchDetail, MatchSeed, MatchType, TimelineEvent, UserProfile};
pub use variations::{parse_variations, VariationCategories};
