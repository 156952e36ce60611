//! Service layer for the analytic computations.
//!
//! Each service is a pure function over validated observations: it borrows a
//! batch (or a filtered view of one), groups it by the configured dimensions,
//! and returns metrics plus any diagnostics it raised along the way. Services
//! never read files or mutate shared state; orchestration lives in
//! [`crate::pipeline`].

pub mod gaps;

pub mod opportunity;

pub mod penetration;

pub mod seasonality;

pub mod summary;

pub use gaps::{compute_gap_rates, GapMetric};
pub use opportunity::{rank_opportunities, OpportunityScore};
pub use penetration::{compute_diet_penetration, compute_manufacturer_shares, ShareMetric};
pub use seasonality::{compute_seasonality, PeakTroughRatio, SeasonalityMetric};
pub use summary::{summarize_market, DimensionShare, MarketSummary};
