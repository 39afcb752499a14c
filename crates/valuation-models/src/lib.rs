//! Intrinsic-value models: DCF (FCFF), FCFE and a dividend discount model,
//! plus the weighting step that turns them into a recommendation.

pub mod aggregator;
pub mod dcf;
pub mod ddm;
pub mod engine;
pub mod fcfe;

pub use aggregator::{
    aggregate, weighted_share_value, weighted_value_of_valid_models, Aggregation, Recommendation,
    RecommendationLabel,
};
pub use dcf::{compute_dcf, DcfResult};
pub use ddm::{compute_ddm, DdmResult};
pub use engine::{calculate_valuation, MarketDiffs, ValuationReport, ValuationSession};
pub use fcfe::{compute_fcfe, resolve_base_fcfe, FcfeResult, FcfeSource};
