//! Single-stage dividend discount model (Gordon growth).
//!
//! Reported next to the cash-flow models for comparison only; it does not
//! feed the weighted target price.

use serde::{Deserialize, Serialize};
use tracing::warn;
use valuation_core::discount::gordon_terminal_value;
use valuation_core::{Assumptions, CompanyFinancials, ModelStatus, ShareValuation};

/// Assumed share of EPS paid out as dividends.
pub const DIVIDEND_PAYOUT_RATIO: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DdmResult {
    pub dividend_per_share: f64,
    pub share_value: f64,
    pub status: ModelStatus,
}

impl ShareValuation for DdmResult {
    fn model_name(&self) -> &'static str {
        "DDM"
    }

    fn share_value(&self) -> f64 {
        self.share_value
    }

    fn status(&self) -> ModelStatus {
        self.status
    }
}

pub fn compute_ddm(financials: &CompanyFinancials, assumptions: &Assumptions) -> DdmResult {
    let dividend_per_share = financials.eps() * DIVIDEND_PAYOUT_RATIO;

    match gordon_terminal_value(
        dividend_per_share,
        assumptions.terminal_growth_rate(),
        assumptions.required_return_rate(),
    ) {
        Some(share_value) => DdmResult {
            dividend_per_share,
            share_value,
            status: ModelStatus::Valid,
        },
        None => {
            warn!(
                symbol = %financials.symbol,
                "DDM skipped: required return must be greater than terminal growth rate"
            );
            DdmResult {
                dividend_per_share,
                share_value: 0.0,
                status: ModelStatus::DiscountRateNotAboveGrowth,
            }
        }
    }
}
