//! Discounted free cash flow to equity.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use valuation_core::discount::{gordon_terminal_value, present_value, project_growing_flows};
use valuation_core::{Assumptions, CompanyFinancials, ModelStatus, ShareValuation};

/// Share of net income assumed to reach equity holders when no cash-flow
/// estimate is usable.
pub const NET_INCOME_PAYOUT_FALLBACK: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FcfeSource {
    /// Reported FCFE figure.
    Reported,
    /// Net income + depreciation - |capex|.
    CashFlowEstimate,
    /// 70% of net income.
    NetIncomePayout,
    /// Nothing usable; the base figure is zero.
    Unavailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FcfeResult {
    pub equity_value: f64,
    pub share_value: f64,
    pub terminal_value: f64,
    pub projected_cash_flows: f64,
    pub base_fcfe: f64,
    pub base_source: FcfeSource,
    pub status: ModelStatus,
}

impl ShareValuation for FcfeResult {
    fn model_name(&self) -> &'static str {
        "FCFE"
    }

    fn share_value(&self) -> f64 {
        self.share_value
    }

    fn status(&self) -> ModelStatus {
        self.status
    }
}

/// Resolve the starting FCFE figure, trying each source in order.
pub fn resolve_base_fcfe(financials: &CompanyFinancials) -> (f64, FcfeSource) {
    let reported = financials.fcfe();
    if reported > 0.0 {
        return (reported, FcfeSource::Reported);
    }

    let net_income = financials.net_income_ttm();
    let estimate = net_income + financials.depreciation() - financials.capex();
    if estimate > 0.0 {
        return (estimate, FcfeSource::CashFlowEstimate);
    }

    if net_income > 0.0 {
        return (net_income * NET_INCOME_PAYOUT_FALLBACK, FcfeSource::NetIncomePayout);
    }

    (0.0, FcfeSource::Unavailable)
}

pub fn compute_fcfe(financials: &CompanyFinancials, assumptions: &Assumptions) -> FcfeResult {
    let (base_fcfe, base_source) = resolve_base_fcfe(financials);
    let growth = assumptions.revenue_growth_rate();
    let terminal_growth = assumptions.terminal_growth_rate();
    let required_return = assumptions.required_return_rate();
    let years = assumptions.projection_years;

    if base_source == FcfeSource::Unavailable {
        debug!(symbol = %financials.symbol, "no usable FCFE base figure, valuing from zero");
    }

    let projection = project_growing_flows(base_fcfe, growth, required_return, years);
    let Some(terminal_value) =
        gordon_terminal_value(projection.last_flow, terminal_growth, required_return)
    else {
        warn!(
            symbol = %financials.symbol,
            required_return = assumptions.required_return,
            terminal_growth = assumptions.terminal_growth,
            "Required return must be greater than terminal growth rate"
        );
        return FcfeResult {
            equity_value: 0.0,
            share_value: 0.0,
            terminal_value: 0.0,
            projected_cash_flows: 0.0,
            base_fcfe,
            base_source,
            status: ModelStatus::DiscountRateNotAboveGrowth,
        };
    };

    let equity_value = projection.present_value + present_value(terminal_value, required_return, years);

    let (share_value, status) = match financials.shares_outstanding() {
        Some(shares) => (equity_value / shares, ModelStatus::Valid),
        None => {
            warn!(
                symbol = %financials.symbol,
                "FCFE share value unavailable: no share count and no positive price to derive one"
            );
            (0.0, ModelStatus::SharesUnavailable)
        }
    };

    debug!(
        symbol = %financials.symbol,
        base_fcfe,
        ?base_source,
        projected_cash_flows = projection.present_value,
        terminal_value,
        equity_value,
        share_value,
        "FCFE calculated"
    );

    FcfeResult {
        equity_value,
        share_value,
        terminal_value,
        projected_cash_flows: projection.present_value,
        base_fcfe,
        base_source,
        status,
    }
}
