//! Discounted cash flow to the firm.
//!
//! EBITDA after tax stands in for free cash flow to the firm. This is a
//! modeling approximation: capex and working capital are not deducted.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use valuation_core::discount::{gordon_terminal_value, present_value, project_growing_flows};
use valuation_core::{Assumptions, CompanyFinancials, ModelStatus, ShareValuation};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DcfResult {
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub share_value: f64,
    /// Undiscounted terminal value at the end of the horizon.
    pub terminal_value: f64,
    /// Present value of the explicit-horizon flows, terminal value excluded.
    pub projected_cash_flows: f64,
    pub status: ModelStatus,
}

impl DcfResult {
    fn invalid(status: ModelStatus) -> Self {
        Self {
            enterprise_value: 0.0,
            equity_value: 0.0,
            share_value: 0.0,
            terminal_value: 0.0,
            projected_cash_flows: 0.0,
            status,
        }
    }
}

impl ShareValuation for DcfResult {
    fn model_name(&self) -> &'static str {
        "DCF (FCFF)"
    }

    fn share_value(&self) -> f64 {
        self.share_value
    }

    fn status(&self) -> ModelStatus {
        self.status
    }
}

/// Base FCFF figure: after-tax EBITDA.
pub fn base_fcff(financials: &CompanyFinancials, assumptions: &Assumptions) -> f64 {
    financials.ebitda() * (1.0 - assumptions.tax_rate_fraction())
}

pub fn compute_dcf(financials: &CompanyFinancials, assumptions: &Assumptions) -> DcfResult {
    let fcff = base_fcff(financials, assumptions);
    let growth = assumptions.revenue_growth_rate();
    let terminal_growth = assumptions.terminal_growth_rate();
    let wacc = assumptions.wacc_rate();
    let years = assumptions.projection_years;

    let projection = project_growing_flows(fcff, growth, wacc, years);
    let Some(terminal_value) = gordon_terminal_value(projection.last_flow, terminal_growth, wacc) else {
        warn!(
            symbol = %financials.symbol,
            wacc = assumptions.wacc,
            terminal_growth = assumptions.terminal_growth,
            "WACC must be greater than terminal growth rate"
        );
        return DcfResult::invalid(ModelStatus::DiscountRateNotAboveGrowth);
    };

    let terminal_pv = present_value(terminal_value, wacc, years);
    let enterprise_value = projection.present_value + terminal_pv;
    let equity_value = (enterprise_value - financials.total_debt()).max(0.0);

    let (share_value, status) = match financials.shares_outstanding() {
        Some(shares) => (equity_value / shares, ModelStatus::Valid),
        None => {
            warn!(
                symbol = %financials.symbol,
                "DCF share value unavailable: no share count and no positive price to derive one"
            );
            (0.0, ModelStatus::SharesUnavailable)
        }
    };

    debug!(
        symbol = %financials.symbol,
        fcff,
        projected_cash_flows = projection.present_value,
        terminal_value,
        terminal_pv,
        enterprise_value,
        equity_value,
        share_value,
        "DCF calculated"
    );

    DcfResult {
        enterprise_value,
        equity_value,
        share_value,
        terminal_value,
        projected_cash_flows: projection.present_value,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn golden_financials() -> CompanyFinancials {
        CompanyFinancials {
            symbol: "GOLD".to_string(),
            ebitda: Some(1_000_000.0),
            total_debt: Some(500_000.0),
            shares_outstanding: Some(100_000.0),
            ..Default::default()
        }
    }

    fn golden_assumptions() -> Assumptions {
        Assumptions {
            revenue_growth: 8.0,
            terminal_growth: 3.0,
            wacc: 10.5,
            tax_rate: 20.0,
            projection_years: 5,
            ..Default::default()
        }
    }

    #[test]
    fn test_golden_value() {
        let result = compute_dcf(&golden_financials(), &golden_assumptions());

        // Written out: FCFF 800,000 grown at 8% and discounted at 10.5%.
        let mut flow = 800_000.0_f64;
        let mut pv_sum = 0.0;
        for year in 1..=5 {
            flow *= 1.08;
            pv_sum += flow / 1.105_f64.powi(year);
        }
        let terminal = flow * 1.03 / (0.105 - 0.03);
        let expected_ev = pv_sum + terminal / 1.105_f64.powi(5);

        assert_relative_eq!(result.projected_cash_flows, pv_sum, max_relative = 1e-12);
        assert_relative_eq!(result.enterprise_value, expected_ev, max_relative = 1e-12);

        assert_relative_eq!(result.projected_cash_flows, 3_736_558.912_837_041_5, max_relative = 1e-9);
        assert_relative_eq!(result.terminal_value, 16_143_017.803_776_007, max_relative = 1e-9);
        assert_relative_eq!(result.enterprise_value, 13_535_368.888_077_123, max_relative = 1e-9);
        assert_relative_eq!(result.equity_value, 13_035_368.888_077_123, max_relative = 1e-9);
        assert_relative_eq!(result.share_value, 130.353_688_880_771_24, max_relative = 1e-9);
        assert_eq!(result.status, ModelStatus::Valid);
    }

    #[test]
    fn test_wacc_equal_to_terminal_growth_zeroes_everything() {
        let assumptions = Assumptions {
            wacc: 3.0,
            terminal_growth: 3.0,
            ..golden_assumptions()
        };
        let result = compute_dcf(&golden_financials(), &assumptions);

        assert_eq!(result.enterprise_value, 0.0);
        assert_eq!(result.equity_value, 0.0);
        assert_eq!(result.share_value, 0.0);
        assert_eq!(result.terminal_value, 0.0);
        assert_eq!(result.projected_cash_flows, 0.0);
        assert_eq!(result.status, ModelStatus::DiscountRateNotAboveGrowth);
    }

    #[test]
    fn test_debt_cannot_push_equity_negative() {
        let financials = CompanyFinancials {
            total_debt: Some(1e12),
            ..golden_financials()
        };
        let result = compute_dcf(&financials, &golden_assumptions());

        assert!(result.enterprise_value > 0.0);
        assert_eq!(result.equity_value, 0.0);
        assert_eq!(result.share_value, 0.0);
        assert_eq!(result.status, ModelStatus::Valid);
    }

    #[test]
    fn test_derived_share_count() {
        let financials = CompanyFinancials {
            shares_outstanding: None,
            market_cap: Some(5_000_000.0),
            current_price: Some(50.0),
            ..golden_financials()
        };
        let derived = compute_dcf(&financials, &golden_assumptions());
        let reported = compute_dcf(&golden_financials(), &golden_assumptions());

        assert_relative_eq!(derived.share_value, reported.share_value, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_price_marks_shares_unavailable() {
        let financials = CompanyFinancials {
            shares_outstanding: None,
            market_cap: Some(5_000_000.0),
            current_price: None,
            ..golden_financials()
        };
        let result = compute_dcf(&financials, &golden_assumptions());

        assert_eq!(result.status, ModelStatus::SharesUnavailable);
        assert_eq!(result.share_value, 0.0);
        assert!(result.share_value.is_finite());
        assert!(result.enterprise_value > 0.0);
    }

    #[test]
    fn test_higher_growth_raises_share_value() {
        let mut previous = 0.0;
        for growth in [0.0, 2.0, 5.0, 8.0, 12.0, 20.0] {
            let assumptions = Assumptions {
                revenue_growth: growth,
                ..golden_assumptions()
            };
            let value = compute_dcf(&golden_financials(), &assumptions).share_value;
            assert!(value > previous, "growth {growth}% gave {value} <= {previous}");
            previous = value;
        }
    }
}
