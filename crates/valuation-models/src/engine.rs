//! End-to-end valuation pass and the caller-owned session that feeds it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use valuation_core::{Assumptions, CompanyFinancials, ModelWeights, ShareValuation, ValuationError};

use crate::aggregator::{aggregate, weighted_value_of_valid_models, Aggregation};
use crate::dcf::{compute_dcf, DcfResult};
use crate::ddm::{compute_ddm, DdmResult};
use crate::fcfe::{compute_fcfe, FcfeResult};

/// Each model's gap to the market price, in percent. `None` without a
/// positive market price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketDiffs {
    pub dcf: Option<f64>,
    pub fcfe: Option<f64>,
    pub ddm: Option<f64>,
}

/// Everything a presentation layer needs from one calculation pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValuationReport {
    pub symbol: String,
    pub name: String,
    pub calculated_at: DateTime<Utc>,
    pub current_price: f64,
    pub assumptions: Assumptions,
    pub weights: ModelWeights,
    pub dcf: DcfResult,
    pub fcfe: FcfeResult,
    pub ddm: DdmResult,
    pub market_diffs: MarketDiffs,
    /// Blend over only the models that produced a value; informational.
    pub valid_weighted_share_value: f64,
    /// Target price and recommendation; `None` when there is no positive
    /// market price to measure upside against.
    pub summary: Option<Aggregation>,
}

/// Run every model on `financials` and blend DCF/FCFE by `weights`.
///
/// A missing market price does not fail the pass: the model results are
/// still returned and only `summary` is left empty.
pub fn calculate_valuation(
    financials: &CompanyFinancials,
    assumptions: &Assumptions,
    weights: &ModelWeights,
) -> Result<ValuationReport, ValuationError> {
    assumptions.validate()?;

    let current_price = financials.current_price();
    let dcf = compute_dcf(financials, assumptions);
    let fcfe = compute_fcfe(financials, assumptions);
    let ddm = compute_ddm(financials, assumptions);

    let summary = match aggregate(&dcf, &fcfe, weights, current_price) {
        Ok(summary) => {
            tracing::info!(
                symbol = %financials.symbol,
                dcf = dcf.share_value,
                fcfe = fcfe.share_value,
                target = summary.weighted_share_value,
                upside = summary.upside_pct,
                recommendation = %summary.recommendation.label,
                "Valuation calculation completed"
            );
            Some(summary)
        }
        Err(e) => {
            tracing::warn!(
                symbol = %financials.symbol,
                dcf = dcf.share_value,
                fcfe = fcfe.share_value,
                "No recommendation: {e}"
            );
            None
        }
    };

    let market_diffs = MarketDiffs {
        dcf: dcf.market_diff_pct(current_price),
        fcfe: fcfe.market_diff_pct(current_price),
        ddm: ddm.market_diff_pct(current_price),
    };

    Ok(ValuationReport {
        symbol: financials.symbol.clone(),
        name: financials.name.clone(),
        calculated_at: Utc::now(),
        current_price,
        assumptions: *assumptions,
        weights: *weights,
        valid_weighted_share_value: weighted_value_of_valid_models(&dcf, &fcfe, weights),
        dcf,
        fcfe,
        ddm,
        market_diffs,
        summary,
    })
}

/// Inputs a caller edits between calculation passes.
///
/// Holds no results: every [`ValuationSession::calculate`] call recomputes
/// from the current inputs.
#[derive(Debug, Clone, Default)]
pub struct ValuationSession {
    financials: Option<CompanyFinancials>,
    assumptions: Assumptions,
    weights: ModelWeights,
}

impl ValuationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_inputs(assumptions: Assumptions, weights: ModelWeights) -> Self {
        Self {
            financials: None,
            assumptions,
            weights,
        }
    }

    pub fn load_financials(&mut self, financials: CompanyFinancials) {
        tracing::info!(symbol = %financials.symbol, "Company financials loaded");
        self.financials = Some(financials);
    }

    /// Drop the loaded company; subsequent calculations fail until reloaded.
    pub fn clear(&mut self) {
        self.financials = None;
    }

    pub fn financials(&self) -> Option<&CompanyFinancials> {
        self.financials.as_ref()
    }

    pub fn assumptions(&self) -> &Assumptions {
        &self.assumptions
    }

    pub fn set_assumptions(&mut self, assumptions: Assumptions) {
        self.assumptions = assumptions;
    }

    pub fn reset_assumptions(&mut self) {
        self.assumptions = Assumptions::default();
    }

    pub fn weights(&self) -> ModelWeights {
        self.weights
    }

    pub fn set_dcf_weight(&mut self, value: u8) {
        self.weights.set_dcf(value);
    }

    pub fn set_fcfe_weight(&mut self, value: u8) {
        self.weights.set_fcfe(value);
    }

    pub fn normalize_weights(&mut self) {
        self.weights.normalize();
    }

    pub fn calculate(&self) -> Result<ValuationReport, ValuationError> {
        let financials = self.financials.as_ref().ok_or(ValuationError::NotLoaded)?;
        calculate_valuation(financials, &self.assumptions, &self.weights)
    }
}
