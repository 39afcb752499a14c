//! Blends the DCF and FCFE estimates into a target price and classifies the
//! upside into a BUY/HOLD/SELL call.

use std::fmt;

use serde::{Deserialize, Serialize};
use valuation_core::discount::percent_gap;
use valuation_core::format::format_currency;
use valuation_core::{ModelWeights, ShareValuation, ValuationError};

use crate::dcf::DcfResult;
use crate::fcfe::FcfeResult;

/// Upside (in percent) beyond which the call is BUY, and below whose
/// negation (inclusive) it is SELL.
pub const RECOMMENDATION_BAND_PCT: f64 = 15.0;

const CONFIDENCE_FLOOR: f64 = 60.0;
const CONFIDENCE_CAP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecommendationLabel {
    Buy,
    Hold,
    Sell,
}

impl RecommendationLabel {
    pub fn from_upside(upside_pct: f64) -> Self {
        if upside_pct > RECOMMENDATION_BAND_PCT {
            RecommendationLabel::Buy
        } else if upside_pct > -RECOMMENDATION_BAND_PCT {
            RecommendationLabel::Hold
        } else {
            RecommendationLabel::Sell
        }
    }

    pub fn to_label(&self) -> &'static str {
        match self {
            RecommendationLabel::Buy => "BUY",
            RecommendationLabel::Hold => "HOLD",
            RecommendationLabel::Sell => "SELL",
        }
    }
}

impl fmt::Display for RecommendationLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_label())
    }
}

/// Derived view; rebuilt from the latest results every time it is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub label: RecommendationLabel,
    pub reasoning: String,
    /// 60 to 100, growing with distance from fair value.
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregation {
    pub weighted_share_value: f64,
    pub upside_pct: f64,
    pub recommendation: Recommendation,
}

pub fn weighted_share_value(dcf: &DcfResult, fcfe: &FcfeResult, weights: &ModelWeights) -> f64 {
    dcf.share_value * weights.dcf_fraction() + fcfe.share_value * weights.fcfe_fraction()
}

/// Weighted average over only the models that produced a positive value,
/// with their weights rescaled to cover the whole. Zero when none did.
pub fn weighted_value_of_valid_models(
    dcf: &DcfResult,
    fcfe: &FcfeResult,
    weights: &ModelWeights,
) -> f64 {
    let models: [(&dyn ShareValuation, f64); 2] = [
        (dcf as &dyn ShareValuation, weights.dcf_fraction()),
        (fcfe as &dyn ShareValuation, weights.fcfe_fraction()),
    ];
    let (total, weight) = models
        .iter()
        .filter(|(model, _)| model.share_value() > 0.0)
        .fold((0.0, 0.0), |(total, weight), (model, w)| {
            (total + model.share_value() * w, weight + w)
        });

    if weight > 0.0 {
        total / weight
    } else {
        0.0
    }
}

pub fn confidence_for(upside_pct: f64) -> f64 {
    (upside_pct.abs() * 2.0 + CONFIDENCE_FLOOR).min(CONFIDENCE_CAP)
}

pub fn recommend(upside_pct: f64, target_price: f64) -> Recommendation {
    let label = RecommendationLabel::from_upside(upside_pct);
    let reasoning = match label {
        RecommendationLabel::Buy => format!(
            "Stock is undervalued with {:.1}% upside potential. Recommend buy with target price {}.",
            upside_pct,
            format_currency(target_price)
        ),
        RecommendationLabel::Hold => format!(
            "Stock is fairly valued with {:.1}% difference. Recommend hold and monitor.",
            upside_pct
        ),
        RecommendationLabel::Sell => format!(
            "Stock is overvalued with {:.1}% downside potential. Recommend sell.",
            upside_pct.abs()
        ),
    };

    Recommendation {
        label,
        reasoning,
        confidence: confidence_for(upside_pct),
    }
}

/// Blend both models against the market price.
///
/// Fails with [`ValuationError::InvalidPrice`] when the price is not a
/// positive number, since upside is undefined there.
pub fn aggregate(
    dcf: &DcfResult,
    fcfe: &FcfeResult,
    weights: &ModelWeights,
    current_price: f64,
) -> Result<Aggregation, ValuationError> {
    if !(current_price > 0.0 && current_price.is_finite()) {
        return Err(ValuationError::InvalidPrice(current_price));
    }

    let weighted_share_value = weighted_share_value(dcf, fcfe, weights);
    let upside_pct = percent_gap(weighted_share_value, current_price);

    Ok(Aggregation {
        weighted_share_value,
        upside_pct,
        recommendation: recommend(upside_pct, weighted_share_value),
    })
}
