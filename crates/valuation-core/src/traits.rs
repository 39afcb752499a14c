use crate::{discount, ModelStatus};

/// Common view over the per-model results.
pub trait ShareValuation {
    /// Short model label used in reports and logs.
    fn model_name(&self) -> &'static str;

    /// Intrinsic value per share; zero when the model could not produce one.
    fn share_value(&self) -> f64;

    fn status(&self) -> ModelStatus;

    /// Percentage gap between this model's value and the market price.
    /// `None` when the price is not positive.
    fn market_diff_pct(&self, current_price: f64) -> Option<f64> {
        if current_price > 0.0 && current_price.is_finite() {
            Some(discount::percent_gap(self.share_value(), current_price))
        } else {
            None
        }
    }
}
