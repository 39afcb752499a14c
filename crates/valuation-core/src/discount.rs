//! Discounting primitives shared by the cash-flow models.
//!
//! All rates here are fractional (0.105, not 10.5). The models convert from
//! the percentage assumptions before calling in.

/// Compounding factor `(1 + rate)^periods`.
pub fn compound_factor(rate: f64, periods: u32) -> f64 {
    (1.0 + rate).powi(periods as i32)
}

/// Present value of `amount` received `periods` years out.
pub fn present_value(amount: f64, rate: f64, periods: u32) -> f64 {
    amount / compound_factor(rate, periods)
}

/// Explicit-horizon projection of a growing cash flow.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Undiscounted cash flow of the final projected year.
    pub last_flow: f64,
    /// Sum of the discounted yearly flows, terminal value excluded.
    pub present_value: f64,
}

/// Grow `base` by `growth` each year for `years` years and discount each
/// year's flow at `discount_rate`.
pub fn project_growing_flows(base: f64, growth: f64, discount_rate: f64, years: u32) -> Projection {
    let mut flow = base;
    let mut total = 0.0;
    for year in 1..=years {
        flow *= 1.0 + growth;
        let pv = present_value(flow, discount_rate, year);
        tracing::debug!(year, flow, pv, "projected cash flow");
        total += pv;
    }
    Projection {
        last_flow: flow,
        present_value: total,
    }
}

/// Gordon-growth terminal value of the flow following `last_flow`.
///
/// Returns `None` when the discount rate does not exceed the perpetual
/// growth rate, where the perpetuity has no finite value.
pub fn gordon_terminal_value(last_flow: f64, terminal_growth: f64, discount_rate: f64) -> Option<f64> {
    if discount_rate <= terminal_growth {
        return None;
    }
    Some(last_flow * (1.0 + terminal_growth) / (discount_rate - terminal_growth))
}

/// Percentage gap between a modeled value and the market price.
pub fn percent_gap(value: f64, price: f64) -> f64 {
    (value - price) / price * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_present_value() {
        assert_relative_eq!(present_value(110.0, 0.10, 1), 100.0, epsilon = 1e-9);
        assert_relative_eq!(present_value(121.0, 0.10, 2), 100.0, epsilon = 1e-9);
        assert_relative_eq!(present_value(50.0, 0.10, 0), 50.0);
    }

    #[test]
    fn test_project_growing_flows() {
        // 100 growing 10%, discounted at 10%: every year is worth 100 today.
        let projection = project_growing_flows(100.0, 0.10, 0.10, 3);
        assert_relative_eq!(projection.present_value, 300.0, epsilon = 1e-9);
        assert_relative_eq!(projection.last_flow, 133.1, epsilon = 1e-9);

        let empty = project_growing_flows(100.0, 0.10, 0.10, 0);
        assert_eq!(empty.present_value, 0.0);
        assert_eq!(empty.last_flow, 100.0);
    }

    #[test]
    fn test_gordon_terminal_value() {
        let tv = gordon_terminal_value(100.0, 0.03, 0.10).unwrap();
        assert_relative_eq!(tv, 103.0 / 0.07, epsilon = 1e-9);

        assert!(gordon_terminal_value(100.0, 0.03, 0.03).is_none());
        assert!(gordon_terminal_value(100.0, 0.05, 0.03).is_none());
    }

    #[test]
    fn test_percent_gap() {
        assert_relative_eq!(percent_gap(115.0, 100.0), 15.0, epsilon = 1e-9);
        assert_relative_eq!(percent_gap(50.0, 100.0), -50.0);
    }
}
