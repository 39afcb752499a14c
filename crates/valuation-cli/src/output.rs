use valuation_core::format::{
    format_currency, format_large_number, format_number, format_percent, format_signed_percent,
};
use valuation_core::{CompanyFinancials, ShareValuation};
use valuation_models::ValuationReport;

fn model_line(model: &dyn ShareValuation, diff: Option<f64>, weight: Option<u8>) -> String {
    let weight = weight.map(|w| format!("{w}%")).unwrap_or_else(|| "-".to_string());
    let diff = diff.map(format_signed_percent).unwrap_or_else(|| "--".to_string());
    format!(
        "  {:<12} {:>20} {:>9}  weight {:>4}",
        model.model_name(),
        format_currency(model.share_value()),
        diff,
        weight
    )
}

pub fn render_text(financials: &CompanyFinancials, report: &ValuationReport) -> String {
    let blank = |s: &str| if s.is_empty() { "--".to_string() } else { s.to_string() };
    let mut lines = vec![
        format!("{} ({})", blank(&financials.name), blank(&financials.symbol)),
        format!(
            "Sector: {}  Exchange: {}",
            blank(&financials.sector),
            blank(&financials.exchange)
        ),
        format!(
            "Price: {}  Market cap: {}  P/E: {}  P/B: {}  ROE: {}",
            format_currency(report.current_price),
            format_large_number(financials.market_cap()),
            format_number(financials.pe_ratio.unwrap_or_default()),
            format_number(financials.pb_ratio.unwrap_or_default()),
            format_percent(financials.roe.unwrap_or_default()),
        ),
        String::new(),
        "Valuation".to_string(),
        model_line(&report.dcf, report.market_diffs.dcf, Some(report.weights.dcf())),
        model_line(&report.fcfe, report.market_diffs.fcfe, Some(report.weights.fcfe())),
        model_line(&report.ddm, report.market_diffs.ddm, None),
        format!(
            "  DCF enterprise value {}, equity value {}; FCFE equity value {}",
            format_large_number(report.dcf.enterprise_value),
            format_large_number(report.dcf.equity_value),
            format_large_number(report.fcfe.equity_value),
        ),
    ];

    for (name, status) in [("DCF", report.dcf.status), ("FCFE", report.fcfe.status)] {
        if !status.is_valid() {
            lines.push(format!("  warning: {name} result unavailable ({status:?})"));
        }
    }
    lines.push(String::new());

    match &report.summary {
        Some(summary) => {
            lines.push(format!("Target price:   {}", format_currency(summary.weighted_share_value)));
            lines.push(format!("Upside:         {}", format_signed_percent(summary.upside_pct)));
            if (report.valid_weighted_share_value - summary.weighted_share_value).abs() > f64::EPSILON {
                lines.push(format!(
                    "Valid-only:     {}",
                    format_currency(report.valid_weighted_share_value)
                ));
            }
            lines.push(format!("Recommendation: {}", summary.recommendation.label));
            lines.push(format!("Confidence:     {:.0}%", summary.recommendation.confidence));
            lines.push(summary.recommendation.reasoning.clone());
        }
        None => {
            lines.push(format!(
                "Valid-only:     {}",
                format_currency(report.valid_weighted_share_value)
            ));
            lines.push("Recommendation: -- (no market price to compare against)".to_string());
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use valuation_core::{Assumptions, ModelWeights};
    use valuation_models::calculate_valuation;

    #[test]
    fn test_render_text_contains_summary() {
        let financials = CompanyFinancials {
            symbol: "VNM".to_string(),
            name: "Vinamilk".to_string(),
            current_price: Some(100.0),
            ebitda: Some(1_000_000.0),
            net_income_ttm: Some(600_000.0),
            shares_outstanding: Some(100_000.0),
            ..Default::default()
        };
        let report =
            calculate_valuation(&financials, &Assumptions::default(), &ModelWeights::default())
                .unwrap();
        let text = render_text(&financials, &report);

        assert!(text.starts_with("Vinamilk (VNM)"));
        assert!(text.contains("Sector: --"));
        assert!(text.contains("DCF (FCFF)"));
        let summary = report.summary.as_ref().unwrap();
        assert!(text.contains(&format!("Recommendation: {}", summary.recommendation.label)));
        assert!(text.ends_with(&format!("{}\n", summary.recommendation.reasoning)));
    }

    #[test]
    fn test_render_text_without_price() {
        let financials = CompanyFinancials {
            symbol: "VNM".to_string(),
            ebitda: Some(1_000_000.0),
            shares_outstanding: Some(100_000.0),
            ..Default::default()
        };
        let report =
            calculate_valuation(&financials, &Assumptions::default(), &ModelWeights::default())
                .unwrap();
        let text = render_text(&financials, &report);

        assert!(text.contains("DCF (FCFF)"));
        assert!(text.contains("Recommendation: -- (no market price to compare against)"));
        assert!(!text.contains("Target price"));
    }
}
