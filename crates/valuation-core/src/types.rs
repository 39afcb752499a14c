use serde::{Deserialize, Serialize};

use crate::ValuationError;

/// Trailing company metrics as delivered by the data service.
///
/// Every numeric field is nullable on the wire; the accessors below apply the
/// zero default so the models never see a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyFinancials {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sector: String,
    #[serde(default)]
    pub exchange: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub pe_ratio: Option<f64>,
    #[serde(default)]
    pub pb_ratio: Option<f64>,
    #[serde(default)]
    pub ps_ratio: Option<f64>,
    #[serde(default)]
    pub eps: Option<f64>,
    #[serde(default)]
    pub revenue_ttm: Option<f64>,
    #[serde(default)]
    pub net_income_ttm: Option<f64>,
    #[serde(default)]
    pub ebitda: Option<f64>,
    #[serde(default)]
    pub roe: Option<f64>,
    #[serde(default)]
    pub roa: Option<f64>,
    #[serde(default)]
    pub debt_to_equity: Option<f64>,
    #[serde(default)]
    pub shares_outstanding: Option<f64>,
    #[serde(default)]
    pub depreciation: Option<f64>,
    #[serde(default)]
    pub capex: Option<f64>,
    #[serde(default)]
    pub fcfe: Option<f64>,
    #[serde(default)]
    pub total_debt: Option<f64>,
}

/// Response wrapper used by the company data service.
#[derive(Debug, Deserialize)]
struct DataEnvelope {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    financials: CompanyFinancials,
}

fn or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

impl CompanyFinancials {
    /// Parse either a bare record or a `{ "success": .., ... }` envelope.
    pub fn from_json_str(raw: &str) -> Result<Self, ValuationError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| ValuationError::InvalidData(e.to_string()))?;

        if value.get("success").is_some() {
            let envelope: DataEnvelope = serde_json::from_value(value)
                .map_err(|e| ValuationError::InvalidData(e.to_string()))?;
            if !envelope.success {
                return Err(ValuationError::InvalidData(
                    envelope
                        .error
                        .unwrap_or_else(|| "Unable to load data from server".to_string()),
                ));
            }
            return Ok(envelope.financials);
        }

        serde_json::from_value(value).map_err(|e| ValuationError::InvalidData(e.to_string()))
    }

    pub fn current_price(&self) -> f64 {
        or_zero(self.current_price)
    }

    pub fn market_cap(&self) -> f64 {
        or_zero(self.market_cap)
    }

    pub fn eps(&self) -> f64 {
        or_zero(self.eps)
    }

    pub fn revenue_ttm(&self) -> f64 {
        or_zero(self.revenue_ttm)
    }

    pub fn net_income_ttm(&self) -> f64 {
        or_zero(self.net_income_ttm)
    }

    pub fn ebitda(&self) -> f64 {
        or_zero(self.ebitda)
    }

    pub fn depreciation(&self) -> f64 {
        or_zero(self.depreciation)
    }

    /// Capital expenditure as a magnitude; sources disagree on its sign.
    pub fn capex(&self) -> f64 {
        or_zero(self.capex).abs()
    }

    pub fn fcfe(&self) -> f64 {
        or_zero(self.fcfe)
    }

    pub fn total_debt(&self) -> f64 {
        or_zero(self.total_debt)
    }

    /// Share count used for per-share values.
    ///
    /// A positive reported figure wins. Otherwise it is derived from
    /// `market_cap / current_price`, which needs a positive price. `None`
    /// means per-share values cannot be computed.
    pub fn shares_outstanding(&self) -> Option<f64> {
        let reported = or_zero(self.shares_outstanding);
        if reported > 0.0 {
            return Some(reported);
        }

        let price = self.current_price();
        if price <= 0.0 {
            return None;
        }
        let derived = self.market_cap() / price;
        (derived.is_finite() && derived > 0.0).then_some(derived)
    }
}

/// Forward-looking inputs. Percentages are whole numbers (8.0 means 8%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assumptions {
    #[serde(alias = "revenueGrowth")]
    pub revenue_growth: f64,
    #[serde(alias = "terminalGrowth")]
    pub terminal_growth: f64,
    pub wacc: f64,
    #[serde(alias = "requiredReturn")]
    pub required_return: f64,
    #[serde(alias = "taxRate")]
    pub tax_rate: f64,
    #[serde(alias = "projectionYears", default = "default_projection_years")]
    pub projection_years: u32,
}

fn default_projection_years() -> u32 {
    5
}

impl Default for Assumptions {
    fn default() -> Self {
        Self {
            revenue_growth: 8.0,
            terminal_growth: 3.0,
            wacc: 10.5,
            required_return: 12.0,
            tax_rate: 20.0,
            projection_years: default_projection_years(),
        }
    }
}

impl Assumptions {
    pub fn validate(&self) -> Result<(), ValuationError> {
        let fields = [
            ("revenue_growth", self.revenue_growth),
            ("terminal_growth", self.terminal_growth),
            ("wacc", self.wacc),
            ("required_return", self.required_return),
            ("tax_rate", self.tax_rate),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ValuationError::InvalidAssumptions(format!(
                "{name} must be a finite number"
            )));
        }
        if self.projection_years == 0 {
            return Err(ValuationError::InvalidAssumptions(
                "projection_years must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn revenue_growth_rate(&self) -> f64 {
        self.revenue_growth / 100.0
    }

    pub fn terminal_growth_rate(&self) -> f64 {
        self.terminal_growth / 100.0
    }

    pub fn wacc_rate(&self) -> f64 {
        self.wacc / 100.0
    }

    pub fn required_return_rate(&self) -> f64 {
        self.required_return / 100.0
    }

    pub fn tax_rate_fraction(&self) -> f64 {
        self.tax_rate / 100.0
    }
}

/// DCF/FCFE blend. The two weights always sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWeights")]
pub struct ModelWeights {
    dcf: u8,
    fcfe: u8,
}

#[derive(Deserialize)]
struct RawWeights {
    dcf: i64,
    fcfe: i64,
}

impl TryFrom<RawWeights> for ModelWeights {
    type Error = ValuationError;

    fn try_from(raw: RawWeights) -> Result<Self, Self::Error> {
        if !(0..=100).contains(&raw.dcf) || !(0..=100).contains(&raw.fcfe) {
            return Err(ValuationError::InvalidWeights(format!(
                "weights must be within 0..=100 (dcf {}, fcfe {})",
                raw.dcf, raw.fcfe
            )));
        }
        if raw.dcf + raw.fcfe != 100 {
            return Err(ValuationError::InvalidWeights(format!(
                "weights must sum to 100 (dcf {} + fcfe {})",
                raw.dcf, raw.fcfe
            )));
        }
        Ok(Self::with_dcf(raw.dcf as u8))
    }
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self { dcf: 50, fcfe: 50 }
    }
}

impl ModelWeights {
    /// Weight pair with the given DCF share; values above 100 are clamped.
    pub fn with_dcf(dcf: u8) -> Self {
        let dcf = dcf.min(100);
        Self { dcf, fcfe: 100 - dcf }
    }

    /// Weight pair with the given FCFE share; values above 100 are clamped.
    pub fn with_fcfe(fcfe: u8) -> Self {
        let fcfe = fcfe.min(100);
        Self { dcf: 100 - fcfe, fcfe }
    }

    pub fn dcf(&self) -> u8 {
        self.dcf
    }

    pub fn fcfe(&self) -> u8 {
        self.fcfe
    }

    pub fn set_dcf(&mut self, value: u8) {
        *self = Self::with_dcf(value);
    }

    pub fn set_fcfe(&mut self, value: u8) {
        *self = Self::with_fcfe(value);
    }

    /// Reset to an even split.
    pub fn normalize(&mut self) {
        *self = Self::default();
    }

    pub fn dcf_fraction(&self) -> f64 {
        f64::from(self.dcf) / 100.0
    }

    pub fn fcfe_fraction(&self) -> f64 {
        f64::from(self.fcfe) / 100.0
    }
}

/// Whether a model produced a meaningful value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelStatus {
    Valid,
    /// Discount rate at or below terminal growth; every output is zero.
    DiscountRateNotAboveGrowth,
    /// No usable share count; aggregate values are kept, per-share is zero.
    SharesUnavailable,
}

impl ModelStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, ModelStatus::Valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_stay_complementary() {
        let mut weights = ModelWeights::default();
        for value in [0u8, 1, 37, 50, 99, 100, 150] {
            weights.set_dcf(value);
            assert_eq!(u16::from(weights.dcf()) + u16::from(weights.fcfe()), 100);
            weights.set_fcfe(value);
            assert_eq!(u16::from(weights.dcf()) + u16::from(weights.fcfe()), 100);
        }

        weights.set_fcfe(70);
        assert_eq!(weights.dcf(), 30);
        weights.normalize();
        assert_eq!((weights.dcf(), weights.fcfe()), (50, 50));
    }

    #[test]
    fn test_weights_deserialize_rejects_bad_sum() {
        let ok: ModelWeights = serde_json::from_str(r#"{"dcf": 70, "fcfe": 30}"#).unwrap();
        assert_eq!(ok.dcf(), 70);

        assert!(serde_json::from_str::<ModelWeights>(r#"{"dcf": 70, "fcfe": 40}"#).is_err());
        assert!(serde_json::from_str::<ModelWeights>(r#"{"dcf": 120, "fcfe": -20}"#).is_err());
    }

    #[test]
    fn test_shares_outstanding_fallback() {
        let reported = CompanyFinancials {
            shares_outstanding: Some(1_000.0),
            market_cap: Some(50_000.0),
            current_price: Some(10.0),
            ..Default::default()
        };
        assert_eq!(reported.shares_outstanding(), Some(1_000.0));

        let derived = CompanyFinancials {
            shares_outstanding: None,
            ..reported.clone()
        };
        assert_eq!(derived.shares_outstanding(), Some(5_000.0));

        // A zero count is treated as absent.
        let zero = CompanyFinancials {
            shares_outstanding: Some(0.0),
            ..reported.clone()
        };
        assert_eq!(zero.shares_outstanding(), Some(5_000.0));

        let no_price = CompanyFinancials {
            shares_outstanding: None,
            current_price: None,
            ..reported
        };
        assert_eq!(no_price.shares_outstanding(), None);
    }

    #[test]
    fn test_assumptions_camel_case_and_validation() {
        let parsed: Assumptions = serde_json::from_str(
            r#"{"revenueGrowth": 8, "terminalGrowth": 3, "wacc": 10.5,
                "requiredReturn": 12, "taxRate": 20}"#,
        )
        .unwrap();
        assert_eq!(parsed, Assumptions::default());
        assert!(parsed.validate().is_ok());

        let zero_years = Assumptions {
            projection_years: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_years.validate(),
            Err(ValuationError::InvalidAssumptions(_))
        ));

        let nan = Assumptions {
            wacc: f64::NAN,
            ..Default::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn test_financials_envelope() {
        let ok = CompanyFinancials::from_json_str(
            r#"{"success": true, "symbol": "FPT", "current_price": 120000, "capex": -500}"#,
        )
        .unwrap();
        assert_eq!(ok.symbol, "FPT");
        assert_eq!(ok.current_price(), 120_000.0);
        assert_eq!(ok.capex(), 500.0);
        assert_eq!(ok.ebitda(), 0.0);

        let failed =
            CompanyFinancials::from_json_str(r#"{"success": false, "error": "No data found"}"#);
        assert_eq!(
            failed,
            Err(ValuationError::InvalidData("No data found".to_string()))
        );

        let bare = CompanyFinancials::from_json_str(r#"{"symbol": "VNM", "ebitda": null}"#).unwrap();
        assert_eq!(bare.symbol, "VNM");
        assert_eq!(bare.ebitda, None);
    }
}
