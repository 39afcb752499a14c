use std::env;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use valuation_core::{Assumptions, ModelWeights};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    /// Same names the `--output` flag accepts, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        <Self as ValueEnum>::from_str(s.trim(), true).map_err(anyhow::Error::msg)
    }
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub assumptions: Assumptions,
    pub weights: ModelWeights,
    pub output: OutputFormat,
}

fn env_or<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.trim()
        .parse::<T>()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("{key} has an invalid value '{raw}'"))
}

impl CliConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Assumptions::default();
        let assumptions = Assumptions {
            revenue_growth: env_or("VALUATION_REVENUE_GROWTH", &defaults.revenue_growth.to_string())?,
            terminal_growth: env_or("VALUATION_TERMINAL_GROWTH", &defaults.terminal_growth.to_string())?,
            wacc: env_or("VALUATION_WACC", &defaults.wacc.to_string())?,
            required_return: env_or("VALUATION_REQUIRED_RETURN", &defaults.required_return.to_string())?,
            tax_rate: env_or("VALUATION_TAX_RATE", &defaults.tax_rate.to_string())?,
            projection_years: env_or("VALUATION_PROJECTION_YEARS", &defaults.projection_years.to_string())?,
        };

        let dcf_weight: u8 = env_or("VALUATION_DCF_WEIGHT", "50")?;
        if dcf_weight > 100 {
            bail!("VALUATION_DCF_WEIGHT must be between 0 and 100, got {dcf_weight}");
        }

        Ok(Self {
            assumptions,
            weights: ModelWeights::with_dcf(dcf_weight),
            output: env_or("VALUATION_OUTPUT", "text")?,
        })
    }
}
