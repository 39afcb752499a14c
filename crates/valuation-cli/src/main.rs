use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use valuation_core::CompanyFinancials;
use valuation_models::ValuationSession;

mod config;
mod output;

use config::{CliConfig, OutputFormat};

/// Intrinsic value of a company from DCF (FCFF) and FCFE models.
#[derive(Parser, Debug)]
#[command(name = "valuation", version, about, long_about = None)]
struct Cli {
    /// Company financials JSON (bare record or data-service response)
    financials: PathBuf,

    /// Revenue growth, percent
    #[arg(long)]
    revenue_growth: Option<f64>,

    /// Terminal growth, percent
    #[arg(long)]
    terminal_growth: Option<f64>,

    /// Weighted average cost of capital, percent
    #[arg(long)]
    wacc: Option<f64>,

    /// Required return on equity, percent
    #[arg(long)]
    required_return: Option<f64>,

    /// Tax rate, percent
    #[arg(long)]
    tax_rate: Option<f64>,

    /// Projection horizon in years
    #[arg(long)]
    projection_years: Option<u32>,

    /// DCF weight (0-100); FCFE takes the remainder
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=100))]
    dcf_weight: Option<u8>,

    /// FCFE weight (0-100); DCF takes the remainder
    #[arg(long, conflicts_with = "dcf_weight", value_parser = clap::value_parser!(u8).range(0..=100))]
    fcfe_weight: Option<u8>,

    /// Report format
    #[arg(long, value_enum)]
    output: Option<OutputFormat>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let mut config = CliConfig::from_env()?;

    let a = &mut config.assumptions;
    if let Some(v) = cli.revenue_growth {
        a.revenue_growth = v;
    }
    if let Some(v) = cli.terminal_growth {
        a.terminal_growth = v;
    }
    if let Some(v) = cli.wacc {
        a.wacc = v;
    }
    if let Some(v) = cli.required_return {
        a.required_return = v;
    }
    if let Some(v) = cli.tax_rate {
        a.tax_rate = v;
    }
    if let Some(v) = cli.projection_years {
        a.projection_years = v;
    }
    let output = cli.output.unwrap_or(config.output);
    tracing::debug!(?config, ?output, "configuration resolved");

    let raw = std::fs::read_to_string(&cli.financials)
        .with_context(|| format!("failed to read {}", cli.financials.display()))?;
    let financials = CompanyFinancials::from_json_str(&raw)
        .with_context(|| format!("failed to load financials from {}", cli.financials.display()))?;

    let mut session = ValuationSession::with_inputs(config.assumptions, config.weights);
    if let Some(w) = cli.dcf_weight {
        session.set_dcf_weight(w);
    }
    if let Some(w) = cli.fcfe_weight {
        session.set_fcfe_weight(w);
    }
    session.load_financials(financials);

    let report = session.calculate().context("valuation failed")?;

    match output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Text => {
            if let Some(financials) = session.financials() {
                print!("{}", output::render_text(financials, &report));
            }
        }
    }

    Ok(())
}
