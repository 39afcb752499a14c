use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValuationError {
    #[error("No company financials loaded")]
    NotLoaded,

    #[error("Invalid assumptions: {0}")]
    InvalidAssumptions(String),

    #[error("Invalid model weights: {0}")]
    InvalidWeights(String),

    #[error("Invalid current price: {0}")]
    InvalidPrice(f64),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}
