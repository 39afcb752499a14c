pub mod discount;
pub mod error;
pub mod format;
pub mod traits;
pub mod types;

pub use error::*;
pub use traits::*;
pub use types::*;
