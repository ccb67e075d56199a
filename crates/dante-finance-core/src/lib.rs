pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "amortization")]
pub mod amortization;

#[cfg(feature = "simulator")]
pub mod simulator;

pub use error::DanteFinanceError;
pub use types::*;

/// Standard result type for all dante-finance operations
pub type DanteFinanceResult<T> = Result<T, DanteFinanceError>;
