pub mod currency;
pub mod error;
pub mod traits;

pub use currency::CurrencyRates;
pub use error::{AppError, Result};
