//! Shared types for the courtside trading engine.
//!
//! CRITICAL: All prices and quantities use `rust_decimal::Decimal`.
//! NEVER use f64 for financial math. Model math (logistic, tanh, sqrt)
//! runs in f64 behind the bridge helpers in [`num`].

pub mod num;
pub mod types;

pub use num::{clamp_price, decimal_to_f64, f64_to_decimal, MAX_PRICE, MIN_PRICE};
pub use types::{OrderId, Side};
