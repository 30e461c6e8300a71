pub mod checkout_calculator;

pub use checkout_calculator::{CheckoutCalculator, DEFAULT_TENOR_HARI};
