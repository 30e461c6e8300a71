pub mod debt;

pub use debt::{Debt, DebtKind, DebtPayment, DebtStatus};
